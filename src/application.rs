//! Global configuration for this application.
//!
//! The configuration is an optional TOML file; every value has a default so a
//! fresh machine works without one. Paths may start with `~` or `$HOME`.

use crate::constants::{CONFIG_NAME, DEFAULT_BACKUP_DIR, DEFAULT_SECRET_PATTERNS, PKG_NAME};
use crate::error::{Error, Result};
use crate::path::expand_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The main application configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Application {
    pub backup: BackupSection,
    pub log: LogSection,
    pub secrets: SecretsSection,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BackupSection {
    /// Where artifacts are written.
    pub dir: String,
}

impl Default for BackupSection {
    fn default() -> Self {
        Self {
            dir: DEFAULT_BACKUP_DIR.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogSection {
    /// Directory of the rotating log file; the platform data dir when unset.
    pub dir: Option<String>,
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            dir: None,
            level: "info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SecretsSection {
    /// Root of the secrets scan.
    pub root: String,
    /// Exact file names to report.
    pub patterns: Vec<String>,
}

impl Default for SecretsSection {
    fn default() -> Self {
        Self {
            root: "~".to_string(),
            patterns: DEFAULT_SECRET_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Application {
    /// Loads configuration from the config file, or the defaults if there is none.
    ///
    /// # Errors
    ///
    /// - Return [`Error::Config`] if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file())
    }

    pub fn load_from(file: &Path) -> Result<Self> {
        if !file.exists() {
            info!("No configuration file at {}; using defaults", file.display());
            return Ok(Self::default());
        }
        info!("Loading configuration: {}", file.display());
        let toml_str = fs::read_to_string(file).map_err(|e| Error::Config {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(file, &toml_str)
    }

    fn parse(file: &Path, toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config {
            path: file.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn backup_dir(&self, home: &Path) -> PathBuf {
        expand_path(&self.backup.dir, home)
    }

    pub fn secrets_root(&self, home: &Path) -> PathBuf {
        expand_path(&self.secrets.root, home)
    }

    pub fn log_dir(&self, home: &Path) -> PathBuf {
        match &self.log.dir {
            Some(dir) => expand_path(dir, home),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| home.join(".local/share"))
                .join(PKG_NAME)
                .join("logs"),
        }
    }
}

/// Returns the absolute path to the configuration file.
pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_NAME)
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(not(target_os = "macos"))]
fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(PKG_NAME)
}

/// Returns the configuration directory for the application, platform-specific.
#[cfg(target_os = "macos")]
fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join(PKG_NAME)
}
