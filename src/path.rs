//! Well-known locations on the workstation.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Supplies the fixed locations units read from.
///
/// Everything is derived from [`PathProvider::home`] unless a provider says
/// otherwise, so pointing `home` at a temporary directory redirects every unit.
pub trait PathProvider {
    fn home(&self) -> &Path;

    /// Directory scanned for installed applications.
    fn applications_dir(&self) -> PathBuf;

    fn ssh_dir(&self) -> PathBuf {
        self.home().join(".ssh")
    }

    fn ssh_config(&self) -> PathBuf {
        self.ssh_dir().join("config")
    }

    /// VS Code user `settings.json`.
    #[cfg(target_os = "macos")]
    fn vscode_settings(&self) -> PathBuf {
        self.home()
            .join("Library/Application Support/Code/User/settings.json")
    }

    /// VS Code user `settings.json`.
    #[cfg(not(target_os = "macos"))]
    fn vscode_settings(&self) -> PathBuf {
        self.home().join(".config/Code/User/settings.json")
    }

    fn launch_agents_dir(&self) -> PathBuf {
        self.home().join("Library/LaunchAgents")
    }
}

/// Paths of the user running the process.
#[derive(Debug, Clone)]
pub struct UserPaths {
    home: PathBuf,
    applications: PathBuf,
}

impl UserPaths {
    /// Resolve the current user's home directory.
    ///
    /// # Errors
    ///
    /// - Return [`Error::NoWayHome`] if the home directory cannot be determined.
    pub fn detect() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::NoWayHome)?;
        Ok(Self::new(home, PathBuf::from("/Applications")))
    }

    /// Paths rooted at an arbitrary home directory.
    pub fn new(home: impl Into<PathBuf>, applications: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            applications: applications.into(),
        }
    }
}

impl PathProvider for UserPaths {
    fn home(&self) -> &Path {
        &self.home
    }

    fn applications_dir(&self) -> PathBuf {
        self.applications.clone()
    }
}

/// Expands a configured path, replacing a leading `~` or `$HOME` with `home`.
///
/// Relative results are anchored at `home` as well, so a config value such as
/// `icloud/backup` means the same thing regardless of the working directory.
pub fn expand_path(input: &str, home: &Path) -> PathBuf {
    let rest = input
        .strip_prefix('~')
        .or_else(|| input.strip_prefix("$HOME"));
    match rest {
        Some("") => home.to_path_buf(),
        Some(rest) => home.join(rest.trim_start_matches('/')),
        None => {
            let path = Path::new(input);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                home.join(path)
            }
        }
    }
}
