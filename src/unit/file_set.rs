//! Units that preserve a fixed set of config files and directories.

use super::{Unit, Writer};
use crate::constants::EMBEDDED_DB;
use crate::error::Result;
use crate::file_util;
use crate::result::BackupResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// Copies candidate files verbatim and zips candidate directories into
/// `<prefix>_<dirname>.zip`. Output names are fixed, so a rerun overwrites.
pub struct FileSet {
    name: &'static str,
    prefix: &'static str,
    candidates: Vec<PathBuf>,
}

impl FileSet {
    pub fn new(name: &'static str, prefix: &'static str, candidates: Vec<PathBuf>) -> Self {
        Self {
            name,
            prefix,
            candidates,
        }
    }

    fn under(home: &Path, name: &'static str, prefix: &'static str, rel: &[&str]) -> Self {
        Self::new(name, prefix, rel.iter().map(|p| home.join(p)).collect())
    }

    /// R and Julia/Jupyter environments.
    pub fn numeric_env(home: &Path) -> Self {
        Self::under(
            home,
            "numeric-env",
            "numeric",
            &[".Rprofile", ".Renviron", ".julia/config", ".jupyter"],
        )
    }

    pub fn git(home: &Path) -> Self {
        Self::under(
            home,
            "git",
            "git",
            &[".gitconfig", ".gitignore_global", ".config/git"],
        )
    }

    pub fn terminal(home: &Path) -> Self {
        Self::under(
            home,
            "terminal",
            "terminal",
            &[
                ".wezterm.lua",
                ".config/alacritty",
                ".config/kitty",
                ".config/ghostty",
            ],
        )
    }

    pub fn cloud_cli(home: &Path) -> Self {
        Self::under(
            home,
            "cloud-cli",
            "cloud",
            &[".aws", ".config/gcloud", ".azure", ".kube"],
        )
    }

    /// Candidates present on this machine, in declaration order.
    pub fn existing(&self) -> Vec<&PathBuf> {
        self.candidates
            .iter()
            .filter(|p| p.is_file() || p.is_dir())
            .collect()
    }

    fn archive_name(&self, dir: &Path) -> String {
        let base = dir
            .file_name()
            .map(|n| n.to_string_lossy().trim_start_matches('.').to_string())
            .unwrap_or_default();
        format!("{}_{base}.zip", self.prefix)
    }

    /// Copies or zips every existing candidate into `dir`.
    ///
    /// Returns an empty list, without touching `dir`, when nothing exists.
    pub fn copy_existing(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let existing = self.existing();
        if existing.is_empty() {
            return Ok(vec![]);
        }
        file_util::ensure_dir(dir)?;

        let mut produced = Vec::with_capacity(existing.len());
        for src in existing {
            if src.is_dir() {
                let dest = dir.join(self.archive_name(src));
                file_util::zip_dir(src, &dest)?;
                info!("Archived {} to {}", src.display(), dest.display());
                produced.push(dest);
            } else {
                let dest = file_util::copy_into(src, dir)?;
                info!("Copied {} to {}", src.display(), dest.display());
                produced.push(dest);
            }
        }
        Ok(produced)
    }

    fn candidate_list(&self) -> String {
        self.candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Unit for FileSet {
    fn name(&self) -> &'static str {
        self.name
    }

    fn writer(&self) -> Option<&dyn Writer> {
        Some(self)
    }
}

impl Writer for FileSet {
    fn plan(&self, dir: &Path) -> String {
        let existing = self.existing();
        if existing.is_empty() {
            return format!(
                "copy nothing into {}: none of {} exist",
                dir.display(),
                self.candidate_list()
            );
        }
        let items = existing
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("copy {items} into {}", dir.display())
    }

    fn backup(&self, dir: &Path) -> Result<BackupResult> {
        let produced = self.copy_existing(dir)?;
        if produced.is_empty() {
            info!("{}: nothing to back up", self.name);
            return Ok(BackupResult::NotFound(format!(
                "none of {} exist",
                self.candidate_list()
            )));
        }
        Ok(BackupResult::FilesProduced(produced))
    }
}

/// A single database file at a fixed path.
pub struct EmbeddedDb {
    path: PathBuf,
}

impl EmbeddedDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The atuin shell history database.
    pub fn atuin(home: &Path) -> Self {
        Self::new(home.join(EMBEDDED_DB))
    }
}

impl Unit for EmbeddedDb {
    fn name(&self) -> &'static str {
        "embedded-db"
    }

    fn writer(&self) -> Option<&dyn Writer> {
        Some(self)
    }
}

impl Writer for EmbeddedDb {
    fn plan(&self, dir: &Path) -> String {
        format!("copy {} into {}", self.path.display(), dir.display())
    }

    fn backup(&self, dir: &Path) -> Result<BackupResult> {
        if !self.path.is_file() {
            info!("No database at {}", self.path.display());
            return Ok(BackupResult::NotFound(format!(
                "no database at {}",
                self.path.display()
            )));
        }
        file_util::ensure_dir(dir)?;
        let dest = file_util::copy_into(&self.path, dir)?;
        info!("Database copied to {}", dest.display());
        Ok(BackupResult::FileProduced(dest))
    }
}
