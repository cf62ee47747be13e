use super::{Unit, Writer};
use crate::constants::DS_STORE;
use crate::error::{Error, Result};
use crate::file_util;
use crate::path::PathProvider;
use crate::result::BackupResult;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;

/// Zips the dotfiles sitting directly in the home directory.
pub struct Dotfiles {
    paths: Rc<dyn PathProvider>,
}

impl Dotfiles {
    pub fn new(paths: Rc<dyn PathProvider>) -> Self {
        Self { paths }
    }

    /// Regular files under home whose name starts with `.`, sorted by name.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let home = self.paths.home();
        let entries = fs::read_dir(home).map_err(|e| Error::io(home, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                name.starts_with('.') && name != DS_STORE
            })
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    /// Writes `dotfiles_backup_<timestamp>.zip` into `dir`.
    ///
    /// A second archive within the same second gets a numeric suffix instead
    /// of replacing the first one.
    pub fn archive(&self, dir: &Path) -> Result<PathBuf> {
        let files = self.list()?;
        file_util::ensure_dir(dir)?;
        let archive = file_util::unique_path(dir, &archive_stem(), "zip");
        info!(
            "Backing up dotfiles: {:?}",
            files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>()
        );
        file_util::zip_files(&files, &archive)?;
        info!("Dotfiles backup created at {}", archive.display());
        Ok(archive)
    }
}

fn archive_stem() -> String {
    format!("dotfiles_backup_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

impl Unit for Dotfiles {
    fn name(&self) -> &'static str {
        "dotfiles"
    }

    fn writer(&self) -> Option<&dyn Writer> {
        Some(self)
    }
}

impl Writer for Dotfiles {
    fn plan(&self, dir: &Path) -> String {
        let what = match self.list() {
            Ok(files) => format!("{} dotfile(s)", files.len()),
            Err(_) => "dotfiles".to_string(),
        };
        format!(
            "archive {what} from {} into {}",
            self.paths.home().display(),
            dir.join(format!("{}.zip", archive_stem())).display()
        )
    }

    fn backup(&self, dir: &Path) -> Result<BackupResult> {
        self.archive(dir).map(BackupResult::FileProduced)
    }
}
