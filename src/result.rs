//! The uniform shape every unit reports in.

use std::fmt;
use std::path::PathBuf;

/// What a unit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupResult {
    /// A single artifact written to the backup directory.
    FileProduced(PathBuf),
    /// Several artifacts, in the order they were written.
    FilesProduced(Vec<PathBuf>),
    /// Read-only information gathered from the machine.
    TextReport(String),
    /// The target does not exist on this machine.
    NotFound(String),
    /// What the unit would have written had this not been a dry run.
    DryRun(String),
    /// The unit's operation failed.
    Failed(String),
}

impl BackupResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, BackupResult::Failed(_))
    }

    /// Whether the result corresponds to files on disk.
    pub fn produced_files(&self) -> bool {
        matches!(
            self,
            BackupResult::FileProduced(_) | BackupResult::FilesProduced(_)
        )
    }
}

impl fmt::Display for BackupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupResult::FileProduced(path) => write!(f, "created {}", path.display()),
            BackupResult::FilesProduced(paths) => {
                write!(f, "created {} file(s)", paths.len())?;
                for path in paths {
                    write!(f, "\n  {}", path.display())?;
                }
                Ok(())
            }
            BackupResult::TextReport(text) => f.write_str(text.trim_end()),
            BackupResult::NotFound(reason) => write!(f, "not found: {reason}"),
            BackupResult::DryRun(plan) => write!(f, "[dry run] would {plan}"),
            BackupResult::Failed(error) => write!(f, "FAILED: {error}"),
        }
    }
}

/// One line of the dispatcher's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub unit: &'static str,
    pub result: BackupResult,
}

impl Outcome {
    pub fn new(unit: &'static str, result: BackupResult) -> Self {
        Self { unit, result }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "== {} ==\n{}", self.unit, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_files_produced() {
        let result = BackupResult::FilesProduced(vec![
            PathBuf::from("/b/.gitconfig"),
            PathBuf::from("/b/git_git.zip"),
        ]);
        assert_eq!(
            result.to_string(),
            "created 2 file(s)\n  /b/.gitconfig\n  /b/git_git.zip"
        );
    }

    #[test]
    fn test_display_outcome() {
        let outcome = Outcome::new("dotfiles", BackupResult::DryRun("archive 3 dotfiles".into()));
        assert_eq!(outcome.to_string(), "== dotfiles ==\n[dry run] would archive 3 dotfiles");
        assert!(!outcome.result.is_failed());
        assert!(!outcome.result.produced_files());
    }
}
