use super::{Unit, Writer};
use crate::constants::BREWFILE_NAME;
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::file_util;
use crate::result::BackupResult;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;

/// Installed Homebrew packages and the bundle manifest that restores them.
pub struct Homebrew {
    executor: Rc<dyn CommandExecutor>,
}

impl Homebrew {
    pub fn new(executor: Rc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    pub fn list_formulae(&self) -> Result<String> {
        self.list("--formula")
    }

    pub fn list_casks(&self) -> Result<String> {
        self.list("--cask")
    }

    fn list(&self, kind: &str) -> Result<String> {
        let output = self.executor.run("brew", &["list", "--versions", kind])?;
        Ok(output.into_string())
    }

    /// Dumps the manifest to `<dir>/Brewfile`, replacing an older one.
    pub fn dump(&self, dir: &Path) -> Result<PathBuf> {
        file_util::ensure_dir(dir)?;
        let brewfile = dir.join(BREWFILE_NAME);
        info!("Dumping Brewfile...");
        let target = brewfile.to_string_lossy();
        self.executor
            .run("brew", &["bundle", "dump", "--file", &*target, "--force"])?;
        info!("Brewfile created at {}", brewfile.display());
        Ok(brewfile)
    }
}

impl Unit for Homebrew {
    fn name(&self) -> &'static str {
        "brew"
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        let report = || -> Result<BackupResult> {
            let formulae = self.list_formulae()?;
            let casks = self.list_casks()?;
            Ok(BackupResult::TextReport(format!(
                "Formulae:\n{}\nCasks:\n{}",
                formulae.trim_end(),
                casks.trim_end()
            )))
        };
        Some(report())
    }

    fn writer(&self) -> Option<&dyn Writer> {
        Some(self)
    }
}

impl Writer for Homebrew {
    fn plan(&self, dir: &Path) -> String {
        format!(
            "dump the Homebrew bundle to {}",
            dir.join(BREWFILE_NAME).display()
        )
    }

    fn backup(&self, dir: &Path) -> Result<BackupResult> {
        self.dump(dir).map(BackupResult::FileProduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::executor::testing::ScriptedExecutor;
    use tempfile::TempDir;

    #[test]
    fn test_describe_lists_both_categories() {
        let exec = ScriptedExecutor::new()
            .ok("brew list --versions --formula", "git 2.47.0\nripgrep 14.1.1\n")
            .ok("brew list --versions --cask", "iterm2 3.5.4\n");
        let report = Homebrew::new(Rc::new(exec)).describe().unwrap().unwrap();
        assert_eq!(
            report,
            BackupResult::TextReport(
                "Formulae:\ngit 2.47.0\nripgrep 14.1.1\nCasks:\niterm2 3.5.4".into()
            )
        );
    }

    #[test]
    fn test_describe_propagates_failure() {
        let exec = ScriptedExecutor::new()
            .ok("brew list --versions --formula", "git 2.47.0\n")
            .fail("brew list --versions --cask", "Error: no casks");
        let result = Homebrew::new(Rc::new(exec)).describe().unwrap();
        assert!(matches!(result, Err(Error::CommandFailed { .. })));
    }

    #[test]
    fn test_dump_targets_fixed_manifest() {
        let backup = TempDir::new().unwrap();
        let brewfile = backup.path().join("Brewfile");
        let line = format!("brew bundle dump --file {} --force", brewfile.display());
        let exec = Rc::new(ScriptedExecutor::new().ok(&line, ""));

        let brew = Homebrew::new(exec.clone());
        assert_eq!(brew.dump(backup.path()).unwrap(), brewfile);
        assert_eq!(brew.dump(backup.path()).unwrap(), brewfile);
        assert_eq!(exec.calls.borrow().as_slice(), &[line.clone(), line]);
    }
}
