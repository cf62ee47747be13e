use super::{Progress, Unit};
use crate::error::Result;
use crate::result::BackupResult;
use crate::secrets;
use std::path::PathBuf;

/// Reports credential files found under a root directory.
pub struct SecretsScan {
    root: PathBuf,
    patterns: Vec<String>,
    progress: Option<Progress>,
}

impl SecretsScan {
    pub fn new(root: PathBuf, patterns: Vec<String>, progress: Option<Progress>) -> Self {
        Self {
            root,
            patterns,
            progress,
        }
    }
}

impl Unit for SecretsScan {
    fn name(&self) -> &'static str {
        "secrets"
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        let findings = match &self.progress {
            Some(progress) => {
                let mut report = |fraction: f64| progress(fraction);
                secrets::scan(&self.root, &self.patterns, Some(&mut report))
            }
            None => secrets::scan(&self.root, &self.patterns, None),
        };
        if findings.is_empty() {
            return Some(Ok(BackupResult::NotFound(format!(
                "no {} files under {}",
                self.patterns.join(" / "),
                self.root.display()
            ))));
        }
        Some(Ok(BackupResult::TextReport(secrets::render(&findings))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn test_describe_reports_findings_and_progress() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("svc")).unwrap();
        fs::write(root.path().join("svc/.env"), "DB_PASSWORD=x").unwrap();

        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let unit = SecretsScan::new(
            root.path().to_path_buf(),
            vec![".env".into()],
            Some(Box::new(move |p: f64| sink.borrow_mut().push(p))),
        );

        let result = unit.describe().unwrap().unwrap();
        let BackupResult::TextReport(text) = result else {
            panic!("expected a report");
        };
        assert!(text.contains(".env"));
        assert!(text.contains("13 bytes"));
        assert_eq!(*seen.borrow(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_describe_nothing_found() {
        let root = TempDir::new().unwrap();
        let unit = SecretsScan::new(root.path().to_path_buf(), vec![".env".into()], None);
        assert!(matches!(
            unit.describe().unwrap().unwrap(),
            BackupResult::NotFound(_)
        ));
    }
}
