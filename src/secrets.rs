//! Scan a directory tree for files that usually hold credentials.

use crate::constants::VENV_DIR;
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// A sensitive file found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsFinding {
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification, ISO-8601 in local time.
    pub modified: String,
}

/// Walks `root` and reports every file whose name equals one of `patterns`.
///
/// Directories with a `.venv` component below `root` are pruned. `progress`,
/// when given, receives `i / n` after the `i`-th (0-based) of `n` directories
/// has been processed and a final `1.0`. A missing root yields no findings and
/// no progress calls.
pub fn scan(
    root: &Path,
    patterns: &[String],
    mut progress: Option<&mut dyn FnMut(f64)>,
) -> Vec<SecretsFinding> {
    let dirs = collect_dirs(root);
    if dirs.is_empty() {
        return vec![];
    }

    let patterns: HashSet<&str> = patterns.iter().map(String::as_str).collect();
    let total = dirs.len() as f64;
    let mut findings = vec![];

    for (i, dir) in dirs.iter().enumerate() {
        scan_dir(dir, &patterns, &mut findings);
        if let Some(report) = progress.as_deref_mut() {
            report(i as f64 / total);
        }
    }
    if let Some(report) = progress.as_deref_mut() {
        report(1.0);
    }

    info!(
        "Secrets scan of {} finished: {} finding(s) in {} directories",
        root.display(),
        findings.len(),
        dirs.len()
    );
    findings
}

fn collect_dirs(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !in_venv(root, entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry during secrets scan: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(DirEntry::into_path)
        .collect()
}

fn in_venv(root: &Path, entry: &DirEntry) -> bool {
    entry
        .path()
        .strip_prefix(root)
        .map(|rel| rel.components().any(|c| c.as_os_str() == VENV_DIR))
        .unwrap_or(false)
}

fn scan_dir(dir: &Path, patterns: &HashSet<&str>, findings: &mut Vec<SecretsFinding>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read {}: {e}", dir.display());
            return;
        }
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| patterns.contains(name))
        })
        .map(|entry| entry.path())
        .collect();
    matches.sort();

    for path in matches {
        match finding(&path) {
            Ok(Some(found)) => findings.push(found),
            Ok(None) => {}
            Err(e) => warn!("Cannot inspect {}: {e}", path.display()),
        }
    }
}

fn finding(path: &Path) -> std::io::Result<Option<SecretsFinding>> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Ok(None);
    }
    let modified: DateTime<Local> = meta.modified()?.into();
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Ok(Some(SecretsFinding {
        path,
        size: meta.len(),
        modified: modified.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
    }))
}

/// Render findings as one line each.
pub fn render(findings: &[SecretsFinding]) -> String {
    findings
        .iter()
        .map(|f| format!("{}\t{} bytes\t{}", f.path.display(), f.size, f.modified))
        .collect::<Vec<_>>()
        .join("\n")
}
