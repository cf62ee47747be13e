//! Collector and backup units.
//!
//! A unit is one independently invokable responsibility: describe something
//! on the machine, write something into the backup directory, or both. Every
//! unit answers with a [`BackupResult`] so the dispatcher and the CLI never
//! look at unit-specific shapes.

mod dotfiles;
mod file_set;
mod homebrew;
mod inventory;
mod secrets_scan;

pub use dotfiles::Dotfiles;
pub use file_set::{EmbeddedDb, FileSet};
pub use homebrew::Homebrew;
pub use inventory::{Crontab, LaunchAgents, MacInfo, MacOs, Ssh, ToolList, VsCode};
pub use secrets_scan::SecretsScan;

use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::path::PathProvider;
use crate::result::BackupResult;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Callback receiving scan progress in `[0, 1]`.
pub type Progress = Box<dyn Fn(f64)>;

pub trait Unit {
    /// Stable identifier shown in reports.
    fn name(&self) -> &'static str;

    /// Read-only description of the machine. `None` for pure backup units.
    ///
    /// Runs during dry runs as well, so it must never write anything.
    fn describe(&self) -> Option<Result<BackupResult>> {
        None
    }

    /// The writing half of the unit, if it has one.
    fn writer(&self) -> Option<&dyn Writer> {
        None
    }
}

/// A unit that writes artifacts into the backup directory.
pub trait Writer {
    /// What [`Writer::backup`] would write into `dir`. Only asked for in dry runs.
    fn plan(&self, dir: &Path) -> String;

    /// Writes the artifacts into `dir`, creating it when needed.
    fn backup(&self, dir: &Path) -> Result<BackupResult>;
}

/// Shared capabilities handed to the standard units.
pub struct UnitContext {
    pub executor: Rc<dyn CommandExecutor>,
    pub paths: Rc<dyn PathProvider>,
    pub secrets_root: PathBuf,
    pub secret_patterns: Vec<String>,
    pub progress: Option<Progress>,
}

/// The standard units in their fixed reporting order.
pub fn standard_units(ctx: UnitContext) -> Vec<Box<dyn Unit>> {
    let UnitContext {
        executor,
        paths,
        secrets_root,
        secret_patterns,
        progress,
    } = ctx;
    let home = paths.home().to_path_buf();

    vec![
        Box::new(Dotfiles::new(paths.clone())),
        Box::new(Homebrew::new(executor.clone())),
        Box::new(Ssh::new(paths.clone())),
        Box::new(MacOs::new(executor.clone(), paths.clone())),
        Box::new(VsCode::new(executor.clone(), paths.clone())),
        Box::new(Crontab::new(executor.clone())),
        Box::new(LaunchAgents::new(paths.clone())),
        Box::new(ToolList::pipx(executor.clone())),
        Box::new(ToolList::uv(executor)),
        Box::new(FileSet::numeric_env(&home)),
        Box::new(FileSet::git(&home)),
        Box::new(FileSet::terminal(&home)),
        Box::new(FileSet::cloud_cli(&home)),
        Box::new(EmbeddedDb::atuin(&home)),
        Box::new(SecretsScan::new(secrets_root, secret_patterns, progress)),
    ]
}
