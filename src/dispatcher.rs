//! Maps an action to its units and runs them one after another.

use crate::result::{BackupResult, Outcome};
use crate::unit::{Unit, UnitContext, standard_units};
use clap::ValueEnum;
use std::path::Path;
use tracing::{error, info};

/// What the user asked to back up or inspect.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackupAction {
    /// Zip the dotfiles in the home directory.
    Dotfiles,
    /// List Homebrew packages and dump the Brewfile.
    #[value(alias = "package-bundle")]
    Brew,
    /// List SSH keys and show the SSH config.
    Ssh,
    /// Date, OS version and installed applications.
    #[value(alias = "os-info")]
    Macos,
    /// VS Code extensions and user settings.
    #[value(alias = "editor")]
    Vscode,
    /// Export the user crontab.
    #[value(alias = "scheduled-jobs")]
    Crontab,
    /// List per-user launchd agents.
    #[value(aliases = ["daemons", "launchagents"])]
    LaunchAgents,
    /// List pipx-installed tools.
    Pipx,
    /// List uv-installed tools.
    Uv,
    /// Both pipx and uv tool lists.
    PythonTools,
    /// Back up R, Julia and Jupyter configuration.
    NumericEnv,
    /// Back up git configuration.
    #[value(alias = "vcs-config")]
    Git,
    /// Back up terminal emulator configuration.
    Terminal,
    /// Back up cloud CLI configuration.
    CloudCli,
    /// Copy the shell history database.
    EmbeddedDb,
    /// Scan for .env style secrets files.
    Secrets,
    /// Everything above, in a fixed order.
    All,
}

impl BackupAction {
    /// Names of the units this action runs; `None` means every unit.
    pub fn unit_names(self) -> Option<&'static [&'static str]> {
        let names: &'static [&'static str] = match self {
            BackupAction::Dotfiles => &["dotfiles"],
            BackupAction::Brew => &["brew"],
            BackupAction::Ssh => &["ssh"],
            BackupAction::Macos => &["macos"],
            BackupAction::Vscode => &["vscode"],
            BackupAction::Crontab => &["crontab"],
            BackupAction::LaunchAgents => &["launch-agents"],
            BackupAction::Pipx => &["pipx"],
            BackupAction::Uv => &["uv"],
            BackupAction::PythonTools => &["pipx", "uv"],
            BackupAction::NumericEnv => &["numeric-env"],
            BackupAction::Git => &["git"],
            BackupAction::Terminal => &["terminal"],
            BackupAction::CloudCli => &["cloud-cli"],
            BackupAction::EmbeddedDb => &["embedded-db"],
            BackupAction::Secrets => &["secrets"],
            BackupAction::All => return None,
        };
        Some(names)
    }
}

/// Runs units and collects one [`Outcome`] per operation.
pub struct Dispatcher {
    units: Vec<Box<dyn Unit>>,
}

impl Dispatcher {
    /// The standard unit set.
    pub fn standard(ctx: UnitContext) -> Self {
        Self::with_units(standard_units(ctx))
    }

    /// An arbitrary unit set; order is the reporting order.
    pub fn with_units(units: Vec<Box<dyn Unit>>) -> Self {
        Self { units }
    }

    /// Runs the units selected by `action`.
    ///
    /// Each unit is described first; units that write then either back up into
    /// `dir` or, when `dry_run` is set, report what they would have written. An
    /// error stays with the unit that raised it.
    pub fn dispatch(&self, action: BackupAction, dir: &Path, dry_run: bool) -> Vec<Outcome> {
        let selected = action.unit_names();
        let mut outcomes = vec![];

        for unit in &self.units {
            if selected.is_some_and(|names| !names.contains(&unit.name())) {
                continue;
            }
            let name = unit.name();
            info!("Running unit {name} (dry run: {dry_run})");

            if let Some(described) = unit.describe() {
                outcomes.push(Outcome::new(name, settle(name, described)));
            }
            if let Some(writer) = unit.writer() {
                let result = if dry_run {
                    let plan = writer.plan(dir);
                    info!("Dry run, skipping {name}: {plan}");
                    BackupResult::DryRun(plan)
                } else {
                    settle(name, writer.backup(dir))
                };
                outcomes.push(Outcome::new(name, result));
            }
        }
        outcomes
    }
}

fn settle(name: &str, result: crate::error::Result<BackupResult>) -> BackupResult {
    match result {
        Ok(result) => result,
        Err(e) => {
            error!("Unit {name} failed: {e}");
            BackupResult::Failed(e.to_string())
        }
    }
}
