use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lmbackup::application::Application;
use lmbackup::constants::LOG_FILE_NAME;
use lmbackup::dispatcher::{BackupAction, Dispatcher};
use lmbackup::executor::SystemExecutor;
use lmbackup::path::{PathProvider, UserPaths, expand_path};
use lmbackup::unit::{Progress, UnitContext};
use lmbackup::{logger, sysexits};
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;
use tracing::info;

/// Inventory and back up the configuration of this machine.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What to inspect or back up.
    #[arg(value_enum, default_value_t = BackupAction::All)]
    action: BackupAction,
    /// Directory that receives the backup artifacts.
    #[arg(short, long)]
    backup_dir: Option<PathBuf>,
    /// Report what would be written without writing anything.
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Root directory of the secrets scan.
    #[arg(long)]
    secrets_root: Option<PathBuf>,
}

/// Entry point for the lmb CLI application.
/// Resolves paths and configuration, then dispatches the requested action.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = UserPaths::detect().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(sysexits::EX_UNAVAILABLE);
    });
    let home = paths.home().to_path_buf();

    let app = Application::load().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(sysexits::EX_CONFIG);
    });

    let _guard = logger::init(&app.log_dir(&home), LOG_FILE_NAME, &app.log.level)
        .unwrap_or_else(|e| {
            eprintln!("{e:#}");
            process::exit(sysexits::EX_CANTCREAT);
        });

    let backup_dir = match cli.backup_dir {
        Some(dir) => absolutize(dir, &home),
        None => app.backup_dir(&home),
    };
    let secrets_root = match cli.secrets_root {
        Some(dir) => absolutize(dir, &home),
        None => app.secrets_root(&home),
    };
    info!(
        "Action {:?} into {} (dry run: {})",
        cli.action,
        backup_dir.display(),
        cli.dry_run
    );

    let ctx = UnitContext {
        executor: Rc::new(SystemExecutor),
        paths: Rc::new(paths),
        secrets_root,
        secret_patterns: app.secrets.patterns.clone(),
        progress: cli
            .action
            .unit_names()
            .is_none_or(|names| names.contains(&"secrets"))
            .then(scan_progress),
    };
    let dispatcher = Dispatcher::standard(ctx);

    let outcomes = dispatcher.dispatch(cli.action, &backup_dir, cli.dry_run);
    for outcome in &outcomes {
        println!("{outcome}\n");
    }
    info!(
        "Finished: {} outcome(s), {} with artifacts, {} failed",
        outcomes.len(),
        outcomes.iter().filter(|o| o.result.produced_files()).count(),
        outcomes.iter().filter(|o| o.result.is_failed()).count()
    );
    Ok(())
}

/// Command-line paths are relative to the working directory, not to home.
fn absolutize(dir: PathBuf, home: &Path) -> PathBuf {
    if dir.is_absolute() || dir.starts_with("~") {
        return expand_path(&dir.to_string_lossy(), home);
    }
    env::current_dir().map(|cwd| cwd.join(&dir)).unwrap_or(dir)
}

/// Progress bar on stderr driven by the secrets scan.
fn scan_progress() -> Progress {
    const STEPS: u64 = 1000;
    let bar = ProgressBar::new(STEPS);
    if let Ok(style) = ProgressStyle::with_template("scanning for secrets {bar:40} {percent:>3}%") {
        bar.set_style(style);
    }
    Box::new(move |fraction: f64| {
        bar.set_position((fraction.clamp(0.0, 1.0) * STEPS as f64) as u64);
        if fraction >= 1.0 {
            bar.finish_and_clear();
        }
    })
}
