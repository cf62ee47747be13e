//! Read-only collectors: they describe the machine and never write.

use super::Unit;
use crate::error::{Error, Result};
use crate::executor::CommandExecutor;
use crate::path::PathProvider;
use crate::result::BackupResult;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

const NO_SSH_CONFIG: &str = "No SSH config found.";
const NO_VSCODE_SETTINGS: &str = "No VS Code user settings found.";
const NO_CRONTAB: &str = "(No user crontab found)";

/// Sorted file names in `dir` accepted by `keep`; an absent directory is empty.
fn file_names(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(Error::io(dir, e)),
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| keep(name.as_str()))
        .collect();
    names.sort();
    Ok(names)
}

/// Contents of `path`, or `placeholder` when it does not exist.
fn read_or(path: &Path, placeholder: &str) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("{} not found", path.display());
            Ok(placeholder.to_string())
        }
        Err(e) => Err(Error::io(path, e)),
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "  (none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("  {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Private key names and the client config under `~/.ssh`.
pub struct Ssh {
    paths: Rc<dyn PathProvider>,
}

impl Ssh {
    pub fn new(paths: Rc<dyn PathProvider>) -> Self {
        Self { paths }
    }

    /// Every file in the key directory that is not a `.pub` half.
    pub fn list_keys(&self) -> Result<Vec<String>> {
        let keys = file_names(&self.paths.ssh_dir(), |name| !name.ends_with(".pub"))?;
        info!("SSH keys found: {keys:?}");
        Ok(keys)
    }

    pub fn show_config(&self) -> Result<String> {
        read_or(&self.paths.ssh_config(), NO_SSH_CONFIG)
    }
}

impl Unit for Ssh {
    fn name(&self) -> &'static str {
        "ssh"
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        let ssh_dir = self.paths.ssh_dir();
        if !ssh_dir.is_dir() {
            return Some(Ok(BackupResult::NotFound(format!(
                "no SSH directory at {}",
                ssh_dir.display()
            ))));
        }
        let report = || -> Result<BackupResult> {
            let keys = self.list_keys()?;
            let config = self.show_config()?;
            Ok(BackupResult::TextReport(format!(
                "SSH Keys:\n{}\nSSH Config:\n{}",
                bullet_list(&keys),
                config.trim_end()
            )))
        };
        Some(report())
    }
}

/// Snapshot of the operating system. Fields that could not be queried hold
/// an `ERROR: ...` string instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacInfo {
    pub date: String,
    pub os_version: String,
    pub applications: Vec<String>,
}

pub struct MacOs {
    executor: Rc<dyn CommandExecutor>,
    paths: Rc<dyn PathProvider>,
}

impl MacOs {
    pub fn new(executor: Rc<dyn CommandExecutor>, paths: Rc<dyn PathProvider>) -> Self {
        Self { executor, paths }
    }

    pub fn info(&self) -> MacInfo {
        let date = self.single_line("date", &[]);
        let os_version = self.single_line("sw_vers", &["-productVersion"]);
        let applications = self.applications().unwrap_or_else(|e| vec![format!("ERROR: {e}")]);
        info!("macOS info collected");
        MacInfo {
            date,
            os_version,
            applications,
        }
    }

    fn single_line(&self, program: &str, args: &[&str]) -> String {
        match self.executor.run(program, args) {
            Ok(output) => output.trimmed().to_string(),
            Err(e) => format!("ERROR: {e}"),
        }
    }

    fn applications(&self) -> Result<Vec<String>> {
        let dir = self.paths.applications_dir();
        let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }
}

impl Unit for MacOs {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        let info = self.info();
        Some(Ok(BackupResult::TextReport(format!(
            "Date: {}\nmacOS Version: {}\nInstalled Applications:\n{}",
            info.date,
            info.os_version,
            bullet_list(&info.applications)
        ))))
    }
}

/// VS Code extensions and user settings.
pub struct VsCode {
    executor: Rc<dyn CommandExecutor>,
    paths: Rc<dyn PathProvider>,
}

impl VsCode {
    pub fn new(executor: Rc<dyn CommandExecutor>, paths: Rc<dyn PathProvider>) -> Self {
        Self { executor, paths }
    }

    /// `publisher.name@version` entries, one per installed extension.
    pub fn list_extensions(&self) -> Result<Vec<String>> {
        let output = self
            .executor
            .run("code", &["--list-extensions", "--show-versions"])?;
        let extensions: Vec<String> = output
            .trimmed()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        info!("VS Code extensions found: {extensions:?}");
        Ok(extensions)
    }

    pub fn user_settings(&self) -> Result<String> {
        read_or(&self.paths.vscode_settings(), NO_VSCODE_SETTINGS)
    }
}

impl Unit for VsCode {
    fn name(&self) -> &'static str {
        "vscode"
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        let report = || -> Result<BackupResult> {
            let extensions = self.list_extensions()?;
            let settings = self.user_settings()?;
            Ok(BackupResult::TextReport(format!(
                "VS Code Extensions:\n{}\nVS Code User Settings:\n{}",
                bullet_list(&extensions),
                settings.trim_end()
            )))
        };
        Some(report())
    }
}

/// The current user's crontab.
pub struct Crontab {
    executor: Rc<dyn CommandExecutor>,
}

impl Crontab {
    pub fn new(executor: Rc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// The schedule as text; an empty or missing crontab yields a placeholder.
    pub fn export(&self) -> Result<String> {
        let output = self.executor.run("crontab", &["-l"])?;
        if output.is_blank() {
            info!("No user crontab found (empty output).");
            return Ok(NO_CRONTAB.to_string());
        }
        info!("Exported user crontab");
        Ok(output.into_string())
    }
}

impl Unit for Crontab {
    fn name(&self) -> &'static str {
        "crontab"
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        Some(self.export().map(BackupResult::TextReport))
    }
}

/// Per-user launchd agents.
pub struct LaunchAgents {
    paths: Rc<dyn PathProvider>,
}

impl LaunchAgents {
    pub fn new(paths: Rc<dyn PathProvider>) -> Self {
        Self { paths }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        let dir = self.paths.launch_agents_dir();
        if !dir.exists() {
            info!("No LaunchAgents directory found");
            return Ok(vec![]);
        }
        let agents = file_names(&dir, |name| name.ends_with(".plist"))?;
        info!("LaunchAgents found: {agents:?}");
        Ok(agents)
    }
}

impl Unit for LaunchAgents {
    fn name(&self) -> &'static str {
        "launch-agents"
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        Some(
            self.list()
                .map(|agents| BackupResult::TextReport(bullet_list(&agents))),
        )
    }
}

/// Raw listing from a tool manager such as pipx or uv.
pub struct ToolList {
    name: &'static str,
    program: &'static str,
    args: &'static [&'static str],
    executor: Rc<dyn CommandExecutor>,
}

impl ToolList {
    pub fn pipx(executor: Rc<dyn CommandExecutor>) -> Self {
        Self {
            name: "pipx",
            program: "pipx",
            args: &["list"],
            executor,
        }
    }

    pub fn uv(executor: Rc<dyn CommandExecutor>) -> Self {
        Self {
            name: "uv",
            program: "uv",
            args: &["tool", "list"],
            executor,
        }
    }

    pub fn list(&self) -> Result<String> {
        let output = self.executor.run(self.program, self.args)?;
        info!("{} list output captured", self.name);
        Ok(output.into_string())
    }
}

impl Unit for ToolList {
    fn name(&self) -> &'static str {
        self.name
    }

    fn describe(&self) -> Option<Result<BackupResult>> {
        Some(self.list().map(BackupResult::TextReport))
    }
}
