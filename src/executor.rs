//! External program execution.
//!
//! Units never spawn processes themselves. They go through a
//! [`CommandExecutor`], which lets tests replace the real programs with a
//! scripted fake while keeping the failure handling in one place.

use crate::error::{Error, Result};
use std::process::Command;
use tracing::{error, info, warn};

/// What a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Captured standard output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    text: String,
}

impl CommandOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The output exactly as the program wrote it. Use for listings and dumps.
    pub fn raw(&self) -> &str {
        &self.text
    }

    /// The output without surrounding whitespace. Use for single-line values.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Runs external programs resolved through `PATH`.
pub trait CommandExecutor {
    /// Spawn `program` with `args` and wait for it to finish.
    fn output(&self, program: &str, args: &[&str]) -> std::io::Result<ProcessOutput>;

    /// Run a command, turning a non-zero exit into [`Error::CommandFailed`].
    ///
    /// `crontab -l` reporting that the user has no crontab is the single
    /// exception: that is an empty schedule, not a failure.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = command_line(program, args);
        info!("Running command: {line}");
        let output = self.output(program, args).map_err(|source| {
            error!("Cannot start {line}: {source}");
            Error::Spawn {
                program: program.to_string(),
                source,
            }
        })?;

        if output.success {
            info!("Command succeeded: {line}");
            return Ok(CommandOutput::new(output.stdout));
        }
        if is_missing_crontab(program, args, &output.stderr) {
            warn!("No user crontab found; treating as empty.");
            return Ok(CommandOutput::default());
        }
        error!("Command failed: {line}\n{}", output.stderr);
        Err(Error::CommandFailed {
            program: program.to_string(),
            stderr: output.stderr.trim_end().to_string(),
        })
    }
}

/// The real executor backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn output(&self, program: &str, args: &[&str]) -> std::io::Result<ProcessOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(ProcessOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn is_missing_crontab(program: &str, args: &[&str], stderr: &str) -> bool {
    program == "crontab" && args.contains(&"-l") && stderr.contains("no crontab for")
}

fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Replays canned process outputs keyed by the full command line.
    #[derive(Default)]
    pub(crate) struct ScriptedExecutor {
        replies: HashMap<String, ProcessOutput>,
        pub(crate) calls: RefCell<Vec<String>>,
    }

    impl ScriptedExecutor {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn ok(mut self, line: &str, stdout: &str) -> Self {
            self.replies.insert(
                line.to_string(),
                ProcessOutput {
                    success: true,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
            );
            self
        }

        pub(crate) fn fail(mut self, line: &str, stderr: &str) -> Self {
            self.replies.insert(
                line.to_string(),
                ProcessOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                },
            );
            self
        }
    }

    impl CommandExecutor for ScriptedExecutor {
        fn output(&self, program: &str, args: &[&str]) -> std::io::Result<ProcessOutput> {
            let line = command_line(program, args);
            self.calls.borrow_mut().push(line.clone());
            self.replies.get(&line).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, format!("{program}: not found"))
            })
        }
    }
}
