//! External process execution.
//!
//! Arguments are always passed as separate argv entries to the program
//! itself; nothing here goes through a shell.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExecError;

/// Default limit on how long a diagnostic process may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What a process left behind.
///
/// `text` is always usable, even when `error` is set: it holds whatever the
/// process wrote before failing (possibly nothing).
#[derive(Debug, Default)]
pub struct CommandOutput {
    /// Standard output followed by standard error.
    pub text: String,
    /// Why the run was not a clean success, if it wasn't.
    pub error: Option<ExecError>,
}

impl CommandOutput {
    /// A successful run.
    #[must_use]
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    /// A failed run with its captured text.
    #[must_use]
    pub fn failed(text: impl Into<String>, error: ExecError) -> Self {
        Self {
            text: text.into(),
            error: Some(error),
        }
    }
}

/// Runs external programs.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` and collect its output.
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput;
}

/// Runs programs on the host with [`tokio::process::Command`].
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    /// A runner that kills processes after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured limit.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        debug!(program, ?args, "spawning process");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                if output.status.success() {
                    CommandOutput::ok(text)
                } else {
                    CommandOutput::failed(
                        text,
                        ExecError::ExitStatus {
                            program: program.to_owned(),
                            code: output.status.code(),
                        },
                    )
                }
            },
            Ok(Err(source)) => CommandOutput::failed(
                String::new(),
                ExecError::Spawn {
                    program: program.to_owned(),
                    source,
                },
            ),
            Err(_) => CommandOutput::failed(
                String::new(),
                ExecError::Timeout {
                    program: program.to_owned(),
                    timeout: self.timeout,
                },
            ),
        }
    }
}
