//! External command execution
//!
//! Every `git` and `npm` invocation goes through [`CommandExecutor`], so the
//! pipeline can be driven by a fake in tests.

use crate::execution::redact::Redactor;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A command to run: program, arguments, working directory and the
/// complete environment it sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
    /// Shown in logs and errors in place of the full command line
    pub label: Option<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: PathBuf::from("."),
            env: HashMap::new(),
            label: None,
        }
    }

    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Shell-like rendering for logs, e.g. `git commit -m "a b"`
    pub fn command_line(&self) -> String {
        if let Some(label) = &self.label {
            return format!("{} <{}>", self.program, label);
        }
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; -1 when terminated by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// stdout followed by stderr, trimmed
    pub fn combined(&self) -> String {
        let mut out = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(stderr);
        }
        out
    }
}

/// Errors from running a command
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("`{command}` timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("`{command}` exited with code {code}\n{output}")]
    Failed {
        command: String,
        code: i32,
        output: String,
    },
}

/// Runs external commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` to completion and capture its output
    ///
    /// A non-zero exit is not an error at this level; see [`run_checked`].
    async fn execute(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// Configuration for [`SubprocessExecutor`]
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Per-command timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Executes commands as real subprocesses
#[derive(Debug, Clone, Default)]
pub struct SubprocessExecutor {
    config: ExecutorConfig,
}

impl SubprocessExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CommandExecutor for SubprocessExecutor {
    async fn execute(&self, command: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let mut child = Command::new(&command.program);
        child
            .args(&command.args)
            .current_dir(&command.cwd)
            .env_clear()
            .envs(&command.env)
            .kill_on_drop(true);

        let output = match self.config.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), child.output())
                .await
                .map_err(|_| CommandError::Timeout {
                    command: command.command_line(),
                    secs,
                })?,
            None => child.output().await,
        }
        .map_err(|e| CommandError::Spawn {
            command: command.command_line(),
            message: e.to_string(),
        })?;

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run a command, log it and its output through `redactor`, and turn a
/// non-zero exit into [`CommandError::Failed`]
///
/// Error messages carry the redacted command line and output.
pub async fn run_checked(
    executor: &dyn CommandExecutor,
    command: &CommandSpec,
    redactor: &Redactor,
) -> Result<CommandOutput, CommandError> {
    let line = redactor.redact(&command.command_line());
    info!("$ {}", line);
    debug!("cwd: {}", command.cwd.display());

    let output = executor.execute(command).await.map_err(|e| redactor.redact_error(e))?;

    let combined = redactor.redact(&output.combined());
    if !combined.is_empty() {
        info!("{}", combined);
    }

    if !output.success() {
        warn!("`{}` exited with code {}", line, output.code);
        return Err(CommandError::Failed {
            command: line,
            code: output.code,
            output: combined,
        });
    }
    Ok(output)
}
