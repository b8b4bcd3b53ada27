//! Structured subprocess invocation.
//!
//! Every external command goes through the [`CommandRunner`] trait so tests
//! can substitute a scripted runner. Output is captured, never streamed; the
//! commands here are short-lived package-manager and orchestration calls.

use crate::error::ProvisionError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// A command to execute: program, arguments, optional working directory and
/// extra environment.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// One-line rendering for logs and error messages.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Captured output from a finished command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<ExecOutput, ProvisionError>;
}

/// Runs commands on the host via tokio::process.
pub struct HostRunner;

#[async_trait]
impl CommandRunner for HostRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ExecOutput, ProvisionError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let output = cmd.output().await.map_err(ProvisionError::Io)?;

        Ok(ExecOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run a command and fail on nonzero exit. The whole pipeline is fail-fast,
/// so callers propagate the error and the run aborts.
pub async fn run_checked(
    runner: &dyn CommandRunner,
    spec: &CommandSpec,
) -> Result<ExecOutput, ProvisionError> {
    tracing::debug!("[Exec] {}", spec.display());
    let output = runner.run(spec).await?;
    if !output.success() {
        let last_line = output
            .stderr
            .lines()
            .last()
            .unwrap_or("no output available")
            .to_string();
        return Err(ProvisionError::Command {
            program: spec.display(),
            exit_code: output.exit_code,
            stderr: last_line,
        });
    }
    Ok(output)
}
