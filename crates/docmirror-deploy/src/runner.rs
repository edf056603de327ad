//! Running the docs project's own install and build commands.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::DeployError;

/// Runs a shell command line to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `cwd`. A non-zero exit is a [`DeployError::CommandFailure`].
    async fn run(&self, command: &str, cwd: &Path) -> Result<(), DeployError>;
}

/// Runs commands through the platform shell with inherited output.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str, cwd: &Path) -> Result<(), DeployError> {
        let status = Self::shell(command)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| DeployError::CommandFailure {
                command: command.to_string(),
                status: None,
                reason: format!("could not start: {}", e),
            })?;

        if status.success() {
            return Ok(());
        }

        let reason = match status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };

        Err(DeployError::CommandFailure {
            command: command.to_string(),
            status: status.code(),
            reason,
        })
    }
}
