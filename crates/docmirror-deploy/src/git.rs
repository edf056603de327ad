//! Thin wrapper around the `git` executable.

use std::path::Path;

use tokio::process::Command;

/// A git invocation that could not be run or exited non-zero.
#[derive(Debug, thiserror::Error)]
#[error("`git {command}` failed: {details}")]
pub struct GitError {
    pub command: String,
    pub details: String,
}

/// Run git with `args`, returning trimmed stdout on success.
pub async fn git(args: &[&str], cwd: Option<&Path>) -> Result<String, GitError> {
    let mut command = Command::new("git");
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    tracing::debug!("git {}", args.join(" "));

    let output = command.output().await.map_err(|e| GitError {
        command: args.join(" "),
        details: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError {
            command: args.join(" "),
            details: if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            },
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Whether a usable `git` executable is on PATH.
pub async fn available() -> bool {
    git(&["--version"], None).await.is_ok()
}
