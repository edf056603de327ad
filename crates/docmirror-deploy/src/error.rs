//! Pipeline errors.

use std::path::PathBuf;

use docmirror_site::{LocateError, SiteError};

/// Errors that end a run. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Failed to prepare workspace {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clone {url} (branch {branch}): {details}")]
    CloneFailure {
        url: String,
        branch: String,
        details: String,
    },

    #[error("Command `{command}` failed: {reason}")]
    CommandFailure {
        command: String,
        status: Option<i32>,
        reason: String,
    },

    #[error(transparent)]
    NoArtifactFound(#[from] LocateError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("Publish failed: {0}")]
    PublishFailure(String),
}
