//! Fetching the upstream docs source.

use std::path::Path;

use async_trait::async_trait;

use crate::error::DeployError;
use crate::git::git;

/// Repository and branch to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Clone URL
    pub url: String,

    /// Branch to check out
    pub branch: String,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            url: "https://github.com/ant-design/ant-design.git".to_string(),
            branch: "5.x-stable".to_string(),
        }
    }
}

/// Populates a workspace with the docs source.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Check out `source` into `dest`. `dest` must not exist yet.
    async fn fetch(&self, source: &SourceSpec, dest: &Path) -> Result<(), DeployError>;
}

/// Shallow `git clone` of a single branch.
#[derive(Debug, Clone, Default)]
pub struct GitFetcher;

#[async_trait]
impl SourceFetcher for GitFetcher {
    async fn fetch(&self, source: &SourceSpec, dest: &Path) -> Result<(), DeployError> {
        let dest = dest.to_string_lossy();

        git(
            &[
                "clone",
                "--depth",
                "1",
                "--branch",
                &source.branch,
                &source.url,
                &dest,
            ],
            None,
        )
        .await
        .map_err(|e| DeployError::CloneFailure {
            url: source.url.clone(),
            branch: source.branch.clone(),
            details: e.details,
        })?;

        Ok(())
    }
}
