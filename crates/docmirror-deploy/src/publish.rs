//! Publishing the built site to a hosting branch.
//!
//! The branch is rebuilt in a scratch repository: the current tip (if any)
//! is fetched so history is kept, the index is reset onto it, and the
//! working tree is filled with nothing but the build output. Files that
//! disappeared from the build therefore show up as deletions in the commit.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use docmirror_site::{copy_dir_contents, CopyOptions};

use crate::error::DeployError;
use crate::git::git;

/// Settings for the publish step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Hosting branch
    pub branch: String,

    /// Commit message template; `{date}` becomes the UTC date
    pub message: String,

    /// Publish files whose name starts with `.`
    pub dotfiles: bool,

    /// Push target; defaults to `origin` of the invocation directory
    pub remote: Option<String>,

    /// Committer name override
    pub user_name: Option<String>,

    /// Committer email override
    pub user_email: Option<String>,

    /// Public URL of the site, for the final log line
    pub site_url: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            branch: "gh-pages".to_string(),
            message: "Deploy: {date}".to_string(),
            dotfiles: true,
            remote: None,
            user_name: None,
            user_email: None,
            site_url: Some("https://5x.ant.design".to_string()),
        }
    }
}

/// One publish operation.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Directory whose contents become the branch content
    pub source_dir: PathBuf,

    /// Empty directory the publisher may use for its own checkout
    pub scratch_dir: PathBuf,

    /// Directory docmirror was invoked from, for remote discovery
    pub invocation_dir: PathBuf,

    /// Hosting branch
    pub branch: String,

    /// Rendered commit message
    pub message: String,

    /// Publish dotfiles
    pub include_dotfiles: bool,

    /// Explicit push target
    pub remote: Option<String>,

    /// Committer name override
    pub user_name: Option<String>,

    /// Committer email override
    pub user_email: Option<String>,
}

/// What a publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new commit was pushed.
    Pushed { remote: String, branch: String },

    /// The branch already had exactly this content.
    NothingToPublish,
}

/// Replaces a hosting branch's content with a local directory.
#[async_trait]
pub trait SitePublisher: Send + Sync {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, DeployError>;
}

/// Render a commit message template for `date`.
pub fn commit_message(template: &str, date: NaiveDate) -> String {
    template.replace("{date}", &date.format("%Y-%m-%d").to_string())
}

/// Publishes with plain git commands.
#[derive(Debug, Clone, Default)]
pub struct GitPublisher;

impl GitPublisher {
    async fn resolve_remote(request: &PublishRequest) -> Result<String, DeployError> {
        if let Some(remote) = &request.remote {
            return Ok(remote.clone());
        }

        git(
            &["config", "--get", "remote.origin.url"],
            Some(&request.invocation_dir),
        )
        .await
        .map_err(|e| {
            DeployError::PublishFailure(format!(
                "no publish remote configured and none found in {}: {}",
                request.invocation_dir.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl SitePublisher for GitPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, DeployError> {
        let remote = Self::resolve_remote(request).await?;
        let dir = request.scratch_dir.as_path();
        let failed = |e: crate::git::GitError| DeployError::PublishFailure(e.to_string());

        fs::create_dir_all(dir).map_err(|e| {
            DeployError::PublishFailure(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        git(&["init", "-q"], Some(dir)).await.map_err(failed)?;

        let branch_ref = format!("refs/heads/{}", request.branch);
        let fetched = git(
            &["fetch", "-q", "--depth", "1", &remote, &request.branch],
            Some(dir),
        )
        .await;

        match fetched {
            Ok(_) => {
                git(&["symbolic-ref", "HEAD", &branch_ref], Some(dir))
                    .await
                    .map_err(failed)?;
                git(&["reset", "-q", "FETCH_HEAD"], Some(dir))
                    .await
                    .map_err(failed)?;
            }
            Err(e) => {
                tracing::info!("Branch {} not found on remote, creating it", request.branch);
                tracing::debug!("{}", e);
                git(&["symbolic-ref", "HEAD", &branch_ref], Some(dir))
                    .await
                    .map_err(failed)?;
            }
        }

        let files = copy_dir_contents(
            &request.source_dir,
            dir,
            CopyOptions {
                include_dotfiles: request.include_dotfiles,
            },
        )?;
        tracing::debug!("Staged {} files for {}", files, request.branch);

        git(&["add", "--all"], Some(dir)).await.map_err(failed)?;

        let status = git(&["status", "--porcelain"], Some(dir))
            .await
            .map_err(failed)?;
        if status.is_empty() {
            tracing::info!("Nothing to publish, {} is up to date", request.branch);
            return Ok(PublishOutcome::NothingToPublish);
        }

        let mut commit: Vec<String> = Vec::new();
        if let Some(name) = &request.user_name {
            commit.extend(["-c".to_string(), format!("user.name={}", name)]);
        }
        if let Some(email) = &request.user_email {
            commit.extend(["-c".to_string(), format!("user.email={}", email)]);
        }
        commit.extend([
            "commit".to_string(),
            "-q".to_string(),
            "-m".to_string(),
            request.message.clone(),
        ]);
        let commit: Vec<&str> = commit.iter().map(String::as_str).collect();
        git(&commit, Some(dir)).await.map_err(failed)?;

        let refspec = format!("HEAD:{}", branch_ref);
        git(&["push", "-q", &remote, &refspec], Some(dir))
            .await
            .map_err(failed)?;

        Ok(PublishOutcome::Pushed {
            remote,
            branch: request.branch.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    use crate::git;

    fn request(root: &Path, remote: &Path, scratch: &str) -> PublishRequest {
        PublishRequest {
            source_dir: root.join("_site"),
            scratch_dir: root.join(scratch),
            invocation_dir: root.to_path_buf(),
            branch: "gh-pages".to_string(),
            message: "Deploy: 2024-05-01".to_string(),
            include_dotfiles: true,
            remote: Some(remote.display().to_string()),
            user_name: Some("docmirror".to_string()),
            user_email: Some("docmirror@example.com".to_string()),
        }
    }

    #[test]
    fn renders_date_into_message() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(commit_message("Deploy: {date}", date), "Deploy: 2024-05-01");
        assert_eq!(commit_message("Update site", date), "Update site");
    }

    #[tokio::test]
    async fn pushes_then_reports_unchanged_content() {
        if !git::available().await {
            return;
        }

        let temp = tempdir().unwrap();
        let remote = temp.path().join("remote.git");
        fs::create_dir_all(&remote).unwrap();
        git::git(&["init", "-q", "--bare"], Some(&remote)).await.unwrap();

        let site = temp.path().join("_site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("index.html"), "<h1>Docs</h1>").unwrap();
        fs::write(site.join("CNAME"), "5x.ant.design").unwrap();

        let first = GitPublisher
            .publish(&request(temp.path(), &remote, "scratch-1"))
            .await
            .unwrap();
        assert_eq!(
            first,
            PublishOutcome::Pushed {
                remote: remote.display().to_string(),
                branch: "gh-pages".to_string(),
            }
        );

        let files = git::git(&["ls-tree", "--name-only", "gh-pages"], Some(&remote))
            .await
            .unwrap();
        assert!(files.lines().any(|f| f == "index.html"));
        assert!(files.lines().any(|f| f == "CNAME"));

        let second = GitPublisher
            .publish(&request(temp.path(), &remote, "scratch-2"))
            .await
            .unwrap();
        assert_eq!(second, PublishOutcome::NothingToPublish);
    }

    #[tokio::test]
    async fn removed_files_disappear_from_branch() {
        if !git::available().await {
            return;
        }

        let temp = tempdir().unwrap();
        let remote = temp.path().join("remote.git");
        fs::create_dir_all(&remote).unwrap();
        git::git(&["init", "-q", "--bare"], Some(&remote)).await.unwrap();

        let site = temp.path().join("_site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("index.html"), "v1").unwrap();
        fs::write(site.join("old.html"), "gone soon").unwrap();
        GitPublisher
            .publish(&request(temp.path(), &remote, "scratch-1"))
            .await
            .unwrap();

        fs::remove_file(site.join("old.html")).unwrap();
        fs::write(site.join("index.html"), "v2").unwrap();
        GitPublisher
            .publish(&request(temp.path(), &remote, "scratch-2"))
            .await
            .unwrap();

        let files = git::git(&["ls-tree", "--name-only", "gh-pages"], Some(&remote))
            .await
            .unwrap();
        assert_eq!(files, "index.html");

        let log = git::git(&["log", "--format=%s", "gh-pages"], Some(&remote))
            .await
            .unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[tokio::test]
    async fn fails_without_any_remote() {
        if !git::available().await {
            return;
        }

        let temp = tempdir().unwrap();
        let mut req = request(temp.path(), temp.path(), "scratch");
        req.remote = None;

        let result = GitPublisher.publish(&req).await;

        assert!(matches!(result, Err(DeployError::PublishFailure(_))));
    }
}
