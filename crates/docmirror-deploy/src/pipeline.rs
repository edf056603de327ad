//! The clone, build and publish pipeline.

use std::path::{Path, PathBuf};
use std::time::Instant;

use docmirror_site::{
    copy_dir_contents, copy_sidecars, locate_artifact, patch_config_file, CopyOptions, PatchAction,
};

use crate::error::DeployError;
use crate::fetch::{GitFetcher, SourceFetcher, SourceSpec};
use crate::publish::{commit_message, GitPublisher, PublishConfig, PublishOutcome, PublishRequest, SitePublisher};
use crate::runner::{CommandRunner, ShellRunner};
use crate::workspace::Workspace;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upstream docs repository
    pub source: SourceSpec,

    /// Workspace directory, relative to the invocation directory
    pub workspace_dir: PathBuf,

    /// Dependency install command; skipped when empty
    pub install_command: String,

    /// Site build command
    pub build_command: String,

    /// Build output directory names, highest priority first
    pub candidates: Vec<String>,

    /// Static-site config file inside the build output
    pub config_file: String,

    /// Patterns the static-site config must exclude
    pub exclude: Vec<String>,

    /// Files copied from the invocation directory into the build output
    pub sidecars: Vec<String>,

    /// Publish settings
    pub publish: PublishConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: SourceSpec::default(),
            workspace_dir: PathBuf::from("temp-antd-build"),
            install_command: "ut".to_string(),
            build_command: "ut run site".to_string(),
            candidates: ["_site", "dist", "build", "public"]
                .into_iter()
                .map(String::from)
                .collect(),
            config_file: "_config.yml".to_string(),
            exclude: [
                "*.txt",
                "*.md",
                "node_modules",
                "package.json",
                "package-lock.json",
                "yarn.lock",
                ".git",
                ".gitignore",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            sidecars: vec!["CNAME".to_string()],
            publish: PublishConfig::default(),
        }
    }
}

/// Whether a run ends by publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Build and publish.
    Deploy,

    /// Build only, optionally copying the output to `export` before cleanup.
    BuildOnly { export: Option<PathBuf> },
}

/// Per-invocation inputs.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Directory docmirror was invoked from
    pub invocation_dir: PathBuf,

    /// Deploy or build only
    pub mode: RunMode,
}

/// Summary of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// Candidate name of the build output that was used
    pub artifact: String,

    /// One action per configured exclude pattern
    pub patch_actions: Vec<PatchAction>,

    /// Sidecar files copied into the build output
    pub sidecars: Vec<String>,

    /// Publish result, absent in build-only mode
    pub published: Option<PublishOutcome>,

    /// Where the build output was exported to, if anywhere
    pub exported: Option<PathBuf>,

    /// Total run time in milliseconds
    pub duration_ms: u64,
}

/// Clones, builds and publishes a docs site.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Box<dyn SourceFetcher>,
    runner: Box<dyn CommandRunner>,
    publisher: Box<dyn SitePublisher>,
}

impl Pipeline {
    /// Create a pipeline backed by git and the system shell.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            fetcher: Box::new(GitFetcher),
            runner: Box::new(ShellRunner),
            publisher: Box::new(GitPublisher),
        }
    }

    /// Replace the source fetcher.
    pub fn with_fetcher(mut self, fetcher: impl SourceFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Replace the command runner.
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Replace the publisher.
    pub fn with_publisher(mut self, publisher: impl SitePublisher + 'static) -> Self {
        self.publisher = Box::new(publisher);
        self
    }

    /// Configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step in order. The workspace is removed before returning,
    /// whether the run succeeded or not.
    pub async fn run(&self, ctx: &PipelineContext) -> Result<RunReport, DeployError> {
        let start = Instant::now();

        let path = ctx.invocation_dir.join(&self.config.workspace_dir);
        let workspace = Workspace::acquire_under(&ctx.invocation_dir, &self.config.workspace_dir)
            .map_err(|source| DeployError::Workspace { path, source })?;

        let result = self.run_steps(workspace.path(), ctx).await;
        drop(workspace);

        result.map(|mut report| {
            report.duration_ms = start.elapsed().as_millis() as u64;
            report
        })
    }

    async fn run_steps(&self, root: &Path, ctx: &PipelineContext) -> Result<RunReport, DeployError> {
        let config = &self.config;

        tracing::info!(
            "Cloning {} (branch {})...",
            config.source.url,
            config.source.branch
        );
        self.fetcher.fetch(&config.source, root).await?;

        if config.install_command.trim().is_empty() {
            tracing::debug!("No install command configured");
        } else {
            tracing::info!("Installing dependencies: {}", config.install_command);
            self.runner.run(&config.install_command, root).await?;
        }

        tracing::info!("Building site: {}", config.build_command);
        self.runner.run(&config.build_command, root).await?;

        let artifact_dir = locate_artifact(root, &config.candidates)?;
        let artifact = artifact_dir
            .strip_prefix(root)
            .unwrap_or(&artifact_dir)
            .display()
            .to_string();
        tracing::info!("Using build output {}", artifact);

        let patch_actions =
            patch_config_file(&artifact_dir.join(&config.config_file), &config.exclude)?;
        let added = patch_actions
            .iter()
            .filter(|a| **a != PatchAction::AlreadyPresent)
            .count();
        tracing::info!("Patched {} ({} exclusions added)", config.config_file, added);

        let sidecars = copy_sidecars(&ctx.invocation_dir, &artifact_dir, &config.sidecars)?;

        let mut report = RunReport {
            artifact,
            patch_actions,
            sidecars,
            published: None,
            exported: None,
            duration_ms: 0,
        };

        match &ctx.mode {
            RunMode::Deploy => {
                tracing::info!("Publishing to {}...", config.publish.branch);

                let request = PublishRequest {
                    source_dir: artifact_dir.clone(),
                    scratch_dir: root.join(".docmirror-publish"),
                    invocation_dir: ctx.invocation_dir.clone(),
                    branch: config.publish.branch.clone(),
                    message: commit_message(
                        &config.publish.message,
                        chrono::Utc::now().date_naive(),
                    ),
                    include_dotfiles: config.publish.dotfiles,
                    remote: config.publish.remote.clone(),
                    user_name: config.publish.user_name.clone(),
                    user_email: config.publish.user_email.clone(),
                };

                report.published = Some(self.publisher.publish(&request).await?);
            }
            RunMode::BuildOnly { export } => {
                if let Some(dest) = export {
                    let files = copy_dir_contents(&artifact_dir, dest, CopyOptions::default())?;
                    tracing::info!("Exported {} files to {}", files, dest.display());
                    report.exported = Some(dest.clone());
                }
            }
        }

        Ok(report)
    }
}
