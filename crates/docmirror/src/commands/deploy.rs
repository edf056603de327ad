//! Deploy command.

use anyhow::Result;
use docmirror_deploy::{Pipeline, PipelineContext, PublishOutcome, RunMode};

use crate::config::load_config;
use crate::Invocation;

/// Run the full pipeline, or the build-only variant.
pub async fn run(invocation: &Invocation, build_only: bool) -> Result<()> {
    if build_only {
        tracing::info!("Build-only mode: the site will not be published");
        return super::build::run(invocation, None).await;
    }

    tracing::info!("Deploying site...");

    let config = load_config(&invocation.config_path)?.into_pipeline_config();
    let pipeline = Pipeline::new(config);

    let report = pipeline
        .run(&PipelineContext {
            invocation_dir: invocation.dir.clone(),
            mode: RunMode::Deploy,
        })
        .await?;

    match report.published {
        Some(PublishOutcome::Pushed { remote, branch }) => {
            tracing::info!(
                "Published {} to {} ({}) in {}ms",
                report.artifact,
                branch,
                remote,
                report.duration_ms
            );
        }
        Some(PublishOutcome::NothingToPublish) | None => {
            tracing::info!("Site already up to date");
        }
    }

    if let Some(url) = &pipeline.config().publish.site_url {
        tracing::info!("Site: {}", url);
    }

    Ok(())
}
