//! Build-only command.

use std::path::PathBuf;

use anyhow::Result;
use docmirror_deploy::{Pipeline, PipelineContext, RunMode};

use crate::config::load_config;
use crate::Invocation;

/// Run the pipeline without publishing.
pub async fn run(invocation: &Invocation, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building site (no publish)...");

    let config = load_config(&invocation.config_path)?.into_pipeline_config();

    let report = Pipeline::new(config)
        .run(&PipelineContext {
            invocation_dir: invocation.dir.clone(),
            mode: RunMode::BuildOnly { export: output },
        })
        .await?;

    tracing::info!(
        "Built {} in {}ms",
        report.artifact,
        report.duration_ms
    );

    match report.exported {
        Some(dir) => tracing::info!("Output: {}", dir.display()),
        None => tracing::info!("Build output was not exported; pass --output to keep it"),
    }

    Ok(())
}
