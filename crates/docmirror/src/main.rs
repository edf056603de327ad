//! docmirror CLI - clone, build and publish a documentation site.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "docmirror")]
#[command(about = "Clone, build and publish a documentation site to a hosting branch")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to deploy.toml, relative to the invocation directory
    #[arg(short, long, default_value = "deploy.toml", global = true)]
    config: PathBuf,

    /// Directory to run from (holds deploy.toml, CNAME and the workspace)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default deploy.toml
    Init {
        /// Overwrite an existing deploy.toml
        #[arg(short, long)]
        yes: bool,
    },

    /// Clone, build and publish the site
    Deploy {
        /// Build only, do not publish
        #[arg(long)]
        build_only: bool,
    },

    /// Clone and build the site without publishing
    Build {
        /// Copy the build output here before the workspace is removed
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Directory and config file a command runs against.
pub struct Invocation {
    pub dir: PathBuf,
    pub config_path: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let dir = match cli.dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    let invocation = Invocation {
        config_path: dir.join(&cli.config),
        dir,
    };

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&invocation, yes)?;
        }
        Commands::Deploy { build_only } => {
            commands::deploy::run(&invocation, build_only).await?;
        }
        Commands::Build { output } => {
            let output = output.map(|o| invocation.dir.join(o));
            commands::build::run(&invocation, output).await?;
        }
    }

    Ok(())
}
