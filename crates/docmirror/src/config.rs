//! Configuration file structure (deploy.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use docmirror_deploy::PipelineConfig;
use serde::Deserialize;

/// Every field is optional; anything left out keeps the built-in default.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    source: SourceSection,
    #[serde(default)]
    workspace: WorkspaceSection,
    #[serde(default)]
    build: BuildSection,
    #[serde(default)]
    site: SiteSection,
    #[serde(default)]
    publish: PublishSection,
}

#[derive(Debug, Deserialize, Default)]
struct SourceSection {
    url: Option<String>,
    branch: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct WorkspaceSection {
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct BuildSection {
    install: Option<String>,
    command: Option<String>,
    /// Build output directory names, highest priority first
    candidates: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct SiteSection {
    config_file: Option<String>,
    exclude: Option<Vec<String>>,
    sidecars: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct PublishSection {
    branch: Option<String>,
    message: Option<String>,
    dotfiles: Option<bool>,
    remote: Option<String>,
    user_name: Option<String>,
    user_email: Option<String>,
    url: Option<String>,
}

impl ConfigFile {
    /// Overlay the file's settings on the default pipeline configuration.
    pub fn into_pipeline_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::default();

        let Self {
            source,
            workspace,
            build,
            site,
            publish,
        } = self;

        if let Some(url) = source.url {
            config.source.url = url;
        }
        if let Some(branch) = source.branch {
            config.source.branch = branch;
        }

        if let Some(dir) = workspace.dir {
            config.workspace_dir = dir;
        }

        if let Some(install) = build.install {
            config.install_command = install;
        }
        if let Some(command) = build.command {
            config.build_command = command;
        }
        if let Some(candidates) = build.candidates {
            config.candidates = candidates;
        }

        if let Some(config_file) = site.config_file {
            config.config_file = config_file;
        }
        if let Some(exclude) = site.exclude {
            config.exclude = exclude;
        }
        if let Some(sidecars) = site.sidecars {
            config.sidecars = sidecars;
        }

        if let Some(branch) = publish.branch {
            config.publish.branch = branch;
        }
        if let Some(message) = publish.message {
            config.publish.message = message;
        }
        if let Some(dotfiles) = publish.dotfiles {
            config.publish.dotfiles = dotfiles;
        }
        config.publish.remote = publish.remote.or(config.publish.remote);
        config.publish.user_name = publish.user_name.or(config.publish.user_name);
        config.publish.user_email = publish.user_email.or(config.publish.user_email);
        config.publish.site_url = publish.url.or(config.publish.site_url);

        config
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}
