//! Scaffold a deploy.toml.

use std::fs;

use anyhow::{Context, Result};

use crate::Invocation;

/// Run the init command.
pub fn run(invocation: &Invocation, yes: bool) -> Result<()> {
    let path = &invocation.config_path;

    if path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            path.display()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    tracing::info!("Run 'docmirror deploy' to build and publish.");

    Ok(())
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# docmirror configuration

[source]
# Repository holding the documentation site source
url = "https://github.com/ant-design/ant-design.git"
branch = "5.x-stable"

[workspace]
# Scratch checkout, removed after every run
dir = "temp-antd-build"

[build]
# Leave install empty to skip the install step
install = "ut"
command = "ut run site"
# Build output directories, first existing one wins
candidates = ["_site", "dist", "build", "public"]

[site]
# Static-site config patched inside the build output
config_file = "_config.yml"
exclude = [
    "*.txt",
    "*.md",
    "node_modules",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    ".git",
    ".gitignore",
]
# Copied from this directory into the build output when present
sidecars = ["CNAME"]

[publish]
branch = "gh-pages"
# {date} is replaced with the UTC date
message = "Deploy: {date}"
dotfiles = true
# Defaults to the origin remote of this directory
# remote = "git@github.com:me/docs.git"
# user_name = "docs-bot"
# user_email = "docs-bot@example.com"
url = "https://5x.ant.design"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn invocation(dir: &std::path::Path) -> Invocation {
        Invocation {
            dir: dir.to_path_buf(),
            config_path: dir.join("deploy.toml"),
        }
    }

    #[test]
    fn writes_default_config() {
        let temp = tempdir().unwrap();

        run(&invocation(temp.path()), false).unwrap();

        let written = fs::read_to_string(temp.path().join("deploy.toml")).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
    }

    #[test]
    fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("deploy.toml"), "[source]\n").unwrap();

        run(&invocation(temp.path()), false).unwrap();

        let kept = fs::read_to_string(temp.path().join("deploy.toml")).unwrap();
        assert_eq!(kept, "[source]\n");
    }

    #[test]
    fn overwrites_with_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("deploy.toml"), "[source]\n").unwrap();

        run(&invocation(temp.path()), true).unwrap();

        let written = fs::read_to_string(temp.path().join("deploy.toml")).unwrap();
        assert_eq!(written, DEFAULT_CONFIG);
    }
}
