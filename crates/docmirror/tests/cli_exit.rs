//! End-to-end runs of the docmirror binary against a local upstream repo.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
        .current_dir(dir)
        .args(["-c", "user.name=docmirror", "-c", "user.email=docmirror@example.com"])
        .args(args)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Upstream repo with one commit on `5.x-stable`, plus a project dir
/// holding a deploy.toml that builds with `build_command`.
fn project(build_command: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let upstream = temp.path().join("upstream");
    fs::create_dir_all(&upstream).unwrap();
    git(&upstream, &["init", "-q"]);
    git(&upstream, &["checkout", "-q", "-b", "5.x-stable"]);
    fs::write(upstream.join("README.md"), "# Docs").unwrap();
    git(&upstream, &["add", "."]);
    git(&upstream, &["commit", "-q", "-m", "initial"]);

    let project = temp.path().join("project");
    fs::create_dir_all(&project).unwrap();
    let config = format!(
        r#"[source]
url = "file://{}"
branch = "5.x-stable"

[workspace]
dir = "checkout"

[build]
install = ""
command = '{}'
"#,
        upstream.display(),
        build_command
    );
    fs::write(project.join("deploy.toml"), config).unwrap();

    temp
}

fn cli(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docmirror").expect("Failed to locate docmirror binary");
    cmd.current_dir(temp.path().join("project")).env("NO_COLOR", "1");
    cmd
}

#[test]
fn failing_build_exits_with_status_one() {
    if !git_available() {
        return;
    }
    let temp = project("exit 1");

    cli(&temp)
        .arg("build")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Failed"));

    assert!(!temp.path().join("project/checkout").exists());
    assert!(temp.path().join("project/deploy.toml").exists());
}

#[test]
fn successful_build_exports_patched_site() {
    if !git_available() {
        return;
    }
    let temp = project("mkdir -p _site && echo hi > _site/index.html");

    cli(&temp)
        .args(["build", "--output", "out"])
        .assert()
        .success();

    let out = temp.path().join("project/out");
    assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "hi\n");
    let site_config = fs::read_to_string(out.join("_config.yml")).unwrap();
    assert!(site_config.contains("node_modules"));
    assert!(!temp.path().join("project/checkout").exists());
}

#[test]
fn dot_workspace_is_refused() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("deploy.toml"), "[workspace]\ndir = \".\"\n").unwrap();

    Command::cargo_bin("docmirror")
        .expect("Failed to locate docmirror binary")
        .current_dir(&project)
        .env("NO_COLOR", "1")
        .arg("build")
        .assert()
        .failure()
        .code(1);

    assert!(project.join("deploy.toml").exists());
}
