//! Tag removal against real git repositories.
//!
//! Skipped when no `git` executable is installed.

use release_rollback::error::VcsError;
use release_rollback::{GixVcsClient, TagRemover};
use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=Release Bot", "-c", "user.email=bot@example.com"])
        .args(args)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .output()?;
    anyhow::ensure!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Work tree with tag `release-1.0` pushed to a bare `origin`
fn released_repository(root: &Path) -> anyhow::Result<(std::path::PathBuf, std::path::PathBuf)> {
    let remote = root.join("remote.git");
    let work = root.join("work");
    std::fs::create_dir_all(&remote)?;
    std::fs::create_dir_all(&work)?;

    git(&remote, &["init", "--bare", "--quiet"])?;
    git(&work, &["init", "--quiet"])?;
    git(&work, &["commit", "--allow-empty", "--quiet", "-m", "release 1.0"])?;
    git(&work, &["tag", "release-1.0"])?;
    git(&work, &["remote", "add", "origin", &remote.to_string_lossy()])?;
    git(&work, &["push", "--quiet", "origin", "refs/tags/release-1.0"])?;

    Ok((work, remote))
}

fn git_available() -> bool {
    if which::which("git").is_ok() {
        return true;
    }
    eprintln!("git is not installed; skipping");
    false
}

#[tokio::test]
async fn test_removes_tag_locally_and_on_remote() -> anyhow::Result<()> {
    if !git_available() {
        return Ok(());
    }
    let root = tempfile::tempdir()?;
    let (work, remote) = released_repository(root.path())?;
    assert_eq!(git(&remote, &["tag", "--list"])?.trim(), "release-1.0");

    let remover = TagRemover::new(GixVcsClient::new("origin"));
    let deleted = remover.remove(&work, "release-1.0").await?;

    assert_eq!(deleted, vec!["refs/tags/release-1.0".to_string()]);
    assert_eq!(git(&work, &["tag", "--list"])?.trim(), "");
    assert_eq!(git(&remote, &["tag", "--list"])?.trim(), "");
    Ok(())
}

#[tokio::test]
async fn test_discovers_repository_from_subdirectory() -> anyhow::Result<()> {
    if !git_available() {
        return Ok(());
    }
    let root = tempfile::tempdir()?;
    let (work, remote) = released_repository(root.path())?;
    let module = work.join("module");
    std::fs::create_dir_all(&module)?;

    let remover = TagRemover::new(GixVcsClient::new("origin"));
    let deleted = remover.remove(&module, "release-1.0").await?;

    assert_eq!(deleted.len(), 1);
    assert_eq!(git(&remote, &["tag", "--list"])?.trim(), "");
    Ok(())
}

#[tokio::test]
async fn test_second_removal_is_a_no_op() -> anyhow::Result<()> {
    if !git_available() {
        return Ok(());
    }
    let root = tempfile::tempdir()?;
    let (work, _remote) = released_repository(root.path())?;

    let remover = TagRemover::new(GixVcsClient::new("origin"));
    remover.remove(&work, "release-1.0").await?;
    let again = remover.remove(&work, "release-1.0").await?;

    assert!(again.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_remote_fails_the_push() -> anyhow::Result<()> {
    if !git_available() {
        return Ok(());
    }
    let root = tempfile::tempdir()?;
    let (work, _remote) = released_repository(root.path())?;

    let remover = TagRemover::new(GixVcsClient::new("no-such-remote"));
    let err = remover
        .remove(&work, "release-1.0")
        .await
        .expect_err("push to an unknown remote fails");

    assert!(matches!(err, VcsError::Operation { .. }));
    // The local deletion is not undone.
    assert_eq!(git(&work, &["tag", "--list"])?.trim(), "");
    Ok(())
}
