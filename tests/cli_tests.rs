//! End-to-end tests of the release_rollback binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const DESCRIPTOR: &str = r#"
[project]
group_id = "org.example"
artifact_id = "demo"

[distribution.repository]
id = "releases"
url = "http://127.0.0.1:9/releases"
"#;

fn project_dir() -> anyhow::Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("rollback.toml"), DESCRIPTOR)?;
    std::fs::write(dir.path().join("settings.toml"), "")?;
    Ok(dir)
}

fn rollback(dir: &Path) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("release_rollback")?;
    cmd.arg("--base-dir")
        .arg(dir)
        .arg("--settings")
        .arg(dir.join("settings.toml"));
    Ok(cmd)
}

#[test]
fn test_help_lists_step_toggles() -> anyhow::Result<()> {
    Command::cargo_bin("release_rollback")?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--delete-tag"))
        .stdout(predicate::str::contains("--delete-artifact"))
        .stdout(predicate::str::contains("--perform-rollback"));
    Ok(())
}

#[test]
fn test_all_steps_disabled_succeeds_without_release_properties() -> anyhow::Result<()> {
    let dir = project_dir()?;

    rollback(dir.path())?
        .args([
            "--delete-tag",
            "false",
            "--delete-artifact",
            "false",
            "--perform-rollback",
            "false",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("delete tag: disabled"));

    assert!(!dir.path().join(".release-rollback-state.json").exists());
    Ok(())
}

#[test]
fn test_descriptor_toggles_apply_when_flags_are_absent() -> anyhow::Result<()> {
    let dir = project_dir()?;
    let descriptor = format!(
        "{}\n[rollback]\ndelete_tag = false\ndelete_artifact = false\nperform_rollback = false\n",
        DESCRIPTOR
    );
    std::fs::write(dir.path().join("rollback.toml"), descriptor)?;

    rollback(dir.path())?.assert().success();
    Ok(())
}

#[test]
fn test_missing_release_properties_fails_with_suggestions() -> anyhow::Result<()> {
    let dir = project_dir()?;

    rollback(dir.path())?
        .assert()
        .code(1)
        .stderr(predicate::str::contains("release.properties"))
        .stderr(predicate::str::contains("Recovery suggestions"));
    Ok(())
}

#[test]
fn test_missing_descriptor_fails() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    rollback(dir.path())?
        .assert()
        .code(1)
        .stderr(predicate::str::contains("rollback.toml"));
    Ok(())
}

const MALFORMED_SETTINGS: &str = "[[servers]]\nid = \n";

#[test]
fn test_malformed_settings_do_not_abort_disabled_run() -> anyhow::Result<()> {
    let dir = project_dir()?;
    std::fs::write(dir.path().join("settings.toml"), MALFORMED_SETTINGS)?;

    rollback(dir.path())?
        .args([
            "--delete-tag",
            "false",
            "--delete-artifact",
            "false",
            "--perform-rollback",
            "false",
        ])
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_malformed_settings_skip_artifact_deletion_with_warning() -> anyhow::Result<()> {
    let dir = project_dir()?;
    std::fs::write(dir.path().join("settings.toml"), MALFORMED_SETTINGS)?;
    std::fs::write(
        dir.path().join("release.properties"),
        "scm.tag=demo-1.0\nproject.rel.org.example\\:demo=1.0\n",
    )?;

    rollback(dir.path())?
        .args(["--delete-tag", "false", "--perform-rollback", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("delete artifact"))
        .stdout(predicate::str::contains("User settings are unusable"));
    Ok(())
}

#[test]
fn test_invalid_toggle_value_is_rejected() -> anyhow::Result<()> {
    let dir = project_dir()?;

    rollback(dir.path())?
        .args(["--delete-tag", "sometimes"])
        .assert()
        .failure();
    Ok(())
}

#[cfg(unix)]
mod with_fake_maven {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_maven(dir: &Path, exit_code: i32) -> anyhow::Result<std::path::PathBuf> {
        let path = dir.join("fake-mvn");
        std::fs::write(
            &path,
            format!("#!/bin/sh\necho \"$@\" > \"$(pwd)/mvn-args.txt\"\nexit {}\n", exit_code),
        )?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    fn release_rollback_only(dir: &Path, maven: &Path) -> anyhow::Result<Command> {
        let mut cmd = rollback(dir)?;
        cmd.args(["--delete-tag", "false", "--delete-artifact", "false"])
            .arg("--maven")
            .arg(maven);
        Ok(cmd)
    }

    #[test]
    fn test_release_rollback_runs_goal_and_removes_journal() -> anyhow::Result<()> {
        let dir = project_dir()?;
        let maven = fake_maven(dir.path(), 0)?;

        release_rollback_only(dir.path(), &maven)?
            .args(["--release-plugin-version", "2.5.3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("release rollback: ran"));

        let args = std::fs::read_to_string(dir.path().join("mvn-args.txt"))?;
        assert!(args.contains("org.apache.maven.plugins:maven-release-plugin:2.5.3:rollback"));
        assert!(!dir.path().join(".release-rollback-state.json").exists());
        Ok(())
    }

    #[test]
    fn test_failed_goal_exits_non_zero_and_keeps_journal() -> anyhow::Result<()> {
        let dir = project_dir()?;
        let maven = fake_maven(dir.path(), 2)?;

        release_rollback_only(dir.path(), &maven)?
            .assert()
            .code(1)
            .stderr(predicate::str::contains("maven-release-plugin:2.4:rollback"));

        assert!(dir.path().join(".release-rollback-state.json").exists());
        Ok(())
    }
}
