//! VcsClient implementation over gix and the git executable.
//!
//! gix handles repository discovery and local ref deletion. It has no push
//! support, so remote deletions go through `git push`, which also picks up
//! the user's configured transports and credential helpers.

use crate::error::VcsError;
use crate::git::operations::{VcsClient, tag_ref_name};
use std::path::{Path, PathBuf};

/// Default remote receiving tag deletions
pub const DEFAULT_REMOTE: &str = "origin";

/// Repository opened by [`GixVcsClient`]
#[derive(Debug, Clone)]
pub struct GixRepository {
    repo: gix::ThreadSafeRepository,
    command_dir: PathBuf,
}

impl GixRepository {
    /// Directory git commands run in (work tree, or git dir for bare repositories)
    pub fn command_dir(&self) -> &Path {
        &self.command_dir
    }
}

/// Git operations using gix and system git
#[derive(Debug, Clone)]
pub struct GixVcsClient {
    remote: String,
}

impl Default for GixVcsClient {
    fn default() -> Self {
        Self::new(DEFAULT_REMOTE)
    }
}

impl GixVcsClient {
    /// Client pushing to `remote`
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
        }
    }

    /// Remote receiving deletions
    pub fn remote(&self) -> &str {
        &self.remote
    }

    fn git_program(&self) -> Result<PathBuf, VcsError> {
        which::which("git").map_err(|e| VcsError::Operation {
            operation: "locate git executable".to_string(),
            reason: e.to_string(),
        })
    }
}

impl VcsClient for GixVcsClient {
    type Repository = GixRepository;

    async fn open_repository(&self, path: &Path) -> Result<GixRepository, VcsError> {
        let start = path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let repo = gix::ThreadSafeRepository::discover_with_environment_overrides(&start)
                .map_err(|e| VcsError::Access {
                    path: start.clone(),
                    reason: e.to_string(),
                })?;

            let local = repo.to_thread_local();
            let command_dir = local
                .workdir()
                .unwrap_or_else(|| local.git_dir())
                .to_path_buf();
            log::debug!("Opened git repository at {}", local.git_dir().display());

            Ok(GixRepository { repo, command_dir })
        })
        .await
        .map_err(|e| VcsError::Access {
            path: path.to_path_buf(),
            reason: format!("Task join error: {}", e),
        })?
    }

    async fn delete_tags(&self, repo: &GixRepository, tags: &[String]) -> Result<Vec<String>, VcsError> {
        let shared = repo.repo.clone();
        let names: Vec<String> = tags.iter().map(|tag| tag_ref_name(tag)).collect();

        tokio::task::spawn_blocking(move || {
            let local = shared.to_thread_local();
            let mut deleted = Vec::new();

            for name in names {
                let reference = local
                    .try_find_reference(name.as_str())
                    .map_err(|e| VcsError::Operation {
                        operation: format!("find {}", name),
                        reason: e.to_string(),
                    })?;

                let Some(reference) = reference else {
                    log::info!("{} does not exist locally, nothing to delete", name);
                    continue;
                };

                reference.delete().map_err(|e| VcsError::Operation {
                    operation: format!("delete {}", name),
                    reason: e.to_string(),
                })?;
                log::info!("Deleted local {}", name);
                deleted.push(name);
            }

            Ok(deleted)
        })
        .await
        .map_err(|e| VcsError::Operation {
            operation: "delete tags".to_string(),
            reason: format!("Task join error: {}", e),
        })?
    }

    async fn push_deleted_refs(&self, repo: &GixRepository, refspecs: &[String]) -> Result<(), VcsError> {
        let program = self.git_program()?;
        let operation = format!("push {} {}", self.remote, refspecs.join(" "));

        let output = tokio::process::Command::new(&program)
            .arg("-C")
            .arg(repo.command_dir())
            .arg("push")
            .arg(&self.remote)
            .args(refspecs)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| VcsError::Operation {
                operation: operation.clone(),
                reason: format!("failed to run {}: {}", program.display(), e),
            })?;

        if !output.status.success() {
            return Err(VcsError::Operation {
                operation,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        log::debug!("git {} succeeded", operation);
        Ok(())
    }
}
