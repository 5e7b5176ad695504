//! # Release Rollback
//!
//! Undo a published release.
//!
//! A release leaves traces in three independent systems: a tag in git, an
//! artifact in the distribution repository, and bumped versions plus a
//! release commit in the project itself. This crate reverses all three in a
//! fixed order:
//!
//! 1. delete the release tag locally and on the remote,
//! 2. delete the deployed artifact (best effort, never fails the run),
//! 3. run the release plugin's `rollback` goal.
//!
//! Progress is journaled so an interrupted rollback can be resumed.
//!
//! ## Usage
//!
//! ```bash
//! release_rollback                          # all steps, current directory
//! release_rollback --delete-artifact false  # keep the deployed artifact
//! release_rollback --resume                 # continue an interrupted rollback
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod error;
pub mod git;
pub mod metadata;
pub mod project;
pub mod release;
pub mod repository;
pub mod rollback;
pub mod state;

pub use cli::Args;
pub use error::{Result, RollbackError};
pub use git::{GixVcsClient, TagRemover, VcsClient};
pub use metadata::ReleaseMetadata;
pub use project::ProjectContext;
pub use release::{BuildTool, MavenBuildTool, ReleaseStepRunner};
pub use repository::{ArtifactDeleter, ArtifactStore, HttpArtifactStore, RepositoryResolver};
pub use rollback::{RollbackOrchestrator, RollbackPlan, RollbackReport, RollbackStep, StepOutcome};
pub use state::{RollbackState, StateManager};

use std::path::PathBuf;

/// Configuration for a rollback run
#[derive(Debug, Clone)]
pub struct RollbackConfig {
    /// Which steps run
    pub plan: RollbackPlan,
    /// Release plugin version providing the rollback goal
    pub release_plugin_version: String,
    /// Remote receiving the tag deletion
    pub remote: String,
    /// Maven executable; `mvn` from PATH when unset
    pub maven: Option<PathBuf>,
    /// Record progress in the journal
    pub journal: bool,
    /// Skip steps the journal shows completed
    pub resume: bool,
}

impl Default for RollbackConfig {
    fn default() -> Self {
        Self {
            plan: RollbackPlan::default(),
            release_plugin_version: release::DEFAULT_RELEASE_PLUGIN_VERSION.to_string(),
            remote: git::DEFAULT_REMOTE.to_string(),
            maven: None,
            journal: true,
            resume: false,
        }
    }
}
