//! Which rollback steps run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One reversal step; declaration order is execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackStep {
    /// Delete the release tag locally and on the remote
    DeleteTag,
    /// Delete the deployed artifact from the distribution repository
    DeleteArtifact,
    /// Run the release plugin's rollback goal
    ReleaseRollback,
}

impl RollbackStep {
    /// All steps in execution order
    pub const ALL: [RollbackStep; 3] = [
        RollbackStep::DeleteTag,
        RollbackStep::DeleteArtifact,
        RollbackStep::ReleaseRollback,
    ];

    /// Short name used in output
    pub fn name(self) -> &'static str {
        match self {
            RollbackStep::DeleteTag => "delete tag",
            RollbackStep::DeleteArtifact => "delete artifact",
            RollbackStep::ReleaseRollback => "release rollback",
        }
    }
}

impl fmt::Display for RollbackStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Step toggles; every step is on unless switched off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollbackPlan {
    /// Remove the release tag
    pub delete_tag: bool,
    /// Remove the released artifact
    pub delete_artifact: bool,
    /// Run the release plugin's rollback goal
    pub perform_rollback: bool,
}

impl Default for RollbackPlan {
    fn default() -> Self {
        Self {
            delete_tag: true,
            delete_artifact: true,
            perform_rollback: true,
        }
    }
}

impl RollbackPlan {
    /// Plan with every step switched off
    pub fn disabled() -> Self {
        Self {
            delete_tag: false,
            delete_artifact: false,
            perform_rollback: false,
        }
    }

    /// Whether `step` runs
    pub fn is_enabled(&self, step: RollbackStep) -> bool {
        match step {
            RollbackStep::DeleteTag => self.delete_tag,
            RollbackStep::DeleteArtifact => self.delete_artifact,
            RollbackStep::ReleaseRollback => self.perform_rollback,
        }
    }

    /// Whether nothing runs
    pub fn all_disabled(&self) -> bool {
        !RollbackStep::ALL.iter().any(|step| self.is_enabled(*step))
    }

    /// Whether `release.properties` has to be read before the first step
    ///
    /// The release plugin reads the file on its own.
    pub fn needs_metadata(&self) -> bool {
        self.delete_tag || self.delete_artifact
    }
}
