//! Rollback journal tracking and serialization.

use crate::error::{Result, StateError};
use crate::rollback::RollbackStep;
use serde::{Deserialize, Serialize};

/// Current version of the journal format
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Persisted progress of one rollback run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackState {
    /// Version of the journal format
    pub format_version: u32,
    /// Save counter, incremented on every save
    pub save_version: u64,
    /// Unique ID for this rollback
    pub rollback_id: String,
    /// Release tag being removed, once known
    pub tag: Option<String>,
    /// Released version being removed, once known
    pub version: Option<String>,
    /// Timestamp when the rollback started
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Timestamp of the last recorded transition
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Latest record per step, in the order steps first reported
    pub steps: Vec<StepRecord>,
}

/// Status of a step as far as the journal knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The step finished and must not run again
    Completed,
    /// The step finished with a warning; a resumed run tries it again
    Warned,
    /// The step failed the run
    Failed,
}

/// One step transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step the record belongs to
    pub step: RollbackStep,
    /// Recorded status
    pub status: StepStatus,
    /// Detail, warning or error text
    pub message: Option<String>,
    /// When the transition happened
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl RollbackState {
    /// Start a new journal
    pub fn new(tag: Option<String>, version: Option<String>) -> Self {
        let now = chrono::Utc::now();

        Self {
            format_version: STATE_FORMAT_VERSION,
            save_version: 0,
            rollback_id: uuid::Uuid::new_v4().to_string(),
            tag,
            version,
            started_at: now,
            updated_at: now,
            steps: Vec::new(),
        }
    }

    /// Record a transition, replacing any earlier record of the same step
    pub fn record(&mut self, step: RollbackStep, status: StepStatus, message: Option<String>) {
        let timestamp = chrono::Utc::now();
        let record = StepRecord {
            step,
            status,
            message,
            timestamp,
        };

        match self.steps.iter_mut().find(|r| r.step == step) {
            Some(existing) => *existing = record,
            None => self.steps.push(record),
        }
        self.updated_at = timestamp;
    }

    /// Latest recorded status of a step
    pub fn status_of(&self, step: RollbackStep) -> Option<StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| r.status)
    }

    /// Whether a step finished for good
    pub fn is_completed(&self, step: RollbackStep) -> bool {
        self.status_of(step) == Some(StepStatus::Completed)
    }

    /// Whether this journal describes the rollback of `tag`
    ///
    /// A journal that never learned its tag matches any tag.
    pub fn belongs_to(&self, tag: &str) -> bool {
        self.tag.as_deref().is_none_or(|own| own == tag)
    }

    /// Validate journal consistency
    pub fn validate(&self) -> Result<()> {
        if self.format_version != STATE_FORMAT_VERSION {
            return Err(StateError::Corrupted {
                reason: format!(
                    "unsupported format version {} (expected {})",
                    self.format_version, STATE_FORMAT_VERSION
                ),
            }
            .into());
        }

        if self.rollback_id.trim().is_empty() {
            return Err(StateError::Corrupted {
                reason: "missing rollback id".to_string(),
            }
            .into());
        }

        if self.updated_at < self.started_at {
            return Err(StateError::Corrupted {
                reason: "last update precedes start".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// One-line summary for display
    pub fn summary(&self) -> String {
        let completed = self
            .steps
            .iter()
            .filter(|r| r.status == StepStatus::Completed)
            .count();

        format!(
            "Rollback {} of {} - {} step(s) completed, last update {}",
            self.rollback_id,
            self.tag.as_deref().unwrap_or("<unknown tag>"),
            completed,
            self.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Completed => write!(f, "completed"),
            StepStatus::Warned => write!(f, "warned"),
            StepStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_replaces_previous_status() {
        let mut state = RollbackState::new(Some("release-1.0".to_string()), None);
        state.record(RollbackStep::DeleteArtifact, StepStatus::Warned, Some("404".to_string()));
        state.record(RollbackStep::DeleteArtifact, StepStatus::Completed, None);

        assert_eq!(state.steps.len(), 1);
        assert!(state.is_completed(RollbackStep::DeleteArtifact));
        assert!(!state.is_completed(RollbackStep::DeleteTag));
        assert!(state.updated_at >= state.started_at);
    }

    #[test]
    fn test_belongs_to() {
        let state = RollbackState::new(Some("release-1.0".to_string()), None);
        assert!(state.belongs_to("release-1.0"));
        assert!(!state.belongs_to("release-2.0"));
        assert!(RollbackState::new(None, None).belongs_to("anything"));
    }

    #[test]
    fn test_validate_rejects_unknown_format() {
        let mut state = RollbackState::new(None, None);
        assert!(state.validate().is_ok());
        state.format_version = 99;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_serialized_status_is_snake_case() {
        let mut state = RollbackState::new(None, Some("1.0".to_string()));
        state.record(RollbackStep::DeleteTag, StepStatus::Completed, None);
        let json = serde_json::to_string(&state).expect("serialize");
        assert!(json.contains("\"completed\""));
        let back: RollbackState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }
}
