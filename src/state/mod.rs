//! State management for rollback runs.
//!
//! The journal records which rollback steps already ran so an interrupted
//! rollback can be resumed without repeating finished work.

mod manager;
mod rollback_state;

pub use manager::{LoadStateResult, SaveStateResult, StateManager};
pub use rollback_state::{RollbackState, STATE_FORMAT_VERSION, StepRecord, StepStatus};

use std::path::{Path, PathBuf};

/// Journal file name, created in the project base directory
pub const JOURNAL_FILE: &str = ".release-rollback-state.json";

/// Journal path for a project base directory
pub fn journal_path(base_dir: &Path) -> PathBuf {
    base_dir.join(JOURNAL_FILE)
}

/// Create a state manager for the journal in the given base directory
pub fn create_state_manager(base_dir: &Path) -> StateManager {
    StateManager::new(journal_path(base_dir))
}

/// Quick check if an unfinished rollback left a journal behind
pub fn has_pending_rollback(base_dir: &Path) -> bool {
    journal_path(base_dir).exists()
}
