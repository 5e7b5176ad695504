//! Journal persistence.
//!
//! Writes go to a sibling temp file that is synced and renamed over the
//! journal, so a crash leaves either the old or the new journal on disk.

use crate::error::{Result, StateError};
use crate::state::RollbackState;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// State manager for the persisted rollback journal
#[derive(Debug)]
pub struct StateManager {
    /// Path to journal file
    state_file_path: PathBuf,
}

/// Result of a journal load
#[derive(Debug)]
pub struct LoadStateResult {
    /// Loaded journal
    pub state: RollbackState,
    /// Any warnings during loading
    pub warnings: Vec<String>,
}

/// Result of a journal save
#[derive(Debug)]
pub struct SaveStateResult {
    /// Size of the saved journal in bytes
    pub file_size_bytes: u64,
    /// Duration of the save
    pub save_duration: Duration,
}

impl StateManager {
    /// Create a state manager for the journal at `state_file_path`
    pub fn new<P: AsRef<Path>>(state_file_path: P) -> Self {
        Self {
            state_file_path: state_file_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        &self.state_file_path
    }

    /// Save the journal, bumping its save counter
    pub async fn save_state(&self, state: &mut RollbackState) -> Result<SaveStateResult> {
        let start_time = Instant::now();

        state.validate()?;
        state.save_version += 1;

        let serialized = serde_json::to_string_pretty(state).map_err(|e| StateError::SaveFailed {
            reason: format!("Failed to serialize journal: {}", e),
        })?;

        let temp_file_path = self.state_file_path.with_extension("tmp");
        {
            use tokio::io::AsyncWriteExt;

            let mut file = tokio::fs::File::create(&temp_file_path)
                .await
                .map_err(|e| StateError::SaveFailed {
                    reason: format!("Failed to create temp file: {}", e),
                })?;

            file.write_all(serialized.as_bytes())
                .await
                .map_err(|e| StateError::SaveFailed {
                    reason: format!("Failed to write journal: {}", e),
                })?;

            file.sync_all().await.map_err(|e| StateError::SaveFailed {
                reason: format!("Failed to sync file: {}", e),
            })?;
        }

        tokio::fs::rename(&temp_file_path, &self.state_file_path)
            .await
            .map_err(|e| StateError::SaveFailed {
                reason: format!("Failed to rename temp file: {}", e),
            })?;

        log::debug!(
            "Saved rollback journal {} (save #{})",
            self.state_file_path.display(),
            state.save_version
        );

        Ok(SaveStateResult {
            file_size_bytes: serialized.len() as u64,
            save_duration: start_time.elapsed(),
        })
    }

    /// Load the journal
    pub async fn load_state(&self) -> Result<LoadStateResult> {
        let content = tokio::fs::read_to_string(&self.state_file_path)
            .await
            .map_err(|e| StateError::LoadFailed {
                reason: format!(
                    "Failed to read {}: {}",
                    self.state_file_path.display(),
                    e
                ),
            })?;

        let state: RollbackState =
            serde_json::from_str(&content).map_err(|e| StateError::Corrupted {
                reason: format!("Failed to parse journal: {}", e),
            })?;

        state.validate()?;

        let mut warnings = Vec::new();
        if state.tag.is_none() {
            warnings.push("Journal does not record the release tag".to_string());
        }

        Ok(LoadStateResult { state, warnings })
    }

    /// Check if the journal exists
    pub fn state_exists(&self) -> bool {
        self.state_file_path.exists()
    }

    /// Delete the journal and any leftover temp file
    pub fn cleanup_state(&self) -> Result<()> {
        let mut errors = Vec::new();

        for path in [
            self.state_file_path.clone(),
            self.state_file_path.with_extension("tmp"),
        ] {
            if path.exists()
                && let Err(e) = std::fs::remove_file(&path)
            {
                errors.push(format!("Failed to remove {}: {}", path.display(), e));
            }
        }

        if !errors.is_empty() {
            return Err(StateError::SaveFailed {
                reason: format!("Cleanup errors: {}", errors.join("; ")),
            }
            .into());
        }

        Ok(())
    }
}

impl SaveStateResult {
    /// Format save result for display
    pub fn format_result(&self) -> String {
        format!(
            "Journal saved: {} bytes in {:.2}s",
            self.file_size_bytes,
            self.save_duration.as_secs_f64()
        )
    }
}
