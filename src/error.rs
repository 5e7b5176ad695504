//! Error types for release rollback operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.
//! Fatal and non-fatal failures share one taxonomy; the orchestrator decides which of them
//! abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release rollback operations
pub type Result<T> = std::result::Result<T, RollbackError>;

/// Main error type for all release rollback operations
#[derive(Error, Debug)]
pub enum RollbackError {
    /// Release metadata errors
    #[error("Release metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Version control errors
    #[error("Git error: {0}")]
    Vcs(#[from] VcsError),

    /// Distribution repository resolution errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// HTTP transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Nested build step errors
    #[error("Build step error: {0}")]
    BuildStep(#[from] BuildStepError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Journal errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading `release.properties`
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Metadata file missing
    #[error("Release properties file could not be found at {path}")]
    NotFound {
        /// Path where the file was expected
        path: PathBuf,
    },

    /// Metadata file exists but cannot be read
    #[error("Failed to read release properties file {path}: {source}")]
    Unreadable {
        /// Path of the file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A required key is absent
    #[error("Release properties do not contain required key '{key}'")]
    MissingKey {
        /// Key name
        key: String,
    },
}

/// Version control errors
#[derive(Error, Debug)]
pub enum VcsError {
    /// Repository could not be opened or read
    #[error("Failed to read git repo data at {path}: {reason}")]
    Access {
        /// Directory discovery started from
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Tag deletion or push failed
    #[error("Failed to remove tag ({operation}): {reason}")]
    Operation {
        /// Operation that failed
        operation: String,
        /// Reason for the error
        reason: String,
    },
}

/// Distribution repository resolution errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The project declares no distribution repository
    #[error("No distribution repository is declared for the project")]
    NotDeclared,

    /// The declared repository URL is unusable
    #[error("Invalid repository URL '{url}': {reason}")]
    InvalidUrl {
        /// Declared URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// The proxy from the user settings cannot be applied
    #[error("Failed to apply proxy settings: {reason}")]
    ProxyInjection {
        /// Reason for the error
        reason: String,
    },

    /// The user settings could not be loaded, so credentials and proxies are unknown
    #[error("User settings are unusable: {reason}")]
    SettingsUnusable {
        /// Reason for the error
        reason: String,
    },
}

/// HTTP transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be completed
    #[error("Request to {url} failed: {reason}")]
    Request {
        /// Request URL
        url: String,
        /// Reason for the error
        reason: String,
    },
}

/// Errors from the nested release-rollback build step
#[derive(Error, Debug)]
pub enum BuildStepError {
    /// The build tool executable is not installed
    #[error("Build tool '{program}' was not found on PATH")]
    ExecutableNotFound {
        /// Program name
        program: String,
    },

    /// The build tool could not be started
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// Program path
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The build tool ran and reported failure
    #[error("Goal '{goal}' failed with {status}")]
    Failed {
        /// Fully qualified goal
        goal: String,
        /// Exit status description
        status: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file missing
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// Expected path
        path: PathBuf,
    },

    /// Configuration file has invalid syntax or shape
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {reason}")]
    Invalid {
        /// Reason for the error
        reason: String,
    },
}

/// Journal errors
#[derive(Error, Debug)]
pub enum StateError {
    /// Journal file corrupted
    #[error("Rollback journal corrupted: {reason}")]
    Corrupted {
        /// Reason for the error
        reason: String,
    },

    /// Failed to save journal
    #[error("Failed to save rollback journal: {reason}")]
    SaveFailed {
        /// Reason for the error
        reason: String,
    },

    /// Failed to load journal
    #[error("Failed to load rollback journal: {reason}")]
    LoadFailed {
        /// Reason for the error
        reason: String,
    },
}

impl RollbackError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            RollbackError::Metadata(MetadataError::NotFound { .. }) => vec![
                "Run from the project directory the release was prepared in".to_string(),
                "If the release step already removed release.properties, retry with --resume"
                    .to_string(),
                "Disable the steps that need it: --delete-tag false --delete-artifact false"
                    .to_string(),
            ],
            RollbackError::Metadata(MetadataError::MissingKey { key }) => vec![format!(
                "Add '{}' to release.properties or disable the step that needs it",
                key
            )],
            RollbackError::Vcs(VcsError::Access { .. }) => vec![
                "Verify the base directory is inside a git repository: git rev-parse --git-dir"
                    .to_string(),
                "Check GIT_DIR and GIT_WORK_TREE if they are set".to_string(),
            ],
            RollbackError::Vcs(VcsError::Operation { .. }) => vec![
                "Verify git remote URL and credentials: git remote -v".to_string(),
                "Inspect remote tags: git ls-remote --tags".to_string(),
                "Tags already deleted on the remote are not re-created; push them again manually if needed"
                    .to_string(),
            ],
            RollbackError::BuildStep(BuildStepError::ExecutableNotFound { .. }) => vec![
                "Install Maven or pass its location with --maven".to_string(),
            ],
            RollbackError::BuildStep(BuildStepError::Failed { .. }) => vec![
                "Review the build output above".to_string(),
                "Restore the pre-release commit manually: git log, then git reset".to_string(),
            ],
            RollbackError::Config(ConfigError::NotFound { .. }) => vec![
                "Create rollback.toml in the project directory or pass --descriptor".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_suggestion_names_key() {
        let err = RollbackError::from(MetadataError::MissingKey {
            key: "scm.tag".to_string(),
        });
        assert!(err.recovery_suggestions()[0].contains("scm.tag"));
    }
}
