//! Project context for a rollback run.
//!
//! A build tool plugin would receive the project and session by injection.
//! Here the same facts are gathered explicitly: the base directory, the
//! project coordinates and the declared distribution repository, read from
//! the project descriptor, plus the user settings that hold credentials.

pub mod descriptor;
pub mod settings;

pub use descriptor::{DEFAULT_DESCRIPTOR, ProjectDescriptor, RollbackSection};
pub use settings::{Proxy, Server, Settings};

use std::fmt;
use std::path::{Path, PathBuf};

/// Repository the project publishes releases to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionRepository {
    /// Repository id, used to look up credentials in the settings
    pub id: String,
    /// Repository base URL
    pub url: String,
}

/// Everything the rollback steps need to know about the project
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Project root; holds `release.properties` and sits inside the git work tree
    pub base_dir: PathBuf,
    /// Group identifier
    pub group_id: String,
    /// Artifact identifier
    pub artifact_id: String,
    /// Declared distribution repository, if any
    pub distribution: Option<DistributionRepository>,
}

impl ProjectContext {
    /// Create a context without a distribution repository
    pub fn new(
        base_dir: impl Into<PathBuf>,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            distribution: None,
        }
    }

    /// Attach a distribution repository
    pub fn with_distribution(mut self, id: impl Into<String>, url: impl Into<String>) -> Self {
        self.distribution = Some(DistributionRepository {
            id: id.into(),
            url: url.into(),
        });
        self
    }

    /// Project root
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `groupId:artifactId`
    pub fn id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Coordinate of this project's artifact at the given version
    pub fn coordinate(&self, version: &str) -> ArtifactCoordinate {
        ArtifactCoordinate {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: version.to_string(),
        }
    }
}

/// Identifies exactly one deployed artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCoordinate {
    /// Group identifier
    pub group_id: String,
    /// Artifact identifier
    pub artifact_id: String,
    /// Released version
    pub version: String,
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
