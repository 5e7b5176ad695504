//! Project descriptor (`rollback.toml`).

use crate::error::ConfigError;
use crate::project::ProjectContext;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default descriptor file name, looked up in the base directory
pub const DEFAULT_DESCRIPTOR: &str = "rollback.toml";

/// Parsed project descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDescriptor {
    /// Project coordinates
    pub project: ProjectSection,
    /// Distribution management
    #[serde(default)]
    pub distribution: Option<DistributionSection>,
    /// Rollback step configuration
    #[serde(default)]
    pub rollback: RollbackSection,
}

/// `[project]`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Group identifier
    pub group_id: String,
    /// Artifact identifier
    pub artifact_id: String,
}

/// `[distribution]`
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionSection {
    /// Release repository
    #[serde(default)]
    pub repository: Option<RepositorySection>,
}

/// `[distribution.repository]`
#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySection {
    /// Repository id
    pub id: String,
    /// Repository base URL
    pub url: String,
}

/// `[rollback]`; every key is optional and overridden by the command line
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RollbackSection {
    /// Delete the release tag
    pub delete_tag: Option<bool>,
    /// Delete the deployed artifact
    pub delete_artifact: Option<bool>,
    /// Run the release plugin's rollback goal
    pub perform_rollback: Option<bool>,
    /// Release plugin version
    pub release_plugin_version: Option<String>,
    /// Remote receiving tag deletions
    pub remote: Option<String>,
    /// Maven executable
    pub maven: Option<PathBuf>,
}

impl ProjectDescriptor {
    /// Read and parse a descriptor file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        })?;
        Self::parse(&text, path)
    }

    /// Parse descriptor text; `path` is only used in error messages
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let descriptor: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.project.group_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "project.group_id must not be empty".to_string(),
            });
        }
        if self.project.artifact_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "project.artifact_id must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Build the project context rooted at `base_dir`
    pub fn context(&self, base_dir: &Path) -> ProjectContext {
        let context = ProjectContext::new(
            base_dir,
            self.project.group_id.clone(),
            self.project.artifact_id.clone(),
        );
        match self
            .distribution
            .as_ref()
            .and_then(|d| d.repository.as_ref())
        {
            Some(repository) => context.with_distribution(&repository.id, &repository.url),
            None => context,
        }
    }
}
