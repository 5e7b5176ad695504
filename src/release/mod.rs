//! Nested release-automation step.
//!
//! Reverting version numbers and the release commit is left to the release
//! plugin's own `rollback` goal. This module names that goal and runs it
//! through a [`BuildTool`].

mod maven;
mod runner;

pub use maven::MavenBuildTool;
pub use runner::ReleaseStepRunner;

use crate::error::BuildStepError;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;

/// Group id of the release plugin
pub const RELEASE_PLUGIN_GROUP_ID: &str = "org.apache.maven.plugins";
/// Artifact id of the release plugin
pub const RELEASE_PLUGIN_ARTIFACT_ID: &str = "maven-release-plugin";
/// Release plugin version used when none is configured
pub const DEFAULT_RELEASE_PLUGIN_VERSION: &str = "2.4";
/// Goal reverting a prepared release
pub const ROLLBACK_GOAL: &str = "rollback";

/// Build plugin identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginCoordinate {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Version
    pub version: String,
}

impl PluginCoordinate {
    /// The release plugin at `version`
    pub fn release_plugin(version: impl Into<String>) -> Self {
        Self {
            group_id: RELEASE_PLUGIN_GROUP_ID.to_string(),
            artifact_id: RELEASE_PLUGIN_ARTIFACT_ID.to_string(),
            version: version.into(),
        }
    }

    /// Fully qualified `group:artifact:version:goal`
    pub fn goal(&self, goal: &str) -> String {
        format!("{}:{}", self, goal)
    }
}

impl fmt::Display for PluginCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Parameters handed to the nested goal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepConfiguration {
    /// Parameter name to value
    pub parameters: BTreeMap<String, String>,
}

impl StepConfiguration {
    /// Configuration without parameters
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Where the nested goal runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEnvironment {
    /// Working directory of the build
    pub base_dir: PathBuf,
    /// `groupId:artifactId` of the project
    pub project_id: String,
}

/// Host build tool able to run a plugin goal
pub trait BuildTool {
    /// Run `goal` of `plugin` in `environment`
    fn invoke_nested_step(
        &self,
        plugin: &PluginCoordinate,
        goal: &str,
        configuration: &StepConfiguration,
        environment: &ExecutionEnvironment,
    ) -> impl Future<Output = Result<(), BuildStepError>>;
}
