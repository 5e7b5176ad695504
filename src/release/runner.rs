//! Nested invocation of the release plugin's `rollback` goal.

use crate::error::BuildStepError;
use crate::project::ProjectContext;
use crate::release::{
    BuildTool, DEFAULT_RELEASE_PLUGIN_VERSION, ExecutionEnvironment, PluginCoordinate,
    ROLLBACK_GOAL, StepConfiguration,
};

/// Runs the release plugin's rollback goal
#[derive(Debug)]
pub struct ReleaseStepRunner<B> {
    tool: B,
    plugin: PluginCoordinate,
}

impl<B: BuildTool> ReleaseStepRunner<B> {
    /// Runner using the default release plugin version
    pub fn new(tool: B) -> Self {
        Self::with_plugin_version(tool, DEFAULT_RELEASE_PLUGIN_VERSION)
    }

    /// Runner pinned to a release plugin version
    pub fn with_plugin_version(tool: B, version: impl Into<String>) -> Self {
        Self {
            tool,
            plugin: PluginCoordinate::release_plugin(version),
        }
    }

    /// Build tool in use
    pub fn tool(&self) -> &B {
        &self.tool
    }

    /// Plugin whose goal is run
    pub fn plugin(&self) -> &PluginCoordinate {
        &self.plugin
    }

    /// Revert the prepared release of `project`; errors come back unchanged
    pub async fn rollback(&self, project: &ProjectContext) -> Result<(), BuildStepError> {
        let environment = ExecutionEnvironment {
            base_dir: project.base_dir.clone(),
            project_id: project.id(),
        };

        log::info!("Running {}", self.plugin.goal(ROLLBACK_GOAL));
        self.tool
            .invoke_nested_step(
                &self.plugin,
                ROLLBACK_GOAL,
                &StepConfiguration::empty(),
                &environment,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTool {
        fail: bool,
        calls: RefCell<Vec<(String, ExecutionEnvironment, StepConfiguration)>>,
    }

    impl BuildTool for RecordingTool {
        async fn invoke_nested_step(
            &self,
            plugin: &PluginCoordinate,
            goal: &str,
            configuration: &StepConfiguration,
            environment: &ExecutionEnvironment,
        ) -> Result<(), BuildStepError> {
            self.calls
                .borrow_mut()
                .push((plugin.goal(goal), environment.clone(), configuration.clone()));
            if self.fail {
                return Err(BuildStepError::Failed {
                    goal: plugin.goal(goal),
                    status: "exit status: 1".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_invokes_rollback_goal_in_base_dir() {
        let runner = ReleaseStepRunner::with_plugin_version(RecordingTool::default(), "3.0.1");
        let project = ProjectContext::new("/work/demo", "org.example", "demo");

        runner.rollback(&project).await.expect("rollback");

        let calls = runner.tool().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0,
            "org.apache.maven.plugins:maven-release-plugin:3.0.1:rollback"
        );
        assert_eq!(calls[0].1.base_dir, std::path::PathBuf::from("/work/demo"));
        assert_eq!(calls[0].1.project_id, "org.example:demo");
        assert!(calls[0].2.parameters.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_returned_unchanged() {
        let runner = ReleaseStepRunner::new(RecordingTool {
            fail: true,
            ..RecordingTool::default()
        });
        let project = ProjectContext::new("/work/demo", "org.example", "demo");

        match runner.rollback(&project).await {
            Err(BuildStepError::Failed { goal, status }) => {
                assert_eq!(goal, "org.apache.maven.plugins:maven-release-plugin:2.4:rollback");
                assert_eq!(status, "exit status: 1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
