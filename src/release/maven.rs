//! Maven as the host build tool.

use crate::error::BuildStepError;
use crate::release::{BuildTool, ExecutionEnvironment, PluginCoordinate, StepConfiguration};
use std::path::PathBuf;
use std::process::Stdio;

/// Executable looked up on PATH when none is configured
pub const MAVEN_PROGRAM: &str = "mvn";

/// Runs plugin goals with the `mvn` executable
#[derive(Debug, Clone, Default)]
pub struct MavenBuildTool {
    executable: Option<PathBuf>,
}

impl MavenBuildTool {
    /// Use `mvn` from PATH
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific Maven executable
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(executable.into()),
        }
    }

    fn program(&self) -> Result<PathBuf, BuildStepError> {
        match &self.executable {
            Some(path) => Ok(path.clone()),
            None => which::which(MAVEN_PROGRAM).map_err(|_| BuildStepError::ExecutableNotFound {
                program: MAVEN_PROGRAM.to_string(),
            }),
        }
    }
}

impl BuildTool for MavenBuildTool {
    async fn invoke_nested_step(
        &self,
        plugin: &PluginCoordinate,
        goal: &str,
        configuration: &StepConfiguration,
        environment: &ExecutionEnvironment,
    ) -> Result<(), BuildStepError> {
        let program = self.program()?;
        let qualified_goal = plugin.goal(goal);

        let mut command = tokio::process::Command::new(&program);
        command
            .arg("--batch-mode")
            .args(
                configuration
                    .parameters
                    .iter()
                    .map(|(name, value)| format!("-D{}={}", name, value)),
            )
            .arg(&qualified_goal)
            .current_dir(&environment.base_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        log::debug!(
            "Running {} {} for {} in {}",
            program.display(),
            qualified_goal,
            environment.project_id,
            environment.base_dir.display()
        );

        let status = command.status().await.map_err(|source| BuildStepError::Spawn {
            program: program.display().to_string(),
            source,
        })?;

        if !status.success() {
            return Err(BuildStepError::Failed {
                goal: qualified_goal,
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
