//! Command line argument parsing and validation.
//!
//! Every step toggle and tuning value can come from three places. The command
//! line wins over the `[rollback]` table of the project descriptor, which wins
//! over the built-in defaults.

use crate::RollbackConfig;
use crate::project::RollbackSection;
use crate::rollback::RollbackPlan;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Undo a published release
#[derive(Parser, Debug)]
#[command(
    name = "release_rollback",
    version,
    about = "Undo a published release",
    long_about = "Undo a published release: delete the release tag locally and on the remote,
delete the deployed artifact from the distribution repository, then run the
release plugin's rollback goal to restore versions and the pre-release commit.

Usage:
  release_rollback
  release_rollback --base-dir path/to/project
  release_rollback --delete-artifact false
  release_rollback --resume"
)]
pub struct Args {
    /// Project directory holding release.properties and rollback.toml
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Project descriptor [default: <base-dir>/rollback.toml]
    #[arg(long, value_name = "FILE")]
    pub descriptor: Option<PathBuf>,

    /// User settings with repository credentials and proxies
    #[arg(
        long,
        value_name = "FILE",
        env = "RELEASE_ROLLBACK_SETTINGS",
        hide_env_values = true
    )]
    pub settings: Option<PathBuf>,

    /// Delete the release tag locally and on the remote
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub delete_tag: Option<bool>,

    /// Delete the released artifact from the distribution repository
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub delete_artifact: Option<bool>,

    /// Run the release plugin's rollback goal
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub perform_rollback: Option<bool>,

    /// Release plugin version providing the rollback goal
    #[arg(long, value_name = "VERSION")]
    pub release_plugin_version: Option<String>,

    /// Remote receiving the tag deletion
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,

    /// Maven executable [default: mvn on PATH]
    #[arg(long, value_name = "PATH")]
    pub maven: Option<PathBuf>,

    /// Skip steps an interrupted run already completed
    #[arg(long, conflicts_with = "no_journal")]
    pub resume: bool,

    /// Do not record progress in a journal
    #[arg(long)]
    pub no_journal: bool,

    /// Show detail lines
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_dir.is_dir() {
            return Err(format!(
                "Base directory '{}' does not exist",
                self.base_dir.display()
            ));
        }

        if self
            .release_plugin_version
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            return Err("--release-plugin-version must not be empty".to_string());
        }

        if self.remote.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err("--remote must not be empty".to_string());
        }

        Ok(())
    }

    /// Descriptor path, defaulting to `rollback.toml` in the base directory
    pub fn descriptor_path(&self) -> PathBuf {
        self.descriptor
            .clone()
            .unwrap_or_else(|| self.base_dir.join(crate::project::DEFAULT_DESCRIPTOR))
    }

    /// Layer the command line over the descriptor's `[rollback]` table
    pub fn rollback_config(&self, section: &RollbackSection) -> RollbackConfig {
        let defaults = RollbackConfig::default();

        RollbackConfig {
            plan: RollbackPlan {
                delete_tag: self
                    .delete_tag
                    .or(section.delete_tag)
                    .unwrap_or(defaults.plan.delete_tag),
                delete_artifact: self
                    .delete_artifact
                    .or(section.delete_artifact)
                    .unwrap_or(defaults.plan.delete_artifact),
                perform_rollback: self
                    .perform_rollback
                    .or(section.perform_rollback)
                    .unwrap_or(defaults.plan.perform_rollback),
            },
            release_plugin_version: self
                .release_plugin_version
                .clone()
                .or_else(|| section.release_plugin_version.clone())
                .unwrap_or(defaults.release_plugin_version),
            remote: self
                .remote
                .clone()
                .or_else(|| section.remote.clone())
                .unwrap_or(defaults.remote),
            maven: self.maven.clone().or_else(|| section.maven.clone()),
            journal: !self.no_journal,
            resume: self.resume,
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print a detail line when verbose
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print an error follow-up line (always shown)
    pub fn hint_println(&self, message: &str) {
        self.output.hint(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}
