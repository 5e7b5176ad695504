//! Rollback command implementation.
//!
//! Wires the production collaborators (gix plus git, reqwest, Maven) into the
//! orchestrator and prints the per-step report.

use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::git::{GixVcsClient, TagRemover};
use crate::project::{ProjectDescriptor, Settings};
use crate::release::{MavenBuildTool, ReleaseStepRunner};
use crate::repository::{ArtifactDeleter, HttpArtifactStore, RepositoryResolver};
use crate::rollback::{RollbackOrchestrator, RollbackReport, StepOutcome};
use crate::state::{create_state_manager, has_pending_rollback};

/// Execute the rollback
pub(super) async fn execute_rollback(args: &Args, config: &RuntimeConfig) -> Result<()> {
    let descriptor_path = args.descriptor_path();
    let descriptor = ProjectDescriptor::load(&descriptor_path)?;
    config.verbose_println(&format!("Project descriptor: {}", descriptor_path.display()));

    let rollback = args.rollback_config(&descriptor.rollback);
    let project = descriptor.context(&args.base_dir);

    // Settings only feed artifact deletion, so a broken file never stops the run.
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::load_default(),
    };
    let resolver = match settings {
        Ok(settings) => RepositoryResolver::new(settings),
        Err(e) if rollback.plan.delete_artifact => {
            log::warn!("User settings could not be loaded: {}", e);
            RepositoryResolver::with_unusable_settings(e.to_string())
        }
        Err(e) => {
            log::debug!("User settings could not be loaded: {}", e);
            RepositoryResolver::with_unusable_settings(e.to_string())
        }
    };

    let _ = config.output().section(&format!("Rolling back {}", project.id()));
    config.verbose_println(&format!(
        "Steps: delete tag={}, delete artifact={}, release rollback={}",
        rollback.plan.delete_tag, rollback.plan.delete_artifact, rollback.plan.perform_rollback
    ));

    let maven = match &rollback.maven {
        Some(path) => MavenBuildTool::with_executable(path),
        None => MavenBuildTool::new(),
    };

    let vcs = GixVcsClient::new(rollback.remote.clone());
    config.verbose_println(&format!("Tag deletions are pushed to '{}'", vcs.remote()));

    let mut orchestrator = RollbackOrchestrator::new(
        TagRemover::new(vcs),
        ArtifactDeleter::new(HttpArtifactStore::new(), resolver),
        ReleaseStepRunner::with_plugin_version(maven, rollback.release_plugin_version.clone()),
    );

    if rollback.journal {
        if !rollback.resume && has_pending_rollback(&args.base_dir) {
            config.warning_println(
                "An earlier rollback was interrupted; pass --resume to skip the steps it completed",
            );
        }
        let journal = create_state_manager(&args.base_dir);
        config.verbose_println(&format!("Journal: {}", journal.path().display()));
        orchestrator = orchestrator.with_journal(journal, rollback.resume);
    }

    let report = orchestrator.run(&rollback.plan, &project).await?;
    print_report(&report, config);

    Ok(())
}

fn print_report(report: &RollbackReport, config: &RuntimeConfig) {
    let output = config.output();

    for (step, outcome) in report.entries() {
        let _ = match outcome {
            StepOutcome::Disabled => output.skipped(&format!("{}: disabled", step)),
            StepOutcome::AlreadyCompleted => {
                output.info(&format!("{}: already completed in an earlier run", step))
            }
            StepOutcome::Completed { detail } => output.success(&format!("{}: {}", step, detail)),
            StepOutcome::Warned { message } => output.warn(&format!("{}: {}", step, message)),
        };
    }

    if report.has_warnings() {
        config.warning_println("Rollback finished with warnings");
    }
}
