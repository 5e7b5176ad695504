//! Sequencing of the three rollback steps.
//!
//! Order is fixed: tag removal, artifact removal, release rollback. Tag
//! removal and the release rollback define the state of the project, so their
//! failures end the run. Artifact removal is cleanup and only ever warns.
//! Nothing is retried and finished steps are never undone.

use crate::error::{MetadataError, Result};
use crate::git::{TagRemover, VcsClient};
use crate::metadata::{ReleaseMetadata, SCM_TAG_KEY, released_version_key};
use crate::project::ProjectContext;
use crate::release::{BuildTool, ROLLBACK_GOAL, ReleaseStepRunner};
use crate::repository::{ArtifactDeleter, ArtifactDeletion, ArtifactStore};
use crate::rollback::{RollbackPlan, RollbackReport, RollbackStep, StepOutcome};
use crate::state::{RollbackState, StateManager, StepStatus};

/// Runs a [`RollbackPlan`] against one project
#[derive(Debug)]
pub struct RollbackOrchestrator<C, S, B> {
    tag_remover: TagRemover<C>,
    artifact_deleter: ArtifactDeleter<S>,
    release_runner: ReleaseStepRunner<B>,
    journal: Option<StateManager>,
    resume: bool,
}

/// Tag and version the steps act on
#[derive(Debug, Default)]
struct ReleaseFacts {
    tag: Option<String>,
    version: Option<String>,
}

impl<C, S, B> RollbackOrchestrator<C, S, B>
where
    C: VcsClient,
    S: ArtifactStore,
    B: BuildTool,
{
    /// Create an orchestrator without a journal
    pub fn new(
        tag_remover: TagRemover<C>,
        artifact_deleter: ArtifactDeleter<S>,
        release_runner: ReleaseStepRunner<B>,
    ) -> Self {
        Self {
            tag_remover,
            artifact_deleter,
            release_runner,
            journal: None,
            resume: false,
        }
    }

    /// Record progress in a journal; with `resume`, skip steps it shows completed
    pub fn with_journal(mut self, journal: StateManager, resume: bool) -> Self {
        self.journal = Some(journal);
        self.resume = resume;
        self
    }

    /// Tag remover in use
    pub fn tag_remover(&self) -> &TagRemover<C> {
        &self.tag_remover
    }

    /// Artifact deleter in use
    pub fn artifact_deleter(&self) -> &ArtifactDeleter<S> {
        &self.artifact_deleter
    }

    /// Release step runner in use
    pub fn release_runner(&self) -> &ReleaseStepRunner<B> {
        &self.release_runner
    }

    /// Execute `plan` for `project`.
    ///
    /// Returns the per-step outcomes, or the first fatal error. The journal is
    /// removed when the run succeeds.
    pub async fn run(&self, plan: &RollbackPlan, project: &ProjectContext) -> Result<RollbackReport> {
        if plan.all_disabled() {
            log::info!("All rollback steps are disabled; nothing to do");
            return Ok(RollbackReport::all_disabled());
        }

        let previous = self.load_previous().await;
        let facts = self.release_facts(plan, project, previous.as_ref())?;
        let mut state = match previous {
            Some(state) if facts.tag.as_deref().is_none_or(|tag| state.belongs_to(tag)) => {
                log::info!("Resuming: {}", state.summary());
                state
            }
            Some(state) => {
                log::warn!(
                    "Ignoring journal for tag '{}'; this rollback is for '{}'",
                    state.tag.as_deref().unwrap_or_default(),
                    facts.tag.as_deref().unwrap_or_default()
                );
                RollbackState::new(None, None)
            }
            None => RollbackState::new(None, None),
        };
        if state.tag.is_none() {
            state.tag = facts.tag.clone();
        }
        if state.version.is_none() {
            state.version = facts.version.clone();
        }

        let mut report = RollbackReport::default();

        let outcome = self.delete_tag(plan, project, &facts, &mut state).await?;
        report.push(RollbackStep::DeleteTag, outcome);

        let outcome = self.delete_artifact(plan, project, &facts, &mut state).await;
        report.push(RollbackStep::DeleteArtifact, outcome);

        let outcome = self.release_rollback(plan, project, &mut state).await?;
        report.push(RollbackStep::ReleaseRollback, outcome);

        if let Some(journal) = &self.journal
            && let Err(e) = journal.cleanup_state()
        {
            log::warn!("Failed to remove rollback journal: {}", e);
        }

        Ok(report)
    }

    async fn load_previous(&self) -> Option<RollbackState> {
        let journal = self.journal.as_ref().filter(|_| self.resume)?;
        if !journal.state_exists() {
            log::info!("No rollback journal at {}; starting fresh", journal.path().display());
            return None;
        }

        match journal.load_state().await {
            Ok(loaded) => {
                for warning in &loaded.warnings {
                    log::warn!("{}", warning);
                }
                Some(loaded.state)
            }
            Err(e) => {
                log::warn!("Ignoring unusable rollback journal: {}", e);
                None
            }
        }
    }

    /// Read tag and version from `release.properties` when a step needs them.
    ///
    /// A resumed run falls back to the journal once the release plugin has
    /// already removed the file.
    fn release_facts(
        &self,
        plan: &RollbackPlan,
        project: &ProjectContext,
        previous: Option<&RollbackState>,
    ) -> Result<ReleaseFacts> {
        if !plan.needs_metadata() {
            return Ok(ReleaseFacts::default());
        }

        match ReleaseMetadata::load(project.base_dir()) {
            Ok(metadata) => {
                log::debug!("Loaded release metadata from {}", metadata.path().display());
                let tag = match metadata.scm_tag() {
                    Ok(tag) => Some(tag.to_string()),
                    Err(e) if plan.delete_tag => return Err(e.into()),
                    Err(_) => None,
                };
                let version = metadata
                    .released_version(&project.group_id, &project.artifact_id)
                    .map(str::to_string);
                Ok(ReleaseFacts { tag, version })
            }
            Err(MetadataError::NotFound { path })
                if previous.is_some_and(|state| state.tag.is_some() || state.version.is_some()) =>
            {
                log::info!(
                    "{} is gone; using tag and version recorded in the journal",
                    path.display()
                );
                let (tag, version) = previous
                    .map(|state| (state.tag.clone(), state.version.clone()))
                    .unwrap_or_default();
                Ok(ReleaseFacts { tag, version })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn already_completed(&self, state: &RollbackState, step: RollbackStep) -> bool {
        if self.resume && state.is_completed(step) {
            log::info!("Skipping {}: already completed", step);
            return true;
        }
        false
    }

    async fn delete_tag(
        &self,
        plan: &RollbackPlan,
        project: &ProjectContext,
        facts: &ReleaseFacts,
        state: &mut RollbackState,
    ) -> Result<StepOutcome> {
        let step = RollbackStep::DeleteTag;
        if !plan.is_enabled(step) {
            return Ok(StepOutcome::Disabled);
        }
        if self.already_completed(state, step) {
            return Ok(StepOutcome::AlreadyCompleted);
        }

        let Some(tag) = facts.tag.as_deref() else {
            let err = MetadataError::MissingKey {
                key: SCM_TAG_KEY.to_string(),
            };
            self.checkpoint(state, step, StepStatus::Failed, Some(err.to_string()))
                .await;
            return Err(err.into());
        };

        log::info!("Deleting release tag '{}'", tag);
        match self.tag_remover.remove(project.base_dir(), tag).await {
            Ok(deleted) => {
                let detail = if deleted.is_empty() {
                    format!("tag '{}' was not present", tag)
                } else {
                    format!("deleted {}", deleted.join(", "))
                };
                self.checkpoint(state, step, StepStatus::Completed, Some(detail.clone()))
                    .await;
                Ok(StepOutcome::Completed { detail })
            }
            Err(e) => {
                self.checkpoint(state, step, StepStatus::Failed, Some(e.to_string()))
                    .await;
                Err(e.into())
            }
        }
    }

    async fn delete_artifact(
        &self,
        plan: &RollbackPlan,
        project: &ProjectContext,
        facts: &ReleaseFacts,
        state: &mut RollbackState,
    ) -> StepOutcome {
        let step = RollbackStep::DeleteArtifact;
        if !plan.is_enabled(step) {
            return StepOutcome::Disabled;
        }
        if self.already_completed(state, step) {
            return StepOutcome::AlreadyCompleted;
        }

        let Some(version) = facts.version.as_deref() else {
            let message = format!(
                "Release properties do not contain '{}'; the released artifact will not be deleted",
                released_version_key(&project.group_id, &project.artifact_id)
            );
            log::warn!("{}", message);
            self.checkpoint(state, step, StepStatus::Warned, Some(message.clone()))
                .await;
            return StepOutcome::Warned { message };
        };

        let deletion = self.artifact_deleter.delete_released(project, version).await;
        let message = deletion.describe();
        match deletion {
            ArtifactDeletion::Deleted { .. } => {
                log::info!("{}", message);
                self.checkpoint(state, step, StepStatus::Completed, Some(message.clone()))
                    .await;
                StepOutcome::Completed { detail: message }
            }
            _ => {
                log::warn!("{}", message);
                self.checkpoint(state, step, StepStatus::Warned, Some(message.clone()))
                    .await;
                StepOutcome::Warned { message }
            }
        }
    }

    async fn release_rollback(
        &self,
        plan: &RollbackPlan,
        project: &ProjectContext,
        state: &mut RollbackState,
    ) -> Result<StepOutcome> {
        let step = RollbackStep::ReleaseRollback;
        if !plan.is_enabled(step) {
            return Ok(StepOutcome::Disabled);
        }
        if self.already_completed(state, step) {
            return Ok(StepOutcome::AlreadyCompleted);
        }

        match self.release_runner.rollback(project).await {
            Ok(()) => {
                let detail = format!("ran {}", self.release_runner.plugin().goal(ROLLBACK_GOAL));
                self.checkpoint(state, step, StepStatus::Completed, Some(detail.clone()))
                    .await;
                Ok(StepOutcome::Completed { detail })
            }
            Err(e) => {
                self.checkpoint(state, step, StepStatus::Failed, Some(e.to_string()))
                    .await;
                Err(e.into())
            }
        }
    }

    /// Record a step transition; a journal that cannot be written only warns
    async fn checkpoint(
        &self,
        state: &mut RollbackState,
        step: RollbackStep,
        status: StepStatus,
        message: Option<String>,
    ) {
        state.record(step, status, message);

        let Some(journal) = &self.journal else {
            return;
        };
        match journal.save_state(state).await {
            Ok(result) => log::debug!("{}", result.format_result()),
            Err(e) => log::warn!("Failed to save rollback journal: {}", e),
        }
    }
}
