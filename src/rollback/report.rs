//! Outcome of a rollback run.

use crate::rollback::RollbackStep;

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Switched off by configuration
    Disabled,
    /// Ran to completion
    Completed {
        /// What was done
        detail: String,
    },
    /// Ran, could not do its work, and did not stop the run
    Warned {
        /// Warning text
        message: String,
    },
    /// Skipped because a resumed journal shows it already completed
    AlreadyCompleted,
}

/// Ordered step outcomes of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    entries: Vec<(RollbackStep, StepOutcome)>,
}

impl RollbackReport {
    /// Report with every step disabled
    pub fn all_disabled() -> Self {
        Self {
            entries: RollbackStep::ALL
                .iter()
                .map(|step| (*step, StepOutcome::Disabled))
                .collect(),
        }
    }

    /// Append the outcome of the next step
    pub fn push(&mut self, step: RollbackStep, outcome: StepOutcome) {
        self.entries.push((step, outcome));
    }

    /// Outcomes in execution order
    pub fn entries(&self) -> &[(RollbackStep, StepOutcome)] {
        &self.entries
    }

    /// Outcome of `step`
    pub fn outcome(&self, step: RollbackStep) -> Option<&StepOutcome> {
        self.entries
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| outcome)
    }

    /// Warning messages in execution order
    pub fn warnings(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                StepOutcome::Warned { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any step ended with a warning
    pub fn has_warnings(&self) -> bool {
        !self.warnings().is_empty()
    }
}
