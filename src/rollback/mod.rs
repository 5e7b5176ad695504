//! Rollback orchestration.

mod orchestrator;
mod plan;
mod report;

pub use orchestrator::RollbackOrchestrator;
pub use plan::{RollbackPlan, RollbackStep};
pub use report::{RollbackReport, StepOutcome};
