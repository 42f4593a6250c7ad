//! Live-data acquisition: orchestrator, scheduler and reconciliation merge.

pub mod engine;
pub mod merge;
pub mod scheduler;

pub use engine::Refresher;
pub use merge::merge;
pub use scheduler::Scheduler;
