//! Background jobs: retrieval ticks and retention sweeps

pub mod retention;
pub mod retrieval;
pub mod scheduler;

pub use retention::RetentionWorker;
pub use retrieval::{CycleError, RetrievalCycle};
pub use scheduler::Scheduler;
