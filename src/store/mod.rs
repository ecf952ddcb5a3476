//! Persistence accessors
//!
//! The cycles talk to storage through the two traits here, which carry
//! exactly the operations the core needs. The in-memory implementations
//! back the running service; tests substitute failing fakes.

pub mod config;
pub mod observations;

use chrono::{DateTime, Utc};

use crate::alerts::AlertConfig;
use crate::model::Observation;

pub use config::MemoryConfigStore;
pub use observations::MemoryObservationStore;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Append-only per-city observation time series.
pub trait ObservationStore: Send + Sync {
    fn insert(&self, observation: Observation) -> Result<(), StoreError>;

    /// Most recent observations for a city, newest first.
    fn query_recent(&self, city: &str, limit: usize) -> Vec<Observation>;

    /// Observations for a city at or after the given instant, newest first.
    fn query_since(&self, city: &str, since: DateTime<Utc>) -> Vec<Observation>;

    /// Delete every observation strictly older than the cutoff. Returns
    /// the number of rows removed.
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Singleton alert configuration record.
pub trait ConfigStore: Send + Sync {
    fn read(&self) -> Option<AlertConfig>;

    /// Replace the active config.
    fn write(&self, config: AlertConfig);
}
