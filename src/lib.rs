//! Heatwatch: Weather Monitoring and Alerting Service
//!
//! Periodically retrieves current weather for a set of cities from
//! OpenWeather, keeps the readings as an in-memory time series, evaluates a
//! single user-configurable temperature alert rule with consecutive-update
//! semantics, and prunes observations past a rolling retention window.
//!
//! # Features
//!
//! - **Periodic Retrieval**: One observation per city per tick, cities
//!   fetched concurrently so a slow upstream cannot stall the rest
//! - **Threshold Alerting**: Raise after N consecutive breaching readings,
//!   clear on the first non-breaching one; config edits reset the streak
//! - **Rolling Retention**: Daily sweep deletes observations older than the
//!   retention window (48 hours by default)
//! - **Daily Summaries**: Per-city temperature aggregates with a
//!   daytime-weighted dominant condition
//! - **HTTP API**: Config read/write, recent observations, alert feed
//!
//! # Example
//!
//! ```no_run
//! use heatwatch::alerts::{self, AlertConfig, AlertState};
//! use heatwatch::model::Observation;
//! use heatwatch::units::TempUnit;
//! use chrono::Utc;
//!
//! let config = AlertConfig {
//!     city: "Delhi".to_string(),
//!     unit: TempUnit::Celsius,
//!     threshold: 35.0,
//!     consecutive_updates_required: 2,
//! };
//!
//! let observation = Observation::new("Delhi", Utc::now(), "Clear", 310.15, 312.0);
//! let (state, event) = alerts::evaluate(&observation, &config, &AlertState::default());
//! println!("breaches={} event={:?}", state.consecutive_breach_count, event);
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod jobs;
pub mod model;
pub mod provider;
pub mod store;
pub mod summary;
pub mod units;

// Re-export commonly used types
pub use alerts::{AlertConfig, AlertEvent, AlertEventKind, AlertState};
pub use config::ServiceConfig;
pub use model::Observation;
pub use units::TempUnit;
