//! Threshold alerting with consecutive-update semantics
//!
//! The tracker is pure state-transition logic driven by the retrieval
//! cycle; raised/cleared events land in the feed for the UI read path.

pub mod config;
pub mod feed;
pub mod tracker;

pub use config::{AlertConfig, ConfigError};
pub use feed::AlertFeed;
pub use tracker::{evaluate, recover, AlertEvent, AlertEventKind, AlertState};
