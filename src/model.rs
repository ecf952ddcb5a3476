//! Core data records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single point-in-time weather reading for one city.
///
/// Temperatures are stored in Kelvin, the canonical unit the provider
/// reports in; conversion happens only at comparison or display time.
/// Observations are immutable once written and are removed only by the
/// retention sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub city: String,
    pub timestamp: DateTime<Utc>,
    /// Main weather condition, e.g. "Clear", "Rain", "Haze".
    pub condition: String,
    pub temp_kelvin: f64,
    pub feels_like_kelvin: f64,
}

impl Observation {
    pub fn new(
        city: impl Into<String>,
        timestamp: DateTime<Utc>,
        condition: impl Into<String>,
        temp_kelvin: f64,
        feels_like_kelvin: f64,
    ) -> Self {
        Self {
            city: city.into(),
            timestamp,
            condition: condition.into(),
            temp_kelvin,
            feels_like_kelvin,
        }
    }
}
