//! Weather data providers

pub mod openweather;

use std::future::Future;

use crate::model::Observation;

pub use openweather::OpenWeatherProvider;

/// Provider failures are transient; the cycle logs them and the next
/// scheduled tick retries naturally.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    Parse(String),
}

/// Source of current weather observations.
pub trait WeatherProvider: Send + Sync + 'static {
    fn fetch_current(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<Observation, ProviderError>> + Send;
}
