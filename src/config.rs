//! Service configuration from environment variables

use std::time::Duration;

/// Default monitored cities (same metro set the service shipped with).
pub const DEFAULT_CITIES: &[&str] = &[
    "Delhi",
    "Mumbai",
    "Chennai",
    "Bangalore",
    "Kolkata",
    "Hyderabad",
];

pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Process-wide configuration, parsed once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Cities polled each retrieval tick.
    pub cities: Vec<String>,
    pub api_url: String,
    pub api_key: String,
    /// Interval between retrieval ticks.
    pub retrieval_interval: Duration,
    /// Interval between retention sweeps.
    pub retention_check_interval: Duration,
    /// Observations older than this are eligible for deletion.
    pub retention_window: chrono::Duration,
    /// Upper bound on a single provider request.
    pub fetch_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cities: DEFAULT_CITIES.iter().map(|s| s.to_string()).collect(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            retrieval_interval: Duration::from_secs(300),
            retention_check_interval: Duration::from_secs(24 * 60 * 60),
            retention_window: chrono::Duration::hours(48),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl ServiceConfig {
    /// Build configuration from `HEATWATCH_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cities = std::env::var("HEATWATCH_CITIES")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.cities);

        Self {
            host: std::env::var("HEATWATCH_HOST").unwrap_or(defaults.host),
            port: std::env::var("HEATWATCH_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            cities,
            api_url: std::env::var("OPENWEATHER_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("OPENWEATHER_API_KEY").unwrap_or_default(),
            retrieval_interval: std::env::var("HEATWATCH_RETRIEVAL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.retrieval_interval),
            retention_check_interval: std::env::var("HEATWATCH_RETENTION_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.retention_check_interval),
            retention_window: std::env::var("HEATWATCH_RETENTION_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(chrono::Duration::hours)
                .unwrap_or(defaults.retention_window),
            fetch_timeout: std::env::var("HEATWATCH_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
        }
    }
}
