//! Heatwatch Server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - HEATWATCH_HOST: Bind address (default: 0.0.0.0)
//! - HEATWATCH_PORT: Port number (default: 8080)
//! - HEATWATCH_CITIES: Comma-separated city list (default: six Indian metros)
//! - HEATWATCH_RETRIEVAL_INTERVAL_SECS: Seconds between retrieval ticks (default: 300)
//! - HEATWATCH_RETENTION_INTERVAL_SECS: Seconds between retention sweeps (default: 86400)
//! - HEATWATCH_RETENTION_WINDOW_HOURS: Observation age limit (default: 48)
//! - HEATWATCH_FETCH_TIMEOUT_SECS: Provider request timeout (default: 10)
//! - OPENWEATHER_API_KEY: OpenWeather API key (required for live data)
//! - OPENWEATHER_API_URL: Override the provider endpoint
//! - RUST_LOG: Log level (default: info)

use heatwatch::api::run_server;
use heatwatch::config::ServiceConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heatwatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env();

    tracing::info!("Heatwatch configuration:");
    tracing::info!("  Host: {}:{}", config.host, config.port);
    tracing::info!("  Cities: {}", config.cities.join(", "));
    tracing::info!(
        "  Retrieval interval: {} seconds",
        config.retrieval_interval.as_secs()
    );
    tracing::info!(
        "  Retention sweep every {} seconds, window {} hours",
        config.retention_check_interval.as_secs(),
        config.retention_window.num_hours()
    );
    if config.api_key.is_empty() {
        tracing::warn!("  OPENWEATHER_API_KEY is not set; provider requests will be rejected");
    }

    run_server(config).await
}
