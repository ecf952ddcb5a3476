use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    cities, daily_summary, get_config, health_check, latest_observation, put_config,
    recent_alerts, recent_observations, AppState,
};
use crate::alerts::AlertFeed;
use crate::config::ServiceConfig;
use crate::jobs::{RetentionWorker, RetrievalCycle, Scheduler};
use crate::provider::OpenWeatherProvider;
use crate::store::{MemoryConfigStore, MemoryObservationStore};

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Alert config (singleton)
        .route("/config", get(get_config))
        .route("/config", put(put_config))
        // Observations
        .route("/cities", get(cities))
        .route("/observations/:city", get(recent_observations))
        .route("/observations/:city/latest", get(latest_observation))
        // Alert feed and daily roll-up
        .route("/alerts", get(recent_alerts))
        .route("/summary", get(daily_summary))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server and background jobs
pub async fn run_server(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let observations = Arc::new(MemoryObservationStore::new());
    let config_store = Arc::new(MemoryConfigStore::new());
    let feed = Arc::new(AlertFeed::new());
    let provider = Arc::new(OpenWeatherProvider::new(&config)?);

    let cycle = Arc::new(RetrievalCycle::new(
        provider,
        Arc::clone(&observations),
        Arc::clone(&config_store),
        Arc::clone(&feed),
    ));

    // Rebuild any in-progress breach streak before the first live tick.
    cycle.recover_state();

    let retention = Arc::new(RetentionWorker::new(
        Arc::clone(&observations),
        config.retention_check_interval,
        config.retention_window,
    ));

    let scheduler = Arc::new(Scheduler::new(
        cycle,
        retention,
        config.cities.clone(),
        config.retrieval_interval,
    ));
    let job_handles = Arc::clone(&scheduler).start();

    let state = Arc::new(AppState {
        observations,
        config: config_store,
        feed,
        cities: config.cities.clone(),
    });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting heatwatch server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&scheduler)))
        .await?;

    for handle in job_handles {
        handle.abort();
    }

    tracing::info!("heatwatch server stopped");
    Ok(())
}

async fn shutdown_signal<P, S, C>(scheduler: Arc<Scheduler<P, S, C>>)
where
    P: crate::provider::WeatherProvider,
    S: crate::store::ObservationStore + 'static,
    C: crate::store::ConfigStore + 'static,
{
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install CTRL+C signal handler");
        return;
    }

    tracing::info!("Shutdown signal received, stopping jobs...");
    scheduler.stop();
}
