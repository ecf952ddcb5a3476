use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::alerts::{AlertConfig, AlertEvent, AlertFeed, ConfigError};
use crate::model::Observation;
use crate::store::{ConfigStore, MemoryConfigStore, MemoryObservationStore, ObservationStore};
use crate::summary::{compute_daily_summaries, DailySummary};

/// Application state shared across handlers
pub struct AppState {
    pub observations: Arc<MemoryObservationStore>,
    pub config: Arc<MemoryConfigStore>,
    pub feed: Arc<AlertFeed>,
    pub cities: Vec<String>,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Alert Config
// ============================================================================

pub async fn get_config(State(state): State<Arc<AppState>>) -> Result<Json<AlertConfig>, ApiError> {
    state
        .config
        .read()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no alert config set".to_string()))
}

#[derive(Serialize)]
pub struct PutConfigResponse {
    pub updated: bool,
}

pub async fn put_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<AlertConfig>,
) -> Result<Json<PutConfigResponse>, ApiError> {
    config.validate()?;
    tracing::info!(
        city = %config.city,
        threshold = config.threshold,
        consecutive = config.consecutive_updates_required,
        "Alert config replaced"
    );
    state.config.write(config);
    Ok(Json(PutConfigResponse { updated: true }))
}

// ============================================================================
// Observations
// ============================================================================

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
    /// RFC 3339 instant; when set, returns the time range instead of a count.
    pub since: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize)]
pub struct ObservationsResponse {
    pub city: String,
    pub observations: Vec<Observation>,
}

pub async fn recent_observations(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
    Query(params): Query<RecentQuery>,
) -> Json<ObservationsResponse> {
    let observations = match params.since {
        Some(since) => state.observations.query_since(&city, since),
        None => state.observations.query_recent(&city, params.limit.unwrap_or(50)),
    };
    Json(ObservationsResponse { city, observations })
}

pub async fn latest_observation(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Result<Json<Observation>, ApiError> {
    state
        .observations
        .latest(&city)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no observations for {}", city)))
}

#[derive(Serialize)]
pub struct CitiesResponse {
    pub monitored: Vec<String>,
    pub with_data: Vec<String>,
}

pub async fn cities(State(state): State<Arc<AppState>>) -> Json<CitiesResponse> {
    Json(CitiesResponse {
        monitored: state.cities.clone(),
        with_data: state.observations.cities(),
    })
}

// ============================================================================
// Alerts & Summary
// ============================================================================

#[derive(Serialize)]
pub struct AlertsResponse {
    pub events: Vec<AlertEvent>,
}

pub async fn recent_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentQuery>,
) -> Json<AlertsResponse> {
    let limit = params.limit.unwrap_or(50);
    Json(AlertsResponse {
        events: state.feed.recent(limit),
    })
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summaries: Vec<DailySummary>,
}

pub async fn daily_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let observations = state.observations.all();
    Json(SummaryResponse {
        summaries: compute_daily_summaries(&observations),
    })
}

// ============================================================================
// Errors
// ============================================================================

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
