//! Per-city retrieval cycle
//!
//! One invocation per city per scheduler tick: fetch an observation,
//! persist it, load the active config fresh, run the alert tracker, and
//! forward any transition to the alert feed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::alerts::{self, AlertFeed, AlertState};
use crate::provider::{ProviderError, WeatherProvider};
use crate::store::{ConfigStore, ObservationStore, StoreError};

/// Cycle failures. Both are transient; the next scheduled tick retries.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

pub struct RetrievalCycle<P, S, C> {
    provider: Arc<P>,
    observations: Arc<S>,
    config: Arc<C>,
    feed: Arc<AlertFeed>,
    /// Per-city alert state. Cities tick concurrently, so access is brief
    /// and never held across an await.
    states: Mutex<HashMap<String, AlertState>>,
}

impl<P, S, C> RetrievalCycle<P, S, C>
where
    P: WeatherProvider,
    S: ObservationStore,
    C: ConfigStore,
{
    pub fn new(
        provider: Arc<P>,
        observations: Arc<S>,
        config: Arc<C>,
        feed: Arc<AlertFeed>,
    ) -> Self {
        Self {
            provider,
            observations,
            config,
            feed,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Run one retrieval cycle for a city.
    ///
    /// A provider failure aborts the cycle for this tick. A persistence
    /// failure is surfaced in the returned error but does not block alert
    /// evaluation, which proceeds on the in-memory observation.
    pub async fn run_once(&self, city: &str) -> Result<(), CycleError> {
        let observation = self.provider.fetch_current(city).await?;
        tracing::debug!(
            city = %city,
            temp_kelvin = observation.temp_kelvin,
            condition = %observation.condition,
            "Fetched observation"
        );

        let persisted = self.observations.insert(observation.clone());
        if let Err(ref e) = persisted {
            tracing::warn!(city = %city, error = %e, "Failed to persist observation; evaluating anyway");
        }

        // Config is loaded fresh each tick so UI edits apply on the next
        // observation without a restart.
        match self.config.read() {
            Some(config) if config.city == city => {
                let prior = {
                    let states = self.states.lock();
                    states.get(city).cloned().unwrap_or_default()
                };

                let (next, event) = alerts::evaluate(&observation, &config, &prior);

                {
                    let mut states = self.states.lock();
                    states.insert(city.to_string(), next);
                }

                if let Some(event) = event {
                    self.feed.publish(event);
                }
            }
            Some(_) => {
                // The singleton rule watches a different city.
            }
            None => {
                tracing::debug!(city = %city, "No alert config; skipping evaluation");
            }
        }

        persisted.map_err(CycleError::from)
    }

    /// Rebuild per-city alert state from stored history, replaying the last
    /// `consecutive_updates_required` observations through the tracker.
    /// Called once at startup before the first live tick.
    pub fn recover_state(&self) {
        let Some(config) = self.config.read() else {
            return;
        };

        let limit = config.consecutive_updates_required as usize;
        let mut history = self.observations.query_recent(&config.city, limit);
        if history.is_empty() {
            return;
        }
        // query_recent returns newest first; replay oldest first.
        history.reverse();

        let state = alerts::recover(&history, &config);
        tracing::info!(
            city = %config.city,
            breaches = state.consecutive_breach_count,
            raised = state.is_raised,
            "Recovered alert state from {} stored observations",
            history.len()
        );

        let mut states = self.states.lock();
        states.insert(config.city.clone(), state);
    }

    /// Current alert state for a city (primarily for tests and diagnostics).
    pub fn state(&self, city: &str) -> Option<AlertState> {
        let states = self.states.lock();
        states.get(city).cloned()
    }
}
