//! Consecutive-breach alert evaluation
//!
//! Pure state-transition logic: given one observation, the current config
//! and the prior per-city state, produce the next state and at most one
//! alert event. All I/O stays in the retrieval cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::AlertConfig;
use crate::model::Observation;

/// Per-city alert state. Process-scoped, never persisted; rebuilt from
/// recent observations on startup via [`recover`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertState {
    /// Breaching observations seen in a row under the current config.
    pub consecutive_breach_count: u32,
    /// Whether the alert is currently raised.
    pub is_raised: bool,
    /// Fingerprint of the config this state was accumulated under.
    pub config_fingerprint: u64,
}

/// Raised/cleared transition emitted by [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertEventKind {
    Raised,
    Cleared,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub city: String,
    pub kind: AlertEventKind,
    pub at: DateTime<Utc>,
    /// Observed temperature converted into the config's unit.
    pub temperature: f64,
    pub message: String,
}

/// Evaluate one observation against the config and prior state.
///
/// A config edit (detected by fingerprint mismatch) resets the streak and
/// drops any raised flag before the observation is considered, so the new
/// rule takes effect on this observation rather than retroactively. The
/// reset itself emits no event; an already-raised alert re-raises only
/// after a fresh run of breaching observations under the new config.
///
/// The comparison is strict: a reading exactly at the threshold is not a
/// breach.
pub fn evaluate(
    observation: &Observation,
    config: &AlertConfig,
    prior: &AlertState,
) -> (AlertState, Option<AlertEvent>) {
    let fingerprint = config.fingerprint();
    let mut state = if prior.config_fingerprint == fingerprint {
        prior.clone()
    } else {
        AlertState {
            consecutive_breach_count: 0,
            is_raised: false,
            config_fingerprint: fingerprint,
        }
    };

    let temperature = config.unit.from_kelvin(observation.temp_kelvin);

    if temperature > config.threshold {
        state.consecutive_breach_count += 1;

        if state.consecutive_breach_count == config.consecutive_updates_required
            && !state.is_raised
        {
            state.is_raised = true;
            let event = AlertEvent {
                city: observation.city.clone(),
                kind: AlertEventKind::Raised,
                at: observation.timestamp,
                temperature,
                message: format!(
                    "Temperature in {} exceeded {:.2}{} for {} consecutive updates (currently {:.2}{})",
                    observation.city,
                    config.threshold,
                    config.unit.symbol(),
                    config.consecutive_updates_required,
                    temperature,
                    config.unit.symbol(),
                ),
            };
            return (state, Some(event));
        }
    } else {
        state.consecutive_breach_count = 0;

        if state.is_raised {
            state.is_raised = false;
            let event = AlertEvent {
                city: observation.city.clone(),
                kind: AlertEventKind::Cleared,
                at: observation.timestamp,
                temperature,
                message: format!(
                    "Temperature in {} back below {:.2}{} (currently {:.2}{})",
                    observation.city,
                    config.threshold,
                    config.unit.symbol(),
                    temperature,
                    config.unit.symbol(),
                ),
            };
            return (state, Some(event));
        }
    }

    (state, None)
}

/// Rebuild alert state by replaying observations, oldest first, discarding
/// events. Used at startup so the first live tick starts from the streak
/// the stored history implies.
pub fn recover(observations: &[Observation], config: &AlertConfig) -> AlertState {
    let mut state = AlertState::default();
    for observation in observations {
        let (next, _) = evaluate(observation, config, &state);
        state = next;
    }
    state
}
