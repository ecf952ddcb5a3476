//! In-memory observation time series

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{ObservationStore, StoreError};
use crate::model::Observation;

/// Per-city observation series kept sorted by timestamp.
///
/// Writes arrive roughly in time order (one reading per city per tick), so
/// insertion scans from the tail.
#[derive(Default)]
pub struct MemoryObservationStore {
    series: RwLock<HashMap<String, Vec<Observation>>>,
}

impl MemoryObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent observation for a city, if any.
    pub fn latest(&self, city: &str) -> Option<Observation> {
        let series = self.series.read();
        series.get(city).and_then(|entries| entries.last().cloned())
    }

    /// All cities with at least one stored observation.
    pub fn cities(&self) -> Vec<String> {
        let series = self.series.read();
        let mut cities: Vec<String> = series
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(city, _)| city.clone())
            .collect();
        cities.sort();
        cities
    }

    /// Every stored observation, used by the daily summary roll-up.
    pub fn all(&self) -> Vec<Observation> {
        let series = self.series.read();
        series.values().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let series = self.series.read();
        series.values().map(|entries| entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObservationStore for MemoryObservationStore {
    fn insert(&self, observation: Observation) -> Result<(), StoreError> {
        let mut series = self.series.write();
        let entries = series.entry(observation.city.clone()).or_default();

        // Keep the series ordered even if the provider's timestamps jitter.
        let pos = entries
            .iter()
            .rposition(|existing| existing.timestamp <= observation.timestamp)
            .map(|i| i + 1)
            .unwrap_or(0);
        entries.insert(pos, observation);
        Ok(())
    }

    fn query_recent(&self, city: &str, limit: usize) -> Vec<Observation> {
        let series = self.series.read();
        series
            .get(city)
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    fn query_since(&self, city: &str, since: DateTime<Utc>) -> Vec<Observation> {
        let series = self.series.read();
        series
            .get(city)
            .map(|entries| {
                entries
                    .iter()
                    .rev()
                    .take_while(|observation| observation.timestamp >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut series = self.series.write();
        let mut deleted = 0;
        for entries in series.values_mut() {
            let before = entries.len();
            entries.retain(|observation| observation.timestamp >= cutoff);
            deleted += before - entries.len();
        }
        Ok(deleted)
    }
}
