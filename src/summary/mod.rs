//! Daily roll-up aggregates
//!
//! Computed on demand from stored observations rather than persisted, so
//! the numbers always reflect whatever the retention sweep has kept.

use std::collections::HashMap;

use chrono::{NaiveDate, Timelike};
use serde::Serialize;

use crate::model::Observation;

/// Per-city, per-day temperature aggregate with a dominant condition.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub city: String,
    pub date: NaiveDate,
    pub avg_temp_kelvin: f64,
    pub max_temp_kelvin: f64,
    pub min_temp_kelvin: f64,
    pub dominant_condition: String,
}

/// Weight a condition by when it was observed. Daytime readings (09:00 to
/// 17:00) count double since conditions then matter more to users.
fn condition_weight(hour: u32) -> u32 {
    if (9..17).contains(&hour) {
        2
    } else {
        1
    }
}

/// Roll observations up into one summary per (city, day), sorted by city
/// then date. Dominant-condition ties break on condition name so the
/// result is deterministic.
pub fn compute_daily_summaries(observations: &[Observation]) -> Vec<DailySummary> {
    struct Bucket {
        sum: f64,
        max: f64,
        min: f64,
        count: usize,
        condition_weights: HashMap<String, u32>,
    }

    let mut buckets: HashMap<(String, NaiveDate), Bucket> = HashMap::new();

    for observation in observations {
        let key = (observation.city.clone(), observation.timestamp.date_naive());
        let bucket = buckets.entry(key).or_insert_with(|| Bucket {
            sum: 0.0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            count: 0,
            condition_weights: HashMap::new(),
        });

        bucket.sum += observation.temp_kelvin;
        bucket.max = bucket.max.max(observation.temp_kelvin);
        bucket.min = bucket.min.min(observation.temp_kelvin);
        bucket.count += 1;
        *bucket
            .condition_weights
            .entry(observation.condition.clone())
            .or_insert(0) += condition_weight(observation.timestamp.hour());
    }

    let mut summaries: Vec<DailySummary> = buckets
        .into_iter()
        .map(|((city, date), bucket)| {
            let dominant_condition = bucket
                .condition_weights
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(condition, _)| condition.clone())
                .unwrap_or_default();

            DailySummary {
                city,
                date,
                avg_temp_kelvin: bucket.sum / bucket.count as f64,
                max_temp_kelvin: bucket.max,
                min_temp_kelvin: bucket.min,
                dominant_condition,
            }
        })
        .collect();

    summaries.sort_by(|a, b| a.city.cmp(&b.city).then(a.date.cmp(&b.date)));
    summaries
}
