//! Periodic job scheduling
//!
//! Two independently timed tasks: the retrieval ticker and the retention
//! worker. Neither waits on the other, and each city's retrieval cycle is
//! spawned as its own task so one slow fetch cannot delay the rest.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time;

use super::retention::RetentionWorker;
use super::retrieval::{CycleError, RetrievalCycle};
use crate::provider::WeatherProvider;
use crate::store::{ConfigStore, ObservationStore};

pub struct Scheduler<P, S, C> {
    cycle: Arc<RetrievalCycle<P, S, C>>,
    retention: Arc<RetentionWorker<S>>,
    cities: Vec<String>,
    retrieval_interval: Duration,
    running: Arc<AtomicBool>,
    /// Cities whose retrieval cycle from a previous tick has not finished.
    /// A tick never starts a second concurrent cycle for the same city, so
    /// per-city alert state sees observations strictly in order even when
    /// the interval is configured shorter than the fetch timeout.
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl<P, S, C> Scheduler<P, S, C>
where
    P: WeatherProvider,
    S: ObservationStore + 'static,
    C: ConfigStore + 'static,
{
    pub fn new(
        cycle: Arc<RetrievalCycle<P, S, C>>,
        retention: Arc<RetentionWorker<S>>,
        cities: Vec<String>,
        retrieval_interval: Duration,
    ) -> Self {
        Self {
            cycle,
            retention,
            cities,
            retrieval_interval,
            running: Arc::new(AtomicBool::new(false)),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Start both periodic tasks. The first retrieval tick fires
    /// immediately so a fresh process has data before the first interval
    /// elapses.
    pub fn start(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        self.running.store(true, Ordering::SeqCst);

        let retention_handle = Arc::clone(&self.retention).start();

        let scheduler = Arc::clone(&self);
        let retrieval_handle = tokio::spawn(async move {
            tracing::info!(
                cities = scheduler.cities.len(),
                "Retrieval ticker started with interval {:?}",
                scheduler.retrieval_interval
            );

            let mut interval = time::interval(scheduler.retrieval_interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            while scheduler.running.load(Ordering::SeqCst) {
                interval.tick().await;

                for city in &scheduler.cities {
                    if !scheduler.in_flight.lock().insert(city.clone()) {
                        tracing::debug!(city = %city, "Previous retrieval still in flight; skipping tick");
                        continue;
                    }

                    let cycle = Arc::clone(&scheduler.cycle);
                    let in_flight = Arc::clone(&scheduler.in_flight);
                    let city = city.clone();
                    tokio::spawn(async move {
                        match cycle.run_once(&city).await {
                            Ok(()) => {}
                            Err(CycleError::Provider(e)) => {
                                tracing::warn!(city = %city, error = %e, "Retrieval skipped this tick");
                            }
                            Err(CycleError::Persistence(e)) => {
                                tracing::warn!(city = %city, error = %e, "Observation not persisted this tick");
                            }
                        }
                        in_flight.lock().remove(&city);
                    });
                }
            }

            tracing::info!("Retrieval ticker stopped");
        });

        vec![retrieval_handle, retention_handle]
    }

    /// Stop both tasks.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.retention.stop();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertConfig, AlertFeed};
    use crate::model::Observation;
    use crate::provider::ProviderError;
    use crate::store::{MemoryConfigStore, MemoryObservationStore};
    use crate::units::TempUnit;
    use chrono::Utc;
    use parking_lot::Mutex;

    /// Provider fake that returns a fixed reading per city, stalling for
    /// the configured city to simulate a slow upstream.
    struct SlowCityProvider {
        slow_city: String,
        calls: Mutex<Vec<String>>,
    }

    impl WeatherProvider for SlowCityProvider {
        async fn fetch_current(&self, city: &str) -> Result<Observation, ProviderError> {
            self.calls.lock().push(city.to_string());
            if city == self.slow_city {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(Observation::new(city, Utc::now(), "Clear", 300.0, 300.0))
        }
    }

    #[tokio::test]
    async fn test_slow_city_does_not_block_others() {
        let provider = Arc::new(SlowCityProvider {
            slow_city: "Delhi".to_string(),
            calls: Mutex::new(Vec::new()),
        });
        let observations = Arc::new(MemoryObservationStore::new());
        let config = Arc::new(MemoryConfigStore::with_config(AlertConfig {
            city: "Mumbai".to_string(),
            unit: TempUnit::Celsius,
            threshold: 50.0,
            consecutive_updates_required: 1,
        }));

        let cycle = Arc::new(RetrievalCycle::new(
            Arc::clone(&provider),
            Arc::clone(&observations),
            config,
            Arc::new(AlertFeed::new()),
        ));
        let retention = Arc::new(RetentionWorker::new(
            Arc::clone(&observations),
            Duration::from_secs(3600),
            chrono::Duration::hours(48),
        ));

        let scheduler = Arc::new(Scheduler::new(
            cycle,
            retention,
            vec!["Delhi".to_string(), "Mumbai".to_string()],
            Duration::from_millis(10),
        ));

        let handles = Arc::clone(&scheduler).start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.stop();

        // Mumbai kept landing observations while Delhi's fetch stalled.
        assert!(observations.query_recent("Mumbai", 100).len() > 1);
        assert!(observations.query_recent("Delhi", 100).is_empty());
        assert!(provider.calls.lock().iter().any(|c| c == "Delhi"));

        for handle in handles {
            handle.abort();
        }
    }

    #[tokio::test]
    async fn test_no_overlapping_cycles_for_same_city() {
        use std::sync::atomic::AtomicUsize;

        /// Provider fake that stalls longer than the tick interval and
        /// records how many fetches for it ran at once.
        struct StallingProvider {
            active: AtomicUsize,
            max_active: AtomicUsize,
        }

        impl WeatherProvider for StallingProvider {
            async fn fetch_current(&self, city: &str) -> Result<Observation, ProviderError> {
                let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(40)).await;
                self.active.fetch_sub(1, Ordering::SeqCst);
                Ok(Observation::new(city, Utc::now(), "Clear", 300.0, 300.0))
            }
        }

        let provider = Arc::new(StallingProvider {
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        });
        let observations = Arc::new(MemoryObservationStore::new());
        let cycle = Arc::new(RetrievalCycle::new(
            Arc::clone(&provider),
            Arc::clone(&observations),
            Arc::new(MemoryConfigStore::new()),
            Arc::new(AlertFeed::new()),
        ));
        let retention = Arc::new(RetentionWorker::new(
            Arc::clone(&observations),
            Duration::from_secs(3600),
            chrono::Duration::hours(48),
        ));

        // Ticks fire far more often than a fetch completes.
        let scheduler = Arc::new(Scheduler::new(
            cycle,
            retention,
            vec!["Delhi".to_string()],
            Duration::from_millis(5),
        ));

        let handles = Arc::clone(&scheduler).start();
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop();

        assert_eq!(provider.max_active.load(Ordering::SeqCst), 1);
        // Cycles still made progress tick after tick.
        assert!(observations.query_recent("Delhi", 100).len() >= 2);

        for handle in handles {
            handle.abort();
        }
    }

    #[tokio::test]
    async fn test_stop_halts_ticker() {
        let provider = Arc::new(SlowCityProvider {
            slow_city: String::new(),
            calls: Mutex::new(Vec::new()),
        });
        let observations = Arc::new(MemoryObservationStore::new());
        let cycle = Arc::new(RetrievalCycle::new(
            provider,
            Arc::clone(&observations),
            Arc::new(MemoryConfigStore::new()),
            Arc::new(AlertFeed::new()),
        ));
        let retention = Arc::new(RetentionWorker::new(
            Arc::clone(&observations),
            Duration::from_secs(3600),
            chrono::Duration::hours(48),
        ));

        let scheduler = Arc::new(Scheduler::new(
            cycle,
            retention,
            vec!["Delhi".to_string()],
            Duration::from_millis(10),
        ));

        let handles = Arc::clone(&scheduler).start();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(scheduler.is_running());

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert!(!scheduler.retention.is_running());

        for handle in handles {
            handle.abort();
        }
    }
}
