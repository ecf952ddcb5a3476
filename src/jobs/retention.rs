//! Retention sweep worker

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;

use crate::store::ObservationStore;

/// Periodically deletes observations older than the retention window.
///
/// Idempotent per sweep; a failed sweep is logged and retried on the next
/// scheduled run.
pub struct RetentionWorker<S> {
    store: Arc<S>,
    interval: Duration,
    window: chrono::Duration,
    running: Arc<AtomicBool>,
}

impl<S> RetentionWorker<S>
where
    S: ObservationStore + 'static,
{
    pub fn new(store: Arc<S>, interval: Duration, window: chrono::Duration) -> Self {
        Self {
            store,
            interval,
            window,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run one sweep. Returns the number of rows deleted.
    pub fn run_once(&self) -> usize {
        let cutoff = Utc::now() - self.window;
        match self.store.delete_older_than(cutoff) {
            Ok(deleted) => {
                if deleted > 0 {
                    tracing::info!(%cutoff, deleted, "Retention sweep removed expired observations");
                }
                deleted
            }
            Err(e) => {
                tracing::error!(%cutoff, error = %e, "Retention sweep failed; will retry next run");
                0
            }
        }
    }

    /// Start the background worker.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!(
                "Retention worker started with interval {:?}, window {} hours",
                self.interval,
                self.window.num_hours()
            );

            let mut interval = time::interval(self.interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            while self.running.load(Ordering::SeqCst) {
                interval.tick().await;
                self.run_once();
            }

            tracing::info!("Retention worker stopped");
        })
    }

    /// Stop the worker.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Observation;
    use crate::store::MemoryObservationStore;

    fn aged(store: &MemoryObservationStore, city: &str, hours: i64) {
        let at = Utc::now() - chrono::Duration::hours(hours);
        store
            .insert(Observation::new(city, at, "Clear", 300.0, 300.0))
            .unwrap();
    }

    #[test]
    fn test_run_once_deletes_only_expired() {
        let store = Arc::new(MemoryObservationStore::new());
        aged(&store, "Delhi", 1);
        aged(&store, "Delhi", 25);
        aged(&store, "Mumbai", 49);

        let worker = RetentionWorker::new(
            Arc::clone(&store),
            Duration::from_secs(86_400),
            chrono::Duration::hours(48),
        );

        assert_eq!(worker.run_once(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_run_once_is_idempotent() {
        let store = Arc::new(MemoryObservationStore::new());
        aged(&store, "Delhi", 50);
        aged(&store, "Delhi", 1);

        let worker = RetentionWorker::new(
            Arc::clone(&store),
            Duration::from_secs(86_400),
            chrono::Duration::hours(48),
        );

        assert_eq!(worker.run_once(), 1);
        assert_eq!(worker.run_once(), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_worker_sweeps_in_background() {
        let store = Arc::new(MemoryObservationStore::new());
        aged(&store, "Delhi", 50);

        let worker = Arc::new(RetentionWorker::new(
            Arc::clone(&store),
            Duration::from_millis(10),
            chrono::Duration::hours(48),
        ));

        let handle = Arc::clone(&worker).start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(worker.is_running());
        assert_eq!(store.len(), 0);

        worker.stop();
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.abort();
    }
}
