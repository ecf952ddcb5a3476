//! Alert surface: structured log plus an in-memory event feed
//!
//! Delivery is fire-and-forget; the UI reads raised/cleared transitions
//! back out of the feed via the API.

use std::collections::VecDeque;

use parking_lot::RwLock;

use super::tracker::{AlertEvent, AlertEventKind};

/// Default number of events the feed retains.
const DEFAULT_FEED_CAPACITY: usize = 256;

/// Bounded ring of recent alert events, newest first on read.
pub struct AlertFeed {
    events: RwLock<VecDeque<AlertEvent>>,
    capacity: usize,
}

impl AlertFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
        }
    }

    /// Log the event and retain it for the UI read path.
    pub fn publish(&self, event: AlertEvent) {
        match event.kind {
            AlertEventKind::Raised => {
                tracing::warn!(city = %event.city, temperature = event.temperature, "{}", event.message);
            }
            AlertEventKind::Cleared => {
                tracing::info!(city = %event.city, temperature = event.temperature, "{}", event.message);
            }
        }

        let mut events = self.events.write();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Recent events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<AlertEvent> {
        let events = self.events.read();
        events.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(kind: AlertEventKind, n: usize) -> AlertEvent {
        AlertEvent {
            city: "Delhi".to_string(),
            kind,
            at: Utc::now(),
            temperature: n as f64,
            message: format!("event {}", n),
        }
    }

    #[test]
    fn test_publish_and_read_newest_first() {
        let feed = AlertFeed::new();
        feed.publish(event(AlertEventKind::Raised, 1));
        feed.publish(event(AlertEventKind::Cleared, 2));

        let recent = feed.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].kind, AlertEventKind::Cleared);
        assert_eq!(recent[1].kind, AlertEventKind::Raised);
    }

    #[test]
    fn test_zero_capacity_still_bounded() {
        let feed = AlertFeed::with_capacity(0);
        for n in 0..10 {
            feed.publish(event(AlertEventKind::Raised, n));
        }
        // Clamped to a capacity of one; only the newest event survives.
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.recent(10)[0].temperature, 9.0);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let feed = AlertFeed::with_capacity(3);
        for n in 0..5 {
            feed.publish(event(AlertEventKind::Raised, n));
        }
        assert_eq!(feed.len(), 3);
        let recent = feed.recent(10);
        assert_eq!(recent[0].temperature, 4.0);
        assert_eq!(recent[2].temperature, 2.0);
    }
}
