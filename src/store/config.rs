//! In-memory singleton config record

use parking_lot::RwLock;

use super::ConfigStore;
use crate::alerts::AlertConfig;

/// Holds at most one active alert config; writes replace.
#[derive(Default)]
pub struct MemoryConfigStore {
    config: RwLock<Option<AlertConfig>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an initial config at startup.
    pub fn with_config(config: AlertConfig) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self) -> Option<AlertConfig> {
        self.config.read().clone()
    }

    fn write(&self, config: AlertConfig) {
        *self.config.write() = Some(config);
    }
}
