//! Alert configuration record

use std::hash::{Hash, Hasher};

use fxhash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::units::TempUnit;

/// The single user-editable alert rule.
///
/// Exactly one logical instance exists at a time; writing a new one replaces
/// the previous. The retrieval cycle reads it fresh on every tick, so edits
/// take effect on the next observation without a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// City this rule watches.
    pub city: String,
    /// Unit the threshold is expressed in.
    pub unit: TempUnit,
    /// Alert fires when the converted temperature strictly exceeds this.
    pub threshold: f64,
    /// Sequential breaching observations required before raising.
    pub consecutive_updates_required: u32,
}

impl AlertConfig {
    /// Validate a config at the write boundary. Invalid configs never
    /// reach the tracker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.city.trim().is_empty() {
            return Err(ConfigError::Invalid("city must not be empty".to_string()));
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::Invalid(
                "threshold must be a finite number".to_string(),
            ));
        }
        if self.consecutive_updates_required < 1 {
            return Err(ConfigError::Invalid(
                "consecutive_updates_required must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Stable fingerprint over all fields. The tracker compares this to
    /// detect config edits and invalidate any in-progress breach streak.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.city.hash(&mut hasher);
        self.unit.hash(&mut hasher);
        self.threshold.to_bits().hash(&mut hasher);
        self.consecutive_updates_required.hash(&mut hasher);
        hasher.finish()
    }
}

/// Config write errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid alert config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AlertConfig {
        AlertConfig {
            city: "Delhi".to_string(),
            unit: TempUnit::Celsius,
            threshold: 35.0,
            consecutive_updates_required: 2,
        }
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_consecutive() {
        let mut config = base_config();
        config.consecutive_updates_required = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let mut config = base_config();
        config.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_city() {
        let mut config = base_config();
        config.city = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fingerprint_changes_with_any_field() {
        let base = base_config().fingerprint();

        let mut edited = base_config();
        edited.threshold = 30.0;
        assert_ne!(edited.fingerprint(), base);

        let mut edited = base_config();
        edited.unit = TempUnit::Fahrenheit;
        assert_ne!(edited.fingerprint(), base);

        let mut edited = base_config();
        edited.consecutive_updates_required = 3;
        assert_ne!(edited.fingerprint(), base);

        assert_eq!(base_config().fingerprint(), base);
    }
}
