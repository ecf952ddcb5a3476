//! Temperature units and Kelvin-canonical conversions

use serde::{Deserialize, Serialize};

/// Temperature unit for thresholds and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TempUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TempUnit {
    /// Convert a Kelvin reading into this unit.
    pub fn from_kelvin(&self, kelvin: f64) -> f64 {
        match self {
            TempUnit::Celsius => kelvin_to_celsius(kelvin),
            TempUnit::Fahrenheit => kelvin_to_fahrenheit(kelvin),
            TempUnit::Kelvin => kelvin,
        }
    }

    /// Degree symbol suffix for log messages, e.g. "°C".
    pub fn symbol(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "°C",
            TempUnit::Fahrenheit => "°F",
            TempUnit::Kelvin => "K",
        }
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    kelvin_to_celsius(kelvin) * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_to_celsius() {
        assert!((kelvin_to_celsius(273.15) - 0.0).abs() < 1e-9);
        assert!((kelvin_to_celsius(303.15) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_kelvin_to_fahrenheit() {
        // 30°C == 86°F
        assert!((kelvin_to_fahrenheit(303.15) - 86.0).abs() < 1e-9);
        assert!((kelvin_to_fahrenheit(273.15) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_from_kelvin() {
        assert!((TempUnit::Kelvin.from_kelvin(300.0) - 300.0).abs() < 1e-9);
        assert!((TempUnit::Celsius.from_kelvin(300.0) - 26.85).abs() < 1e-9);
        assert!((TempUnit::Fahrenheit.from_kelvin(303.15) - 86.0).abs() < 1e-9);
    }
}
