//! Ambient conditions that air and glass indices depend on.

use serde::{Deserialize, Serialize};

/// Standard atmospheric pressure in pascal.
pub const STANDARD_PRESSURE: f64 = 101_325.0;

/// Temperature and pressure of the air surrounding the system.
///
/// Passed by value into every material that needs it; nothing in the
/// engine reads ambient conditions from global state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Air pressure in pascal.
    pub pressure: f64,
}

impl Environment {
    /// Create an environment from temperature (°C) and pressure (Pa).
    pub fn new(temperature: f64, pressure: f64) -> Self {
        Self {
            temperature,
            pressure,
        }
    }
}

impl Default for Environment {
    /// 25 °C at one standard atmosphere.
    fn default() -> Self {
        Self::new(25.0, STANDARD_PRESSURE)
    }
}
