//! Engine configuration loaded from TOML.

use std::path::Path;

use optrace_material::Environment;
use optrace_trace::TraceOptions;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings that are not part of a lens prescription.
///
/// ```toml
/// log_level = "debug"
///
/// [environment]
/// temperature = 20.0
/// pressure = 101325.0
///
/// [trace]
/// aim = "Real"
/// apply_vignetting = true
/// aperture_check = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Ambient conditions for air and glass indices.
    pub environment: Environment,
    /// Trace switches.
    pub trace: TraceOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            environment: Environment::default(),
            trace: TraceOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optrace_trace::AimMode;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_toml_str(
            r#"
            log_level = "debug"

            [environment]
            temperature = 15.0

            [trace]
            aim = "Paraxial"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.environment.temperature, 15.0);
        assert_eq!(config.environment.pressure, optrace_material::STANDARD_PRESSURE);
        assert_eq!(config.trace.aim, AimMode::Paraxial);
        assert!(config.trace.aperture_check);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(EngineConfig::from_toml_str("[trace\naim = 3").is_err());
    }
}
