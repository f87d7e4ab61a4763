// ABOUTME: Engine configuration: default rounding and the variable-set ceiling
// ABOUTME: Loaded from LIFTPLAN_* environment variables with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ConfigError;
use crate::rounding::RoundingSpec;
use liftplan_core::constants::set_scheme::{DEFAULT_MAX_VARIABLE_SETS, MAX_PRESCRIBED_SETS};
use liftplan_core::models::RoundingDirection;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};

/// Rounding increment override
pub const ENV_ROUNDING_INCREMENT: &str = "LIFTPLAN_ROUNDING_INCREMENT";
/// Rounding direction override (`NEAREST`, `DOWN`, `UP`)
pub const ENV_ROUNDING_DIRECTION: &str = "LIFTPLAN_ROUNDING_DIRECTION";
/// Global variable-scheme set ceiling override
pub const ENV_MAX_VARIABLE_SETS: &str = "LIFTPLAN_MAX_VARIABLE_SETS";

/// Engine-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Rounding used where a strategy does not carry its own
    #[serde(default)]
    pub default_rounding: RoundingSpec,
    /// Ceiling applied on top of each variable scheme's own set cap
    #[serde(default = "default_max_variable_sets")]
    pub max_variable_sets: u32,
}

const fn default_max_variable_sets() -> u32 {
    DEFAULT_MAX_VARIABLE_SETS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rounding: RoundingSpec::default(),
            max_variable_sets: DEFAULT_MAX_VARIABLE_SETS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for an unparseable override and
    /// `ConfigError::ValueOutOfRange` if the result fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(increment) = parse_env::<f64>(ENV_ROUNDING_INCREMENT)? {
            config.default_rounding.increment = increment;
        }
        if let Some(raw) = read_env(ENV_ROUNDING_DIRECTION) {
            config.default_rounding.direction =
                RoundingDirection::from_str(&raw).map_err(|e| ConfigError::Parse {
                    key: ENV_ROUNDING_DIRECTION,
                    message: e.message,
                })?;
        }
        if let Some(max_sets) = parse_env::<u32>(ENV_MAX_VARIABLE_SETS)? {
            config.max_variable_sets = max_sets;
        }

        config.validate()?;
        info!(
            rounding_increment = config.default_rounding.increment,
            rounding_direction = config.default_rounding.direction.as_str(),
            max_variable_sets = config.max_variable_sets,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// Validate ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValueOutOfRange` for a non-positive increment or
    /// a set ceiling outside `1..=MAX_PRESCRIBED_SETS`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let increment = self.default_rounding.increment;
        if !increment.is_finite() || increment <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(format!(
                "{ENV_ROUNDING_INCREMENT} must be positive, got {increment}"
            )));
        }
        if self.max_variable_sets == 0 || self.max_variable_sets > MAX_PRESCRIBED_SETS {
            return Err(ConfigError::ValueOutOfRange(format!(
                "{ENV_MAX_VARIABLE_SETS} must be between 1 and {MAX_PRESCRIBED_SETS}, got {}",
                self.max_variable_sets
            )));
        }
        Ok(())
    }
}

fn read_env(key: &'static str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_env<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = read_env(key) else {
        return Ok(None);
    };
    debug!(key, value = %raw, "applying environment override");
    raw.parse().map(Some).map_err(|e: T::Err| ConfigError::Parse {
        key,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_variable_sets, 20);
        assert_eq!(config.default_rounding.direction, RoundingDirection::Nearest);
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let config = EngineConfig {
            max_variable_sets: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_runaway_ceiling_rejected() {
        let config = EngineConfig {
            max_variable_sets: MAX_PRESCRIBED_SETS + 1,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }
}
