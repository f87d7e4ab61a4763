// ABOUTME: Integration tests for engine configuration loaded from the environment
// ABOUTME: Serialized because they mutate process-wide LIFTPLAN_* variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use liftplan::config::engine::{
    ENV_MAX_VARIABLE_SETS, ENV_ROUNDING_DIRECTION, ENV_ROUNDING_INCREMENT,
};
use liftplan::config::{ConfigError, EngineConfig};
use liftplan::errors::{AppError, ErrorCode};
use liftplan::set_scheme::SetGenerationContext;
use liftplan_core::models::RoundingDirection;
use serial_test::serial;
use std::env;

fn clear_env() {
    for key in [
        ENV_ROUNDING_INCREMENT,
        ENV_ROUNDING_DIRECTION,
        ENV_MAX_VARIABLE_SETS,
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config, EngineConfig::default());
    assert!((config.default_rounding.increment - 5.0).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(ENV_ROUNDING_INCREMENT, "2.5");
    env::set_var(ENV_ROUNDING_DIRECTION, "down");
    env::set_var(ENV_MAX_VARIABLE_SETS, " 12 ");

    let config = EngineConfig::from_env().unwrap();
    clear_env();

    assert!((config.default_rounding.increment - 2.5).abs() < f64::EPSILON);
    assert_eq!(config.default_rounding.direction, RoundingDirection::Down);
    assert_eq!(config.max_variable_sets, 12);

    let ctx = SetGenerationContext::from_config(&config);
    assert_eq!(ctx.effective_cap(20), 12);
    assert_eq!(ctx.effective_cap(5), 5);
}

#[test]
#[serial]
fn test_unparseable_value_is_rejected() {
    clear_env();
    env::set_var(ENV_MAX_VARIABLE_SETS, "plenty");
    let err = EngineConfig::from_env().unwrap_err();
    clear_env();

    match &err {
        ConfigError::Parse { key, .. } => assert_eq!(*key, ENV_MAX_VARIABLE_SETS),
        other => panic!("expected parse error, got {other:?}"),
    }
    let app: AppError = err.into();
    assert_eq!(app.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_out_of_range_values_are_rejected() {
    clear_env();
    env::set_var(ENV_MAX_VARIABLE_SETS, "0");
    assert!(matches!(
        EngineConfig::from_env(),
        Err(ConfigError::ValueOutOfRange(_))
    ));

    clear_env();
    env::set_var(ENV_ROUNDING_INCREMENT, "-5");
    assert!(matches!(
        EngineConfig::from_env(),
        Err(ConfigError::ValueOutOfRange(_))
    ));
    clear_env();
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    clear_env();
    env::set_var(ENV_ROUNDING_DIRECTION, "   ");
    let config = EngineConfig::from_env().unwrap();
    clear_env();
    assert_eq!(config.default_rounding.direction, RoundingDirection::Nearest);
}
