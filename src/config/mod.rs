// ABOUTME: Configuration module for engine-wide defaults and safety limits
// ABOUTME: Environment-driven settings with validation and typed errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the liftplan engine
//!
//! - **Engine**: default rounding and the global cap on variable set schemes
//! - **Error**: typed configuration errors

/// Engine defaults loaded from the environment
pub mod engine;
/// Configuration error types
pub mod error;

pub use engine::EngineConfig;
pub use error::ConfigError;
