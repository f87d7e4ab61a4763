// ABOUTME: Configuration error types for engine settings validation
// ABOUTME: Defines error variants for invalid ranges and unparseable environment values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// Failed to parse an environment value
    #[error("Parse error for {key}: {message}")]
    Parse {
        /// Variable name
        key: &'static str,
        /// Parser message
        message: String,
    },
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string()).with_source(error)
    }
}
