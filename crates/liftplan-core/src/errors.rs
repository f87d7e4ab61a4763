// ABOUTME: Unified error type and error codes for the strategy composition engine
// ABOUTME: Provides AppError with typed codes, context chaining, and convenience constructors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the engine returns [`AppResult`]. Callers match on
//! [`AppError::code`] to distinguish configuration mistakes from missing data
//! (a max that was never recorded, a reference set not yet logged) and from
//! failures inside injected lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (1000-1999)
    /// Missing identity or malformed configuration
    InvalidParams = 1000,
    /// A numeric field is outside its permitted range
    ValueOutOfRange = 1001,
    /// A string could not be parsed into a known enum value
    UnknownType = 1002,

    // Registry (2000-2999)
    /// No constructor is registered for a discriminator
    TypeNotRegistered = 2000,
    /// A constructor is already registered for a discriminator
    AlreadyRegistered = 2001,

    // Missing data (3000-3999)
    /// No max of the requested type exists for the user and lift
    MaxNotFound = 3000,
    /// The referenced set has not been logged in the session yet
    ReferenceSetNotFound = 3001,
    /// An RPE-based strategy was evaluated without an RPE chart
    RpeChartRequired = 3002,
    /// A generic lookup (for example an RPE chart entry) found nothing
    ResourceNotFound = 3003,

    // External collaborators (4000-4999)
    /// An injected lookup returned an error
    LookupFailed = 4000,

    // Internal (9000-9999)
    /// JSON encoding or decoding failed
    SerializationError = 9000,
    /// Engine configuration is invalid
    ConfigInvalid = 9001,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidParams => "Invalid parameters",
            Self::ValueOutOfRange => "Value is outside the acceptable range",
            Self::UnknownType => "Unknown type",
            Self::TypeNotRegistered => "Type is not registered",
            Self::AlreadyRegistered => "Type is already registered",
            Self::MaxNotFound => "Max not found",
            Self::ReferenceSetNotFound => "Reference set not found",
            Self::RpeChartRequired => "RPE chart is required",
            Self::ResourceNotFound => "Resource not found",
            Self::LookupFailed => "External lookup failed",
            Self::SerializationError => "Serialization failed",
            Self::ConfigInvalid => "Configuration is invalid",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid parameters (missing identity, malformed configuration)
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    /// Field-range validation failure
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Unparseable enum value
    pub fn unknown_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownType, message)
    }

    /// Discriminator without a registered constructor
    pub fn type_not_registered(family: &str, discriminator: &str) -> Self {
        Self::new(
            ErrorCode::TypeNotRegistered,
            format!("{family} type '{discriminator}' is not registered"),
        )
    }

    /// Duplicate registration of a discriminator
    pub fn already_registered(family: &str, discriminator: &str) -> Self {
        Self::new(
            ErrorCode::AlreadyRegistered,
            format!("{family} type '{discriminator}' is already registered"),
        )
    }

    /// Requested max does not exist
    pub fn max_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MaxNotFound, message)
    }

    /// Reference set has not been logged
    pub fn reference_set_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ReferenceSetNotFound, message)
    }

    /// RPE chart missing for an RPE-driven calculation
    pub fn rpe_chart_required() -> Self {
        Self::new(
            ErrorCode::RpeChartRequired,
            "no RPE chart available from lookup context or environment",
        )
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Wrap a failure from an injected lookup
    pub fn lookup_failed(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(ErrorCode::LookupFailed, context).with_source(source)
    }

    /// Serialization failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
