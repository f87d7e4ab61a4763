// ABOUTME: Progression trait, trigger events, and results for adjusting stored max values
// ABOUTME: Variants react to a supplied trigger; mismatches are reported as not applied
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Progression Module
//!
//! A progression inspects a [`ProgressionContext`] (the current max plus the
//! [`TriggerEvent`] that just fired) and returns a [`ProgressionResult`]
//! describing how the max should change. Progressions never persist anything:
//! the caller stores the new value, any [`StageChange`], and the
//! [`FailureCounter`] it keeps per (user, lift, progression).
//!
//! A trigger the progression does not listen to, or a context for a different
//! max type, is not an error. The result comes back with `applied == false`
//! and a reason.

/// Failure-streak bookkeeping
pub mod failure_counter;
/// Deload after consecutive failures
pub mod deload_on_failure;
/// GreySkull AMRAP-driven increments
pub mod greyskull;
/// Fixed increment per trigger
pub mod linear;
/// Rep-scheme stages advanced on failure
pub mod stage;

pub use deload_on_failure::{DeloadOnFailure, DeloadType};
pub use failure_counter::{FailureCounter, FailureCounterKey};
pub use greyskull::GreySkullProgression;
pub use linear::LinearProgression;
pub use stage::{Stage, StageProgression};

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use liftplan_core::models::{MaxType, TriggerType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// The event a progression reacts to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    /// What happened
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Reps on the set that fired the trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_performed: Option<u32>,
    /// Whether that set was AMRAP
    #[serde(default, rename = "isAMRAP")]
    pub is_amrap: bool,
    /// Failure streak including this event
    #[serde(default)]
    pub consecutive_failures: u32,
}

impl TriggerEvent {
    /// Event of `trigger_type` at `timestamp`
    #[must_use]
    pub const fn new(trigger_type: TriggerType, timestamp: DateTime<Utc>) -> Self {
        Self {
            trigger_type,
            timestamp,
            reps_performed: None,
            is_amrap: false,
            consecutive_failures: 0,
        }
    }

    /// Attach the reps performed
    #[must_use]
    pub const fn with_reps(mut self, reps: u32) -> Self {
        self.reps_performed = Some(reps);
        self
    }

    /// Mark the triggering set as AMRAP
    #[must_use]
    pub const fn amrap(mut self) -> Self {
        self.is_amrap = true;
        self
    }

    /// Attach the current failure streak
    #[must_use]
    pub const fn with_consecutive_failures(mut self, failures: u32) -> Self {
        self.consecutive_failures = failures;
        self
    }
}

/// Everything a progression sees when it is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionContext {
    /// Lifter
    pub user_id: Uuid,
    /// Lift whose max is adjusted
    pub lift_id: Uuid,
    /// Which max the caller loaded
    pub max_type: MaxType,
    /// Current value of that max
    pub current_value: f64,
    /// Event being processed
    pub trigger: TriggerEvent,
}

impl ProgressionContext {
    /// Check identity and value
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` for nil identifiers and `ValueOutOfRange` for a
    /// negative or non-finite current value
    pub fn validate(&self) -> AppResult<()> {
        if self.user_id.is_nil() {
            return Err(AppError::invalid_params("user id is required"));
        }
        if self.lift_id.is_nil() {
            return Err(AppError::invalid_params("lift id is required"));
        }
        if !self.current_value.is_finite() || self.current_value < 0.0 {
            return Err(AppError::out_of_range(format!(
                "current max must be non-negative, got {}",
                self.current_value
            )));
        }
        Ok(())
    }
}

/// Stage index transition the caller must persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageChange {
    /// Index before
    pub from: usize,
    /// Index after
    pub to: usize,
}

/// Outcome of applying a progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionResult {
    /// Whether the max (or stage) changed
    pub applied: bool,
    /// Max before
    pub previous_value: f64,
    /// Signed change
    pub delta: f64,
    /// Max after, never negative
    pub new_value: f64,
    /// Human-readable explanation
    pub reason: String,
    /// Stage transition, for stage-based progressions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_change: Option<StageChange>,
}

impl ProgressionResult {
    /// Nothing changed
    #[must_use]
    pub fn skipped(ctx: &ProgressionContext, reason: impl Into<String>) -> Self {
        Self {
            applied: false,
            previous_value: ctx.current_value,
            delta: 0.0,
            new_value: ctx.current_value,
            reason: reason.into(),
            stage_change: None,
        }
    }

    /// Apply `delta`, clamping the new value at zero
    #[must_use]
    pub fn adjusted(ctx: &ProgressionContext, delta: f64, reason: impl Into<String>) -> Self {
        let new_value = (ctx.current_value + delta).max(0.0);
        Self {
            applied: true,
            previous_value: ctx.current_value,
            delta: new_value - ctx.current_value,
            new_value,
            reason: reason.into(),
            stage_change: None,
        }
    }

    /// Attach a stage transition
    #[must_use]
    pub fn with_stage_change(mut self, from: usize, to: usize) -> Self {
        self.stage_change = Some(StageChange { from, to });
        self
    }
}

/// Rule that adjusts a stored max in response to a trigger
pub trait Progression: fmt::Debug + Send + Sync {
    /// Discriminator used for persistence
    fn progression_type(&self) -> &'static str;

    /// Triggers this progression reacts to
    fn trigger_types(&self) -> Vec<TriggerType>;

    /// Max type this progression adjusts
    fn max_type(&self) -> MaxType;

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first invalid field
    fn validate(&self) -> AppResult<()>;

    /// Evaluate against `ctx`
    ///
    /// # Errors
    ///
    /// Returns an error only for invalid configuration or context; an
    /// inapplicable trigger yields `applied == false`
    fn apply(&self, ctx: &ProgressionContext) -> AppResult<ProgressionResult>;

    /// Tagged JSON payload including the `type` discriminator
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails
    fn to_payload(&self) -> AppResult<Value>;

    /// Downcasting hook for callers that need the concrete variant
    fn as_any(&self) -> &dyn Any;
}

/// Validate `ctx` and report why `progression` does not apply to it, if so
pub(crate) fn precheck(
    progression: &dyn Progression,
    ctx: &ProgressionContext,
) -> AppResult<Option<ProgressionResult>> {
    ctx.validate()?;
    if !progression.trigger_types().contains(&ctx.trigger.trigger_type) {
        return Ok(Some(ProgressionResult::skipped(
            ctx,
            format!(
                "{} does not react to {}",
                progression.progression_type(),
                ctx.trigger.trigger_type
            ),
        )));
    }
    if progression.max_type() != ctx.max_type {
        return Ok(Some(ProgressionResult::skipped(
            ctx,
            format!(
                "{} adjusts {}, not {}",
                progression.progression_type(),
                progression.max_type(),
                ctx.max_type
            ),
        )));
    }
    Ok(None)
}

pub(crate) fn validate_fraction(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(AppError::out_of_range(format!(
            "{field} must be a fraction in [0, 1), got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_increment(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::out_of_range(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{ProgressionContext, TriggerEvent};
    use chrono::Utc;
    use liftplan_core::models::{MaxType, TriggerType};
    use uuid::Uuid;

    pub fn context(max_type: MaxType, current_value: f64, trigger: TriggerType) -> ProgressionContext {
        ProgressionContext {
            user_id: Uuid::new_v4(),
            lift_id: Uuid::new_v4(),
            max_type,
            current_value,
            trigger: TriggerEvent::new(trigger, Utc::now()),
        }
    }
}
