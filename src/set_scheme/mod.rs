// ABOUTME: SetScheme traits, generated-set model, and the shared termination state machine
// ABOUTME: Fixed schemes emit all sets up front; variable schemes decide set by set from live data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Set Scheme Module
//!
//! A set scheme turns a prescribed weight into concrete sets. Two shapes exist:
//!
//! - **Deterministic** (`FIXED`, `AMRAP`, `GREYSKULL`): every set is known up
//!   front and [`SetScheme::generate_sets`] returns them all.
//! - **Variable** (`MRS`, `FATIGUE_DROP`, `TOTAL_REPS`): only the first set is
//!   known. After each logged set the session layer calls
//!   [`VariableSetScheme::generate_next_set`] with the sets generated so far and
//!   a [`TerminationContext`] summarizing actual performance, and receives a
//!   [`NextSetDecision`].
//!
//! Sets emitted by variable schemes are provisional until the scheme stops.

/// AMRAP sets with a minimum rep target on the final set
pub mod amrap;
/// Fatigue-drop (RTS style) weight drops until a stop RPE
pub mod fatigue_drop;
/// Fixed sets x reps
pub mod fixed;
/// GreySkull fixed sets followed by AMRAP sets
pub mod greyskull;
/// Max-rep sets accumulating toward a rep target
pub mod mrs;
/// Rep-total accumulation without a per-set minimum
pub mod total_reps;

pub use amrap::AmrapScheme;
pub use fatigue_drop::FatigueDropScheme;
pub use fixed::FixedScheme;
pub use greyskull::GreySkullScheme;
pub use mrs::MrsScheme;
pub use total_reps::TotalRepsScheme;

use crate::config::EngineConfig;
use crate::errors::{AppError, AppResult};
use liftplan_core::constants::rounding::DEFAULT_INCREMENT;
use liftplan_core::constants::set_scheme::{DEFAULT_MAX_VARIABLE_SETS, MAX_PRESCRIBED_SETS};
use liftplan_core::models::LoggedSetResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use tracing::debug;

/// One prescribed set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSet {
    /// 1-based set number
    pub set_number: u32,
    /// Prescribed weight
    pub weight: f64,
    /// Target reps (a minimum when `is_amrap`)
    pub target_reps: u32,
    /// Counts toward working volume
    pub is_work_set: bool,
    /// Total set count not yet known
    pub is_provisional: bool,
    /// As many reps as possible; `target_reps` is a floor, not a cap
    pub is_amrap: bool,
}

impl GeneratedSet {
    /// Deterministic work set
    #[must_use]
    pub const fn work(set_number: u32, weight: f64, target_reps: u32) -> Self {
        Self {
            set_number,
            weight,
            target_reps,
            is_work_set: true,
            is_provisional: false,
            is_amrap: false,
        }
    }

    /// Mark as AMRAP
    #[must_use]
    pub const fn amrap(mut self) -> Self {
        self.is_amrap = true;
        self
    }

    /// Mark as provisional
    #[must_use]
    pub const fn provisional(mut self) -> Self {
        self.is_provisional = true;
        self
    }
}

/// Engine-level settings a scheme needs while generating sets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetGenerationContext {
    /// Increment used when a scheme derives new weights (`FATIGUE_DROP`)
    pub rounding_increment: f64,
    /// Global ceiling applied on top of each variable scheme's own cap
    pub max_sets_ceiling: u32,
}

impl Default for SetGenerationContext {
    fn default() -> Self {
        Self {
            rounding_increment: DEFAULT_INCREMENT,
            max_sets_ceiling: DEFAULT_MAX_VARIABLE_SETS,
        }
    }
}

impl SetGenerationContext {
    /// Context derived from engine configuration
    #[must_use]
    pub const fn from_config(config: &EngineConfig) -> Self {
        Self {
            rounding_increment: config.default_rounding.increment,
            max_sets_ceiling: config.max_variable_sets,
        }
    }

    /// Effective cap for a scheme-level limit
    #[must_use]
    pub fn effective_cap(&self, scheme_cap: u32) -> u32 {
        scheme_cap.min(self.max_sets_ceiling)
    }
}

/// Performance summary after the most recent logged set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminationContext {
    /// Sets logged so far
    pub total_sets: u32,
    /// Reps logged so far
    pub total_reps: u32,
    /// Reps on the most recent set
    pub last_reps: u32,
    /// RPE reported on the most recent set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rpe: Option<f64>,
    /// Per-set rep target
    pub target_reps: u32,
}

impl TerminationContext {
    /// Summarize logged sets
    #[must_use]
    pub fn from_logged_sets(sets: &[LoggedSetResult], target_reps: u32) -> Self {
        let last = sets.last();
        Self {
            total_sets: u32::try_from(sets.len()).unwrap_or(u32::MAX),
            total_reps: sets.iter().map(|set| set.reps).sum(),
            last_reps: last.map_or(0, |set| set.reps),
            last_rpe: last.and_then(|set| set.rpe),
            target_reps,
        }
    }
}

/// Outcome of asking a variable scheme for the next set
#[derive(Debug, Clone, PartialEq)]
pub struct NextSetDecision {
    /// Set to perform next, when continuing
    pub next_set: Option<GeneratedSet>,
    /// Whether another set should be performed
    pub should_continue: bool,
    /// Why the scheme stopped
    pub termination_reason: Option<String>,
}

impl NextSetDecision {
    /// Continue with `set`
    #[must_use]
    pub const fn continue_with(set: GeneratedSet) -> Self {
        Self {
            next_set: Some(set),
            should_continue: true,
            termination_reason: None,
        }
    }

    /// Stop for `reason`
    #[must_use]
    pub fn stop(reason: impl Into<String>) -> Self {
        Self {
            next_set: None,
            should_continue: false,
            termination_reason: Some(reason.into()),
        }
    }
}

/// Reason reported when a safety cap ends a variable scheme
pub const SAFETY_LIMIT_REASON: &str = "Maximum sets reached (safety limit)";

/// Scheme that lays out the sets for an exercise
pub trait SetScheme: fmt::Debug + Send + Sync {
    /// Discriminator used for persistence
    fn scheme_type(&self) -> &'static str;

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first invalid field
    fn validate(&self) -> AppResult<()>;

    /// Sets known up front; a variable scheme returns only its first set
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration or a negative weight
    fn generate_sets(
        &self,
        base_weight: f64,
        ctx: &SetGenerationContext,
    ) -> AppResult<Vec<GeneratedSet>>;

    /// Variable-count view of this scheme, if it has one
    fn as_variable(&self) -> Option<&dyn VariableSetScheme> {
        None
    }

    /// Whether the total set count depends on performance
    fn is_variable_count(&self) -> bool {
        self.as_variable().is_some()
    }

    /// Tagged JSON payload including the `type` discriminator
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails
    fn to_payload(&self) -> AppResult<Value>;

    /// Downcasting hook for callers that need the concrete variant
    fn as_any(&self) -> &dyn Any;
}

/// Scheme whose set count is decided set by set
pub trait VariableSetScheme: SetScheme {
    /// Decide whether to continue and, if so, with which set
    ///
    /// `history` holds the sets generated so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when `history` is empty or inconsistent with
    /// `termination`, or a configuration error
    fn generate_next_set(
        &self,
        ctx: &SetGenerationContext,
        history: &[GeneratedSet],
        termination: &TerminationContext,
    ) -> AppResult<NextSetDecision>;
}

pub(crate) fn validate_base_weight(weight: f64) -> AppResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::out_of_range(format!(
            "base weight must be non-negative, got {weight}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_positive(field: &str, value: u32) -> AppResult<()> {
    if value == 0 {
        return Err(AppError::out_of_range(format!("{field} must be at least 1")));
    }
    Ok(())
}

/// Set counts run from 1 to [`MAX_PRESCRIBED_SETS`]
pub(crate) fn validate_set_count(field: &str, value: u32) -> AppResult<()> {
    validate_positive(field, value)?;
    if value > MAX_PRESCRIBED_SETS {
        return Err(AppError::out_of_range(format!(
            "{field} must be at most {MAX_PRESCRIBED_SETS}, got {value}"
        )));
    }
    Ok(())
}

/// Previous set from history, required before any continuation decision
pub(crate) fn previous_set<'h>(
    history: &'h [GeneratedSet],
    termination: &TerminationContext,
) -> AppResult<&'h GeneratedSet> {
    if termination.total_sets == 0 {
        return Err(AppError::invalid_params(
            "no set has been logged yet; use generate_sets for the first set",
        ));
    }
    history
        .last()
        .ok_or_else(|| AppError::invalid_params("set history is empty"))
}

pub(crate) fn next_set_number(history: &[GeneratedSet]) -> u32 {
    u32::try_from(history.len()).map_or(u32::MAX, |len| len.saturating_add(1))
}

/// Accumulate reps toward `target_total`, optionally failing under `min_reps`
///
/// Checks, in order: target reached, per-set minimum missed (only while the
/// target is still short), safety cap.
pub(crate) fn accumulation_decision(
    scheme: &str,
    target_total: u32,
    min_reps: Option<u32>,
    cap: u32,
    next: GeneratedSet,
    termination: &TerminationContext,
) -> NextSetDecision {
    let decision = if termination.total_reps >= target_total {
        NextSetDecision::stop(format!(
            "Target total reps reached ({}/{target_total})",
            termination.total_reps
        ))
    } else if let Some(min) = min_reps.filter(|&min| termination.last_reps < min) {
        NextSetDecision::stop(format!(
            "Failed to hit minimum reps ({}/{min})",
            termination.last_reps
        ))
    } else if termination.total_sets >= cap {
        NextSetDecision::stop(SAFETY_LIMIT_REASON)
    } else {
        NextSetDecision::continue_with(next)
    };

    debug!(
        scheme,
        total_sets = termination.total_sets,
        total_reps = termination.total_reps,
        should_continue = decision.should_continue,
        reason = decision.termination_reason.as_deref().unwrap_or(""),
        "variable scheme decision"
    );
    decision
}
