// ABOUTME: Shared domain models for max types, trigger types, rounding, and lookup results
// ABOUTME: Enums serialize as SCREAMING_SNAKE_CASE to match persisted strategy payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of reference max a prescription is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaxType {
    /// True tested one-rep max
    #[serde(rename = "ONE_RM")]
    OneRm,
    /// Conservative training max (typically 85-90% of 1RM)
    TrainingMax,
    /// Estimated one-rep max derived from a sub-maximal performance
    #[serde(rename = "E1RM")]
    E1rm,
}

impl MaxType {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneRm => "ONE_RM",
            Self::TrainingMax => "TRAINING_MAX",
            Self::E1rm => "E1RM",
        }
    }
}

impl fmt::Display for MaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaxType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ONE_RM" | "1RM" => Ok(Self::OneRm),
            "TRAINING_MAX" | "TM" => Ok(Self::TrainingMax),
            "E1RM" => Ok(Self::E1rm),
            other => Err(AppError::unknown_type(format!(
                "Unknown max type: '{other}'. Valid options: ONE_RM, TRAINING_MAX, E1RM"
            ))),
        }
    }
}

/// Event that can drive a progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    /// A single set was logged
    AfterSet,
    /// A training session was completed
    AfterSession,
    /// A program week rolled over
    AfterWeek,
    /// A program cycle rolled over
    AfterCycle,
    /// The lifter failed to meet a prescription
    OnFailure,
}

impl TriggerType {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AfterSet => "AFTER_SET",
            Self::AfterSession => "AFTER_SESSION",
            Self::AfterWeek => "AFTER_WEEK",
            Self::AfterCycle => "AFTER_CYCLE",
            Self::OnFailure => "ON_FAILURE",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction used when snapping a weight to a plate increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingDirection {
    /// Round half away from zero
    #[default]
    Nearest,
    /// Floor
    Down,
    /// Ceiling
    Up,
}

impl RoundingDirection {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "NEAREST",
            Self::Down => "DOWN",
            Self::Up => "UP",
        }
    }
}

impl FromStr for RoundingDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEAREST" => Ok(Self::Nearest),
            "DOWN" => Ok(Self::Down),
            "UP" => Ok(Self::Up),
            other => Err(AppError::unknown_type(format!(
                "Unknown rounding direction: '{other}'. Valid options: NEAREST, DOWN, UP"
            ))),
        }
    }
}

/// Current max returned by a max lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxValue {
    /// Max weight
    pub value: f64,
    /// When this max became effective
    pub effective_date: DateTime<Utc>,
}

/// A set already logged in a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedSetResult {
    /// Weight lifted
    pub weight: f64,
    /// Reps completed
    pub reps: u32,
    /// Reported RPE, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

/// Check that a target rep count lies in the supported range
///
/// # Errors
///
/// Returns `ValueOutOfRange` when `reps` is outside `[1, 12]`
pub fn validate_target_reps(reps: u32) -> AppResult<()> {
    use crate::constants::rpe::{MAX_TARGET_REPS, MIN_TARGET_REPS};
    if !(MIN_TARGET_REPS..=MAX_TARGET_REPS).contains(&reps) {
        return Err(AppError::out_of_range(format!(
            "target reps must be between {MIN_TARGET_REPS} and {MAX_TARGET_REPS}, got {reps}"
        )));
    }
    Ok(())
}

/// Check that an RPE lies in `[7.0, 10.0]` on a 0.5 grid
///
/// # Errors
///
/// Returns `ValueOutOfRange` for off-grid or out-of-range values
pub fn validate_target_rpe(rpe: f64) -> AppResult<()> {
    use crate::constants::rpe::{MAX_RPE, MIN_RPE, RPE_STEP};
    let steps = rpe / RPE_STEP;
    if !rpe.is_finite() || !(MIN_RPE..=MAX_RPE).contains(&rpe) || (steps - steps.round()).abs() > 1e-9
    {
        return Err(AppError::out_of_range(format!(
            "target RPE must be in {MIN_RPE:.1}..={MAX_RPE:.1} in {RPE_STEP} steps, got {rpe}"
        )));
    }
    Ok(())
}
