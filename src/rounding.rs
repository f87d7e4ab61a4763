// ABOUTME: Rounding policy that snaps raw weights to loadable plate increments
// ABOUTME: Supports NEAREST, DOWN, and UP directions with a serde-friendly RoundingSpec
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use liftplan_core::constants::rounding::{DEFAULT_INCREMENT, SNAP_TOLERANCE};
use liftplan_core::models::RoundingDirection;
use serde::{Deserialize, Serialize};

/// Round a weight to a multiple of `increment`
///
/// A weight of exactly zero short-circuits to zero.
///
/// # Errors
///
/// Returns `ValueOutOfRange` if `weight` is negative or not finite, or if
/// `increment` is not a positive finite number
pub fn round_weight(weight: f64, increment: f64, direction: RoundingDirection) -> AppResult<f64> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::out_of_range(format!(
            "weight must be a non-negative number, got {weight}"
        )));
    }
    if !increment.is_finite() || increment <= 0.0 {
        return Err(AppError::out_of_range(format!(
            "rounding increment must be positive, got {increment}"
        )));
    }
    if weight.abs() < f64::EPSILON {
        return Ok(0.0);
    }

    let quotient = weight / increment;
    let snapped = quotient.round();
    let steps = if (quotient - snapped).abs() < SNAP_TOLERANCE {
        snapped
    } else {
        match direction {
            RoundingDirection::Nearest => snapped,
            RoundingDirection::Down => quotient.floor(),
            RoundingDirection::Up => quotient.ceil(),
        }
    };

    Ok(steps * increment)
}

/// Increment and direction carried by every rounding-aware strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundingSpec {
    /// Plate increment (> 0)
    #[serde(rename = "roundingIncrement", default = "default_increment")]
    pub increment: f64,
    /// Rounding direction
    #[serde(rename = "roundingDirection", default)]
    pub direction: RoundingDirection,
}

fn default_increment() -> f64 {
    DEFAULT_INCREMENT
}

impl Default for RoundingSpec {
    fn default() -> Self {
        Self {
            increment: DEFAULT_INCREMENT,
            direction: RoundingDirection::Nearest,
        }
    }
}

impl RoundingSpec {
    /// Build a spec
    #[must_use]
    pub const fn new(increment: f64, direction: RoundingDirection) -> Self {
        Self {
            increment,
            direction,
        }
    }

    /// Check the increment
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when the increment is not positive
    pub fn validate(&self) -> AppResult<()> {
        if !self.increment.is_finite() || self.increment <= 0.0 {
            return Err(AppError::out_of_range(format!(
                "rounding increment must be positive, got {}",
                self.increment
            )));
        }
        Ok(())
    }

    /// Round `weight` with this spec
    ///
    /// # Errors
    ///
    /// See [`round_weight`]
    pub fn apply(&self, weight: f64) -> AppResult<f64> {
        round_weight(weight, self.increment, self.direction)
    }
}
