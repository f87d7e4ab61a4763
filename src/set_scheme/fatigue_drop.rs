// ABOUTME: FATIGUE_DROP variable scheme dropping weight each set until a stop RPE is hit
// ABOUTME: Each drop rounds down to the configured increment so the lifter never overshoots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! RTS-style fatigue drops.
//!
//! The first set is performed at the base weight until `start_rpe`. Each
//! following set drops by `drop_percent` (a fraction, `0.05` = 5%) and the
//! scheme ends once a logged set reaches `stop_rpe`.

use super::{
    next_set_number, previous_set, validate_base_weight, validate_positive, validate_set_count,
    GeneratedSet, NextSetDecision, SetGenerationContext, SetScheme, TerminationContext, VariableSetScheme,
    SAFETY_LIMIT_REASON,
};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use crate::rounding::round_weight;
use liftplan_core::constants::set_scheme::DEFAULT_MAX_SETS;
use liftplan_core::models::{validate_target_rpe, RoundingDirection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::{debug, warn};

const fn default_max_sets() -> u32 {
    DEFAULT_MAX_SETS
}

/// Drop sets until fatigue reaches `stop_rpe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueDropScheme {
    /// Reps per set
    pub reps: u32,
    /// RPE the first set is worked up to
    pub start_rpe: f64,
    /// RPE that ends the scheme
    pub stop_rpe: f64,
    /// Per-set drop as a fraction in `(0, 1)`
    pub drop_percent: f64,
    /// Safety cap on set count
    #[serde(default = "default_max_sets")]
    pub max_sets: u32,
}

impl FatigueDropScheme {
    /// Discriminator
    pub const TYPE: &'static str = "FATIGUE_DROP";

    /// Build with the default set cap
    #[must_use]
    pub const fn new(reps: u32, start_rpe: f64, stop_rpe: f64, drop_percent: f64) -> Self {
        Self {
            reps,
            start_rpe,
            stop_rpe,
            drop_percent,
            max_sets: DEFAULT_MAX_SETS,
        }
    }

    /// Replace the set cap
    #[must_use]
    pub const fn with_max_sets(mut self, max_sets: u32) -> Self {
        self.max_sets = max_sets;
        self
    }

    /// Weight of the set after one at `previous`
    ///
    /// # Errors
    ///
    /// Returns a rounding error for an invalid increment
    pub fn dropped_weight(&self, previous: f64, increment: f64) -> AppResult<f64> {
        round_weight(
            previous * (1.0 - self.drop_percent),
            increment,
            RoundingDirection::Down,
        )
    }
}

impl SetScheme for FatigueDropScheme {
    fn scheme_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_positive("reps", self.reps)?;
        validate_set_count("maxSets", self.max_sets)?;
        validate_target_rpe(self.start_rpe)?;
        validate_target_rpe(self.stop_rpe)?;
        if self.stop_rpe < self.start_rpe {
            return Err(AppError::out_of_range(format!(
                "stopRpe ({}) must not be below startRpe ({})",
                self.stop_rpe, self.start_rpe
            )));
        }
        if !self.drop_percent.is_finite() || self.drop_percent <= 0.0 || self.drop_percent >= 1.0 {
            return Err(AppError::out_of_range(format!(
                "dropPercent must be a fraction in (0, 1), got {}",
                self.drop_percent
            )));
        }
        Ok(())
    }

    fn generate_sets(
        &self,
        base_weight: f64,
        _ctx: &SetGenerationContext,
    ) -> AppResult<Vec<GeneratedSet>> {
        self.validate()?;
        validate_base_weight(base_weight)?;
        Ok(vec![GeneratedSet::work(1, base_weight, self.reps).provisional()])
    }

    fn as_variable(&self) -> Option<&dyn VariableSetScheme> {
        Some(self)
    }

    fn to_payload(&self) -> AppResult<Value> {
        tagged_payload(Self::TYPE, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl VariableSetScheme for FatigueDropScheme {
    fn generate_next_set(
        &self,
        ctx: &SetGenerationContext,
        history: &[GeneratedSet],
        termination: &TerminationContext,
    ) -> AppResult<NextSetDecision> {
        self.validate()?;
        let previous = previous_set(history, termination)?;

        match termination.last_rpe {
            Some(rpe) if rpe >= self.stop_rpe => {
                debug!(rpe, stop_rpe = self.stop_rpe, "fatigue drop reached stop RPE");
                return Ok(NextSetDecision::stop(format!(
                    "Target RPE reached ({rpe:.1}/{:.1})",
                    self.stop_rpe
                )));
            }
            Some(_) => {}
            None => warn!(
                set_number = previous.set_number,
                "no RPE logged for fatigue drop set, continuing"
            ),
        }

        if termination.total_sets >= ctx.effective_cap(self.max_sets) {
            return Ok(NextSetDecision::stop(SAFETY_LIMIT_REASON));
        }

        let weight = self.dropped_weight(previous.weight, ctx.rounding_increment)?;
        debug!(previous = previous.weight, weight, "fatigue drop");
        Ok(NextSetDecision::continue_with(
            GeneratedSet::work(next_set_number(history), weight, self.reps).provisional(),
        ))
    }
}
