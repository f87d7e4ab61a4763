// ABOUTME: GREYSKULL_PROGRESSION adjusting a max from the reps on an AMRAP set
// ABOUTME: Deload below the minimum, single increment in range, double increment above threshold
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    precheck, validate_fraction, validate_increment, Progression, ProgressionContext,
    ProgressionResult,
};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use liftplan_core::constants::progression::{
    DEFAULT_DELOAD_PERCENT, GREYSKULL_DOUBLE_THRESHOLD, GREYSKULL_INCREMENT, GREYSKULL_MIN_REPS,
};
use liftplan_core::models::{MaxType, TriggerType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::info;

const fn default_increment() -> f64 {
    GREYSKULL_INCREMENT
}

const fn default_min_reps() -> u32 {
    GREYSKULL_MIN_REPS
}

const fn default_double_threshold() -> u32 {
    GREYSKULL_DOUBLE_THRESHOLD
}

const fn default_deload_percent() -> f64 {
    DEFAULT_DELOAD_PERCENT
}

/// Three-band AMRAP progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreySkullProgression {
    /// Max adjusted
    pub max_type: MaxType,
    /// Single increment
    #[serde(default = "default_increment")]
    pub weight_increment: f64,
    /// Fewer AMRAP reps than this deloads
    #[serde(default = "default_min_reps")]
    pub min_reps: u32,
    /// This many AMRAP reps or more earns a double increment
    #[serde(default = "default_double_threshold")]
    pub double_threshold: u32,
    /// Fraction removed on a deload
    #[serde(default = "default_deload_percent")]
    pub deload_percent: f64,
}

impl GreySkullProgression {
    /// Discriminator
    pub const TYPE: &'static str = "GREYSKULL_PROGRESSION";

    /// Build with the standard 2.5 / 5 / 10 / 10% settings
    #[must_use]
    pub const fn new(max_type: MaxType) -> Self {
        Self {
            max_type,
            weight_increment: GREYSKULL_INCREMENT,
            min_reps: GREYSKULL_MIN_REPS,
            double_threshold: GREYSKULL_DOUBLE_THRESHOLD,
            deload_percent: DEFAULT_DELOAD_PERCENT,
        }
    }
}

impl Progression for GreySkullProgression {
    fn progression_type(&self) -> &'static str {
        Self::TYPE
    }

    fn trigger_types(&self) -> Vec<TriggerType> {
        vec![TriggerType::AfterSet]
    }

    fn max_type(&self) -> MaxType {
        self.max_type
    }

    fn validate(&self) -> AppResult<()> {
        validate_increment("weightIncrement", self.weight_increment)?;
        if self.min_reps == 0 {
            return Err(AppError::out_of_range("minReps must be at least 1"));
        }
        if self.double_threshold <= self.min_reps {
            return Err(AppError::out_of_range(format!(
                "doubleThreshold ({}) must exceed minReps ({})",
                self.double_threshold, self.min_reps
            )));
        }
        validate_fraction("deloadPercent", self.deload_percent)
    }

    fn apply(&self, ctx: &ProgressionContext) -> AppResult<ProgressionResult> {
        self.validate()?;
        if let Some(skipped) = precheck(self, ctx)? {
            return Ok(skipped);
        }
        if !ctx.trigger.is_amrap {
            return Ok(ProgressionResult::skipped(ctx, "not an AMRAP set"));
        }
        let Some(reps) = ctx.trigger.reps_performed else {
            return Ok(ProgressionResult::skipped(ctx, "no reps recorded for AMRAP set"));
        };

        let (delta, reason) = if reps < self.min_reps {
            (
                -self.deload_percent * ctx.current_value,
                format!("{reps} reps below minimum {}; deload", self.min_reps),
            )
        } else if reps < self.double_threshold {
            (self.weight_increment, format!("{reps} reps; +{}", self.weight_increment))
        } else {
            (
                2.0 * self.weight_increment,
                format!("{reps} reps; double increment +{}", 2.0 * self.weight_increment),
            )
        };

        let result = ProgressionResult::adjusted(ctx, delta, reason);
        info!(
            user_id = %ctx.user_id,
            lift_id = %ctx.lift_id,
            reps,
            previous = result.previous_value,
            new_value = result.new_value,
            "greyskull progression applied"
        );
        Ok(result)
    }

    fn to_payload(&self) -> AppResult<Value> {
        tagged_payload(Self::TYPE, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
