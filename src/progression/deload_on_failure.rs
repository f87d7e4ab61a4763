// ABOUTME: DELOAD_ON_FAILURE reducing a max once a failure streak reaches a threshold
// ABOUTME: Deloads by a percentage or a fixed amount and never below zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    precheck, validate_fraction, Progression, ProgressionContext, ProgressionResult,
};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use liftplan_core::constants::progression::{DEFAULT_DELOAD_PERCENT, DEFAULT_FAILURE_THRESHOLD};
use liftplan_core::models::{MaxType, TriggerType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::{debug, info};

/// How a deload amount is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeloadType {
    /// Fraction of the current max
    #[default]
    Percent,
    /// Fixed amount
    Fixed,
}

const fn default_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

const fn default_deload_percent() -> f64 {
    DEFAULT_DELOAD_PERCENT
}

const fn default_true() -> bool {
    true
}

/// Deload after `failure_threshold` consecutive failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeloadOnFailure {
    /// Max adjusted
    pub max_type: MaxType,
    /// Streak length that triggers a deload
    #[serde(default = "default_threshold")]
    pub failure_threshold: u32,
    /// Percent or fixed
    #[serde(default)]
    pub deload_type: DeloadType,
    /// Fraction removed for `PERCENT`
    #[serde(default = "default_deload_percent")]
    pub deload_percent: f64,
    /// Amount removed for `FIXED`
    #[serde(default)]
    pub deload_amount: f64,
    /// Whether the caller should zero the failure streak after a deload
    #[serde(default = "default_true")]
    pub reset_on_deload: bool,
}

impl DeloadOnFailure {
    /// Discriminator
    pub const TYPE: &'static str = "DELOAD_ON_FAILURE";

    /// Percentage deload with default threshold
    #[must_use]
    pub const fn percent(max_type: MaxType, deload_percent: f64) -> Self {
        Self {
            max_type,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            deload_type: DeloadType::Percent,
            deload_percent,
            deload_amount: 0.0,
            reset_on_deload: true,
        }
    }

    /// Fixed-amount deload with default threshold
    #[must_use]
    pub const fn fixed(max_type: MaxType, deload_amount: f64) -> Self {
        Self {
            max_type,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            deload_type: DeloadType::Fixed,
            deload_percent: DEFAULT_DELOAD_PERCENT,
            deload_amount,
            reset_on_deload: true,
        }
    }

    /// Replace the threshold
    #[must_use]
    pub const fn with_threshold(mut self, failure_threshold: u32) -> Self {
        self.failure_threshold = failure_threshold;
        self
    }

    /// Whether the caller should reset its failure counter after `result`
    #[must_use]
    pub const fn should_reset_failure_counter(&self, result: &ProgressionResult) -> bool {
        result.applied && self.reset_on_deload
    }
}

impl Progression for DeloadOnFailure {
    fn progression_type(&self) -> &'static str {
        Self::TYPE
    }

    fn trigger_types(&self) -> Vec<TriggerType> {
        vec![TriggerType::OnFailure]
    }

    fn max_type(&self) -> MaxType {
        self.max_type
    }

    fn validate(&self) -> AppResult<()> {
        if self.failure_threshold == 0 {
            return Err(AppError::out_of_range("failureThreshold must be at least 1"));
        }
        match self.deload_type {
            DeloadType::Percent => validate_fraction("deloadPercent", self.deload_percent),
            DeloadType::Fixed => {
                if !self.deload_amount.is_finite() || self.deload_amount <= 0.0 {
                    return Err(AppError::out_of_range(format!(
                        "deloadAmount must be positive, got {}",
                        self.deload_amount
                    )));
                }
                Ok(())
            }
        }
    }

    fn apply(&self, ctx: &ProgressionContext) -> AppResult<ProgressionResult> {
        self.validate()?;
        if let Some(skipped) = precheck(self, ctx)? {
            return Ok(skipped);
        }

        let failures = ctx.trigger.consecutive_failures;
        if failures < self.failure_threshold {
            debug!(failures, threshold = self.failure_threshold, "deload threshold not reached");
            return Ok(ProgressionResult::skipped(
                ctx,
                format!(
                    "{failures} of {} consecutive failures",
                    self.failure_threshold
                ),
            ));
        }

        let (delta, reason) = match self.deload_type {
            DeloadType::Percent => (
                -self.deload_percent * ctx.current_value,
                format!(
                    "deload {}% after {failures} consecutive failures",
                    self.deload_percent * 100.0
                ),
            ),
            DeloadType::Fixed => (
                -self.deload_amount,
                format!(
                    "deload {} after {failures} consecutive failures",
                    self.deload_amount
                ),
            ),
        };
        let result = ProgressionResult::adjusted(ctx, delta, reason);
        info!(
            user_id = %ctx.user_id,
            lift_id = %ctx.lift_id,
            previous = result.previous_value,
            new_value = result.new_value,
            "deload applied"
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
