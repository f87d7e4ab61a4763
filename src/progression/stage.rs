// ABOUTME: STAGE_PROGRESSION stepping through rep-scheme stages when the lifter fails
// ABOUTME: Exhausting the last stage resets to the first, optionally with a deload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Stage-based failure handling (GZCLP style).
//!
//! Stages are ordered from least to most forgiving. A failure moves the lifter
//! to the next stage at the same weight. Failing the final stage either starts
//! over at stage 0 (with an optional deload) or, when `reset_on_exhaustion`
//! is off, leaves everything untouched for a coach to intervene.
//!
//! The stage index lives outside this value: callers persist
//! [`super::StageChange::to`] and rebuild with [`StageProgression::with_current_stage`].

use super::{
    precheck, validate_fraction, Progression, ProgressionContext, ProgressionResult,
};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use liftplan_core::constants::progression::DEFAULT_DELOAD_PERCENT;
use liftplan_core::models::{MaxType, TriggerType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::{info, warn};

/// One rep scheme in the stage list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Display name, e.g. `5x3+`
    pub name: String,
    /// Sets
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
    /// Final set is AMRAP
    #[serde(default, rename = "isAMRAP")]
    pub is_amrap: bool,
    /// Minimum total reps for the stage to count as completed
    #[serde(default)]
    pub min_volume: u32,
}

impl Stage {
    /// Build a straight-sets stage
    #[must_use]
    pub fn new(name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            is_amrap: false,
            min_volume: 0,
        }
    }

    /// Mark the final set as AMRAP
    #[must_use]
    pub const fn amrap(mut self) -> Self {
        self.is_amrap = true;
        self
    }
}

const fn default_true() -> bool {
    true
}

const fn default_deload_percent() -> f64 {
    DEFAULT_DELOAD_PERCENT
}

/// Ordered stages with a current index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgression {
    /// Max adjusted on reset
    pub max_type: MaxType,
    /// Stages, first to last
    pub stages: Vec<Stage>,
    /// Index into `stages`
    #[serde(default)]
    pub current_stage: usize,
    /// Start over after the last stage instead of stopping
    #[serde(default = "default_true")]
    pub reset_on_exhaustion: bool,
    /// Deload when starting over
    #[serde(default)]
    pub deload_on_reset: bool,
    /// Fraction removed on a deloading reset
    #[serde(default = "default_deload_percent")]
    pub deload_percent: f64,
}

impl StageProgression {
    /// Discriminator
    pub const TYPE: &'static str = "STAGE_PROGRESSION";

    /// Build at stage 0, resetting without a deload
    #[must_use]
    pub const fn new(max_type: MaxType, stages: Vec<Stage>) -> Self {
        Self {
            max_type,
            stages,
            current_stage: 0,
            reset_on_exhaustion: true,
            deload_on_reset: false,
            deload_percent: DEFAULT_DELOAD_PERCENT,
        }
    }

    /// Position at `current_stage`
    #[must_use]
    pub const fn with_current_stage(mut self, current_stage: usize) -> Self {
        self.current_stage = current_stage;
        self
    }

    /// Configure exhaustion handling
    #[must_use]
    pub fn with_reset(mut self, reset_on_exhaustion: bool, deload_percent: Option<f64>) -> Self {
        self.reset_on_exhaustion = reset_on_exhaustion;
        if let Some(percent) = deload_percent {
            self.deload_on_reset = true;
            self.deload_percent = percent;
        } else {
            self.deload_on_reset = false;
        }
        self
    }

    /// Stage currently prescribed
    #[must_use]
    pub fn stage(&self) -> Option<&Stage> {
        self.stages.get(self.current_stage)
    }

    fn is_last_stage(&self) -> bool {
        self.current_stage + 1 >= self.stages.len()
    }
}

impl Progression for StageProgression {
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
        if self.stages.is_empty() {
            return Err(AppError::invalid_params("at least one stage is required"));
        }
        if self.current_stage >= self.stages.len() {
            return Err(AppError::out_of_range(format!(
                "currentStage {} is out of range for {} stages",
                self.current_stage,
                self.stages.len()
            )));
        }
        if let Some(stage) = self.stages.iter().find(|stage| stage.sets == 0 || stage.reps == 0) {
            return Err(AppError::out_of_range(format!(
                "stage '{}' needs at least one set and one rep",
                stage.name
            )));
        }
        validate_fraction("deloadPercent", self.deload_percent)
    }

    fn apply(&self, ctx: &ProgressionContext) -> AppResult<ProgressionResult> {
        self.validate()?;
        if let Some(skipped) = precheck(self, ctx)? {
            return Ok(skipped);
        }

        let from = self.current_stage;
        if !self.is_last_stage() {
            let to = from + 1;
            info!(user_id = %ctx.user_id, lift_id = %ctx.lift_id, from, to, "advanced stage");
            return Ok(ProgressionResult::adjusted(
                ctx,
                0.0,
                format!("advanced to stage {} ({})", to, self.stages[to].name),
            )
            .with_stage_change(from, to));
        }

        if !self.reset_on_exhaustion {
            warn!(
                user_id = %ctx.user_id,
                lift_id = %ctx.lift_id,
                "all stages exhausted, manual intervention required"
            );
            return Ok(ProgressionResult::skipped(
                ctx,
                "all stages exhausted; manual intervention required",
            ));
        }

        let (delta, reason) = if self.deload_on_reset {
            (
                -self.deload_percent * ctx.current_value,
                format!(
                    "stages exhausted; reset to stage 0 with {}% deload",
                    self.deload_percent * 100.0
                ),
            )
        } else {
            (0.0, "stages exhausted; reset to stage 0".to_owned())
        };
        let result = ProgressionResult::adjusted(ctx, delta, reason).with_stage_change(from, 0);
        info!(
            user_id = %ctx.user_id,
            lift_id = %ctx.lift_id,
            previous = result.previous_value,
            new_value = result.new_value,
            "stage progression reset"
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
