// ABOUTME: RPE_TARGET load strategy prescribing a weight for target reps at a target RPE
// ABOUTME: Resolves the RPE chart from the lookup context first, then the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{LoadCalculationParams, LoadEnvironment, LoadStrategy};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use crate::rounding::RoundingSpec;
use crate::rpe::RpeChart;
use liftplan_core::models::{validate_target_reps, validate_target_rpe, MaxType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::debug;

/// Weight for `target_reps` at `target_rpe`, always relative to the 1RM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpeTargetStrategy {
    /// Target reps in `[1, 12]`
    pub target_reps: u32,
    /// Target RPE in `[7.0, 10.0]`, 0.5 steps
    pub target_rpe: f64,
    /// Rounding applied to the final weight
    #[serde(flatten)]
    pub rounding: RoundingSpec,
}

impl RpeTargetStrategy {
    /// Discriminator
    pub const TYPE: &'static str = "RPE_TARGET";

    /// Build with default rounding
    #[must_use]
    pub fn new(target_reps: u32, target_rpe: f64) -> Self {
        Self {
            target_reps,
            target_rpe,
            rounding: RoundingSpec::default(),
        }
    }

    /// Replace the rounding spec
    #[must_use]
    pub const fn with_rounding(mut self, rounding: RoundingSpec) -> Self {
        self.rounding = rounding;
        self
    }

    fn resolve_chart<'a>(
        params: &'a LoadCalculationParams<'_>,
        env: &'a LoadEnvironment<'_>,
    ) -> AppResult<&'a RpeChart> {
        params
            .lookup
            .and_then(|ctx| ctx.rpe_chart.as_deref())
            .or(env.rpe_chart)
            .ok_or_else(AppError::rpe_chart_required)
    }
}

impl LoadStrategy for RpeTargetStrategy {
    fn strategy_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_target_reps(self.target_reps)?;
        validate_target_rpe(self.target_rpe)?;
        self.rounding.validate()
    }

    fn calculate_load(
        &self,
        params: &LoadCalculationParams<'_>,
        env: &LoadEnvironment<'_>,
    ) -> AppResult<f64> {
        self.validate()?;
        params.validate()?;

        let chart = Self::resolve_chart(params, env)?;
        let fraction = chart.get_percentage(self.target_reps, self.target_rpe)?;
        let one_rm = env.fetch_max(params.user_id, params.lift_id, MaxType::OneRm)?;
        let load = self.rounding.apply(one_rm * fraction)?;

        debug!(
            lift_id = %params.lift_id,
            one_rm,
            reps = self.target_reps,
            rpe = self.target_rpe,
            fraction,
            load,
            "calculated RPE target load"
        );
        Ok(load)
    }

    fn to_payload(&self) -> AppResult<Value> {
        tagged_payload(Self::TYPE, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
