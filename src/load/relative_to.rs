// ABOUTME: RELATIVE_TO load strategy prescribing a percentage of a set logged earlier in the session
// ABOUTME: Used for back-off sets that key off the weight actually lifted on a top set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{validate_percentage, LoadCalculationParams, LoadEnvironment, LoadStrategy};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use crate::rounding::RoundingSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::debug;

/// Percentage of the weight logged at `reference_set_index` in the same session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeToStrategy {
    /// 0-based index of the reference set for this lift
    pub reference_set_index: u32,
    /// Percentage in percent
    pub percentage: f64,
    /// Rounding applied to the final weight
    #[serde(flatten)]
    pub rounding: RoundingSpec,
}

impl RelativeToStrategy {
    /// Discriminator
    pub const TYPE: &'static str = "RELATIVE_TO";

    /// Build with default rounding
    #[must_use]
    pub fn new(reference_set_index: u32, percentage: f64) -> Self {
        Self {
            reference_set_index,
            percentage,
            rounding: RoundingSpec::default(),
        }
    }

    /// Replace the rounding spec
    #[must_use]
    pub const fn with_rounding(mut self, rounding: RoundingSpec) -> Self {
        self.rounding = rounding;
        self
    }
}

impl LoadStrategy for RelativeToStrategy {
    fn strategy_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_percentage(self.percentage)?;
        self.rounding.validate()
    }

    fn calculate_load(
        &self,
        params: &LoadCalculationParams<'_>,
        env: &LoadEnvironment<'_>,
    ) -> AppResult<f64> {
        self.validate()?;
        params.validate()?;
        let session_id = params
            .session_id
            .ok_or_else(|| AppError::invalid_params("session id is required for RELATIVE_TO"))?;

        let reference =
            env.fetch_logged_set(session_id, params.lift_id, self.reference_set_index)?;
        let load = self.rounding.apply(reference.weight * self.percentage / 100.0)?;

        debug!(
            %session_id,
            reference_index = self.reference_set_index,
            reference_weight = reference.weight,
            load,
            "calculated relative load"
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
