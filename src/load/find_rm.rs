// ABOUTME: FIND_RM load strategy for rep-max discovery sets
// ABOUTME: Returns a zero sentinel so the lifter chooses the weight for the target reps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{LoadCalculationParams, LoadEnvironment, LoadStrategy};
use crate::errors::AppResult;
use crate::registry::tagged_payload;
use liftplan_core::models::validate_target_reps;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

/// Work up to a rep max; the engine prescribes no weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindRmStrategy {
    /// Rep max being sought, in `[1, 12]`
    pub target_reps: u32,
}

impl FindRmStrategy {
    /// Discriminator
    pub const TYPE: &'static str = "FIND_RM";

    /// Weight returned to mean "user decides"
    pub const USER_DECIDES: f64 = 0.0;

    /// Build
    #[must_use]
    pub const fn new(target_reps: u32) -> Self {
        Self { target_reps }
    }
}

impl LoadStrategy for FindRmStrategy {
    fn strategy_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_target_reps(self.target_reps)
    }

    fn calculate_load(
        &self,
        params: &LoadCalculationParams<'_>,
        _env: &LoadEnvironment<'_>,
    ) -> AppResult<f64> {
        self.validate()?;
        params.validate()?;
        Ok(Self::USER_DECIDES)
    }

    fn to_payload(&self) -> AppResult<Value> {
        tagged_payload(Self::TYPE, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
