// ABOUTME: TOTAL_REPS variable scheme accumulating reps with no per-set minimum
// ABOUTME: Any rep count is accepted; only the total or the set cap ends it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    accumulation_decision, next_set_number, previous_set, validate_base_weight,
    validate_positive, validate_set_count, GeneratedSet, NextSetDecision, SetGenerationContext,
    SetScheme, TerminationContext, VariableSetScheme,
};
use crate::errors::AppResult;
use crate::registry::tagged_payload;
use liftplan_core::constants::set_scheme::DEFAULT_MAX_SETS;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

const fn default_max_sets() -> u32 {
    DEFAULT_MAX_SETS
}

/// Accumulate `target_total_reps` in as many sets as it takes
///
/// Unlike [`super::MrsScheme`] a small set never ends the scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRepsScheme {
    /// Cumulative rep target
    pub target_total_reps: u32,
    /// Suggested reps per set
    pub suggested_reps: u32,
    /// Safety cap on set count
    #[serde(default = "default_max_sets")]
    pub max_sets: u32,
}

impl TotalRepsScheme {
    /// Discriminator
    pub const TYPE: &'static str = "TOTAL_REPS";

    /// Build with the default set cap
    #[must_use]
    pub const fn new(target_total_reps: u32, suggested_reps: u32) -> Self {
        Self {
            target_total_reps,
            suggested_reps,
            max_sets: DEFAULT_MAX_SETS,
        }
    }

    /// Replace the set cap
    #[must_use]
    pub const fn with_max_sets(mut self, max_sets: u32) -> Self {
        self.max_sets = max_sets;
        self
    }
}

impl SetScheme for TotalRepsScheme {
    fn scheme_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_positive("targetTotalReps", self.target_total_reps)?;
        validate_positive("suggestedReps", self.suggested_reps)?;
        validate_set_count("maxSets", self.max_sets)
    }

    fn generate_sets(
        &self,
        base_weight: f64,
        _ctx: &SetGenerationContext,
    ) -> AppResult<Vec<GeneratedSet>> {
        self.validate()?;
        validate_base_weight(base_weight)?;
        Ok(vec![
            GeneratedSet::work(1, base_weight, self.suggested_reps).provisional(),
        ])
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

impl VariableSetScheme for TotalRepsScheme {
    fn generate_next_set(
        &self,
        ctx: &SetGenerationContext,
        history: &[GeneratedSet],
        termination: &TerminationContext,
    ) -> AppResult<NextSetDecision> {
        self.validate()?;
        let previous = previous_set(history, termination)?;
        let next = GeneratedSet::work(next_set_number(history), previous.weight, self.suggested_reps)
            .provisional();

        Ok(accumulation_decision(
            Self::TYPE,
            self.target_total_reps,
            None,
            ctx.effective_cap(self.max_sets),
            next,
            termination,
        ))
    }
}
