// ABOUTME: MRS (max-rep sets) variable scheme accumulating reps toward a volume target
// ABOUTME: Stops on the target, on a set under the rep minimum, or at the set cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    accumulation_decision, next_set_number, previous_set, validate_base_weight,
    validate_positive, validate_set_count, GeneratedSet, NextSetDecision, SetGenerationContext,
    SetScheme, TerminationContext, VariableSetScheme,
};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use liftplan_core::constants::set_scheme::DEFAULT_MAX_SETS;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

const fn default_num_sets() -> u32 {
    DEFAULT_MAX_SETS
}

/// Max-rep sets at one weight until `target_total_reps` accumulate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MrsScheme {
    /// Cumulative rep target
    pub target_total_reps: u32,
    /// A set below this ends the scheme early
    pub min_reps_per_set: u32,
    /// Per-set rep target shown to the lifter
    pub max_reps_per_set: u32,
    /// Safety cap on set count
    #[serde(default = "default_num_sets")]
    pub num_sets: u32,
}

impl MrsScheme {
    /// Discriminator
    pub const TYPE: &'static str = "MRS";

    /// Build with the default set cap
    #[must_use]
    pub const fn new(target_total_reps: u32, min_reps_per_set: u32, max_reps_per_set: u32) -> Self {
        Self {
            target_total_reps,
            min_reps_per_set,
            max_reps_per_set,
            num_sets: DEFAULT_MAX_SETS,
        }
    }

    /// Replace the set cap
    #[must_use]
    pub const fn with_num_sets(mut self, num_sets: u32) -> Self {
        self.num_sets = num_sets;
        self
    }
}

impl SetScheme for MrsScheme {
    fn scheme_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_positive("targetTotalReps", self.target_total_reps)?;
        validate_positive("minRepsPerSet", self.min_reps_per_set)?;
        validate_set_count("numSets", self.num_sets)?;
        if self.max_reps_per_set < self.min_reps_per_set {
            return Err(AppError::out_of_range(format!(
                "maxRepsPerSet ({}) must be at least minRepsPerSet ({})",
                self.max_reps_per_set, self.min_reps_per_set
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
        Ok(vec![
            GeneratedSet::work(1, base_weight, self.max_reps_per_set).provisional(),
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

impl VariableSetScheme for MrsScheme {
    fn generate_next_set(
        &self,
        ctx: &SetGenerationContext,
        history: &[GeneratedSet],
        termination: &TerminationContext,
    ) -> AppResult<NextSetDecision> {
        self.validate()?;
        let previous = previous_set(history, termination)?;
        let next = GeneratedSet::work(
            next_set_number(history),
            previous.weight,
            self.max_reps_per_set,
        )
        .provisional();

        Ok(accumulation_decision(
            Self::TYPE,
            self.target_total_reps,
            Some(self.min_reps_per_set),
            ctx.effective_cap(self.num_sets),
            next,
            termination,
        ))
    }
}
