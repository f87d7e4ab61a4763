// ABOUTME: FIXED set scheme emitting N identical sets of R reps
// ABOUTME: The plain sets x reps prescription used by most accessory work
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    validate_base_weight, validate_positive, validate_set_count, GeneratedSet,
    SetGenerationContext, SetScheme,
};
use crate::errors::AppResult;
use crate::registry::tagged_payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

/// `sets` x `reps` at one weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedScheme {
    /// Number of sets
    pub sets: u32,
    /// Reps per set
    pub reps: u32,
}

impl FixedScheme {
    /// Discriminator
    pub const TYPE: &'static str = "FIXED";

    /// Build
    #[must_use]
    pub const fn new(sets: u32, reps: u32) -> Self {
        Self { sets, reps }
    }
}

impl SetScheme for FixedScheme {
    fn scheme_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_set_count("sets", self.sets)?;
        validate_positive("reps", self.reps)
    }

    fn generate_sets(
        &self,
        base_weight: f64,
        _ctx: &SetGenerationContext,
    ) -> AppResult<Vec<GeneratedSet>> {
        self.validate()?;
        validate_base_weight(base_weight)?;
        Ok((1..=self.sets)
            .map(|set_number| GeneratedSet::work(set_number, base_weight, self.reps))
            .collect())
    }

    fn to_payload(&self) -> AppResult<Value> {
        tagged_payload(Self::TYPE, self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use liftplan_core::constants::set_scheme::MAX_PRESCRIBED_SETS;

    #[test]
    fn test_set_count_is_capped() {
        assert!(FixedScheme::new(MAX_PRESCRIBED_SETS, 5).validate().is_ok());
        let err = FixedScheme::new(u32::MAX, 5)
            .generate_sets(225.0, &SetGenerationContext::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_five_by_five() {
        let sets = FixedScheme::new(5, 5)
            .generate_sets(225.0, &SetGenerationContext::default())
            .unwrap();
        assert_eq!(sets.len(), 5);
        assert!(sets.iter().all(|set| set.target_reps == 5 && set.is_work_set));
        assert!(sets.iter().all(|set| !set.is_provisional && !set.is_amrap));
        assert_eq!(sets.last().map(|set| set.set_number), Some(5));
    }

    #[test]
    fn test_rejects_zero_sets_and_negative_weight() {
        let ctx = SetGenerationContext::default();
        assert!(FixedScheme::new(0, 5).generate_sets(100.0, &ctx).is_err());
        assert!(FixedScheme::new(3, 5).generate_sets(-1.0, &ctx).is_err());
    }
}
