// ABOUTME: GREYSKULL composite set scheme: fixed sets followed by AMRAP sets
// ABOUTME: Defaults to the classic 2x5 plus 1x5+ layout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    validate_base_weight, validate_positive, validate_set_count, GeneratedSet,
    SetGenerationContext, SetScheme,
};
use crate::errors::{AppError, AppResult};
use crate::registry::tagged_payload;
use liftplan_core::constants::set_scheme::{GREYSKULL_DEFAULT, MAX_PRESCRIBED_SETS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;

/// `fixed_sets` x `fixed_reps`, then `amrap_sets` x `min_amrap_reps`+
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreySkullScheme {
    /// Leading straight sets; may be zero
    pub fixed_sets: u32,
    /// Reps per straight set
    pub fixed_reps: u32,
    /// Trailing AMRAP sets
    pub amrap_sets: u32,
    /// Rep floor on each AMRAP set
    pub min_amrap_reps: u32,
}

impl Default for GreySkullScheme {
    fn default() -> Self {
        let (fixed_sets, fixed_reps, amrap_sets, min_amrap_reps) = GREYSKULL_DEFAULT;
        Self {
            fixed_sets,
            fixed_reps,
            amrap_sets,
            min_amrap_reps,
        }
    }
}

impl GreySkullScheme {
    /// Discriminator
    pub const TYPE: &'static str = "GREYSKULL";
}

impl SetScheme for GreySkullScheme {
    fn scheme_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        if self.fixed_sets > 0 {
            validate_positive("fixedReps", self.fixed_reps)?;
        }
        validate_set_count("amrapSets", self.amrap_sets)?;
        validate_positive("minAmrapReps", self.min_amrap_reps)?;
        let total = self.fixed_sets.saturating_add(self.amrap_sets);
        if total > MAX_PRESCRIBED_SETS {
            return Err(AppError::out_of_range(format!(
                "fixedSets + amrapSets must be at most {MAX_PRESCRIBED_SETS}, got {total}"
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

        let fixed = (1..=self.fixed_sets)
            .map(|set_number| GeneratedSet::work(set_number, base_weight, self.fixed_reps));
        let amrap = (1..=self.amrap_sets).map(|offset| {
            GeneratedSet::work(self.fixed_sets + offset, base_weight, self.min_amrap_reps).amrap()
        });
        Ok(fixed.chain(amrap).collect())
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

    #[test]
    fn test_default_layout() {
        let sets = GreySkullScheme::default()
            .generate_sets(135.0, &SetGenerationContext::default())
            .unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(
            sets.iter().map(|set| set.is_amrap).collect::<Vec<_>>(),
            [false, false, true]
        );
        assert_eq!(
            sets.iter().map(|set| set.set_number).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert!(sets.iter().all(|set| (set.weight - 135.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_requires_amrap_set() {
        let scheme = GreySkullScheme {
            amrap_sets: 0,
            ..GreySkullScheme::default()
        };
        assert!(scheme.validate().is_err());
    }

    #[test]
    fn test_rejects_runaway_set_counts() {
        let huge_fixed = GreySkullScheme {
            fixed_sets: u32::MAX,
            ..GreySkullScheme::default()
        };
        assert_eq!(huge_fixed.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
        assert!(huge_fixed
            .generate_sets(135.0, &SetGenerationContext::default())
            .is_err());

        let huge_amrap = GreySkullScheme {
            amrap_sets: MAX_PRESCRIBED_SETS + 1,
            ..GreySkullScheme::default()
        };
        assert_eq!(huge_amrap.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }
}
