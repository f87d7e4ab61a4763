// ABOUTME: AMRAP set scheme whose final set is taken to failure above a rep floor
// ABOUTME: Leading sets are plain work sets at the minimum rep count
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

/// `sets` sets at `min_reps`, the last one as many reps as possible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmrapScheme {
    /// Number of sets
    pub sets: u32,
    /// Rep floor; on the final set a minimum rather than a target
    pub min_reps: u32,
}

impl AmrapScheme {
    /// Discriminator
    pub const TYPE: &'static str = "AMRAP";

    /// Build
    #[must_use]
    pub const fn new(sets: u32, min_reps: u32) -> Self {
        Self { sets, min_reps }
    }
}

impl SetScheme for AmrapScheme {
    fn scheme_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        validate_set_count("sets", self.sets)?;
        validate_positive("minReps", self.min_reps)
    }

    fn generate_sets(
        &self,
        base_weight: f64,
        _ctx: &SetGenerationContext,
    ) -> AppResult<Vec<GeneratedSet>> {
        self.validate()?;
        validate_base_weight(base_weight)?;
        Ok((1..=self.sets)
            .map(|set_number| {
                let set = GeneratedSet::work(set_number, base_weight, self.min_reps);
                if set_number == self.sets {
                    set.amrap()
                } else {
                    set
                }
            })
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

    #[test]
    fn test_zero_or_runaway_sets_rejected() {
        assert_eq!(AmrapScheme::new(0, 5).validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
        assert_eq!(
            AmrapScheme::new(u32::MAX, 5).validate().unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn test_only_final_set_is_amrap() {
        let sets = AmrapScheme::new(3, 5)
            .generate_sets(185.0, &SetGenerationContext::default())
            .unwrap();
        let flags: Vec<bool> = sets.iter().map(|set| set.is_amrap).collect();
        assert_eq!(flags, [false, false, true]);
        assert!(sets.iter().all(|set| set.is_work_set && set.target_reps == 5));
    }
}
