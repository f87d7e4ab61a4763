// ABOUTME: PERCENT_OF load strategy prescribing a percentage of a reference max
// ABOUTME: Applies lookup-context modifiers to the configured percentage before rounding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{validate_percentage, LoadCalculationParams, LoadEnvironment, LoadStrategy};
use crate::errors::AppResult;
use crate::registry::tagged_payload;
use crate::rounding::RoundingSpec;
use liftplan_core::models::MaxType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::debug;

/// Percentage of a one-rep, training, or estimated max
///
/// `percentage` is expressed in percent (85.0 means 85%). Values above 100 are
/// allowed for overload work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentOfStrategy {
    /// Which max the percentage applies to
    pub reference_type: MaxType,
    /// Percentage in percent
    pub percentage: f64,
    /// Rounding applied to the final weight
    #[serde(flatten)]
    pub rounding: RoundingSpec,
}

impl PercentOfStrategy {
    /// Discriminator
    pub const TYPE: &'static str = "PERCENT_OF";

    /// Build with default rounding
    #[must_use]
    pub fn new(reference_type: MaxType, percentage: f64) -> Self {
        Self {
            reference_type,
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

impl LoadStrategy for PercentOfStrategy {
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

        let max = env.fetch_max(params.user_id, params.lift_id, self.reference_type)?;
        let percentage = params
            .lookup
            .map_or(self.percentage, |ctx| ctx.apply_modifiers(self.percentage));
        let load = self.rounding.apply(max * percentage / 100.0)?;

        debug!(
            lift_id = %params.lift_id,
            reference = %self.reference_type,
            max,
            percentage,
            load,
            "calculated percent-of load"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::InMemoryMaxLookup;
    use crate::lookup::{LookupContext, WeeklyLookup, WeeklyLookupEntry};
    use liftplan_core::models::RoundingDirection;
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn test_eighty_five_percent_of_training_max() {
        let (user, lift) = (Uuid::new_v4(), Uuid::new_v4());
        let maxes = InMemoryMaxLookup::new();
        maxes.set_max(user, lift, MaxType::TrainingMax, 315.0);
        let env = LoadEnvironment::new().with_max_lookup(&maxes);

        let strategy = PercentOfStrategy::new(MaxType::TrainingMax, 85.0)
            .with_rounding(RoundingSpec::new(5.0, RoundingDirection::Nearest));
        let load = strategy
            .calculate_load(&LoadCalculationParams::new(user, lift), &env)
            .unwrap();
        assert!((load - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_percentages_override_base() {
        let (user, lift) = (Uuid::new_v4(), Uuid::new_v4());
        let maxes = InMemoryMaxLookup::new();
        maxes.set_max(user, lift, MaxType::TrainingMax, 300.0);
        let env = LoadEnvironment::new().with_max_lookup(&maxes);
        let ctx = LookupContext::new(3, 3).with_weekly(Arc::new(WeeklyLookup {
            entries: vec![WeeklyLookupEntry {
                week_number: 3,
                percentages: vec![75.0, 85.0, 95.0],
                reps: vec![5, 3, 1],
                percentage_modifier: None,
            }],
        }));

        let strategy = PercentOfStrategy::new(MaxType::TrainingMax, 65.0);
        let params = LoadCalculationParams::new(user, lift).with_lookup(&ctx);
        let load = strategy.calculate_load(&params, &env).unwrap();
        assert!((load - 285.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_percentage() {
        assert!(PercentOfStrategy::new(MaxType::OneRm, 0.0).validate().is_err());
        assert!(PercentOfStrategy::new(MaxType::OneRm, 105.0).validate().is_ok());
    }
}
