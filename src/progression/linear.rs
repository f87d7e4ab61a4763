// ABOUTME: LINEAR_PROGRESSION adding a fixed increment whenever its trigger fires
// ABOUTME: The simplest progression; typically AFTER_SESSION or AFTER_CYCLE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{precheck, validate_increment, Progression, ProgressionContext, ProgressionResult};
use crate::errors::AppResult;
use crate::registry::tagged_payload;
use liftplan_core::models::{MaxType, TriggerType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use tracing::info;

const fn default_trigger() -> TriggerType {
    TriggerType::AfterSession
}

/// `+increment` on every `trigger_type` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearProgression {
    /// Max adjusted
    pub max_type: MaxType,
    /// Amount added per trigger
    pub increment: f64,
    /// Trigger listened to
    #[serde(default = "default_trigger")]
    pub trigger_type: TriggerType,
}

impl LinearProgression {
    /// Discriminator
    pub const TYPE: &'static str = "LINEAR_PROGRESSION";

    /// Build
    #[must_use]
    pub const fn new(max_type: MaxType, increment: f64, trigger_type: TriggerType) -> Self {
        Self {
            max_type,
            increment,
            trigger_type,
        }
    }
}

impl Progression for LinearProgression {
    fn progression_type(&self) -> &'static str {
        Self::TYPE
    }

    fn trigger_types(&self) -> Vec<TriggerType> {
        vec![self.trigger_type]
    }

    fn max_type(&self) -> MaxType {
        self.max_type
    }

    fn validate(&self) -> AppResult<()> {
        validate_increment("increment", self.increment)
    }

    fn apply(&self, ctx: &ProgressionContext) -> AppResult<ProgressionResult> {
        self.validate()?;
        if let Some(skipped) = precheck(self, ctx)? {
            return Ok(skipped);
        }

        let result = ProgressionResult::adjusted(
            ctx,
            self.increment,
            format!("+{} after {}", self.increment, self.trigger_type),
        );
        info!(
            user_id = %ctx.user_id,
            lift_id = %ctx.lift_id,
            max_type = %self.max_type,
            previous = result.previous_value,
            new_value = result.new_value,
            "linear progression applied"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::test_support::context;

    #[test]
    fn test_adds_increment_on_trigger() {
        let progression = LinearProgression::new(MaxType::TrainingMax, 5.0, TriggerType::AfterCycle);
        let result = progression
            .apply(&context(MaxType::TrainingMax, 300.0, TriggerType::AfterCycle))
            .unwrap();
        assert!(result.applied);
        assert!((result.new_value - 305.0).abs() < f64::EPSILON);
        assert!((result.delta - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mismatches_are_not_applied() {
        let progression = LinearProgression::new(MaxType::TrainingMax, 5.0, TriggerType::AfterCycle);
        let wrong_trigger = progression
            .apply(&context(MaxType::TrainingMax, 300.0, TriggerType::AfterSet))
            .unwrap();
        assert!(!wrong_trigger.applied);
        assert!((wrong_trigger.new_value - 300.0).abs() < f64::EPSILON);

        let wrong_max = progression
            .apply(&context(MaxType::OneRm, 300.0, TriggerType::AfterCycle))
            .unwrap();
        assert!(!wrong_max.applied);
    }
}
