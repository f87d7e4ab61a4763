// ABOUTME: TAPER decorator scaling another load strategy by days until competition
// ABOUTME: Owns one wrapped strategy and a tiered days-out to multiplier curve
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Taper decorator.
//!
//! The first tier whose `days_out` threshold exceeds the supplied days-out value
//! selects the multiplier. Past the last tier the multiplier is 1.0. With
//! `maintain_intensity` set the wrapped load is returned untouched, for
//! programs that taper by cutting volume instead of intensity.

use super::{LoadCalculationParams, LoadEnvironment, LoadStrategy};
use crate::errors::{AppError, AppResult};
use crate::registry::StrategyFactory;
use liftplan_core::constants::taper::DEFAULT_CURVE;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::any::Any;
use tracing::debug;

/// One tier of a taper curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaperTier {
    /// Applies while days out is below this threshold
    pub days_out: u32,
    /// Load multiplier in `(0, 1]`
    pub multiplier: f64,
}

/// Default curve: `{7: 0.5, 14: 0.6, 21: 0.7, 28: 0.8, 35: 0.9}`
#[must_use]
pub fn default_taper_curve() -> Vec<TaperTier> {
    DEFAULT_CURVE
        .iter()
        .map(|&(days_out, multiplier)| TaperTier {
            days_out,
            multiplier,
        })
        .collect()
}

/// Wire form; `baseStrategy` stays raw until the factory decodes it
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaperPayload {
    base_strategy: Option<Value>,
    #[serde(default = "default_taper_curve")]
    taper_curve: Vec<TaperTier>,
    #[serde(default)]
    maintain_intensity: bool,
}

/// Taper decorator
#[derive(Debug)]
pub struct TaperStrategy {
    base: Box<dyn LoadStrategy>,
    taper_curve: Vec<TaperTier>,
    maintain_intensity: bool,
}

impl TaperStrategy {
    /// Discriminator
    pub const TYPE: &'static str = "TAPER";

    /// Wrap `base` with the default curve
    #[must_use]
    pub fn new(base: Box<dyn LoadStrategy>) -> Self {
        Self {
            base,
            taper_curve: default_taper_curve(),
            maintain_intensity: false,
        }
    }

    /// Replace the curve
    #[must_use]
    pub fn with_curve(mut self, taper_curve: Vec<TaperTier>) -> Self {
        self.taper_curve = taper_curve;
        self
    }

    /// Keep intensity and let the caller cut volume instead
    #[must_use]
    pub const fn with_maintain_intensity(mut self, maintain_intensity: bool) -> Self {
        self.maintain_intensity = maintain_intensity;
        self
    }

    /// Wrapped strategy
    #[must_use]
    pub fn base(&self) -> &dyn LoadStrategy {
        self.base.as_ref()
    }

    /// Curve tiers
    #[must_use]
    pub fn taper_curve(&self) -> &[TaperTier] {
        &self.taper_curve
    }

    /// Whether the multiply is suppressed
    #[must_use]
    pub const fn maintain_intensity(&self) -> bool {
        self.maintain_intensity
    }

    /// Multiplier for `days_out`; negative values clamp to zero
    #[must_use]
    pub fn multiplier_for(&self, days_out: i32) -> f64 {
        let days_out = days_out.max(0).unsigned_abs();
        self.taper_curve
            .iter()
            .find(|tier| tier.days_out > days_out)
            .map_or(1.0, |tier| tier.multiplier)
    }

    /// Factory constructor; decodes `baseStrategy` through the same factory
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` without a base strategy, the base strategy's
    /// decoding error, or a validation error for the curve
    pub fn from_payload(
        payload: &Value,
        factory: &StrategyFactory,
    ) -> AppResult<Box<dyn LoadStrategy>> {
        let wire: TaperPayload = serde_json::from_value(payload.clone())?;
        let base_payload = wire
            .base_strategy
            .ok_or_else(|| AppError::invalid_params("TAPER requires a baseStrategy"))?;
        let base = factory.load_strategy_from_value(&base_payload)?;

        let strategy = Self::new(base)
            .with_curve(wire.taper_curve)
            .with_maintain_intensity(wire.maintain_intensity);
        strategy.validate()?;
        Ok(Box::new(strategy))
    }
}

impl LoadStrategy for TaperStrategy {
    fn strategy_type(&self) -> &'static str {
        Self::TYPE
    }

    fn validate(&self) -> AppResult<()> {
        for tier in &self.taper_curve {
            if !tier.multiplier.is_finite() || tier.multiplier <= 0.0 || tier.multiplier > 1.0 {
                return Err(AppError::out_of_range(format!(
                    "taper multiplier must be in (0, 1], got {}",
                    tier.multiplier
                )));
            }
        }
        if self
            .taper_curve
            .windows(2)
            .any(|pair| pair[0].days_out >= pair[1].days_out)
        {
            return Err(AppError::invalid_params(
                "taper curve thresholds must be strictly ascending",
            ));
        }
        self.base.validate()
    }

    fn calculate_load(
        &self,
        params: &LoadCalculationParams<'_>,
        env: &LoadEnvironment<'_>,
    ) -> AppResult<f64> {
        self.validate()?;
        let base_load = self.base.calculate_load(params, env)?;

        if self.maintain_intensity {
            return Ok(base_load);
        }
        let Some(days_out) = params.days_out else {
            return Ok(base_load);
        };

        let multiplier = self.multiplier_for(days_out);
        let load = base_load * multiplier;
        debug!(
            base = self.base.strategy_type(),
            base_load,
            days_out,
            multiplier,
            load,
            "applied taper"
        );
        Ok(load)
    }

    fn to_payload(&self) -> AppResult<Value> {
        Ok(json!({
            "type": Self::TYPE,
            "baseStrategy": self.base.to_payload()?,
            "taperCurve": self.taper_curve,
            "maintainIntensity": self.maintain_intensity,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
