// ABOUTME: Validated reps/RPE to percent-of-max chart and estimated one-rep max calculator
// ABOUTME: Inverts chart lookups to estimate a max from an actual sub-maximal performance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! RPE Chart Module
//!
//! An [`RpeChart`] maps an exact `(target reps, target RPE)` pair to the fraction
//! of a one-rep max that pairing represents. Entries are validated on
//! construction: reps in `[1, 12]`, RPE in `[7.0, 10.0]` on a 0.5 grid, and
//! percentages in `[0, 1]`.
//!
//! [`E1rmCalculator`] runs the chart backwards: given a weight lifted for a
//! number of reps at a reported RPE it estimates the one-rep max, always
//! rounded to the nearest 2.5.

use crate::errors::{AppError, AppResult};
use crate::rounding::round_weight;
use liftplan_core::constants::rounding::E1RM_INCREMENT;
use liftplan_core::constants::rpe::{
    MAX_RPE, MAX_TARGET_REPS, MIN_RPE, MIN_TARGET_REPS, RPE_STEP, STANDARD_CHART_PERCENTAGES,
};
use liftplan_core::models::{validate_target_reps, validate_target_rpe, RoundingDirection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One cell of an RPE chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpeChartEntry {
    /// Target reps in `[1, 12]`
    pub target_reps: u32,
    /// Target RPE in `{7.0, 7.5, ..., 10.0}`
    pub target_rpe: f64,
    /// Fraction of one-rep max in `[0, 1]`
    pub percentage: f64,
}

impl RpeChartEntry {
    /// Validate ranges
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for any field outside its range
    pub fn validate(&self) -> AppResult<()> {
        validate_target_reps(self.target_reps)?;
        validate_target_rpe(self.target_rpe)?;
        if !self.percentage.is_finite() || !(0.0..=1.0).contains(&self.percentage) {
            return Err(AppError::out_of_range(format!(
                "RPE chart percentage must be between 0 and 1, got {}",
                self.percentage
            )));
        }
        Ok(())
    }
}

/// RPE values are keyed in half steps so they can be hashed exactly
fn rpe_key(rpe: f64) -> u32 {
    (rpe / RPE_STEP).round() as u32
}

/// Validated chart of reps/RPE percentages
#[derive(Debug, Clone, PartialEq)]
pub struct RpeChart {
    entries: HashMap<(u32, u32), RpeChartEntry>,
}

impl RpeChart {
    /// Build a chart from entries
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for an invalid entry and `InvalidParams` for
    /// a duplicated `(reps, RPE)` pair
    pub fn new(entries: impl IntoIterator<Item = RpeChartEntry>) -> AppResult<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            entry.validate()?;
            let key = (entry.target_reps, rpe_key(entry.target_rpe));
            if map.insert(key, entry).is_some() {
                return Err(AppError::invalid_params(format!(
                    "duplicate RPE chart entry for {} reps @ RPE {:.1}",
                    entry.target_reps, entry.target_rpe
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// The conventional 12 rep x RPE 7-10 chart
    #[must_use]
    pub fn standard() -> Self {
        let mut entries = HashMap::new();
        for reps in MIN_TARGET_REPS..=MAX_TARGET_REPS {
            let mut rpe = MIN_RPE;
            while rpe <= MAX_RPE {
                let reserve_steps = ((MAX_RPE - rpe) / RPE_STEP).round() as usize;
                let index = (reps as usize - 1) * 2 + reserve_steps;
                let entry = RpeChartEntry {
                    target_reps: reps,
                    target_rpe: rpe,
                    percentage: STANDARD_CHART_PERCENTAGES[index],
                };
                entries.insert((reps, rpe_key(rpe)), entry);
                rpe += RPE_STEP;
            }
        }
        Self { entries }
    }

    /// Fraction of one-rep max for an exact `(reps, rpe)` pair
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the chart has no such entry
    pub fn get_percentage(&self, reps: u32, rpe: f64) -> AppResult<f64> {
        self.entries
            .get(&(reps, rpe_key(rpe)))
            .map(|entry| entry.percentage)
            .ok_or_else(|| AppError::not_found(format!("RPE chart entry for {reps} reps @ RPE {rpe:.1}")))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chart is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by reps then RPE
    #[must_use]
    pub fn entries(&self) -> Vec<RpeChartEntry> {
        let mut entries: Vec<_> = self.entries.values().copied().collect();
        entries.sort_by(|a, b| {
            a.target_reps
                .cmp(&b.target_reps)
                .then(a.target_rpe.total_cmp(&b.target_rpe))
        });
        entries
    }
}

/// Estimated one-rep max calculator backed by an RPE chart
#[derive(Debug, Clone)]
pub struct E1rmCalculator<'a> {
    chart: &'a RpeChart,
}

impl<'a> E1rmCalculator<'a> {
    /// Create a calculator over `chart`
    #[must_use]
    pub const fn new(chart: &'a RpeChart) -> Self {
        Self { chart }
    }

    /// Estimate a one-rep max as `weight / percentage`, rounded to the nearest 2.5
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a non-positive weight or invalid reps/RPE,
    /// and `ResourceNotFound` if the chart lacks the pairing
    pub fn calculate(&self, weight: f64, reps: u32, rpe: f64) -> AppResult<f64> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(AppError::out_of_range(format!(
                "weight must be positive, got {weight}"
            )));
        }
        validate_target_reps(reps)?;
        validate_target_rpe(rpe)?;

        let percentage = self.chart.get_percentage(reps, rpe)?;
        if percentage <= 0.0 {
            return Err(AppError::out_of_range(format!(
                "RPE chart percentage for {reps} reps @ RPE {rpe:.1} is zero"
            )));
        }

        let estimate = weight / percentage;
        tracing::debug!(weight, reps, rpe, percentage, estimate, "estimated one-rep max");
        round_weight(estimate, E1RM_INCREMENT, RoundingDirection::Nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn entry(target_reps: u32, target_rpe: f64, percentage: f64) -> RpeChartEntry {
        RpeChartEntry {
            target_reps,
            target_rpe,
            percentage,
        }
    }

    #[test]
    fn test_lookup_exact_entry() {
        let chart = RpeChart::new([entry(5, 8.0, 0.77), entry(1, 8.0, 0.91)]).unwrap();
        assert!((chart.get_percentage(5, 8.0).unwrap() - 0.77).abs() < 1e-9);
        let missing = chart.get_percentage(5, 9.0).unwrap_err();
        assert_eq!(missing.code, ErrorCode::ResourceNotFound);
        assert_eq!(chart.entries(), [entry(1, 8.0, 0.91), entry(5, 8.0, 0.77)]);
    }

    #[test]
    fn test_rejects_invalid_entries() {
        assert!(RpeChart::new([entry(0, 8.0, 0.9)]).is_err());
        assert!(RpeChart::new([entry(13, 8.0, 0.9)]).is_err());
        assert!(RpeChart::new([entry(3, 6.5, 0.9)]).is_err());
        assert!(RpeChart::new([entry(3, 8.0, 1.2)]).is_err());
        assert!(RpeChart::new([entry(3, 8.0, 0.8), entry(3, 8.0, 0.81)]).is_err());
    }

    #[test]
    fn test_standard_chart_shape() {
        let chart = RpeChart::standard();
        assert_eq!(chart.len(), 12 * 7);
        assert!((chart.get_percentage(1, 10.0).unwrap() - 1.0).abs() < 1e-9);
        assert!((chart.get_percentage(1, 8.0).unwrap() - 0.922).abs() < 1e-9);
        assert!((chart.get_percentage(12, 7.0).unwrap() - 0.599).abs() < 1e-9);
        // one RPE point equals two reps in reserve steps
        assert!(
            (chart.get_percentage(3, 9.0).unwrap() - chart.get_percentage(4, 10.0).unwrap()).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_e1rm_rounds_to_two_and_a_half() {
        let chart = RpeChart::new([entry(1, 8.0, 0.91)]).unwrap();
        let e1rm = E1rmCalculator::new(&chart).calculate(365.0, 1, 8.0).unwrap();
        assert!((e1rm - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_e1rm_rejects_zero_weight() {
        let chart = RpeChart::standard();
        assert!(E1rmCalculator::new(&chart).calculate(0.0, 1, 8.0).is_err());
    }
}
