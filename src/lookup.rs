// ABOUTME: Weekly, daily, and rotation lookup tables plus the LookupContext modifier chain
// ABOUTME: Turns a base percentage into the effective percentage for a week, set, and day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Lookup Context Module
//!
//! Programs modulate a base prescription through three tables:
//!
//! - [`WeeklyLookup`]: per-week entries holding either explicit per-set
//!   percentages and reps (5/3/1 style waves) or a single percentage modifier
//! - [`DailyLookup`]: per-day modifiers (heavy/light/medium days)
//! - [`RotationLookup`]: which lift is the focus at each rotation position
//!
//! [`LookupContext`] binds those tables to a concrete cursor (week, set, day,
//! rotation position) and applies them in a fixed order.

use crate::errors::{AppError, AppResult};
use crate::rpe::RpeChart;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// One week of a weekly lookup table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyLookupEntry {
    /// 1-based week number
    pub week_number: u32,
    /// Explicit per-set percentages (replace the base percentage)
    #[serde(default)]
    pub percentages: Vec<f64>,
    /// Explicit per-set rep targets
    #[serde(default)]
    pub reps: Vec<u32>,
    /// Single multiplier in percent applied to the base percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_modifier: Option<f64>,
}

/// Weekly lookup table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyLookup {
    /// Entries, at most one per week
    pub entries: Vec<WeeklyLookupEntry>,
}

impl WeeklyLookup {
    /// Entry for a week
    #[must_use]
    pub fn entry(&self, week_number: u32) -> Option<&WeeklyLookupEntry> {
        self.entries.iter().find(|e| e.week_number == week_number)
    }
}

/// One day label of a daily lookup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLookupEntry {
    /// Day label, e.g. `heavy`
    pub day_slug: String,
    /// Multiplier in percent; zero means not configured
    pub percentage_modifier: f64,
    /// Free-form intensity label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_level: Option<String>,
}

/// Daily lookup table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyLookup {
    /// Entries, at most one per day slug
    pub entries: Vec<DailyLookupEntry>,
}

impl DailyLookup {
    /// Entry for a day slug
    #[must_use]
    pub fn entry(&self, day_slug: &str) -> Option<&DailyLookupEntry> {
        self.entries.iter().find(|e| e.day_slug == day_slug)
    }
}

/// Focus lift at one rotation position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationLookupEntry {
    /// 0-based position
    pub position: u32,
    /// Lift in focus at this position
    pub lift_id: Uuid,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Rotation lookup table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotationLookup {
    /// Entries, one per position
    pub entries: Vec<RotationLookupEntry>,
}

impl RotationLookup {
    /// Entry at a position
    #[must_use]
    pub fn entry(&self, position: u32) -> Option<&RotationLookupEntry> {
        self.entries.iter().find(|e| e.position == position)
    }

    /// Rotation length
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the rotation is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Require positions to cover `0..len` exactly once each
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` for a duplicate or out-of-sequence position
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = vec![false; self.entries.len()];
        for entry in &self.entries {
            match seen.get_mut(entry.position as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(AppError::invalid_params(format!(
                        "rotation position {} appears more than once",
                        entry.position
                    )))
                }
                None => {
                    return Err(AppError::invalid_params(format!(
                        "rotation positions must run 0..{}, found {}",
                        self.entries.len(),
                        entry.position
                    )))
                }
            }
        }
        Ok(())
    }
}

/// Cursor plus tables for one prescription
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    /// 1-based program week
    pub week_number: u32,
    /// 1-based set number within the exercise
    pub set_number: u32,
    /// Day label for daily lookups
    pub day_slug: Option<String>,
    /// 0-based rotation position
    pub rotation_position: u32,
    /// Weekly table
    pub weekly: Option<Arc<WeeklyLookup>>,
    /// Daily table
    pub daily: Option<Arc<DailyLookup>>,
    /// Rotation table
    pub rotation: Option<Arc<RotationLookup>>,
    /// Program-specific RPE chart, preferred over the engine default
    pub rpe_chart: Option<Arc<RpeChart>>,
}

impl LookupContext {
    /// Context positioned at `week_number` / `set_number` with no tables
    #[must_use]
    pub fn new(week_number: u32, set_number: u32) -> Self {
        Self {
            week_number,
            set_number,
            ..Self::default()
        }
    }

    /// Attach a weekly table
    #[must_use]
    pub fn with_weekly(mut self, weekly: Arc<WeeklyLookup>) -> Self {
        self.weekly = Some(weekly);
        self
    }

    /// Attach a daily table and the day label to look up
    #[must_use]
    pub fn with_daily(mut self, daily: Arc<DailyLookup>, day_slug: impl Into<String>) -> Self {
        self.daily = Some(daily);
        self.day_slug = Some(day_slug.into());
        self
    }

    /// Attach a rotation table and the current position
    #[must_use]
    pub fn with_rotation(mut self, rotation: Arc<RotationLookup>, position: u32) -> Self {
        self.rotation = Some(rotation);
        self.rotation_position = position;
        self
    }

    /// Attach a program-specific RPE chart
    #[must_use]
    pub fn with_rpe_chart(mut self, chart: Arc<RpeChart>) -> Self {
        self.rpe_chart = Some(chart);
        self
    }

    /// Validate the cursor against the attached tables
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a zero set number or a rotation position
    /// outside `[0, rotation length)`, and `InvalidParams` for a rotation
    /// table whose positions do not run `0..len`
    pub fn validate(&self) -> AppResult<()> {
        if self.set_number == 0 {
            return Err(AppError::out_of_range("set number is 1-based, got 0"));
        }
        if let Some(rotation) = &self.rotation {
            rotation.validate()?;
            if self.rotation_position as usize >= rotation.len() {
                return Err(AppError::out_of_range(format!(
                    "rotation position {} outside rotation of length {}",
                    self.rotation_position,
                    rotation.len()
                )));
            }
        }
        Ok(())
    }

    fn weekly_entry(&self) -> Option<&WeeklyLookupEntry> {
        self.weekly.as_ref()?.entry(self.week_number)
    }

    fn set_index(&self) -> Option<usize> {
        (self.set_number as usize).checked_sub(1)
    }

    /// Apply the weekly then daily modifiers to `base_percentage`
    #[must_use]
    pub fn apply_modifiers(&self, base_percentage: f64) -> f64 {
        let mut percentage = base_percentage;

        if let Some(entry) = self.weekly_entry() {
            let per_set = self
                .set_index()
                .and_then(|index| entry.percentages.get(index).copied());
            if let Some(explicit) = per_set {
                percentage = explicit;
            } else if let Some(modifier) = entry.percentage_modifier {
                percentage *= modifier / 100.0;
            }
        }

        let daily_modifier = self
            .daily
            .as_ref()
            .zip(self.day_slug.as_deref())
            .and_then(|(daily, slug)| daily.entry(slug))
            .map(|entry| entry.percentage_modifier);
        if let Some(modifier) = daily_modifier {
            if modifier.abs() > f64::EPSILON {
                percentage *= modifier / 100.0;
            }
        }

        percentage
    }

    /// Per-set rep target for the current week and set, if the week defines one
    #[must_use]
    pub fn get_reps_for_set(&self) -> Option<u32> {
        let entry = self.weekly_entry()?;
        entry.reps.get(self.set_index()?).copied()
    }

    /// Whether `lift_id` is the focus lift at the current rotation position
    #[must_use]
    pub fn is_lift_in_rotation_focus(&self, lift_id: Uuid) -> bool {
        self.rotation
            .as_ref()
            .and_then(|rotation| rotation.entry(self.rotation_position))
            .is_some_and(|entry| entry.lift_id == lift_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn wave_week() -> Arc<WeeklyLookup> {
        Arc::new(WeeklyLookup {
            entries: vec![
                WeeklyLookupEntry {
                    week_number: 1,
                    percentages: vec![65.0, 75.0, 85.0],
                    reps: vec![5, 5, 5],
                    percentage_modifier: None,
                },
                WeeklyLookupEntry {
                    week_number: 4,
                    percentage_modifier: Some(60.0),
                    ..WeeklyLookupEntry::default()
                },
            ],
        })
    }

    #[test]
    fn test_per_set_percentage_replaces_base() {
        let ctx = LookupContext::new(1, 3).with_weekly(wave_week());
        assert!((ctx.apply_modifiers(50.0) - 85.0).abs() < 1e-9);
        assert_eq!(ctx.get_reps_for_set(), Some(5));
    }

    #[test]
    fn test_set_beyond_array_falls_through() {
        let ctx = LookupContext::new(1, 4).with_weekly(wave_week());
        assert!((ctx.apply_modifiers(50.0) - 50.0).abs() < 1e-9);
        assert_eq!(ctx.get_reps_for_set(), None);
    }

    #[test]
    fn test_week_modifier_scales_base() {
        let ctx = LookupContext::new(4, 1).with_weekly(wave_week());
        assert!((ctx.apply_modifiers(90.0) - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_modifier_and_zero_sentinel() {
        let daily = Arc::new(DailyLookup {
            entries: vec![
                DailyLookupEntry {
                    day_slug: "light".into(),
                    percentage_modifier: 80.0,
                    intensity_level: None,
                },
                DailyLookupEntry {
                    day_slug: "unset".into(),
                    percentage_modifier: 0.0,
                    intensity_level: None,
                },
            ],
        });
        let light = LookupContext::new(1, 3)
            .with_weekly(wave_week())
            .with_daily(Arc::clone(&daily), "light");
        assert!((light.apply_modifiers(50.0) - 68.0).abs() < 1e-9);

        let unset = LookupContext::new(2, 1).with_daily(daily, "unset");
        assert!((unset.apply_modifiers(70.0) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_focus_and_validation() {
        let squat = Uuid::new_v4();
        let bench = Uuid::new_v4();
        let rotation = Arc::new(RotationLookup {
            entries: vec![
                RotationLookupEntry {
                    position: 0,
                    lift_id: squat,
                    description: None,
                },
                RotationLookupEntry {
                    position: 1,
                    lift_id: bench,
                    description: None,
                },
            ],
        });
        let ctx = LookupContext::new(1, 1).with_rotation(Arc::clone(&rotation), 1);
        assert!(ctx.is_lift_in_rotation_focus(bench));
        assert!(!ctx.is_lift_in_rotation_focus(squat));
        assert!(ctx.validate().is_ok());

        let out_of_range = LookupContext::new(1, 1).with_rotation(rotation, 2);
        assert!(out_of_range.validate().is_err());
    }

    fn rotation_at(positions: &[u32]) -> Arc<RotationLookup> {
        Arc::new(RotationLookup {
            entries: positions
                .iter()
                .map(|&position| RotationLookupEntry {
                    position,
                    lift_id: Uuid::new_v4(),
                    description: None,
                })
                .collect(),
        })
    }

    #[test]
    fn test_rotation_positions_must_be_contiguous() {
        let sparse = LookupContext::new(1, 1).with_rotation(rotation_at(&[0, 2]), 0);
        assert_eq!(sparse.validate().unwrap_err().code, ErrorCode::InvalidParams);

        let duplicated = LookupContext::new(1, 1).with_rotation(rotation_at(&[0, 0]), 0);
        assert_eq!(duplicated.validate().unwrap_err().code, ErrorCode::InvalidParams);

        let shuffled = LookupContext::new(1, 1).with_rotation(rotation_at(&[2, 0, 1]), 2);
        assert!(shuffled.validate().is_ok());

        let beyond = LookupContext::new(1, 1).with_rotation(rotation_at(&[1, 0]), 2);
        assert_eq!(beyond.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }
}
