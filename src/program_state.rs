// ABOUTME: Per-user program cursor tracking day, week, cycle, and rotation position
// ABOUTME: Advancing reports which boundaries were crossed so callers can fire triggers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Program state
//!
//! A [`UserProgramState`] is the cursor a lifter moves through a program with.
//! Completing a training day calls [`UserProgramState::advance`]; the returned
//! [`AdvanceOutcome`] lists the progression triggers the caller should fire.
//! The rotation position feeds [`crate::lookup::LookupContext`] and moves once
//! per completed week.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use liftplan_core::models::TriggerType;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Dimensions of a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramShape {
    /// Training days per week
    pub days_per_week: u32,
    /// Weeks per cycle
    pub weeks_per_cycle: u32,
    /// Rotation table length; zero when the program has no rotation
    #[serde(default)]
    pub rotation_length: u32,
}

impl ProgramShape {
    /// Shape without a rotation
    #[must_use]
    pub const fn new(days_per_week: u32, weeks_per_cycle: u32) -> Self {
        Self {
            days_per_week,
            weeks_per_cycle,
            rotation_length: 0,
        }
    }

    /// Attach a rotation of `rotation_length` positions
    #[must_use]
    pub const fn with_rotation(mut self, rotation_length: u32) -> Self {
        self.rotation_length = rotation_length;
        self
    }

    /// Reject zero-sized shapes
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for zero days or weeks
    pub fn validate(&self) -> AppResult<()> {
        if self.days_per_week == 0 {
            return Err(AppError::out_of_range("daysPerWeek must be at least 1"));
        }
        if self.weeks_per_cycle == 0 {
            return Err(AppError::out_of_range("weeksPerCycle must be at least 1"));
        }
        Ok(())
    }
}

/// Boundaries crossed by one advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceOutcome {
    /// The last day of a week was completed
    pub week_completed: bool,
    /// The last week of a cycle was completed
    pub cycle_completed: bool,
}

impl AdvanceOutcome {
    /// Triggers to fire, finest first
    #[must_use]
    pub fn triggers(&self) -> Vec<TriggerType> {
        let mut triggers = vec![TriggerType::AfterSession];
        if self.week_completed {
            triggers.push(TriggerType::AfterWeek);
        }
        if self.cycle_completed {
            triggers.push(TriggerType::AfterCycle);
        }
        triggers
    }
}

/// Where a lifter is in their program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgramState {
    /// Lifter
    pub user_id: Uuid,
    /// 1-based week within the cycle
    pub current_week: u32,
    /// 1-based cycle number
    pub current_cycle_iteration: u32,
    /// 0-based day within the week
    pub current_day_index: u32,
    /// 0-based rotation position
    pub rotation_position: u32,
    /// Completed cycles
    pub cycles_since_start: u32,
    /// Last advance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProgramState {
    /// Fresh state at week 1, day 0
    #[must_use]
    pub const fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_week: 1,
            current_cycle_iteration: 1,
            current_day_index: 0,
            rotation_position: 0,
            cycles_since_start: 0,
            updated_at: None,
        }
    }

    /// Check the cursor against `shape`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` for a nil user and `ValueOutOfRange` for any
    /// position outside the shape
    pub fn validate(&self, shape: &ProgramShape) -> AppResult<()> {
        shape.validate()?;
        if self.user_id.is_nil() {
            return Err(AppError::invalid_params("user id is required"));
        }
        if self.current_week == 0 || self.current_week > shape.weeks_per_cycle {
            return Err(AppError::out_of_range(format!(
                "week {} is outside 1..={}",
                self.current_week, shape.weeks_per_cycle
            )));
        }
        if self.current_cycle_iteration == 0 {
            return Err(AppError::out_of_range("cycle iteration starts at 1"));
        }
        if self.current_day_index >= shape.days_per_week {
            return Err(AppError::out_of_range(format!(
                "day index {} is outside 0..{}",
                self.current_day_index, shape.days_per_week
            )));
        }
        if shape.rotation_length > 0 && self.rotation_position >= shape.rotation_length {
            return Err(AppError::out_of_range(format!(
                "rotation position {} is outside 0..{}",
                self.rotation_position, shape.rotation_length
            )));
        }
        Ok(())
    }

    /// Complete the current day and move the cursor
    ///
    /// # Errors
    ///
    /// Returns a validation error if the state does not fit `shape`; the state
    /// is left unchanged in that case
    pub fn advance(&mut self, shape: &ProgramShape) -> AppResult<AdvanceOutcome> {
        self.validate(shape)?;
        let mut outcome = AdvanceOutcome::default();

        self.current_day_index += 1;
        if self.current_day_index >= shape.days_per_week {
            self.current_day_index = 0;
            self.current_week += 1;
            outcome.week_completed = true;
            if shape.rotation_length > 0 {
                self.rotation_position = (self.rotation_position + 1) % shape.rotation_length;
            }
        }
        if self.current_week > shape.weeks_per_cycle {
            self.current_week = 1;
            self.current_cycle_iteration += 1;
            self.cycles_since_start += 1;
            outcome.cycle_completed = true;
        }
        self.updated_at = Some(Utc::now());

        debug!(
            user_id = %self.user_id,
            week = self.current_week,
            day = self.current_day_index,
            cycle = self.current_cycle_iteration,
            rotation = self.rotation_position,
            week_completed = outcome.week_completed,
            cycle_completed = outcome.cycle_completed,
            "advanced program state"
        );
        Ok(outcome)
    }
}
