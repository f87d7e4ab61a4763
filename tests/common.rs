// ABOUTME: Shared test utilities and fixtures for liftplan integration tests
// ABOUTME: Provides quiet logging, identity fixtures, and populated in-memory lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `liftplan`
//!
//! This module provides common setup functions to reduce duplication across
//! integration tests.

use chrono::Utc;
use liftplan::errors::{AppError, AppResult};
use liftplan::external::{InMemoryMaxLookup, InMemorySessionLookup, MaxLookup, SessionLookup};
use liftplan::progression::{ProgressionContext, TriggerEvent};
use liftplan::set_scheme::{GeneratedSet, SetGenerationContext, TerminationContext, VariableSetScheme};
use liftplan_core::models::{LoggedSetResult, MaxType, MaxValue, TriggerType};
use std::sync::Once;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// A lifter and a lift
#[derive(Debug, Clone, Copy)]
pub struct Athlete {
    pub user_id: Uuid,
    pub lift_id: Uuid,
}

impl Athlete {
    pub fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            lift_id: Uuid::new_v4(),
        }
    }
}

/// Max store seeded with one max for `athlete`
pub fn max_lookup_with(athlete: Athlete, max_type: MaxType, value: f64) -> InMemoryMaxLookup {
    let lookup = InMemoryMaxLookup::new();
    lookup.set_max(athlete.user_id, athlete.lift_id, max_type, value);
    lookup
}

/// Session store with `weights` logged for `athlete` in a new session
pub fn session_with_sets(athlete: Athlete, weights: &[f64]) -> (Uuid, InMemorySessionLookup) {
    let session_id = Uuid::new_v4();
    let lookup = InMemorySessionLookup::new();
    for &weight in weights {
        lookup.log_set(
            session_id,
            athlete.lift_id,
            LoggedSetResult {
                weight,
                reps: 1,
                rpe: Some(8.0),
            },
        );
    }
    (session_id, lookup)
}

/// Progression context for `athlete` with a fresh trigger
pub fn progression_context(
    athlete: Athlete,
    max_type: MaxType,
    current_value: f64,
    trigger: TriggerType,
) -> ProgressionContext {
    ProgressionContext {
        user_id: athlete.user_id,
        lift_id: athlete.lift_id,
        max_type,
        current_value,
        trigger: TriggerEvent::new(trigger, Utc::now()),
    }
}

/// Outcome of driving a variable scheme through logged sets
#[derive(Debug)]
pub struct SchemeRun {
    pub sets: Vec<GeneratedSet>,
    pub reason: Option<String>,
}

/// Drive `scheme` from `first` through `logged`, stopping when it stops
///
/// Each entry in `logged` is the lifter's result for the set most recently
/// generated.
pub fn run_variable_scheme(
    scheme: &dyn VariableSetScheme,
    ctx: &SetGenerationContext,
    first: GeneratedSet,
    logged: &[LoggedSetResult],
    target_reps: u32,
) -> SchemeRun {
    let mut sets = vec![first];
    for count in 1..=logged.len() {
        let termination = TerminationContext::from_logged_sets(&logged[..count], target_reps);
        let decision = scheme
            .generate_next_set(ctx, &sets, &termination)
            .expect("next set decision");
        match decision.next_set {
            Some(next) if decision.should_continue => sets.push(next),
            _ => {
                return SchemeRun {
                    sets,
                    reason: decision.termination_reason,
                }
            }
        }
    }
    SchemeRun { sets, reason: None }
}

/// Logged set with reps and an optional RPE
pub fn logged(weight: f64, reps: u32, rpe: Option<f64>) -> LoggedSetResult {
    LoggedSetResult { weight, reps, rpe }
}

/// Backing store that fails every read
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

/// Message carried by every [`UnavailableStore`] failure
pub const STORE_OFFLINE: &str = "store offline";

impl MaxLookup for UnavailableStore {
    fn get_current_max(
        &self,
        _user_id: Uuid,
        _lift_id: Uuid,
        _max_type: MaxType,
    ) -> AppResult<Option<MaxValue>> {
        Err(AppError::invalid_params(STORE_OFFLINE))
    }
}

impl SessionLookup for UnavailableStore {
    fn get_logged_set_by_index(
        &self,
        _session_id: Uuid,
        _lift_id: Uuid,
        _index: u32,
    ) -> AppResult<Option<LoggedSetResult>> {
        Err(AppError::invalid_params(STORE_OFFLINE))
    }
}
