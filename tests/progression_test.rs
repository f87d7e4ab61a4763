// ABOUTME: Integration tests for progressions reacting to trigger events
// ABOUTME: Covers failure streak bookkeeping, stage cycling, and trigger filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use common::{init_test_logging, progression_context, Athlete};
use liftplan::errors::ErrorCode;
use liftplan::progression::{
    DeloadOnFailure, FailureCounter, FailureCounterKey, GreySkullProgression, LinearProgression,
    Progression, Stage, StageChange, StageProgression,
};
use liftplan::program_state::{ProgramShape, UserProgramState};
use liftplan_core::models::{MaxType, TriggerType};
use uuid::Uuid;

#[test]
fn test_failure_counter_drives_deload() {
    init_test_logging();
    let athlete = Athlete::new();
    let progression = DeloadOnFailure::percent(MaxType::TrainingMax, 0.1);
    let mut counter = FailureCounter::new(FailureCounterKey {
        user_id: athlete.user_id,
        lift_id: athlete.lift_id,
        progression_id: Uuid::new_v4(),
    });

    let mut current = 250.0;
    let mut deloads = 0;
    for _ in 0..3 {
        let failures = counter.record_failure(Utc::now());
        let mut ctx = progression_context(athlete, MaxType::TrainingMax, current, TriggerType::OnFailure);
        ctx.trigger = ctx.trigger.with_consecutive_failures(failures);

        let result = progression.apply(&ctx).unwrap();
        if result.applied {
            deloads += 1;
            current = result.new_value;
        }
        if progression.should_reset_failure_counter(&result) {
            counter.reset();
        }
    }

    assert_eq!(deloads, 1);
    assert!((current - 225.0).abs() < 1e-9);
    assert_eq!(counter.consecutive_failures, 0);
}

#[test]
fn test_deload_ignores_other_triggers() {
    let athlete = Athlete::new();
    let progression = DeloadOnFailure::percent(MaxType::TrainingMax, 0.1);
    let ctx = progression_context(athlete, MaxType::TrainingMax, 250.0, TriggerType::AfterSession);
    let result = progression.apply(&ctx).unwrap();
    assert!(!result.applied);
    assert!((result.new_value - 250.0).abs() < f64::EPSILON);
}

#[test]
fn test_stage_progression_cycles_through_stages() {
    let athlete = Athlete::new();
    let mut progression = StageProgression::new(
        MaxType::TrainingMax,
        vec![
            Stage::new("5x3+", 5, 3).amrap(),
            Stage::new("6x2+", 6, 2).amrap(),
            Stage::new("10x1+", 10, 1).amrap(),
        ],
    )
    .with_reset(true, Some(0.1));

    let mut current = 200.0;
    let mut changes = Vec::new();
    for _ in 0..3 {
        let ctx = progression_context(athlete, MaxType::TrainingMax, current, TriggerType::OnFailure);
        let result = progression.apply(&ctx).unwrap();
        assert!(result.applied);
        let change = result.stage_change.unwrap();
        changes.push(change);
        current = result.new_value;
        progression = progression.with_current_stage(change.to);
    }

    assert_eq!(
        changes,
        [
            StageChange { from: 0, to: 1 },
            StageChange { from: 1, to: 2 },
            StageChange { from: 2, to: 0 },
        ]
    );
    assert!((current - 180.0).abs() < 1e-9);
    assert_eq!(progression.stage().map(|stage| stage.name.as_str()), Some("5x3+"));
}

#[test]
fn test_greyskull_bands() {
    let athlete = Athlete::new();
    let progression = GreySkullProgression::new(MaxType::TrainingMax);
    for (reps, expected) in [(3, 121.5), (5, 137.5), (7, 137.5), (10, 140.0), (15, 140.0)] {
        let mut ctx = progression_context(athlete, MaxType::TrainingMax, 135.0, TriggerType::AfterSet);
        ctx.trigger = ctx.trigger.amrap().with_reps(reps);
        let result = progression.apply(&ctx).unwrap();
        assert!(
            (result.new_value - expected).abs() < 1e-9,
            "reps {reps}: expected {expected}, got {}",
            result.new_value
        );
    }
}

#[test]
fn test_greyskull_without_reps_is_skipped() {
    let athlete = Athlete::new();
    let progression = GreySkullProgression::new(MaxType::TrainingMax);
    let mut ctx = progression_context(athlete, MaxType::TrainingMax, 135.0, TriggerType::AfterSet);
    ctx.trigger = ctx.trigger.amrap();
    assert!(!progression.apply(&ctx).unwrap().applied);
}

#[test]
fn test_invalid_context_is_an_error() {
    let athlete = Athlete::new();
    let progression = LinearProgression::new(MaxType::TrainingMax, 5.0, TriggerType::AfterWeek);
    let mut ctx = progression_context(athlete, MaxType::TrainingMax, -5.0, TriggerType::AfterWeek);
    assert_eq!(
        progression.apply(&ctx).unwrap_err().code,
        ErrorCode::ValueOutOfRange
    );

    ctx.current_value = 100.0;
    ctx.user_id = Uuid::nil();
    assert_eq!(
        progression.apply(&ctx).unwrap_err().code,
        ErrorCode::InvalidParams
    );
}

#[test]
fn test_program_advance_fires_week_and_cycle_progressions() {
    let athlete = Athlete::new();
    let weekly = LinearProgression::new(MaxType::TrainingMax, 5.0, TriggerType::AfterWeek);
    let per_cycle = LinearProgression::new(MaxType::TrainingMax, 10.0, TriggerType::AfterCycle);
    let progressions: [&dyn Progression; 2] = [&weekly, &per_cycle];

    let shape = ProgramShape::new(3, 2);
    let mut state = UserProgramState::new(athlete.user_id);
    let mut current = 300.0;

    for _ in 0..6 {
        let outcome = state.advance(&shape).unwrap();
        for trigger in outcome.triggers() {
            for progression in progressions {
                let ctx = progression_context(athlete, MaxType::TrainingMax, current, trigger);
                current = progression.apply(&ctx).unwrap().new_value;
            }
        }
    }

    // two weeks at +5 and one cycle at +10
    assert!((current - 320.0).abs() < 1e-9);
    assert_eq!(state.current_cycle_iteration, 2);
}
