// ABOUTME: Integration tests driving set schemes through full logged sessions
// ABOUTME: Covers deterministic layouts and the variable-scheme termination paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{init_test_logging, logged, run_variable_scheme};
use liftplan::config::EngineConfig;
use liftplan::set_scheme::{
    AmrapScheme, FatigueDropScheme, FixedScheme, GeneratedSet, GreySkullScheme, MrsScheme,
    SetGenerationContext, SetScheme, TotalRepsScheme,
};

fn first_set(scheme: &dyn SetScheme, weight: f64) -> GeneratedSet {
    let sets = scheme
        .generate_sets(weight, &SetGenerationContext::default())
        .unwrap();
    assert_eq!(sets.len(), 1, "variable schemes emit only their first set");
    assert!(sets[0].is_provisional);
    sets[0]
}

#[test]
fn test_deterministic_schemes_are_not_variable() {
    let schemes: Vec<Box<dyn SetScheme>> = vec![
        Box::new(FixedScheme::new(5, 5)),
        Box::new(AmrapScheme::new(3, 5)),
        Box::new(GreySkullScheme::default()),
    ];
    for scheme in &schemes {
        assert!(!scheme.is_variable_count(), "{}", scheme.scheme_type());
        let sets = scheme
            .generate_sets(200.0, &SetGenerationContext::default())
            .unwrap();
        assert!(sets.iter().all(|set| !set.is_provisional));
    }
}

#[test]
fn test_mrs_reaches_target() {
    init_test_logging();
    let scheme = MrsScheme::new(25, 3, 10);
    let ctx = SetGenerationContext::default();
    let first = first_set(&scheme, 225.0);

    let run = run_variable_scheme(
        &scheme,
        &ctx,
        first,
        &[
            logged(225.0, 10, None),
            logged(225.0, 8, None),
            logged(225.0, 6, None),
            logged(225.0, 4, None),
        ],
        10,
    );
    assert_eq!(run.sets.len(), 4);
    assert!(run.sets.iter().all(|set| (set.weight - 225.0).abs() < f64::EPSILON));
    assert_eq!(run.reason.as_deref(), Some("Target total reps reached (28/25)"));
}

#[test]
fn test_mrs_fails_under_minimum() {
    let scheme = MrsScheme::new(25, 3, 10);
    let ctx = SetGenerationContext::default();
    let first = first_set(&scheme, 225.0);

    let run = run_variable_scheme(
        &scheme,
        &ctx,
        first,
        &[
            logged(225.0, 6, None),
            logged(225.0, 4, None),
            logged(225.0, 2, None),
        ],
        10,
    );
    assert_eq!(run.sets.len(), 3);
    assert_eq!(run.reason.as_deref(), Some("Failed to hit minimum reps (2/3)"));
}

#[test]
fn test_mrs_safety_cap() {
    let scheme = MrsScheme::new(100, 1, 10).with_num_sets(3);
    let ctx = SetGenerationContext::default();
    let first = first_set(&scheme, 135.0);

    let run = run_variable_scheme(
        &scheme,
        &ctx,
        first,
        &[
            logged(135.0, 5, None),
            logged(135.0, 5, None),
            logged(135.0, 5, None),
        ],
        10,
    );
    assert_eq!(run.reason.as_deref(), Some("Maximum sets reached (safety limit)"));
}

#[test]
fn test_total_reps_accepts_any_rep_count() {
    let scheme = TotalRepsScheme::new(20, 10);
    let ctx = SetGenerationContext::default();
    let first = first_set(&scheme, 95.0);

    let run = run_variable_scheme(
        &scheme,
        &ctx,
        first,
        &[
            logged(95.0, 10, None),
            logged(95.0, 1, None),
            logged(95.0, 1, None),
            logged(95.0, 8, None),
        ],
        10,
    );
    assert_eq!(run.sets.len(), 4);
    assert_eq!(run.reason.as_deref(), Some("Target total reps reached (20/20)"));
}

#[test]
fn test_fatigue_drop_to_stop_rpe() {
    init_test_logging();
    let scheme = FatigueDropScheme::new(5, 8.0, 10.0, 0.05);
    let ctx = SetGenerationContext::default();
    let first = first_set(&scheme, 300.0);

    let run = run_variable_scheme(
        &scheme,
        &ctx,
        first,
        &[
            logged(300.0, 5, Some(8.0)),
            logged(285.0, 5, Some(9.0)),
            logged(270.0, 5, Some(9.5)),
            logged(255.0, 5, Some(10.0)),
        ],
        5,
    );
    let weights: Vec<f64> = run.sets.iter().map(|set| set.weight).collect();
    assert_eq!(weights, [300.0, 285.0, 270.0, 255.0]);
    assert_eq!(run.reason.as_deref(), Some("Target RPE reached (10.0/10.0)"));
}

#[test]
fn test_fatigue_drop_without_rpe_continues_until_cap() {
    let scheme = FatigueDropScheme::new(5, 8.0, 10.0, 0.05).with_max_sets(2);
    let ctx = SetGenerationContext::default();
    let first = first_set(&scheme, 300.0);

    let run = run_variable_scheme(
        &scheme,
        &ctx,
        first,
        &[logged(300.0, 5, None), logged(285.0, 5, None)],
        5,
    );
    assert_eq!(run.sets.len(), 2);
    assert_eq!(run.reason.as_deref(), Some("Maximum sets reached (safety limit)"));
}

#[test]
fn test_config_ceiling_applies_to_every_variable_scheme() {
    let config = EngineConfig {
        max_variable_sets: 2,
        ..EngineConfig::default()
    };
    let ctx = SetGenerationContext::from_config(&config);
    let scheme = TotalRepsScheme::new(100, 10).with_max_sets(50);
    let first = first_set(&scheme, 95.0);

    let run = run_variable_scheme(
        &scheme,
        &ctx,
        first,
        &[logged(95.0, 10, None), logged(95.0, 10, None), logged(95.0, 10, None)],
        10,
    );
    assert_eq!(run.sets.len(), 2);
    assert_eq!(run.reason.as_deref(), Some("Maximum sets reached (safety limit)"));
}

#[test]
fn test_variable_view_is_exposed_through_trait_object() {
    let scheme: Box<dyn SetScheme> = Box::new(MrsScheme::new(25, 3, 10));
    assert!(scheme.is_variable_count());
    assert!(scheme.as_variable().is_some());
    assert!(scheme.as_any().downcast_ref::<MrsScheme>().is_some());
}
