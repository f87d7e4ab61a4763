// ABOUTME: Property-based tests for weight rounding
// ABOUTME: Checks increment alignment and direction bounds across generated inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use liftplan::rounding::round_weight;
use liftplan_core::models::RoundingDirection;
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

fn increments() -> impl Strategy<Value = f64> {
    prop_oneof![Just(1.0), Just(1.25), Just(2.5), Just(5.0), Just(10.0)]
}

fn is_multiple(value: f64, increment: f64) -> bool {
    let steps = value / increment;
    (steps - steps.round()).abs() < TOLERANCE
}

proptest! {
    #[test]
    fn prop_result_is_a_multiple_of_increment(
        weight in 0.0_f64..1000.0,
        increment in increments(),
        direction in prop_oneof![
            Just(RoundingDirection::Nearest),
            Just(RoundingDirection::Down),
            Just(RoundingDirection::Up),
        ],
    ) {
        let rounded = round_weight(weight, increment, direction).unwrap();
        prop_assert!(is_multiple(rounded, increment), "{rounded} is not a multiple of {increment}");
        prop_assert!(rounded >= 0.0);
    }

    #[test]
    fn prop_nearest_stays_within_half_increment(weight in 0.0_f64..1000.0, increment in increments()) {
        let rounded = round_weight(weight, increment, RoundingDirection::Nearest).unwrap();
        prop_assert!((rounded - weight).abs() <= increment / 2.0 + TOLERANCE);
    }

    #[test]
    fn prop_directions_bracket_the_weight(weight in 0.0_f64..1000.0, increment in increments()) {
        let down = round_weight(weight, increment, RoundingDirection::Down).unwrap();
        let up = round_weight(weight, increment, RoundingDirection::Up).unwrap();
        prop_assert!(down <= weight + TOLERANCE);
        prop_assert!(up >= weight - TOLERANCE);
        prop_assert!(up - down <= increment + TOLERANCE);
    }

    #[test]
    fn prop_rounding_is_idempotent(weight in 0.0_f64..1000.0, increment in increments()) {
        let once = round_weight(weight, increment, RoundingDirection::Nearest).unwrap();
        let twice = round_weight(once, increment, RoundingDirection::Down).unwrap();
        prop_assert!((once - twice).abs() < TOLERANCE);
    }

    #[test]
    fn prop_negative_weights_are_rejected(weight in -1000.0_f64..-0.001) {
        prop_assert!(round_weight(weight, 5.0, RoundingDirection::Nearest).is_err());
    }
}
