// ABOUTME: Main library entry point for the liftplan strategy composition engine
// ABOUTME: Prescribes training loads and set schemes and advances per-user progression
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # liftplan
//!
//! A strategy composition engine for structured strength-training programs.
//!
//! ## Features
//!
//! - **Load strategies**: percentage of a max, RPE targets, rep-max discovery,
//!   back-offs relative to a logged set, and competition tapers
//! - **Set schemes**: fixed and AMRAP layouts plus variable schemes (MRS,
//!   fatigue drops, rep totals) that decide set by set
//! - **Progressions**: linear, deload on failure, stage-based, and GreySkull
//!   AMRAP progressions driven by trigger events
//! - **Lookups**: weekly, daily, and rotation tables that modify prescriptions
//! - **Persistence**: every strategy round-trips through tagged JSON via
//!   [`registry::StrategyFactory`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use liftplan::external::InMemoryMaxLookup;
//! use liftplan::load::{LoadCalculationParams, LoadEnvironment, LoadStrategy};
//! use liftplan::registry::StrategyFactory;
//! use liftplan_core::models::MaxType;
//! use uuid::Uuid;
//!
//! # fn main() -> liftplan::errors::AppResult<()> {
//! let (user, lift) = (Uuid::new_v4(), Uuid::new_v4());
//! let maxes = InMemoryMaxLookup::new();
//! maxes.set_max(user, lift, MaxType::TrainingMax, 315.0);
//!
//! let factory = StrategyFactory::new();
//! let strategy = factory.load_strategy_from_json(
//!     r#"{"type":"PERCENT_OF","referenceType":"TRAINING_MAX","percentage":85}"#,
//! )?;
//! let env = LoadEnvironment::new().with_max_lookup(&maxes);
//! let load = strategy.calculate_load(&LoadCalculationParams::new(user, lift), &env)?;
//! assert!((load - 270.0).abs() < f64::EPSILON);
//! # Ok(())
//! # }
//! ```

/// Engine configuration loaded from the environment
pub mod config;

/// Unified error handling re-exported from `liftplan-core`
pub mod errors;

/// Max and session lookups consumed by load strategies
pub mod external;

/// Load strategies: how much weight to prescribe
pub mod load;

/// Weekly, daily, and rotation lookup tables and the modifier chain
pub mod lookup;

/// Structured logging setup
pub mod logging;

/// Per-user program cursor
pub mod program_state;

/// Progressions: how stored maxes change over time
pub mod progression;

/// Discriminator-keyed factory for all strategy families
pub mod registry;

/// Weight rounding to plate increments
pub mod rounding;

/// RPE charts and estimated one-rep max calculation
pub mod rpe;

/// Set schemes: how many sets and reps at the prescribed weight
pub mod set_scheme;
