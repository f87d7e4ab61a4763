// ABOUTME: LoadStrategy trait and shared calculation inputs for target-weight prescriptions
// ABOUTME: Provides explicit per-call params, injected lookup environment, and variant re-exports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Load Strategy Module
//!
//! A load strategy turns a user/lift identity plus external lookups into a
//! concrete target weight. Variants are independent types behind the
//! [`LoadStrategy`] trait so that new variants register with the
//! [`StrategyFactory`](crate::registry::StrategyFactory) without touching
//! existing dispatch code.
//!
//! | Discriminator | Type | Reads |
//! |---|---|---|
//! | `PERCENT_OF` | [`PercentOfStrategy`] | max lookup, lookup context |
//! | `RPE_TARGET` | [`RpeTargetStrategy`] | max lookup (`ONE_RM`), RPE chart |
//! | `FIND_RM` | [`FindRmStrategy`] | nothing |
//! | `RELATIVE_TO` | [`RelativeToStrategy`] | session lookup |
//! | `TAPER` | [`TaperStrategy`] | whatever the wrapped strategy reads |
//!
//! Dependencies are not stored on strategies. Each call receives a
//! [`LoadEnvironment`] with the lookups and chart, and [`LoadCalculationParams`]
//! with identity, cursor, and the optional side-channel values (`session_id`
//! for `RELATIVE_TO`, `days_out` for `TAPER`).

/// Fixed-rep strategy where the lifter chooses the weight
pub mod find_rm;
/// Percentage of a reference max
pub mod percent_of;
/// Percentage of a set logged earlier in the same session
pub mod relative_to;
/// Percentage of 1RM from an RPE chart
pub mod rpe_target;
/// Taper decorator around another strategy
pub mod taper;

pub use find_rm::FindRmStrategy;
pub use percent_of::PercentOfStrategy;
pub use relative_to::RelativeToStrategy;
pub use rpe_target::RpeTargetStrategy;
pub use taper::{TaperStrategy, TaperTier};

use crate::errors::{AppError, AppResult};
use crate::external::{MaxLookup, SessionLookup};
use crate::lookup::LookupContext;
use crate::rpe::RpeChart;
use liftplan_core::models::{LoggedSetResult, MaxType};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// Strategy that computes a target weight
pub trait LoadStrategy: fmt::Debug + Send + Sync {
    /// Discriminator used for persistence
    fn strategy_type(&self) -> &'static str;

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first invalid field
    fn validate(&self) -> AppResult<()>;

    /// Compute the target weight
    ///
    /// # Errors
    ///
    /// Returns an error for invalid params or configuration, missing data, or
    /// a failed lookup
    fn calculate_load(
        &self,
        params: &LoadCalculationParams<'_>,
        env: &LoadEnvironment<'_>,
    ) -> AppResult<f64>;

    /// Tagged JSON payload including the `type` discriminator
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails
    fn to_payload(&self) -> AppResult<Value>;

    /// Downcasting hook for callers that need the concrete variant
    fn as_any(&self) -> &dyn Any;
}

/// Per-call inputs for a load calculation
#[derive(Debug, Clone, Copy)]
pub struct LoadCalculationParams<'a> {
    /// Lifter
    pub user_id: Uuid,
    /// Lift being prescribed
    pub lift_id: Uuid,
    /// Program cursor and modifier tables
    pub lookup: Option<&'a LookupContext>,
    /// Session the prescription belongs to (`RELATIVE_TO`)
    pub session_id: Option<Uuid>,
    /// Days until competition (`TAPER`)
    pub days_out: Option<i32>,
}

impl<'a> LoadCalculationParams<'a> {
    /// Params for a user and lift with no optional inputs
    #[must_use]
    pub const fn new(user_id: Uuid, lift_id: Uuid) -> Self {
        Self {
            user_id,
            lift_id,
            lookup: None,
            session_id: None,
            days_out: None,
        }
    }

    /// Attach a lookup context
    #[must_use]
    pub const fn with_lookup(mut self, lookup: &'a LookupContext) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Attach a session
    #[must_use]
    pub const fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Attach days until competition
    #[must_use]
    pub const fn with_days_out(mut self, days_out: i32) -> Self {
        self.days_out = Some(days_out);
        self
    }

    /// Check identity and the attached lookup context
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` for a nil user or lift, or the context's
    /// validation error
    pub fn validate(&self) -> AppResult<()> {
        if self.user_id.is_nil() {
            return Err(AppError::invalid_params("user id is required"));
        }
        if self.lift_id.is_nil() {
            return Err(AppError::invalid_params("lift id is required"));
        }
        if let Some(lookup) = self.lookup {
            lookup.validate()?;
        }
        Ok(())
    }
}

/// Read-only collaborators injected into a load calculation
#[derive(Clone, Copy, Default)]
pub struct LoadEnvironment<'a> {
    /// Current maxes
    pub max_lookup: Option<&'a dyn MaxLookup>,
    /// Logged sets
    pub session_lookup: Option<&'a dyn SessionLookup>,
    /// Default RPE chart when the lookup context carries none
    pub rpe_chart: Option<&'a RpeChart>,
}

impl fmt::Debug for LoadEnvironment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadEnvironment")
            .field("max_lookup", &self.max_lookup.is_some())
            .field("session_lookup", &self.session_lookup.is_some())
            .field("rpe_chart", &self.rpe_chart.map(RpeChart::len))
            .finish()
    }
}

impl<'a> LoadEnvironment<'a> {
    /// Empty environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a max lookup
    #[must_use]
    pub fn with_max_lookup(mut self, lookup: &'a dyn MaxLookup) -> Self {
        self.max_lookup = Some(lookup);
        self
    }

    /// Attach a session lookup
    #[must_use]
    pub fn with_session_lookup(mut self, lookup: &'a dyn SessionLookup) -> Self {
        self.session_lookup = Some(lookup);
        self
    }

    /// Attach a default RPE chart
    #[must_use]
    pub fn with_rpe_chart(mut self, chart: &'a RpeChart) -> Self {
        self.rpe_chart = Some(chart);
        self
    }

    /// Fetch a max value, mapping absence to `MaxNotFound`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` without a max lookup, `LookupFailed` when the
    /// lookup errors, and `MaxNotFound` when no max exists
    pub fn fetch_max(&self, user_id: Uuid, lift_id: Uuid, max_type: MaxType) -> AppResult<f64> {
        let lookup = self
            .max_lookup
            .ok_or_else(|| AppError::invalid_params("max lookup is not configured"))?;
        let max = lookup
            .get_current_max(user_id, lift_id, max_type)
            .map_err(|e| {
                AppError::lookup_failed(
                    format!("failed to fetch {max_type} for user {user_id}, lift {lift_id}"),
                    e,
                )
            })?
            .ok_or_else(|| {
                AppError::max_not_found(format!(
                    "no {max_type} recorded for user {user_id}, lift {lift_id}"
                ))
            })?;
        Ok(max.value)
    }

    /// Fetch a logged set, mapping absence to `ReferenceSetNotFound`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` without a session lookup, `LookupFailed` when
    /// the lookup errors, and `ReferenceSetNotFound` when the set is not logged
    pub fn fetch_logged_set(
        &self,
        session_id: Uuid,
        lift_id: Uuid,
        index: u32,
    ) -> AppResult<LoggedSetResult> {
        let lookup = self
            .session_lookup
            .ok_or_else(|| AppError::invalid_params("session lookup is not configured"))?;
        lookup
            .get_logged_set_by_index(session_id, lift_id, index)
            .map_err(|e| {
                AppError::lookup_failed(
                    format!("failed to fetch set {index} of session {session_id}"),
                    e,
                )
            })?
            .ok_or_else(|| {
                AppError::reference_set_not_found(format!(
                    "set {index} for lift {lift_id} has not been logged in session {session_id}"
                ))
            })
    }
}

/// Check that a percentage is positive and finite
pub(crate) fn validate_percentage(percentage: f64) -> AppResult<()> {
    if !percentage.is_finite() || percentage <= 0.0 {
        return Err(AppError::out_of_range(format!(
            "percentage must be positive, got {percentage}"
        )));
    }
    Ok(())
}
