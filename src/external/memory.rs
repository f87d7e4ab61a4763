// ABOUTME: DashMap-backed implementations of MaxLookup and SessionLookup
// ABOUTME: Thread-safe stores for tests, benchmarks, and embedding without a database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{MaxLookup, SessionLookup};
use crate::errors::AppResult;
use chrono::Utc;
use dashmap::DashMap;
use liftplan_core::models::{LoggedSetResult, MaxType, MaxValue};
use std::sync::Arc;
use uuid::Uuid;

/// Max store keyed by `(user, lift, max type)`
///
/// Uses `DashMap` for sharded locking so concurrent evaluations for different
/// users never contend on a single mutex.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMaxLookup {
    maxes: Arc<DashMap<(Uuid, Uuid, MaxType), MaxValue>>,
}

impl InMemoryMaxLookup {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a max, effective now
    pub fn set_max(&self, user_id: Uuid, lift_id: Uuid, max_type: MaxType, value: f64) {
        self.maxes.insert(
            (user_id, lift_id, max_type),
            MaxValue {
                value,
                effective_date: Utc::now(),
            },
        );
    }

    /// Remove a max
    pub fn remove_max(&self, user_id: Uuid, lift_id: Uuid, max_type: MaxType) {
        self.maxes.remove(&(user_id, lift_id, max_type));
    }
}

impl MaxLookup for InMemoryMaxLookup {
    fn get_current_max(
        &self,
        user_id: Uuid,
        lift_id: Uuid,
        max_type: MaxType,
    ) -> AppResult<Option<MaxValue>> {
        Ok(self
            .maxes
            .get(&(user_id, lift_id, max_type))
            .map(|entry| *entry.value()))
    }
}

/// Logged sets keyed by `(session, lift)`, in logging order
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionLookup {
    sets: Arc<DashMap<(Uuid, Uuid), Vec<LoggedSetResult>>>,
}

impl InMemorySessionLookup {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a logged set for a lift within a session
    pub fn log_set(&self, session_id: Uuid, lift_id: Uuid, set: LoggedSetResult) {
        self.sets.entry((session_id, lift_id)).or_default().push(set);
    }

    /// Number of sets logged for a lift within a session
    #[must_use]
    pub fn logged_count(&self, session_id: Uuid, lift_id: Uuid) -> usize {
        self.sets
            .get(&(session_id, lift_id))
            .map_or(0, |sets| sets.len())
    }
}

impl SessionLookup for InMemorySessionLookup {
    fn get_logged_set_by_index(
        &self,
        session_id: Uuid,
        lift_id: Uuid,
        index: u32,
    ) -> AppResult<Option<LoggedSetResult>> {
        Ok(self
            .sets
            .get(&(session_id, lift_id))
            .and_then(|sets| sets.get(index as usize).copied()))
    }
}
