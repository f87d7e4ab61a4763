// ABOUTME: Boundary traits for the max and session lookups the engine reads from
// ABOUTME: Persistence layers implement these; an in-memory backend ships for tests and tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! External Lookups
//!
//! The engine never owns storage. Load strategies read current maxes and
//! already-logged sets through these traits. A `None` result means the record
//! does not exist; an `Err` means the lookup itself failed and is wrapped with
//! context by the caller.

/// In-memory lookup backends
pub mod memory;

pub use memory::{InMemoryMaxLookup, InMemorySessionLookup};

use crate::errors::AppResult;
use liftplan_core::models::{LoggedSetResult, MaxType, MaxValue};
use uuid::Uuid;

/// Read access to a user's current maxes
pub trait MaxLookup: Send + Sync {
    /// Current max of `max_type` for a user and lift
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read
    fn get_current_max(
        &self,
        user_id: Uuid,
        lift_id: Uuid,
        max_type: MaxType,
    ) -> AppResult<Option<MaxValue>>;
}

/// Read access to sets logged within a session
pub trait SessionLookup: Send + Sync {
    /// Logged set at 0-based `index` for a lift within a session
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read
    fn get_logged_set_by_index(
        &self,
        session_id: Uuid,
        lift_id: Uuid,
        index: u32,
    ) -> AppResult<Option<LoggedSetResult>>;
}
