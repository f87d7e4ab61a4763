// ABOUTME: Consecutive-failure bookkeeping keyed by user, lift, and progression
// ABOUTME: Plain value mutated by the caller; persistence and locking live outside the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Composite key for a failure counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureCounterKey {
    /// Lifter
    pub user_id: Uuid,
    /// Lift
    pub lift_id: Uuid,
    /// Progression the streak belongs to
    pub progression_id: Uuid,
}

/// Failure streak for one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureCounter {
    /// Owning key
    pub key: FailureCounterKey,
    /// Failures since the last success or reset
    pub consecutive_failures: u32,
    /// Most recent failure
    pub last_failure_at: Option<DateTime<Utc>>,
    /// Most recent success
    pub last_success_at: Option<DateTime<Utc>>,
}

impl FailureCounter {
    /// Empty counter for `key`
    #[must_use]
    pub const fn new(key: FailureCounterKey) -> Self {
        Self {
            key,
            consecutive_failures: 0,
            last_failure_at: None,
            last_success_at: None,
        }
    }

    /// Record a failure and return the new streak length
    pub fn record_failure(&mut self, at: DateTime<Utc>) -> u32 {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_failure_at = Some(at);
        self.consecutive_failures
    }

    /// Record a success, ending any streak
    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.consecutive_failures = 0;
        self.last_success_at = Some(at);
    }

    /// Clear the streak, keeping timestamps
    pub fn reset(&mut self) {
        self.consecutive_failures = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_lifecycle() {
        let key = FailureCounterKey {
            user_id: Uuid::new_v4(),
            lift_id: Uuid::new_v4(),
            progression_id: Uuid::new_v4(),
        };
        let mut counter = FailureCounter::new(key);
        let now = Utc::now();
        assert_eq!(counter.record_failure(now), 1);
        assert_eq!(counter.record_failure(now), 2);
        counter.record_success(now);
        assert_eq!(counter.consecutive_failures, 0);
        assert_eq!(counter.last_failure_at, Some(now));
        assert_eq!(counter.last_success_at, Some(now));

        counter.record_failure(now);
        counter.reset();
        assert_eq!(counter.consecutive_failures, 0);
    }
}
