// ABOUTME: Error handling re-exported from liftplan-core
// ABOUTME: AppError, ErrorCode, and AppResult shared by every engine module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Error types live in `liftplan-core` so data-model crates can use them
//! without depending on the engine. This module re-exports them unchanged.

pub use liftplan_core::errors::*;
