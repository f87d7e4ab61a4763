// ABOUTME: Core types and constants for the liftplan strength programming engine
// ABOUTME: Foundation crate with error handling, shared domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Liftplan Core
//!
//! Foundation crate providing shared types and constants for the liftplan
//! strategy composition engine. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Validation ranges and defaults shared by every strategy family
//! - **models**: Max types, trigger types, rounding directions, and lookup results

/// Unified error handling system with standard error codes
pub mod errors;

/// Validation ranges and default values organized by domain
pub mod constants;

/// Shared domain models (`MaxType`, `TriggerType`, `RoundingDirection`, lookup results)
pub mod models;
