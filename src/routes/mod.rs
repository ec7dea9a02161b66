// ABOUTME: Route module organization for the Vitalog HTTP endpoints
// ABOUTME: One module per domain; handlers stay thin and delegate to the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Route modules.
//!
//! Each domain module exposes a `routes(resources)` constructor returning an
//! axum `Router`; `server::build_router` merges them. All endpoints except
//! health require a bearer token.

/// Biometric log CRUD endpoints
pub mod biometrics;
/// Bulk JSON export of the caller's data
pub mod export;
/// Fasting session lifecycle and analytics endpoints
pub mod fasting;
/// Health check endpoint
pub mod health;
/// Workout lifecycle and summary endpoints
pub mod workouts;
