// ABOUTME: Main library entry point for the Vitalog health tracking API
// ABOUTME: Biometric logging plus fasting and workout session tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! # Vitalog Health Server
//!
//! A backend for logging biometric readings (weight, blood pressure, blood
//! sugar, BMI) and tracking timed sessions — intermittent-fasting windows and
//! exercise workouts — with derived analytics.
//!
//! ## Architecture
//!
//! - **Models**: session, workout, and biometric records with closed enums
//! - **Database**: `SQLite` via `sqlx` with per-concern managers
//! - **Sessions**: the lifecycle engine (single active session per user) and
//!   the pure calculators for metabolic phases, plan progress, and history
//!   aggregation
//! - **Routes**: thin axum handlers behind bearer-token authentication
//!
//! ## Example
//!
//! ```rust,no_run
//! use vitalog_server::config::ServerConfig;
//! use vitalog_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Vitalog configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Bearer token verification; issuance is an external collaborator's job
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// Shared server resources handed to request handlers
pub mod context;

/// `SQLite` persistence with per-concern managers
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Common data models
pub mod models;

/// Offset-based pagination for list endpoints
pub mod pagination;

/// HTTP route handlers organized by domain
pub mod routes;

/// Router assembly and serve loop
pub mod server;

/// Fasting session lifecycle and analytics engine
pub mod sessions;

/// Pure duration and percentage arithmetic
pub mod time_math;

/// Workout lifecycle and summary
pub mod workouts;
