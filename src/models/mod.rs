// ABOUTME: Common data models shared across persistence, engine, and routes
// ABOUTME: Sessions, workouts, and biometric log records with their closed enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Data models.
//!
//! All timestamps are `chrono::DateTime<Utc>` and serialize as ISO-8601.
//! Closed vocabularies (session status, start mode, fasting plan, exercise
//! type, measurement context) are enums validated at the boundary, never
//! free-form strings.

/// Biometric log records (weight, blood pressure, blood sugar, BMI)
pub mod biometrics;
/// Fasting session record and its enums
pub mod session;
/// Workout session record and exercise types
pub mod workout;

pub use biometrics::{
    BloodPressureLog, BloodSugarLog, BmiLog, MeasurementContext, WeightLog,
};
pub use session::{FastingPlan, FastingSession, SessionStatus, StartMode};
pub use workout::{ExerciseType, WorkoutSession};
