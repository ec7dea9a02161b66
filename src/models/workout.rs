// ABOUTME: Workout session record sharing the fasting lifecycle shape
// ABOUTME: Exercise types are a closed enum validated at the boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::session::{SessionStatus, StartMode};

/// Supported exercise categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Walking
    Walking,
    /// Running
    Running,
    /// Cycling
    Cycling,
    /// Swimming
    Swimming,
    /// Weight or resistance training
    StrengthTraining,
    /// Yoga or stretching
    Yoga,
    /// High-intensity interval training
    Hiit,
    /// Anything else
    Other,
}

impl ExerciseType {
    /// Database/wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Swimming => "swimming",
            Self::StrengthTraining => "strength_training",
            Self::Yoga => "yoga",
            Self::Hiit => "hiit",
            Self::Other => "other",
        }
    }

    /// Parse the database representation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an exercise type outside the supported set.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "walking" => Ok(Self::Walking),
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            "swimming" => Ok(Self::Swimming),
            "strength_training" => Ok(Self::StrengthTraining),
            "yoga" => Ok(Self::Yoga),
            "hiit" => Ok(Self::Hiit),
            "other" => Ok(Self::Other),
            other => Err(AppError::invalid_input(format!(
                "Unknown exercise type: {other}"
            ))),
        }
    }
}

/// A bounded workout interval, same lifecycle as a fasting session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Unique workout id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Exercise category
    pub exercise_type: ExerciseType,
    /// When the workout began
    pub start_time: DateTime<Utc>,
    /// When the workout ended; `None` while active
    pub end_time: Option<DateTime<Utc>>,
    /// Whole minutes between start and end; `None` while active
    pub duration_minutes: Option<i64>,
    /// Lifecycle state
    pub status: SessionStatus,
    /// How the start time was chosen
    pub start_mode: StartMode,
    /// Calories reported by the client at stop time
    pub calories_burned: Option<i64>,
    /// Free-form note
    pub note: Option<String>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last record mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl WorkoutSession {
    /// Whether the workout is still running
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}
