// ABOUTME: Workout lifecycle and summary, the exercise twin of the fasting engine
// ABOUTME: Same one-active invariant and start/stop semantics, lighter analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Workout tracking.
//!
//! Workouts follow the same lifecycle as fasting sessions (single active
//! session per user, `active -> completed` only) without plans or metabolic
//! phases; the summary breaks totals down per exercise type instead.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::sessions::SessionFilter;
use crate::database::workouts::WorkoutManager;
use crate::errors::{AppError, AppResult};
use crate::models::{ExerciseType, SessionStatus, StartMode, WorkoutSession};
use crate::pagination::{Paginated, PaginationParams};
use crate::sessions::tracker::CustomOffset;
use crate::time_math::{minutes_between, minutes_to_hours, offset_duration, round_two};

/// How many workouts the summary lists individually
const RECENT_WORKOUT_COUNT: usize = 5;

/// Optional overrides accepted when stopping a workout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopWorkoutOptions {
    /// End timestamp; defaults to now. Must not precede the workout start.
    pub end_time: Option<DateTime<Utc>>,
    /// Calories reported by the client
    pub calories_burned: Option<i64>,
    /// Free-form note
    pub note: Option<String>,
}

/// Lifecycle driver for workouts
pub struct WorkoutTracker {
    manager: WorkoutManager,
}

impl WorkoutTracker {
    /// Create a tracker over the workout manager
    #[must_use]
    pub const fn new(manager: WorkoutManager) -> Self {
        Self { manager }
    }

    /// Start a new workout.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a missing, zero, or malformed custom offset
    /// - `ActiveSessionExists` if a workout is already in progress
    pub async fn start(
        &self,
        user_id: Uuid,
        exercise_type: ExerciseType,
        start_mode: StartMode,
        offset: Option<CustomOffset>,
    ) -> AppResult<WorkoutSession> {
        let now = Utc::now();
        let start_time = match start_mode {
            StartMode::Immediate => now,
            StartMode::Custom => {
                let offset = offset.ok_or_else(|| {
                    AppError::invalid_input("Custom start requires an hour/minute offset")
                })?;
                if offset.minutes > 59 {
                    return Err(AppError::invalid_input(
                        "Offset minutes must be between 0 and 59",
                    ));
                }
                let backdate = offset_duration(offset.hours, offset.minutes);
                if backdate.is_zero() {
                    return Err(AppError::invalid_input(
                        "Offset must be greater than zero; use immediate start instead",
                    ));
                }
                now - backdate
            }
        };

        if self.manager.find_active(user_id).await?.is_some() {
            return Err(AppError::active_session_exists(
                "A workout is already in progress",
            ));
        }

        let workout = WorkoutSession {
            id: Uuid::new_v4(),
            user_id,
            exercise_type,
            start_time,
            end_time: None,
            duration_minutes: None,
            status: SessionStatus::Active,
            start_mode,
            calories_burned: None,
            note: None,
            created_at: now,
            updated_at: now,
        };

        self.manager.create(&workout).await?;
        Ok(workout)
    }

    /// Stop an active workout.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id does not exist or belongs to another user
    /// - `SessionNotActive` if the workout is already completed
    /// - `InvalidInput` if the supplied end time precedes the start or the
    ///   reported calories are negative
    pub async fn stop(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        options: StopWorkoutOptions,
    ) -> AppResult<WorkoutSession> {
        let workout = self
            .manager
            .find_by_id(workout_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout not found"))?;

        if !workout.is_active() {
            return Err(AppError::session_not_active(
                "Workout is not active and cannot be stopped",
            ));
        }

        let end_time = options.end_time.unwrap_or_else(Utc::now);
        if end_time < workout.start_time {
            return Err(AppError::invalid_input(
                "End time precedes the workout start",
            ));
        }
        if options.calories_burned.is_some_and(|c| c < 0) {
            return Err(AppError::invalid_input("Calories must not be negative"));
        }

        let duration_minutes = minutes_between(workout.start_time, end_time);
        self.manager
            .complete(
                workout_id,
                user_id,
                end_time,
                duration_minutes,
                options.calories_burned,
                options.note.as_deref(),
            )
            .await
    }

    /// The user's active workout with its duration computed live
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn current(&self, user_id: Uuid) -> AppResult<Option<WorkoutSession>> {
        let workout = self.manager.find_active(user_id).await?;
        Ok(workout.map(|mut w| {
            w.duration_minutes = Some(minutes_between(w.start_time, Utc::now()));
            w
        }))
    }

    /// Paginated workout history, newest start first
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
        params: &PaginationParams,
    ) -> AppResult<Paginated<WorkoutSession>> {
        let items = self
            .manager
            .list(user_id, filter, params.limit(), params.offset())
            .await?;
        let total = self.manager.count(user_id, filter).await?;
        Ok(Paginated::new(items, params, total))
    }

    /// All completed workouts for aggregation
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn completed(&self, user_id: Uuid) -> AppResult<Vec<WorkoutSession>> {
        self.manager.list_completed(user_id).await
    }
}

/// Per-exercise-type slice of the workout summary
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ExerciseTotals {
    /// Completed workouts of this type
    pub count: i64,
    /// Hours accumulated in this type, two decimals
    pub hours: f64,
}

/// One line of the recent-workout digest
#[derive(Debug, Clone, Serialize)]
pub struct RecentWorkout {
    /// Workout id
    pub id: Uuid,
    /// Calendar day the workout ended
    pub date: NaiveDate,
    /// Exercise category
    pub exercise_type: ExerciseType,
    /// Total length in minutes
    pub duration_minutes: i64,
    /// Calories reported at stop time
    pub calories_burned: Option<i64>,
}

/// Aggregated statistics over a user's completed workouts
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSummary {
    /// Number of completed workouts
    pub total_workouts: usize,
    /// Sum of all workout lengths in hours
    pub total_duration_hours: f64,
    /// Sum of reported calories
    pub total_calories: i64,
    /// Totals per exercise type, keyed by the type's wire name
    pub by_exercise_type: BTreeMap<String, ExerciseTotals>,
    /// Most recent workouts, newest first
    pub recent_workouts: Vec<RecentWorkout>,
}

/// Aggregate a user's completed workouts.
///
/// In-progress workouts carry no duration and are excluded; an empty input
/// yields the all-zero summary.
#[must_use]
pub fn summarize_workouts(workouts: &[WorkoutSession]) -> WorkoutSummary {
    let mut completed: Vec<&WorkoutSession> = workouts
        .iter()
        .filter(|w| w.status == SessionStatus::Completed)
        .filter(|w| w.end_time.is_some() && w.duration_minutes.is_some())
        .collect();
    completed.sort_by(|a, b| b.end_time.cmp(&a.end_time));

    let mut total_minutes: i64 = 0;
    let mut total_calories: i64 = 0;
    let mut minutes_by_type: BTreeMap<String, (i64, i64)> = BTreeMap::new();

    for workout in &completed {
        let duration = workout.duration_minutes.unwrap_or(0).max(0);
        total_minutes += duration;
        total_calories += workout.calories_burned.unwrap_or(0).max(0);

        let entry = minutes_by_type
            .entry(workout.exercise_type.as_str().to_owned())
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += duration;
    }

    let by_exercise_type = minutes_by_type
        .into_iter()
        .map(|(kind, (count, minutes))| {
            (
                kind,
                ExerciseTotals {
                    count,
                    hours: round_two(minutes_to_hours(minutes)),
                },
            )
        })
        .collect();

    let recent_workouts = completed
        .iter()
        .take(RECENT_WORKOUT_COUNT)
        .filter_map(|w| {
            let end_time = w.end_time?;
            let duration = w.duration_minutes?;
            Some(RecentWorkout {
                id: w.id,
                date: end_time.date_naive(),
                exercise_type: w.exercise_type,
                duration_minutes: duration,
                calories_burned: w.calories_burned,
            })
        })
        .collect();

    WorkoutSummary {
        total_workouts: completed.len(),
        total_duration_hours: round_two(minutes_to_hours(total_minutes)),
        total_calories,
        by_exercise_type,
        recent_workouts,
    }
}
