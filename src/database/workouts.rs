// ABOUTME: Workout session persistence mirroring the fasting session manager
// ABOUTME: Same one-active-per-user constraint, enforced on its own table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::database::sessions::SessionFilter;
use crate::errors::{AppError, AppResult};
use crate::models::{ExerciseType, SessionStatus, StartMode, WorkoutSession};

/// Workout session database operations
pub struct WorkoutManager {
    pool: SqlitePool,
}

impl WorkoutManager {
    /// Create a new workout manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new active workout.
    ///
    /// # Errors
    ///
    /// Returns `ActiveSessionExists` if the user already has a workout in
    /// progress, or a database error for other failures.
    pub async fn create(&self, workout: &WorkoutSession) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO workout_sessions
                (id, user_id, exercise_type, start_time, end_time, duration_minutes,
                 status, start_mode, calories_burned, note, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(workout.exercise_type.as_str())
        .bind(workout.start_time.to_rfc3339())
        .bind(workout.end_time.map(|t| t.to_rfc3339()))
        .bind(workout.duration_minutes)
        .bind(workout.status.as_str())
        .bind(workout.start_mode.as_str())
        .bind(workout.calories_burned)
        .bind(workout.note.as_deref())
        .bind(workout.created_at.to_rfc3339())
        .bind(workout.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::active_session_exists("A workout is already in progress")
            }
            _ => AppError::database(format!("Failed to create workout: {e}")),
        })?;

        Ok(())
    }

    /// Get the user's active workout, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active(&self, user_id: Uuid) -> AppResult<Option<WorkoutSession>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, exercise_type, start_time, end_time, duration_minutes,
                   status, start_mode, calories_burned, note, created_at, updated_at
            FROM workout_sessions
            WHERE user_id = $1 AND status = 'active'
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get active workout: {e}")))?;

        row.map(|r| Self::row_to_workout(&r)).transpose()
    }

    /// Get a workout by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        workout_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<WorkoutSession>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, exercise_type, start_time, end_time, duration_minutes,
                   status, start_mode, calories_burned, note, created_at, updated_at
            FROM workout_sessions
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout by id: {e}")))?;

        row.map(|r| Self::row_to_workout(&r)).transpose()
    }

    /// List workouts ordered by start time descending, paginated
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<WorkoutSession>> {
        let status_clause = match filter {
            SessionFilter::Active => " AND status = 'active'",
            SessionFilter::Completed => " AND status = 'completed'",
            SessionFilter::All => "",
        };
        let query = format!(
            r"
            SELECT id, user_id, exercise_type, start_time, end_time, duration_minutes,
                   status, start_mode, calories_burned, note, created_at, updated_at
            FROM workout_sessions
            WHERE user_id = $1{status_clause}
            ORDER BY start_time DESC
            LIMIT $2 OFFSET $3
            "
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    /// Count workouts matching the filter
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self, user_id: Uuid, filter: SessionFilter) -> AppResult<i64> {
        let status_clause = match filter {
            SessionFilter::Active => " AND status = 'active'",
            SessionFilter::Completed => " AND status = 'completed'",
            SessionFilter::All => "",
        };
        let query = format!(
            "SELECT COUNT(*) as count FROM workout_sessions WHERE user_id = $1{status_clause}"
        );

        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count workouts: {e}")))?;

        Ok(row.get("count"))
    }

    /// All completed workouts, most recently ended first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_completed(&self, user_id: Uuid) -> AppResult<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, exercise_type, start_time, end_time, duration_minutes,
                   status, start_mode, calories_burned, note, created_at, updated_at
            FROM workout_sessions
            WHERE user_id = $1 AND status = 'completed'
            ORDER BY end_time DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list completed workouts: {e}")))?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    /// Transition a workout from active to completed
    ///
    /// # Errors
    ///
    /// Returns `SessionNotActive` if the workout was already completed, or a
    /// database error for other failures.
    pub async fn complete(
        &self,
        workout_id: Uuid,
        user_id: Uuid,
        end_time: DateTime<Utc>,
        duration_minutes: i64,
        calories_burned: Option<i64>,
        note: Option<&str>,
    ) -> AppResult<WorkoutSession> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            UPDATE workout_sessions
            SET status = 'completed', end_time = $1, duration_minutes = $2,
                calories_burned = COALESCE($3, calories_burned),
                note = COALESCE($4, note),
                updated_at = $5
            WHERE id = $6 AND user_id = $7 AND status = 'active'
            ",
        )
        .bind(end_time.to_rfc3339())
        .bind(duration_minutes)
        .bind(calories_burned)
        .bind(note)
        .bind(&now)
        .bind(workout_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to complete workout: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::session_not_active(
                "Workout is not active and cannot be stopped",
            ));
        }

        self.find_by_id(workout_id, user_id).await?.ok_or_else(|| {
            AppError::database("Completed workout disappeared during update".to_owned())
        })
    }

    /// Convert a database row to a workout record
    fn row_to_workout(row: &SqliteRow) -> AppResult<WorkoutSession> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let exercise_type: String = row.get("exercise_type");
        let status: String = row.get("status");
        let start_mode: String = row.get("start_mode");
        let start_time: DateTime<Utc> = row.get("start_time");
        let end_time: Option<DateTime<Utc>> = row.get("end_time");
        let created_at: DateTime<Utc> = row.get("created_at");
        let updated_at: DateTime<Utc> = row.get("updated_at");

        Ok(WorkoutSession {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Invalid workout id in database: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Invalid user id in database: {e}")))?,
            exercise_type: ExerciseType::parse(&exercise_type)?,
            start_time,
            end_time,
            duration_minutes: row.get("duration_minutes"),
            status: SessionStatus::parse(&status)?,
            start_mode: StartMode::parse(&start_mode)?,
            calories_burned: row.get("calories_burned"),
            note: row.get("note"),
            created_at,
            updated_at,
        })
    }
}
