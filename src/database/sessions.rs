// ABOUTME: Fasting session persistence: create, lookup, list, and completion
// ABOUTME: The partial unique index on active status backs the one-active invariant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{FastingPlan, FastingSession, SessionStatus, StartMode};

/// Status filter accepted by list/count queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFilter {
    /// Only active sessions
    Active,
    /// Only completed sessions
    Completed,
    /// No status restriction
    #[default]
    All,
}

impl SessionFilter {
    /// Parse the query-string representation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown filter value.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "all" => Ok(Self::All),
            other => Err(AppError::invalid_input(format!(
                "Unknown status filter: {other}"
            ))),
        }
    }

    const fn status_clause(self) -> &'static str {
        match self {
            Self::Active => " AND status = 'active'",
            Self::Completed => " AND status = 'completed'",
            Self::All => "",
        }
    }
}

/// Fasting session database operations
pub struct SessionManager {
    pool: SqlitePool,
}

impl SessionManager {
    /// Create a new session manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new active session.
    ///
    /// The partial unique index over `(user_id) WHERE status = 'active'`
    /// rejects a second concurrent insert; the violation is reported as
    /// `ActiveSessionExists` so racing starts collapse to one winner.
    ///
    /// # Errors
    ///
    /// Returns `ActiveSessionExists` if the user already has an active
    /// session, or a database error for other failures.
    pub async fn create(&self, session: &FastingSession) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO fasting_sessions
                (id, user_id, start_time, end_time, duration_minutes, status,
                 start_mode, plan, end_reason, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(session.start_time.to_rfc3339())
        .bind(session.end_time.map(|t| t.to_rfc3339()))
        .bind(session.duration_minutes)
        .bind(session.status.as_str())
        .bind(session.start_mode.as_str())
        .bind(session.plan.as_str())
        .bind(session.end_reason.as_deref())
        .bind(session.created_at.to_rfc3339())
        .bind(session.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::active_session_exists("A fasting session is already in progress")
            }
            _ => AppError::database(format!("Failed to create fasting session: {e}")),
        })?;

        Ok(())
    }

    /// Get the user's active session, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active(&self, user_id: Uuid) -> AppResult<Option<FastingSession>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, start_time, end_time, duration_minutes, status,
                   start_mode, plan, end_reason, created_at, updated_at
            FROM fasting_sessions
            WHERE user_id = $1 AND status = 'active'
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get active session: {e}")))?;

        row.map(|r| Self::row_to_session(&r)).transpose()
    }

    /// Get a session by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<FastingSession>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, start_time, end_time, duration_minutes, status,
                   start_mode, plan, end_reason, created_at, updated_at
            FROM fasting_sessions
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(session_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get session by id: {e}")))?;

        row.map(|r| Self::row_to_session(&r)).transpose()
    }

    /// List sessions ordered by start time descending, paginated
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
    ) -> AppResult<Vec<FastingSession>> {
        let query = format!(
            r"
            SELECT id, user_id, start_time, end_time, duration_minutes, status,
                   start_mode, plan, end_reason, created_at, updated_at
            FROM fasting_sessions
            WHERE user_id = $1{}
            ORDER BY start_time DESC
            LIMIT $2 OFFSET $3
            ",
            filter.status_clause()
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list sessions: {e}")))?;

        rows.iter().map(Self::row_to_session).collect()
    }

    /// Count sessions matching the filter
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self, user_id: Uuid, filter: SessionFilter) -> AppResult<i64> {
        let query = format!(
            "SELECT COUNT(*) as count FROM fasting_sessions WHERE user_id = $1{}",
            filter.status_clause()
        );

        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count sessions: {e}")))?;

        Ok(row.get("count"))
    }

    /// All completed sessions, most recently ended first.
    ///
    /// Feeds the analytics aggregation, which recomputes on demand and must
    /// never see in-progress (duration-undefined) sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_completed(&self, user_id: Uuid) -> AppResult<Vec<FastingSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, start_time, end_time, duration_minutes, status,
                   start_mode, plan, end_reason, created_at, updated_at
            FROM fasting_sessions
            WHERE user_id = $1 AND status = 'completed'
            ORDER BY end_time DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list completed sessions: {e}")))?;

        rows.iter().map(Self::row_to_session).collect()
    }

    /// Transition a session from active to completed.
    ///
    /// The `status = 'active'` guard makes the transition single-shot: a
    /// second stop updates zero rows and reports `SessionNotActive`.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotActive` if the session was already completed, or a
    /// database error for other failures.
    pub async fn complete(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        end_time: DateTime<Utc>,
        duration_minutes: i64,
        end_reason: &str,
    ) -> AppResult<FastingSession> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r"
            UPDATE fasting_sessions
            SET status = 'completed', end_time = $1, duration_minutes = $2,
                end_reason = $3, updated_at = $4
            WHERE id = $5 AND user_id = $6 AND status = 'active'
            ",
        )
        .bind(end_time.to_rfc3339())
        .bind(duration_minutes)
        .bind(end_reason)
        .bind(&now)
        .bind(session_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to complete session: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::session_not_active(
                "Session is not active and cannot be stopped",
            ));
        }

        self.find_by_id(session_id, user_id).await?.ok_or_else(|| {
            AppError::database("Completed session disappeared during update".to_owned())
        })
    }

    /// Convert a database row to a session record
    fn row_to_session(row: &SqliteRow) -> AppResult<FastingSession> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let status: String = row.get("status");
        let start_mode: String = row.get("start_mode");
        let plan: String = row.get("plan");
        let start_time: DateTime<Utc> = row.get("start_time");
        let end_time: Option<DateTime<Utc>> = row.get("end_time");
        let created_at: DateTime<Utc> = row.get("created_at");
        let updated_at: DateTime<Utc> = row.get("updated_at");

        Ok(FastingSession {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Invalid session id in database: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Invalid user id in database: {e}")))?,
            start_time,
            end_time,
            duration_minutes: row.get("duration_minutes"),
            status: SessionStatus::parse(&status)?,
            start_mode: StartMode::parse(&start_mode)?,
            plan: FastingPlan::parse(&plan)?,
            end_reason: row.get("end_reason"),
            created_at,
            updated_at,
        })
    }
}
