// ABOUTME: Fasting session engine: lifecycle, phase partitioning, progress, analytics
// ABOUTME: The store trait is the seam between the engine and sqlx persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Session lifecycle and analytics engine.
//!
//! [`SessionTracker`] drives the `active -> completed` state machine against
//! any [`SessionStore`]; the calculators are pure functions over completed
//! durations so they can be exercised without a database.

/// Cross-session aggregation: totals, streaks, plan usage, recents
pub mod analytics;
/// Metabolic phase partitioning of a fast's duration
pub mod phases;
/// Progress of a session against its plan's target hours
pub mod progress;
/// Start/stop/current/list lifecycle driver
pub mod tracker;

pub use analytics::{summarize_sessions, PhaseHours, RecentSession, SessionSummary};
pub use phases::{phase_breakdown, MetabolicPhase, PhaseSlice};
pub use progress::{plan_progress, PlanProgress};
pub use tracker::{CustomOffset, SessionTracker, StopOptions, DEFAULT_END_REASON};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::sessions::{SessionFilter, SessionManager};
use crate::errors::AppResult;
use crate::models::FastingSession;

/// Persistence operations the lifecycle engine needs.
///
/// Implementations must guarantee that `create` fails with
/// `ActiveSessionExists` when the user already has an active session, even
/// under concurrent calls; the `SQLite` implementation backs this with a
/// partial unique index.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new active session
    async fn create(&self, session: &FastingSession) -> AppResult<()>;

    /// Get the user's active session, if any
    async fn find_active(&self, user_id: Uuid) -> AppResult<Option<FastingSession>>;

    /// Get a session by id, scoped to its owner
    async fn find_by_id(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<FastingSession>>;

    /// List sessions ordered by start time descending
    async fn list(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<FastingSession>>;

    /// Count sessions matching the filter
    async fn count(&self, user_id: Uuid, filter: SessionFilter) -> AppResult<i64>;

    /// All completed sessions, most recently ended first
    async fn list_completed(&self, user_id: Uuid) -> AppResult<Vec<FastingSession>>;

    /// Transition a session from active to completed
    async fn complete(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        end_time: DateTime<Utc>,
        duration_minutes: i64,
        end_reason: &str,
    ) -> AppResult<FastingSession>;
}

#[async_trait]
impl SessionStore for SessionManager {
    async fn create(&self, session: &FastingSession) -> AppResult<()> {
        Self::create(self, session).await
    }

    async fn find_active(&self, user_id: Uuid) -> AppResult<Option<FastingSession>> {
        Self::find_active(self, user_id).await
    }

    async fn find_by_id(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<FastingSession>> {
        Self::find_by_id(self, session_id, user_id).await
    }

    async fn list(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<FastingSession>> {
        Self::list(self, user_id, filter, limit, offset).await
    }

    async fn count(&self, user_id: Uuid, filter: SessionFilter) -> AppResult<i64> {
        Self::count(self, user_id, filter).await
    }

    async fn list_completed(&self, user_id: Uuid) -> AppResult<Vec<FastingSession>> {
        Self::list_completed(self, user_id).await
    }

    async fn complete(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        end_time: DateTime<Utc>,
        duration_minutes: i64,
        end_reason: &str,
    ) -> AppResult<FastingSession> {
        Self::complete(self, session_id, user_id, end_time, duration_minutes, end_reason).await
    }
}
