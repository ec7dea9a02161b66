// ABOUTME: Lifecycle driver for fasting sessions: start, stop, current, list
// ABOUTME: Validates input before any write and translates store conflicts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::sessions::SessionFilter;
use crate::errors::{AppError, AppResult};
use crate::models::{FastingPlan, FastingSession, SessionStatus, StartMode};
use crate::pagination::{Paginated, PaginationParams};
use crate::sessions::SessionStore;
use crate::time_math::{minutes_between, offset_duration};

/// End reason recorded when the client does not supply one
pub const DEFAULT_END_REASON: &str = "completed";

/// Backdating offset for a custom start
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CustomOffset {
    /// Hours before now the fast began
    pub hours: u32,
    /// Minutes before now the fast began, in addition to `hours`
    pub minutes: u32,
}

/// Optional overrides accepted by `stop`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopOptions {
    /// End timestamp; defaults to now. Must not precede the session start.
    pub end_time: Option<DateTime<Utc>>,
    /// Why the fast ended; defaults to [`DEFAULT_END_REASON`]
    pub end_reason: Option<String>,
}

/// Lifecycle driver over a [`SessionStore`].
///
/// States are `active` and `completed`; `active` is the only initial state,
/// `completed` is terminal, and `stop` is the only transition.
pub struct SessionTracker<S> {
    store: S,
}

impl<S: SessionStore> SessionTracker<S> {
    /// Create a tracker over the given store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Start a new fasting session.
    ///
    /// For `custom` starts the session is backdated by the offset; the
    /// offset must be positive (use `immediate` to start now) with minutes
    /// below 60. Validation happens before any persistence mutation.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a missing, zero, or malformed offset
    /// - `ActiveSessionExists` if the user already has an active session,
    ///   whether observed by the pre-check or by losing the insert race
    pub async fn start(
        &self,
        user_id: Uuid,
        start_mode: StartMode,
        offset: Option<CustomOffset>,
        plan: FastingPlan,
    ) -> AppResult<FastingSession> {
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

        if self.store.find_active(user_id).await?.is_some() {
            return Err(AppError::active_session_exists(
                "A fasting session is already in progress",
            ));
        }

        let session = FastingSession {
            id: Uuid::new_v4(),
            user_id,
            start_time,
            end_time: None,
            duration_minutes: None,
            status: SessionStatus::Active,
            start_mode,
            plan,
            end_reason: None,
            created_at: now,
            updated_at: now,
        };

        // The pre-check above is advisory; the store's uniqueness guarantee
        // decides the winner if two starts race past it.
        self.store.create(&session).await?;
        Ok(session)
    }

    /// Stop an active session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id does not exist or belongs to another user
    /// - `SessionNotActive` if the session is already completed
    /// - `InvalidInput` if the supplied end time precedes the start
    pub async fn stop(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        options: StopOptions,
    ) -> AppResult<FastingSession> {
        let session = self
            .store
            .find_by_id(session_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))?;

        if !session.is_active() {
            return Err(AppError::session_not_active(
                "Session is not active and cannot be stopped",
            ));
        }

        let end_time = options.end_time.unwrap_or_else(Utc::now);
        if end_time < session.start_time {
            return Err(AppError::invalid_input(
                "End time precedes the session start",
            ));
        }

        let duration_minutes = minutes_between(session.start_time, end_time);
        let end_reason = options
            .end_reason
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(DEFAULT_END_REASON);

        self.store
            .complete(session_id, user_id, end_time, duration_minutes, end_reason)
            .await
    }

    /// The user's active session with its duration computed live.
    ///
    /// Nothing is persisted; repeated polling reflects elapsed time.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn current(&self, user_id: Uuid) -> AppResult<Option<FastingSession>> {
        let session = self.store.find_active(user_id).await?;
        Ok(session.map(|mut s| {
            s.duration_minutes = Some(minutes_between(s.start_time, Utc::now()));
            s
        }))
    }

    /// Paginated session history, newest start first
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: SessionFilter,
        params: &PaginationParams,
    ) -> AppResult<Paginated<FastingSession>> {
        let items = self
            .store
            .list(user_id, filter, params.limit(), params.offset())
            .await?;
        let total = self.store.count(user_id, filter).await?;
        Ok(Paginated::new(items, params, total))
    }

    /// Fetch a session by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id does not exist or belongs to another user.
    pub async fn get(&self, user_id: Uuid, session_id: Uuid) -> AppResult<FastingSession> {
        self.store
            .find_by_id(session_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session not found"))
    }

    /// All completed sessions for aggregation
    ///
    /// # Errors
    ///
    /// Returns an error if the store lookup fails.
    pub async fn completed(&self, user_id: Uuid) -> AppResult<Vec<FastingSession>> {
        self.store.list_completed(user_id).await
    }
}
