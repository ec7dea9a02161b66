// ABOUTME: REST endpoints for the fasting session lifecycle and analytics
// ABOUTME: Thin handlers: authenticate, parse enums at the boundary, delegate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Fasting routes.
//!
//! All endpoints require JWT authentication to identify the caller; sessions
//! are only ever visible to their owner.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthResult;
use crate::context::ServerResources;
use crate::database::sessions::SessionFilter;
use crate::errors::AppError;
use crate::models::{FastingPlan, StartMode};
use crate::pagination::PaginationParams;
use crate::sessions::tracker::CustomOffset;
use crate::sessions::{
    phase_breakdown, plan_progress, summarize_sessions, SessionTracker, StopOptions,
};
use crate::time_math::minutes_between;

/// Request to start a fasting session
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// `"immediate"` (default) or `"custom"`
    pub start_mode: Option<String>,
    /// Backdating offset, required for custom starts
    pub offset: Option<CustomOffset>,
    /// Plan ratio string, e.g. `"16:8"`
    pub plan: String,
}

/// Request to stop a fasting session; every field optional
#[derive(Debug, Default, Deserialize)]
pub struct StopSessionRequest {
    /// End timestamp; defaults to now
    pub end_time: Option<DateTime<Utc>>,
    /// Why the fast ended; defaults to `"completed"`
    pub end_reason: Option<String>,
}

/// Query parameters for the session list
#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
    /// `"active"`, `"completed"`, or `"all"` (default)
    pub status: Option<String>,
}

/// Fasting routes
pub struct FastingRoutes;

impl FastingRoutes {
    /// Create all fasting routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/fasting/start", post(Self::handle_start))
            .route("/api/fasting/sessions", get(Self::handle_list))
            .route("/api/fasting/sessions/:id/stop", post(Self::handle_stop))
            .route(
                "/api/fasting/sessions/:id/analytics",
                get(Self::handle_session_analytics),
            )
            .route("/api/fasting/current", get(Self::handle_current))
            .route("/api/fasting/summary", get(Self::handle_summary))
            .with_state(resources)
    }

    /// Extract and authenticate the caller from the authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        let auth_header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok());
        resources.auth.authenticate_request(auth_header)
    }

    fn tracker(resources: &Arc<ServerResources>) -> SessionTracker<crate::database::SessionManager> {
        SessionTracker::new(resources.database.sessions())
    }

    /// Start a fasting session
    async fn handle_start(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<StartSessionRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let start_mode = match request.start_mode.as_deref() {
            None => StartMode::Immediate,
            Some(raw) => StartMode::parse(raw)?,
        };
        let plan = FastingPlan::parse(&request.plan)?;

        let session = Self::tracker(&resources)
            .start(auth.user_id, start_mode, request.offset, plan)
            .await?;

        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    /// Stop a fasting session
    async fn handle_stop(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(session_id): Path<Uuid>,
        body: Option<Json<StopSessionRequest>>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let request = body.map(|Json(r)| r).unwrap_or_default();

        let session = Self::tracker(&resources)
            .stop(
                auth.user_id,
                session_id,
                StopOptions {
                    end_time: request.end_time,
                    end_reason: request.end_reason,
                },
            )
            .await?;

        Ok((StatusCode::OK, Json(session)).into_response())
    }

    /// The caller's active session with live duration, or null
    async fn handle_current(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let session = Self::tracker(&resources).current(auth.user_id).await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    /// Paginated session history
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListSessionsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let filter = match query.status.as_deref() {
            None => SessionFilter::All,
            Some(raw) => SessionFilter::parse(raw)?,
        };
        let params = PaginationParams {
            page: query.page,
            limit: query.limit,
        };

        let page = Self::tracker(&resources)
            .list(auth.user_id, filter, &params)
            .await?;

        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Phase and progress analytics for one session.
    ///
    /// Completed sessions use their recorded duration; an active session is
    /// measured live against the clock, consistent with `current`.
    async fn handle_session_analytics(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(session_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let session = Self::tracker(&resources)
            .get(auth.user_id, session_id)
            .await?;

        let duration_minutes = session
            .duration_minutes
            .unwrap_or_else(|| minutes_between(session.start_time, Utc::now()));

        let body = json!({
            "session": session,
            "phases": phase_breakdown(duration_minutes),
            "progress": plan_progress(duration_minutes, session.plan),
        });

        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Aggregated statistics over the caller's completed sessions
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let sessions = Self::tracker(&resources).completed(auth.user_id).await?;
        let summary = summarize_sessions(&sessions, Utc::now().date_naive());
        Ok((StatusCode::OK, Json(summary)).into_response())
    }
}
