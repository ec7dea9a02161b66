// ABOUTME: REST endpoints for workout lifecycle and summary
// ABOUTME: Mirrors the fasting routes with exercise types instead of plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthResult;
use crate::context::ServerResources;
use crate::database::sessions::SessionFilter;
use crate::errors::AppError;
use crate::models::{ExerciseType, StartMode};
use crate::pagination::PaginationParams;
use crate::sessions::tracker::CustomOffset;
use crate::workouts::{summarize_workouts, StopWorkoutOptions, WorkoutTracker};

/// Request to start a workout
#[derive(Debug, Deserialize)]
pub struct StartWorkoutRequest {
    /// Exercise category, e.g. `"running"`
    pub exercise_type: String,
    /// `"immediate"` (default) or `"custom"`
    pub start_mode: Option<String>,
    /// Backdating offset, required for custom starts
    pub offset: Option<CustomOffset>,
}

/// Request to stop a workout; every field optional
#[derive(Debug, Default, Deserialize)]
pub struct StopWorkoutRequest {
    /// End timestamp; defaults to now
    pub end_time: Option<DateTime<Utc>>,
    /// Calories reported by the client
    pub calories_burned: Option<i64>,
    /// Free-form note
    pub note: Option<String>,
}

/// Query parameters for the workout list
#[derive(Debug, Deserialize)]
pub struct ListWorkoutsQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
    /// `"active"`, `"completed"`, or `"all"` (default)
    pub status: Option<String>,
}

/// Workout routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/workouts/start", post(Self::handle_start))
            .route("/api/workouts", get(Self::handle_list))
            .route("/api/workouts/:id/stop", post(Self::handle_stop))
            .route("/api/workouts/current", get(Self::handle_current))
            .route("/api/workouts/summary", get(Self::handle_summary))
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

    fn tracker(resources: &Arc<ServerResources>) -> WorkoutTracker {
        WorkoutTracker::new(resources.database.workouts())
    }

    /// Start a workout
    async fn handle_start(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<StartWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let exercise_type = ExerciseType::parse(&request.exercise_type)?;
        let start_mode = match request.start_mode.as_deref() {
            None => StartMode::Immediate,
            Some(raw) => StartMode::parse(raw)?,
        };

        let workout = Self::tracker(&resources)
            .start(auth.user_id, exercise_type, start_mode, request.offset)
            .await?;

        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    /// Stop a workout
    async fn handle_stop(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<Uuid>,
        body: Option<Json<StopWorkoutRequest>>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let request = body.map(|Json(r)| r).unwrap_or_default();

        let workout = Self::tracker(&resources)
            .stop(
                auth.user_id,
                workout_id,
                StopWorkoutOptions {
                    end_time: request.end_time,
                    calories_burned: request.calories_burned,
                    note: request.note,
                },
            )
            .await?;

        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// The caller's active workout with live duration, or null
    async fn handle_current(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let workout = Self::tracker(&resources).current(auth.user_id).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Paginated workout history
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListWorkoutsQuery>,
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

    /// Aggregated statistics over the caller's completed workouts
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let workouts = Self::tracker(&resources).completed(auth.user_id).await?;
        let summary = summarize_workouts(&workouts);
        Ok((StatusCode::OK, Json(summary)).into_response())
    }
}
