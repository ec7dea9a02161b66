// ABOUTME: Bulk JSON export of everything the caller has logged
// ABOUTME: Read-only data takeout; nothing is mutated or deleted here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::auth::AuthResult;
use crate::context::ServerResources;
use crate::errors::AppError;
use crate::pagination::MAX_PAGE_SIZE;

/// Biometric rows fetched per table; exports are bounded, not streamed
const EXPORT_LIMIT: i64 = 100 * MAX_PAGE_SIZE;

/// Export routes
pub struct ExportRoutes;

impl ExportRoutes {
    /// Create the export route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/export", get(Self::handle_export))
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

    /// Dump the caller's sessions, workouts, and biometric logs as one document
    async fn handle_export(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let user_id = auth.user_id;

        let sessions = resources.database.sessions();
        let workouts = resources.database.workouts();
        let biometrics = resources.database.biometrics();

        let mut fasting_sessions = sessions.list_completed(user_id).await?;
        if let Some(active) = sessions.find_active(user_id).await? {
            fasting_sessions.insert(0, active);
        }

        let mut workout_sessions = workouts.list_completed(user_id).await?;
        if let Some(active) = workouts.find_active(user_id).await? {
            workout_sessions.insert(0, active);
        }

        let body = json!({
            "exported_at": Utc::now(),
            "user_id": user_id,
            "fasting_sessions": fasting_sessions,
            "workouts": workout_sessions,
            "weight_logs": biometrics.list_weight(user_id, EXPORT_LIMIT, 0).await?,
            "blood_pressure_logs": biometrics.list_blood_pressure(user_id, EXPORT_LIMIT, 0).await?,
            "blood_sugar_logs": biometrics.list_blood_sugar(user_id, EXPORT_LIMIT, 0).await?,
            "bmi_logs": biometrics.list_bmi(user_id, EXPORT_LIMIT, 0).await?,
        });

        Ok((StatusCode::OK, Json(body)).into_response())
    }
}
