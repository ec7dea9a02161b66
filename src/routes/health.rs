// ABOUTME: Liveness endpoint with a database ping for operational visibility
// ABOUTME: The only route that does not require authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::context::ServerResources;

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Report process liveness and database reachability
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let database_ok = resources.database.ping().await.is_ok();
        let status = if database_ok { "ok" } else { "degraded" };
        let code = if database_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        let body = json!({
            "status": status,
            "database": if database_ok { "up" } else { "down" },
            "version": env!("CARGO_PKG_VERSION"),
        });

        (code, Json(body)).into_response()
    }
}
