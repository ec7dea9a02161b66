// ABOUTME: Router assembly and HTTP serve loop with graceful shutdown
// ABOUTME: Request tracing, request ids, timeout, CORS, and body limits live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::context::ServerResources;
use crate::errors::{AppError, AppResult};
use crate::routes::biometrics::BiometricsRoutes;
use crate::routes::export::ExportRoutes;
use crate::routes::fasting::FastingRoutes;
use crate::routes::health::HealthRoutes;
use crate::routes::workouts::WorkoutRoutes;

/// Per-request deadline; also bounds every persistence call within a request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Request body cap; biometric and session payloads are tiny
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Compose all route modules into the application router
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(FastingRoutes::routes(resources.clone()))
        .merge(WorkoutRoutes::routes(resources.clone()))
        .merge(BiometricsRoutes::routes(resources.clone()))
        .merge(ExportRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
}

/// Bind the listener and serve until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server loop fails.
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
