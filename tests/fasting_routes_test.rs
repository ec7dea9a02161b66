// ABOUTME: Route-level tests driving the axum router end to end
// ABOUTME: Auth enforcement, JSON shapes, and error statuses over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

// Test files: allow missing_docs and unwrap
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use axum::body::Body;
use axum::Router;
use http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use vitalog_server::server::build_router;

async fn test_router() -> (Router, String, tempfile::NamedTempFile) {
    let (resources, file) = common::test_resources().await;
    let auth = common::test_auth_manager();
    let token = common::bearer_token(&auth, Uuid::new_v4());
    (build_router(resources), token, file)
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_needs_no_token() {
    let (router, _token, _file) = test_router().await;
    let (status, body) = send(&router, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn fasting_endpoints_require_a_bearer_token() {
    let (router, _token, _file) = test_router().await;
    let (status, body) = send(
        &router,
        "POST",
        "/api/fasting/start",
        None,
        Some(json!({ "plan": "16:8" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "auth_invalid");
}

#[tokio::test]
async fn start_stop_current_over_http() {
    let (router, token, _file) = test_router().await;

    // Start
    let (status, session) = send(
        &router,
        "POST",
        "/api/fasting/start",
        Some(&token),
        Some(json!({ "plan": "16:8" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["status"], "active");
    assert_eq!(session["plan"], "16:8");
    assert!(session["end_time"].is_null());
    let id = session["id"].as_str().unwrap().to_owned();

    // Current reflects the running session with a live duration
    let (status, current) = send(&router, "GET", "/api/fasting/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["id"], session["id"]);
    assert!(current["duration_minutes"].is_i64());

    // A second start conflicts
    let (status, body) = send(
        &router,
        "POST",
        "/api/fasting/start",
        Some(&token),
        Some(json!({ "plan": "18:6" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "active_session_exists");

    // Stop
    let (status, stopped) = send(
        &router,
        "POST",
        &format!("/api/fasting/sessions/{id}/stop"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stopped["status"], "completed");
    assert_eq!(stopped["end_reason"], "completed");
    assert!(stopped["duration_minutes"].is_i64());

    // Stopping again conflicts
    let (status, body) = send(
        &router,
        "POST",
        &format!("/api/fasting/sessions/{id}/stop"),
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "session_not_active");

    // No active session anymore
    let (status, current) = send(&router, "GET", "/api/fasting/current", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(current.is_null());
}

#[tokio::test]
async fn unknown_plan_is_rejected_at_the_boundary() {
    let (router, token, _file) = test_router().await;
    let (status, body) = send(
        &router,
        "POST",
        "/api/fasting/start",
        Some(&token),
        Some(json!({ "plan": "15:9" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn session_analytics_and_summary_over_http() {
    let (router, token, _file) = test_router().await;

    let (_, session) = send(
        &router,
        "POST",
        "/api/fasting/start",
        Some(&token),
        Some(json!({
            "start_mode": "custom",
            "offset": { "hours": 10, "minutes": 0 },
            "plan": "16:8"
        })),
    )
    .await;
    let id = session["id"].as_str().unwrap().to_owned();

    let (_, _) = send(
        &router,
        "POST",
        &format!("/api/fasting/sessions/{id}/stop"),
        Some(&token),
        Some(json!({})),
    )
    .await;

    let (status, analytics) = send(
        &router,
        "GET",
        &format!("/api/fasting/sessions/{id}/analytics"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let phases = analytics["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 4);
    assert_eq!(phases[0]["phase"], "fed");
    assert_eq!(phases[0]["minutes"], 240);
    assert_eq!(phases[1]["phase"], "transition");
    assert_eq!(phases[1]["minutes"], 360);
    assert_eq!(analytics["progress"]["target_hours"], 16);

    let (status, summary) = send(&router, "GET", "/api/fasting/summary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_sessions"], 1);
    assert_eq!(summary["plan_usage"]["16:8"], 1);
    assert_eq!(summary["current_streak_days"], 1);
}

#[tokio::test]
async fn list_endpoint_paginates_with_total_pages() {
    let (router, token, _file) = test_router().await;

    // Three completed sessions via the API
    for _ in 0..3 {
        let (_, session) = send(
            &router,
            "POST",
            "/api/fasting/start",
            Some(&token),
            Some(json!({ "plan": "12:12" })),
        )
        .await;
        let id = session["id"].as_str().unwrap().to_owned();
        send(
            &router,
            "POST",
            &format!("/api/fasting/sessions/{id}/stop"),
            Some(&token),
            Some(json!({})),
        )
        .await;
    }

    let (status, page) = send(
        &router,
        "GET",
        "/api/fasting/sessions?page=1&limit=2&status=completed",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["total_count"], 3);
    assert_eq!(page["total_pages"], 2);
}

#[tokio::test]
async fn weight_endpoint_validates_and_paginates() {
    let (router, token, _file) = test_router().await;

    // Out of range
    let (status, body) = send(
        &router,
        "POST",
        "/api/biometrics/weight",
        Some(&token),
        Some(json!({ "weight_kg": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");

    // Valid reading
    let (status, log) = send(
        &router,
        "POST",
        "/api/biometrics/weight",
        Some(&token),
        Some(json!({ "weight_kg": 82.4, "note": "morning" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(log["note"], "morning");

    let (status, page) = send(&router, "GET", "/api/biometrics/weight", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["total_pages"], 1);
}

#[tokio::test]
async fn bmi_endpoint_returns_derived_values() {
    let (router, token, _file) = test_router().await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/biometrics/bmi",
        Some(&token),
        Some(json!({ "height_cm": 175.0, "weight_kg": 70.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bmi"], 22.86);
    assert_eq!(body["category"], "normal");
}

#[tokio::test]
async fn workout_lifecycle_over_http() {
    let (router, token, _file) = test_router().await;

    let (status, workout) = send(
        &router,
        "POST",
        "/api/workouts/start",
        Some(&token),
        Some(json!({ "exercise_type": "running" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(workout["exercise_type"], "running");
    let id = workout["id"].as_str().unwrap().to_owned();

    let (status, stopped) = send(
        &router,
        "POST",
        &format!("/api/workouts/{id}/stop"),
        Some(&token),
        Some(json!({ "calories_burned": 250 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stopped["status"], "completed");
    assert_eq!(stopped["calories_burned"], 250);

    let (status, summary) = send(&router, "GET", "/api/workouts/summary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_workouts"], 1);
    assert_eq!(summary["total_calories"], 250);
}

#[tokio::test]
async fn export_includes_every_store() {
    let (router, token, _file) = test_router().await;

    let (_, session) = send(
        &router,
        "POST",
        "/api/fasting/start",
        Some(&token),
        Some(json!({ "plan": "16:8" })),
    )
    .await;
    send(
        &router,
        "POST",
        "/api/biometrics/weight",
        Some(&token),
        Some(json!({ "weight_kg": 82.4 })),
    )
    .await;

    let (status, export) = send(&router, "GET", "/api/export", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["fasting_sessions"][0]["id"], session["id"]);
    assert_eq!(export["weight_logs"].as_array().unwrap().len(), 1);
    assert!(export["workouts"].as_array().unwrap().is_empty());
    assert!(export["bmi_logs"].as_array().unwrap().is_empty());
}
