// ABOUTME: Shared test utilities: in-memory database, seeded sessions, tokens
// ABOUTME: Keeps the integration tests free of setup duplication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health
#![allow(missing_docs, clippy::unwrap_used)]
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::NamedTempFile;
use uuid::Uuid;

use vitalog_server::auth::AuthManager;
use vitalog_server::config::ServerConfig;
use vitalog_server::context::ServerResources;
use vitalog_server::database::Database;
use vitalog_server::models::{FastingPlan, SessionStatus, StartMode};

pub const TEST_JWT_SECRET: &str = "vitalog-test-secret-0123456789abcdef";

/// Single-connection in-memory database with the full schema applied.
///
/// One connection keeps every query on the same in-memory instance.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_auth_manager() -> AuthManager {
    AuthManager::new(TEST_JWT_SECRET)
}

pub fn bearer_token(auth: &AuthManager, user_id: Uuid) -> String {
    let token = auth.generate_token(user_id, Duration::hours(1)).unwrap();
    format!("Bearer {token}")
}

/// File-backed database plus full server resources for route-level tests.
///
/// The temp file must outlive the resources; callers hold on to it.
pub async fn test_resources() -> (Arc<ServerResources>, NamedTempFile) {
    let file = NamedTempFile::new().unwrap();
    let url = format!("sqlite:{}", file.path().display());
    let database = Database::new(&url).await.unwrap();

    let config = ServerConfig {
        http_port: 0,
        database_url: url,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        log_level: "warn".to_owned(),
    };
    let resources = ServerResources::new(database, test_auth_manager(), config);
    (resources, file)
}

/// Insert a completed fasting session directly, bypassing the lifecycle.
///
/// Used to seed history for analytics tests with exact timestamps.
pub async fn insert_completed_session(
    pool: &SqlitePool,
    user_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    plan: FastingPlan,
) -> Uuid {
    let id = Uuid::new_v4();
    let duration_minutes = (end_time - start_time).num_minutes().max(0);
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r"
        INSERT INTO fasting_sessions
            (id, user_id, start_time, end_time, duration_minutes, status,
             start_mode, plan, end_reason, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        ",
    )
    .bind(id.to_string())
    .bind(user_id.to_string())
    .bind(start_time.to_rfc3339())
    .bind(end_time.to_rfc3339())
    .bind(duration_minutes)
    .bind(SessionStatus::Completed.as_str())
    .bind(StartMode::Immediate.as_str())
    .bind(plan.as_str())
    .bind("completed")
    .bind(&now)
    .execute(pool)
    .await
    .unwrap();

    id
}

/// A completed session whose end lands on the given calendar day offset
/// (0 = ends now, 1 = ended 24h ago, ...); each fast lasts `hours` hours.
pub async fn insert_session_days_ago(
    pool: &SqlitePool,
    user_id: Uuid,
    days_ago: u64,
    hours: i64,
    plan: FastingPlan,
) -> Uuid {
    let end_time = Utc::now() - Duration::days(i64::try_from(days_ago).unwrap());
    let start_time = end_time - Duration::hours(hours);
    insert_completed_session(pool, user_id, start_time, end_time, plan).await
}
