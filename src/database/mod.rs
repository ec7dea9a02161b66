// ABOUTME: Core database management with migration system for SQLite
// ABOUTME: Owns the connection pool and hands out per-concern managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Database connection management.
//!
//! [`Database`] wraps the `sqlx` pool, runs the embedded migrations, and
//! exposes the per-concern managers. All schema lives in `./migrations` and
//! is embedded at compile time so the binary migrates itself regardless of
//! working directory.

/// Biometric log persistence (weight, blood pressure, blood sugar, BMI)
pub mod biometrics;
/// Fasting session persistence
pub mod sessions;
/// Workout session persistence
pub mod workouts;

pub use biometrics::BiometricsManager;
pub use sessions::SessionManager;
pub use workouts::WorkoutManager;

use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the database URL is invalid or the connection fails
    /// - `SQLite` file creation fails
    /// - any migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run all pending migrations embedded from `./migrations`
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails or the connection is lost.
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Get a reference to the underlying pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fasting session manager bound to this pool
    #[must_use]
    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(self.pool.clone())
    }

    /// Workout manager bound to this pool
    #[must_use]
    pub fn workouts(&self) -> WorkoutManager {
        WorkoutManager::new(self.pool.clone())
    }

    /// Biometrics manager bound to this pool
    #[must_use]
    pub fn biometrics(&self) -> BiometricsManager {
        BiometricsManager::new(self.pool.clone())
    }

    /// Lightweight liveness probe used by the health endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer a trivial query.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }
}
