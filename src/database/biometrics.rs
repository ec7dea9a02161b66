// ABOUTME: CRUD persistence for biometric logs with owner-scoped queries
// ABOUTME: Weight, blood pressure, blood sugar, and BMI share the same shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{BloodPressureLog, BloodSugarLog, BmiLog, MeasurementContext, WeightLog};

/// Biometric log database operations
pub struct BiometricsManager {
    pool: SqlitePool,
}

impl BiometricsManager {
    /// Create a new biometrics manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ================================
    // Weight
    // ================================

    /// Insert a weight reading
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_weight(&self, log: &WeightLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO weight_logs (id, user_id, weight_kg, note, logged_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.weight_kg)
        .bind(log.note.as_deref())
        .bind(log.logged_at.to_rfc3339())
        .bind(log.created_at.to_rfc3339())
        .bind(log.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create weight log: {e}")))?;
        Ok(())
    }

    /// List weight readings, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_weight(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<WeightLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, weight_kg, note, logged_at, created_at, updated_at
            FROM weight_logs
            WHERE user_id = $1
            ORDER BY logged_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list weight logs: {e}")))?;

        rows.iter().map(Self::row_to_weight).collect()
    }

    /// Count the user's weight readings
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_weight(&self, user_id: Uuid) -> AppResult<i64> {
        self.count_rows("weight_logs", user_id).await
    }

    /// Update a weight reading in place
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the log does not exist or belongs to another
    /// user, or a database error for other failures.
    pub async fn update_weight(
        &self,
        log_id: Uuid,
        user_id: Uuid,
        weight_kg: f64,
        note: Option<&str>,
        logged_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE weight_logs
            SET weight_kg = $1, note = $2, logged_at = $3, updated_at = $4
            WHERE id = $5 AND user_id = $6
            ",
        )
        .bind(weight_kg)
        .bind(note)
        .bind(logged_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(log_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update weight log: {e}")))?;

        Self::require_row(result.rows_affected(), "Weight log")
    }

    /// Delete a weight reading
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the log does not exist or belongs to another
    /// user, or a database error for other failures.
    pub async fn delete_weight(&self, log_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.delete_row("weight_logs", log_id, user_id, "Weight log")
            .await
    }

    // ================================
    // Blood pressure
    // ================================

    /// Insert a blood-pressure reading
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_blood_pressure(&self, log: &BloodPressureLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO blood_pressure_logs
                (id, user_id, systolic, diastolic, pulse, note, logged_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.systolic)
        .bind(log.diastolic)
        .bind(log.pulse)
        .bind(log.note.as_deref())
        .bind(log.logged_at.to_rfc3339())
        .bind(log.created_at.to_rfc3339())
        .bind(log.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create blood pressure log: {e}")))?;
        Ok(())
    }

    /// List blood-pressure readings, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_blood_pressure(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<BloodPressureLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, systolic, diastolic, pulse, note, logged_at, created_at, updated_at
            FROM blood_pressure_logs
            WHERE user_id = $1
            ORDER BY logged_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list blood pressure logs: {e}")))?;

        rows.iter().map(Self::row_to_blood_pressure).collect()
    }

    /// Count the user's blood-pressure readings
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_blood_pressure(&self, user_id: Uuid) -> AppResult<i64> {
        self.count_rows("blood_pressure_logs", user_id).await
    }

    /// Update a blood-pressure reading in place
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the log does not exist or belongs to another
    /// user, or a database error for other failures.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_blood_pressure(
        &self,
        log_id: Uuid,
        user_id: Uuid,
        systolic: i64,
        diastolic: i64,
        pulse: Option<i64>,
        note: Option<&str>,
        logged_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE blood_pressure_logs
            SET systolic = $1, diastolic = $2, pulse = $3, note = $4,
                logged_at = $5, updated_at = $6
            WHERE id = $7 AND user_id = $8
            ",
        )
        .bind(systolic)
        .bind(diastolic)
        .bind(pulse)
        .bind(note)
        .bind(logged_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(log_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update blood pressure log: {e}")))?;

        Self::require_row(result.rows_affected(), "Blood pressure log")
    }

    /// Delete a blood-pressure reading
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the log does not exist or belongs to another
    /// user, or a database error for other failures.
    pub async fn delete_blood_pressure(&self, log_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.delete_row("blood_pressure_logs", log_id, user_id, "Blood pressure log")
            .await
    }

    // ================================
    // Blood sugar
    // ================================

    /// Insert a blood-glucose reading
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_blood_sugar(&self, log: &BloodSugarLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO blood_sugar_logs
                (id, user_id, value_mg_dl, context, note, logged_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.value_mg_dl)
        .bind(log.context.as_str())
        .bind(log.note.as_deref())
        .bind(log.logged_at.to_rfc3339())
        .bind(log.created_at.to_rfc3339())
        .bind(log.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create blood sugar log: {e}")))?;
        Ok(())
    }

    /// List blood-glucose readings, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_blood_sugar(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<BloodSugarLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, value_mg_dl, context, note, logged_at, created_at, updated_at
            FROM blood_sugar_logs
            WHERE user_id = $1
            ORDER BY logged_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list blood sugar logs: {e}")))?;

        rows.iter().map(Self::row_to_blood_sugar).collect()
    }

    /// Count the user's blood-glucose readings
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_blood_sugar(&self, user_id: Uuid) -> AppResult<i64> {
        self.count_rows("blood_sugar_logs", user_id).await
    }

    /// Update a blood-glucose reading in place
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the log does not exist or belongs to another
    /// user, or a database error for other failures.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_blood_sugar(
        &self,
        log_id: Uuid,
        user_id: Uuid,
        value_mg_dl: f64,
        context: MeasurementContext,
        note: Option<&str>,
        logged_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE blood_sugar_logs
            SET value_mg_dl = $1, context = $2, note = $3, logged_at = $4, updated_at = $5
            WHERE id = $6 AND user_id = $7
            ",
        )
        .bind(value_mg_dl)
        .bind(context.as_str())
        .bind(note)
        .bind(logged_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(log_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update blood sugar log: {e}")))?;

        Self::require_row(result.rows_affected(), "Blood sugar log")
    }

    /// Delete a blood-glucose reading
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the log does not exist or belongs to another
    /// user, or a database error for other failures.
    pub async fn delete_blood_sugar(&self, log_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.delete_row("blood_sugar_logs", log_id, user_id, "Blood sugar log")
            .await
    }

    // ================================
    // BMI
    // ================================

    /// Insert a height/weight pair for BMI tracking
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_bmi(&self, log: &BmiLog) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO bmi_logs
                (id, user_id, height_cm, weight_kg, note, logged_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.user_id.to_string())
        .bind(log.height_cm)
        .bind(log.weight_kg)
        .bind(log.note.as_deref())
        .bind(log.logged_at.to_rfc3339())
        .bind(log.created_at.to_rfc3339())
        .bind(log.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create BMI log: {e}")))?;
        Ok(())
    }

    /// List BMI measurements, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_bmi(&self, user_id: Uuid, limit: i64, offset: i64) -> AppResult<Vec<BmiLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, height_cm, weight_kg, note, logged_at, created_at, updated_at
            FROM bmi_logs
            WHERE user_id = $1
            ORDER BY logged_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list BMI logs: {e}")))?;

        rows.iter().map(Self::row_to_bmi).collect()
    }

    /// Count the user's BMI measurements
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_bmi(&self, user_id: Uuid) -> AppResult<i64> {
        self.count_rows("bmi_logs", user_id).await
    }

    /// Delete a BMI measurement
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the log does not exist or belongs to another
    /// user, or a database error for other failures.
    pub async fn delete_bmi(&self, log_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.delete_row("bmi_logs", log_id, user_id, "BMI log").await
    }

    // ================================
    // Shared helpers
    // ================================

    async fn count_rows(&self, table: &str, user_id: Uuid) -> AppResult<i64> {
        let query = format!("SELECT COUNT(*) as count FROM {table} WHERE user_id = $1");
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count {table}: {e}")))?;
        Ok(row.get("count"))
    }

    async fn delete_row(
        &self,
        table: &str,
        log_id: Uuid,
        user_id: Uuid,
        label: &str,
    ) -> AppResult<()> {
        let query = format!("DELETE FROM {table} WHERE id = $1 AND user_id = $2");
        let result = sqlx::query(&query)
            .bind(log_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete from {table}: {e}")))?;

        Self::require_row(result.rows_affected(), label)
    }

    fn require_row(rows_affected: u64, label: &str) -> AppResult<()> {
        if rows_affected == 0 {
            return Err(AppError::not_found(format!("{label} not found")));
        }
        Ok(())
    }

    fn row_to_weight(row: &SqliteRow) -> AppResult<WeightLog> {
        Ok(WeightLog {
            id: Self::parse_id(row, "id")?,
            user_id: Self::parse_id(row, "user_id")?,
            weight_kg: row.get("weight_kg"),
            note: row.get("note"),
            logged_at: row.get("logged_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn row_to_blood_pressure(row: &SqliteRow) -> AppResult<BloodPressureLog> {
        Ok(BloodPressureLog {
            id: Self::parse_id(row, "id")?,
            user_id: Self::parse_id(row, "user_id")?,
            systolic: row.get("systolic"),
            diastolic: row.get("diastolic"),
            pulse: row.get("pulse"),
            note: row.get("note"),
            logged_at: row.get("logged_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn row_to_blood_sugar(row: &SqliteRow) -> AppResult<BloodSugarLog> {
        let context: String = row.get("context");
        Ok(BloodSugarLog {
            id: Self::parse_id(row, "id")?,
            user_id: Self::parse_id(row, "user_id")?,
            value_mg_dl: row.get("value_mg_dl"),
            context: MeasurementContext::parse(&context)?,
            note: row.get("note"),
            logged_at: row.get("logged_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn row_to_bmi(row: &SqliteRow) -> AppResult<BmiLog> {
        Ok(BmiLog {
            id: Self::parse_id(row, "id")?,
            user_id: Self::parse_id(row, "user_id")?,
            height_cm: row.get("height_cm"),
            weight_kg: row.get("weight_kg"),
            note: row.get("note"),
            logged_at: row.get("logged_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn parse_id(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
        let raw: String = row.get(column);
        Uuid::parse_str(&raw)
            .map_err(|e| AppError::database(format!("Invalid {column} in database: {e}")))
    }
}
