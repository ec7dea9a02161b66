// ABOUTME: CRUD endpoints for weight, blood pressure, blood sugar, and BMI logs
// ABOUTME: Field ranges validated before any write; BMI derived in the response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Biometric routes.
//!
//! Plain field-validated persistence: every reading is checked against its
//! physiological range before touching the database, and the BMI endpoints
//! never store the derived value — it is recomputed for every response.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthResult;
use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::biometrics::{
    validate_blood_pressure, validate_blood_sugar, validate_bmi_input, validate_weight_kg,
};
use crate::models::{BloodPressureLog, BloodSugarLog, BmiLog, MeasurementContext, WeightLog};
use crate::pagination::{Paginated, PaginationParams};

/// Query parameters shared by all biometric list endpoints
#[derive(Debug, Deserialize)]
pub struct ListLogsQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
}

/// Request to create or update a weight reading
#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Free-form note
    pub note: Option<String>,
    /// When the reading was taken; defaults to now
    pub logged_at: Option<DateTime<Utc>>,
}

/// Request to create or update a blood-pressure reading
#[derive(Debug, Deserialize)]
pub struct BloodPressureRequest {
    /// Systolic pressure in mmHg
    pub systolic: i64,
    /// Diastolic pressure in mmHg
    pub diastolic: i64,
    /// Pulse in bpm
    pub pulse: Option<i64>,
    /// Free-form note
    pub note: Option<String>,
    /// When the reading was taken; defaults to now
    pub logged_at: Option<DateTime<Utc>>,
}

/// Request to create or update a blood-glucose reading
#[derive(Debug, Deserialize)]
pub struct BloodSugarRequest {
    /// Glucose concentration in mg/dL
    pub value_mg_dl: f64,
    /// Timing relative to meals; defaults to `"random"`
    pub context: Option<String>,
    /// Free-form note
    pub note: Option<String>,
    /// When the reading was taken; defaults to now
    pub logged_at: Option<DateTime<Utc>>,
}

/// Request to create a BMI measurement
#[derive(Debug, Deserialize)]
pub struct BmiRequest {
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Free-form note
    pub note: Option<String>,
    /// When the measurements were taken; defaults to now
    pub logged_at: Option<DateTime<Utc>>,
}

/// BMI log plus the values derived from it on read
#[derive(Debug, Serialize)]
pub struct BmiResponse {
    /// The stored measurement pair
    #[serde(flatten)]
    pub log: BmiLog,
    /// Derived body-mass index, two decimals
    pub bmi: f64,
    /// Derived WHO category label
    pub category: &'static str,
}

impl From<BmiLog> for BmiResponse {
    fn from(log: BmiLog) -> Self {
        let bmi = log.bmi();
        let category = log.category();
        Self { log, bmi, category }
    }
}

/// Biometric routes
pub struct BiometricsRoutes;

impl BiometricsRoutes {
    /// Create all biometric routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/biometrics/weight", post(Self::handle_create_weight))
            .route("/api/biometrics/weight", get(Self::handle_list_weight))
            .route("/api/biometrics/weight/:id", put(Self::handle_update_weight))
            .route(
                "/api/biometrics/weight/:id",
                delete(Self::handle_delete_weight),
            )
            .route(
                "/api/biometrics/blood-pressure",
                post(Self::handle_create_blood_pressure),
            )
            .route(
                "/api/biometrics/blood-pressure",
                get(Self::handle_list_blood_pressure),
            )
            .route(
                "/api/biometrics/blood-pressure/:id",
                put(Self::handle_update_blood_pressure),
            )
            .route(
                "/api/biometrics/blood-pressure/:id",
                delete(Self::handle_delete_blood_pressure),
            )
            .route(
                "/api/biometrics/blood-sugar",
                post(Self::handle_create_blood_sugar),
            )
            .route(
                "/api/biometrics/blood-sugar",
                get(Self::handle_list_blood_sugar),
            )
            .route(
                "/api/biometrics/blood-sugar/:id",
                put(Self::handle_update_blood_sugar),
            )
            .route(
                "/api/biometrics/blood-sugar/:id",
                delete(Self::handle_delete_blood_sugar),
            )
            .route("/api/biometrics/bmi", post(Self::handle_create_bmi))
            .route("/api/biometrics/bmi", get(Self::handle_list_bmi))
            .route("/api/biometrics/bmi/:id", delete(Self::handle_delete_bmi))
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

    // ================================
    // Weight
    // ================================

    /// Log a weight reading
    async fn handle_create_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<WeightRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        validate_weight_kg(request.weight_kg)?;

        let now = Utc::now();
        let log = WeightLog {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            weight_kg: request.weight_kg,
            note: request.note,
            logged_at: request.logged_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        resources.database.biometrics().create_weight(&log).await?;

        Ok((StatusCode::CREATED, Json(log)).into_response())
    }

    /// List weight readings, newest first
    async fn handle_list_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListLogsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let params = PaginationParams {
            page: query.page,
            limit: query.limit,
        };

        let manager = resources.database.biometrics();
        let items = manager
            .list_weight(auth.user_id, params.limit(), params.offset())
            .await?;
        let total = manager.count_weight(auth.user_id).await?;

        Ok((StatusCode::OK, Json(Paginated::new(items, &params, total))).into_response())
    }

    /// Update a weight reading
    async fn handle_update_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
        Json(request): Json<WeightRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        validate_weight_kg(request.weight_kg)?;

        resources
            .database
            .biometrics()
            .update_weight(
                log_id,
                auth.user_id,
                request.weight_kg,
                request.note.as_deref(),
                request.logged_at.unwrap_or_else(Utc::now),
            )
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Delete a weight reading
    async fn handle_delete_weight(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        resources
            .database
            .biometrics()
            .delete_weight(log_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    // ================================
    // Blood pressure
    // ================================

    /// Log a blood-pressure reading
    async fn handle_create_blood_pressure(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<BloodPressureRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        validate_blood_pressure(request.systolic, request.diastolic, request.pulse)?;

        let now = Utc::now();
        let log = BloodPressureLog {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            systolic: request.systolic,
            diastolic: request.diastolic,
            pulse: request.pulse,
            note: request.note,
            logged_at: request.logged_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        resources
            .database
            .biometrics()
            .create_blood_pressure(&log)
            .await?;

        Ok((StatusCode::CREATED, Json(log)).into_response())
    }

    /// List blood-pressure readings, newest first
    async fn handle_list_blood_pressure(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListLogsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let params = PaginationParams {
            page: query.page,
            limit: query.limit,
        };

        let manager = resources.database.biometrics();
        let items = manager
            .list_blood_pressure(auth.user_id, params.limit(), params.offset())
            .await?;
        let total = manager.count_blood_pressure(auth.user_id).await?;

        Ok((StatusCode::OK, Json(Paginated::new(items, &params, total))).into_response())
    }

    /// Update a blood-pressure reading
    async fn handle_update_blood_pressure(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
        Json(request): Json<BloodPressureRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        validate_blood_pressure(request.systolic, request.diastolic, request.pulse)?;

        resources
            .database
            .biometrics()
            .update_blood_pressure(
                log_id,
                auth.user_id,
                request.systolic,
                request.diastolic,
                request.pulse,
                request.note.as_deref(),
                request.logged_at.unwrap_or_else(Utc::now),
            )
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Delete a blood-pressure reading
    async fn handle_delete_blood_pressure(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        resources
            .database
            .biometrics()
            .delete_blood_pressure(log_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    // ================================
    // Blood sugar
    // ================================

    /// Log a blood-glucose reading
    async fn handle_create_blood_sugar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<BloodSugarRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        validate_blood_sugar(request.value_mg_dl)?;
        let context = match request.context.as_deref() {
            None => MeasurementContext::Random,
            Some(raw) => MeasurementContext::parse(raw)?,
        };

        let now = Utc::now();
        let log = BloodSugarLog {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            value_mg_dl: request.value_mg_dl,
            context,
            note: request.note,
            logged_at: request.logged_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        resources
            .database
            .biometrics()
            .create_blood_sugar(&log)
            .await?;

        Ok((StatusCode::CREATED, Json(log)).into_response())
    }

    /// List blood-glucose readings, newest first
    async fn handle_list_blood_sugar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListLogsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let params = PaginationParams {
            page: query.page,
            limit: query.limit,
        };

        let manager = resources.database.biometrics();
        let items = manager
            .list_blood_sugar(auth.user_id, params.limit(), params.offset())
            .await?;
        let total = manager.count_blood_sugar(auth.user_id).await?;

        Ok((StatusCode::OK, Json(Paginated::new(items, &params, total))).into_response())
    }

    /// Update a blood-glucose reading
    async fn handle_update_blood_sugar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
        Json(request): Json<BloodSugarRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        validate_blood_sugar(request.value_mg_dl)?;
        let context = match request.context.as_deref() {
            None => MeasurementContext::Random,
            Some(raw) => MeasurementContext::parse(raw)?,
        };

        resources
            .database
            .biometrics()
            .update_blood_sugar(
                log_id,
                auth.user_id,
                request.value_mg_dl,
                context,
                request.note.as_deref(),
                request.logged_at.unwrap_or_else(Utc::now),
            )
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Delete a blood-glucose reading
    async fn handle_delete_blood_sugar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        resources
            .database
            .biometrics()
            .delete_blood_sugar(log_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    // ================================
    // BMI
    // ================================

    /// Log a height/weight pair; BMI comes back derived, never stored
    async fn handle_create_bmi(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<BmiRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        validate_bmi_input(request.height_cm, request.weight_kg)?;

        let now = Utc::now();
        let log = BmiLog {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            note: request.note,
            logged_at: request.logged_at.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        resources.database.biometrics().create_bmi(&log).await?;

        Ok((StatusCode::CREATED, Json(BmiResponse::from(log))).into_response())
    }

    /// List BMI measurements, newest first, with derived values
    async fn handle_list_bmi(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListLogsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let params = PaginationParams {
            page: query.page,
            limit: query.limit,
        };

        let manager = resources.database.biometrics();
        let items = manager
            .list_bmi(auth.user_id, params.limit(), params.offset())
            .await?;
        let total = manager.count_bmi(auth.user_id).await?;

        let page = Paginated::new(items, &params, total).map(BmiResponse::from);
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Delete a BMI measurement
    async fn handle_delete_bmi(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        resources
            .database
            .biometrics()
            .delete_bmi(log_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
