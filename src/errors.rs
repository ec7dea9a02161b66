// ABOUTME: Unified error handling with standard error codes and HTTP responses
// ABOUTME: Maps domain and infrastructure failures to a single AppError surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Unified error type for the whole server.
//!
//! Every fallible operation returns [`AppResult`]. Handlers return
//! [`AppError`] directly; the [`axum::response::IntoResponse`] impl converts
//! it into a JSON error body with the matching HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Stable machine-readable error codes exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request payload or parameters failed validation
    InvalidInput,
    /// Missing or invalid bearer token
    AuthInvalid,
    /// Resource does not exist or is owned by another user
    NotFound,
    /// A start was attempted while a session is already active
    ActiveSessionExists,
    /// A stop was attempted on a session that is not active
    SessionNotActive,
    /// Underlying database operation failed
    DatabaseError,
    /// Server configuration is invalid or missing
    ConfigError,
    /// Unclassified internal failure
    InternalError,
}

impl ErrorCode {
    /// HTTP status the code maps to
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ActiveSessionExists | Self::SessionNotActive => StatusCode::CONFLICT,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Application error carrying a code and a human-readable message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Validation failure (HTTP 400)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Authentication failure (HTTP 401)
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Missing or foreign resource (HTTP 404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Start refused because a session is already active (HTTP 409)
    pub fn active_session_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ActiveSessionExists, message)
    }

    /// Stop refused because the session is not active (HTTP 409)
    pub fn session_not_active(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SessionNotActive, message)
    }

    /// Database failure (HTTP 500); detail is logged, not leaked
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration failure (HTTP 500)
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unclassified internal failure (HTTP 500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        // Infrastructure details stay in the logs; clients get a generic message.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = ?self.code, "request failed: {}", self.message);
            "Internal server error".to_owned()
        } else {
            self.message
        };

        let body = json!({
            "error": {
                "code": self.code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}
