// ABOUTME: Environment-based server configuration with sensible defaults
// ABOUTME: Reads VITALOG_* variables once at startup; no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use std::env;

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `VITALOG_HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default database location when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./vitalog.db";

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP listener binds to
    pub http_port: u16,
    /// Database connection string
    pub database_url: String,
    /// Shared secret the external token issuer signs bearer tokens with
    pub jwt_secret: String,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `VITALOG_JWT_SECRET` is required; everything else has a default.
    ///
    /// # Errors
    ///
    /// Returns a config error if the JWT secret is missing or the port is
    /// not a valid number.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("VITALOG_HTTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| {
                AppError::config(format!("VITALOG_HTTP_PORT is not a valid port: {e}"))
            })?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let jwt_secret = env::var("VITALOG_JWT_SECRET")
            .map_err(|_| AppError::config("VITALOG_JWT_SECRET must be set"))?;
        if jwt_secret.len() < 32 {
            return Err(AppError::config(
                "VITALOG_JWT_SECRET must be at least 32 bytes",
            ));
        }

        Ok(Self {
            http_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            jwt_secret,
            log_level: env::var("VITALOG_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned()),
        })
    }
}
