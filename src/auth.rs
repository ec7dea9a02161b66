// ABOUTME: Bearer token verification for request authentication
// ABOUTME: Tokens are issued externally; this module only validates and decodes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

//! Authentication.
//!
//! The server does not issue credentials itself — an external token issuer
//! signs HS256 JWTs with the shared secret from configuration. Every
//! authenticated route extracts the caller's user id from a
//! `Authorization: Bearer <token>` header via [`AuthManager`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// JWT claims this server understands
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Outcome of a successful authentication
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// The authenticated caller
    pub user_id: Uuid,
}

/// Validates bearer tokens against the shared issuer secret
#[derive(Clone)]
pub struct AuthManager {
    secret: Vec<u8>,
}

impl AuthManager {
    /// Create a manager for the given shared secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    /// Authenticate an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when the header is missing, not a bearer
    /// scheme, or the token fails signature/expiry validation.
    pub fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let header = auth_header
            .ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must use Bearer scheme"))?;
        self.validate_token(token)
    }

    /// Validate a raw token and extract the caller's user id
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for a bad signature, expired token, or a
    /// subject that is not a UUID.
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))?;

        Ok(AuthResult { user_id })
    }

    /// Mint a token the way the external issuer would.
    ///
    /// Used by tests and local tooling; production tokens come from the
    /// issuer service.
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails.
    pub fn generate_token(&self, user_id: Uuid, valid_for: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + valid_for).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }
}
