// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Built once at startup; cheap to clone behind an Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;

/// Dependencies shared across all request handlers
pub struct ServerResources {
    /// Connection pool and managers
    pub database: Database,
    /// Bearer token verification
    pub auth: AuthManager,
    /// Loaded configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle the resources for handler state
    #[must_use]
    pub fn new(database: Database, auth: AuthManager, config: ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            database,
            auth,
            config,
        })
    }
}
