// ABOUTME: Server binary entrypoint: flags, config, logging, database, serve
// ABOUTME: Command-line flags override the environment for local runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitalog Health

use anyhow::Result;
use clap::Parser;
use tracing::info;

use vitalog_server::auth::AuthManager;
use vitalog_server::config::ServerConfig;
use vitalog_server::context::ServerResources;
use vitalog_server::database::Database;
use vitalog_server::logging::init_logging;
use vitalog_server::server;

/// Vitalog Health API server
#[derive(Debug, Parser)]
#[command(name = "vitalog-server", version, about)]
struct Args {
    /// Override the HTTP port from the environment
    #[arg(long)]
    port: Option<u16>,

    /// Override the database URL from the environment
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    init_logging(&config.log_level);
    info!(
        port = config.http_port,
        database = %config.database_url,
        "Starting vitalog-server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let database = Database::new(&config.database_url).await?;
    let auth = AuthManager::new(&config.jwt_secret);
    let resources = ServerResources::new(database, auth, config);

    server::serve(resources).await?;
    Ok(())
}
