//! Salon API Server
//!
//! Run with: cargo run --bin salon-api
//!
//! # Configuration
//!
//! Settings come from `config.toml` (see `salon config`) and are overridden by:
//! - `SALON_DATABASE_PATH` / `DATABASE_PATH`: SQLite file (default: salon.db)
//! - `SALON_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SALON_API_PORT`: Port to listen on (default: 8000)
//! - `SALON_CORS_ORIGINS`: Comma-separated allowed origins
//! - `SALON_LOG_LEVEL`, `SALON_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter directive, wins over the level above

use anyhow::Context;
use salon::api::{serve, AppState};
use salon::config::{init_tracing, Config};
use salon::storage::SqliteRepository;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = Config::load_default();
    init_tracing(&config.logging, "salon={level},tower_http=debug");
    source.log();

    tracing::info!("Starting Salon API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.database.path);

    let repository = SqliteRepository::open(Path::new(&config.database.path))
        .with_context(|| format!("Failed to open database {}", config.database.path))?;

    let state = AppState::new(Arc::new(repository), config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("Salon API server stopped");
    Ok(())
}
