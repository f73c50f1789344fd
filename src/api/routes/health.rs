//! Health Routes
//!
//! Health check endpoints for monitoring and container probes.
//!
//! - GET / - Service banner
//! - GET /health - Full health status
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (database reachable)

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{HealthResponse, RootResponse};
use crate::api::state::AppState;

/// API banner shown at the root path
pub const SERVICE_NAME: &str = "Sistema de Gestión de Salón de Peluquería API";

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the database answers a round trip.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_database(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database_ok = check_database(&state).await;

    Json(HealthResponse {
        status: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        database: if database_ok { "ok" } else { "error" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_database(state: &AppState) -> bool {
    match state.manager.repository().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    }
}
