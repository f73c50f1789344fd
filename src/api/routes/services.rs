//! Rendered Service Routes
//!
//! - GET /api/servicios - List services, newest first
//! - POST /api/servicios - Register a service
//! - GET /api/servicios/:id - Get a service
//! - DELETE /api/servicios/:id - Delete a service

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateServiceRequest, ServiceQuery};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::domain::{RenderedService, ServiceFilter};

/// GET /api/servicios?empleado_id&fecha_inicio&fecha_fin
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ServiceQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<RenderedService>>> {
    let Query(query) = query?;
    let filter = ServiceFilter::from(query);
    Ok(Json(state.manager.list_services(&filter).await?))
}

/// GET /api/servicios/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RenderedService>> {
    Ok(Json(state.manager.get_service(&id).await?))
}

/// POST /api/servicios
///
/// The commission is computed here from the service type's percentage.
pub async fn register_service(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateServiceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RenderedService>)> {
    let Json(req) = payload?;
    let service = state.manager.register_service(req.into()).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// DELETE /api/servicios/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.manager.delete_service(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
