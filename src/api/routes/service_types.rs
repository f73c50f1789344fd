//! Service Type Routes
//!
//! - GET /api/tipos-servicios - List service types
//! - POST /api/tipos-servicios - Create a service type
//! - GET /api/tipos-servicios/:nombre - Get a service type
//! - PUT /api/tipos-servicios/:nombre - Partial update
//! - DELETE /api/tipos-servicios/:nombre - Delete a service type

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateServiceTypeRequest, UpdateServiceTypeRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::domain::ServiceType;

/// GET /api/tipos-servicios
pub async fn list_service_types(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ServiceType>>> {
    Ok(Json(state.manager.list_service_types().await?))
}

/// GET /api/tipos-servicios/:nombre
pub async fn get_service_type(
    State(state): State<Arc<AppState>>,
    Path(nombre): Path<String>,
) -> ApiResult<Json<ServiceType>> {
    Ok(Json(state.manager.get_service_type(&nombre).await?))
}

/// POST /api/tipos-servicios
pub async fn create_service_type(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateServiceTypeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ServiceType>)> {
    let Json(req) = payload?;
    let service_type = state
        .manager
        .create_service_type(
            &req.nombre,
            &req.descripcion,
            req.porcentaje_comision,
            req.precio_por_defecto,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(service_type)))
}

/// PUT /api/tipos-servicios/:nombre
///
/// The name is the key and cannot change.
pub async fn update_service_type(
    State(state): State<Arc<AppState>>,
    Path(nombre): Path<String>,
    payload: Result<Json<UpdateServiceTypeRequest>, JsonRejection>,
) -> ApiResult<Json<ServiceType>> {
    let Json(req) = payload?;
    Ok(Json(
        state.manager.update_service_type(&nombre, req.into()).await?,
    ))
}

/// DELETE /api/tipos-servicios/:nombre
pub async fn delete_service_type(
    State(state): State<Arc<AppState>>,
    Path(nombre): Path<String>,
) -> ApiResult<StatusCode> {
    state.manager.delete_service_type(&nombre).await?;
    Ok(StatusCode::NO_CONTENT)
}
