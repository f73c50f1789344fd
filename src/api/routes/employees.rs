//! Employee Routes
//!
//! - GET /api/empleados - List employees
//! - POST /api/empleados - Create an employee
//! - GET /api/empleados/:id - Get an employee
//! - PUT /api/empleados/:id - Rename an employee
//! - DELETE /api/empleados/:id - Delete an employee
//! - GET /api/empleados/:id/pago - Commission payout for an employee

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateEmployeeRequest, ReportQuery, UpdateEmployeeRequest};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::domain::{Employee, PayoutBreakdown};

/// GET /api/empleados
pub async fn list_employees(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.manager.list_employees().await?))
}

/// GET /api/empleados/:id
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.manager.get_employee(&id).await?))
}

/// POST /api/empleados
///
/// Returns 409 when the id is already taken.
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let Json(req) = payload?;
    let employee = state.manager.create_employee(&req.id, &req.nombre).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/empleados/:id
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let Json(req) = payload?;
    Ok(Json(state.manager.update_employee(&id, &req.nombre).await?))
}

/// DELETE /api/empleados/:id
///
/// Returns 409 while the employee still has rendered services.
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.manager.delete_employee(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/empleados/:id/pago?fecha_inicio&fecha_fin
pub async fn employee_payout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<PayoutBreakdown>> {
    let Query(query) = query?;
    Ok(Json(state.manager.employee_payout(&id, query.range()).await?))
}
