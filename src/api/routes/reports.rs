//! Report Routes
//!
//! - GET /api/reportes/ingresos - Total income
//! - GET /api/reportes/beneficios - Income, commissions and profit
//!
//! Both accept `fecha_inicio`, `fecha_fin` and `empleado_id`, all optional.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::ReportQuery;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::domain::{IncomeReport, ProfitReport};

/// GET /api/reportes/ingresos
pub async fn income_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<IncomeReport>> {
    let Query(query) = query?;
    Ok(Json(
        state.manager.income(query.range(), query.employee()).await?,
    ))
}

/// GET /api/reportes/beneficios
pub async fn profit_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<ProfitReport>> {
    let Query(query) = query?;
    Ok(Json(
        state.manager.profit(query.range(), query.employee()).await?,
    ))
}
