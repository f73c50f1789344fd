//! Salon REST API
//!
//! HTTP API layer for the salon service, built with Axum.
//!
//! # Endpoints
//!
//! ## Employees
//! - `GET /api/empleados` - List employees
//! - `POST /api/empleados` - Create an employee
//! - `GET /api/empleados/:id` - Get an employee
//! - `PUT /api/empleados/:id` - Rename an employee
//! - `DELETE /api/empleados/:id` - Delete an employee
//! - `GET /api/empleados/:id/pago` - Commission payout
//!
//! ## Service types
//! - `GET /api/tipos-servicios` - List service types
//! - `POST /api/tipos-servicios` - Create a service type
//! - `GET /api/tipos-servicios/:nombre` - Get a service type
//! - `PUT /api/tipos-servicios/:nombre` - Partial update
//! - `DELETE /api/tipos-servicios/:nombre` - Delete a service type
//!
//! ## Rendered services
//! - `GET /api/servicios` - List services (filter by employee and dates)
//! - `POST /api/servicios` - Register a service
//! - `GET /api/servicios/:id` - Get a service
//! - `DELETE /api/servicios/:id` - Delete a service
//!
//! ## Reports
//! - `GET /api/reportes/ingresos` - Income
//! - `GET /api/reportes/beneficios` - Profit
//!
//! ## Health
//! - `GET /` - Service banner
//! - `GET /health` - Full health status
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! # Example
//!
//! ```rust,no_run
//! use salon::api::{serve, AppState};
//! use salon::config::ApiConfig;
//! use salon::storage::SqliteRepository;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = Arc::new(SqliteRepository::open(std::path::Path::new("salon.db"))?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(repository, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Employee routes
        .route(
            "/empleados",
            get(routes::employees::list_employees).post(routes::employees::create_employee),
        )
        .route(
            "/empleados/:id",
            get(routes::employees::get_employee)
                .put(routes::employees::update_employee)
                .delete(routes::employees::delete_employee),
        )
        .route("/empleados/:id/pago", get(routes::employees::employee_payout))
        // Service type routes
        .route(
            "/tipos-servicios",
            get(routes::service_types::list_service_types)
                .post(routes::service_types::create_service_type),
        )
        .route(
            "/tipos-servicios/:nombre",
            get(routes::service_types::get_service_type)
                .put(routes::service_types::update_service_type)
                .delete(routes::service_types::delete_service_type),
        )
        // Rendered service routes
        .route(
            "/servicios",
            get(routes::services::list_services).post(routes::services::register_service),
        )
        .route(
            "/servicios/:id",
            get(routes::services::get_service).delete(routes::services::delete_service),
        )
        // Report routes
        .route("/reportes/ingresos", get(routes::reports::income_report))
        .route("/reportes/beneficios", get(routes::reports::profit_report));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::health::root))
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the configured origins; any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Salon API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Salon API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let repository = Arc::new(SqliteRepository::open_in_memory().unwrap());
        let state = AppState::new(repository, ApiConfig::default());
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn seed(app: &Router) {
        send(app, "POST", "/api/empleados", Some(json!({"id": "E001", "nombre": "Ana"}))).await;
        send(app, "POST", "/api/empleados", Some(json!({"id": "E002", "nombre": "Luis"}))).await;
        send(
            app,
            "POST",
            "/api/tipos-servicios",
            Some(json!({"nombre": "Corte", "descripcion": "Corte de pelo", "porcentaje_comision": 40})),
        )
        .await;
        send(
            app,
            "POST",
            "/api/tipos-servicios",
            Some(json!({"nombre": "Tinte", "descripcion": "Coloración", "porcentaje_comision": 50})),
        )
        .await;
    }

    async fn register(app: &Router, fecha: &str, empleado: &str, tipo: &str, precio: Value) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/api/servicios",
            Some(json!({"fecha": fecha, "empleado_id": empleado, "tipo_servicio": tipo, "precio": precio})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = create_test_app();

        let (status, body) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, "GET", "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_employee_crud() {
        let app = create_test_app();

        let (status, body) =
            send(&app, "POST", "/api/empleados", Some(json!({"id": "E001", "nombre": "Ana"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": "E001", "nombre": "Ana"}));

        let (status, body) =
            send(&app, "PUT", "/api/empleados/E001", Some(json!({"nombre": "Ana María"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nombre"], "Ana María");

        let (status, body) = send(&app, "GET", "/api/empleados", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "DELETE", "/api/empleados/E001", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, "GET", "/api/empleados/E001", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"]["error"], "not_found");
    }

    #[tokio::test]
    async fn test_duplicate_employee() {
        let app = create_test_app();
        seed(&app).await;

        let (status, body) =
            send(&app, "POST", "/api/empleados", Some(json!({"id": "E001", "nombre": "Otra"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"]["error"], "duplicate_error");
        assert_eq!(
            body["detail"]["message"],
            "Empleado con identificador 'E001' ya existe"
        );
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/empleados")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let app = create_test_app();

        let (status, body) =
            send(&app, "POST", "/api/empleados", Some(json!({"id": "E009", "nombre": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"]["error"], "validation_error");
        assert_eq!(body["detail"]["field"], "nombre");
    }

    #[tokio::test]
    async fn test_service_type_percentage_out_of_range() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/tipos-servicios",
            Some(json!({"nombre": "Corte", "descripcion": "Corte", "porcentaje_comision": 120})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"]["field"], "porcentaje_comision");
    }

    #[tokio::test]
    async fn test_service_type_path_with_spaces() {
        let app = create_test_app();

        send(
            &app,
            "POST",
            "/api/tipos-servicios",
            Some(json!({"nombre": "Corte Dama", "descripcion": "Corte largo", "porcentaje_comision": 35.5})),
        )
        .await;

        let (status, body) = send(
            &app,
            "PUT",
            "/api/tipos-servicios/Corte%20Dama",
            Some(json!({"precio_por_defecto": 30})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["porcentaje_comision"], json!(35.5));
        assert_eq!(body["precio_por_defecto"], "30.00");
    }

    #[tokio::test]
    async fn test_register_service_computes_commission() {
        let app = create_test_app();
        seed(&app).await;

        let body = register(&app, "2024-01-15", "E001", "Corte", json!(25)).await;
        assert_eq!(body["precio"], "25.00");
        assert_eq!(body["comision_calculada"], "10.00");

        let body = register(&app, "2024-01-16", "E002", "Tinte", json!("200")).await;
        assert_eq!(body["comision_calculada"], "100.00");
    }

    #[tokio::test]
    async fn test_register_service_huge_price_rejected() {
        let app = create_test_app();
        seed(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/servicios",
            Some(json!({
                "fecha": "2024-01-15",
                "empleado_id": "E001",
                "tipo_servicio": "Corte",
                "precio": "10000000000000000000000000000"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"]["error"], "validation_error");
        assert_eq!(body["detail"]["field"], "precio");

        let (status, body) = send(&app, "GET", "/api/reportes/ingresos", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], "0.00");
    }

    #[tokio::test]
    async fn test_register_service_unknown_employee() {
        let app = create_test_app();
        seed(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/servicios",
            Some(json!({"fecha": "2024-01-15", "empleado_id": "E404", "tipo_servicio": "Corte", "precio": 25})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["detail"]["message"],
            "Empleado con identificador 'E404' no encontrado"
        );
    }

    #[tokio::test]
    async fn test_list_services_newest_first_and_filtered() {
        let app = create_test_app();
        seed(&app).await;

        register(&app, "2024-01-10", "E001", "Corte", json!(20)).await;
        register(&app, "2024-01-20", "E002", "Tinte", json!(80)).await;
        register(&app, "2024-01-15", "E001", "Tinte", json!(60)).await;

        let (status, body) = send(&app, "GET", "/api/servicios", None).await;
        assert_eq!(status, StatusCode::OK);
        let dates: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["fecha"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2024-01-20", "2024-01-15", "2024-01-10"]);

        let (_, body) = send(
            &app,
            "GET",
            "/api/servicios?empleado_id=E001&fecha_inicio=2024-01-12&fecha_fin=2024-01-31",
            None,
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["fecha"], "2024-01-15");
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let app = create_test_app();

        let (status, body) = send(
            &app,
            "GET",
            "/api/reportes/ingresos?fecha_inicio=2024-02-01&fecha_fin=2024-01-01",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"]["message"],
            "La fecha de inicio no puede ser posterior a la fecha de fin"
        );
    }

    #[tokio::test]
    async fn test_malformed_date_query() {
        let app = create_test_app();

        let (status, body) = send(&app, "GET", "/api/servicios?fecha_inicio=15-01-2024", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"]["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_reports() {
        let app = create_test_app();
        seed(&app).await;

        register(&app, "2024-01-10", "E001", "Corte", json!(1000)).await;
        register(&app, "2024-01-20", "E002", "Tinte", json!(1000)).await;

        let (status, body) = send(&app, "GET", "/api/reportes/ingresos", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], "2000.00");

        let (_, body) = send(&app, "GET", "/api/reportes/beneficios", None).await;
        assert_eq!(body["ingresos"], "2000.00");
        assert_eq!(body["comisiones"], "900.00");
        assert_eq!(body["beneficios"], "1100.00");

        let (_, body) = send(
            &app,
            "GET",
            "/api/reportes/ingresos?fecha_inicio=2024-01-15&empleado_id=E002",
            None,
        )
        .await;
        assert_eq!(body["total"], "1000.00");
        assert_eq!(body["fecha_inicio"], "2024-01-15");
    }

    #[tokio::test]
    async fn test_employee_payout() {
        let app = create_test_app();
        seed(&app).await;

        register(&app, "2024-01-10", "E001", "Corte", json!(25)).await;
        register(&app, "2024-01-12", "E001", "Tinte", json!(80)).await;
        register(&app, "2024-01-12", "E002", "Tinte", json!(80)).await;

        let (status, body) = send(&app, "GET", "/api/empleados/E001/pago", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["empleado_nombre"], "Ana");
        assert_eq!(body["total"], "50.00");
        assert_eq!(body["servicios"].as_array().unwrap().len(), 2);
        assert_eq!(body["servicios"][0]["fecha"], "2024-01-12");
        assert_eq!(body["servicios"][0]["comision"], "40.00");

        let (status, _) = send(&app, "GET", "/api/empleados/E404/pago", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_employee_with_services_conflicts() {
        let app = create_test_app();
        seed(&app).await;

        let service = register(&app, "2024-01-10", "E001", "Corte", json!(25)).await;

        let (status, body) = send(&app, "DELETE", "/api/empleados/E001", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"]["error"], "conflict");

        let uri = format!("/api/servicios/{}", service["id"].as_str().unwrap());
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/api/empleados/E001", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_cors_layer_builds() {
        let _ = cors_layer(&[]);
        let _ = cors_layer(&["http://localhost:5173".to_string()]);
    }
}
