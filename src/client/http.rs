//! Salon REST API client
//!
//! Thin reqwest wrapper with one method per endpoint. Failures are logged
//! once by status class and returned as `ClientError`.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::{
    CreateEmployeeRequest, CreateServiceRequest, CreateServiceTypeRequest, HealthResponse,
    ReportQuery, ServiceQuery, UpdateEmployeeRequest, UpdateServiceTypeRequest,
};
use crate::config::ClientConfig;
use crate::domain::{
    DateRange, Employee, IncomeReport, PayoutBreakdown, ProfitReport, RenderedService, ServiceType,
};

/// Shown when no response was received
pub const UNREACHABLE_MESSAGE: &str = "No se pudo conectar con el servidor";

/// REST client for the salon API
#[derive(Debug, Clone)]
pub struct SalonClient {
    client: Client,
    base_url: String,
}

impl SalonClient {
    /// Create a client for a base URL that includes the `/api` prefix
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_timeout(&config.api_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ============================================
    // EMPLOYEES
    // ============================================

    pub async fn list_employees(&self) -> ClientResult<Vec<Employee>> {
        self.send(self.client.get(self.url("/empleados"))).await
    }

    pub async fn get_employee(&self, id: &str) -> ClientResult<Employee> {
        let url = self.url(&format!("/empleados/{}", urlencoding::encode(id)));
        self.send(self.client.get(url)).await
    }

    pub async fn create_employee(&self, req: &CreateEmployeeRequest) -> ClientResult<Employee> {
        self.send(self.client.post(self.url("/empleados")).json(req))
            .await
    }

    pub async fn update_employee(
        &self,
        id: &str,
        req: &UpdateEmployeeRequest,
    ) -> ClientResult<Employee> {
        let url = self.url(&format!("/empleados/{}", urlencoding::encode(id)));
        self.send(self.client.put(url).json(req)).await
    }

    pub async fn delete_employee(&self, id: &str) -> ClientResult<()> {
        let url = self.url(&format!("/empleados/{}", urlencoding::encode(id)));
        self.send_empty(self.client.delete(url)).await
    }

    pub async fn employee_payout(&self, id: &str, range: DateRange) -> ClientResult<PayoutBreakdown> {
        let url = self.url(&format!("/empleados/{}/pago", urlencoding::encode(id)));
        let query = ReportQuery::from(range);
        self.send(self.client.get(url).query(&query)).await
    }

    // ============================================
    // SERVICE TYPES
    // ============================================

    pub async fn list_service_types(&self) -> ClientResult<Vec<ServiceType>> {
        self.send(self.client.get(self.url("/tipos-servicios"))).await
    }

    pub async fn get_service_type(&self, nombre: &str) -> ClientResult<ServiceType> {
        let url = self.url(&format!("/tipos-servicios/{}", urlencoding::encode(nombre)));
        self.send(self.client.get(url)).await
    }

    pub async fn create_service_type(
        &self,
        req: &CreateServiceTypeRequest,
    ) -> ClientResult<ServiceType> {
        self.send(self.client.post(self.url("/tipos-servicios")).json(req))
            .await
    }

    pub async fn update_service_type(
        &self,
        nombre: &str,
        req: &UpdateServiceTypeRequest,
    ) -> ClientResult<ServiceType> {
        let url = self.url(&format!("/tipos-servicios/{}", urlencoding::encode(nombre)));
        self.send(self.client.put(url).json(req)).await
    }

    pub async fn delete_service_type(&self, nombre: &str) -> ClientResult<()> {
        let url = self.url(&format!("/tipos-servicios/{}", urlencoding::encode(nombre)));
        self.send_empty(self.client.delete(url)).await
    }

    // ============================================
    // RENDERED SERVICES
    // ============================================

    pub async fn list_services(&self, query: &ServiceQuery) -> ClientResult<Vec<RenderedService>> {
        self.send(self.client.get(self.url("/servicios")).query(query))
            .await
    }

    pub async fn get_service(&self, id: &str) -> ClientResult<RenderedService> {
        let url = self.url(&format!("/servicios/{}", urlencoding::encode(id)));
        self.send(self.client.get(url)).await
    }

    pub async fn register_service(&self, req: &CreateServiceRequest) -> ClientResult<RenderedService> {
        self.send(self.client.post(self.url("/servicios")).json(req))
            .await
    }

    pub async fn delete_service(&self, id: &str) -> ClientResult<()> {
        let url = self.url(&format!("/servicios/{}", urlencoding::encode(id)));
        self.send_empty(self.client.delete(url)).await
    }

    // ============================================
    // REPORTS
    // ============================================

    pub async fn income_report(&self, query: &ReportQuery) -> ClientResult<IncomeReport> {
        self.send(self.client.get(self.url("/reportes/ingresos")).query(query))
            .await
    }

    pub async fn profit_report(&self, query: &ReportQuery) -> ClientResult<ProfitReport> {
        self.send(self.client.get(self.url("/reportes/beneficios")).query(query))
            .await
    }

    /// GET /health on the server root
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let root = self
            .base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url);
        self.send(self.client.get(format!("{}/health", root))).await
    }

    // ============================================
    // TRANSPORT
    // ============================================

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(api_error(status, &body))
        }
    }

    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(api_error(status, &body))
        }
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        tracing::error!(error = %e, "{}", UNREACHABLE_MESSAGE);
        ClientError::Unreachable
    } else {
        tracing::error!(error = %e, "Request failed");
        ClientError::Request(e)
    }
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = extract_detail(body);
    let shown = message.as_deref().unwrap_or("");

    match status.as_u16() {
        400 | 422 => tracing::error!(status = %status, "Error de validación: {}", shown),
        404 => tracing::error!(status = %status, "Recurso no encontrado: {}", shown),
        409 => tracing::error!(status = %status, "Conflicto: {}", shown),
        500..=599 => tracing::error!(status = %status, "Error del servidor: {}", shown),
        _ => tracing::error!(status = %status, "Error: {}", shown),
    }

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Pull the human-readable message out of an error body
///
/// Accepts `{"detail": {"message": ..}}`, `{"detail": ".."}`,
/// `{"detail": [{"msg": ..}]}` and `{"message": ..}`.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let text = match value.get("detail") {
        Some(Value::Object(detail)) => detail.get("message").and_then(Value::as_str),
        Some(Value::String(detail)) => Some(detail.as_str()),
        Some(Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str),
        _ => value.get("message").and_then(Value::as_str),
    };

    text.filter(|t| !t.trim().is_empty()).map(str::to_string)
}

/// Fallback text for an HTTP status when the body carries no message
pub fn status_message(status: u16) -> &'static str {
    match status {
        400 | 422 => "Datos inválidos",
        404 => "Recurso no encontrado",
        409 => "Conflicto: el recurso ya existe",
        500..=599 => "Error del servidor",
        _ => "Error inesperado",
    }
}

/// Errors returned by `SalonClient`
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{}", message.as_deref().unwrap_or_else(|| status_message(*status)))]
    Api { status: u16, message: Option<String> },

    /// No response was received
    #[error("No se pudo conectar con el servidor")]
    Unreachable,

    /// The response body did not match the expected shape
    #[error("Respuesta inválida del servidor: {0}")]
    Decode(String),

    /// The request could not be built or sent
    #[error("Error en la petición: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClientError {
    /// Message sent by the server, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an API failure
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for an error banner
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::spawn_server;
    use rust_decimal::Decimal;

    #[test]
    fn test_extract_detail_shapes() {
        assert_eq!(
            extract_detail(r#"{"detail":{"error":"not_found","message":"no está"}}"#).as_deref(),
            Some("no está")
        );
        assert_eq!(extract_detail(r#"{"detail":"plano"}"#).as_deref(), Some("plano"));
        assert_eq!(
            extract_detail(r#"{"detail":[{"msg":"campo requerido"}]}"#).as_deref(),
            Some("campo requerido")
        );
        assert_eq!(extract_detail(r#"{"message":"top"}"#).as_deref(), Some("top"));
        assert_eq!(extract_detail("<html>"), None);
    }

    #[test]
    fn test_status_fallbacks() {
        let err = ClientError::Api {
            status: 409,
            message: None,
        };
        assert_eq!(err.user_message(), "Conflicto: el recurso ya existe");
        assert_eq!(err.detail(), None);
        assert_eq!(status_message(500), "Error del servidor");
        assert_eq!(status_message(418), "Error inesperado");
    }

    #[test]
    fn test_request_error_message_is_spanish() {
        let source = reqwest::Client::new().get("sin-esquema").build().unwrap_err();
        let err = ClientError::from(source);

        assert!(err.user_message().starts_with("Error en la petición: "));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_round_trip_against_server() {
        let client = spawn_server().await;

        let created = client
            .create_employee(&CreateEmployeeRequest {
                id: "E001".to_string(),
                nombre: "Ana".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.nombre, "Ana");

        client
            .create_service_type(&CreateServiceTypeRequest {
                nombre: "Corte Dama".to_string(),
                descripcion: "Corte largo".to_string(),
                porcentaje_comision: Decimal::from(40),
                precio_por_defecto: None,
            })
            .await
            .unwrap();

        let tipo = client.get_service_type("Corte Dama").await.unwrap();
        assert_eq!(tipo.porcentaje_comision, Decimal::from(40));

        let service = client
            .register_service(&CreateServiceRequest {
                fecha: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                empleado_id: "E001".to_string(),
                tipo_servicio: "Corte Dama".to_string(),
                precio: Decimal::new(2500, 2),
            })
            .await
            .unwrap();
        assert_eq!(service.comision_calculada, Decimal::new(1000, 2));

        let payout = client.employee_payout("E001", DateRange::all()).await.unwrap();
        assert_eq!(payout.total, Decimal::new(1000, 2));

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_duplicate_surfaces_server_message() {
        let client = spawn_server().await;
        let req = CreateEmployeeRequest {
            id: "E001".to_string(),
            nombre: "Ana".to_string(),
        };

        client.create_employee(&req).await.unwrap();
        let err = client.create_employee(&req).await.unwrap_err();

        assert_eq!(err.status(), Some(409));
        assert!(err.user_message().contains("ya existe"));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SalonClient::new(format!("http://{}/api", addr)).unwrap();
        let err = client.list_employees().await.unwrap_err();

        assert!(matches!(err, ClientError::Unreachable));
        assert_eq!(err.user_message(), UNREACHABLE_MESSAGE);
    }
}
