//! API Error Types
//!
//! Maps domain and extractor failures to HTTP responses of the form
//! `{"detail": {"error": "<code>", "message": "<text>", "field": "<f>"}}`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::DomainError;

/// Message returned for failures whose detail must not leak to callers
pub const INTERNAL_MESSAGE: &str = "Error interno del servidor";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Business rule or validation failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Malformed request body, path or query string
    #[error("{message}")]
    BadRequest {
        message: String,
        field: Option<String>,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            field: None,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Domain(e) => match e {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
                DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                DomainError::Duplicate { .. } => (StatusCode::CONFLICT, "duplicate_error"),
                DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                DomainError::Persistence { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            },
            ApiError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::Internal(_) | ApiError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            ApiError::Domain(DomainError::Validation { field, .. }) => field.clone(),
            ApiError::BadRequest { field, .. } => field.clone(),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            let request_id = uuid::Uuid::new_v4().to_string();
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
            INTERNAL_MESSAGE.to_string()
        } else {
            tracing::debug!(error_code = %code, error_message = %self, "Request rejected");
            self.to_string()
        };

        let body = ErrorResponse {
            detail: ErrorDetail {
                error: code.to_string(),
                message,
                field: self.field(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Cuerpo de la petición inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("Parámetros de consulta inválidos: {}", rejection.body_text()))
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
