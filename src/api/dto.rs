//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! The client serializes the same request types it sends.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DateRange, ServiceFilter};
use crate::manager::{NewService, ServiceTypePatch};

// ============================================
// EMPLOYEE DTOs
// ============================================

/// POST /api/empleados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub id: String,
    pub nombre: String,
}

/// PUT /api/empleados/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub nombre: String,
}

// ============================================
// SERVICE TYPE DTOs
// ============================================

/// POST /api/tipos-servicios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceTypeRequest {
    pub nombre: String,
    pub descripcion: String,
    /// Percentage in [0, 100]
    #[serde(with = "rust_decimal::serde::float")]
    pub porcentaje_comision: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio_por_defecto: Option<Decimal>,
}

/// PUT /api/tipos-servicios/{nombre}; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateServiceTypeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub porcentaje_comision: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio_por_defecto: Option<Decimal>,
}

impl From<UpdateServiceTypeRequest> for ServiceTypePatch {
    fn from(req: UpdateServiceTypeRequest) -> Self {
        ServiceTypePatch {
            descripcion: req.descripcion,
            porcentaje_comision: req.porcentaje_comision,
            precio_por_defecto: req.precio_por_defecto,
        }
    }
}

// ============================================
// SERVICE DTOs
// ============================================

/// POST /api/servicios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub fecha: NaiveDate,
    pub empleado_id: String,
    pub tipo_servicio: String,
    pub precio: Decimal,
}

impl From<CreateServiceRequest> for NewService {
    fn from(req: CreateServiceRequest) -> Self {
        NewService {
            fecha: req.fecha,
            empleado_id: req.empleado_id,
            tipo_servicio: req.tipo_servicio,
            precio: req.precio,
        }
    }
}

/// GET /api/servicios query string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empleado_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<NaiveDate>,
}

impl From<ServiceQuery> for ServiceFilter {
    fn from(query: ServiceQuery) -> Self {
        ServiceFilter {
            empleado_id: query.empleado_id.filter(|id| !id.is_empty()),
            range: DateRange::new(query.fecha_inicio, query.fecha_fin),
        }
    }
}

// ============================================
// REPORT DTOs
// ============================================

/// Query string shared by the report endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<NaiveDate>,
    /// Ignored by the payout endpoint, which takes the employee from the path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empleado_id: Option<String>,
}

impl ReportQuery {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.fecha_inicio, self.fecha_fin)
    }

    pub fn employee(&self) -> Option<&str> {
        self.empleado_id.as_deref().filter(|id| !id.is_empty())
    }
}

impl From<DateRange> for ReportQuery {
    fn from(range: DateRange) -> Self {
        ReportQuery {
            fecha_inicio: range.start,
            fecha_fin: range.end,
            empleado_id: None,
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// GET /
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// "ok" or "error"
    pub database: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_create_service_accepts_number_or_string_price() {
        let from_number: CreateServiceRequest = serde_json::from_str(
            r#"{"fecha":"2024-01-15","empleado_id":"E001","tipo_servicio":"Corte","precio":25.5}"#,
        )
        .unwrap();
        let from_string: CreateServiceRequest = serde_json::from_str(
            r#"{"fecha":"2024-01-15","empleado_id":"E001","tipo_servicio":"Corte","precio":"25.50"}"#,
        )
        .unwrap();

        assert_eq!(from_number.precio, from_string.precio);
    }

    #[test]
    fn test_update_service_type_partial() {
        let req: UpdateServiceTypeRequest =
            serde_json::from_str(r#"{"porcentaje_comision": 45}"#).unwrap();
        let patch = ServiceTypePatch::from(req);

        assert_eq!(patch.descripcion, None);
        assert_eq!(patch.porcentaje_comision, Some(Decimal::from(45)));
        assert_eq!(patch.precio_por_defecto, None);
    }

    #[test]
    fn test_percentage_serialized_as_number() {
        let req = CreateServiceTypeRequest {
            nombre: "Tinte".to_string(),
            descripcion: "Coloración".to_string(),
            porcentaje_comision: Decimal::from_str("12.5").unwrap(),
            precio_por_defecto: None,
        };
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["porcentaje_comision"], serde_json::json!(12.5));
        assert!(json.get("precio_por_defecto").is_none());
    }

    #[test]
    fn test_service_query_blank_employee_ignored() {
        let filter = ServiceFilter::from(ServiceQuery {
            empleado_id: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(filter.empleado_id, None);
        assert!(filter.range.is_unbounded());
    }
}
