//! Core data types for the salon
//!
//! This module defines the records shared by the server and the client:
//! - `Employee`: A member of staff, keyed by an externally assigned id
//! - `ServiceType`: A kind of service with its commission percentage
//! - `RenderedService`: One service performed by an employee on a date
//! - `DateRange` and `ServiceFilter`: Optional query scoping
//! - Report records: `IncomeReport`, `ProfitReport`, `PayoutBreakdown`

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A salon employee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    /// Unique, externally assigned identifier (e.g. "E001")
    pub id: String,
    /// Display name
    pub nombre: String,
}

impl Employee {
    pub fn new(id: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
        }
    }
}

/// A kind of service offered by the salon
///
/// `nombre` is the natural key. The commission percentage travels as a JSON
/// number; the optional default price travels as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceType {
    pub nombre: String,
    pub descripcion: String,
    /// Share of the price paid to the employee, in [0, 100]
    #[serde(with = "rust_decimal::serde::float")]
    pub porcentaje_comision: Decimal,
    /// Price suggested when registering a service of this type
    #[serde(default)]
    pub precio_por_defecto: Option<Decimal>,
}

impl ServiceType {
    pub fn new(
        nombre: impl Into<String>,
        descripcion: impl Into<String>,
        porcentaje_comision: Decimal,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            descripcion: descripcion.into(),
            porcentaje_comision,
            precio_por_defecto: None,
        }
    }

    /// Builder method: set the default price
    pub fn default_price(mut self, price: Decimal) -> Self {
        self.precio_por_defecto = Some(price);
        self
    }
}

/// A service performed by an employee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedService {
    /// Server-generated identifier
    pub id: String,
    pub fecha: NaiveDate,
    pub empleado_id: String,
    /// Name of the service type
    pub tipo_servicio: String,
    pub precio: Decimal,
    /// Commission computed from the type's percentage at registration time
    pub comision_calculada: Decimal,
}

/// One line of an employee payout breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceDetail {
    pub fecha: NaiveDate,
    pub tipo_servicio: String,
    pub precio: Decimal,
    pub comision: Decimal,
}

impl From<&RenderedService> for ServiceDetail {
    fn from(service: &RenderedService) -> Self {
        Self {
            fecha: service.fecha,
            tipo_servicio: service.tipo_servicio.clone(),
            precio: service.precio,
            comision: service.comision_calculada,
        }
    }
}

/// Commissions owed to one employee over a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayoutBreakdown {
    pub empleado_id: String,
    pub empleado_nombre: String,
    pub servicios: Vec<ServiceDetail>,
    pub total: Decimal,
}

/// Total income over a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeReport {
    pub total: Decimal,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,
}

/// Income, commissions and profit over a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitReport {
    pub ingresos: Decimal,
    pub comisiones: Decimal,
    pub beneficios: Decimal,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,
}

/// Inclusive date interval; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(rename = "fecha_inicio", default)]
    pub start: Option<NaiveDate>,
    #[serde(rename = "fecha_fin", default)]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Range with no bounds
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Closed range between two dates
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Check whether a date falls inside the range (bounds inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// True when neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Scoping for service listings and reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub empleado_id: Option<String>,
    pub range: DateRange,
}

impl ServiceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: restrict to one employee
    pub fn employee(mut self, empleado_id: impl Into<String>) -> Self {
        self.empleado_id = Some(empleado_id.into());
        self
    }

    /// Builder method: restrict to a date range
    pub fn range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Check whether a service passes the filter
    pub fn matches(&self, service: &RenderedService) -> bool {
        let employee_ok = self
            .empleado_id
            .as_deref()
            .map_or(true, |id| service.empleado_id == id);
        employee_ok && self.range.contains(service.fecha)
    }
}
