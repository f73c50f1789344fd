//! Form state and validation
//!
//! Forms hold raw text as typed by the user. Validation runs before any
//! request payload is built; errors are keyed by field name.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::api::dto::{
    CreateEmployeeRequest, CreateServiceRequest, CreateServiceTypeRequest, UpdateEmployeeRequest,
    UpdateServiceTypeRequest,
};
use crate::domain::validate::{parse_date, validate_date_range};
use crate::domain::{DateRange, Employee, ServiceType, MAX_PRICE};

/// Field name → message
pub type FormErrors = BTreeMap<&'static str, String>;

fn check(errors: FormErrors) -> Result<(), FormErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim().replace(',', ".");
    Decimal::from_str(&text).ok()
}

/// Parse a price in (0, MAX_PRICE]; `label` starts the error message
fn parse_price(text: &str, label: &str) -> Result<Decimal, String> {
    match parse_decimal(text) {
        Some(price) if price > MAX_PRICE => Err(format!("{} no puede superar {}", label, MAX_PRICE)),
        Some(price) if price > Decimal::ZERO => Ok(price),
        _ => Err(format!("{} debe ser mayor que cero", label)),
    }
}

// ============================================
// EMPLOYEE
// ============================================

/// Create / edit employee form; the id is locked while editing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeForm {
    pub id: String,
    pub nombre: String,
    editing: bool,
}

impl EmployeeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            nombre: employee.nombre.clone(),
            editing: true,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.id.trim().is_empty() {
            errors.insert("id", "El ID es requerido".to_string());
        }
        if self.nombre.trim().is_empty() {
            errors.insert("nombre", "El nombre es requerido".to_string());
        }
        check(errors)
    }

    pub fn to_create(&self) -> Result<CreateEmployeeRequest, FormErrors> {
        self.validate()?;
        Ok(CreateEmployeeRequest {
            id: self.id.trim().to_string(),
            nombre: self.nombre.trim().to_string(),
        })
    }

    pub fn to_update(&self) -> Result<UpdateEmployeeRequest, FormErrors> {
        self.validate()?;
        Ok(UpdateEmployeeRequest {
            nombre: self.nombre.trim().to_string(),
        })
    }
}

// ============================================
// SERVICE TYPE
// ============================================

/// Create / edit service type form; the name is locked while editing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceTypeForm {
    pub nombre: String,
    pub descripcion: String,
    pub porcentaje_comision: String,
    /// Optional; blank means no default price
    pub precio_por_defecto: String,
    editing: bool,
}

struct ServiceTypeFields {
    nombre: String,
    descripcion: String,
    porcentaje: Decimal,
    precio: Option<Decimal>,
}

impl ServiceTypeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(service_type: &ServiceType) -> Self {
        Self {
            nombre: service_type.nombre.clone(),
            descripcion: service_type.descripcion.clone(),
            porcentaje_comision: service_type.porcentaje_comision.normalize().to_string(),
            precio_por_defecto: service_type
                .precio_por_defecto
                .map(|p| p.to_string())
                .unwrap_or_default(),
            editing: true,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    fn fields(&self) -> Result<ServiceTypeFields, FormErrors> {
        let mut errors = FormErrors::new();

        if self.nombre.trim().is_empty() {
            errors.insert("nombre", "El nombre es requerido".to_string());
        }
        if self.descripcion.trim().is_empty() {
            errors.insert("descripcion", "La descripción es requerida".to_string());
        }

        let porcentaje = parse_decimal(&self.porcentaje_comision)
            .filter(|p| *p >= Decimal::ZERO && *p <= Decimal::ONE_HUNDRED);
        if porcentaje.is_none() {
            errors.insert(
                "porcentaje_comision",
                "El porcentaje debe estar entre 0 y 100".to_string(),
            );
        }

        let precio = if self.precio_por_defecto.trim().is_empty() {
            None
        } else {
            parse_price(&self.precio_por_defecto, "El precio por defecto")
                .map_err(|message| errors.insert("precio_por_defecto", message))
                .ok()
        };

        check(errors)?;
        Ok(ServiceTypeFields {
            nombre: self.nombre.trim().to_string(),
            descripcion: self.descripcion.trim().to_string(),
            porcentaje: porcentaje.unwrap_or_default(),
            precio,
        })
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        self.fields().map(|_| ())
    }

    pub fn to_create(&self) -> Result<CreateServiceTypeRequest, FormErrors> {
        let fields = self.fields()?;
        Ok(CreateServiceTypeRequest {
            nombre: fields.nombre,
            descripcion: fields.descripcion,
            porcentaje_comision: fields.porcentaje,
            precio_por_defecto: fields.precio,
        })
    }

    pub fn to_update(&self) -> Result<UpdateServiceTypeRequest, FormErrors> {
        let fields = self.fields()?;
        Ok(UpdateServiceTypeRequest {
            descripcion: Some(fields.descripcion),
            porcentaje_comision: Some(fields.porcentaje),
            precio_por_defecto: fields.precio,
        })
    }
}

// ============================================
// RENDERED SERVICE
// ============================================

/// Register service form
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceForm {
    /// `YYYY-MM-DD`
    pub fecha: String,
    pub empleado_id: String,
    pub tipo_servicio: String,
    pub precio: String,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl ServiceForm {
    /// Empty form dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            fecha: today.format("%Y-%m-%d").to_string(),
            empleado_id: String::new(),
            tipo_servicio: String::new(),
            precio: String::new(),
        }
    }

    /// Select a service type, prefilling the price from its default
    pub fn select_type(&mut self, service_type: &ServiceType) {
        self.tipo_servicio = service_type.nombre.clone();
        if let Some(price) = service_type.precio_por_defecto {
            self.precio = price.to_string();
        }
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        self.to_request().map(|_| ())
    }

    pub fn to_request(&self) -> Result<CreateServiceRequest, FormErrors> {
        let mut errors = FormErrors::new();

        let fecha = if self.fecha.trim().is_empty() {
            errors.insert("fecha", "La fecha es requerida".to_string());
            None
        } else {
            parse_date(&self.fecha, "fecha")
                .map_err(|e| errors.insert("fecha", e.to_string()))
                .ok()
        };

        if self.empleado_id.trim().is_empty() {
            errors.insert("empleado_id", "Debes seleccionar un empleado".to_string());
        }
        if self.tipo_servicio.trim().is_empty() {
            errors.insert("tipo_servicio", "Debes seleccionar un tipo de servicio".to_string());
        }

        let precio = parse_price(&self.precio, "El precio")
            .map_err(|message| errors.insert("precio", message))
            .ok();

        check(errors)?;
        match (fecha, precio) {
            (Some(fecha), Some(precio)) => Ok(CreateServiceRequest {
                fecha,
                empleado_id: self.empleado_id.trim().to_string(),
                tipo_servicio: self.tipo_servicio.trim().to_string(),
                precio,
            }),
            _ => Err(FormErrors::new()),
        }
    }
}

// ============================================
// REPORT FILTER
// ============================================

/// Date filter shared by the report views and the service list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilterForm {
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub empleado_id: String,
}

impl ReportFilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validated range; blank dates are open bounds
    pub fn to_range(&self) -> Result<DateRange, FormErrors> {
        let mut errors = FormErrors::new();

        let mut parse = |field: &'static str, text: &str| {
            if text.trim().is_empty() {
                return None;
            }
            parse_date(text, field)
                .map_err(|e| errors.insert(field, e.to_string()))
                .ok()
        };
        let start = parse("fecha_inicio", &self.fecha_inicio);
        let end = parse("fecha_fin", &self.fecha_fin);

        check(errors)?;

        validate_date_range(DateRange::new(start, end)).map_err(|e| {
            let mut errors = FormErrors::new();
            errors.insert("fecha_inicio", e.to_string());
            errors
        })
    }

    /// Employee selected in the filter, if any
    pub fn employee(&self) -> Option<&str> {
        Some(self.empleado_id.trim()).filter(|id| !id.is_empty())
    }

    /// Employee required by the payout report
    pub fn required_employee(&self) -> Result<&str, FormErrors> {
        self.employee().ok_or_else(|| {
            let mut errors = FormErrors::new();
            errors.insert("empleado_id", "Debe seleccionar un empleado".to_string());
            errors
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_form_required_fields() {
        let errors = EmployeeForm::new().validate().unwrap_err();
        assert_eq!(errors["id"], "El ID es requerido");
        assert_eq!(errors["nombre"], "El nombre es requerido");

        let form = EmployeeForm {
            id: " E001 ".to_string(),
            nombre: "Ana ".to_string(),
            ..Default::default()
        };
        let req = form.to_create().unwrap();
        assert_eq!(req.id, "E001");
        assert_eq!(req.nombre, "Ana");
    }

    #[test]
    fn test_employee_form_edit_locks_id() {
        let form = EmployeeForm::edit(&Employee::new("E001", "Ana"));
        assert!(form.is_editing());
        assert_eq!(form.id, "E001");
    }

    #[test]
    fn test_service_type_percentage_range() {
        let mut form = ServiceTypeForm {
            nombre: "Corte".to_string(),
            descripcion: "Corte de pelo".to_string(),
            porcentaje_comision: "150".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["porcentaje_comision"], "El porcentaje debe estar entre 0 y 100");

        form.porcentaje_comision = "abc".to_string();
        assert!(form.validate().is_err());

        form.porcentaje_comision = "12,5".to_string();
        let req = form.to_create().unwrap();
        assert_eq!(req.porcentaje_comision, Decimal::new(125, 1));
        assert_eq!(req.precio_por_defecto, None);
    }

    #[test]
    fn test_service_type_default_price() {
        let form = ServiceTypeForm {
            nombre: "Corte".to_string(),
            descripcion: "Corte de pelo".to_string(),
            porcentaje_comision: "40".to_string(),
            precio_por_defecto: "0".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key("precio_por_defecto"));
    }

    #[test]
    fn test_service_form_defaults_and_errors() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let form = ServiceForm::new(today);
        assert_eq!(form.fecha, "2024-03-09");

        let errors = form.validate().unwrap_err();
        assert_eq!(errors["empleado_id"], "Debes seleccionar un empleado");
        assert_eq!(errors["tipo_servicio"], "Debes seleccionar un tipo de servicio");
        assert_eq!(errors["precio"], "El precio debe ser mayor que cero");
        assert!(!errors.contains_key("fecha"));
    }

    #[test]
    fn test_service_form_prefills_default_price() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut form = ServiceForm::new(today);
        form.empleado_id = "E001".to_string();
        form.select_type(
            &ServiceType::new("Corte", "Corte de pelo", Decimal::from(40))
                .default_price(Decimal::new(2500, 2)),
        );

        let req = form.to_request().unwrap();
        assert_eq!(req.tipo_servicio, "Corte");
        assert_eq!(req.precio, Decimal::new(2500, 2));
        assert_eq!(req.fecha, today);

        form.precio = "10000000000000000000000000000".to_string();
        let errors = form.to_request().unwrap_err();
        assert_eq!(errors["precio"], "El precio no puede superar 1000000");
    }

    #[test]
    fn test_report_filter_range() {
        let mut form = ReportFilterForm {
            fecha_inicio: "2024-02-01".to_string(),
            fecha_fin: "2024-01-01".to_string(),
            ..Default::default()
        };
        let errors = form.to_range().unwrap_err();
        assert_eq!(
            errors["fecha_inicio"],
            "La fecha de inicio no puede ser posterior a la fecha de fin"
        );

        form.clear();
        assert!(form.to_range().unwrap().is_unbounded());

        let errors = form.required_employee().unwrap_err();
        assert_eq!(errors["empleado_id"], "Debe seleccionar un empleado");
    }
}
