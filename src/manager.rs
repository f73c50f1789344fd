//! Salon Manager
//!
//! Business rules on top of a `Repository`:
//! 1. Validate input (required fields, percentage range, positive price)
//! 2. Enforce natural-key uniqueness and referential checks
//! 3. Compute commissions when a service is registered
//! 4. Aggregate income, profit and per-employee payouts
//!
//! # Report Pipeline
//!
//! ```text
//! DateRange → validate → list_services(filter) → sum prices / commissions → report
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::validate::{validate_date_range, validate_percentage, validate_price, validate_required};
use crate::domain::{
    commission, entity, profit, to_money, total, DateRange, DomainError, DomainResult, Employee,
    IncomeReport, PayoutBreakdown, ProfitReport, RenderedService, ServiceDetail, ServiceFilter,
    ServiceType, MAX_PRICE,
};
use crate::storage::Repository;

/// Fields to change on an existing service type; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceTypePatch {
    pub descripcion: Option<String>,
    pub porcentaje_comision: Option<Decimal>,
    pub precio_por_defecto: Option<Decimal>,
}

/// Data needed to register a rendered service
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub fecha: NaiveDate,
    pub empleado_id: String,
    pub tipo_servicio: String,
    pub precio: Decimal,
}

/// Business layer shared by all API handlers
pub struct SalonManager {
    repository: Arc<dyn Repository>,
}

impl SalonManager {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    // ============================================
    // EMPLOYEES
    // ============================================

    pub async fn create_employee(&self, id: &str, nombre: &str) -> DomainResult<Employee> {
        let id = validate_required(id, "id", "El ID es requerido")?;
        let nombre = validate_required(nombre, "nombre", "El nombre es requerido")?;

        if self.repository.get_employee(&id).await?.is_some() {
            return Err(DomainError::duplicate(entity::EMPLOYEE, id));
        }

        let employee = Employee::new(id, nombre);
        self.repository.save_employee(&employee).await?;

        tracing::info!(employee_id = %employee.id, "Created employee");
        Ok(employee)
    }

    pub async fn get_employee(&self, id: &str) -> DomainResult<Employee> {
        self.repository
            .get_employee(id)
            .await?
            .ok_or_else(|| DomainError::not_found(entity::EMPLOYEE, id))
    }

    pub async fn list_employees(&self) -> DomainResult<Vec<Employee>> {
        Ok(self.repository.list_employees().await?)
    }

    /// Rename an employee; the id never changes
    pub async fn update_employee(&self, id: &str, nombre: &str) -> DomainResult<Employee> {
        let mut employee = self.get_employee(id).await?;
        employee.nombre = validate_required(nombre, "nombre", "El nombre es requerido")?;
        self.repository.save_employee(&employee).await?;

        tracing::info!(employee_id = %employee.id, "Updated employee");
        Ok(employee)
    }

    /// Delete an employee with no rendered services
    pub async fn delete_employee(&self, id: &str) -> DomainResult<()> {
        self.get_employee(id).await?;

        if self.repository.has_services_for_employee(id).await? {
            return Err(DomainError::Conflict(format!(
                "No se puede eliminar el empleado '{}': tiene servicios registrados",
                id
            )));
        }

        self.repository.delete_employee(id).await?;
        tracing::info!(employee_id = %id, "Deleted employee");
        Ok(())
    }

    // ============================================
    // SERVICE TYPES
    // ============================================

    pub async fn create_service_type(
        &self,
        nombre: &str,
        descripcion: &str,
        porcentaje_comision: Decimal,
        precio_por_defecto: Option<Decimal>,
    ) -> DomainResult<ServiceType> {
        let nombre = validate_required(nombre, "nombre", "El nombre es requerido")?;
        let descripcion =
            validate_required(descripcion, "descripcion", "La descripción es requerida")?;
        let porcentaje = validate_percentage(porcentaje_comision)?;
        let precio = precio_por_defecto.map(validate_default_price).transpose()?;

        if self.repository.get_service_type(&nombre).await?.is_some() {
            return Err(DomainError::duplicate(entity::SERVICE_TYPE, nombre));
        }

        let service_type = ServiceType {
            nombre,
            descripcion,
            porcentaje_comision: porcentaje,
            precio_por_defecto: precio,
        };
        self.repository.save_service_type(&service_type).await?;

        tracing::info!(
            service_type = %service_type.nombre,
            percentage = %service_type.porcentaje_comision,
            "Created service type"
        );
        Ok(service_type)
    }

    pub async fn get_service_type(&self, nombre: &str) -> DomainResult<ServiceType> {
        self.repository
            .get_service_type(nombre)
            .await?
            .ok_or_else(|| DomainError::not_found(entity::SERVICE_TYPE, nombre))
    }

    pub async fn list_service_types(&self) -> DomainResult<Vec<ServiceType>> {
        Ok(self.repository.list_service_types().await?)
    }

    /// Apply a partial update; previously registered services keep their commission
    pub async fn update_service_type(
        &self,
        nombre: &str,
        patch: ServiceTypePatch,
    ) -> DomainResult<ServiceType> {
        let mut service_type = self.get_service_type(nombre).await?;

        if let Some(descripcion) = patch.descripcion {
            service_type.descripcion =
                validate_required(&descripcion, "descripcion", "La descripción es requerida")?;
        }
        if let Some(porcentaje) = patch.porcentaje_comision {
            service_type.porcentaje_comision = validate_percentage(porcentaje)?;
        }
        if let Some(precio) = patch.precio_por_defecto {
            service_type.precio_por_defecto = Some(validate_default_price(precio)?);
        }

        self.repository.save_service_type(&service_type).await?;

        tracing::info!(service_type = %service_type.nombre, "Updated service type");
        Ok(service_type)
    }

    /// Delete a service type no rendered service refers to
    pub async fn delete_service_type(&self, nombre: &str) -> DomainResult<()> {
        self.get_service_type(nombre).await?;

        if self.repository.has_services_for_type(nombre).await? {
            return Err(DomainError::Conflict(format!(
                "No se puede eliminar el tipo de servicio '{}': tiene servicios registrados",
                nombre
            )));
        }

        self.repository.delete_service_type(nombre).await?;
        tracing::info!(service_type = %nombre, "Deleted service type");
        Ok(())
    }

    // ============================================
    // RENDERED SERVICES
    // ============================================

    /// Register a service, computing its commission from the type's percentage
    pub async fn register_service(&self, new: NewService) -> DomainResult<RenderedService> {
        let precio = validate_price(new.precio)?;
        let employee = self.get_employee(&new.empleado_id).await?;
        let service_type = self.get_service_type(&new.tipo_servicio).await?;

        let service = RenderedService {
            id: uuid::Uuid::new_v4().to_string(),
            fecha: new.fecha,
            empleado_id: employee.id,
            tipo_servicio: service_type.nombre,
            precio: to_money(precio),
            comision_calculada: commission(precio, service_type.porcentaje_comision)?,
        };
        self.repository.save_service(&service).await?;

        tracing::info!(
            service_id = %service.id,
            employee_id = %service.empleado_id,
            price = %service.precio,
            commission = %service.comision_calculada,
            "Registered service"
        );
        Ok(service)
    }

    pub async fn get_service(&self, id: &str) -> DomainResult<RenderedService> {
        self.repository
            .get_service(id)
            .await?
            .ok_or_else(|| DomainError::not_found(entity::SERVICE, id))
    }

    /// Services matching the filter, strictly newest date first
    pub async fn list_services(&self, filter: &ServiceFilter) -> DomainResult<Vec<RenderedService>> {
        validate_date_range(filter.range)?;
        Ok(self.repository.list_services(filter).await?)
    }

    pub async fn delete_service(&self, id: &str) -> DomainResult<()> {
        if !self.repository.delete_service(id).await? {
            return Err(DomainError::not_found(entity::SERVICE, id));
        }
        tracing::info!(service_id = %id, "Deleted service");
        Ok(())
    }

    // ============================================
    // REPORTS
    // ============================================

    /// Total income over a range, optionally for one employee
    pub async fn income(
        &self,
        range: DateRange,
        empleado_id: Option<&str>,
    ) -> DomainResult<IncomeReport> {
        let services = self.list_services(&report_filter(range, empleado_id)).await?;

        Ok(IncomeReport {
            total: total(services.iter().map(|s| s.precio))?,
            fecha_inicio: range.start,
            fecha_fin: range.end,
        })
    }

    /// Income, commissions and profit over a range, optionally for one employee
    pub async fn profit(
        &self,
        range: DateRange,
        empleado_id: Option<&str>,
    ) -> DomainResult<ProfitReport> {
        let services = self.list_services(&report_filter(range, empleado_id)).await?;

        let ingresos = total(services.iter().map(|s| s.precio))?;
        let comisiones = total(services.iter().map(|s| s.comision_calculada))?;

        Ok(ProfitReport {
            ingresos,
            comisiones,
            beneficios: profit(ingresos, comisiones)?,
            fecha_inicio: range.start,
            fecha_fin: range.end,
        })
    }

    /// Commissions owed to an employee over a range, with one line per service
    pub async fn employee_payout(&self, id: &str, range: DateRange) -> DomainResult<PayoutBreakdown> {
        let employee = self.get_employee(id).await?;
        let services = self.list_services(&report_filter(range, Some(id))).await?;

        let servicios: Vec<ServiceDetail> = services.iter().map(ServiceDetail::from).collect();
        let owed = total(servicios.iter().map(|s| s.comision))?;

        Ok(PayoutBreakdown {
            empleado_id: employee.id,
            empleado_nombre: employee.nombre,
            servicios,
            total: owed,
        })
    }
}

fn report_filter(range: DateRange, empleado_id: Option<&str>) -> ServiceFilter {
    let filter = ServiceFilter::new().range(range);
    match empleado_id {
        Some(id) => filter.employee(id),
        None => filter,
    }
}

fn validate_default_price(price: Decimal) -> DomainResult<Decimal> {
    validate_price(price).map(to_money).map_err(|_| {
        let message = if price > MAX_PRICE {
            format!("El precio por defecto no puede superar {}", MAX_PRICE)
        } else {
            "El precio por defecto debe ser mayor que cero".to_string()
        };
        DomainError::validation(message, "precio_por_defecto")
    })
}
