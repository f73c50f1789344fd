//! Client-side stores
//!
//! Each store keeps an in-memory copy of one resource plus `loading` and
//! `error` flags. Every action:
//!
//! 1. sets `loading` and clears `error`
//! 2. performs exactly one request
//! 3. merges the result (push, replace, remove or reload)
//! 4. on failure stores the server message, or the action's fallback, and
//!    returns the error to the caller
//! 5. clears `loading`

use std::sync::Arc;

use crate::api::dto::{
    CreateEmployeeRequest, CreateServiceRequest, CreateServiceTypeRequest, ReportQuery,
    ServiceQuery, UpdateEmployeeRequest, UpdateServiceTypeRequest,
};
use crate::client::display::sort_services_by_date_desc;
use crate::client::http::{ClientResult, SalonClient};
use crate::domain::{
    DateRange, Employee, IncomeReport, PayoutBreakdown, ProfitReport, RenderedService,
    ServiceFilter, ServiceType,
};

/// Loading and error flags shared by every store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreStatus {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: ClientResult<T>, fallback: &str) -> ClientResult<T> {
        self.loading = false;
        if let Err(e) = &result {
            self.error = Some(e.detail().unwrap_or(fallback).to_string());
        }
        result
    }
}

fn by_name(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// ============================================
// EMPLOYEES
// ============================================

pub struct EmployeeStore {
    client: Arc<SalonClient>,
    pub employees: Vec<Employee>,
    pub status: StoreStatus,
}

impl EmployeeStore {
    pub fn new(client: Arc<SalonClient>) -> Self {
        Self {
            client,
            employees: Vec::new(),
            status: StoreStatus::default(),
        }
    }

    /// Employees sorted by name
    pub fn sorted(&self) -> Vec<&Employee> {
        let mut sorted: Vec<&Employee> = self.employees.iter().collect();
        sorted.sort_by(|a, b| by_name(&a.nombre, &b.nombre));
        sorted
    }

    pub fn find(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.status.begin();
        let result = self.client.list_employees().await;
        self.employees = self.status.finish(result, "Error al cargar empleados")?;
        Ok(())
    }

    pub async fn create(&mut self, req: &CreateEmployeeRequest) -> ClientResult<Employee> {
        self.status.begin();
        let result = self.client.create_employee(req).await;
        let employee = self.status.finish(result, "Error al crear empleado")?;
        self.employees.push(employee.clone());
        Ok(employee)
    }

    pub async fn update(&mut self, id: &str, req: &UpdateEmployeeRequest) -> ClientResult<Employee> {
        self.status.begin();
        let result = self.client.update_employee(id, req).await;
        let employee = self.status.finish(result, "Error al actualizar empleado")?;
        if let Some(slot) = self.employees.iter_mut().find(|e| e.id == id) {
            *slot = employee.clone();
        }
        Ok(employee)
    }

    pub async fn remove(&mut self, id: &str) -> ClientResult<()> {
        self.status.begin();
        let result = self.client.delete_employee(id).await;
        self.status.finish(result, "Error al eliminar empleado")?;
        self.employees.retain(|e| e.id != id);
        Ok(())
    }
}

// ============================================
// SERVICE TYPES
// ============================================

pub struct ServiceTypeStore {
    client: Arc<SalonClient>,
    pub service_types: Vec<ServiceType>,
    pub status: StoreStatus,
}

impl ServiceTypeStore {
    pub fn new(client: Arc<SalonClient>) -> Self {
        Self {
            client,
            service_types: Vec::new(),
            status: StoreStatus::default(),
        }
    }

    /// Service types sorted by name
    pub fn sorted(&self) -> Vec<&ServiceType> {
        let mut sorted: Vec<&ServiceType> = self.service_types.iter().collect();
        sorted.sort_by(|a, b| by_name(&a.nombre, &b.nombre));
        sorted
    }

    pub fn find(&self, nombre: &str) -> Option<&ServiceType> {
        self.service_types.iter().find(|t| t.nombre == nombre)
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.status.begin();
        let result = self.client.list_service_types().await;
        self.service_types = self
            .status
            .finish(result, "Error al cargar tipos de servicios")?;
        Ok(())
    }

    pub async fn create(&mut self, req: &CreateServiceTypeRequest) -> ClientResult<ServiceType> {
        self.status.begin();
        let result = self.client.create_service_type(req).await;
        let service_type = self
            .status
            .finish(result, "Error al crear tipo de servicio")?;
        self.service_types.push(service_type.clone());
        Ok(service_type)
    }

    pub async fn update(
        &mut self,
        nombre: &str,
        req: &UpdateServiceTypeRequest,
    ) -> ClientResult<ServiceType> {
        self.status.begin();
        let result = self.client.update_service_type(nombre, req).await;
        let service_type = self
            .status
            .finish(result, "Error al actualizar tipo de servicio")?;
        if let Some(slot) = self.service_types.iter_mut().find(|t| t.nombre == nombre) {
            *slot = service_type.clone();
        }
        Ok(service_type)
    }

    pub async fn remove(&mut self, nombre: &str) -> ClientResult<()> {
        self.status.begin();
        let result = self.client.delete_service_type(nombre).await;
        self.status
            .finish(result, "Error al eliminar tipo de servicio")?;
        self.service_types.retain(|t| t.nombre != nombre);
        Ok(())
    }
}

// ============================================
// RENDERED SERVICES
// ============================================

pub struct ServiceStore {
    client: Arc<SalonClient>,
    pub services: Vec<RenderedService>,
    pub status: StoreStatus,
}

impl ServiceStore {
    pub fn new(client: Arc<SalonClient>) -> Self {
        Self {
            client,
            services: Vec::new(),
            status: StoreStatus::default(),
        }
    }

    /// Services strictly newest date first
    pub fn sorted(&self) -> Vec<RenderedService> {
        let mut sorted = self.services.clone();
        sort_services_by_date_desc(&mut sorted);
        sorted
    }

    /// Client-side filtering of the loaded services, newest first
    pub fn filtered(&self, filter: &ServiceFilter) -> Vec<RenderedService> {
        let mut matching: Vec<RenderedService> = self
            .services
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        sort_services_by_date_desc(&mut matching);
        matching
    }

    pub async fn load(&mut self, query: &ServiceQuery) -> ClientResult<()> {
        self.status.begin();
        let result = self.client.list_services(query).await;
        self.services = self.status.finish(result, "Error al cargar servicios")?;
        Ok(())
    }

    pub async fn register(&mut self, req: &CreateServiceRequest) -> ClientResult<RenderedService> {
        self.status.begin();
        let result = self.client.register_service(req).await;
        let service = self.status.finish(result, "Error al registrar servicio")?;
        // newest insert first, matching the server's tie order
        self.services.insert(0, service.clone());
        Ok(service)
    }

    pub async fn remove(&mut self, id: &str) -> ClientResult<()> {
        self.status.begin();
        let result = self.client.delete_service(id).await;
        self.status.finish(result, "Error al eliminar servicio")?;
        self.services.retain(|s| s.id != id);
        Ok(())
    }
}

// ============================================
// REPORTS
// ============================================

pub struct ReportStore {
    client: Arc<SalonClient>,
    pub income: Option<IncomeReport>,
    pub profit: Option<ProfitReport>,
    pub payout: Option<PayoutBreakdown>,
    pub status: StoreStatus,
}

impl ReportStore {
    pub fn new(client: Arc<SalonClient>) -> Self {
        Self {
            client,
            income: None,
            profit: None,
            payout: None,
            status: StoreStatus::default(),
        }
    }

    pub async fn load_income(&mut self, query: &ReportQuery) -> ClientResult<IncomeReport> {
        self.status.begin();
        let result = self.client.income_report(query).await;
        let report = self.status.finish(result, "Error al calcular ingresos")?;
        self.income = Some(report.clone());
        Ok(report)
    }

    pub async fn load_profit(&mut self, query: &ReportQuery) -> ClientResult<ProfitReport> {
        self.status.begin();
        let result = self.client.profit_report(query).await;
        let report = self.status.finish(result, "Error al calcular beneficios")?;
        self.profit = Some(report.clone());
        Ok(report)
    }

    pub async fn load_payout(
        &mut self,
        empleado_id: &str,
        range: DateRange,
    ) -> ClientResult<PayoutBreakdown> {
        self.status.begin();
        let result = self.client.employee_payout(empleado_id, range).await;
        let report = self
            .status
            .finish(result, "Error al calcular pago de empleado")?;
        self.payout = Some(report.clone());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::ClientError;
    use crate::client::test_support::spawn_server;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn employee(id: &str, nombre: &str) -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            id: id.to_string(),
            nombre: nombre.to_string(),
        }
    }

    #[test]
    fn test_status_finish_uses_fallback() {
        let mut status = StoreStatus::default();
        status.begin();
        assert!(status.loading);

        let result: ClientResult<()> = Err(ClientError::Unreachable);
        assert!(status.finish(result, "Error al cargar empleados").is_err());
        assert!(!status.loading);
        assert_eq!(status.error.as_deref(), Some("Error al cargar empleados"));
    }

    #[tokio::test]
    async fn test_employee_store_merges() {
        let client = Arc::new(spawn_server().await);
        let mut store = EmployeeStore::new(Arc::clone(&client));

        store.create(&employee("E002", "zoe")).await.unwrap();
        store.create(&employee("E001", "Ana")).await.unwrap();
        store.create(&employee("E003", "Bruno")).await.unwrap();

        let names: Vec<&str> = store.sorted().into_iter().map(|e| e.nombre.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "zoe"]);

        store
            .update(
                "E002",
                &UpdateEmployeeRequest {
                    nombre: "Zoe".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(store.find("E002").unwrap().nombre, "Zoe");

        store.remove("E003").await.unwrap();
        assert_eq!(store.employees.len(), 2);

        let mut fresh = EmployeeStore::new(client);
        fresh.load().await.unwrap();
        assert_eq!(fresh.employees.len(), 2);
        assert!(!fresh.status.loading);
        assert_eq!(fresh.status.error, None);
    }

    #[tokio::test]
    async fn test_duplicate_sets_error() {
        let client = Arc::new(spawn_server().await);
        let mut store = EmployeeStore::new(client);

        store.create(&employee("E001", "Ana")).await.unwrap();
        let err = store.create(&employee("E001", "Otra")).await.unwrap_err();

        assert_eq!(err.status(), Some(409));
        assert!(store.status.error.as_deref().unwrap().contains("ya existe"));
        assert!(!store.status.loading);
        assert_eq!(store.employees.len(), 1);

        // the next action clears the previous error
        store.load().await.unwrap();
        assert_eq!(store.status.error, None);
    }

    #[tokio::test]
    async fn test_service_store_sort_and_filter() {
        let client = Arc::new(spawn_server().await);
        let mut employees = EmployeeStore::new(Arc::clone(&client));
        let mut types = ServiceTypeStore::new(Arc::clone(&client));
        let mut services = ServiceStore::new(client);

        employees.create(&employee("E001", "Ana")).await.unwrap();
        employees.create(&employee("E002", "Luis")).await.unwrap();
        types
            .create(&CreateServiceTypeRequest {
                nombre: "Corte".to_string(),
                descripcion: "Corte de pelo".to_string(),
                porcentaje_comision: Decimal::from(40),
                precio_por_defecto: None,
            })
            .await
            .unwrap();

        for (day, empleado) in [(10, "E001"), (20, "E002"), (15, "E001")] {
            services
                .register(&CreateServiceRequest {
                    fecha: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    empleado_id: empleado.to_string(),
                    tipo_servicio: "Corte".to_string(),
                    precio: Decimal::from(20),
                })
                .await
                .unwrap();
        }

        let days: Vec<String> = services.sorted().iter().map(|s| s.fecha.to_string()).collect();
        assert_eq!(days, vec!["2024-01-20", "2024-01-15", "2024-01-10"]);

        let only_ana = services.filtered(&ServiceFilter::new().employee("E001"));
        assert_eq!(only_ana.len(), 2);
        assert_eq!(only_ana[0].fecha.to_string(), "2024-01-15");

        let id = only_ana[1].id.clone();
        services.remove(&id).await.unwrap();
        assert_eq!(services.services.len(), 2);

        services.load(&ServiceQuery::default()).await.unwrap();
        assert_eq!(services.services.len(), 2);
    }

    #[tokio::test]
    async fn test_service_store_same_date_order_matches_server() {
        let client = Arc::new(spawn_server().await);
        let mut employees = EmployeeStore::new(Arc::clone(&client));
        let mut types = ServiceTypeStore::new(Arc::clone(&client));
        let mut services = ServiceStore::new(client);

        employees.create(&employee("E001", "Ana")).await.unwrap();
        types
            .create(&CreateServiceTypeRequest {
                nombre: "Corte".to_string(),
                descripcion: "Corte de pelo".to_string(),
                porcentaje_comision: Decimal::from(40),
                precio_por_defecto: None,
            })
            .await
            .unwrap();

        for (day, precio) in [(15, 20), (10, 30), (15, 40), (15, 50)] {
            services
                .register(&CreateServiceRequest {
                    fecha: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    empleado_id: "E001".to_string(),
                    tipo_servicio: "Corte".to_string(),
                    precio: Decimal::from(precio),
                })
                .await
                .unwrap();
        }

        let ids = |store: &ServiceStore| -> Vec<String> {
            store.sorted().into_iter().map(|s| s.id).collect()
        };
        let local = ids(&services);

        services.load(&ServiceQuery::default()).await.unwrap();
        assert_eq!(local, ids(&services));

        let prices: Vec<String> = services.sorted().iter().map(|s| s.precio.to_string()).collect();
        assert_eq!(prices, vec!["50.00", "40.00", "20.00", "30.00"]);
    }

    #[tokio::test]
    async fn test_report_store_payout_error() {
        let client = Arc::new(spawn_server().await);
        let mut reports = ReportStore::new(client);

        let err = reports.load_payout("E404", DateRange::all()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            reports.status.error.as_deref(),
            Some("Empleado con identificador 'E404' no encontrado")
        );
        assert!(reports.payout.is_none());
    }
}
