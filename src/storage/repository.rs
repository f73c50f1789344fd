//! Repository trait
//!
//! Persistence seam for the salon manager. `save_*` methods upsert by
//! natural key; `delete_*` methods report whether a row was removed.

use async_trait::async_trait;

use crate::domain::{Employee, RenderedService, ServiceFilter, ServiceType};
use crate::storage::StorageResult;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn save_employee(&self, employee: &Employee) -> StorageResult<()>;
    async fn get_employee(&self, id: &str) -> StorageResult<Option<Employee>>;
    async fn list_employees(&self) -> StorageResult<Vec<Employee>>;
    async fn delete_employee(&self, id: &str) -> StorageResult<bool>;

    async fn save_service_type(&self, service_type: &ServiceType) -> StorageResult<()>;
    async fn get_service_type(&self, nombre: &str) -> StorageResult<Option<ServiceType>>;
    async fn list_service_types(&self) -> StorageResult<Vec<ServiceType>>;
    async fn delete_service_type(&self, nombre: &str) -> StorageResult<bool>;

    async fn save_service(&self, service: &RenderedService) -> StorageResult<()>;
    async fn get_service(&self, id: &str) -> StorageResult<Option<RenderedService>>;

    /// Services matching the filter, newest date first; ties newest insert first
    async fn list_services(&self, filter: &ServiceFilter) -> StorageResult<Vec<RenderedService>>;
    async fn delete_service(&self, id: &str) -> StorageResult<bool>;

    async fn has_services_for_employee(&self, empleado_id: &str) -> StorageResult<bool>;
    async fn has_services_for_type(&self, tipo_servicio: &str) -> StorageResult<bool>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> StorageResult<()>;
}
