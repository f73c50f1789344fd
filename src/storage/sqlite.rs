//! SQLite repository
//!
//! Stores employees, service types and rendered services in a single SQLite
//! database. Money is stored as decimal TEXT so no precision is lost, dates
//! as ISO `YYYY-MM-DD` TEXT so they order lexicographically.

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::Mutex;

use crate::domain::{Employee, RenderedService, ServiceFilter, ServiceType};
use crate::storage::{Repository, StorageError, StorageResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS empleados (
        id TEXT PRIMARY KEY,
        nombre TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS tipos_servicios (
        nombre TEXT PRIMARY KEY,
        descripcion TEXT NOT NULL,
        porcentaje_comision TEXT NOT NULL,
        precio_por_defecto TEXT
    );
    CREATE TABLE IF NOT EXISTS servicios (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        fecha TEXT NOT NULL,
        empleado_id TEXT NOT NULL,
        tipo_servicio TEXT NOT NULL,
        precio TEXT NOT NULL,
        comision_calculada TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_servicios_fecha ON servicios(fecha);
    CREATE INDEX IF NOT EXISTS idx_servicios_empleado ON servicios(empleado_id);
";

/// SQLite-backed repository
pub struct SqliteRepository {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteRepository {
    /// Create or open a database file
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StorageError::sqlite("open", e))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )
        .map_err(|e| StorageError::sqlite("configure", e))?;

        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Create a throwaway in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::sqlite("open", e))?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StorageError::sqlite("create_schema", e))?;

        tracing::debug!(path = ?path, "Opened salon database");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Path of the database file (None for in-memory databases)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn parse_decimal(value: &str, column: &str) -> StorageResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::Corruption(format!("{} '{}': {}", column, value, e)))
}

/// Raw service row before decimal decoding
struct ServiceRow {
    id: String,
    fecha: NaiveDate,
    empleado_id: String,
    tipo_servicio: String,
    precio: String,
    comision: String,
}

impl ServiceRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            fecha: row.get(1)?,
            empleado_id: row.get(2)?,
            tipo_servicio: row.get(3)?,
            precio: row.get(4)?,
            comision: row.get(5)?,
        })
    }

    fn decode(self) -> StorageResult<RenderedService> {
        Ok(RenderedService {
            precio: parse_decimal(&self.precio, "precio")?,
            comision_calculada: parse_decimal(&self.comision, "comision_calculada")?,
            id: self.id,
            fecha: self.fecha,
            empleado_id: self.empleado_id,
            tipo_servicio: self.tipo_servicio,
        })
    }
}

/// Raw service type row before decimal decoding
struct ServiceTypeRow {
    nombre: String,
    descripcion: String,
    porcentaje: String,
    precio_por_defecto: Option<String>,
}

impl ServiceTypeRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            nombre: row.get(0)?,
            descripcion: row.get(1)?,
            porcentaje: row.get(2)?,
            precio_por_defecto: row.get(3)?,
        })
    }

    fn decode(self) -> StorageResult<ServiceType> {
        let precio_por_defecto = self
            .precio_por_defecto
            .as_deref()
            .map(|p| parse_decimal(p, "precio_por_defecto"))
            .transpose()?;

        Ok(ServiceType {
            porcentaje_comision: parse_decimal(&self.porcentaje, "porcentaje_comision")?,
            nombre: self.nombre,
            descripcion: self.descripcion,
            precio_por_defecto,
        })
    }
}

const SERVICE_COLUMNS: &str = "id, fecha, empleado_id, tipo_servicio, precio, comision_calculada";

#[async_trait]
impl Repository for SqliteRepository {
    async fn save_employee(&self, employee: &Employee) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO empleados (id, nombre) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET nombre = excluded.nombre",
            params![employee.id, employee.nombre],
        )
        .map_err(|e| StorageError::sqlite("save_employee", e))?;
        Ok(())
    }

    async fn get_employee(&self, id: &str) -> StorageResult<Option<Employee>> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT id, nombre FROM empleados WHERE id = ?1",
            params![id],
            |row| Ok(Employee::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()
        .map_err(|e| StorageError::sqlite("get_employee", e))
    }

    async fn list_employees(&self) -> StorageResult<Vec<Employee>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached("SELECT id, nombre FROM empleados ORDER BY rowid")
            .map_err(|e| StorageError::sqlite("list_employees", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Employee::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| StorageError::sqlite("list_employees", e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::sqlite("list_employees", e))
    }

    async fn delete_employee(&self, id: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute("DELETE FROM empleados WHERE id = ?1", params![id])
            .map_err(|e| StorageError::sqlite("delete_employee", e))?;
        Ok(removed > 0)
    }

    async fn save_service_type(&self, service_type: &ServiceType) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tipos_servicios (nombre, descripcion, porcentaje_comision, precio_por_defecto)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(nombre) DO UPDATE SET
                descripcion = excluded.descripcion,
                porcentaje_comision = excluded.porcentaje_comision,
                precio_por_defecto = excluded.precio_por_defecto",
            params![
                service_type.nombre,
                service_type.descripcion,
                service_type.porcentaje_comision.to_string(),
                service_type.precio_por_defecto.map(|p| p.to_string()),
            ],
        )
        .map_err(|e| StorageError::sqlite("save_service_type", e))?;
        Ok(())
    }

    async fn get_service_type(&self, nombre: &str) -> StorageResult<Option<ServiceType>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT nombre, descripcion, porcentaje_comision, precio_por_defecto
                 FROM tipos_servicios WHERE nombre = ?1",
                params![nombre],
                ServiceTypeRow::from_row,
            )
            .optional()
            .map_err(|e| StorageError::sqlite("get_service_type", e))?;

        row.map(ServiceTypeRow::decode).transpose()
    }

    async fn list_service_types(&self) -> StorageResult<Vec<ServiceType>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare_cached(
                "SELECT nombre, descripcion, porcentaje_comision, precio_por_defecto
                 FROM tipos_servicios ORDER BY rowid",
            )
            .map_err(|e| StorageError::sqlite("list_service_types", e))?;

        let rows = stmt
            .query_map([], ServiceTypeRow::from_row)
            .map_err(|e| StorageError::sqlite("list_service_types", e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::sqlite("list_service_types", e))?;

        rows.into_iter().map(ServiceTypeRow::decode).collect()
    }

    async fn delete_service_type(&self, nombre: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute("DELETE FROM tipos_servicios WHERE nombre = ?1", params![nombre])
            .map_err(|e| StorageError::sqlite("delete_service_type", e))?;
        Ok(removed > 0)
    }

    async fn save_service(&self, service: &RenderedService) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO servicios (id, fecha, empleado_id, tipo_servicio, precio, comision_calculada)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                fecha = excluded.fecha,
                empleado_id = excluded.empleado_id,
                tipo_servicio = excluded.tipo_servicio,
                precio = excluded.precio,
                comision_calculada = excluded.comision_calculada",
            params![
                service.id,
                service.fecha,
                service.empleado_id,
                service.tipo_servicio,
                service.precio.to_string(),
                service.comision_calculada.to_string(),
            ],
        )
        .map_err(|e| StorageError::sqlite("save_service", e))?;
        Ok(())
    }

    async fn get_service(&self, id: &str) -> StorageResult<Option<RenderedService>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM servicios WHERE id = ?1", SERVICE_COLUMNS),
                params![id],
                ServiceRow::from_row,
            )
            .optional()
            .map_err(|e| StorageError::sqlite("get_service", e))?;

        row.map(ServiceRow::decode).transpose()
    }

    async fn list_services(&self, filter: &ServiceFilter) -> StorageResult<Vec<RenderedService>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM servicios
             WHERE (?1 IS NULL OR empleado_id = ?1)
               AND (?2 IS NULL OR fecha >= ?2)
               AND (?3 IS NULL OR fecha <= ?3)
             ORDER BY fecha DESC, seq DESC",
            SERVICE_COLUMNS
        );
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| StorageError::sqlite("list_services", e))?;

        let rows = stmt
            .query_map(
                params![filter.empleado_id, filter.range.start, filter.range.end],
                ServiceRow::from_row,
            )
            .map_err(|e| StorageError::sqlite("list_services", e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::sqlite("list_services", e))?;

        rows.into_iter().map(ServiceRow::decode).collect()
    }

    async fn delete_service(&self, id: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute("DELETE FROM servicios WHERE id = ?1", params![id])
            .map_err(|e| StorageError::sqlite("delete_service", e))?;
        Ok(removed > 0)
    }

    async fn has_services_for_employee(&self, empleado_id: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM servicios WHERE empleado_id = ?1)",
            params![empleado_id],
            |row| row.get::<_, bool>(0),
        )
        .map_err(|e| StorageError::sqlite("has_services_for_employee", e))
    }

    async fn has_services_for_type(&self, tipo_servicio: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM servicios WHERE tipo_servicio = ?1)",
            params![tipo_servicio],
            |row| row.get::<_, bool>(0),
        )
        .map_err(|e| StorageError::sqlite("has_services_for_type", e))
    }

    async fn ping(&self) -> StorageResult<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| StorageError::sqlite("ping", e))
    }
}
