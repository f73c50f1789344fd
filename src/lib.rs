//! # Salon
//!
//! Hair salon management: employees, service types, rendered services and
//! the financial reports built from them.
//!
//! ## Features
//!
//! - **REST service**: Axum API backed by SQLite
//! - **Exact money**: `rust_decimal` amounts, commissions rounded half-to-even
//! - **Reports**: Income, profit and per-employee commission payouts
//! - **Client**: Typed REST client with stores, form validation and report views
//!
//! ## Modules
//!
//! - [`domain`]: Shared types, validation and money arithmetic
//! - [`storage`]: Repository trait and SQLite implementation
//! - [`manager`]: Business rules
//! - [`api`]: REST API server with Axum
//! - [`client`]: REST client and front-end state
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_decimal::Decimal;
//! use salon::domain::DateRange;
//! use salon::manager::{NewService, SalonManager};
//! use salon::storage::SqliteRepository;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = Arc::new(SqliteRepository::open_in_memory()?);
//!     let manager = SalonManager::new(repository);
//!
//!     manager.create_employee("E001", "Ana").await?;
//!     manager
//!         .create_service_type("Corte", "Corte de pelo", Decimal::from(40), None)
//!         .await?;
//!
//!     manager
//!         .register_service(NewService {
//!             fecha: chrono::Local::now().date_naive(),
//!             empleado_id: "E001".to_string(),
//!             tipo_servicio: "Corte".to_string(),
//!             precio: Decimal::from(25),
//!         })
//!         .await?;
//!
//!     let report = manager.profit(DateRange::all(), None).await?;
//!     println!("Beneficio: {}", report.beneficios);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod manager;
pub mod storage;

// Re-export top-level types for convenience
pub use domain::{
    DateRange, DomainError, DomainResult, Employee, IncomeReport, PayoutBreakdown, ProfitReport,
    RenderedService, ServiceDetail, ServiceFilter, ServiceType,
};

pub use storage::{Repository, SqliteRepository, StorageError, StorageResult};

pub use manager::{NewService, SalonManager, ServiceTypePatch};

pub use api::{build_router, serve, ApiError, AppState};

pub use client::{ClientError, SalonClient};

pub use config::{
    ApiConfig, ClientConfig, Config, ConfigError, ConfigSource, DatabaseConfig, LoggingConfig,
};
