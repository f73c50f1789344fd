//! Salon storage
//!
//! - **repository**: The `Repository` trait the manager depends on
//! - **sqlite**: SQLite implementation (file or in-memory)
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use salon::domain::Employee;
//! use salon::storage::{Repository, SqliteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = SqliteRepository::open(std::path::Path::new("salon.db"))?;
//!     repo.save_employee(&Employee::new("E001", "Juan Pérez")).await?;
//!     println!("{} employees", repo.list_employees().await?.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod repository;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use repository::Repository;
pub use sqlite::SqliteRepository;
