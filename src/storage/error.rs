//! Storage error types
//!
//! Defines all errors that can occur in the persistence layer.

use thiserror::Error;

/// Errors that can occur in the repository
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite statement failed
    #[error("Database error in {context}: {source}")]
    Sqlite {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Stored value could not be decoded (bad decimal, bad date)
    #[error("Corrupt data: {0}")]
    Corruption(String),
}

impl StorageError {
    /// Wrap a rusqlite error with the name of the failing operation
    pub fn sqlite(context: &'static str, source: rusqlite::Error) -> Self {
        StorageError::Sqlite { context, source }
    }

    /// Name of the failing operation, when known
    pub fn context(&self) -> Option<&str> {
        match self {
            StorageError::Sqlite { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
