//! Domain error types
//!
//! Errors produced by validation and business rules. The API layer maps
//! each variant to an HTTP status.

use thiserror::Error;

/// Errors that can occur while applying business rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input failed validation
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Referenced entity does not exist
    #[error("{entity} con identificador '{identifier}' no encontrado")]
    NotFound { entity: String, identifier: String },

    /// Natural key already taken
    #[error("{entity} con identificador '{identifier}' ya existe")]
    Duplicate { entity: String, identifier: String },

    /// Operation would leave dependent records dangling
    #[error("{0}")]
    Conflict(String),

    /// Storage failure
    #[error("Error de persistencia: {message}")]
    Persistence {
        message: String,
        context: Option<String>,
    },
}

impl DomainError {
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn not_found(entity: &str, identifier: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity: entity.to_string(),
            identifier: identifier.into(),
        }
    }

    pub fn duplicate(entity: &str, identifier: impl Into<String>) -> Self {
        DomainError::Duplicate {
            entity: entity.to_string(),
            identifier: identifier.into(),
        }
    }
}

impl From<crate::storage::StorageError> for DomainError {
    fn from(err: crate::storage::StorageError) -> Self {
        DomainError::Persistence {
            message: err.to_string(),
            context: err.context().map(str::to_string),
        }
    }
}

/// Entity names used in error messages
pub mod entity {
    pub const EMPLOYEE: &str = "Empleado";
    pub const SERVICE_TYPE: &str = "TipoServicio";
    pub const SERVICE: &str = "Servicio";
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::duplicate(entity::EMPLOYEE, "E001");
        assert_eq!(err.to_string(), "Empleado con identificador 'E001' ya existe");

        let err = DomainError::not_found(entity::SERVICE_TYPE, "Corte");
        assert_eq!(
            err.to_string(),
            "TipoServicio con identificador 'Corte' no encontrado"
        );

        let err = DomainError::validation("El precio debe ser mayor que cero", "precio");
        assert_eq!(err.to_string(), "El precio debe ser mayor que cero");
    }
}
