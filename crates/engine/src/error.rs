//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`CapacityExceeded`] thrown when an assignment would put more batteries
//!   in a device than it holds.
//! - [`KeyNotFound`] thrown when an item is not found (or belongs to another
//!   owner).
//!
//!  [`CapacityExceeded`]: EngineError::CapacityExceeded
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

use crate::allocation::CapacityExceeded;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    CapacityExceeded(#[from] CapacityExceeded),
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Password hashing failed: {0}")]
    Password(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Input field the error refers to, when it is a field-level failure.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::CapacityExceeded(_) => Some("quantity"),
            Self::InvalidCapacity(_) => Some("capacity"),
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::CapacityExceeded(a), Self::CapacityExceeded(b)) => a == b,
            (Self::InvalidCapacity(a), Self::InvalidCapacity(b)) => a == b,
            (
                Self::InvalidInput {
                    field: fa,
                    reason: ra,
                },
                Self::InvalidInput {
                    field: fb,
                    reason: rb,
                },
            ) => fa == fb && ra == rb,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Password(a), Self::Password(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_error_keeps_validator_message() {
        let err = EngineError::from(CapacityExceeded { remaining: 2 });
        assert_eq!(
            err.to_string(),
            "No more than 2 batteries can be assigned to this device."
        );
        assert_eq!(err.field(), Some("quantity"));
    }

    #[test]
    fn lookup_errors_have_no_field() {
        assert_eq!(EngineError::KeyNotFound("device".to_string()).field(), None);
    }
}
