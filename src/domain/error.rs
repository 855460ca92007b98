//! Domain errors

use thiserror::Error;

use super::schedule::ScheduleConflict;

/// Domain-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    /// The requested slots collide with existing bookings. Carries the
    /// complete list so callers can report every problem at once.
    #[error("{} schedule conflict(s) detected", .0.len())]
    ScheduleConflict(Vec<ScheduleConflict>),

    #[error("Invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
