//! Domain errors for the crossover screener.

use thiserror::Error;

/// Domain-level errors raised while constructing value objects.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Invalid value for a field.
    #[error("Invalid {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl DomainError {
    /// Shorthand for an invalid ticker symbol.
    pub fn invalid_ticker(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: "ticker".to_string(),
            message: message.into(),
        }
    }
}
