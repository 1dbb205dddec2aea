//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Raised when a record, or data supplied from outside, violates a field's type
/// or domain constraint. Storage failures are not represented here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, missing identifier).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The human-readable reason, without the `validation failed:` prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) => msg,
        }
    }
}
