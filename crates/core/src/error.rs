//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (missing records,
/// lifecycle violations, bad input). Storage faults belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested record was not found. The message is surfaced to callers verbatim.
    #[error("{0}")]
    NotFound(String),

    /// An operation is not allowed in the record's current lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Input was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An optimistic concurrency expectation did not hold.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
