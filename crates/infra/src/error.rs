//! Error model shared by every ledger service.

use thiserror::Error;

use depot_core::{DomainError, ItemId, LocationId};

/// Result type returned by every ledger/engine operation.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Storage-layer fault. Always fatal to the current operation, never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage lock poisoned: {0}")]
    Poisoned(&'static str),

    #[error("row {id} missing from staged write on '{table}'")]
    MissingRow { table: &'static str, id: i64 },
}

/// Uniform error kind for ledger operations.
///
/// Lookups, mutations and deletes all report a missing id the same way
/// (`NotFound`), rather than mixing boolean outcomes with errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Requested id absent. The message is what callers display.
    #[error("{0}")]
    NotFound(String),

    /// Lifecycle violation (commit on a non-pending transfer, edit of a completed one).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Missing or malformed payload.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transfer changed between being read and being committed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Withdrawal exceeds stock while the overdraw policy is `reject`.
    #[error(
        "insufficient stock of '{item_id}' at location {location_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        item_id: ItemId,
        location_id: LocationId,
        requested: i64,
        available: i64,
    },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LedgerError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(msg) => LedgerError::NotFound(msg),
            DomainError::InvalidState(msg) => LedgerError::InvalidState(msg),
            DomainError::InvalidArgument(msg) => LedgerError::InvalidArgument(msg),
            DomainError::Conflict(msg) => LedgerError::Conflict(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_kind() {
        let err: LedgerError = DomainError::invalid_state("transfer not pending").into();
        assert_eq!(err, LedgerError::InvalidState("transfer not pending".to_string()));

        let err: LedgerError = DomainError::conflict("stale").into();
        assert!(matches!(err, LedgerError::Conflict(_)));
    }

    #[test]
    fn storage_faults_are_transparent() {
        let err: LedgerError = StoreError::Poisoned("inventory").into();
        assert_eq!(err.to_string(), "storage lock poisoned: inventory");
    }

    #[test]
    fn insufficient_stock_names_the_shortfall() {
        let err = LedgerError::InsufficientStock {
            item_id: ItemId::from("P000001"),
            location_id: LocationId::new(1),
            requested: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock of 'P000001' at location 1: requested 5, available 3"
        );
    }
}
