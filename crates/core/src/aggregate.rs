//! Aggregate root trait and optimistic concurrency expectations.

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};

/// Entity whose mutations are tracked by a revision counter.
///
/// Every persisted change bumps the version by one, so a reader can detect that the row
/// it based a decision on has since been modified.
pub trait AggregateRoot: Entity {
    /// Monotonically increasing revision of the aggregate's state.
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation: the revision a writer based its decision on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpectedVersion(u64);

impl ExpectedVersion {
    pub const fn exact(version: u64) -> Self {
        Self(version)
    }

    pub fn matches(self, actual: u64) -> bool {
        self.0 == actual
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {}, actual: {actual})",
                self.0
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_version_matches_only_itself() {
        assert!(ExpectedVersion::exact(3).matches(3));
        assert!(!ExpectedVersion::exact(3).matches(4));
    }

    #[test]
    fn mismatch_is_a_conflict() {
        assert!(ExpectedVersion::exact(3).check(3).is_ok());
        let err = ExpectedVersion::exact(3).check(4).unwrap_err();
        assert_eq!(
            err,
            DomainError::conflict("optimistic concurrency check failed (expected: 3, actual: 4)")
        );
    }
}
