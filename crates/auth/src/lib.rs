//! `depot-auth`: request-gating boundary for the ledger's callers.
//!
//! This crate is decoupled from HTTP and storage: it answers allow/deny for a
//! `(principal, resource, method)` triple from an in-memory permission matrix.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AccessPolicy, AuthzError, PermissionMatrix, RolePermission, authorize};
pub use permissions::{Capability, PermissionGrant};
pub use principal::Principal;
pub use roles::Role;
