use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Capability, PermissionGrant, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unsupported method '{0}'")]
    UnsupportedMethod(String),

    #[error("forbidden: role '{role}' cannot {capability} '{resource}'")]
    Forbidden {
        role: String,
        resource: String,
        capability: Capability,
    },
}

/// Request-gating policy consulted before the ledger is invoked.
pub trait AccessPolicy: Send + Sync {
    /// Answer allow/deny for `(resource, method)`. Unknown combinations deny.
    fn has_access(&self, principal: &Principal, resource: &str, method: &str) -> bool;
}

/// One row of the role/resource permission table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub role: Role,
    pub resource: String,
    #[serde(flatten)]
    pub grant: PermissionGrant,
}

/// Permission matrix keyed by `(role, resource)`.
///
/// Resource names are matched case-insensitively (stored lowercase).
#[derive(Debug, Clone, Default)]
pub struct PermissionMatrix {
    grants: HashMap<(Role, String), PermissionGrant>,
}

impl PermissionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grant(mut self, role: Role, resource: &str, grant: PermissionGrant) -> Self {
        self.insert(role, resource, grant);
        self
    }

    pub fn insert(&mut self, role: Role, resource: &str, grant: PermissionGrant) {
        self.grants.insert((role, resource.to_lowercase()), grant);
    }

    pub fn grant_for(&self, role: &Role, resource: &str) -> Option<PermissionGrant> {
        self.grants
            .get(&(role.clone(), resource.to_lowercase()))
            .copied()
    }
}

impl FromIterator<RolePermission> for PermissionMatrix {
    fn from_iter<T: IntoIterator<Item = RolePermission>>(iter: T) -> Self {
        let mut matrix = PermissionMatrix::new();
        for row in iter {
            matrix.insert(row.role, &row.resource, row.grant);
        }
        matrix
    }
}

impl AccessPolicy for PermissionMatrix {
    fn has_access(&self, principal: &Principal, resource: &str, method: &str) -> bool {
        authorize(self, principal, resource, method).is_ok()
    }
}

/// Authorize a principal for `(resource, method)`.
///
/// - No IO
/// - Admin short-circuits to allow
/// - Otherwise the matrix row must exist and grant the method's capability
pub fn authorize(
    matrix: &PermissionMatrix,
    principal: &Principal,
    resource: &str,
    method: &str,
) -> Result<(), AuthzError> {
    if principal.role.is_admin() {
        return Ok(());
    }

    let capability = Capability::from_method(method)
        .ok_or_else(|| AuthzError::UnsupportedMethod(method.to_string()))?;

    let allowed = matrix
        .grant_for(&principal.role, resource)
        .is_some_and(|grant| grant.allows(capability));

    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            principal = %principal.name,
            role = %principal.role,
            resource,
            %capability,
            "access denied"
        );
        Err(AuthzError::Forbidden {
            role: principal.role.as_str().to_string(),
            resource: resource.to_lowercase(),
            capability,
        })
    }
}
