use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Capability a request needs on a resource, derived from its HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    View,
    Create,
    Update,
    Delete,
}

impl Capability {
    /// GET->view, POST->create, PUT->update, DELETE->delete. Anything else has no
    /// capability and is denied.
    pub fn from_method(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(Capability::View),
            "POST" => Some(Capability::Create),
            "PUT" => Some(Capability::Update),
            "DELETE" => Some(Capability::Delete),
            _ => None,
        }
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::from_method(s).ok_or_else(|| format!("unsupported method '{s}'"))
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Capability::View => "view",
            Capability::Create => "create",
            Capability::Update => "update",
            Capability::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// Four independent capability flags granted to one role on one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_update: bool,
    #[serde(default)]
    pub can_delete: bool,
}

impl PermissionGrant {
    pub fn read_only() -> Self {
        Self {
            can_view: true,
            ..Self::default()
        }
    }

    pub fn full() -> Self {
        Self {
            can_view: true,
            can_create: true,
            can_update: true,
            can_delete: true,
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Create => self.can_create,
            Capability::Update => self.can_update,
            Capability::Delete => self.can_delete,
        }
    }
}
