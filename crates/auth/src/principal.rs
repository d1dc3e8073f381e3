use serde::{Deserialize, Serialize};

use depot_core::WarehouseId;

use crate::Role;

/// Authenticated caller, as resolved by the API-key lookup upstream.
///
/// `warehouse_id` records the warehouse a caller is scoped to. The ledger does not
/// filter by it; the request layer decides how to apply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub warehouse_id: Option<WarehouseId>,
}

impl Principal {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            warehouse_id: None,
        }
    }

    pub fn scoped_to(mut self, warehouse_id: WarehouseId) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }
}
