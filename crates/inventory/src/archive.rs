use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{Entity, InventoryId, ItemId};

use crate::record::{InventoryRecord, LocationAmount};

/// Immutable point-in-time copy of an inventory record taken just before deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedInventoryRecord {
    pub id: InventoryId,
    pub item_id: ItemId,
    pub description: String,
    pub item_reference: String,
    pub locations: Vec<LocationAmount>,
    pub total_on_hand: i64,
    pub total_expected: i64,
    pub total_ordered: i64,
    pub total_allocated: i64,
    pub total_available: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
}

impl ArchivedInventoryRecord {
    pub fn snapshot(record: &InventoryRecord, archived_at: DateTime<Utc>) -> Self {
        Self {
            id: record.id(),
            item_id: record.item_id().clone(),
            description: record.description().to_string(),
            item_reference: record.item_reference().to_string(),
            locations: record.locations().to_vec(),
            total_on_hand: record.total_on_hand(),
            total_expected: record.total_expected(),
            total_ordered: record.total_ordered(),
            total_allocated: record.total_allocated(),
            total_available: record.total_available(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
            archived_at,
        }
    }
}
