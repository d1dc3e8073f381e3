use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{Entity, LocationId, TransferId};

use crate::order::{PlaceRef, TransferLine, TransferOrder, TransferStatus};

/// Immutable point-in-time copy of a transfer order taken just before deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedTransferOrder {
    pub id: TransferId,
    pub reference: String,
    pub transfer_from: Option<PlaceRef>,
    pub transfer_to: LocationId,
    pub transfer_status: TransferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<TransferLine>,
    pub archived_at: DateTime<Utc>,
}

impl ArchivedTransferOrder {
    pub fn snapshot(order: &TransferOrder, archived_at: DateTime<Utc>) -> Self {
        Self {
            id: order.id(),
            reference: order.reference().to_string(),
            transfer_from: order.transfer_from(),
            transfer_to: order.transfer_to(),
            transfer_status: order.status(),
            created_at: order.created_at(),
            updated_at: order.updated_at(),
            items: order.items().to_vec(),
            archived_at,
        }
    }
}
