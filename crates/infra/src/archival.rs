//! Insert-only archive of deleted rows.

use chrono::Utc;

use depot_core::{InventoryId, TransferId};
use depot_inventory::{ArchivedInventoryRecord, InventoryRecord};
use depot_transfers::{ArchivedTransferOrder, TransferOrder};

use crate::error::LedgerResult;
use crate::store::AppendLog;

/// Snapshots taken just before a row is deleted.
///
/// Snapshots are never modified or removed. Deleting, recreating and deleting again
/// yields one snapshot per deletion.
#[derive(Debug)]
pub struct ArchivalLog {
    inventory: AppendLog<ArchivedInventoryRecord>,
    transfers: AppendLog<ArchivedTransferOrder>,
}

impl ArchivalLog {
    pub fn new() -> Self {
        Self {
            inventory: AppendLog::new("archived_inventory"),
            transfers: AppendLog::new("archived_transfers"),
        }
    }

    pub fn archive_inventory(
        &self,
        record: &InventoryRecord,
    ) -> LedgerResult<ArchivedInventoryRecord> {
        let snapshot = ArchivedInventoryRecord::snapshot(record, Utc::now());
        self.inventory.append(snapshot.clone())?;
        Ok(snapshot)
    }

    pub fn archive_transfer(&self, order: &TransferOrder) -> LedgerResult<ArchivedTransferOrder> {
        let snapshot = ArchivedTransferOrder::snapshot(order, Utc::now());
        self.transfers.append(snapshot.clone())?;
        Ok(snapshot)
    }

    pub fn archived_inventory(&self) -> LedgerResult<Vec<ArchivedInventoryRecord>> {
        Ok(self.inventory.all()?)
    }

    pub fn archived_transfers(&self) -> LedgerResult<Vec<ArchivedTransferOrder>> {
        Ok(self.transfers.all()?)
    }

    /// Every snapshot taken of one inventory id, oldest first.
    pub fn inventory_snapshots(
        &self,
        id: InventoryId,
    ) -> LedgerResult<Vec<ArchivedInventoryRecord>> {
        Ok(self.inventory.filter(|s| s.id == id)?)
    }

    /// Every snapshot taken of one transfer id, oldest first.
    pub fn transfer_snapshots(&self, id: TransferId) -> LedgerResult<Vec<ArchivedTransferOrder>> {
        Ok(self.transfers.filter(|s| s.id == id)?)
    }
}

impl Default for ArchivalLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::{Entity, ItemId, LocationId};
    use depot_inventory::{InventoryDraft, LocationAmount};

    fn record(id: i64, amount: i64) -> InventoryRecord {
        let mut record = InventoryRecord::from_draft(
            InventoryDraft {
                item_id: ItemId::from("P000001"),
                locations: vec![LocationAmount::new(LocationId::new(1), amount)],
                total_on_hand: amount,
                ..InventoryDraft::default()
            },
            Utc::now(),
        );
        record.assign_id(InventoryId::new(id));
        record
    }

    #[test]
    fn every_deletion_gets_its_own_snapshot() {
        let log = ArchivalLog::new();
        log.archive_inventory(&record(3, 10)).unwrap();
        log.archive_inventory(&record(4, 1)).unwrap();
        log.archive_inventory(&record(3, 7)).unwrap();

        let snaps = log.inventory_snapshots(InventoryId::new(3)).unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].total_on_hand, 10);
        assert_eq!(snaps[1].total_on_hand, 7);
        assert_eq!(log.archived_inventory().unwrap().len(), 3);
        assert!(log.archived_transfers().unwrap().is_empty());
    }
}
