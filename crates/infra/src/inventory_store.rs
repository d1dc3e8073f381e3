//! Inventory ledger: CRUD, lookups and on-hand adjustment.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use depot_core::{Entity, InventoryId, ItemId, LocationId};
use depot_inventory::{AdjustOnHand, ArchivedInventoryRecord, InventoryDraft, InventoryRecord};

use crate::archival::ArchivalLog;
use crate::config::{LedgerConfig, OverdrawPolicy};
use crate::error::{LedgerError, LedgerResult};
use crate::store::{Staged, Table};

fn inventory_not_found(id: InventoryId) -> LedgerError {
    LedgerError::not_found(format!("Inventory {id} not found"))
}

/// Stock records keyed by inventory id.
///
/// Every on-hand mutation goes through the table's write lock, so concurrent
/// adjustments of the same item and location never lose updates.
#[derive(Debug)]
pub struct InventoryStore {
    records: Table<InventoryRecord>,
    archive: Arc<ArchivalLog>,
    config: LedgerConfig,
}

impl InventoryStore {
    pub fn new(archive: Arc<ArchivalLog>, config: LedgerConfig) -> Self {
        Self {
            records: Table::new("inventory"),
            archive,
            config,
        }
    }

    /// All records in insertion order.
    pub fn all(&self) -> LedgerResult<Vec<InventoryRecord>> {
        Ok(self.records.all()?)
    }

    pub fn get(&self, id: InventoryId) -> LedgerResult<InventoryRecord> {
        self.records.get(id)?.ok_or_else(|| inventory_not_found(id))
    }

    pub fn add(&self, draft: InventoryDraft) -> LedgerResult<InventoryRecord> {
        let record = self
            .records
            .insert(InventoryRecord::from_draft(draft, Utc::now()))?;
        tracing::info!(
            inventory_id = %record.id(),
            item_id = %record.item_id(),
            "inventory record added"
        );
        Ok(record)
    }

    /// Full-field replace. `id` and `created_at` are kept.
    pub fn update(&self, id: InventoryId, draft: InventoryDraft) -> LedgerResult<InventoryRecord> {
        let updated = self
            .records
            .update(id, |record| {
                record.replace(draft, Utc::now());
                Ok::<_, LedgerError>(record.clone())
            })?
            .ok_or_else(|| inventory_not_found(id))?;
        tracing::debug!(inventory_id = %id, "inventory record replaced");
        Ok(updated)
    }

    /// Archive a snapshot, then remove the record.
    ///
    /// If archiving fails the record stays in place.
    pub fn delete(&self, id: InventoryId) -> LedgerResult<ArchivedInventoryRecord> {
        let snapshot = self
            .records
            .remove_with(id, |record| self.archive.archive_inventory(record))?
            .ok_or_else(|| inventory_not_found(id))?;
        tracing::info!(inventory_id = %id, "inventory record deleted and archived");
        Ok(snapshot)
    }

    /// Exact, case-sensitive match on the item code.
    pub fn find_by_item_id(&self, item_id: &ItemId) -> LedgerResult<Vec<InventoryRecord>> {
        Ok(self.records.find(|r| r.item_id() == item_id)?)
    }

    pub fn find_by_location(&self, location_id: LocationId) -> LedgerResult<Vec<InventoryRecord>> {
        Ok(self.records.find(|r| r.holds_location(location_id))?)
    }

    /// Move `delta` units of `item_id` in or out of `location_id`.
    ///
    /// Targets the first record (insertion order) for the item that lists the location,
    /// creating a zero-valued one if none does. Over-withdrawal follows the configured
    /// [`OverdrawPolicy`].
    pub fn adjust_on_hand(
        &self,
        item_id: &ItemId,
        location_id: LocationId,
        delta: i64,
    ) -> LedgerResult<InventoryRecord> {
        let movement = AdjustOnHand::new(item_id.clone(), location_id, delta);
        let ((), mut touched) =
            self.apply_movements(&[movement], self.config.overdraw_policy, || Ok(()))?;
        touched.pop().ok_or_else(|| {
            LedgerError::InvalidState(format!("no record adjusted for item '{item_id}'"))
        })
    }

    /// Apply a batch of adjustments as one unit.
    ///
    /// Adjustments are staged on copies of the rows while the inventory write lock is
    /// held. `gate` then runs under the same lock; only when it succeeds are the staged
    /// rows written back. Any failure (policy rejection, gate error, storage fault)
    /// leaves every record unchanged.
    ///
    /// Returns the gate's output and the touched records in first-touch order.
    pub fn apply_movements<T>(
        &self,
        movements: &[AdjustOnHand],
        policy: OverdrawPolicy,
        gate: impl FnOnce() -> LedgerResult<T>,
    ) -> LedgerResult<(T, Vec<InventoryRecord>)> {
        self.records.stage(|staged| -> LedgerResult<(T, Vec<InventoryRecord>)> {
            let now = Utc::now();
            let mut touched: Vec<InventoryId> = Vec::new();

            for movement in movements {
                let id = stage_adjustment(staged, movement, policy, now)?;
                if !touched.contains(&id) {
                    touched.push(id);
                }
            }

            let out = gate()?;

            let records = touched
                .into_iter()
                .filter_map(|id| staged.get(id).cloned())
                .collect();
            Ok((out, records))
        })
    }
}

fn stage_adjustment(
    staged: &mut Staged<'_, InventoryRecord>,
    movement: &AdjustOnHand,
    policy: OverdrawPolicy,
    now: DateTime<Utc>,
) -> LedgerResult<InventoryId> {
    let AdjustOnHand {
        item_id,
        location_id,
        delta,
    } = movement;

    let id = match staged.position(|r| r.is_for(item_id, *location_id)) {
        Some(id) => id,
        None => {
            tracing::debug!(
                item_id = %item_id,
                location_id = %location_id,
                "creating empty inventory record"
            );
            staged.insert(InventoryRecord::empty_at(item_id.clone(), *location_id, now))
        }
    };

    let record = staged.get_mut(id)?;
    let adjustment = record.adjust_on_hand(*location_id, *delta, now);

    if adjustment.was_clamped() {
        match policy {
            OverdrawPolicy::Reject => {
                tracing::warn!(
                    item_id = %item_id,
                    location_id = %location_id,
                    requested = delta.saturating_neg(),
                    "withdrawal rejected: insufficient stock"
                );
                return Err(LedgerError::InsufficientStock {
                    item_id: item_id.clone(),
                    location_id: *location_id,
                    requested: adjustment.requested.saturating_neg(),
                    available: adjustment.applied.saturating_neg(),
                });
            }
            OverdrawPolicy::Clamp => tracing::warn!(
                item_id = %item_id,
                location_id = %location_id,
                requested = delta.saturating_neg(),
                discarded = adjustment.shortfall(),
                "withdrawal clamped at zero"
            ),
        }
    }

    tracing::debug!(
        inventory_id = %id,
        item_id = %item_id,
        location_id = %location_id,
        delta = adjustment.applied,
        "on-hand adjusted"
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_inventory::LocationAmount;
    use proptest::prelude::*;

    fn loc(id: i64) -> LocationId {
        LocationId::new(id)
    }

    fn store_with(policy: OverdrawPolicy) -> InventoryStore {
        InventoryStore::new(
            Arc::new(ArchivalLog::new()),
            LedgerConfig::default().with_overdraw_policy(policy),
        )
    }

    fn store() -> InventoryStore {
        store_with(OverdrawPolicy::Clamp)
    }

    fn draft(item: &str, locations: &[(i64, i64)]) -> InventoryDraft {
        let locations: Vec<LocationAmount> = locations
            .iter()
            .map(|(l, a)| LocationAmount::new(loc(*l), *a))
            .collect();
        let total_on_hand = locations.iter().map(|l| l.amount).sum();
        InventoryDraft {
            item_id: ItemId::from(item),
            description: format!("{item} description"),
            locations,
            total_on_hand,
            ..InventoryDraft::default()
        }
    }

    #[test]
    fn add_then_get_returns_equal_fields() {
        let store = store();
        let added = store.add(draft("P000001", &[(1, 10)])).unwrap();

        assert_eq!(added.id(), InventoryId::new(1));
        assert_eq!(added.created_at(), added.updated_at());
        assert_eq!(store.get(added.id()).unwrap(), added);
    }

    #[test]
    fn missing_ids_are_not_found_everywhere() {
        let store = store();
        let id = InventoryId::new(99);

        assert!(store.get(id).unwrap_err().is_not_found());
        assert!(store.update(id, draft("P000001", &[])).unwrap_err().is_not_found());
        assert!(store.delete(id).unwrap_err().is_not_found());
    }

    #[test]
    fn update_replaces_fields_but_keeps_identity() {
        let store = store();
        let added = store.add(draft("P000001", &[(1, 10)])).unwrap();

        let updated = store.update(added.id(), draft("P000002", &[(2, 4)])).unwrap();
        assert_eq!(updated.id(), added.id());
        assert_eq!(updated.created_at(), added.created_at());
        assert_eq!(updated.item_id().as_str(), "P000002");
        assert_eq!(store.get(added.id()).unwrap(), updated);
    }

    #[test]
    fn delete_archives_exactly_one_snapshot() {
        let archive = Arc::new(ArchivalLog::new());
        let store = InventoryStore::new(archive.clone(), LedgerConfig::default());
        let added = store.add(draft("P000001", &[(1, 10)])).unwrap();
        let before = Utc::now();

        let snapshot = store.delete(added.id()).unwrap();

        assert!(store.get(added.id()).unwrap_err().is_not_found());
        assert!(snapshot.archived_at >= before);
        let snaps = archive.inventory_snapshots(added.id()).unwrap();
        assert_eq!(snaps, vec![snapshot]);
    }

    #[test]
    fn find_by_item_id_is_exact_and_ordered() {
        let store = store();
        let first = store.add(draft("P000001", &[(1, 1)])).unwrap();
        store.add(draft("p000001", &[(1, 1)])).unwrap();
        let third = store.add(draft("P000001", &[(2, 1)])).unwrap();

        let found = store.find_by_item_id(&ItemId::from("P000001")).unwrap();
        let ids: Vec<_> = found.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![first.id(), third.id()]);
    }

    #[test]
    fn adjust_creates_record_when_missing() {
        let store = store();
        let record = store.adjust_on_hand(&ItemId::from("P000007"), loc(3), 5).unwrap();

        assert_eq!(record.amount_at(loc(3)), Some(5));
        assert_eq!(record.total_on_hand(), 5);
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn adjust_targets_first_matching_record() {
        let store = store();
        let first = store.add(draft("P000001", &[(1, 10)])).unwrap();
        let second = store.add(draft("P000001", &[(1, 10)])).unwrap();

        let adjusted = store.adjust_on_hand(&ItemId::from("P000001"), loc(1), -4).unwrap();

        assert_eq!(adjusted.id(), first.id());
        assert_eq!(store.get(first.id()).unwrap().amount_at(loc(1)), Some(6));
        assert_eq!(store.get(second.id()).unwrap().amount_at(loc(1)), Some(10));
    }

    #[test]
    fn over_withdrawal_clamps_by_default() {
        let store = store();
        store.add(draft("P000001", &[(1, 3)])).unwrap();

        let record = store.adjust_on_hand(&ItemId::from("P000001"), loc(1), -5).unwrap();

        assert_eq!(record.amount_at(loc(1)), Some(0));
        assert_eq!(record.total_on_hand(), 0);
        assert_eq!(record.total_available(), 0);
    }

    #[test]
    fn over_withdrawal_is_rejected_under_reject_policy() {
        let store = store_with(OverdrawPolicy::Reject);
        let added = store.add(draft("P000001", &[(1, 3)])).unwrap();

        let err = store
            .adjust_on_hand(&ItemId::from("P000001"), loc(1), -5)
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                item_id: ItemId::from("P000001"),
                location_id: loc(1),
                requested: 5,
                available: 3,
            }
        );
        assert_eq!(store.get(added.id()).unwrap(), added);
    }

    #[test]
    fn extreme_withdrawal_is_reported_without_overflow() {
        let store = store_with(OverdrawPolicy::Reject);
        store.add(draft("P000001", &[(1, 3)])).unwrap();

        let err = store
            .adjust_on_hand(&ItemId::from("P000001"), loc(1), i64::MIN)
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientStock {
                requested: i64::MAX,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn failing_gate_discards_every_staged_row() {
        let store = store();
        let added = store.add(draft("P000001", &[(1, 10)])).unwrap();

        let movements = [
            AdjustOnHand::new("P000001", loc(1), -5),
            AdjustOnHand::new("P000001", loc(2), 5),
            AdjustOnHand::new("P000002", loc(2), 1),
        ];
        let res: LedgerResult<((), Vec<InventoryRecord>)> =
            store.apply_movements(&movements, OverdrawPolicy::Clamp, || {
                Err(LedgerError::Conflict("lost the race".to_string()))
            });

        assert!(matches!(res, Err(LedgerError::Conflict(_))));
        assert_eq!(store.all().unwrap(), vec![added]);
    }

    #[test]
    fn movements_report_touched_records_once() {
        let store = store();
        store.add(draft("P000001", &[(1, 10)])).unwrap();

        let movements = [
            AdjustOnHand::new("P000001", loc(1), -5),
            AdjustOnHand::new("P000001", loc(2), 5),
        ];
        let (gate, touched) = store
            .apply_movements(&movements, OverdrawPolicy::Clamp, || Ok("gated"))
            .unwrap();

        assert_eq!(gate, "gated");
        assert_eq!(touched.len(), 2);
        assert_eq!(touched[0].amount_at(loc(1)), Some(5));
        assert_eq!(touched[1].amount_at(loc(2)), Some(5));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: find_by_location returns exactly the records listing that location.
        #[test]
        fn find_by_location_is_exact(
            assignments in prop::collection::vec(
                prop::collection::btree_set(1i64..8, 0..4),
                0..12
            ),
            probe in 1i64..8
        ) {
            let store = store();
            let mut expected = Vec::new();
            for (n, locations) in assignments.iter().enumerate() {
                let pairs: Vec<(i64, i64)> = locations.iter().map(|l| (*l, 1)).collect();
                let record = store.add(draft(&format!("P{n:06}"), &pairs)).unwrap();
                if locations.contains(&probe) {
                    expected.push(record.id());
                }
            }

            let found: Vec<InventoryId> = store
                .find_by_location(loc(probe))
                .unwrap()
                .iter()
                .map(|r| r.id())
                .collect();
            prop_assert_eq!(found, expected);
        }
    }
}
