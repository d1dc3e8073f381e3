//! Transfer order lifecycle: CRUD, endpoint resolution and commit.

use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use depot_core::{AggregateRoot, Entity, ExpectedVersion, LocationId, TransferId};
use depot_inventory::{AdjustOnHand, InventoryRecord};
use depot_transfers::{
    ArchivedTransferOrder, StockMovement, TransferDraft, TransferLine, TransferOrder,
};

use crate::archival::ArchivalLog;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::inventory_store::InventoryStore;
use crate::location_resolver::LocationResolver;
use crate::places::PlaceDirectory;
use crate::store::Table;

fn transfer_not_found() -> LedgerError {
    LedgerError::not_found("Transfer not found!")
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub order: TransferOrder,
    /// Inventory records touched by the movement, in first-touch order.
    pub inventory: Vec<InventoryRecord>,
}

pub struct TransferEngine<D> {
    transfers: Table<TransferOrder>,
    inventory: Arc<InventoryStore>,
    resolver: LocationResolver<D>,
    archive: Arc<ArchivalLog>,
    config: LedgerConfig,
}

impl<D: PlaceDirectory> TransferEngine<D> {
    pub fn new(
        inventory: Arc<InventoryStore>,
        resolver: LocationResolver<D>,
        archive: Arc<ArchivalLog>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            transfers: Table::new("transfers"),
            inventory,
            resolver,
            archive,
            config,
        }
    }

    pub fn all(&self) -> LedgerResult<Vec<TransferOrder>> {
        Ok(self.transfers.all()?)
    }

    pub fn get(&self, id: TransferId) -> LedgerResult<TransferOrder> {
        self.transfers.get(id)?.ok_or_else(transfer_not_found)
    }

    pub fn line_items(&self, id: TransferId) -> LedgerResult<Vec<TransferLine>> {
        Ok(self.get(id)?.items().to_vec())
    }

    /// Store a new order. Status defaults to `Pending` when the draft leaves it unset.
    pub fn create(&self, draft: Option<TransferDraft>) -> LedgerResult<TransferOrder> {
        let draft =
            draft.ok_or_else(|| LedgerError::invalid_argument("transfer payload is required"))?;
        let order = self
            .transfers
            .insert(TransferOrder::from_draft(draft, Utc::now()))?;
        tracing::info!(
            transfer_id = %order.id(),
            status = %order.status(),
            lines = order.items().len(),
            "transfer created"
        );
        Ok(order)
    }

    /// Full-field replace. A completed order cannot be edited.
    pub fn update(&self, id: TransferId, draft: TransferDraft) -> LedgerResult<TransferOrder> {
        let order = self
            .transfers
            .update(id, |order| {
                order.replace(draft, Utc::now())?;
                Ok::<_, LedgerError>(order.clone())
            })?
            .ok_or_else(transfer_not_found)?;
        tracing::debug!(transfer_id = %id, version = order.version(), "transfer replaced");
        Ok(order)
    }

    /// Execute the stock movement of a pending order and mark it completed.
    ///
    /// Every line is staged against the inventory ledger, then the order is flipped to
    /// `Completed` by compare-and-swap on the version read at the start. Both happen under
    /// the inventory write lock, so either the whole movement and the status change land
    /// together or nothing does. A concurrent commit of the same order loses with
    /// `InvalidState`; a concurrent edit makes it fail with `Conflict`.
    #[instrument(skip(self), fields(transfer_id = %id), err)]
    pub fn commit(&self, id: TransferId) -> LedgerResult<CommitOutcome> {
        let order = self.get(id)?;
        let plan = order.plan_commit().inspect_err(|err| {
            tracing::warn!(error = %err, status = %order.status(), "transfer cannot be committed");
        })?;
        let adjustments = expand_movements(&plan);
        let expected = ExpectedVersion::exact(order.version());

        let (order, inventory) = self.inventory.apply_movements(
            &adjustments,
            self.config.overdraw_policy,
            || {
                self.transfers
                    .update(id, |current| {
                        current.ensure_pending()?;
                        expected.check(current.version())?;
                        current.complete(Utc::now())?;
                        Ok::<_, LedgerError>(current.clone())
                    })?
                    .ok_or_else(transfer_not_found)
            },
        )?;

        tracing::info!(
            lines = plan.len(),
            records = inventory.len(),
            version = order.version(),
            "transfer committed"
        );
        Ok(CommitOutcome { order, inventory })
    }

    /// Archive a snapshot, then remove the order.
    pub fn delete(&self, id: TransferId) -> LedgerResult<ArchivedTransferOrder> {
        let snapshot = self
            .transfers
            .remove_with(id, |order| self.archive.archive_transfer(order))?
            .ok_or_else(transfer_not_found)?;
        tracing::info!(
            transfer_id = %id,
            status = %snapshot.transfer_status,
            "transfer deleted and archived"
        );
        Ok(snapshot)
    }

    pub fn set_transfer_to(
        &self,
        id: TransferId,
        location_id: LocationId,
    ) -> LedgerResult<TransferOrder> {
        self.transfers
            .update(id, |order| {
                self.resolver.resolve_transfer_to(order, location_id)?;
                Ok::<_, LedgerError>(order.clone())
            })?
            .ok_or_else(transfer_not_found)
    }

    /// Set the origin from a raw id, which may name a location or a dock.
    pub fn set_transfer_from(&self, id: TransferId, place_id: i64) -> LedgerResult<TransferOrder> {
        self.transfers
            .update(id, |order| {
                self.resolver.resolve_transfer_from(order, place_id)?;
                Ok::<_, LedgerError>(order.clone())
            })?
            .ok_or_else(transfer_not_found)
    }
}

/// Withdraw-then-deposit pairs for each movement. Dock origins withdraw nothing and
/// zero-amount lines move nothing.
fn expand_movements(plan: &[StockMovement]) -> Vec<AdjustOnHand> {
    plan.iter()
        .filter(|m| m.amount > 0)
        .flat_map(|m| {
            let withdraw = m
                .from
                .map(|from| AdjustOnHand::new(m.item_id.clone(), from, -m.amount));
            let deposit = AdjustOnHand::new(m.item_id.clone(), m.to, m.amount);
            withdraw.into_iter().chain(std::iter::once(deposit))
        })
        .collect()
}
