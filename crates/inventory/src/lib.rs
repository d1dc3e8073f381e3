//! Inventory ledger domain module.
//!
//! This crate contains the business rules for stock records (per-location amounts,
//! derived totals, on-hand adjustment), implemented purely as deterministic domain
//! logic (no IO, no storage, no locking).

pub mod archive;
pub mod record;

pub use archive::ArchivedInventoryRecord;
pub use record::{AdjustOnHand, Adjustment, InventoryDraft, InventoryRecord, LocationAmount};
