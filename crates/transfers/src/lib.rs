//! Transfer order domain module.
//!
//! This crate contains the lifecycle rules for moving stock between places
//! (Pending -> Completed), implemented purely as deterministic domain logic
//! (no IO, no storage).

pub mod archive;
pub mod order;

pub use archive::ArchivedTransferOrder;
pub use order::{
    PlaceRef, StockMovement, TransferDraft, TransferLine, TransferOrder, TransferStatus,
};
