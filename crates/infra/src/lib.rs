//! Storage and services for the inventory ledger and transfer engine.
//!
//! Every collection lives in its own lock-guarded [`store::Table`]; services are plain
//! structs wired together explicitly (see [`LedgerServices`]).

pub mod archival;
pub mod audit;
pub mod config;
pub mod error;
pub mod inventory_store;
pub mod location_resolver;
pub mod places;
pub mod services;
pub mod store;
pub mod transfer_engine;


pub use archival::ArchivalLog;
pub use audit::{AuditTrail, EntityType, HistoryEntry};
pub use config::{ConfigError, LedgerConfig, OverdrawPolicy, OVERDRAW_POLICY_ENV};
pub use error::{LedgerError, LedgerResult, StoreError};
pub use inventory_store::InventoryStore;
pub use location_resolver::LocationResolver;
pub use places::{Dock, InMemoryPlaceDirectory, Location, PlaceDirectory};
pub use services::LedgerServices;
pub use transfer_engine::{CommitOutcome, TransferEngine};
