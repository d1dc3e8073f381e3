//! Explicit wiring of the ledger services around one shared archive.

use std::sync::Arc;

use crate::archival::ArchivalLog;
use crate::audit::AuditTrail;
use crate::config::LedgerConfig;
use crate::inventory_store::InventoryStore;
use crate::location_resolver::LocationResolver;
use crate::places::PlaceDirectory;
use crate::transfer_engine::TransferEngine;

/// Handles to every ledger service. Clone freely; all handles share state.
pub struct LedgerServices<D> {
    pub inventory: Arc<InventoryStore>,
    pub transfers: Arc<TransferEngine<D>>,
    pub archive: Arc<ArchivalLog>,
    pub audit: Arc<AuditTrail>,
}

impl<D> Clone for LedgerServices<D> {
    fn clone(&self) -> Self {
        Self {
            inventory: self.inventory.clone(),
            transfers: self.transfers.clone(),
            archive: self.archive.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<D: PlaceDirectory> LedgerServices<D> {
    pub fn new(config: LedgerConfig, directory: D) -> Self {
        tracing::info!(overdraw_policy = ?config.overdraw_policy, "initialising ledger services");

        let archive = Arc::new(ArchivalLog::new());
        let inventory = Arc::new(InventoryStore::new(archive.clone(), config.clone()));
        let transfers = Arc::new(TransferEngine::new(
            inventory.clone(),
            LocationResolver::new(directory),
            archive.clone(),
            config,
        ));

        Self {
            inventory,
            transfers,
            archive,
            audit: Arc::new(AuditTrail::new()),
        }
    }
}
