use chrono::Utc;

use depot_core::{DockId, LocationId};
use depot_transfers::{PlaceRef, TransferOrder};

use crate::error::{LedgerError, LedgerResult};
use crate::places::PlaceDirectory;

/// Turns raw place ids into transfer endpoints.
///
/// A destination must be a location. An origin may be a location or a dock; when both
/// share the id, the location wins.
#[derive(Debug, Clone)]
pub struct LocationResolver<D> {
    directory: D,
}

impl<D: PlaceDirectory> LocationResolver<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn resolve_to(&self, location_id: LocationId) -> LedgerResult<LocationId> {
        self.directory
            .location(location_id)?
            .map(|location| location.id)
            .ok_or_else(|| LedgerError::not_found("Location not found"))
    }

    pub fn resolve_from(&self, place_id: i64) -> LedgerResult<PlaceRef> {
        if let Some(location) = self.directory.location(LocationId::new(place_id))? {
            return Ok(PlaceRef::Location(location.id));
        }
        if let Some(dock) = self.directory.dock(DockId::new(place_id))? {
            return Ok(PlaceRef::Dock(dock.id));
        }
        Err(LedgerError::not_found("Dock not found!"))
    }

    pub fn resolve_transfer_to(
        &self,
        order: &mut TransferOrder,
        location_id: LocationId,
    ) -> LedgerResult<()> {
        let location_id = self.resolve_to(location_id)?;
        order.set_transfer_to(location_id, Utc::now())?;
        tracing::debug!(%location_id, "transfer destination resolved");
        Ok(())
    }

    pub fn resolve_transfer_from(
        &self,
        order: &mut TransferOrder,
        place_id: i64,
    ) -> LedgerResult<()> {
        let place = self.resolve_from(place_id)?;
        order.set_transfer_from(place, Utc::now())?;
        tracing::debug!(%place, "transfer origin resolved");
        Ok(())
    }
}
