//! Directory of physical places stock can move between.
//!
//! Locations hold stock. Docks are receiving/dispatch points outside the ledger and only
//! ever appear as a transfer origin.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use depot_core::{DockId, Entity, LocationId, WarehouseId};

use crate::error::StoreError;
use crate::store::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub warehouse_id: WarehouseId,
    pub code: String,
    pub name: String,
}

impl Location {
    pub fn new(
        warehouse_id: WarehouseId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: LocationId::new(0),
            warehouse_id,
            code: code.into(),
            name: name.into(),
        }
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> LocationId {
        self.id
    }

    fn assign_id(&mut self, id: LocationId) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dock {
    pub id: DockId,
    pub warehouse_id: WarehouseId,
    pub code: String,
    pub name: String,
}

impl Dock {
    pub fn new(
        warehouse_id: WarehouseId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: DockId::new(0),
            warehouse_id,
            code: code.into(),
            name: name.into(),
        }
    }
}

impl Entity for Dock {
    type Id = DockId;

    fn id(&self) -> DockId {
        self.id
    }

    fn assign_id(&mut self, id: DockId) {
        self.id = id;
    }
}

/// Read access to locations and docks. Location ids and dock ids are separate spaces.
pub trait PlaceDirectory: Send + Sync {
    fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError>;
    fn dock(&self, id: DockId) -> Result<Option<Dock>, StoreError>;
}

impl<S> PlaceDirectory for Arc<S>
where
    S: PlaceDirectory + ?Sized,
{
    fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        (**self).location(id)
    }

    fn dock(&self, id: DockId) -> Result<Option<Dock>, StoreError> {
        (**self).dock(id)
    }
}

/// In-memory place directory for tests/dev.
#[derive(Debug)]
pub struct InMemoryPlaceDirectory {
    locations: Table<Location>,
    docks: Table<Dock>,
}

impl InMemoryPlaceDirectory {
    pub fn new() -> Self {
        Self {
            locations: Table::new("locations"),
            docks: Table::new("docks"),
        }
    }

    pub fn add_location(&self, location: Location) -> Result<Location, StoreError> {
        self.locations.insert(location)
    }

    pub fn add_dock(&self, dock: Dock) -> Result<Dock, StoreError> {
        self.docks.insert(dock)
    }

    /// Register a location under the id it already carries.
    pub fn put_location(&self, location: Location) -> Result<Location, StoreError> {
        self.locations.insert_with_id(location)
    }

    /// Register a dock under the id it already carries.
    pub fn put_dock(&self, dock: Dock) -> Result<Dock, StoreError> {
        self.docks.insert_with_id(dock)
    }

    pub fn locations(&self) -> Result<Vec<Location>, StoreError> {
        self.locations.all()
    }

    pub fn docks(&self) -> Result<Vec<Dock>, StoreError> {
        self.docks.all()
    }
}

impl Default for InMemoryPlaceDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceDirectory for InMemoryPlaceDirectory {
    fn location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        self.locations.get(id)
    }

    fn dock(&self, id: DockId) -> Result<Option<Dock>, StoreError> {
        self.docks.get(id)
    }
}
