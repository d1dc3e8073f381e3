//! Append-only history of mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;
use crate::store::AppendLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Item,
    Order,
    Shipment,
    Inventory,
    Transfer,
    Location,
    Dock,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Item => "Item",
            EntityType::Order => "Order",
            EntityType::Shipment => "Shipment",
            EntityType::Inventory => "Inventory",
            EntityType::Transfer => "Transfer",
            EntityType::Location => "Location",
            EntityType::Dock => "Dock",
        }
    }
}

impl core::fmt::Display for EntityType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded change. `sequence` is 1-based and gap-free across the whole trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sequence: u64,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: String,
    pub changes: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AuditTrail {
    entries: AppendLog<HistoryEntry>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self {
            entries: AppendLog::new("history"),
        }
    }

    pub fn log(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        action: impl Into<String>,
        changes: impl Into<String>,
    ) -> LedgerResult<HistoryEntry> {
        let entity_id = entity_id.into();
        let action = action.into();
        let changes = changes.into();
        let entry = self.entries.append_with(|sequence| HistoryEntry {
            sequence,
            entity_type,
            entity_id,
            action,
            changes,
            timestamp: Utc::now(),
        })?;

        tracing::debug!(
            sequence = entry.sequence,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            action = %entry.action,
            "history entry recorded"
        );
        Ok(entry)
    }

    pub fn entries(&self) -> LedgerResult<Vec<HistoryEntry>> {
        Ok(self.entries.all()?)
    }

    pub fn entries_for(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> LedgerResult<Vec<HistoryEntry>> {
        Ok(self
            .entries
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)?)
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
