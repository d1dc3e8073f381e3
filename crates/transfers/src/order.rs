use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{
    AggregateRoot, DockId, DomainError, DomainResult, Entity, ItemId, LocationId, TransferId,
};

/// Transfer status lifecycle.
///
/// `Pending --commit--> Completed` is the only transition the engine performs.
/// `InProgress` can be stored but never committed; `Completed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TransferStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "Pending",
            TransferStatus::InProgress => "InProgress",
            TransferStatus::Completed => "Completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Completed)
    }
}

impl core::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the free-text statuses found in stored transfers ("Pending", "In Progress",
/// "in_progress", "COMPLETED", ...).
impl FromStr for TransferStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "pending" => Ok(TransferStatus::Pending),
            "inprogress" => Ok(TransferStatus::InProgress),
            "completed" => Ok(TransferStatus::Completed),
            _ => Err(DomainError::invalid_argument(format!(
                "unknown transfer status '{s}'"
            ))),
        }
    }
}

impl TryFrom<String> for TransferStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Resolved transfer endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PlaceRef {
    /// Internal shelving.
    Location(LocationId),
    /// External receiving point; holds no ledger stock.
    Dock(DockId),
}

impl PlaceRef {
    pub fn as_location(&self) -> Option<LocationId> {
        match self {
            PlaceRef::Location(id) => Some(*id),
            PlaceRef::Dock(_) => None,
        }
    }
}

impl core::fmt::Display for PlaceRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlaceRef::Location(id) => write!(f, "location:{id}"),
            PlaceRef::Dock(id) => write!(f, "dock:{id}"),
        }
    }
}

/// Transfer line item.
///
/// Legacy transfers carry lines with only an amount; those cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLine {
    #[serde(default)]
    pub item_id: Option<ItemId>,
    pub amount: i64,
}

impl TransferLine {
    pub fn new(item_id: impl Into<ItemId>, amount: i64) -> Self {
        Self {
            item_id: Some(item_id.into()),
            amount,
        }
    }
}

/// Caller-supplied field set for creating or fully replacing a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDraft {
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub transfer_from: Option<PlaceRef>,
    pub transfer_to: LocationId,
    #[serde(default)]
    pub transfer_status: Option<TransferStatus>,
    #[serde(default)]
    pub items: Vec<TransferLine>,
}

impl TransferDraft {
    pub fn new(transfer_to: LocationId) -> Self {
        Self {
            reference: String::new(),
            transfer_from: None,
            transfer_to,
            transfer_status: None,
            items: Vec::new(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_from(mut self, place: PlaceRef) -> Self {
        self.transfer_from = Some(place);
        self
    }

    pub fn with_status(mut self, status: TransferStatus) -> Self {
        self.transfer_status = Some(status);
        self
    }

    pub fn with_line(mut self, line: TransferLine) -> Self {
        self.items.push(line);
        self
    }
}

/// One unit of stock movement derived from a transfer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub item_id: ItemId,
    /// `None` when the origin is a dock (goods enter the ledger, nothing is withdrawn).
    pub from: Option<LocationId>,
    pub to: LocationId,
    pub amount: i64,
}

/// Aggregate root: TransferOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOrder {
    id: TransferId,
    reference: String,
    transfer_from: Option<PlaceRef>,
    transfer_to: LocationId,
    transfer_status: TransferStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    items: Vec<TransferLine>,
    version: u64,
}

impl TransferOrder {
    /// Build a not-yet-stored order (id 0). Status defaults to `Pending`.
    pub fn from_draft(draft: TransferDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: TransferId::new(0),
            reference: draft.reference,
            transfer_from: draft.transfer_from,
            transfer_to: draft.transfer_to,
            transfer_status: draft.transfer_status.unwrap_or_default(),
            created_at: now,
            updated_at: Some(now),
            items: draft.items,
            version: 1,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn transfer_from(&self) -> Option<PlaceRef> {
        self.transfer_from
    }

    pub fn transfer_to(&self) -> LocationId {
        self.transfer_to
    }

    pub fn status(&self) -> TransferStatus {
        self.transfer_status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn items(&self) -> &[TransferLine] {
        &self.items
    }

    /// Full-field replace of a not-yet-completed order.
    ///
    /// Completion is reserved for [`TransferOrder::complete`], so a draft asking for
    /// `Completed` is rejected.
    pub fn replace(&mut self, draft: TransferDraft, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;

        let status = draft.transfer_status.unwrap_or_default();
        if status == TransferStatus::Completed {
            return Err(DomainError::invalid_state(
                "transfers can only be completed by commit",
            ));
        }

        self.reference = draft.reference;
        self.transfer_from = draft.transfer_from;
        self.transfer_to = draft.transfer_to;
        self.transfer_status = status;
        self.items = draft.items;
        self.touch(now);
        Ok(())
    }

    pub fn set_transfer_to(
        &mut self,
        location_id: LocationId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.transfer_to = location_id;
        self.touch(now);
        Ok(())
    }

    pub fn set_transfer_from(&mut self, place: PlaceRef, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_mutable()?;
        self.transfer_from = Some(place);
        self.touch(now);
        Ok(())
    }

    pub fn ensure_pending(&self) -> DomainResult<()> {
        if self.transfer_status != TransferStatus::Pending {
            return Err(DomainError::invalid_state("transfer not pending"));
        }
        Ok(())
    }

    /// Validate the order for commit and expand its lines into stock movements.
    ///
    /// Nothing is mutated; a failure here means no stock may be moved.
    pub fn plan_commit(&self) -> DomainResult<Vec<StockMovement>> {
        self.ensure_pending()?;

        let origin = self
            .transfer_from
            .ok_or_else(|| DomainError::invalid_state("transfer origin not set"))?;
        let from = origin.as_location();

        self.items
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let item_id = line.item_id.clone().ok_or_else(|| {
                    DomainError::invalid_argument(format!(
                        "transfer line {} has no item_id",
                        idx + 1
                    ))
                })?;
                if line.amount < 0 {
                    return Err(DomainError::invalid_argument(format!(
                        "transfer line {} has a negative amount",
                        idx + 1
                    )));
                }
                Ok(StockMovement {
                    item_id,
                    from,
                    to: self.transfer_to,
                    amount: line.amount,
                })
            })
            .collect()
    }

    /// Pending -> Completed.
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending()?;
        self.transfer_status = TransferStatus::Completed;
        self.touch(now);
        Ok(())
    }

    fn ensure_mutable(&self) -> DomainResult<()> {
        if self.transfer_status.is_terminal() {
            return Err(DomainError::invalid_state("transfer already completed"));
        }
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
        self.version += 1;
    }
}

impl Entity for TransferOrder {
    type Id = TransferId;

    fn id(&self) -> TransferId {
        self.id
    }

    fn assign_id(&mut self, id: TransferId) {
        self.id = id;
    }
}

impl AggregateRoot for TransferOrder {
    fn version(&self) -> u64 {
        self.version
    }
}
