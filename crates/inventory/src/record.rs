use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::{Entity, InventoryId, ItemId, LocationId};

/// Quantity of one item held at one location. `amount` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAmount {
    pub location_id: LocationId,
    pub amount: i64,
}

impl LocationAmount {
    pub fn new(location_id: LocationId, amount: i64) -> Self {
        Self {
            location_id,
            amount: amount.max(0),
        }
    }
}

/// Caller-supplied field set for creating or fully replacing an inventory record.
///
/// `total_available` is not part of the draft: it is always derived as
/// `total_on_hand - total_allocated`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDraft {
    pub item_id: ItemId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub item_reference: String,
    #[serde(default)]
    pub locations: Vec<LocationAmount>,
    #[serde(default)]
    pub total_on_hand: i64,
    #[serde(default)]
    pub total_expected: i64,
    #[serde(default)]
    pub total_ordered: i64,
    #[serde(default)]
    pub total_allocated: i64,
}

/// Outcome of a single on-hand adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub location_id: LocationId,
    /// Delta the caller asked for.
    pub requested: i64,
    /// Delta actually applied after flooring at zero.
    pub applied: i64,
}

impl Adjustment {
    /// Quantity that could not be withdrawn because the location ran dry.
    pub fn shortfall(&self) -> i64 {
        self.applied.saturating_sub(self.requested)
    }

    pub fn was_clamped(&self) -> bool {
        self.applied != self.requested
    }
}

/// Request to move `delta` units of an item in (positive) or out (negative) of a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustOnHand {
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub delta: i64,
}

impl AdjustOnHand {
    pub fn new(item_id: impl Into<ItemId>, location_id: LocationId, delta: i64) -> Self {
        Self {
            item_id: item_id.into(),
            location_id,
            delta,
        }
    }
}

/// Stock for one item, split across one or more locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    id: InventoryId,
    item_id: ItemId,
    description: String,
    item_reference: String,
    locations: Vec<LocationAmount>,
    total_on_hand: i64,
    total_expected: i64,
    total_ordered: i64,
    total_allocated: i64,
    total_available: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Build a not-yet-stored record (id 0) from a draft.
    pub fn from_draft(draft: InventoryDraft, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            id: InventoryId::new(0),
            item_id: ItemId::default(),
            description: String::new(),
            item_reference: String::new(),
            locations: Vec::new(),
            total_on_hand: 0,
            total_expected: 0,
            total_ordered: 0,
            total_allocated: 0,
            total_available: 0,
            created_at: now,
            updated_at: now,
        };
        record.replace(draft, now);
        record
    }

    /// Zero-valued record for an item at a single location.
    pub fn empty_at(item_id: ItemId, location_id: LocationId, now: DateTime<Utc>) -> Self {
        Self::from_draft(
            InventoryDraft {
                item_id,
                locations: vec![LocationAmount::new(location_id, 0)],
                ..InventoryDraft::default()
            },
            now,
        )
    }

    /// Full-field replace. Identity and `created_at` are preserved.
    pub fn replace(&mut self, draft: InventoryDraft, now: DateTime<Utc>) {
        self.item_id = draft.item_id;
        self.description = draft.description;
        self.item_reference = draft.item_reference;
        self.locations = draft
            .locations
            .into_iter()
            .map(|l| LocationAmount::new(l.location_id, l.amount))
            .collect();
        self.total_on_hand = draft.total_on_hand;
        self.total_expected = draft.total_expected;
        self.total_ordered = draft.total_ordered;
        self.total_allocated = draft.total_allocated;
        self.updated_at = now;
        self.recompute_available();
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn item_reference(&self) -> &str {
        &self.item_reference
    }

    pub fn locations(&self) -> &[LocationAmount] {
        &self.locations
    }

    pub fn total_on_hand(&self) -> i64 {
        self.total_on_hand
    }

    pub fn total_expected(&self) -> i64 {
        self.total_expected
    }

    pub fn total_ordered(&self) -> i64 {
        self.total_ordered
    }

    pub fn total_allocated(&self) -> i64 {
        self.total_allocated
    }

    pub fn total_available(&self) -> i64 {
        self.total_available
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn holds_location(&self, location_id: LocationId) -> bool {
        self.locations.iter().any(|l| l.location_id == location_id)
    }

    pub fn amount_at(&self, location_id: LocationId) -> Option<i64> {
        self.locations
            .iter()
            .find(|l| l.location_id == location_id)
            .map(|l| l.amount)
    }

    pub fn is_for(&self, item_id: &ItemId, location_id: LocationId) -> bool {
        &self.item_id == item_id && self.holds_location(location_id)
    }

    /// Move `delta` units in or out of `location_id`.
    ///
    /// The location amount floors at zero, so an over-withdrawal is cut short; the
    /// returned [`Adjustment`] reports how much was actually applied. `total_on_hand`
    /// moves by the applied delta (also floored at zero); `total_expected` and
    /// `total_available` are recomputed from it. The location is appended if the record
    /// does not hold it yet.
    pub fn adjust_on_hand(
        &mut self,
        location_id: LocationId,
        delta: i64,
        now: DateTime<Utc>,
    ) -> Adjustment {
        let idx = match self.locations.iter().position(|l| l.location_id == location_id) {
            Some(idx) => idx,
            None => {
                self.locations.push(LocationAmount::new(location_id, 0));
                self.locations.len() - 1
            }
        };

        let slot = &mut self.locations[idx];
        let before = slot.amount;
        slot.amount = before.saturating_add(delta).max(0);
        let applied = slot.amount - before;

        self.total_on_hand = self.total_on_hand.saturating_add(applied).max(0);
        self.updated_at = now;
        self.recompute_expected();
        self.recompute_available();

        Adjustment {
            location_id,
            requested: delta,
            applied,
        }
    }

    /// Stock on hand plus stock still on order.
    fn recompute_expected(&mut self) {
        self.total_expected = self.total_on_hand.saturating_add(self.total_ordered);
    }

    fn recompute_available(&mut self) {
        self.total_available = self.total_on_hand.saturating_sub(self.total_allocated);
    }
}

impl Entity for InventoryRecord {
    type Id = InventoryId;

    fn id(&self) -> InventoryId {
        self.id
    }

    fn assign_id(&mut self, id: InventoryId) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loc(id: i64) -> LocationId {
        LocationId::new(id)
    }

    fn record_with(location: i64, amount: i64) -> InventoryRecord {
        InventoryRecord::from_draft(
            InventoryDraft {
                item_id: ItemId::from("P000001"),
                description: "Widget".to_string(),
                locations: vec![LocationAmount::new(loc(location), amount)],
                total_on_hand: amount,
                total_allocated: 2,
                ..InventoryDraft::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn draft_amounts_are_floored_and_available_is_derived() {
        let record = InventoryRecord::from_draft(
            InventoryDraft {
                item_id: ItemId::from("P000002"),
                locations: vec![LocationAmount {
                    location_id: loc(1),
                    amount: -4,
                }],
                total_on_hand: 10,
                total_allocated: 3,
                ..InventoryDraft::default()
            },
            Utc::now(),
        );

        assert_eq!(record.amount_at(loc(1)), Some(0));
        assert_eq!(record.total_available(), 7);
    }

    #[test]
    fn withdrawal_within_stock_is_applied_in_full() {
        let mut record = record_with(1, 10);
        let adj = record.adjust_on_hand(loc(1), -5, Utc::now());

        assert_eq!(adj.applied, -5);
        assert!(!adj.was_clamped());
        assert_eq!(record.amount_at(loc(1)), Some(5));
        assert_eq!(record.total_on_hand(), 5);
        assert_eq!(record.total_expected(), 5);
        assert_eq!(record.total_available(), 3);
    }

    #[test]
    fn adjustment_recomputes_expected_from_on_hand_and_ordered() {
        let mut record = InventoryRecord::from_draft(
            InventoryDraft {
                item_id: ItemId::from("P000004"),
                locations: vec![LocationAmount::new(loc(1), 10)],
                total_on_hand: 10,
                total_expected: 99,
                total_ordered: 4,
                ..InventoryDraft::default()
            },
            Utc::now(),
        );
        assert_eq!(record.total_expected(), 99);

        record.adjust_on_hand(loc(1), -3, Utc::now());
        assert_eq!(record.total_expected(), 11);
    }

    #[test]
    fn extreme_values_saturate_instead_of_overflowing() {
        let mut record = InventoryRecord::from_draft(
            InventoryDraft {
                item_id: ItemId::from("P000005"),
                locations: vec![LocationAmount::new(loc(1), 0)],
                total_on_hand: i64::MIN,
                total_allocated: i64::MAX,
                ..InventoryDraft::default()
            },
            Utc::now(),
        );
        assert_eq!(record.total_available(), i64::MIN);

        let adj = record.adjust_on_hand(loc(1), i64::MIN, Utc::now());
        assert_eq!(adj.applied, 0);
        assert_eq!(adj.shortfall(), i64::MAX);
    }

    #[test]
    fn over_withdrawal_floors_at_zero() {
        let mut record = record_with(1, 3);
        let adj = record.adjust_on_hand(loc(1), -5, Utc::now());

        assert_eq!(adj.applied, -3);
        assert_eq!(adj.shortfall(), 2);
        assert_eq!(record.amount_at(loc(1)), Some(0));
        assert_eq!(record.total_on_hand(), 0);
    }

    #[test]
    fn deposit_into_unknown_location_appends_it() {
        let mut record = record_with(1, 3);
        record.adjust_on_hand(loc(9), 4, Utc::now());

        assert!(record.holds_location(loc(9)));
        assert_eq!(record.amount_at(loc(9)), Some(4));
        assert_eq!(record.total_on_hand(), 7);
    }

    #[test]
    fn replace_keeps_identity_and_creation_time() {
        let mut record = record_with(1, 3);
        record.assign_id(InventoryId::new(12));
        let created = record.created_at();

        record.replace(
            InventoryDraft {
                item_id: ItemId::from("P000009"),
                ..InventoryDraft::default()
            },
            Utc::now(),
        );

        assert_eq!(record.id(), InventoryId::new(12));
        assert_eq!(record.created_at(), created);
        assert_eq!(record.item_id().as_str(), "P000009");
        assert!(record.locations().is_empty());
    }

    #[test]
    fn draft_deserializes_with_defaults() {
        let draft: InventoryDraft = serde_json::from_value(serde_json::json!({
            "item_id": "P000003",
            "locations": [{ "location_id": 4, "amount": 12 }],
            "total_on_hand": 12
        }))
        .unwrap();

        assert_eq!(draft.item_reference, "");
        assert_eq!(draft.locations, vec![LocationAmount::new(loc(4), 12)]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no sequence of adjustments can drive a location amount below zero,
        /// and on-hand always moves by exactly the applied delta.
        #[test]
        fn amounts_never_go_negative(
            start in 0i64..1_000,
            deltas in prop::collection::vec(-500i64..500, 1..20)
        ) {
            let mut record = record_with(1, start);
            for delta in deltas {
                let before = record.total_on_hand();
                let adj = record.adjust_on_hand(loc(1), delta, Utc::now());
                prop_assert!(record.amount_at(loc(1)).unwrap() >= 0);
                prop_assert_eq!(record.total_on_hand(), before + adj.applied);
                prop_assert_eq!(
                    record.total_available(),
                    record.total_on_hand() - record.total_allocated()
                );
            }
        }
    }
}
