//! Entity trait: identity + continuity across state changes.

/// Entity with a storage-assigned integer identity.
///
/// Rows are created with a placeholder id; the owning table assigns the real one on
/// insert through [`Entity::assign_id`].
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + From<i64> + Into<i64>;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Overwrite the identifier (used once, when the row is first stored).
    fn assign_id(&mut self, id: Self::Id);
}
