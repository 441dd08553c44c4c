//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Rows like inventory items and count sessions are owned by the hosted
/// database; this trait only gives rule code a uniform way to key them.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
