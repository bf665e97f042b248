//! Core entity trait.

use std::fmt::Display;

/// Trait for entities that can be stored and reloaded by identity.
///
/// Implemented by the aggregate roots (`Order`, `Customer`) and by the
/// `Product` reference data. Repositories are generic over this trait.
/// `OrderItem` implements it too so storage errors can name a line item.
pub trait Entity: Clone + Send + Sync {
    /// The identifier type for this entity.
    type Id: Clone + Display + Send + Sync;

    /// Returns the entity type name.
    ///
    /// Used in errors, log fields and metric labels.
    fn entity_type() -> &'static str;

    /// Returns the entity's identifier.
    fn id(&self) -> &Self::Id;
}
