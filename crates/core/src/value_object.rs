//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values.
/// `Cents(1000)` is a value object; a `Product` with a `ProductId` is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
