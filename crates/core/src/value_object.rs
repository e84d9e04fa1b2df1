//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attributes are interchangeable. To "modify" one, construct
/// a new one; construction is the only place invariants are enforced, so a
/// value object that exists is valid.
///
/// The bounds keep value objects cheap to pass around and easy to assert on:
/// - **Clone**: values are copied, not shared
/// - **PartialEq**: compared by attribute values
/// - **Debug**: printable in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
