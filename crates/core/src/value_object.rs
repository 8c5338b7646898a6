//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `Amount` is the
/// canonical example in this workspace: two amounts of `10.00` are the same
/// amount, wherever they came from.
///
/// The trait requires:
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: useful in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
