//! Value object trait: equality by value, not identity.
//!
//! Requests emitted by validators (moves, transfers) and derived values such as
//! occupancy windows carry no identity of their own. Two of them with the same
//! fields are the same thing.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// - **Value Object**: `MoveRequest { item, lot, from, to, quantity }`
/// - **Entity**: `Location { id: LocationId(...), name: "FV-1", .. }`
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
