//! `brewops-core` — shared building blocks for the brewery domain crates.
//!
//! This crate contains **pure domain** primitives (no IO, no storage): typed
//! identifiers, the domain error model, calendar-day helpers and the location
//! catalog shared by the brewing and inventory modules.

pub mod date;
pub mod entity;
pub mod error;
pub mod id;
pub mod location;
pub mod value_object;

pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{BatchId, CategoryId, LocationId, MasterItemId, RecipeId};
pub use location::{Location, LocationType};
pub use value_object::ValueObject;
