//! Location catalog: tanks, warehouses and everything else stock can sit in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::LocationId;

/// Kind of physical location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    Tank,
    Warehouse,
    Other,
}

/// A physical location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    /// Gross volume in litres. Only meaningful for tanks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_volume_l: Option<Decimal>,
}

impl Location {
    pub fn tank(id: LocationId, name: impl Into<String>, gross_volume_l: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            location_type: LocationType::Tank,
            gross_volume_l: Some(gross_volume_l),
        }
    }

    pub fn warehouse(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location_type: LocationType::Warehouse,
            gross_volume_l: None,
        }
    }

    pub fn is_tank(&self) -> bool {
        self.location_type == LocationType::Tank
    }

    /// Usable capacity for transfers. A tank without a recorded volume holds nothing.
    pub fn capacity_l(&self) -> Decimal {
        self.gross_volume_l.unwrap_or(Decimal::ZERO)
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Resolve a location by its display name (trimmed, case-insensitive).
pub fn find_by_name<'a>(locations: &'a [Location], name: &str) -> Option<&'a Location> {
    let wanted = name.trim();
    locations
        .iter()
        .find(|location| location.name.trim().eq_ignore_ascii_case(wanted))
}
