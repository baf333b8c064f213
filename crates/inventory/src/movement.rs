//! Stock move validation.
//!
//! `validate_move` is the gate in front of the caller's "move item" action. It
//! never mutates anything; on success it hands back a `MoveRequest` for the
//! caller to execute (see `StockLedger::apply_move`).

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use brewops_core::{DomainError, DomainResult, LocationId, MasterItemId, ValueObject};

use crate::ledger::{WarehouseItem, quantity_of};

/// Current state of the move dialog. Every field may still be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSelection {
    pub master_item_id: Option<MasterItemId>,
    pub lot_number: Option<String>,
    pub source: Option<LocationId>,
    pub destination: Option<LocationId>,
    pub quantity: Option<Decimal>,
}

/// Approved stock move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub master_item_id: MasterItemId,
    pub lot_number: String,
    pub from: LocationId,
    pub to: LocationId,
    pub quantity: Decimal,
}

impl ValueObject for MoveRequest {}

/// Why a move was refused. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("select an item")]
    MissingItem,

    #[error("select a lot")]
    MissingLot,

    #[error("select a source location")]
    MissingSource,

    #[error("select a destination location")]
    MissingDestination,

    #[error("quantity must be a positive number")]
    InvalidQuantity,

    #[error("destination must differ from source")]
    SameLocation,

    #[error("not enough stock at source (requested {requested}, available {available})")]
    InsufficientStock { requested: Decimal, available: Decimal },
}

impl From<MoveRejection> for DomainError {
    fn from(value: MoveRejection) -> Self {
        DomainError::validation(value.to_string())
    }
}

/// Check a move selection against the ledger.
///
/// The available quantity is the sum over rows with the exact item, lot and
/// source location.
pub fn validate_move(
    selection: &MoveSelection,
    rows: &[WarehouseItem],
) -> Result<MoveRequest, MoveRejection> {
    let item = selection.master_item_id.ok_or(MoveRejection::MissingItem)?;
    let lot = selection
        .lot_number
        .as_deref()
        .map(str::trim)
        .filter(|lot| !lot.is_empty())
        .ok_or(MoveRejection::MissingLot)?;
    let from = selection.source.ok_or(MoveRejection::MissingSource)?;
    let to = selection.destination.ok_or(MoveRejection::MissingDestination)?;
    let quantity = selection
        .quantity
        .filter(|q| *q > Decimal::ZERO)
        .ok_or(MoveRejection::InvalidQuantity)?;

    if from == to {
        return Err(MoveRejection::SameLocation);
    }

    let available = quantity_of(rows, item, lot, from);
    if quantity > available {
        return Err(MoveRejection::InsufficientStock {
            requested: quantity,
            available,
        });
    }

    Ok(MoveRequest {
        master_item_id: item,
        lot_number: lot.to_string(),
        from,
        to,
        quantity,
    })
}

/// Parse a quantity typed by a user. Accepts `,` as decimal separator.
pub fn parse_quantity(input: &str) -> DomainResult<Decimal> {
    let normalized = input.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|_| DomainError::validation(format!("'{}' is not a number", input.trim())))
}
