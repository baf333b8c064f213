//! Batch transfer between tanks.
//!
//! `plan_transfer` is the confirm gate: it turns a user's selection into a
//! `TransferRequest` only when the destination is currently available.
//! `apply_transfer` is the caller-side mutation of the batch catalog.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use brewops_core::{BatchId, DomainError, DomainResult, Location, LocationId, ValueObject, find_by_id};

use crate::availability::{AvailabilityQuery, available_tanks};
use crate::batch::Batch;
use crate::recipe::Recipe;

/// What the user picked in the transfer dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSelection {
    pub batch_id: BatchId,
    pub destination: Option<LocationId>,
    pub date: NaiveDate,
    /// Overrides the recipe's target volume when set.
    pub required_volume_l: Option<Decimal>,
}

/// Approved transfer, handed to the caller for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub batch_id: BatchId,
    pub from: Option<LocationId>,
    pub to: LocationId,
    pub date: NaiveDate,
}

impl ValueObject for TransferRequest {}

/// Why a transfer was refused. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferRejection {
    #[error("batch not found")]
    UnknownBatch,

    #[error("batch is completed and can no longer be moved")]
    BatchCompleted,

    #[error("no destination tank is available on {0}")]
    NoDestinationAvailable(NaiveDate),

    #[error("select a destination tank")]
    MissingDestination,

    #[error("tank '{0}' is not available on that date")]
    DestinationUnavailable(String),

    #[error("destination is not a known tank")]
    UnknownDestination,
}

impl From<TransferRejection> for DomainError {
    fn from(value: TransferRejection) -> Self {
        match value {
            TransferRejection::UnknownBatch | TransferRejection::UnknownDestination => {
                DomainError::not_found(value.to_string())
            }
            other => DomainError::validation(other.to_string()),
        }
    }
}

/// Volume the destination must hold: explicit override, else the recipe target.
fn required_volume(selection: &TransferSelection, batch: &Batch, recipes: &[Recipe]) -> Decimal {
    selection.required_volume_l.unwrap_or_else(|| {
        find_by_id(recipes, &batch.recipe_id)
            .map(|recipe| recipe.target_volume_l)
            .unwrap_or(Decimal::ZERO)
    })
}

/// Validate a transfer selection against current tank availability.
pub fn plan_transfer(
    selection: &TransferSelection,
    locations: &[Location],
    batches: &[Batch],
    recipes: &[Recipe],
) -> Result<TransferRequest, TransferRejection> {
    let batch = find_by_id(batches, &selection.batch_id).ok_or(TransferRejection::UnknownBatch)?;
    if batch.is_completed() {
        return Err(TransferRejection::BatchCompleted);
    }

    let query = AvailabilityQuery {
        date: selection.date,
        required_volume_l: required_volume(selection, batch, recipes),
        batch_id: Some(batch.id),
        current_fermenter_id: batch.fermenter_id,
    };
    let candidates = available_tanks(&query, locations, batches, recipes);
    if candidates.is_empty() {
        return Err(TransferRejection::NoDestinationAvailable(selection.date));
    }

    let to = selection.destination.ok_or(TransferRejection::MissingDestination)?;
    if !candidates.iter().any(|tank| tank.id == to) {
        let destination = find_by_id(locations, &to)
            .filter(|location| location.is_tank())
            .ok_or(TransferRejection::UnknownDestination)?;
        return Err(TransferRejection::DestinationUnavailable(destination.name.clone()));
    }

    tracing::debug!(batch = %batch.label(), to = %to, date = %selection.date, "transfer approved");
    Ok(TransferRequest {
        batch_id: batch.id,
        from: batch.fermenter_id,
        to,
        date: selection.date,
    })
}

/// Move the batch named by an approved request into its destination tank.
pub fn apply_transfer(batches: &mut [Batch], request: &TransferRequest) -> DomainResult<()> {
    let batch = batches
        .iter_mut()
        .find(|batch| batch.id == request.batch_id)
        .ok_or_else(|| DomainError::not_found(format!("batch {}", request.batch_id)))?;

    if batch.fermenter_id != request.from {
        return Err(DomainError::conflict(
            "batch has moved since the transfer was approved",
        ));
    }
    batch.fermenter_id = Some(request.to);
    Ok(())
}
