//! Brewing domain module: recipes, fermentation batches and tank scheduling.
//!
//! Everything here is deterministic domain logic over catalogs handed in by
//! the caller (no IO, no storage). The caller performs the mutations these
//! functions authorize.

pub mod availability;
pub mod batch;
pub mod recipe;
pub mod transfer;

pub use availability::{
    AvailabilityQuery, TankOccupancy, available_tanks, occupancy_board, tank_occupant,
};
pub use batch::{Batch, BatchStatus, OccupancyWindow, occupancy_window};
pub use recipe::{FermentationStep, Recipe};
pub use transfer::{
    TransferRejection, TransferRequest, TransferSelection, apply_transfer, plan_transfer,
};
