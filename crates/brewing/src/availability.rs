//! Tank availability.
//!
//! A tank is a valid transfer destination on a given day when it is big enough
//! for the batch and no other unfinished batch holds it that day.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use brewops_core::{BatchId, Location, LocationId};

use crate::batch::{Batch, OccupancyWindow, occupancy_window};
use crate::recipe::Recipe;

/// Inputs of one availability lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    /// Day the batch would move in.
    pub date: NaiveDate,
    /// Volume the destination must hold, in litres.
    pub required_volume_l: Decimal,
    /// Batch being transferred; it never collides with itself.
    pub batch_id: Option<BatchId>,
    /// Tank the batch is leaving; never offered as a destination.
    pub current_fermenter_id: Option<LocationId>,
}

/// Which batch holds a tank on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TankOccupancy<'a> {
    pub tank: &'a Location,
    pub occupant: Option<(&'a Batch, OccupancyWindow)>,
}

impl TankOccupancy<'_> {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Tanks occupied on `date`, keyed by tank id, with the first occupying batch.
///
/// Completed and unplaced batches hold nothing; `exclude` is skipped as well.
fn occupied_on<'a>(
    date: NaiveDate,
    batches: &'a [Batch],
    recipes: &[Recipe],
    exclude: Option<BatchId>,
) -> HashMap<LocationId, (&'a Batch, OccupancyWindow)> {
    let mut occupied = HashMap::new();
    for batch in batches {
        if batch.is_completed() || Some(batch.id) == exclude {
            continue;
        }
        let Some(tank_id) = batch.fermenter_id else {
            continue;
        };
        let window = occupancy_window(batch, recipes);
        if window.contains(date) {
            occupied.entry(tank_id).or_insert((batch, window));
        }
    }
    occupied
}

/// Tanks that can receive a batch on `query.date`, in catalog order.
///
/// An empty result is valid and means no destination is available.
pub fn available_tanks<'a>(
    query: &AvailabilityQuery,
    locations: &'a [Location],
    batches: &[Batch],
    recipes: &[Recipe],
) -> Vec<&'a Location> {
    let occupied = occupied_on(query.date, batches, recipes, query.batch_id);

    locations
        .iter()
        .filter(|location| location.is_tank())
        .filter(|tank| Some(tank.id) != query.current_fermenter_id)
        .filter(|tank| {
            if tank.capacity_l() < query.required_volume_l {
                tracing::debug!(
                    tank = %tank.name,
                    capacity_l = %tank.capacity_l(),
                    required_l = %query.required_volume_l,
                    "tank rejected: too small"
                );
                return false;
            }
            if let Some((batch, window)) = occupied.get(&tank.id) {
                tracing::debug!(
                    tank = %tank.name,
                    batch = %batch.label(),
                    window = %window,
                    "tank rejected: occupied"
                );
                return false;
            }
            true
        })
        .collect()
}

/// Batch holding `tank_id` on `date`, ignoring `exclude`.
pub fn tank_occupant<'a>(
    tank_id: LocationId,
    date: NaiveDate,
    batches: &'a [Batch],
    recipes: &[Recipe],
    exclude: Option<BatchId>,
) -> Option<&'a Batch> {
    batches.iter().find(|batch| {
        !batch.is_completed()
            && Some(batch.id) != exclude
            && batch.fermenter_id == Some(tank_id)
            && occupancy_window(batch, recipes).contains(date)
    })
}

/// Occupancy of every tank on `date`, in catalog order.
pub fn occupancy_board<'a>(
    date: NaiveDate,
    locations: &'a [Location],
    batches: &'a [Batch],
    recipes: &[Recipe],
) -> Vec<TankOccupancy<'a>> {
    let occupied = occupied_on(date, batches, recipes, None);
    locations
        .iter()
        .filter(|location| location.is_tank())
        .map(|tank| TankOccupancy {
            tank,
            occupant: occupied.get(&tank.id).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchStatus;
    use crate::recipe::FermentationStep;
    use brewops_core::RecipeId;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recipe(days: u32) -> Recipe {
        Recipe {
            id: RecipeId::new(),
            name: "Pale Ale".to_string(),
            target_volume_l: dec!(800),
            fermentation_steps: vec![FermentationStep { name: "primary".to_string(), days }],
        }
    }

    fn batch_in(tank: &Location, recipe: &Recipe, cook: NaiveDate) -> Batch {
        Batch {
            id: BatchId::new(),
            batch_number: None,
            recipe_id: recipe.id,
            fermenter_id: Some(tank.id),
            cook_date: cook,
            packaging_date: None,
            status: BatchStatus::Active,
        }
    }

    fn query(date: NaiveDate, volume: Decimal) -> AvailabilityQuery {
        AvailabilityQuery {
            date,
            required_volume_l: volume,
            batch_id: None,
            current_fermenter_id: None,
        }
    }

    #[test]
    fn excludes_small_tanks_and_non_tanks() {
        let small = Location::tank(LocationId::new(), "FV-S", dec!(500));
        let big = Location::tank(LocationId::new(), "FV-L", dec!(2000));
        let exact = Location::tank(LocationId::new(), "FV-E", dec!(1000));
        let cellar = Location::warehouse(LocationId::new(), "Cellar");
        let locations = vec![small, big.clone(), cellar, exact.clone()];

        let result = available_tanks(&query(day(2024, 1, 1), dec!(1000)), &locations, &[], &[]);
        assert_eq!(result, vec![&big, &exact]);
    }

    #[test]
    fn tank_occupied_inside_window_is_rejected() {
        let fv1 = Location::tank(LocationId::new(), "FV-1", dec!(1000));
        let fv2 = Location::tank(LocationId::new(), "FV-2", dec!(1000));
        let recipe = recipe(14);
        let resident = batch_in(&fv1, &recipe, day(2024, 1, 1));
        let locations = vec![fv1.clone(), fv2.clone()];
        let batches = vec![resident];
        let recipes = vec![recipe];

        let on_10th = available_tanks(&query(day(2024, 1, 10), dec!(100)), &locations, &batches, &recipes);
        assert_eq!(on_10th, vec![&fv2]);

        let on_15th = available_tanks(&query(day(2024, 1, 15), dec!(100)), &locations, &batches, &recipes);
        assert_eq!(on_15th, vec![&fv2]);

        let on_16th = available_tanks(&query(day(2024, 1, 16), dec!(100)), &locations, &batches, &recipes);
        assert_eq!(on_16th, vec![&fv1, &fv2]);
    }

    #[test]
    fn transferred_batch_does_not_block_itself_and_source_is_skipped() {
        let fv1 = Location::tank(LocationId::new(), "FV-1", dec!(1000));
        let bbt = Location::tank(LocationId::new(), "BBT-1", dec!(1000));
        let recipe = recipe(14);
        let mut moving = batch_in(&fv1, &recipe, day(2024, 1, 1));
        // Previously pencilled into BBT-1 for the same window.
        moving.fermenter_id = Some(bbt.id);
        let locations = vec![fv1.clone(), bbt.clone()];

        let q = AvailabilityQuery {
            date: day(2024, 1, 5),
            required_volume_l: dec!(1000),
            batch_id: Some(moving.id),
            current_fermenter_id: Some(fv1.id),
        };
        let result = available_tanks(&q, &locations, &[moving], &[recipe]);
        assert_eq!(result, vec![&bbt]);
    }

    #[test]
    fn completed_and_unplaced_batches_hold_nothing() {
        let fv1 = Location::tank(LocationId::new(), "FV-1", dec!(1000));
        let recipe = recipe(14);
        let mut done = batch_in(&fv1, &recipe, day(2024, 1, 1));
        done.status = BatchStatus::Completed;
        let mut unplaced = batch_in(&fv1, &recipe, day(2024, 1, 1));
        unplaced.fermenter_id = None;
        let locations = vec![fv1.clone()];

        let result = available_tanks(
            &query(day(2024, 1, 5), dec!(10)),
            &locations,
            &[done, unplaced],
            &[recipe],
        );
        assert_eq!(result, vec![&fv1]);
    }

    #[test]
    fn planned_batches_still_block() {
        let fv1 = Location::tank(LocationId::new(), "FV-1", dec!(1000));
        let recipe = recipe(3);
        let mut planned = batch_in(&fv1, &recipe, day(2024, 2, 1));
        planned.status = BatchStatus::Planned;
        let locations = vec![fv1];

        let result = available_tanks(&query(day(2024, 2, 2), dec!(10)), &locations, &[planned], &[recipe]);
        assert!(result.is_empty());
    }

    #[test]
    fn occupant_and_board_agree() {
        let fv1 = Location::tank(LocationId::new(), "FV-1", dec!(1000));
        let fv2 = Location::tank(LocationId::new(), "FV-2", dec!(1000));
        let cellar = Location::warehouse(LocationId::new(), "Cellar");
        let recipe = recipe(14);
        let resident = batch_in(&fv2, &recipe, day(2024, 1, 1));
        let locations = vec![fv1.clone(), cellar, fv2.clone()];
        let batches = vec![resident.clone()];
        let recipes = vec![recipe];

        let date = day(2024, 1, 10);
        assert_eq!(tank_occupant(fv2.id, date, &batches, &recipes, None), Some(&resident));
        assert_eq!(tank_occupant(fv2.id, date, &batches, &recipes, Some(resident.id)), None);
        assert_eq!(tank_occupant(fv1.id, date, &batches, &recipes, None), None);

        let board = occupancy_board(date, &locations, &batches, &recipes);
        assert_eq!(board.len(), 2);
        assert!(board[0].is_free());
        assert_eq!(board[1].tank, &fv2);
        let (occupant, window) = board[1].occupant.unwrap();
        assert_eq!(occupant, &resident);
        assert_eq!(window.end, day(2024, 1, 15));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no tank below the required volume is ever offered.
        #[test]
        fn undersized_tanks_never_offered(
            volumes in prop::collection::vec(0u32..5_000u32, 1..20),
            required in 0u32..5_000u32,
        ) {
            let locations: Vec<Location> = volumes
                .iter()
                .enumerate()
                .map(|(i, v)| Location::tank(LocationId::new(), format!("FV-{i}"), Decimal::from(*v)))
                .collect();
            let required = Decimal::from(required);

            let result = available_tanks(&query(day(2024, 1, 1), required), &locations, &[], &[]);
            for tank in &result {
                prop_assert!(tank.capacity_l() >= required);
            }
            let expected = volumes.iter().filter(|v| Decimal::from(**v) >= required).count();
            prop_assert_eq!(result.len(), expected);
        }

        /// Property: every day of a batch's window blocks its tank for other batches.
        #[test]
        fn every_day_in_window_blocks_tank(
            fermentation_days in 0u32..60u32,
            offset in 0u32..60u32,
        ) {
            let tank = Location::tank(LocationId::new(), "FV-1", dec!(1000));
            let recipe = recipe(fermentation_days);
            let resident = batch_in(&tank, &recipe, day(2024, 3, 1));
            let window = occupancy_window(&resident, std::slice::from_ref(&recipe));
            let date = brewops_core::date::add_days(day(2024, 3, 1), offset);
            let locations = vec![tank];

            let mut q = query(date, dec!(1));
            q.batch_id = Some(BatchId::new());
            let result = available_tanks(&q, &locations, &[resident], &[recipe]);

            prop_assert_eq!(result.is_empty(), window.contains(date));
            prop_assert_eq!(window.contains(date), offset <= fermentation_days);
        }
    }
}
