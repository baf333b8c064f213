use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use brewops_core::date::{add_days, format_day};
use brewops_core::{BatchId, Entity, LocationId, RecipeId, ValueObject, find_by_id};

use crate::recipe::Recipe;

/// Batch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    Planned,
    Active,
    Completed,
}

/// A fermentation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    /// Human label printed on tank cards (e.g. "B-2024-017").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    pub recipe_id: RecipeId,
    /// Tank the batch currently sits in. `None` until it is placed.
    #[serde(default)]
    pub fermenter_id: Option<LocationId>,
    pub cook_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_date: Option<NaiveDate>,
    pub status: BatchStatus,
}

impl Batch {
    pub fn is_completed(&self) -> bool {
        self.status == BatchStatus::Completed
    }

    /// Label for messages: batch number when present, id otherwise.
    pub fn label(&self) -> String {
        self.batch_number
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

impl Entity for Batch {
    type Id = BatchId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Inclusive range of days during which a batch holds its tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupancyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl OccupancyWindow {
    /// `true` when `day` falls within the window, both ends included.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

impl ValueObject for OccupancyWindow {}

impl core::fmt::Display for OccupancyWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}..{}", format_day(self.start), format_day(self.end))
    }
}

/// Days during which `batch` occupies its fermenter.
///
/// Packaged batches hold the tank from cook day to packaging day. Otherwise the
/// recipe's fermentation schedule is added to the cook day; an unknown recipe
/// contributes no days. The end never precedes the cook day.
pub fn occupancy_window(batch: &Batch, recipes: &[Recipe]) -> OccupancyWindow {
    let start = batch.cook_date;
    let end = match batch.packaging_date {
        Some(packaged) => packaged,
        None => match find_by_id(recipes, &batch.recipe_id) {
            Some(recipe) => add_days(start, recipe.fermentation_days()),
            None => {
                tracing::warn!(
                    batch = %batch.label(),
                    recipe_id = %batch.recipe_id,
                    "recipe not found; occupancy limited to cook day"
                );
                start
            }
        },
    };

    OccupancyWindow {
        start,
        end: end.max(start),
    }
}
