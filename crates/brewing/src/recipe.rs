use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use brewops_core::{Entity, RecipeId};

/// One fermentation stage of a recipe (primary, diacetyl rest, lagering, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FermentationStep {
    pub name: String,
    pub days: u32,
}

/// Recipe definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Volume a batch of this recipe needs in a tank, in litres.
    pub target_volume_l: Decimal,
    /// Ordered fermentation schedule.
    #[serde(default)]
    pub fermentation_steps: Vec<FermentationStep>,
}

impl Recipe {
    /// Total planned fermentation time in days.
    pub fn fermentation_days(&self) -> u32 {
        self.fermentation_steps
            .iter()
            .fold(0u32, |acc, step| acc.saturating_add(step.days))
    }
}

impl Entity for Recipe {
    type Id = RecipeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
