//! JSON snapshot of everything the commands operate on.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use brewops_brewing::{Batch, Recipe};
use brewops_core::location::find_by_name as find_location;
use brewops_core::{BatchId, CategoryId, Location, LocationId, MasterItemId, find_by_id};
use brewops_inventory::item::find_by_name as find_item;
use brewops_inventory::{Category, MasterItem, StockLedger};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub master_items: Vec<MasterItem>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub stock: StockLedger,
}

impl AppState {
    /// Load a snapshot. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "state file not found; starting empty");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut state: AppState = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        // Re-run ledger validation; serde bypasses it.
        state.stock = StockLedger::new(std::mem::take(&mut state.stock).into_rows())
            .with_context(|| format!("invalid stock in {}", path.display()))?;
        Ok(state)
    }

    /// Write the snapshot through a sibling temp file so a crash never leaves
    /// a half-written state behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize state")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }

    pub fn location(&self, key: &str) -> Result<&Location> {
        LocationId::from_str(key)
            .ok()
            .and_then(|id| find_by_id(&self.locations, &id))
            .or_else(|| find_location(&self.locations, key))
            .ok_or_else(|| anyhow!("unknown location '{key}'"))
    }

    pub fn item(&self, key: &str) -> Result<&MasterItem> {
        MasterItemId::from_str(key)
            .ok()
            .and_then(|id| find_by_id(&self.master_items, &id))
            .or_else(|| find_item(&self.master_items, key))
            .ok_or_else(|| anyhow!("unknown item '{key}'"))
    }

    pub fn category(&self, key: &str) -> Result<&Category> {
        CategoryId::from_str(key)
            .ok()
            .and_then(|id| find_by_id(&self.categories, &id))
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|c| c.name.trim().eq_ignore_ascii_case(key.trim()))
            })
            .ok_or_else(|| anyhow!("unknown category '{key}'"))
    }

    /// Resolve a batch by id or batch number.
    pub fn batch(&self, key: &str) -> Result<&Batch> {
        BatchId::from_str(key)
            .ok()
            .and_then(|id| find_by_id(&self.batches, &id))
            .or_else(|| {
                self.batches
                    .iter()
                    .find(|b| b.batch_number.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(key.trim())))
            })
            .ok_or_else(|| anyhow!("unknown batch '{key}'"))
    }
}
