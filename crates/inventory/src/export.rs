//! Reporting filter over the stock ledger.

use std::collections::HashSet;

use brewops_core::{CategoryId, Location, LocationId, find_by_id};

use crate::category::Category;
use crate::item::MasterItem;
use crate::ledger::WarehouseItem;

/// Export filter. Every empty dimension matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilter {
    pub location_ids: HashSet<LocationId>,
    /// Also matches items whose category's parent is listed.
    pub category_ids: HashSet<CategoryId>,
    /// Case-insensitive substring of the item name.
    pub name_query: Option<String>,
}

/// A ledger row with its references resolved for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub row: &'a WarehouseItem,
    pub item: &'a MasterItem,
    pub category: Option<&'a Category>,
    pub location: Option<&'a Location>,
}

impl ExportFilter {
    fn matches_location(&self, row: &WarehouseItem) -> bool {
        self.location_ids.is_empty() || self.location_ids.contains(&row.location_id)
    }

    fn matches_category(&self, category: Option<&Category>) -> bool {
        if self.category_ids.is_empty() {
            return true;
        }
        category.is_some_and(|category| {
            self.category_ids.contains(&category.id)
                || category
                    .parent_id
                    .is_some_and(|parent| self.category_ids.contains(&parent))
        })
    }

    fn matches_name(&self, item: &MasterItem) -> bool {
        match self.name_query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => item.name_contains(query),
        }
    }

    /// Rows whose master item resolves and that match every dimension, in
    /// ledger order.
    pub fn apply<'a>(
        &self,
        rows: &'a [WarehouseItem],
        items: &'a [MasterItem],
        categories: &'a [Category],
        locations: &'a [Location],
    ) -> Vec<ExportRow<'a>> {
        rows.iter()
            .filter(|row| self.matches_location(row))
            .filter_map(|row| {
                let item = find_by_id(items, &row.master_item_id)?;
                let category = item
                    .category_id
                    .and_then(|id| find_by_id(categories, &id));
                (self.matches_category(category) && self.matches_name(item)).then(|| ExportRow {
                    row,
                    item,
                    category,
                    location: find_by_id(locations, &row.location_id),
                })
            })
            .collect()
    }
}
