use serde::{Deserialize, Serialize};

use brewops_core::{CategoryId, Entity, MasterItemId};

/// Which warehouse flow an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    RawMaterial,
    FinishedGood,
}

/// Catalog definition of a stockable item, independent of lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterItem {
    pub id: MasterItemId,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Unit quantities are counted in (kg, L, pcs, ...).
    pub unit: String,
    pub kind: ItemKind,
}

impl MasterItem {
    /// Case-insensitive substring match on the item name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl Entity for MasterItem {
    type Id = MasterItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Resolve an item by name (trimmed, case-insensitive).
pub fn find_by_name<'a>(items: &'a [MasterItem], name: &str) -> Option<&'a MasterItem> {
    let wanted = name.trim().to_lowercase();
    items
        .iter()
        .find(|item| item.name.trim().to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malt() -> MasterItem {
        MasterItem {
            id: MasterItemId::new(),
            name: "Pilsner Malt".to_string(),
            category_id: None,
            unit: "kg".to_string(),
            kind: ItemKind::RawMaterial,
        }
    }

    #[test]
    fn name_match_ignores_case() {
        let item = malt();
        assert!(item.name_contains("pils"));
        assert!(item.name_contains("MALT"));
        assert!(!item.name_contains("hops"));
    }

    #[test]
    fn find_by_name_handles_non_ascii_case() {
        let mut item = malt();
        item.name = "Münchner Malz".to_string();
        let items = vec![item.clone()];
        assert_eq!(find_by_name(&items, " MÜNCHNER malz"), Some(&item));
    }
}
