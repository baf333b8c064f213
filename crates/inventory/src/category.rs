//! Item categories (two levels: top-level categories and their children).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use brewops_core::{CategoryId, DomainError, DomainResult, Entity, find_by_id};

/// Item category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Direct children of `parent`.
pub fn children_of<'a>(categories: &'a [Category], parent: CategoryId) -> Vec<&'a Category> {
    categories
        .iter()
        .filter(|category| category.parent_id == Some(parent))
        .collect()
}

/// `selected` plus every direct child of a selected category.
pub fn expand_with_children(
    categories: &[Category],
    selected: &HashSet<CategoryId>,
) -> HashSet<CategoryId> {
    let mut expanded = selected.clone();
    expanded.extend(
        categories
            .iter()
            .filter(|category| category.parent_id.is_some_and(|p| selected.contains(&p)))
            .map(|category| category.id),
    );
    expanded
}

/// Check a category before it is added to the catalog.
///
/// Names are unique among siblings (case-insensitive). A parent must exist
/// and be top-level itself.
pub fn validate_new_category(
    categories: &[Category],
    name: &str,
    parent_id: Option<CategoryId>,
) -> DomainResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("category name cannot be empty"));
    }

    if let Some(parent_id) = parent_id {
        let parent = find_by_id(categories, &parent_id)
            .ok_or_else(|| DomainError::not_found(format!("parent category {parent_id}")))?;
        if parent.parent_id.is_some() {
            return Err(DomainError::invariant(
                "categories can only be nested one level deep",
            ));
        }
    }

    let duplicate = categories
        .iter()
        .any(|c| c.parent_id == parent_id && c.name.trim().to_lowercase() == name.to_lowercase());
    if duplicate {
        return Err(DomainError::conflict(format!("category '{name}' already exists")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, parent_id: Option<CategoryId>) -> Category {
        Category {
            id: CategoryId::new(),
            name: name.to_string(),
            parent_id,
        }
    }

    #[test]
    fn expands_one_level() {
        let malt = category("Malt", None);
        let base = category("Base Malt", Some(malt.id));
        let hops = category("Hops", None);
        let categories = vec![malt.clone(), base.clone(), hops.clone()];

        assert_eq!(children_of(&categories, malt.id), vec![&base]);

        let selected = HashSet::from([malt.id]);
        let expanded = expand_with_children(&categories, &selected);
        assert_eq!(expanded, HashSet::from([malt.id, base.id]));
    }

    #[test]
    fn validates_names_and_nesting() {
        let malt = category("Malt", None);
        let base = category("Base Malt", Some(malt.id));
        let categories = vec![malt.clone(), base.clone()];

        assert!(validate_new_category(&categories, "Crystal", Some(malt.id)).is_ok());
        assert!(validate_new_category(&categories, "Base Malt", None).is_ok());

        assert!(matches!(
            validate_new_category(&categories, "  ", None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            validate_new_category(&categories, "base malt", Some(malt.id)),
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            validate_new_category(&categories, "Pale", Some(base.id)),
            Err(DomainError::InvariantViolation(_))
        ));
        assert!(matches!(
            validate_new_category(&categories, "Pale", Some(CategoryId::new())),
            Err(DomainError::NotFound(_))
        ));
    }
}
