//! Core value types shared by sources, the loader, filtering, and the scrubber.

use std::collections::BTreeSet;
use std::sync::Arc;

/// One `(ingredient, measure)` line of a recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Ingredient {
    /// Ingredient display name, e.g. `Light rum`.
    pub name: String,
    /// Free-form measure, e.g. `1 1/2 oz`; empty when the source gave none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub measure: String,
}

/// What: Represent a single drink of the catalog.
///
/// Inputs:
/// - Built from remote search/lookup records.
///
/// Output:
/// - Rendered by list and detail views; matched by the filter engine.
///
/// Details:
/// - Immutable once fetched. `id` is the stable identity; `name` is the sort and search key.
/// - Search-by-letter records already carry the full recipe, so `ingredients` is usually
///   populated for snapshot items too.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Thumbnail image locator.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instructions: String,
    /// Full-size image locator.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
}

impl CatalogItem {
    /// Iterate over ingredient names only; measures play no part in matching.
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.name.as_str())
    }
}

/// Complete, consistent, name-sorted view of the catalog at a point in time.
///
/// Replaced wholesale on every publish; readers holding an older `Arc` keep a
/// complete prior value.
pub type CatalogSnapshot = Arc<[CatalogItem]>;

/// Name-ordered subsequence of a snapshot satisfying the active filters.
pub type FilteredView = Arc<[CatalogItem]>;

/// Durable set of favorite item ids.
pub type FavoriteSet = BTreeSet<String>;

/// Filter inputs for the results view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against `name`; blank means no restriction.
    pub search_text: String,
    /// Exact category names; empty means no restriction.
    pub selected_categories: BTreeSet<String>,
    /// Ingredient names with OR semantics; empty means no restriction.
    pub selected_ingredients: BTreeSet<String>,
}

impl FilterCriteria {
    /// Whether any criterion restricts the view.
    pub fn is_active(&self) -> bool {
        !self.search_text.trim().is_empty()
            || !self.selected_categories.is_empty()
            || !self.selected_ingredients.is_empty()
    }
}

/// Progress notifications published by the progressive loader.
#[derive(Clone, Debug)]
pub enum LoadEvent {
    /// A new complete, sorted snapshot after a chunk finished.
    Snapshot(CatalogSnapshot),
    /// Percentage of chunks completed, `0..=100`, non-decreasing within one load.
    Progress(u8),
    /// The load ended; `cancelled` is `true` when it stopped early.
    Finished { total: usize, cancelled: bool },
}

/// Transient state of the alphabetical scrubber bubble.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrubState {
    /// Bucket label currently under the pointer, e.g. `'#'` or `'B'`.
    pub active_letter: Option<char>,
    /// Whether the letter bubble should be drawn.
    pub visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Blank search text and empty sets leave the criteria inactive.
    fn criteria_activity_ignores_blank_search() {
        let mut c = FilterCriteria {
            search_text: "   ".into(),
            ..Default::default()
        };
        assert!(!c.is_active());
        c.selected_ingredients.insert("Gin".into());
        assert!(c.is_active());
    }

    #[test]
    /// What: Round-trip an item through serde and check empty fields are omitted.
    fn catalog_item_serializes_compactly() {
        let item = CatalogItem {
            id: "11000".into(),
            name: "Mojito".into(),
            ingredients: vec![Ingredient {
                name: "Mint".into(),
                measure: String::new(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"id":"11000","name":"Mojito","ingredients":[{"name":"Mint"}]}"#
        );
        let back: CatalogItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.ingredient_names().collect::<Vec<_>>(), vec!["Mint"]);
    }
}
