//! Filtered, sorted results view derived from the catalog snapshot.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::state::{CatalogItem, FilterCriteria, FilteredView};
use crate::util::{contains_ignore_case, match_key, name_cmp};

/// Ordering shared by snapshots and filtered views: display name, then id.
pub fn item_cmp(a: &CatalogItem, b: &CatalogItem) -> std::cmp::Ordering {
    name_cmp(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
}

/// What: Compute the visible results for a snapshot and a set of criteria.
///
/// Inputs:
/// - `snapshot`: Current catalog snapshot (already sorted).
/// - `criteria`: Search text, selected categories, and selected ingredients.
///
/// Output:
/// - Items satisfying every active criterion, in snapshot order.
///
/// Details:
/// - Search: trimmed text matched as a case-insensitive substring of `name`.
/// - Categories: exact membership of `category` when the set is non-empty.
/// - Ingredients: at least one ingredient name in the set (OR), compared case-insensitively;
///   measures are ignored.
/// - The result is re-sorted with [`item_cmp`]; for sorted input this is a no-op.
/// - Pure: no state is read or written besides the arguments.
pub fn recompute(snapshot: &[CatalogItem], criteria: &FilterCriteria) -> FilteredView {
    let needle = match_key(&criteria.search_text);
    let wanted_ingredients: HashSet<String> = criteria
        .selected_ingredients
        .iter()
        .map(|i| match_key(i))
        .filter(|i| !i.is_empty())
        .collect();
    let categories = &criteria.selected_categories;

    let mut out: Vec<CatalogItem> = snapshot
        .iter()
        .filter(|it| contains_ignore_case(&it.name, &needle))
        .filter(|it| categories.is_empty() || categories.contains(&it.category))
        .filter(|it| {
            wanted_ingredients.is_empty()
                || it
                    .ingredient_names()
                    .any(|n| wanted_ingredients.contains(&match_key(n)))
        })
        .cloned()
        .collect();
    out.sort_by(item_cmp);
    Arc::from(out)
}

/// Distinct category names present in `snapshot`, sorted for display.
pub fn categories(snapshot: &[CatalogItem]) -> Vec<String> {
    let set: BTreeSet<&str> = snapshot
        .iter()
        .map(|it| it.category.as_str())
        .filter(|c| !c.trim().is_empty())
        .collect();
    let mut out: Vec<String> = set.into_iter().map(str::to_string).collect();
    out.sort_by(|a, b| name_cmp(a, b));
    out
}

/// What: Distinct ingredient names present in `snapshot`, sorted for display.
///
/// Details:
/// - Spellings differing only in case collapse to the first one encountered,
///   matching how [`recompute`] compares ingredient names.
pub fn ingredients(snapshot: &[CatalogItem]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    for name in snapshot.iter().flat_map(CatalogItem::ingredient_names) {
        if seen.insert(match_key(name)) {
            out.push(name.to_string());
        }
    }
    out.sort_by(|a, b| name_cmp(a, b));
    out
}
