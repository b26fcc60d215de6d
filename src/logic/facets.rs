//! Category and ingredient choices offered to the filter controls.

use std::future::Future;

use crate::logic::filter::{categories, ingredients};
use crate::sources::{CatalogSource, fetch_categories, fetch_ingredients};
use crate::state::CatalogSnapshot;

/// Names offered for the category and ingredient filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub ingredients: Vec<String>,
}

/// What: Fetch the remote facet lists, falling back to names found in the catalog.
///
/// Inputs:
/// - `source`: Catalog API providing the `list.php` lists.
/// - `snapshot`: Produces the catalog snapshot; awaited only if a remote list comes back empty.
///
/// Output:
/// - Both lists, each from the remote service when available, otherwise derived from the
///   snapshot with [`categories`] / [`ingredients`].
///
/// Details:
/// - Both remote lists are requested together. A failed request is logged by the fetch
///   helpers and reads as empty, which triggers the fallback for that list only.
pub async fn resolve_facets<S, F, Fut>(source: &S, snapshot: F) -> Facets
where
    S: CatalogSource + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = CatalogSnapshot>,
{
    let (mut cats, mut ings) = tokio::join!(fetch_categories(source), fetch_ingredients(source));
    if cats.is_empty() || ings.is_empty() {
        let snap = snapshot().await;
        tracing::info!(
            categories_missing = cats.is_empty(),
            ingredients_missing = ings.is_empty(),
            items = snap.len(),
            "deriving facets from catalog snapshot"
        );
        if cats.is_empty() {
            cats = categories(&snap);
        }
        if ings.is_empty() {
            ings = ingredients(&snap);
        }
    }
    Facets {
        categories: cats,
        ingredients: ings,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::index::test_support::{FakeSource, item};

    fn snapshot() -> CatalogSnapshot {
        Arc::from(vec![
            item("1", "Apple Daisy", "Punch", &["Vodka"]),
            item("2", "Banana Fizz", "Shot", &["Rum", "vodka"]),
        ])
    }

    #[tokio::test]
    /// What: An unavailable category list is replaced by the snapshot's categories.
    ///
    /// Inputs:
    /// - Source whose category request fails while the ingredient request succeeds.
    ///
    /// Output:
    /// - Categories from the snapshot; ingredients still from the remote list.
    async fn failed_category_list_falls_back_to_snapshot() {
        let mut source = FakeSource::default();
        source.failing.insert("categories".into());
        let facets = resolve_facets(&source, || async { snapshot() }).await;
        assert_eq!(facets.categories, vec!["Punch", "Shot"]);
        assert_eq!(facets.ingredients, vec!["Gin"]);
    }

    #[tokio::test]
    /// What: Both lists fall back, and ingredient spellings collapse case-insensitively.
    async fn both_lists_fall_back() {
        let mut source = FakeSource::default();
        source.failing.insert("categories".into());
        source.failing.insert("ingredients".into());
        let facets = resolve_facets(&source, || async { snapshot() }).await;
        assert_eq!(facets.categories, vec!["Punch", "Shot"]);
        assert_eq!(facets.ingredients, vec!["Rum", "Vodka"]);
    }

    #[tokio::test]
    /// What: The snapshot is not requested while both remote lists are available.
    async fn snapshot_is_not_loaded_when_remote_lists_work() {
        let source = FakeSource::default();
        let called = AtomicBool::new(false);
        let facets = resolve_facets(&source, || async {
            called.store(true, Ordering::SeqCst);
            snapshot()
        })
        .await;
        assert!(!called.load(Ordering::SeqCst));
        assert_eq!(facets.categories, vec!["Cocktail", "Shot"]);
    }
}
