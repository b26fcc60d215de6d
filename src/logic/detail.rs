//! On-demand detail lookups for the detail view and the favorites list.

use futures::future::join_all;

use crate::sources::CatalogSource;
use crate::state::{CatalogItem, FavoriteSet};

/// What: Resolve the full record for one item id.
///
/// Inputs:
/// - `source`: Remote catalog API.
/// - `id`: Item id selected by the user.
///
/// Output:
/// - `Some(item)` with its derived ingredient list; `None` when there is no detail to show.
///
/// Details:
/// - A blank id returns `None` without a request.
/// - Unknown ids and request failures are logged and surfaced as `None`; the caller never
///   sees an error.
pub async fn resolve_detail<S: CatalogSource + ?Sized>(source: &S, id: &str) -> Option<CatalogItem> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    match source.lookup_by_id(id).await {
        Ok(Some(item)) => {
            tracing::debug!(%id, name = %item.name, "detail resolved");
            Some(item)
        }
        Ok(None) => {
            tracing::info!(%id, "no detail available");
            None
        }
        Err(e) => {
            tracing::error!(%id, error = %e, "detail lookup failed");
            None
        }
    }
}

/// What: Fetch full records for every favorite id.
///
/// Inputs:
/// - `source`: Remote catalog API.
/// - `ids`: Favorite ids.
///
/// Output:
/// - Resolved items sorted like the results list; ids that fail to resolve are left out.
///
/// Details:
/// - Always re-fetches, even when the item is present in the loaded snapshot. Lookups are
///   issued together and joined.
pub async fn resolve_favorites<S: CatalogSource + ?Sized>(
    source: &S,
    ids: &FavoriteSet,
) -> Vec<CatalogItem> {
    let lookups = ids.iter().map(|id| resolve_detail(source, id));
    let mut out: Vec<CatalogItem> = join_all(lookups).await.into_iter().flatten().collect();
    out.sort_by(super::filter::item_cmp);
    tracing::debug!(requested = ids.len(), resolved = out.len(), "favorites resolved");
    out
}

/// Display line for one ingredient: `"<measure> <name>"`, or just the name when unmeasured.
pub fn ingredient_line(ing: &crate::state::Ingredient) -> String {
    if ing.measure.is_empty() {
        ing.name.clone()
    } else {
        format!("{} {}", ing.measure, ing.name)
    }
}
