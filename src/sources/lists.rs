use serde_json::Value;

use super::CatalogSource;

/// What: Extract a sorted, de-duplicated list of names from a `list.php` response.
///
/// Inputs:
/// - `v`: Response body shaped like `{"drinks": [{key: name}, ...]}`.
/// - `key`: Field holding the name (`strCategory` or `strIngredient1`).
///
/// Output:
/// - Non-blank names sorted with [`crate::util::name_cmp`].
pub(super) fn parse_names(v: &Value, key: &str) -> Vec<String> {
    let mut out: Vec<String> = v
        .get("drinks")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(|e| crate::util::s(e, key))
                .filter(|n| !n.is_empty())
                .collect()
        })
        .unwrap_or_default();
    out.sort_by(|a, b| crate::util::name_cmp(a, b));
    out.dedup();
    out
}

/// What: Fetch the category facet list, degrading to empty on failure.
///
/// Inputs:
/// - `source`: Catalog API.
///
/// Output:
/// - Category names; empty when the request fails (the failure is logged).
pub async fn fetch_categories<S: CatalogSource + ?Sized>(source: &S) -> Vec<String> {
    match source.list_categories().await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "failed to list categories");
            Vec::new()
        }
    }
}

/// What: Fetch the ingredient facet list, degrading to empty on failure.
///
/// Inputs:
/// - `source`: Catalog API.
///
/// Output:
/// - Ingredient names; empty when the request fails (the failure is logged).
pub async fn fetch_ingredients<S: CatalogSource + ?Sized>(source: &S) -> Vec<String> {
    match source.list_ingredients().await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "failed to list ingredients");
            Vec::new()
        }
    }
}
