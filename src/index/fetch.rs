use futures::future::join_all;

use crate::sources::CatalogSource;
use crate::state::CatalogItem;

/// What: Fetch every key of one chunk concurrently and flatten the results.
///
/// Inputs:
/// - `source`: Remote catalog API.
/// - `keys`: Fetch-group keys of this chunk (leading letters).
///
/// Output:
/// - All items returned for the chunk, in key order; records missing an id or name are dropped.
///
/// Details:
/// - All requests are issued before any is awaited, and all of them settle before returning.
/// - A failing key is logged and contributes nothing; it never cancels its siblings.
pub async fn fetch_chunk<S: CatalogSource + ?Sized>(source: &S, keys: &[String]) -> Vec<CatalogItem> {
    let requests = keys.iter().map(|key| async move {
        match source.search_by_letter(key).await {
            Ok(items) => {
                tracing::debug!(key = %key, count = items.len(), "fetched catalog group");
                items
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "catalog group fetch failed; treating as empty");
                Vec::new()
            }
        }
    });
    join_all(requests)
        .await
        .into_iter()
        .flatten()
        .filter(|it| !it.id.trim().is_empty() && !it.name.trim().is_empty())
        .collect()
}
