use futures::future::join_all;

use crate::sources::ImageCache;
use crate::state::CatalogItem;

/// What: Warm the thumbnail of every item concurrently and wait for all of them.
///
/// Inputs:
/// - `images`: Image cache.
/// - `items`: Items about to be published.
///
/// Output:
/// - Number of thumbnails that are cache-resident afterwards.
///
/// Details:
/// - Items without a thumbnail are skipped. Failures are logged at debug level and ignored;
///   warming is best-effort and never blocks an item from being shown once the join ends.
pub async fn prewarm_thumbnails<C: ImageCache + ?Sized>(images: &C, items: &[CatalogItem]) -> usize {
    let warms = items
        .iter()
        .filter(|it| !it.thumbnail.trim().is_empty())
        .map(|it| async move {
            match images.prefetch(&it.thumbnail).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!(id = %it.id, error = %e, "thumbnail prefetch failed");
                    false
                }
            }
        });
    join_all(warms).await.into_iter().filter(|ok| *ok).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::test_support::{FakeImages, item};

    #[tokio::test]
    /// What: Count successful warms and skip items without thumbnails.
    async fn prewarm_counts_successes_and_skips_blank() {
        let images = FakeImages::default();
        let mut blank = item("2", "Banana Fizz", "Shot", &[]);
        blank.thumbnail.clear();
        let mut bad = item("3", "Bad Apple", "Shot", &[]);
        bad.thumbnail = "thumb://bad".into();
        let items = vec![item("1", "Apple Daisy", "Cocktail", &[]), blank, bad];
        assert_eq!(prewarm_thumbnails(&images, &items).await, 1);
        let warmed = images.warmed.lock().unwrap();
        assert_eq!(warmed.len(), 1);
        assert!(warmed.contains("thumb://1"));
    }
}
