//! Progressive catalog loading.
//!
//! The catalog is assembled in chunks of fetch groups (one remote search per
//! leading letter). Each chunk is fetched and its thumbnails warmed before a
//! new sorted snapshot is published, so the UI can render early without ever
//! showing items whose images are not cache-resident yet.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::sources::{CatalogSource, ImageCache};
use crate::state::{CatalogItem, CatalogSnapshot, LoadEvent};

mod fetch;
mod prewarm;

pub use fetch::fetch_chunk;
pub use prewarm::prewarm_thumbnails;

/// What: Tunables for one progressive load.
///
/// Details:
/// - `group_keys` are fetched in order, `group_size` at a time.
/// - `chunk_delay` is a pause between chunks that keeps the UI loop responsive; it has no
///   effect on the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    pub group_keys: Vec<String>,
    pub group_size: usize,
    pub chunk_delay: Duration,
}

impl LoadOptions {
    /// Build from user settings with the default `a..z, 0..9` group keys.
    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        Self {
            group_keys: default_group_keys(),
            group_size: settings.group_size,
            chunk_delay: Duration::from_millis(settings.chunk_delay_ms),
        }
    }

    /// Number of chunks the keys split into.
    pub fn chunk_count(&self) -> usize {
        self.group_keys.len().div_ceil(self.group_size.max(1))
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            group_keys: default_group_keys(),
            group_size: 5,
            chunk_delay: Duration::from_millis(50),
        }
    }
}

/// Every first character the remote search-by-letter endpoint accepts.
pub fn default_group_keys() -> Vec<String> {
    ('a'..='z')
        .chain('0'..='9')
        .map(|c| c.to_string())
        .collect()
}

/// Integer percentage of `done` out of `total` chunks, capped at 100.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from((done.min(total) * 100) / total).unwrap_or(100)
}

/// Items of `fetched` whose id is neither in `seen` nor earlier in `fetched`, in order.
fn unseen_items(fetched: Vec<CatalogItem>, seen: &HashSet<String>) -> Vec<CatalogItem> {
    let mut chunk_ids: HashSet<String> = HashSet::new();
    fetched
        .into_iter()
        .filter(|it| !seen.contains(&it.id) && chunk_ids.insert(it.id.clone()))
        .collect()
}

/// What: Merge newly fetched items into the accumulator and return the next snapshot.
///
/// Inputs:
/// - `acc`: Running accumulator (kept sorted by the previous call).
/// - `seen`: Ids already in `acc`.
/// - `fresh`: Items fetched by the latest chunk.
///
/// Output:
/// - A complete, sorted, duplicate-free snapshot of the accumulator.
///
/// Details:
/// - Items are ordered by [`crate::util::name_cmp`] with the id as final tiebreak so the
///   order is strict even when two drinks share a name.
fn merge_into(
    acc: &mut Vec<CatalogItem>,
    seen: &mut HashSet<String>,
    fresh: Vec<CatalogItem>,
) -> CatalogSnapshot {
    for item in fresh {
        if seen.insert(item.id.clone()) {
            acc.push(item);
        }
    }
    acc.sort_by(crate::logic::filter::item_cmp);
    Arc::from(acc.clone())
}

/// What: Load the catalog chunk by chunk, publishing snapshots and progress.
///
/// Inputs:
/// - `source`: Remote catalog API.
/// - `images`: Thumbnail cache to warm before items become visible.
/// - `opts`: Group keys, chunk size, and inter-chunk delay.
/// - `events`: Channel receiving [`LoadEvent`]s for the UI.
/// - `cancel`: Token tied to the lifetime of the screen that started the load.
///
/// Output:
/// - The last published snapshot (empty if nothing was loaded).
///
/// Details:
/// - Per chunk: fan out one search per key and join; failures become empty results and are
///   logged. Then warm every new thumbnail and join; warm failures are ignored.
/// - After each chunk a fresh snapshot is sent, followed by the completed percentage.
/// - On normal completion progress goes back to `0` and `Finished { cancelled: false }` is sent.
/// - When `cancel` fires, or the receiver is dropped, the load stops at the next await point
///   and publishes neither snapshot nor progress afterwards.
pub async fn run_progressive_load<S, C>(
    source: &S,
    images: &C,
    opts: &LoadOptions,
    events: &mpsc::UnboundedSender<LoadEvent>,
    cancel: &CancellationToken,
) -> CatalogSnapshot
where
    S: CatalogSource + ?Sized,
    C: ImageCache + ?Sized,
{
    let size = opts.group_size.max(1);
    let total = opts.chunk_count();
    let mut acc: Vec<CatalogItem> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut snapshot: CatalogSnapshot = Arc::from(Vec::new());
    tracing::info!(
        keys = opts.group_keys.len(),
        chunks = total,
        group_size = size,
        "catalog load started"
    );

    for (i, chunk) in opts.group_keys.chunks(size).enumerate() {
        if cancel.is_cancelled() || events.is_closed() {
            return stop_cancelled(events, snapshot);
        }
        let fetched = tokio::select! {
            () = cancel.cancelled() => return stop_cancelled(events, snapshot),
            v = fetch_chunk(source, chunk) => v,
        };
        let fresh = unseen_items(fetched, &seen);
        let warmed = tokio::select! {
            () = cancel.cancelled() => return stop_cancelled(events, snapshot),
            n = prewarm_thumbnails(images, &fresh) => n,
        };
        let added = fresh.len();
        snapshot = merge_into(&mut acc, &mut seen, fresh);
        let pct = percent(i + 1, total);
        tracing::debug!(
            chunk = i + 1,
            added,
            warmed,
            total_items = snapshot.len(),
            progress = pct,
            "catalog chunk published"
        );
        if events.send(LoadEvent::Snapshot(Arc::clone(&snapshot))).is_err()
            || events.send(LoadEvent::Progress(pct)).is_err()
        {
            tracing::debug!("catalog receiver dropped; stopping load");
            return snapshot;
        }
        if i + 1 < total && !opts.chunk_delay.is_zero() {
            tokio::select! {
                () = cancel.cancelled() => return stop_cancelled(events, snapshot),
                () = tokio::time::sleep(opts.chunk_delay) => {}
            }
        }
    }

    let _ = events.send(LoadEvent::Progress(0));
    let _ = events.send(LoadEvent::Finished {
        total: snapshot.len(),
        cancelled: false,
    });
    tracing::info!(count = snapshot.len(), "catalog load finished");
    snapshot
}

fn stop_cancelled(
    events: &mpsc::UnboundedSender<LoadEvent>,
    snapshot: CatalogSnapshot,
) -> CatalogSnapshot {
    tracing::info!(count = snapshot.len(), "catalog load cancelled");
    let _ = events.send(LoadEvent::Finished {
        total: snapshot.len(),
        cancelled: true,
    });
    snapshot
}

/// What: Handle to a background load; dropping it cancels the load.
///
/// Details:
/// - Owned by the browsing screen. Teardown drops the handle, which fires the token so no
///   state is published after the screen is gone.
#[derive(Debug)]
pub struct LoadHandle {
    cancel: CancellationToken,
    join: Option<tokio::task::JoinHandle<CatalogSnapshot>>,
}

impl LoadHandle {
    /// Request cancellation without waiting.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the background task has ended.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(tokio::task::JoinHandle::is_finished)
    }

    /// Wait for the load to end and return its final snapshot.
    ///
    /// A panicked task yields an empty snapshot (logged).
    pub async fn join(mut self) -> CatalogSnapshot {
        let Some(join) = self.join.take() else {
            return Arc::from(Vec::new());
        };
        match join.await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "catalog load task failed");
                Arc::from(Vec::new())
            }
        }
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// What: Spawn [`run_progressive_load`] on the runtime and return its handle.
///
/// Inputs:
/// - `source`, `images`: Shared collaborators.
/// - `opts`: Load options.
/// - `events`: Channel receiving [`LoadEvent`]s.
///
/// Output:
/// - [`LoadHandle`] that cancels the load when dropped.
pub fn spawn_progressive_load(
    source: Arc<dyn CatalogSource>,
    images: Arc<dyn ImageCache>,
    opts: LoadOptions,
    events: mpsc::UnboundedSender<LoadEvent>,
) -> LoadHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let join = tokio::spawn(async move {
        run_progressive_load(&*source, &*images, &opts, &events, &token).await
    });
    LoadHandle {
        cancel,
        join: Some(join),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{FakeImages, FakeSource, item};
    use super::*;

    fn opts(keys: &[&str], group_size: usize) -> LoadOptions {
        LoadOptions {
            group_keys: keys.iter().map(|k| (*k).to_string()).collect(),
            group_size,
            chunk_delay: Duration::ZERO,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<LoadEvent>) -> Vec<LoadEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    fn progress_values(events: &[LoadEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                LoadEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn chunk_count_and_percent() {
        assert_eq!(opts(&["a", "b", "c"], 2).chunk_count(), 2);
        assert_eq!(opts(&["a", "b", "c"], 0).chunk_count(), 3);
        assert_eq!(LoadOptions::default().chunk_count(), 8);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 0), 100);
        assert_eq!(default_group_keys().len(), 36);
    }

    #[test]
    /// What: Ids repeated inside one chunk or seen in an earlier chunk are dropped once.
    fn unseen_items_dedups_within_and_across_chunks() {
        let seen: HashSet<String> = ["1".to_string()].into();
        let fetched = vec![
            item("1", "Apple Daisy", "Cocktail", &[]),
            item("2", "Banana Fizz", "Shot", &[]),
            item("3", "Bellini", "Cocktail", &[]),
            item("2", "Banana Fizz", "Shot", &[]),
        ];
        let ids: Vec<String> = unseen_items(fetched, &seen).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[tokio::test]
    /// What: A drink returned by two keys of the same chunk is warmed and published once.
    async fn duplicate_in_chunk_is_warmed_once() {
        let mut source = FakeSource::default();
        let dup = item("7", "Bramble", "Cocktail", &[]);
        source.by_letter.insert("a".into(), vec![dup.clone()]);
        source.by_letter.insert("b".into(), vec![dup]);
        let images = FakeImages::default();
        let attempts = Arc::clone(&images.attempts);
        let (tx, _rx) = mpsc::unbounded_channel();
        let snap = run_progressive_load(
            &source,
            &images,
            &opts(&["a", "b"], 2),
            &tx,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(snap.len(), 1);
        assert_eq!(*attempts.lock().unwrap(), vec!["thumb://7".to_string()]);
    }

    #[tokio::test]
    /// What: A failed group does not abort the load.
    ///
    /// Inputs:
    /// - Two groups of one key each; the first fails with a network error.
    ///
    /// Output:
    /// - Final snapshot holds only the second group's items; progress reaches 100 then 0.
    async fn failed_group_degrades_to_empty_and_load_completes() {
        let mut source = FakeSource::default();
        source.failing.insert("a".into());
        source.by_letter.insert(
            "b".into(),
            vec![item("2", "Banana Fizz", "Cocktail", &[]), item("3", "Bellini", "Cocktail", &[])],
        );
        let images = FakeImages::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let snap = run_progressive_load(
            &source,
            &images,
            &opts(&["a", "b"], 1),
            &tx,
            &CancellationToken::new(),
        )
        .await;
        let ids: Vec<&str> = snap.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);

        let events = drain(&mut rx);
        assert_eq!(progress_values(&events), vec![50, 100, 0]);
        assert!(matches!(
            events.last(),
            Some(LoadEvent::Finished {
                total: 2,
                cancelled: false
            })
        ));
    }

    #[tokio::test]
    /// What: Snapshots grow monotonically, stay sorted, and never repeat an id.
    ///
    /// Inputs:
    /// - Three chunks whose results overlap (the same drink returned twice) and arrive unsorted.
    ///
    /// Output:
    /// - Every published snapshot is strictly sorted by name, duplicate-free, and no smaller
    ///   than the previous one; progress is non-decreasing before the final reset.
    async fn snapshots_are_sorted_unique_and_growing() {
        let mut source = FakeSource::default();
        source.by_letter.insert(
            "c".into(),
            vec![item("3", "Cherry Sour", "Cocktail", &[]), item("9", "cuba libre", "Cocktail", &[])],
        );
        source
            .by_letter
            .insert("a".into(), vec![item("1", "Apple Daisy", "Cocktail", &[])]);
        source.by_letter.insert(
            "b".into(),
            vec![item("2", "Banana Fizz", "Shot", &[]), item("1", "Apple Daisy", "Cocktail", &[])],
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        run_progressive_load(
            &source,
            &FakeImages::default(),
            &opts(&["c", "a", "b"], 1),
            &tx,
            &CancellationToken::new(),
        )
        .await;
        let events = drain(&mut rx);
        let mut last_len = 0;
        for ev in &events {
            if let LoadEvent::Snapshot(s) = ev {
                assert!(s.len() >= last_len);
                last_len = s.len();
                let mut ids = HashSet::new();
                assert!(s.iter().all(|i| ids.insert(i.id.clone())));
                assert!(s.windows(2).all(|w| {
                    crate::util::name_cmp(&w[0].name, &w[1].name) == std::cmp::Ordering::Less
                }));
            }
        }
        assert_eq!(last_len, 4);
        let progress = progress_values(&events);
        let (last, rest) = progress.split_last().unwrap();
        assert_eq!(*last, 0);
        assert!(rest.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(rest.last(), Some(&100));
    }

    #[tokio::test]
    /// What: Items only become visible after their thumbnails are warm.
    ///
    /// Inputs:
    /// - Load spawned in the background; the test inspects the cache as each snapshot arrives.
    ///
    /// Output:
    /// - Every item of every received snapshot has its thumbnail in the cache, except the one
    ///   whose image fails to warm (failures do not block publication).
    async fn thumbnails_are_warm_before_publish() {
        let mut source = FakeSource::default();
        source
            .by_letter
            .insert("a".into(), vec![item("1", "Apple Daisy", "Cocktail", &[])]);
        let mut broken = item("2", "Bad Apple", "Cocktail", &[]);
        broken.thumbnail = "thumb://bad".into();
        source.by_letter.insert("b".into(), vec![broken]);
        let images = FakeImages::default();
        let warmed = Arc::clone(&images.warmed);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_progressive_load(
            Arc::new(source),
            Arc::new(images),
            opts(&["a", "b"], 1),
            tx,
        );
        while let Some(ev) = rx.recv().await {
            match ev {
                LoadEvent::Snapshot(s) => {
                    let cache = warmed.lock().unwrap();
                    for it in s.iter().filter(|i| !i.thumbnail.contains("bad")) {
                        assert!(cache.contains(&it.thumbnail), "{} not warm", it.id);
                    }
                }
                LoadEvent::Finished { .. } => break,
                LoadEvent::Progress(_) => {}
            }
        }
        assert_eq!(handle.join().await.len(), 2);
    }

    #[tokio::test]
    /// What: Cancelling stops an in-flight chunk and suppresses further publication.
    ///
    /// Inputs:
    /// - First chunk succeeds; second chunk never resolves.
    ///
    /// Output:
    /// - After cancellation only `Finished { cancelled: true }` follows the first chunk's events.
    async fn cancellation_stops_in_flight_chunk() {
        let mut source = FakeSource::default();
        source
            .by_letter
            .insert("a".into(), vec![item("1", "Apple Daisy", "Cocktail", &[])]);
        source.hanging.insert("b".into());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_progressive_load(
            Arc::new(source),
            Arc::new(FakeImages::default()),
            opts(&["a", "b"], 1),
            tx,
        );
        let first = rx.recv().await;
        assert!(matches!(first, Some(LoadEvent::Snapshot(ref s)) if s.len() == 1));
        assert!(matches!(rx.recv().await, Some(LoadEvent::Progress(50))));
        handle.cancel();
        let snap = handle.join().await;
        assert_eq!(snap.len(), 1);
        let rest = drain(&mut rx);
        assert_eq!(rest.len(), 1);
        assert!(matches!(
            rest[0],
            LoadEvent::Finished {
                total: 1,
                cancelled: true
            }
        ));
    }

    #[tokio::test]
    /// What: Dropping the handle (screen teardown) cancels the background load.
    async fn dropping_handle_cancels_load() {
        let mut source = FakeSource::default();
        source.hanging.insert("a".into());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_progressive_load(
            Arc::new(source),
            Arc::new(FakeImages::default()),
            opts(&["a"], 1),
            tx,
        );
        drop(handle);
        let ev = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .ok()
            .flatten();
        assert!(matches!(
            ev,
            Some(LoadEvent::Finished {
                cancelled: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn empty_key_list_finishes_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let snap = run_progressive_load(
            &FakeSource::default(),
            &FakeImages::default(),
            &opts(&[], 3),
            &tx,
            &CancellationToken::new(),
        )
        .await;
        assert!(snap.is_empty());
        let events = drain(&mut rx);
        assert_eq!(progress_values(&events), vec![0]);
    }
}
