//! Browsing screen state: snapshot, filter criteria, and the derived view.

use std::sync::Arc;

use crate::logic::filter::recompute;
use crate::state::{CatalogSnapshot, FilterCriteria, FilteredView, LoadEvent};

/// What: Value store behind the cocktail browsing screen.
///
/// Inputs:
/// - Loader events and user edits, each through its own update method.
///
/// Output:
/// - Read-only accessors for the snapshot, criteria, filtered view, and load progress.
///
/// Details:
/// - Every update that touches the snapshot or a criterion recomputes the filtered view
///   immediately, so `view()` is always `recompute(snapshot, criteria)`.
/// - Snapshot and view are shared `Arc`s replaced wholesale; a renderer holding the previous
///   value keeps a complete copy.
#[derive(Clone, Debug)]
pub struct BrowserState {
    snapshot: CatalogSnapshot,
    criteria: FilterCriteria,
    view: FilteredView,
    loading: bool,
    progress: u8,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            snapshot: Arc::from(Vec::new()),
            criteria: FilterCriteria::default(),
            view: Arc::from(Vec::new()),
            loading: false,
            progress: 0,
        }
    }
}

impl BrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Load progress in percent, `0..=100`.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    fn refresh(&mut self) {
        self.view = recompute(&self.snapshot, &self.criteria);
    }

    /// Mark a load as started.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.progress = 0;
    }

    /// Replace the catalog snapshot.
    pub fn set_snapshot(&mut self, snapshot: CatalogSnapshot) {
        self.snapshot = snapshot;
        self.refresh();
    }

    /// Replace the search text.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.criteria.search_text {
            return;
        }
        self.criteria.search_text = text;
        self.refresh();
    }

    /// Add `category` to the selection, or remove it if already selected.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.criteria.selected_categories.remove(category) {
            self.criteria
                .selected_categories
                .insert(category.to_string());
        }
        self.refresh();
    }

    /// Add `ingredient` to the selection, or remove it if already selected.
    pub fn toggle_ingredient(&mut self, ingredient: &str) {
        if !self.criteria.selected_ingredients.remove(ingredient) {
            self.criteria
                .selected_ingredients
                .insert(ingredient.to_string());
        }
        self.refresh();
    }

    /// Replace all criteria at once.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria == self.criteria {
            return;
        }
        self.criteria = criteria;
        self.refresh();
    }

    /// Drop every criterion.
    pub fn clear_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    /// What: Apply one loader event.
    ///
    /// Output:
    /// - `true` when the load finished with this event.
    ///
    /// Details:
    /// - Progress never moves backwards while loading, except for the final reset to `0`
    ///   which is accepted as the end of the load.
    pub fn apply_load_event(&mut self, event: LoadEvent) -> bool {
        match event {
            LoadEvent::Snapshot(s) => {
                self.set_snapshot(s);
                false
            }
            LoadEvent::Progress(p) => {
                let p = p.min(100);
                if p == 0 || p >= self.progress {
                    self.progress = p;
                }
                false
            }
            LoadEvent::Finished { total, cancelled } => {
                tracing::debug!(total, cancelled, "browser load finished");
                self.loading = false;
                self.progress = 0;
                true
            }
        }
    }
}
