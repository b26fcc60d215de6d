//! Alphabetical scrubber: a side rail that jumps the results list to a letter.
//!
//! The geometry (rail position to letter, letter to row) lives in [`geometry`]
//! as pure functions. [`Scrubber`] owns the transient bubble state and issues
//! scroll commands through a [`ScrollTarget`].

use std::time::{Duration, Instant};

use crate::state::{CatalogItem, ScrubState};

pub mod geometry;
pub mod target;

pub use geometry::{Alphabet, OTHER_BUCKET, bucket_index, bucket_of, index_for_letter, letter_at};
pub use target::{ListViewport, ScrollError, ScrollTarget};

/// What: Expiring token for the letter bubble.
///
/// Details:
/// - Every tap and drag sample issues a new token. Only the most recent token can hide the
///   bubble, so a timer started by an earlier gesture never hides a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HideToken {
    generation: u64,
    pub deadline: Instant,
}

/// Geometry of the rail and of the list rows it drives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailLayout {
    pub alphabet: Alphabet,
    /// Rail height in layout units.
    pub rail_height: f32,
    /// Height of one list row, used for the approximate fallback offset.
    pub row_height: f32,
    /// Items per row in a grid layout.
    pub columns: usize,
}

impl Default for RailLayout {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::Full,
            rail_height: 27.0,
            row_height: 1.0,
            columns: 1,
        }
    }
}

impl RailLayout {
    /// Approximate offset of `index` when the list cannot scroll by index.
    pub fn approx_offset(&self, index: usize) -> f32 {
        let row = index / self.columns.max(1);
        #[allow(clippy::cast_precision_loss)]
        let row = row as f32;
        row * self.row_height.max(0.0)
    }
}

/// What: Scrubber state machine driving a scrollable results list.
///
/// Inputs:
/// - Taps on a rail label, drag samples along the rail, releases, and clock ticks.
///
/// Output:
/// - Scroll commands on a [`ScrollTarget`] and a [`ScrubState`] for the bubble.
///
/// Details:
/// - Each drag sample is handled on its own; only the current letter is remembered.
/// - If the list is not measured yet, the scrubber scrolls to the top and keeps the target
///   row pending until [`Scrubber::on_layout_stable`] retries it.
#[derive(Debug)]
pub struct Scrubber {
    layout: RailLayout,
    hide_after: Duration,
    state: ScrubState,
    generation: u64,
    hide_at: Option<Instant>,
    dragging: bool,
    pending_row: Option<usize>,
}

impl Scrubber {
    pub fn new(layout: RailLayout, hide_after: Duration) -> Self {
        Self {
            layout,
            hide_after,
            state: ScrubState::default(),
            generation: 0,
            hide_at: None,
            dragging: false,
            pending_row: None,
        }
    }

    /// Build from user settings for a rail of `rail_height` units.
    pub fn from_settings(settings: &crate::config::Settings, rail_height: f32) -> Self {
        Self::new(
            RailLayout {
                alphabet: settings.scrub_alphabet,
                rail_height,
                row_height: settings.row_height,
                columns: settings.grid_columns,
            },
            Duration::from_millis(settings.scrub_hide_ms),
        )
    }

    pub fn state(&self) -> ScrubState {
        self.state
    }

    pub fn layout(&self) -> RailLayout {
        self.layout
    }

    /// Update the rail height after a resize.
    pub fn set_rail_height(&mut self, rail_height: f32) {
        self.layout.rail_height = rail_height;
    }

    /// Row waiting for a retry after an unmeasured scroll, if any.
    pub fn pending_row(&self) -> Option<usize> {
        self.pending_row
    }

    fn issue_token(&mut self, now: Instant) -> HideToken {
        self.generation += 1;
        let deadline = now + self.hide_after;
        self.hide_at = Some(deadline);
        HideToken {
            generation: self.generation,
            deadline,
        }
    }

    fn show(&mut self, letter: char) {
        self.state = ScrubState {
            active_letter: Some(letter),
            visible: true,
        };
    }

    /// What: Scroll `target` to the first row of `letter` in `view`.
    ///
    /// Output:
    /// - `Some(row)` when a row matched (scrolled or pending); `None` when nothing matched.
    ///
    /// Details:
    /// - No matching row means no scroll command at all, and any row still pending from an
    ///   earlier gesture is dropped.
    /// - An unmeasured list gets `scroll_to_offset(0.0)` and the row is kept for a retry.
    fn jump<T: ScrollTarget + ?Sized>(
        &mut self,
        letter: char,
        view: &[CatalogItem],
        target: &mut T,
    ) -> Option<usize> {
        self.pending_row = None;
        let Some(row) = index_for_letter(view, letter, self.layout.alphabet) else {
            tracing::debug!(%letter, "no row for letter");
            return None;
        };
        match target.scroll_to_index(row) {
            Ok(()) => {}
            Err(ScrollError::NotMeasured) => {
                tracing::debug!(%letter, row, "list not measured; resetting to top");
                target.scroll_to_offset(0.0);
                self.pending_row = Some(row);
            }
            Err(e) => {
                tracing::warn!(%letter, row, error = %e, "scrub target rejected row");
                return None;
            }
        }
        Some(row)
    }

    /// What: Handle a tap on a rail label.
    ///
    /// Inputs:
    /// - `letter`: Tapped label (case-insensitive).
    /// - `view`: Currently visible list.
    /// - `target`: List to scroll.
    /// - `now`: Current time.
    ///
    /// Output:
    /// - `(row, token)`: the matched row, if any, and the hide token for this tap; `None` when
    ///   the label is not part of the rail.
    pub fn tap<T: ScrollTarget + ?Sized>(
        &mut self,
        letter: char,
        view: &[CatalogItem],
        target: &mut T,
        now: Instant,
    ) -> Option<(Option<usize>, HideToken)> {
        self.snap_to(letter, view, target, now, false)
    }

    /// What: Start a press-and-hold gesture on a rail label.
    ///
    /// Output:
    /// - Same as [`Scrubber::tap`].
    ///
    /// Details:
    /// - Jumps like a tap, but the gesture stays active until [`Scrubber::release`], so the
    ///   bubble is not hidden while the pointer is held down.
    pub fn press<T: ScrollTarget + ?Sized>(
        &mut self,
        letter: char,
        view: &[CatalogItem],
        target: &mut T,
        now: Instant,
    ) -> Option<(Option<usize>, HideToken)> {
        self.snap_to(letter, view, target, now, true)
    }

    fn snap_to<T: ScrollTarget + ?Sized>(
        &mut self,
        letter: char,
        view: &[CatalogItem],
        target: &mut T,
        now: Instant,
        held: bool,
    ) -> Option<(Option<usize>, HideToken)> {
        let letter = self.layout.alphabet.normalize(letter)?;
        self.dragging = held;
        self.show(letter);
        let row = self.jump(letter, view, target);
        Some((row, self.issue_token(now)))
    }

    /// What: Handle one drag sample at rail coordinate `y`.
    ///
    /// Output:
    /// - The matched row (if the letter changed and matched) and a fresh hide token.
    ///
    /// Details:
    /// - Scrolls only when the letter under the pointer differs from the current one, so a
    ///   burst of samples inside one bucket issues a single scroll.
    pub fn drag_to<T: ScrollTarget + ?Sized>(
        &mut self,
        y: f32,
        view: &[CatalogItem],
        target: &mut T,
        now: Instant,
    ) -> (Option<usize>, HideToken) {
        let letter = letter_at(self.layout.alphabet, y, self.layout.rail_height);
        let changed = !self.dragging || self.state.active_letter != Some(letter);
        self.dragging = true;
        self.show(letter);
        let row = if changed {
            self.jump(letter, view, target)
        } else {
            None
        };
        (row, self.issue_token(now))
    }

    /// End of a drag; the bubble hides `hide_after` from now.
    pub fn release(&mut self, now: Instant) -> HideToken {
        self.dragging = false;
        self.issue_token(now)
    }

    /// What: Hide the bubble if `token` is still the latest and has expired.
    ///
    /// Output:
    /// - `true` when the bubble was hidden by this call.
    pub fn expire(&mut self, token: HideToken, now: Instant) -> bool {
        if token.generation != self.generation || self.dragging || now < token.deadline {
            return false;
        }
        self.hide_at = None;
        self.state = ScrubState::default();
        true
    }

    /// Clock tick from the UI loop; hides the bubble once the latest deadline passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) => self.expire(
                HideToken {
                    generation: self.generation,
                    deadline,
                },
                now,
            ),
            None => false,
        }
    }

    /// What: Retry a pending row once the list has been laid out.
    ///
    /// Output:
    /// - `true` when a pending row was handled.
    ///
    /// Details:
    /// - Tries the exact indexed scroll first and falls back to
    ///   [`RailLayout::approx_offset`] if the list still cannot scroll by index.
    pub fn on_layout_stable<T: ScrollTarget + ?Sized>(&mut self, target: &mut T) -> bool {
        let Some(row) = self.pending_row.take() else {
            return false;
        };
        if let Err(e) = target.scroll_to_index(row) {
            let offset = self.layout.approx_offset(row);
            tracing::debug!(row, offset, error = %e, "indexed retry failed; using approximate offset");
            target.scroll_to_offset(offset);
        }
        true
    }
}
