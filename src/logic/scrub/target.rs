//! Scroll side effects commanded by the scrubber.

use ratatui::widgets::ListState;

/// Why an indexed scroll could not be performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollError {
    /// The list has not been laid out yet, so row positions are unknown.
    NotMeasured,
    /// The index is past the end of the list.
    OutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for ScrollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrollError::NotMeasured => write!(f, "list layout not measured yet"),
            ScrollError::OutOfRange { index, len } => {
                write!(f, "row {index} out of range for list of {len}")
            }
        }
    }
}

impl std::error::Error for ScrollError {}

/// What: A scrollable list the scrubber can drive.
///
/// Details:
/// - `scroll_to_index` places row `index` at the top of the viewport.
/// - `scroll_to_offset` scrolls to an absolute offset in layout units (pixels for a graphical
///   list, rows for a terminal list) and never fails.
pub trait ScrollTarget {
    fn scroll_to_index(&mut self, index: usize) -> Result<(), ScrollError>;
    fn scroll_to_offset(&mut self, offset: f32);
}

/// What: Terminal results list backed by a ratatui [`ListState`].
///
/// Inputs:
/// - `len`: Number of rows in the current view.
/// - `viewport_rows`: Visible rows, known only after the first draw.
///
/// Details:
/// - Before the first draw (`viewport_rows == None`) indexed scrolls fail with
///   [`ScrollError::NotMeasured`], the same race a graphical list has on first render.
#[derive(Debug, Default)]
pub struct ListViewport {
    pub state: ListState,
    pub len: usize,
    pub viewport_rows: Option<u16>,
}

impl ListViewport {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Default::default()
        }
    }

    /// Record the drawn height; called by the renderer after layout.
    pub fn set_viewport_rows(&mut self, rows: u16) {
        self.viewport_rows = Some(rows);
    }

    /// Update the row count after the filtered view changed.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.state.select(None);
            *self.state.offset_mut() = 0;
        } else if self.state.offset() >= len {
            *self.state.offset_mut() = len - 1;
        }
    }
}

impl ScrollTarget for ListViewport {
    fn scroll_to_index(&mut self, index: usize) -> Result<(), ScrollError> {
        if self.viewport_rows.is_none() {
            return Err(ScrollError::NotMeasured);
        }
        if index >= self.len {
            return Err(ScrollError::OutOfRange {
                index,
                len: self.len,
            });
        }
        *self.state.offset_mut() = index;
        self.state.select(Some(index));
        Ok(())
    }

    fn scroll_to_offset(&mut self, offset: f32) {
        let max = self.len.saturating_sub(1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row = if offset.is_finite() && offset > 0.0 {
            (offset.floor() as usize).min(max)
        } else {
            0
        };
        *self.state.offset_mut() = row;
    }
}
