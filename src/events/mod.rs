//! Terminal input for the scrubber rail.
//!
//! Maps crossterm mouse events inside the rail's screen rectangle to scrubber
//! taps, drag samples, and releases.

use std::time::Instant;

use crossterm::event::{Event as CEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::logic::scrub::{HideToken, ScrollTarget, Scrubber, letter_at};
use crate::state::CatalogItem;

/// Screen rectangle as `(x, y, width, height)` in terminal cells.
pub type Rect = (u16, u16, u16, u16);

/// What: Pointer state of the rail between mouse events.
///
/// Details:
/// - `rect` is set by the renderer after each draw; `None` hides the rail from input.
/// - A gesture starts with a left press inside `rect` and lasts until the button is released,
///   even if the pointer leaves the rail while dragging.
#[derive(Clone, Copy, Debug, Default)]
pub struct RailInput {
    pub rect: Option<Rect>,
    pressed: bool,
}

impl RailInput {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            pressed: false,
        }
    }

    /// `true` while a gesture that started on the rail is in progress.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    let (x, y, w, h) = rect;
    column >= x && column < x.saturating_add(w) && row >= y && row < y.saturating_add(h)
}

/// Rail coordinate of the centre of terminal `row`, clamped to the rail.
fn rail_y(rect: Rect, row: u16) -> f32 {
    let (_, y, _, h) = rect;
    let rel = row.saturating_sub(y).min(h.saturating_sub(1));
    f32::from(rel) + 0.5
}

/// What: Dispatch one mouse event to the scrubber.
///
/// Inputs:
/// - `m`: Mouse event from crossterm.
/// - `input`: Rail rectangle and gesture state.
/// - `scrubber`, `view`, `target`: Scrubber, the visible list, and the list to scroll.
/// - `now`: Event time.
///
/// Output:
/// - The hide token issued for this event, if the event belonged to the rail.
///
/// Details:
/// - Left press inside the rail jumps to the label under the pointer and starts a gesture;
///   the bubble stays up until the button is released.
/// - Left drag during a gesture is one drag sample.
/// - Releasing the button ends the gesture.
pub fn handle_rail_mouse<T: ScrollTarget + ?Sized>(
    m: MouseEvent,
    input: &mut RailInput,
    scrubber: &mut Scrubber,
    view: &[CatalogItem],
    target: &mut T,
    now: Instant,
) -> Option<HideToken> {
    let rect = input.rect?;
    scrubber.set_rail_height(f32::from(rect.3));
    match m.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !contains(rect, m.column, m.row) {
                return None;
            }
            input.pressed = true;
            let y = rail_y(rect, m.row);
            let layout = scrubber.layout();
            let letter = letter_at(layout.alphabet, y, layout.rail_height);
            scrubber
                .press(letter, view, target, now)
                .map(|(_, token)| token)
        }
        MouseEventKind::Drag(MouseButton::Left) if input.pressed => {
            let (_, token) = scrubber.drag_to(rail_y(rect, m.row), view, target, now);
            Some(token)
        }
        MouseEventKind::Up(MouseButton::Left) if input.pressed => {
            input.pressed = false;
            Some(scrubber.release(now))
        }
        _ => None,
    }
}

/// What: Dispatch a terminal event to the rail.
///
/// Output:
/// - The hide token for rail mouse events; `None` for everything else.
///
/// Details:
/// - A resize drops the rail rectangle until the next draw reports it again and ends any
///   gesture in progress.
pub fn handle_event<T: ScrollTarget + ?Sized>(
    ev: CEvent,
    input: &mut RailInput,
    scrubber: &mut Scrubber,
    view: &[CatalogItem],
    target: &mut T,
    now: Instant,
) -> Option<HideToken> {
    match ev {
        CEvent::Mouse(m) => handle_rail_mouse(m, input, scrubber, view, target, now),
        CEvent::Resize(..) => {
            input.rect = None;
            std::mem::take(&mut input.pressed).then(|| scrubber.release(now))
        }
        _ => None,
    }
}
