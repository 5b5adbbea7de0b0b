//! Editor state shared between the JS-facing API and DOM event handlers.

use crate::renderer::{Canvas2DSurface, HtmlImage};
use meme_canvas_core::{MemeSession, Point, PointerEvent, Result};

/// Which pointer transition a DOM event represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

impl PointerKind {
    /// DOM event name bound for this transition.
    pub fn event_name(self) -> &'static str {
        match self {
            PointerKind::Down => "mousedown",
            PointerKind::Move => "mousemove",
            PointerKind::Up => "mouseup",
            PointerKind::Leave => "mouseleave",
        }
    }
}

pub struct EditorState {
    pub surface: Canvas2DSurface,
    pub session: MemeSession<HtmlImage>,
}

impl EditorState {
    pub fn new(surface: Canvas2DSurface, session: MemeSession<HtmlImage>) -> Self {
        Self { surface, session }
    }

    /// Feed a pointer transition at viewport position `client` through the
    /// session and reflect the resulting cursor on the canvas.
    pub fn pointer(&mut self, kind: PointerKind, client: Point) -> Result<()> {
        let outcome = match kind {
            PointerKind::Down => {
                let event = PointerEvent::new(client, self.surface.display_rect());
                self.session.pointer_down(&mut self.surface, event)?
            }
            PointerKind::Move => {
                let event = PointerEvent::new(client, self.surface.display_rect());
                self.session.pointer_move(&mut self.surface, event)?
            }
            PointerKind::Up => self.session.pointer_up(),
            PointerKind::Leave => self.session.pointer_leave(),
        };

        if let Some(cursor) = outcome.cursor {
            self.surface.set_cursor(cursor)?;
        }
        Ok(())
    }
}
