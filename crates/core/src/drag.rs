//! Drag state for caption repositioning.

use crate::geometry::Point;
use crate::layer::LayerId;
use serde::{Deserialize, Serialize};

/// Pointer affordance shown over the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// An in-progress drag of one caption.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub layer: LayerId,
    /// Pointer position at pointer-down, surface coordinates.
    pub pointer_start: Point,
    /// Caption position at pointer-down.
    pub text_start: Point,
}

impl DragSession {
    /// Caption position for the pointer now at `pointer`.
    ///
    /// Depends only on the net delta since the drag began.
    pub fn position_for(&self, pointer: Point) -> Point {
        let (dx, dy) = pointer.delta_from(self.pointer_start);
        self.text_start.offset(dx, dy)
    }
}

/// Current drag operation state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    /// The layer being dragged, if any.
    pub fn layer(&self) -> Option<LayerId> {
        match self {
            DragState::Dragging(session) => Some(session.layer),
            DragState::Idle => None,
        }
    }
}

/// Holds at most one drag session.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Start dragging `layer`, replacing any session in progress.
    pub fn begin(&mut self, layer: LayerId, pointer: Point, text_position: Point) -> Cursor {
        self.state = DragState::Dragging(DragSession {
            layer,
            pointer_start: pointer,
            text_start: text_position,
        });
        Cursor::Grabbing
    }

    /// Pointer-down that hit nothing.
    pub fn miss(&mut self) -> Cursor {
        self.state = DragState::Idle;
        Cursor::Default
    }

    /// New position of the dragged layer, or `None` when idle.
    pub fn drag_to(&self, pointer: Point) -> Option<(LayerId, Point)> {
        match &self.state {
            DragState::Dragging(session) => Some((session.layer, session.position_for(pointer))),
            DragState::Idle => None,
        }
    }

    /// End any drag. Returns the layer that was being dragged.
    pub fn end(&mut self) -> Option<LayerId> {
        let layer = self.state.layer();
        self.state = DragState::Idle;
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_by_default() {
        let controller = DragController::new();
        assert!(!controller.is_dragging());
        assert_eq!(controller.drag_to(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_begin_and_drag() {
        let mut controller = DragController::new();
        let cursor = controller.begin(LayerId::Top, Point::new(10.0, 10.0), Point::new(200.0, 20.0));
        assert_eq!(cursor, Cursor::Grabbing);
        assert_eq!(
            controller.drag_to(Point::new(15.0, 40.0)),
            Some((LayerId::Top, Point::new(205.0, 50.0)))
        );
    }

    #[test]
    fn test_path_independence() {
        let mut controller = DragController::new();
        controller.begin(LayerId::Bottom, Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let direct = controller.drag_to(Point::new(30.0, -20.0));

        for step in [Point::new(5.0, 5.0), Point::new(-40.0, 90.0), Point::new(1.0, 1.0)] {
            controller.drag_to(step);
        }
        assert_eq!(controller.drag_to(Point::new(30.0, -20.0)), direct);
        assert_eq!(direct, Some((LayerId::Bottom, Point::new(130.0, 80.0))));
    }

    #[test]
    fn test_new_begin_replaces_session() {
        let mut controller = DragController::new();
        controller.begin(LayerId::Top, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        controller.begin(LayerId::Bottom, Point::new(5.0, 5.0), Point::new(50.0, 50.0));
        assert_eq!(controller.state().layer(), Some(LayerId::Bottom));
    }

    #[test]
    fn test_miss_and_end_return_to_idle() {
        let mut controller = DragController::new();
        controller.begin(LayerId::Top, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(controller.miss(), Cursor::Default);
        assert!(!controller.is_dragging());

        controller.begin(LayerId::Top, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(controller.end(), Some(LayerId::Top));
        assert_eq!(controller.end(), None);
    }

    #[test]
    fn test_cursor_css() {
        assert_eq!(Cursor::Default.as_css(), "default");
        assert_eq!(Cursor::Grab.as_css(), "grab");
        assert_eq!(Cursor::Grabbing.as_css(), "grabbing");
    }
}
