//! Points, rectangles and the viewport-to-surface coordinate mapping.

use serde::{Deserialize, Serialize};

/// Simple 2D point.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self + delta`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise `self - other`.
    pub fn delta_from(self, other: Point) -> (f32, f32) {
        (self.x - other.x, self.y - other.y)
    }
}

/// Simple 2D rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Where the surface is shown on screen, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Map a viewport position onto the surface's native pixel grid.
///
/// A zero-sized display axis maps 1:1 instead of dividing by zero.
pub fn to_surface_coords(
    client: Point,
    display: DisplayRect,
    native_width: u32,
    native_height: u32,
) -> Point {
    let scale_x = axis_scale(native_width, display.width);
    let scale_y = axis_scale(native_height, display.height);
    Point::new(
        (client.x - display.left) * scale_x,
        (client.y - display.top) * scale_y,
    )
}

fn axis_scale(native: u32, displayed: f32) -> f32 {
    if displayed > 0.0 && displayed.is_finite() {
        native as f32 / displayed
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping_subtracts_offset() {
        let display = DisplayRect::new(10.0, 20.0, 400.0, 500.0);
        let p = to_surface_coords(Point::new(110.0, 70.0), display, 400, 500);
        assert_eq!(p, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_downscaled_display_scales_up() {
        // Surface is 800x600 natively but shown at 400x300.
        let display = DisplayRect::new(0.0, 0.0, 400.0, 300.0);
        let p = to_surface_coords(Point::new(100.0, 150.0), display, 800, 600);
        assert_eq!(p, Point::new(200.0, 300.0));
    }

    #[test]
    fn test_axes_scale_independently() {
        let display = DisplayRect::new(0.0, 0.0, 200.0, 100.0);
        let p = to_surface_coords(Point::new(50.0, 50.0), display, 400, 400);
        assert_eq!(p, Point::new(100.0, 200.0));
    }

    #[test]
    fn test_zero_sized_display_maps_one_to_one() {
        let display = DisplayRect::new(5.0, 5.0, 0.0, 0.0);
        let p = to_surface_coords(Point::new(15.0, 25.0), display, 0, 0);
        assert_eq!(p, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_rect_inflate_and_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 10.0).inflate(5.0);
        assert!(rect.contains(Point::new(5.0, 5.0)));
        assert!(rect.contains(Point::new(35.0, 25.0)));
        assert!(!rect.contains(Point::new(4.0, 10.0)));
        assert!(!rect.contains(Point::new(20.0, 26.0)));
    }
}
