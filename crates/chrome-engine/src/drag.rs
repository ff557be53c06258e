//! Drag gestures on the title bar and other drag regions.

use chrome_geom::{Point, RectPx};

/// Pointer offset captured when a drag begins.
///
/// Frames are never clamped to the screen while dragging; a frame may be
/// dragged fully off-screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    /// Pointer position relative to the frame origin at press.
    pub offset: Point,
}

impl DragSession {
    /// Capture the pointer offset inside `bounds`.
    pub fn begin(pointer: Point, bounds: RectPx) -> Self {
        let (dx, dy) = bounds.origin().delta_to(pointer);
        Self {
            offset: Point::new(dx, dy),
        }
    }

    /// Frame origin that keeps the captured offset under `pointer`.
    pub fn target(&self, pointer: Point) -> Point {
        pointer.offset(-self.offset.x, -self.offset.y)
    }
}
