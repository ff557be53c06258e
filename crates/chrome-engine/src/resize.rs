//! Resize gestures on the chrome border zones.
//!
//! A session remembers where the pointer went down and the bounds at that
//! instant. Every move recomputes the target bounds from those two values,
//! so rounding never accumulates across events.

use chrome_geom::{Direction, Point, RectPx, Size, SizeLimits, bound_drag, snap_drag};

/// State of one resize gesture, from pointer-down to pointer-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeSession {
    /// Pointer position at press, in screen coordinates.
    pub start_pointer: Point,
    /// Frame bounds at press.
    pub start_bounds: RectPx,
    /// Active edges.
    pub dir: Direction,
}

impl ResizeSession {
    /// Begin a session; `None` when `dir` has no active edge.
    pub fn begin(start_pointer: Point, start_bounds: RectPx, dir: Direction) -> Option<Self> {
        (!dir.is_empty()).then_some(Self {
            start_pointer,
            start_bounds,
            dir,
        })
    }
}

/// Bounds for the pointer at `pointer` during `session`.
///
/// Each active edge moves by the pointer delta rounded to the snap increment,
/// bounded so the dimension stays in `[min, max]` and the moving edge stays
/// on `screen`. An edge already past `screen` may not move further out but is
/// never pulled back. The edge opposite a moving edge never moves.
pub fn resize_bounds(
    session: &ResizeSession,
    pointer: Point,
    limits: &SizeLimits,
    screen: RectPx,
) -> RectPx {
    let RectPx {
        mut x,
        mut y,
        mut w,
        mut h,
    } = session.start_bounds;
    let start = session.start_pointer;
    let (min, max, snap) = (limits.min(), limits.max(), limits.snap());

    if session.dir.contains(Direction::N) {
        let drag = snap_drag(start.y, pointer.y, snap.h);
        let maximum = (h + (y - screen.y)).max(h).min(max.h).max(min.h);
        let drag = bound_drag(drag, snap.h, h, min.h, maximum);
        y -= drag;
        h += drag;
    }
    if session.dir.contains(Direction::S) {
        let drag = snap_drag(pointer.y, start.y, snap.h);
        let maximum = (screen.bottom() - y).max(h).min(max.h).max(min.h);
        h += bound_drag(drag, snap.h, h, min.h, maximum);
    }
    if session.dir.contains(Direction::W) {
        let drag = snap_drag(start.x, pointer.x, snap.w);
        let maximum = (w + (x - screen.x)).max(w).min(max.w).max(min.w);
        let drag = bound_drag(drag, snap.w, w, min.w, maximum);
        x -= drag;
        w += drag;
    }
    if session.dir.contains(Direction::E) {
        let drag = snap_drag(pointer.x, start.x, snap.w);
        let maximum = (screen.right() - x).max(w).min(max.w).max(min.w);
        w += bound_drag(drag, snap.w, w, min.w, maximum);
    }

    // A snap grid coarser than [min, max] can overshoot; pull back while
    // keeping the anchored edges in place.
    let clamped = limits.clamp(Size::new(w, h));
    if session.dir.contains(Direction::W) {
        x += w - clamped.w;
    }
    if session.dir.contains(Direction::N) {
        y += h - clamped.h;
    }
    RectPx::new(x, y, clamped.w, clamped.h)
}
