//! Bouncing a frame around its monitor.

use chrome_geom::{Point, RectPx};

/// Velocity of a dancing frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DanceVelocity {
    /// Horizontal pixels per step.
    pub(crate) dx: i32,
    /// Vertical pixels per step.
    pub(crate) dy: i32,
}

impl DanceVelocity {
    /// Diagonal velocity of `step` pixels on each axis.
    pub(crate) fn new(step: i32) -> Self {
        let step = step.max(1);
        Self { dx: step, dy: step }
    }
}

/// Next origin of `bounds` moving at `vel` inside `screen`.
///
/// Hitting an edge reverses that axis and keeps the frame on screen. A frame
/// larger than the screen on an axis stays pinned to the screen origin.
pub(crate) fn dance_step(bounds: RectPx, screen: RectPx, vel: &mut DanceVelocity) -> Point {
    let axis = |pos: i32, len: i32, lo: i32, span: i32, v: &mut i32| {
        let hi = (lo + span - len).max(lo);
        let next = pos + *v;
        if next < lo {
            *v = v.abs();
            lo
        } else if next > hi {
            *v = -v.abs();
            hi
        } else {
            next
        }
    };
    let x = axis(bounds.x, bounds.w, screen.x, screen.w, &mut vel.dx);
    let y = axis(bounds.y, bounds.h, screen.y, screen.h, &mut vel.dy);
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounces_off_edges() {
        let screen = RectPx::new(0, 0, 1000, 800);
        let mut v = DanceVelocity::new(10);
        let p = dance_step(RectPx::new(895, 395, 100, 100), screen, &mut v);
        assert_eq!(p, Point::new(900, 405));
        assert_eq!(v.dx, -10);
        let mut up_left = DanceVelocity { dx: -10, dy: -10 };
        let p = dance_step(RectPx::new(5, 5, 100, 100), screen, &mut up_left);
        assert_eq!(p, Point::new(0, 0));
    }

    #[test]
    fn stays_on_screen_for_many_steps() {
        let screen = RectPx::new(100, 50, 640, 480);
        let mut r = RectPx::new(300, 200, 200, 150);
        let mut v = DanceVelocity::new(37);
        for _ in 0..500 {
            let p = dance_step(r, screen, &mut v);
            r = r.with_origin(p);
            assert!(r.x >= screen.x && r.right() <= screen.right());
            assert!(r.y >= screen.y && r.bottom() <= screen.bottom());
        }
    }
}
