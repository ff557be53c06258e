//! Pixel-space points, sizes, and rectangles.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in integer pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate (grows downward).
    pub y: i32,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self + (dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Component-wise `other - self`.
    #[must_use]
    pub const fn delta_to(self, other: Self) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }
}

/// A width/height pair in integer pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Size {
    /// Construct a size.
    #[must_use]
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Pixel-space rectangle with integer coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RectPx {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl RectPx {
    /// Construct a rectangle from its origin and size components.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Construct a rectangle from an origin and a size.
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            w: size.w,
            h: size.h,
        }
    }

    /// A `0x0` rectangle at the origin.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Exclusive right edge.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Horizontal centre.
    #[inline]
    #[must_use]
    pub const fn cx(&self) -> i32 {
        self.x + self.w / 2
    }

    /// Vertical centre.
    #[inline]
    #[must_use]
    pub const fn cy(&self) -> i32 {
        self.y + self.h / 2
    }

    /// True when `p` lies inside the half-open rectangle.
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// True when the two rectangles share a non-empty area.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlap_1d(self.x, self.right(), other.x, other.right()) > 0
            && overlap_1d(self.y, self.bottom(), other.y, other.bottom()) > 0
    }

    /// Same size, new origin.
    #[must_use]
    pub const fn with_origin(&self, origin: Point) -> Self {
        Self::from_parts(origin, self.size())
    }
}

impl fmt::Display for RectPx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}@{},{}", self.w, self.h, self.x, self.y)
    }
}

/// Length of the overlap between `[a1, a2)` and `[b1, b2)`.
#[inline]
#[must_use]
pub fn overlap_1d(a1: i32, a2: i32, b1: i32, b2: i32) -> i32 {
    let l = a1.max(b1);
    let r = a2.min(b2);
    (r - l).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_and_center() {
        let r = RectPx::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.cx(), 25);
        assert_eq!(r.cy(), 40);
        assert_eq!(r.to_string(), "30x40@10,20");
    }

    #[test]
    fn contains_is_half_open() {
        let r = RectPx::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
        assert!(!r.contains(Point::new(-1, 5)));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = RectPx::new(0, 0, 50, 50);
        let b = RectPx::new(50, 0, 50, 50);
        let c = RectPx::new(49, 49, 10, 10);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }
}
