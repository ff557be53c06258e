//! Size limits and snap-increment arithmetic.
//!
//! Requests are always corrected, never rejected: a negative or oversized
//! request is pulled back into `[min, max]`.

use serde::{Deserialize, Serialize};

use crate::rect::Size;

/// Default minimum frame dimension.
pub const DEFAULT_MIN_DIM: i32 = 100;
/// Default maximum frame dimension.
pub const DEFAULT_MAX_DIM: i32 = 10_000;

/// Minimum/maximum size and snap increment of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimits {
    /// Smallest allowed size.
    min: Size,
    /// Largest allowed size.
    max: Size,
    /// Resize increments per axis.
    snap: Size,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::new(
            Size::new(DEFAULT_MIN_DIM, DEFAULT_MIN_DIM),
            Size::new(DEFAULT_MAX_DIM, DEFAULT_MAX_DIM),
            Size::new(1, 1),
        )
    }
}

impl SizeLimits {
    /// Build normalised limits: `min >= 0`, `max >= min`, `snap >= 1`.
    #[must_use]
    pub fn new(min: Size, max: Size, snap: Size) -> Self {
        let min = Size::new(min.w.max(0), min.h.max(0));
        let max = Size::new(max.w.max(min.w), max.h.max(min.h));
        let snap = Size::new(snap.w.max(1), snap.h.max(1));
        Self { min, max, snap }
    }

    /// Smallest allowed size.
    #[must_use]
    pub const fn min(&self) -> Size {
        self.min
    }

    /// Largest allowed size.
    #[must_use]
    pub const fn max(&self) -> Size {
        self.max
    }

    /// Snap increments.
    #[must_use]
    pub const fn snap(&self) -> Size {
        self.snap
    }

    /// Replace the minimum, keeping the invariants.
    #[must_use]
    pub fn with_min(self, min: Size) -> Self {
        Self::new(min, self.max, self.snap)
    }

    /// Replace the maximum, keeping the invariants.
    #[must_use]
    pub fn with_max(self, max: Size) -> Self {
        Self::new(self.min, max, self.snap)
    }

    /// Replace the snap increment, keeping the invariants.
    #[must_use]
    pub fn with_snap(self, snap: Size) -> Self {
        Self::new(self.min, self.max, snap)
    }

    /// Clamp `size` into `[min, max]` on both axes.
    #[must_use]
    pub fn clamp(&self, size: Size) -> Size {
        Size::new(
            size.w.clamp(self.min.w, self.max.w),
            size.h.clamp(self.min.h, self.max.h),
        )
    }
}

/// Distance `larger - smaller` rounded to the nearest multiple of `snap`.
///
/// Halfway values round away from zero.
#[must_use]
pub fn snap_drag(larger: i32, smaller: i32, snap: i32) -> i32 {
    let snap = snap.max(1);
    let halfway = snap / 2;
    let mut drag = larger - smaller;
    drag += if drag < 0 { -halfway } else { halfway };
    (drag / snap) * snap
}

/// Adjust `drag` by whole snap steps until `dimension + drag` is in `[min, max]`.
///
/// The lower bound is applied first; if `max < min` the upper bound wins.
#[must_use]
pub fn bound_drag(drag: i32, snap: i32, dimension: i32, min: i32, max: i32) -> i32 {
    let snap = snap.max(1);
    let mut drag = drag;
    let short = min - (dimension + drag);
    if short > 0 {
        drag += div_ceil(short, snap) * snap;
    }
    let over = (dimension + drag) - max;
    if over > 0 {
        drag -= div_ceil(over, snap) * snap;
    }
    drag
}

/// Ceiling division for positive operands.
fn div_ceil(n: i32, d: i32) -> i32 {
    (n + d - 1) / d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_normalise() {
        let l = SizeLimits::new(Size::new(-5, 50), Size::new(10, 20), Size::new(0, 3));
        assert_eq!(l.min(), Size::new(0, 50));
        assert_eq!(l.max(), Size::new(10, 50));
        assert_eq!(l.snap(), Size::new(1, 3));
    }

    #[test]
    fn clamp_negative_and_huge() {
        let l = SizeLimits::default();
        assert_eq!(l.clamp(Size::new(-40, 20_000)), Size::new(100, 10_000));
        assert_eq!(l.clamp(Size::new(640, 480)), Size::new(640, 480));
    }

    #[test]
    fn snap_rounds_to_nearest() {
        assert_eq!(snap_drag(13, 0, 10), 10);
        assert_eq!(snap_drag(15, 0, 10), 20);
        assert_eq!(snap_drag(0, 14, 10), -10);
        assert_eq!(snap_drag(0, 15, 10), -20);
        assert_eq!(snap_drag(7, 3, 1), 4);
    }

    #[test]
    fn bound_walks_by_snap() {
        // Width 200 shrinking by 150 with min 100 stops at exactly 100.
        assert_eq!(bound_drag(-150, 1, 200, 100, 1000), -100);
        // Snap of 30 keeps the result on the grid while satisfying min.
        assert_eq!(bound_drag(-150, 30, 200, 100, 1000), -90);
        // Growth past max is pulled back.
        assert_eq!(bound_drag(500, 10, 200, 100, 450), 250);
        assert_eq!(bound_drag(20, 10, 200, 100, 450), 20);
    }
}
