//! Chrome regions: resize direction masks, region layout, and hit-testing.
//!
//! A frame's chrome consists of four edge strips and four corner zones used
//! for resizing, plus a title bar used for dragging that hosts the
//! close/minimize/pin buttons. All rectangles here are frame-local.
use std::{fmt, ops::BitOr};

use serde::{Deserialize, Serialize};

use crate::rect::{Point, RectPx, Size};

/// Combinable compass bit-mask (`N`, `S`, `E`, `W`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Direction(u8);

impl Direction {
    /// No direction.
    pub const NONE: Self = Self(0);
    /// North (top edge).
    pub const N: Self = Self(0b0001);
    /// South (bottom edge).
    pub const S: Self = Self(0b0010);
    /// East (right edge).
    pub const E: Self = Self(0b0100);
    /// West (left edge).
    pub const W: Self = Self(0b1000);
    /// North-east corner.
    pub const NE: Self = Self(Self::N.0 | Self::E.0);
    /// North-west corner.
    pub const NW: Self = Self(Self::N.0 | Self::W.0);
    /// South-east corner.
    pub const SE: Self = Self(Self::S.0 | Self::E.0);
    /// South-west corner.
    pub const SW: Self = Self(Self::S.0 | Self::W.0);

    /// True when no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Direction {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        for (bit, name) in [(Self::N, "n"), (Self::S, "s"), (Self::E, "e"), (Self::W, "w")] {
            if self.contains(bit) {
                write!(f, "{name}")?;
            }
        }
        Ok(())
    }
}

/// One of the eight resize zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChromeRegion {
    /// Top strip.
    Top,
    /// Bottom strip.
    Bottom,
    /// Left strip.
    Left,
    /// Right strip.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl ChromeRegion {
    /// Every region, edges first.
    pub const ALL: [Self; 8] = [
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Resize direction owned by this region.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Top => Direction::N,
            Self::Bottom => Direction::S,
            Self::Left => Direction::W,
            Self::Right => Direction::E,
            Self::TopLeft => Direction::NW,
            Self::TopRight => Direction::NE,
            Self::BottomLeft => Direction::SW,
            Self::BottomRight => Direction::SE,
        }
    }

    /// True for the four corner zones.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }
}

/// Title-bar buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChromeButton {
    /// Close the frame.
    Close,
    /// Minimize (iconify) the frame.
    Minimize,
    /// Cycle the pin mode.
    Pin,
}

/// Dimensions of the chrome, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChromeMetrics {
    /// Thickness of the resize strips.
    pub border: i32,
    /// Length of the corner zones along each edge.
    pub corner: i32,
    /// Height of the title bar (drag region).
    pub title_bar: i32,
    /// Side length of a title-bar button.
    pub button: i32,
    /// Gap between title-bar buttons.
    pub button_gap: i32,
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self {
            border: 5,
            corner: 12,
            title_bar: 30,
            button: 22,
            button_gap: 4,
        }
    }
}

/// Result of hit-testing a frame-local point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// Inside a resize zone with the given mask.
    Resize(Direction),
    /// Inside a drag region.
    Drag,
    /// Inside a title-bar button.
    Button(ChromeButton),
    /// Inside the content area.
    Client,
    /// Outside the frame.
    Outside,
}

/// Region rectangles for a frame of a given size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChromeLayout {
    /// Frame size the layout was computed for.
    size: Size,
    /// Metrics used for the computation.
    metrics: ChromeMetrics,
    /// Resize zones, in [`ChromeRegion::ALL`] order.
    regions: [(ChromeRegion, RectPx); 8],
    /// Title bar rectangle.
    title_bar: RectPx,
    /// Title-bar buttons, right to left.
    buttons: [(ChromeButton, RectPx); 3],
}

impl ChromeLayout {
    /// Compute the layout for a frame of `size`.
    #[must_use]
    pub fn for_size(size: Size, metrics: ChromeMetrics) -> Self {
        let Size { w, h } = size;
        let b = metrics.border.max(0);
        let c = metrics.corner.max(b);
        let regions = ChromeRegion::ALL.map(|region| {
            let rect = match region {
                ChromeRegion::Top => RectPx::new(c, 0, (w - 2 * c).max(0), b),
                ChromeRegion::Bottom => RectPx::new(c, h - b, (w - 2 * c).max(0), b),
                ChromeRegion::Left => RectPx::new(0, c, b, (h - 2 * c).max(0)),
                ChromeRegion::Right => RectPx::new(w - b, c, b, (h - 2 * c).max(0)),
                ChromeRegion::TopLeft => RectPx::new(0, 0, c, c),
                ChromeRegion::TopRight => RectPx::new(w - c, 0, c, c),
                ChromeRegion::BottomLeft => RectPx::new(0, h - c, c, c),
                ChromeRegion::BottomRight => RectPx::new(w - c, h - c, c, c),
            };
            (region, rect)
        });

        let title_bar = RectPx::new(0, 0, w, metrics.title_bar.min(h).max(0));
        let by = (metrics.title_bar - metrics.button) / 2;
        let step = metrics.button + metrics.button_gap;
        let close_x = w - b - metrics.button_gap - metrics.button;
        let button_at =
            |i: i32| RectPx::new(close_x - i * step, by, metrics.button, metrics.button);
        let buttons = [
            (ChromeButton::Close, button_at(0)),
            (ChromeButton::Minimize, button_at(1)),
            (ChromeButton::Pin, button_at(2)),
        ];

        Self {
            size,
            metrics,
            regions,
            title_bar,
            buttons,
        }
    }

    /// Frame size this layout describes.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Rectangle of a resize zone.
    #[must_use]
    pub fn region(&self, region: ChromeRegion) -> RectPx {
        self.regions
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, rect)| *rect)
            .unwrap_or_else(RectPx::zero)
    }

    /// All resize zones.
    #[must_use]
    pub fn regions(&self) -> &[(ChromeRegion, RectPx)] {
        &self.regions
    }

    /// Title bar rectangle.
    #[must_use]
    pub const fn title_bar(&self) -> RectPx {
        self.title_bar
    }

    /// Title-bar button rectangles.
    #[must_use]
    pub fn buttons(&self) -> &[(ChromeButton, RectPx)] {
        &self.buttons
    }

    /// Resize mask for a frame-local point, or [`Direction::NONE`].
    ///
    /// Edge strips are `border` thick; within `corner` of a perpendicular
    /// edge the mask widens to the corner direction.
    #[must_use]
    pub fn resize_direction(&self, p: Point) -> Direction {
        let Size { w, h } = self.size;
        let b = self.metrics.border.max(0);
        let c = self.metrics.corner.max(b);
        let mut dir = Direction::NONE;
        let north = p.y < b;
        let south = p.y >= h - b;
        let west = p.x < b;
        let east = p.x >= w - b;
        if north {
            dir = dir | Direction::N;
        }
        if south {
            dir = dir | Direction::S;
        }
        if west {
            dir = dir | Direction::W;
        }
        if east {
            dir = dir | Direction::E;
        }
        if north || south {
            if p.x < c {
                dir = dir | Direction::W;
            } else if p.x >= w - c {
                dir = dir | Direction::E;
            }
        }
        if west || east {
            if p.y < c {
                dir = dir | Direction::N;
            } else if p.y >= h - c {
                dir = dir | Direction::S;
            }
        }
        dir
    }

    /// Classify a frame-local point.
    ///
    /// Resize zones win over buttons and the title bar. A frame that is not
    /// resizable treats its edge strips as drag regions instead.
    #[must_use]
    pub fn hit_test(&self, p: Point, resizable: bool) -> Hit {
        let frame = RectPx::from_parts(Point::default(), self.size);
        if !frame.contains(p) {
            return Hit::Outside;
        }
        let dir = self.resize_direction(p);
        if resizable && !dir.is_empty() {
            return Hit::Resize(dir);
        }
        if let Some((button, _)) = self.buttons.iter().find(|(_, r)| r.contains(p)) {
            return Hit::Button(*button);
        }
        if self.title_bar.contains(p) || !dir.is_empty() {
            return Hit::Drag;
        }
        Hit::Client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ChromeLayout {
        ChromeLayout::for_size(Size::new(400, 300), ChromeMetrics::default())
    }

    #[test]
    fn corners_are_or_of_adjacent_edges() {
        for region in ChromeRegion::ALL.iter().filter(|r| r.is_corner()) {
            let d = region.direction();
            let edges = [Direction::N, Direction::S, Direction::E, Direction::W]
                .into_iter()
                .filter(|e| d.contains(*e))
                .collect::<Vec<_>>();
            assert_eq!(edges.len(), 2, "{region:?}");
            assert_eq!(edges[0] | edges[1], d);
            // Adjacent: one vertical, one horizontal.
            assert!(d.contains(Direction::N) ^ d.contains(Direction::S));
            assert!(d.contains(Direction::E) ^ d.contains(Direction::W));
        }
    }

    #[test]
    fn edges_and_corners_hit() {
        let l = layout();
        assert_eq!(l.resize_direction(Point::new(200, 0)), Direction::N);
        assert_eq!(l.resize_direction(Point::new(200, 299)), Direction::S);
        assert_eq!(l.resize_direction(Point::new(0, 150)), Direction::W);
        assert_eq!(l.resize_direction(Point::new(399, 150)), Direction::E);
        assert_eq!(l.resize_direction(Point::new(2, 2)), Direction::NW);
        // Along the top strip but within the corner length.
        assert_eq!(l.resize_direction(Point::new(390, 1)), Direction::NE);
        assert_eq!(l.resize_direction(Point::new(1, 295)), Direction::SW);
        assert_eq!(l.resize_direction(Point::new(398, 298)), Direction::SE);
        assert_eq!(l.resize_direction(Point::new(200, 150)), Direction::NONE);
    }

    #[test]
    fn hit_test_precedence() {
        let l = layout();
        assert_eq!(
            l.hit_test(Point::new(200, 1), true),
            Hit::Resize(Direction::N)
        );
        assert_eq!(l.hit_test(Point::new(200, 1), false), Hit::Drag);
        assert_eq!(l.hit_test(Point::new(200, 15), true), Hit::Drag);
        assert_eq!(l.hit_test(Point::new(200, 150), true), Hit::Client);
        assert_eq!(l.hit_test(Point::new(-1, 150), true), Hit::Outside);
        let (_, close) = l.buttons()[0];
        assert_eq!(
            l.hit_test(Point::new(close.cx(), close.cy()), true),
            Hit::Button(ChromeButton::Close)
        );
    }

    #[test]
    fn buttons_are_right_aligned_in_title_bar() {
        let l = layout();
        let names: Vec<_> = l.buttons().iter().map(|(b, _)| *b).collect();
        assert_eq!(
            names,
            vec![ChromeButton::Close, ChromeButton::Minimize, ChromeButton::Pin]
        );
        for (_, r) in l.buttons() {
            assert!(r.right() <= 400 - ChromeMetrics::default().border);
            assert!(r.bottom() <= l.title_bar().bottom());
        }
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::NE.to_string(), "ne");
        assert_eq!(Direction::NONE.to_string(), "none");
    }
}
