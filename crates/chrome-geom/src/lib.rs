//! Geometry primitives for custom-drawn frames.
//!
//! Coordinates are integer pixels with a top-left origin; `y` grows downward.
//! This crate holds the pure parts of the chrome engine:
//! - [`rect`]: points, sizes, rectangles, overlap tests
//! - [`clamp`]: size limits and snap-increment arithmetic
//! - [`region`]: direction masks, chrome region layout, and hit-testing

pub mod clamp;
pub mod rect;
pub mod region;

pub use clamp::{SizeLimits, bound_drag, snap_drag};
pub use rect::{Point, RectPx, Size};
pub use region::{ChromeButton, ChromeLayout, ChromeMetrics, ChromeRegion, Direction, Hit};
