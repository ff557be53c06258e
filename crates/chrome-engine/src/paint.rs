//! Display-list painting of frame chrome and notification popups.
//!
//! A frame is composed of a [`ChromeView`] and, while a notification is
//! active, a [`NotificationView`]. Both paint into a flat list of
//! [`PaintOp`]s in frame-local coordinates.

use chrome_geom::{ChromeButton, ChromeLayout, Hit, Point, RectPx};
use config::Rgb;
use serde::Serialize;

use crate::{notification::ArrowSide, pin::PinMode};

/// One drawing command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum PaintOp {
    /// Filled rectangle, optionally rounded.
    FillRect {
        /// Area.
        rect: RectPx,
        /// Fill colour.
        color: Rgb,
        /// Corner radius; `0` for square corners.
        radius: i32,
    },
    /// Rectangle outline.
    StrokeRect {
        /// Area.
        rect: RectPx,
        /// Line colour.
        color: Rgb,
        /// Line width.
        width: i32,
    },
    /// A line of text with its top-left corner at `origin`.
    Text {
        /// Position.
        origin: Point,
        /// Text.
        text: String,
        /// Colour.
        color: Rgb,
    },
    /// A triangular arrow pointing away from a popup side.
    Arrow {
        /// Arrow tip.
        tip: Point,
        /// Popup side the arrow grows from.
        side: ArrowSide,
        /// Arrow length.
        len: i32,
        /// Colour.
        color: Rgb,
    },
    /// A title-bar button.
    Button {
        /// Which button.
        button: ChromeButton,
        /// Area.
        rect: RectPx,
        /// Glyph colour.
        color: Rgb,
        /// Drawn latched (pin button while pinned).
        active: bool,
    },
}

/// Per-paint inputs read from the theme and preferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintContext {
    /// Theme accent.
    pub accent: Rgb,
    /// Rounded corners preference.
    pub rounded: bool,
    /// Corner radius used when rounded.
    pub corner_radius: i32,
}

impl PaintContext {
    /// Corner radius to use for frame backgrounds.
    fn radius(&self) -> i32 {
        if self.rounded { self.corner_radius } else { 0 }
    }
}

/// Scale each channel of `c` by `f`.
fn shade(c: Rgb, f: f32) -> Rgb {
    let ch = |v: u8| (f32::from(v) * f).round().clamp(0.0, 255.0) as u8;
    Rgb(ch(c.0), ch(c.1), ch(c.2))
}

/// Text colour readable on `bg`.
fn ink_for(bg: Rgb) -> Rgb {
    let luma = 0.299 * f32::from(bg.0) + 0.587 * f32::from(bg.1) + 0.114 * f32::from(bg.2);
    if luma > 140.0 { Rgb(0, 0, 0) } else { Rgb(255, 255, 255) }
}

/// Something that paints itself into a display list.
pub trait Paintable {
    /// Append drawing commands for the current state.
    fn paint(&self, cx: &PaintContext, out: &mut Vec<PaintOp>);
}

/// Something that classifies frame-local points.
pub trait HitTestable {
    /// Classify `p`.
    fn hit_test(&self, p: Point) -> Hit;
}

/// Snapshot of the chrome of one frame.
#[derive(Clone, Debug)]
pub struct ChromeView {
    /// Region layout for the current size.
    pub layout: ChromeLayout,
    /// Whether border zones resize.
    pub resizable: bool,
    /// Title text.
    pub title: String,
    /// Pin state, shown on the pin button.
    pub pin: PinMode,
    /// Whether the frame has input focus.
    pub focused: bool,
}

impl Paintable for ChromeView {
    fn paint(&self, cx: &PaintContext, out: &mut Vec<PaintOp>) {
        let size = self.layout.size();
        let frame = RectPx::new(0, 0, size.w, size.h);
        let border = if self.focused {
            cx.accent
        } else {
            shade(cx.accent, 0.6)
        };
        out.push(PaintOp::FillRect {
            rect: frame,
            color: shade(cx.accent, 0.25),
            radius: cx.radius(),
        });
        let bar = self.layout.title_bar();
        out.push(PaintOp::FillRect {
            rect: bar,
            color: border,
            radius: cx.radius(),
        });
        out.push(PaintOp::StrokeRect {
            rect: frame,
            color: border,
            width: 1,
        });
        out.push(PaintOp::Text {
            origin: Point::new(bar.x + 8, bar.y + 6),
            text: self.title.clone(),
            color: ink_for(border),
        });
        for (button, rect) in self.layout.buttons() {
            out.push(PaintOp::Button {
                button: *button,
                rect: *rect,
                color: ink_for(border),
                active: *button == ChromeButton::Pin && self.pin.always_on_top(),
            });
        }
    }
}

impl HitTestable for ChromeView {
    fn hit_test(&self, p: Point) -> Hit {
        self.layout.hit_test(p, self.resizable)
    }
}

/// Snapshot of an active notification popup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationView {
    /// Frame-local rectangle including the arrow.
    pub rect: RectPx,
    /// Side the arrow grows from.
    pub arrow: ArrowSide,
    /// Wrapped text lines.
    pub lines: Vec<String>,
    /// Inner padding.
    pub padding: i32,
    /// Arrow length.
    pub arrow_len: i32,
}

impl NotificationView {
    /// Body rectangle without the arrow strip.
    fn body(&self) -> RectPx {
        let RectPx { x, y, w, h } = self.rect;
        let a = self.arrow_len.max(0);
        match self.arrow {
            ArrowSide::Top => RectPx::new(x, y + a, w, h - a),
            ArrowSide::Bottom => RectPx::new(x, y, w, h - a),
            ArrowSide::Left => RectPx::new(x + a, y, w - a, h),
            ArrowSide::Right => RectPx::new(x, y, w - a, h),
        }
    }
}

impl Paintable for NotificationView {
    fn paint(&self, cx: &PaintContext, out: &mut Vec<PaintOp>) {
        let body = self.body();
        let bg = cx.accent;
        out.push(PaintOp::FillRect {
            rect: body,
            color: bg,
            radius: cx.radius() / 2,
        });
        let r = self.rect;
        let tip = match self.arrow {
            ArrowSide::Top => Point::new(r.cx(), r.y),
            ArrowSide::Bottom => Point::new(r.cx(), r.bottom()),
            ArrowSide::Left => Point::new(r.x, r.cy()),
            ArrowSide::Right => Point::new(r.right(), r.cy()),
        };
        out.push(PaintOp::Arrow {
            tip,
            side: self.arrow,
            len: self.arrow_len,
            color: bg,
        });
        let ink = ink_for(bg);
        let mut y = body.y + self.padding;
        let line_h = if self.lines.is_empty() {
            0
        } else {
            (body.h - 2 * self.padding) / i32::try_from(self.lines.len()).unwrap_or(1)
        };
        for line in &self.lines {
            out.push(PaintOp::Text {
                origin: Point::new(body.x + self.padding, y),
                text: line.clone(),
                color: ink,
            });
            y += line_h;
        }
    }
}

impl HitTestable for NotificationView {
    fn hit_test(&self, p: Point) -> Hit {
        if self.rect.contains(p) {
            Hit::Client
        } else {
            Hit::Outside
        }
    }
}

#[cfg(test)]
mod tests {
    use chrome_geom::{ChromeMetrics, Size};

    use super::*;

    fn cx(rounded: bool) -> PaintContext {
        PaintContext {
            accent: Rgb(26, 32, 51),
            rounded,
            corner_radius: 20,
        }
    }

    #[test]
    fn chrome_paints_buttons_and_respects_rounding() {
        let view = ChromeView {
            layout: ChromeLayout::for_size(Size::new(400, 300), ChromeMetrics::default()),
            resizable: true,
            title: "console".into(),
            pin: PinMode::Screen,
            focused: true,
        };
        let mut ops = Vec::new();
        view.paint(&cx(true), &mut ops);
        assert!(matches!(ops[0], PaintOp::FillRect { radius: 20, .. }));
        let pins: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Button {
                    button: ChromeButton::Pin,
                    active,
                    ..
                } => Some(*active),
                _ => None,
            })
            .collect();
        assert_eq!(pins, vec![true]);

        let mut square = Vec::new();
        view.paint(&cx(false), &mut square);
        assert!(matches!(square[0], PaintOp::FillRect { radius: 0, .. }));
    }

    #[test]
    fn notification_body_excludes_arrow() {
        let view = NotificationView {
            rect: RectPx::new(100, 40, 200, 60),
            arrow: ArrowSide::Top,
            lines: vec!["one".into(), "two".into()],
            padding: 10,
            arrow_len: 8,
        };
        let mut ops = Vec::new();
        view.paint(&cx(false), &mut ops);
        assert_eq!(
            ops[0],
            PaintOp::FillRect {
                rect: RectPx::new(100, 48, 200, 52),
                color: Rgb(26, 32, 51),
                radius: 0
            }
        );
        assert!(matches!(ops[1], PaintOp::Arrow { tip: Point { x: 200, y: 40 }, .. }));
        assert_eq!(view.hit_test(Point::new(150, 50)), Hit::Client);
        assert_eq!(view.hit_test(Point::new(50, 50)), Hit::Outside);
    }
}
