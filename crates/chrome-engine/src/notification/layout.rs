//! Notification text handling, sizing, and placement.
//!
//! All rectangles here are frame-local.

use chrome_geom::{Direction, RectPx, Size};
use config::NotifyConfig;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ArrowSide, Exit, NotificationContent};
use crate::context::TextMetrics;

/// Matches any markup tag.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Matches line-break tags.
static BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("break pattern"));

/// Strip markup tags, turning `<br>` into newlines and decoding basic entities.
pub(crate) fn plain_text(markup: &str) -> String {
    let text = BREAK.replace_all(markup, "\n");
    TAG.replace_all(&text, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Non-whitespace characters in `text`.
pub(crate) fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Whitespace-separated words in `text`.
pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Measured popup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Measured {
    /// Outer size including padding and arrow.
    pub(crate) size: Size,
    /// Wrapped text lines.
    pub(crate) lines: Vec<String>,
}

/// Measure `content` for a frame of `frame` size.
pub(crate) fn measure(
    content: &NotificationContent,
    text: &dyn TextMetrics,
    frame: Size,
    arrow: ArrowSide,
    cfg: &NotifyConfig,
) -> Measured {
    let pad = cfg.padding.max(0);
    let (inner, lines) = match content {
        NotificationContent::Text(markup) => {
            let wrap = ((frame.w as f32 * cfg.content_width_ratio) as i32 - 2 * pad).max(1);
            let lines = text.wrap(&plain_text(markup), wrap);
            (text.measure(&lines), lines)
        }
        NotificationContent::Component { size, label } => (*size, vec![label.clone()]),
    };
    let mut size = Size::new(inner.w + 2 * pad, inner.h + 2 * pad);
    match arrow {
        ArrowSide::Top | ArrowSide::Bottom => size.h += cfg.arrow.max(0),
        ArrowSide::Left | ArrowSide::Right => size.w += cfg.arrow.max(0),
    }
    Measured { size, lines }
}

/// True when `size` exceeds `ratio` of the frame on either axis.
pub(crate) fn is_oversized(size: Size, frame: Size, ratio: f32) -> bool {
    size.w as f32 > frame.w as f32 * ratio || size.h as f32 > frame.h as f32 * ratio
}

/// Resting rectangle anchored to the `arrow` edge.
pub(crate) fn resting_rect(
    frame: Size,
    size: Size,
    arrow: ArrowSide,
    title_bar: i32,
    margin: i32,
) -> RectPx {
    let centre_x = (frame.w - size.w) / 2;
    let centre_y = (frame.h - size.h) / 2;
    let (x, y) = match arrow {
        ArrowSide::Top => (centre_x, title_bar + margin),
        ArrowSide::Bottom => (centre_x, frame.h - size.h - margin),
        ArrowSide::Left => (margin, centre_y),
        ArrowSide::Right => (frame.w - size.w - margin, centre_y),
    };
    RectPx::new(x, y, size.w, size.h)
}

/// Fully off-frame rectangle on the `exit` side of `rest`; `None` for [`Exit::None`].
pub(crate) fn offstage_rect(frame: Size, rest: RectPx, exit: Exit) -> Option<RectPx> {
    let dir = exit.direction();
    if dir.is_empty() {
        return None;
    }
    let mut r = rest;
    if dir.contains(Direction::N) {
        r.y = -rest.h;
    }
    if dir.contains(Direction::S) {
        r.y = frame.h;
    }
    if dir.contains(Direction::W) {
        r.x = -rest.w;
    }
    if dir.contains(Direction::E) {
        r.x = frame.w;
    }
    Some(r)
}

/// Move `from` toward `to` by at most `step`.
fn approach(from: i32, to: i32, step: i32) -> i32 {
    let step = step.max(1);
    if (to - from).abs() <= step {
        to
    } else {
        from + step * (to - from).signum()
    }
}

/// One slide step from `from` toward `to`, `step` pixels per axis.
pub(crate) fn slide_step(from: RectPx, to: RectPx, step: i32) -> RectPx {
    RectPx::new(
        approach(from.x, to.x, step),
        approach(from.y, to.y, step),
        to.w,
        to.h,
    )
}
