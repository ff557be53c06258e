//! Notification tuning.

use serde::{Deserialize, Serialize};

use crate::defaults;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Notification sizing and duration parameters.
pub struct NotifyConfig {
    /// Minimum visible characters of plain text accepted by `notify`.
    pub min_chars: usize,
    /// Auto duration per word of plain text, in milliseconds.
    pub ms_per_word: u64,
    /// Floor for auto-computed durations, in milliseconds.
    pub min_duration_ms: u64,
    /// Text wraps at this fraction of the frame width.
    pub content_width_ratio: f32,
    /// Content larger than this fraction of the frame goes to a popup window.
    pub oversize_ratio: f32,
    /// Inner padding around the content.
    pub padding: i32,
    /// Gap between the popup and the frame edge it is anchored to.
    pub margin: i32,
    /// Length of the arrow drawn on the anchored side.
    pub arrow: i32,
    /// Number of shown notifications retained in the backlog.
    pub backlog: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            min_chars: defaults::NOTIFY_MIN_CHARS,
            ms_per_word: defaults::NOTIFY_MS_PER_WORD,
            min_duration_ms: defaults::NOTIFY_MIN_DURATION_MS,
            content_width_ratio: defaults::NOTIFY_CONTENT_WIDTH_RATIO,
            oversize_ratio: defaults::NOTIFY_OVERSIZE_RATIO,
            padding: defaults::NOTIFY_PADDING,
            margin: defaults::NOTIFY_MARGIN,
            arrow: defaults::NOTIFY_ARROW,
            backlog: defaults::NOTIFY_BACKLOG,
        }
    }
}

impl NotifyConfig {
    /// Auto duration for `words` words of plain text.
    pub fn auto_duration_ms(&self, words: usize) -> u64 {
        (self.ms_per_word.saturating_mul(words as u64)).max(self.min_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_duration_has_floor() {
        let n = NotifyConfig::default();
        assert_eq!(n.auto_duration_ms(0), 5000);
        assert_eq!(n.auto_duration_ms(1), 5000);
        assert_eq!(n.auto_duration_ms(16), 5000);
        assert_eq!(n.auto_duration_ms(17), 5100);
        assert_eq!(n.auto_duration_ms(50), 15000);
    }
}
