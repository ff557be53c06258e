//! Animation tick and step sizes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Timing parameters shared by every frame animation.
pub struct AnimationTimings {
    /// Sleep between animation steps, in milliseconds.
    pub tick_ms: u64,
    /// Pixels a notification moves per step while appearing or vanishing.
    pub notify_step_px: i32,
    /// Number of steps in the close slide.
    pub close_frames: u32,
    /// Number of steps in the minimize slide.
    pub minimize_frames: u32,
    /// Pixels a dancing frame moves per step on each axis.
    pub dance_step_px: i32,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            tick_ms: defaults::TICK_MS,
            notify_step_px: defaults::NOTIFY_STEP_PX,
            close_frames: defaults::CLOSE_FRAMES,
            minimize_frames: defaults::MINIMIZE_FRAMES,
            dance_step_px: defaults::DANCE_STEP_PX,
        }
    }
}

impl AnimationTimings {
    /// Tick interval as a duration (at least one millisecond).
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}
