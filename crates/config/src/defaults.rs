// Defaults and constants for chrome configuration

// Preferences
pub(crate) const CLOSE_ANIMATION: bool = true;
pub(crate) const MINIMIZE_ANIMATION: bool = true;
pub(crate) const PERSISTENT_NOTIFICATIONS: bool = false;
pub(crate) const ROUNDED_WINDOW_CORNERS: bool = true;

// Theme
pub(crate) const ACCENT: &str = "#1a2033";
pub(crate) const CORNER_RADIUS: i32 = 20;

// Animation timings
pub(crate) const TICK_MS: u64 = 8;
pub(crate) const NOTIFY_STEP_PX: i32 = 8;
pub(crate) const CLOSE_FRAMES: u32 = 15;
pub(crate) const MINIMIZE_FRAMES: u32 = 15;
pub(crate) const DANCE_STEP_PX: i32 = 10;

// Notifications
pub(crate) const NOTIFY_MIN_CHARS: usize = 3;
pub(crate) const NOTIFY_MS_PER_WORD: u64 = 300;
pub(crate) const NOTIFY_MIN_DURATION_MS: u64 = 5000;
pub(crate) const NOTIFY_CONTENT_WIDTH_RATIO: f32 = 0.8;
pub(crate) const NOTIFY_OVERSIZE_RATIO: f32 = 0.9;
pub(crate) const NOTIFY_PADDING: i32 = 10;
pub(crate) const NOTIFY_MARGIN: i32 = 5;
pub(crate) const NOTIFY_ARROW: i32 = 8;
pub(crate) const NOTIFY_BACKLOG: usize = 100;
