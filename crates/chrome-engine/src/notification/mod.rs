//! Per-frame notification popups.
//!
//! Each frame owns one [`NotificationQueue`](queue::NotificationQueue): a
//! FIFO of pending items and at most one active popup. A drain task on the
//! shared animator pops items in enqueue order and walks each through
//! `Queued -> Appearing -> Visible -> Vanishing -> Removed`.

use std::fmt;

use chrome_geom::{Direction, Size};
use serde::Serialize;

pub(crate) mod layout;
pub(crate) mod queue;

pub(crate) use queue::{NotificationHost, NotificationQueue};

/// Identifier of a notification, unique within its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "note#{}", self.0)
    }
}

/// What a notification shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationContent {
    /// Text with optional inline markup tags.
    Text(String),
    /// An embedded component of a fixed size.
    Component {
        /// Component size in pixels.
        size: Size,
        /// Label used for logs and the backlog.
        label: String,
    },
}

impl NotificationContent {
    /// Plain text with markup removed; the label for components.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(markup) => layout::plain_text(markup),
            Self::Component { label, .. } => label.clone(),
        }
    }

    /// One-line description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(markup) => {
                let plain = layout::plain_text(markup).replace('\n', " ");
                let short: String = plain.chars().take(40).collect();
                if short.len() < plain.len() {
                    format!("\"{short}...\"")
                } else {
                    format!("\"{short}\"")
                }
            }
            Self::Component { size, label } => {
                format!("component {label} {}x{}", size.w, size.h)
            }
        }
    }
}

/// Frame edge the popup is anchored to and its arrow points from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ArrowSide {
    /// Centred below the title bar.
    #[default]
    Top,
    /// Centred above the bottom edge.
    Bottom,
    /// Vertically centred at the left edge.
    Left,
    /// Vertically centred at the right edge.
    Right,
}

/// Direction a popup leaves the frame in; it enters from the same side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Exit {
    /// Appear and vanish in place.
    None,
    /// North.
    #[default]
    N,
    /// North-east.
    NE,
    /// East.
    E,
    /// South-east.
    SE,
    /// South.
    S,
    /// South-west.
    SW,
    /// West.
    W,
    /// North-west.
    NW,
}

impl Exit {
    /// Compass mask of this exit.
    pub fn direction(self) -> Direction {
        match self {
            Self::None => Direction::NONE,
            Self::N => Direction::N,
            Self::NE => Direction::NE,
            Self::E => Direction::E,
            Self::SE => Direction::SE,
            Self::S => Direction::S,
            Self::SW => Direction::SW,
            Self::W => Direction::W,
            Self::NW => Direction::NW,
        }
    }
}

/// Why a notification left the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RemovalReason {
    /// Vanished after its duration or a click without callback.
    Vanished,
    /// Clicked; the dismiss callback ran.
    Dismissed,
    /// Removed by `kill_all`.
    Killed,
}

/// Lifecycle phase of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NotificationPhase {
    /// Waiting in the FIFO.
    Queued,
    /// Sliding in.
    Appearing,
    /// At rest.
    Visible {
        /// Time until auto-vanish; `None` when persistent.
        duration_ms: Option<u64>,
    },
    /// Sliding out.
    Vanishing,
    /// Gone.
    Removed(RemovalReason),
    /// Too large to show inline; shown in a popup window instead.
    Redirected,
}

/// Callback run when a notification is clicked.
pub type DismissFn = Box<dyn FnOnce() + Send + 'static>;

/// A notification request.
pub struct Notification {
    /// Content to show.
    pub(crate) content: NotificationContent,
    /// Visible time; `0` computes it from the word count.
    pub(crate) duration_ms: u64,
    /// Anchor edge.
    pub(crate) arrow: ArrowSide,
    /// Entry and exit side.
    pub(crate) exit: Exit,
    /// Click callback.
    pub(crate) on_dismiss: Option<DismissFn>,
}

impl Notification {
    /// A text notification; `markup` may contain inline tags.
    pub fn text(markup: impl Into<String>) -> Self {
        Self::new(NotificationContent::Text(markup.into()))
    }

    /// A notification showing an embedded component.
    pub fn component(size: Size, label: impl Into<String>) -> Self {
        Self::new(NotificationContent::Component {
            size,
            label: label.into(),
        })
    }

    /// Notification with default timing and placement.
    fn new(content: NotificationContent) -> Self {
        Self {
            content,
            duration_ms: 0,
            arrow: ArrowSide::default(),
            exit: Exit::default(),
            on_dismiss: None,
        }
    }

    /// Visible duration in milliseconds; `0` for automatic.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Anchor edge.
    pub fn arrow(mut self, side: ArrowSide) -> Self {
        self.arrow = side;
        self
    }

    /// Entry and exit side.
    pub fn exit(mut self, exit: Exit) -> Self {
        self.exit = exit;
        self
    }

    /// Run `f` instead of vanishing when the notification is clicked.
    pub fn on_dismiss(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_dismiss = Some(Box::new(f));
        self
    }

    /// Content to show.
    pub fn content(&self) -> &NotificationContent {
        &self.content
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("content", &self.content)
            .field("duration_ms", &self.duration_ms)
            .field("arrow", &self.arrow)
            .field("exit", &self.exit)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .finish()
    }
}
