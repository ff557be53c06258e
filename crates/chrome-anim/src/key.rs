use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Kinds of animation a frame can run; one task per kind per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKind {
    /// One-shot background repaint after a resize gesture.
    Resize,
    /// Drag-related redraws.
    Drag,
    /// Notification queue drain loop.
    Notification,
    /// Minimize slide.
    Minimize,
    /// Close slide.
    Close,
    /// Screen-bouncing demo animation.
    Dance,
    /// Redraw of pinned frames following their owner.
    PinFollow,
}

/// Scheduler key: one active task per `(frame, kind)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimKey {
    /// Owning frame.
    pub frame: FrameId,
    /// Animation kind.
    pub kind: AnimationKind,
}

impl AnimKey {
    /// Build a key.
    #[must_use]
    pub const fn new(frame: FrameId, kind: AnimationKind) -> Self {
        Self { frame, kind }
    }
}

impl fmt::Display for AnimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:?}", self.frame, self.kind)
    }
}
