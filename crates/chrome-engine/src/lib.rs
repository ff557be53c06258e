//! Chrome Engine
//!
//! Headless engine for custom-drawn window frames:
//! - hit-tested chrome regions driving resize and drag gestures
//! - owner pinning: pinned frames overlapping the owner follow its drags
//! - a per-frame FIFO notification queue with slide-in/slide-out animations
//! - a structured, idempotent dispose lifecycle
//!
//! Rendering is a display list ([`PaintOp`]) and every platform concern is a
//! collaborator trait on [`ShellContext`], so the engine runs without a GUI
//! toolkit. Start with [`Shell`], build frames with [`Shell::frame`], and
//! observe state changes through [`Shell::subscribe`].
//!
//! All animations run on the tokio runtime the context was built on.

mod context;
mod dance;
mod drag;
mod error;
mod events;
mod frame;
mod notification;
mod paint;
mod pin;
mod registry;
mod resize;
mod shell;
pub mod test_support;

pub use chrome_anim::{AnimationKind, FrameId};
pub use context::{
    AutoConfirm, ClosingPrompt, FALLBACK_SCREEN, FixedScreens, FrameInfo, FrameKind, LogPopups,
    MonitorId, MonospaceMetrics, NullOwner, NullSurfaces, OwnerRegistry, PopupHost,
    PreferenceStore, ScreenInfo, ShellContext, ShellContextBuilder, SurfaceHost, TextMetrics,
    ThemeProvider,
};
pub use drag::DragSession;
pub use error::{Error, Result};
pub use events::{ChromeEvent, EventCursor};
pub use frame::{
    CloseAction, DEFAULT_BOUNDS, DisposeOutcome, FrameBuilder, FrameChrome, Lifecycle,
    PointerOutcome,
};
pub use notification::{
    ArrowSide, DismissFn, Exit, Notification, NotificationContent, NotificationId,
    NotificationPhase, RemovalReason,
};
pub use paint::{ChromeView, HitTestable, NotificationView, PaintContext, PaintOp, Paintable};
pub use pin::{PinLink, PinMode, PinSession};
pub use registry::FrameRegistry;
pub use resize::{ResizeSession, resize_bounds};
pub use shell::Shell;
