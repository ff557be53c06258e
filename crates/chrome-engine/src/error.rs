use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the chrome engine.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced to callers of the chrome engine.
///
/// Geometry requests never fail (they are clamped) and a repeated dispose is
/// reported as an outcome rather than an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Notification text is too short to render meaningfully.
    #[error("notification text has {chars} visible characters, need at least {min}")]
    InvalidContent {
        /// Visible characters found.
        chars: usize,
        /// Minimum required.
        min: usize,
    },

    /// The frame has been disposed or is closing.
    #[error("frame is disposed")]
    FrameDisposed,

    /// Animation scheduling failed.
    #[error("animation error: {0}")]
    Animation(#[from] chrome_anim::Error),
}
