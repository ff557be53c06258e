use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for animation steps.
pub type Result<T> = StdResult<T, Error>;

/// Errors raised by animation steps or the scheduler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A step could not continue; the task ends without further steps.
    #[error("animation interrupted: {0}")]
    AnimationInterrupted(String),

    /// No tokio runtime is available to host animation tasks.
    #[error("no tokio runtime available for animations")]
    NoRuntime,
}
