//! Cooperative animation scheduling for frames.
//!
//! Every frame animation (minimize and close slides, notification appear and
//! vanish, resize repaint, dance) follows the same shape: sleep one tick,
//! check a cancellation token, perform one step, repeat. [`Animator`]
//! centralizes that loop, keyed by `(frame, kind)` so at most one task of
//! each kind runs per frame. Starting a key that is already running cancels
//! the prior task first.
//!
//! Cancellation is cooperative: a cancelled task exits at its next tick
//! boundary and never runs another step.

mod animator;
mod error;
mod key;

pub use animator::{AnimHandle, Animator, Completion, Step, run_steps};
pub use error::{Error, Result};
pub use key::{AnimKey, AnimationKind, FrameId};
pub use tokio_util::sync::CancellationToken;
