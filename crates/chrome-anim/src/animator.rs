//! Keyed animation scheduler with cooperative cancellation.
//!
//! Tasks are spawned onto a tokio runtime and registered under an [`AnimKey`].
//! A task that finishes removes its own entry unless it has already been
//! replaced by a newer task for the same key.

use std::{
    collections::HashMap,
    future::Future,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    sync::oneshot,
    task::JoinHandle,
    time::{self, timeout},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, trace, warn};

use crate::{AnimKey, Error, FrameId, Result};

/// Maximum time `clear_async` waits for each task to wind down.
pub const STOP_WAIT_TIMEOUT_MS: u64 = 50;

/// Outcome of one animation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Schedule another tick.
    Continue,
    /// The animation reached its end state.
    Done,
}

/// How an animation task ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Ran to its natural end.
    Finished,
    /// Stopped at a tick boundary because its token was cancelled.
    Cancelled,
    /// A step returned an error or panicked.
    Failed,
}

/// Registry entry for a running task.
struct AnimEntry {
    /// Generation used to tell a task from its replacement.
    generation: u64,
    /// Token observed by the task once per tick.
    token: CancellationToken,
    /// Task handle, awaited by `clear_async`.
    handle: JoinHandle<()>,
}

/// Handle returned to the starter of an animation.
#[derive(Debug)]
pub struct AnimHandle {
    /// Key the task runs under.
    key: AnimKey,
    /// Token shared with the task.
    token: CancellationToken,
    /// Completion signal.
    done: oneshot::Receiver<Completion>,
}

impl AnimHandle {
    /// Key the task runs under.
    #[must_use]
    pub fn key(&self) -> AnimKey {
        self.key
    }

    /// Request cancellation; the task exits at its next tick boundary.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token shared with the task.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Wait for the task to end.
    pub async fn finished(self) -> Completion {
        self.done.await.unwrap_or(Completion::Failed)
    }
}

/// Keyed scheduler for frame animations.
#[derive(Clone)]
pub struct Animator {
    /// Runtime hosting the tasks.
    runtime: Handle,
    /// Active tasks by key.
    entries: Arc<Mutex<HashMap<AnimKey, AnimEntry>>>,
    /// Generation counter.
    next_generation: Arc<AtomicU64>,
}

impl Animator {
    /// Create an animator that spawns onto `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Create an animator bound to the current tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| Error::NoRuntime)
    }

    /// Check if a task is active for `key`.
    pub fn is_active(&self, key: AnimKey) -> bool {
        self.entries.lock().contains_key(&key)
    }

    /// Number of active tasks.
    pub fn active_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Start or replace a stepping animation for `key`.
    ///
    /// `on_tick` receives the zero-based step index after each tick.
    pub fn start<F>(&self, key: AnimKey, tick: Duration, on_tick: F) -> AnimHandle
    where
        F: FnMut(u32) -> Result<Step> + Send + 'static,
    {
        self.spawn(key, move |token| async move {
            run_steps(&token, tick, on_tick).await
        })
    }

    /// Start or replace a long-running task for `key`.
    ///
    /// The task receives its cancellation token and must observe it at every
    /// suspension point; [`run_steps`] does this for stepping loops.
    pub fn spawn<F, Fut>(&self, key: AnimKey, task: F) -> AnimHandle
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Completion> + Send + 'static,
    {
        self.stop(key);

        let token = CancellationToken::new();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (done_tx, done_rx) = oneshot::channel();
        let fut = task(token.clone());
        let entries = self.entries.clone();

        let wrapped = async move {
            trace!(anim = %key, generation, "anim_start");
            let completion = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(c) => c,
                Err(_) => {
                    error!(anim = %key, "anim_task_panicked");
                    Completion::Failed
                }
            };
            {
                let mut map = entries.lock();
                if map.get(&key).is_some_and(|e| e.generation == generation) {
                    map.remove(&key);
                }
            }
            trace!(anim = %key, generation, ?completion, "anim_end");
            let _ = done_tx.send(completion);
        };

        // Hold the lock across spawn so the task cannot deregister before it
        // is registered.
        let mut map = self.entries.lock();
        let handle = self.runtime.spawn(wrapped);
        map.insert(
            key,
            AnimEntry {
                generation,
                token: token.clone(),
                handle,
            },
        );
        drop(map);

        AnimHandle {
            key,
            token,
            done: done_rx,
        }
    }

    /// Cancel the task for `key`, if any (non-blocking).
    pub fn stop(&self, key: AnimKey) {
        if let Some(entry) = self.entries.lock().remove(&key) {
            entry.token.cancel();
            trace!(anim = %key, "anim_stop");
        }
    }

    /// Cancel every task owned by `frame` (non-blocking).
    pub fn cancel_frame(&self, frame: FrameId) {
        let cancelled: Vec<AnimEntry> = {
            let mut map = self.entries.lock();
            let keys: Vec<AnimKey> = map.keys().filter(|k| k.frame == frame).copied().collect();
            keys.iter().filter_map(|k| map.remove(k)).collect()
        };
        for entry in &cancelled {
            entry.token.cancel();
        }
        trace!(%frame, count = cancelled.len(), "anim_cancel_frame");
    }

    /// Cancel all tasks and wait briefly for each to finish.
    pub async fn clear_async(&self) {
        let entries: Vec<AnimEntry> = {
            let mut map = self.entries.lock();
            map.drain().map(|(_, e)| e).collect()
        };

        for e in &entries {
            e.token.cancel();
        }

        for e in entries {
            let _ = timeout(Duration::from_millis(STOP_WAIT_TIMEOUT_MS), e.handle).await;
        }
        trace!("anim_clear_async");
    }
}

/// Run `on_tick` once per `tick` until it finishes, fails, or `token` is cancelled.
///
/// Cancellation is checked before every step, so a cancelled loop never runs
/// another step. Errors and panics inside a step are logged and end the loop.
pub async fn run_steps<F>(token: &CancellationToken, tick: Duration, mut on_tick: F) -> Completion
where
    F: FnMut(u32) -> Result<Step>,
{
    let mut index: u32 = 0;
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return Completion::Cancelled,
            _ = time::sleep(tick) => {}
        }
        if token.is_cancelled() {
            return Completion::Cancelled;
        }
        match panic::catch_unwind(AssertUnwindSafe(|| on_tick(index))) {
            Ok(Ok(Step::Continue)) => index = index.saturating_add(1),
            Ok(Ok(Step::Done)) => return Completion::Finished,
            Ok(Err(e)) => {
                warn!(error = %e, step = index, "animation_interrupted");
                return Completion::Failed;
            }
            Err(_) => {
                error!(step = index, "animation_step_panicked");
                return Completion::Failed;
            }
        }
    }
}
