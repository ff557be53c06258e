//! Top-level handle tying a [`ShellContext`] to the frames it creates.

use chrome_anim::FrameId;
use futures::future::join_all;
use tracing::{debug, info};

use crate::{
    context::ShellContext,
    events::EventCursor,
    frame::{DisposeOutcome, FrameBuilder, FrameChrome},
};

/// A shell: the context plus frame creation and whole-shell operations.
#[derive(Clone)]
pub struct Shell {
    /// Shared services.
    ctx: ShellContext,
}

impl Shell {
    /// Wrap an existing context.
    pub fn new(ctx: ShellContext) -> Self {
        Self { ctx }
    }

    /// Shared services.
    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    /// Start building a frame titled `title`.
    pub fn frame(&self, title: impl Into<String>) -> FrameBuilder {
        FrameBuilder::new(self.ctx.clone(), title)
    }

    /// Live frames in creation order.
    pub fn frames(&self) -> Vec<FrameChrome> {
        self.ctx.registry().frames()
    }

    /// The pin owner, if one has been shown.
    pub fn owner(&self) -> Option<FrameChrome> {
        let id = self.ctx.registry().owner()?;
        self.ctx.registry().get(id)
    }

    /// Live frame with `id`.
    pub fn get(&self, id: FrameId) -> Option<FrameChrome> {
        self.ctx.registry().get(id)
    }

    /// Subscribe to engine events published from now on.
    pub fn subscribe(&self) -> EventCursor {
        self.ctx.subscribe()
    }

    /// Start every open frame dancing.
    pub fn dance_all(&self) {
        let frames = self.frames();
        for f in &frames {
            f.start_dance();
        }
        debug!(count = frames.len(), "dance_all");
    }

    /// Stop every dancing frame.
    pub fn stop_dancing(&self) {
        for f in self.frames() {
            f.stop_dance();
        }
    }

    /// Fast-dispose every frame, then cancel any animation still running.
    ///
    /// Closing confirmations still apply; frames whose confirmation is
    /// declined stay open.
    pub async fn shutdown(&self) {
        let frames = self.frames();
        let outcomes = join_all(frames.iter().map(|f| f.dispose(true))).await;
        self.ctx.animator().clear_async().await;
        let disposed = outcomes
            .iter()
            .filter(|o| **o == DisposeOutcome::Disposed)
            .count();
        info!(frames = outcomes.len(), disposed, "shell_shutdown");
    }
}
