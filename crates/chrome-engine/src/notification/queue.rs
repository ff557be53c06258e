//! FIFO notification state machine for one frame.
//!
//! Lock order: the queue lock may be held while calling into the host frame
//! (which takes the frame lock); frame code never calls into the queue while
//! holding its own lock.

use std::{
    collections::VecDeque,
    future,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Weak},
};

use chrome_anim::{
    AnimKey, AnimationKind, CancellationToken, Completion, Error as AnimError, FrameId, Step,
    run_steps,
};
use chrome_geom::{RectPx, Size};
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{
    sync::Notify,
    time::{Duration, Instant, sleep_until},
};
use tracing::{debug, error, trace, warn};

use super::{
    ArrowSide, DismissFn, Exit, Notification, NotificationContent, NotificationId,
    NotificationPhase, RemovalReason, layout,
};
use crate::{
    Error, Result,
    context::{FrameInfo, ShellContext},
    events::ChromeEvent,
    paint::NotificationView,
};

/// The frame side of a notification queue.
pub(crate) trait NotificationHost: Send + Sync {
    /// Identity of the hosting frame.
    fn frame_info(&self) -> FrameInfo;
    /// Current frame size, or `None` once the frame is closing.
    fn frame_size(&self) -> Option<Size>;
    /// Place (`Some`) or detach (`None`) the overlay for `id`.
    ///
    /// Returns `false` and changes nothing once `token` is cancelled or the
    /// frame is closing.
    fn place_popup(&self, id: NotificationId, rect: Option<RectPx>, token: &CancellationToken)
    -> bool;
    /// Detach the overlay for `id` unless the surface is already released.
    fn clear_popup(&self, id: NotificationId);
}

/// A queued request.
struct Pending {
    /// Assigned id.
    id: NotificationId,
    /// Request.
    item: Notification,
}

/// Phase of the active popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActivePhase {
    /// Sliding in.
    Appearing,
    /// At rest.
    Visible,
    /// Sliding out.
    Vanishing,
}

/// The popup currently on the frame.
struct Active {
    /// Notification id.
    id: NotificationId,
    /// Phase.
    phase: ActivePhase,
    /// Current frame-local rectangle.
    rect: RectPx,
    /// Resting rectangle for the current frame size.
    target: RectPx,
    /// Wrapped text.
    lines: Vec<String>,
    /// Anchor edge.
    arrow: ArrowSide,
    /// Entry and exit side.
    exit: Exit,
    /// Set by a click; honoured once the popup is visible.
    click_requested: bool,
    /// Click callback.
    on_dismiss: Option<DismissFn>,
    /// Time until auto-vanish; `None` when persistent.
    duration: Option<u64>,
}

/// Mutable queue state.
struct QueueState {
    /// Waiting requests in enqueue order.
    pending: VecDeque<Pending>,
    /// Popup on the frame.
    active: Option<Active>,
    /// A drain task is running.
    draining: bool,
    /// Bumped by every drain spawn and by `kill_all`; stale tasks compare it.
    generation: u64,
    /// Token of the running drain task.
    token: Option<CancellationToken>,
    /// Plain text of recently shown notifications.
    backlog: VecDeque<String>,
    /// Next id to assign.
    next_id: u64,
}

/// How showing one notification ended.
enum Shown {
    /// Done with this item; continue with the next.
    Next,
    /// The drain task must stop.
    Stop(Completion),
}

/// Per-frame notification queue.
pub(crate) struct NotificationQueue {
    /// Shared services.
    ctx: ShellContext,
    /// Frame id, for keys and events.
    frame: FrameId,
    /// Hosting frame.
    host: Weak<dyn NotificationHost>,
    /// State.
    state: Mutex<QueueState>,
    /// Wakes the drain task on clicks.
    clicked: Notify,
}

impl NotificationQueue {
    /// Queue for `frame`, rendering through `host`.
    pub(crate) fn new(ctx: ShellContext, frame: FrameId, host: Weak<dyn NotificationHost>) -> Self {
        Self {
            ctx,
            frame,
            host,
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                active: None,
                draining: false,
                generation: 0,
                token: None,
                backlog: VecDeque::new(),
                next_id: 1,
            }),
            clicked: Notify::new(),
        }
    }

    /// Animator key of the drain task.
    fn key(&self) -> AnimKey {
        AnimKey::new(self.frame, AnimationKind::Notification)
    }

    /// Publish a phase change.
    fn emit(&self, id: NotificationId, phase: NotificationPhase) {
        trace!(frame = %self.frame, %id, ?phase, "notification_phase");
        self.ctx.publish(ChromeEvent::Notification {
            frame: self.frame,
            id,
            phase,
            at_ms: self.ctx.elapsed_ms(),
        });
    }

    /// Validate and append `item`, starting the drain task if idle.
    pub(crate) fn enqueue(self: &Arc<Self>, item: Notification) -> Result<NotificationId> {
        let cfg = &self.ctx.config().notify;
        if let NotificationContent::Text(markup) = &item.content {
            let chars = layout::visible_chars(&layout::plain_text(markup));
            if chars < cfg.min_chars {
                debug!(frame = %self.frame, chars, "notification_rejected");
                return Err(Error::InvalidContent {
                    chars,
                    min: cfg.min_chars,
                });
            }
        }

        let mut st = self.state.lock();
        let id = NotificationId(st.next_id);
        st.next_id += 1;
        debug!(frame = %self.frame, %id, content = %item.content.describe(), "notification_queued");
        st.pending.push_back(Pending { id, item });
        self.emit(id, NotificationPhase::Queued);
        if !st.draining {
            self.start_drain(&mut st);
        }
        Ok(id)
    }

    /// Spawn a drain task; the caller holds the state lock.
    fn start_drain(self: &Arc<Self>, st: &mut QueueState) {
        st.draining = true;
        st.generation += 1;
        let generation = st.generation;
        let queue = self.clone();
        let handle = self.ctx.animator().spawn(self.key(), move |token| async move {
            queue.drain(generation, token).await
        });
        st.token = Some(handle.token().clone());
    }

    /// Drain task body: show pending items one at a time until empty.
    async fn drain(self: Arc<Self>, generation: u64, token: CancellationToken) -> Completion {
        let run = AssertUnwindSafe(self.drain_loop(generation, &token)).catch_unwind();
        let completion = match run.await {
            Ok(completion) => completion,
            Err(_) => {
                error!(frame = %self.frame, "notification_drain_panicked");
                Completion::Failed
            }
        };
        if completion != Completion::Finished {
            self.abandon(generation);
        }
        completion
    }

    /// Pop and show items until the queue is empty or the task must stop.
    async fn drain_loop(&self, generation: u64, token: &CancellationToken) -> Completion {
        loop {
            if token.is_cancelled() {
                return Completion::Cancelled;
            }
            let next = {
                let mut st = self.state.lock();
                if st.generation != generation {
                    return Completion::Cancelled;
                }
                match st.pending.pop_front() {
                    Some(p) => p,
                    None => {
                        st.draining = false;
                        st.token = None;
                        trace!(frame = %self.frame, "notification_drain_idle");
                        return Completion::Finished;
                    }
                }
            };
            match self.show(next, generation, token).await {
                Shown::Next => {}
                Shown::Stop(completion) => return completion,
            }
        }
    }

    /// Stop draining and drop the active popup after the task ended early.
    ///
    /// No-op when `kill_all` or a newer drain already owns the state. Pending
    /// items stay queued for the next enqueue.
    fn abandon(&self, generation: u64) {
        let active = {
            let mut st = self.state.lock();
            if st.generation != generation {
                return;
            }
            st.draining = false;
            st.token = None;
            st.active.take()
        };
        if let Some(active) = active {
            if let Some(host) = self.host.upgrade() {
                host.clear_popup(active.id);
            }
            self.emit(active.id, NotificationPhase::Removed(RemovalReason::Killed));
        }
    }

    /// Walk one notification through its lifecycle.
    async fn show(&self, pending: Pending, generation: u64, token: &CancellationToken) -> Shown {
        let Some(host) = self.host.upgrade() else {
            return Shown::Stop(Completion::Cancelled);
        };
        let Some(frame_size) = host.frame_size() else {
            return Shown::Stop(Completion::Cancelled);
        };
        let cfg = self.ctx.config();
        let Pending { id, item } = pending;
        let Notification {
            content,
            duration_ms,
            arrow,
            exit,
            on_dismiss,
        } = item;

        let measured = layout::measure(
            &content,
            &*self.ctx.inner.text,
            frame_size,
            arrow,
            &cfg.notify,
        );
        let plain = content.plain_text();
        if layout::is_oversized(measured.size, frame_size, cfg.notify.oversize_ratio) {
            debug!(frame = %self.frame, %id, size = ?measured.size, "notification_redirected");
            self.ctx.inner.popups.show_popup(&host.frame_info(), &content);
            self.remember(plain);
            self.emit(id, NotificationPhase::Redirected);
            return Shown::Next;
        }

        let duration = if self.ctx.inner.prefs.persistent_notifications_enabled() {
            None
        } else if duration_ms == 0 {
            Some(cfg.notify.auto_duration_ms(layout::word_count(&plain)))
        } else {
            Some(duration_ms)
        };

        let rest = layout::resting_rect(
            frame_size,
            measured.size,
            arrow,
            cfg.chrome.title_bar,
            cfg.notify.margin,
        );
        let start = layout::offstage_rect(frame_size, rest, exit).unwrap_or(rest);
        {
            let mut st = self.state.lock();
            if st.generation != generation {
                return Shown::Stop(Completion::Cancelled);
            }
            st.active = Some(Active {
                id,
                phase: ActivePhase::Appearing,
                rect: start,
                target: rest,
                lines: measured.lines,
                arrow,
                exit,
                click_requested: false,
                on_dismiss,
                duration,
            });
            if !host.place_popup(id, Some(start), token) {
                return Shown::Stop(Completion::Failed);
            }
            self.emit(id, NotificationPhase::Appearing);
        }
        self.remember(plain);

        match self.slide(id, generation, token, SlideGoal::Rest).await {
            Completion::Finished => self.rest_and_leave(id, generation, token, duration).await,
            other => Shown::Stop(other),
        }
    }

    /// Hold the popup at rest until it times out or is clicked, then remove it.
    async fn rest_and_leave(
        &self,
        id: NotificationId,
        generation: u64,
        token: &CancellationToken,
        duration: Option<u64>,
    ) -> Shown {
        {
            let mut st = self.state.lock();
            if st.generation != generation {
                return Shown::Stop(Completion::Cancelled);
            }
            if let Some(active) = st.active.as_mut().filter(|a| a.id == id) {
                active.phase = ActivePhase::Visible;
            }
            self.emit(id, NotificationPhase::Visible { duration_ms: duration });
        }

        let deadline = duration.map(|ms| Instant::now() + Duration::from_millis(ms));
        if !self.wait_visible(id, deadline, token).await {
            return Shown::Stop(Completion::Cancelled);
        }

        let callback = {
            let mut st = self.state.lock();
            if st.generation != generation {
                return Shown::Stop(Completion::Cancelled);
            }
            match st.active.as_mut().filter(|a| a.id == id) {
                Some(active) if active.click_requested => active.on_dismiss.take(),
                Some(_) => None,
                None => return Shown::Stop(Completion::Cancelled),
            }
        };
        if let Some(callback) = callback {
            if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
                warn!(frame = %self.frame, %id, "dismiss_callback_panicked");
            }
            return self.finish(id, generation, token, RemovalReason::Dismissed);
        }

        {
            let mut st = self.state.lock();
            if st.generation != generation {
                return Shown::Stop(Completion::Cancelled);
            }
            if let Some(active) = st.active.as_mut().filter(|a| a.id == id) {
                active.phase = ActivePhase::Vanishing;
            }
            self.emit(id, NotificationPhase::Vanishing);
        }
        match self.slide(id, generation, token, SlideGoal::Offstage).await {
            Completion::Finished => self.finish(id, generation, token, RemovalReason::Vanished),
            other => Shown::Stop(other),
        }
    }

    /// Detach the active popup and record its removal.
    fn finish(
        &self,
        id: NotificationId,
        generation: u64,
        token: &CancellationToken,
        reason: RemovalReason,
    ) -> Shown {
        let mut st = self.state.lock();
        if st.generation != generation {
            return Shown::Stop(Completion::Cancelled);
        }
        st.active = None;
        if let Some(host) = self.host.upgrade() {
            host.place_popup(id, None, token);
        }
        self.emit(id, NotificationPhase::Removed(reason));
        Shown::Next
    }

    /// Slide the active popup toward its goal, one step per tick.
    async fn slide(
        &self,
        id: NotificationId,
        generation: u64,
        token: &CancellationToken,
        goal: SlideGoal,
    ) -> Completion {
        let step_px = self.ctx.config().timings.notify_step_px;
        let tick = self.ctx.config().timings.tick();
        run_steps(token, tick, |_| {
            let mut st = self.state.lock();
            if st.generation != generation {
                return Err(AnimError::AnimationInterrupted("notification killed".into()));
            }
            let host = self
                .host
                .upgrade()
                .ok_or_else(|| AnimError::AnimationInterrupted("frame dropped".into()))?;
            let frame_size = host.frame_size().unwrap_or_default();
            let Some(active) = st.active.as_mut().filter(|a| a.id == id) else {
                return Err(AnimError::AnimationInterrupted("notification replaced".into()));
            };
            let to = match goal {
                SlideGoal::Rest => active.target,
                SlideGoal::Offstage => layout::offstage_rect(frame_size, active.rect, active.exit)
                    .unwrap_or(active.rect),
            };
            let next = if active.exit == Exit::None {
                to
            } else {
                layout::slide_step(active.rect, to, step_px)
            };
            if !host.place_popup(id, Some(next), token) {
                return Err(AnimError::AnimationInterrupted("frame closing".into()));
            }
            active.rect = next;
            Ok(if next == to { Step::Done } else { Step::Continue })
        })
        .await
    }

    /// Wait until the deadline passes or a click arrives; `false` when cancelled.
    async fn wait_visible(
        &self,
        id: NotificationId,
        deadline: Option<Instant>,
        token: &CancellationToken,
    ) -> bool {
        loop {
            let notified = self.clicked.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            {
                let st = self.state.lock();
                match st.active.as_ref().filter(|a| a.id == id) {
                    Some(active) if active.click_requested => return true,
                    Some(_) => {}
                    None => return false,
                }
            }
            let expire = async {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => future::pending::<()>().await,
                }
            };
            tokio::select! {
                biased;
                _ = token.cancelled() => return false,
                _ = expire => return true,
                _ = &mut notified => {}
            }
        }
    }

    /// Record shown text in the backlog.
    fn remember(&self, text: String) {
        let cap = self.ctx.config().notify.backlog;
        let mut st = self.state.lock();
        st.backlog.push_back(text);
        while st.backlog.len() > cap {
            st.backlog.pop_front();
        }
    }

    /// Deliver a click to the active popup.
    ///
    /// Returns `false` when nothing is showing or the popup is already
    /// vanishing.
    pub(crate) fn click(&self) -> bool {
        let mut st = self.state.lock();
        let Some(active) = st.active.as_mut() else {
            return false;
        };
        if active.phase == ActivePhase::Vanishing {
            return false;
        }
        active.click_requested = true;
        trace!(frame = %self.frame, id = %active.id, phase = ?active.phase, "notification_clicked");
        drop(st);
        self.clicked.notify_one();
        true
    }

    /// Halt every animation and empty the queue. The queue stays usable.
    pub(crate) fn kill_all(&self) {
        let (active, pending) = {
            let mut st = self.state.lock();
            st.generation += 1;
            st.draining = false;
            if let Some(token) = st.token.take() {
                token.cancel();
            }
            let pending: Vec<NotificationId> = st.pending.drain(..).map(|p| p.id).collect();
            (st.active.take(), pending)
        };
        if let Some(active) = &active {
            if let Some(host) = self.host.upgrade() {
                host.clear_popup(active.id);
            }
            self.emit(active.id, NotificationPhase::Removed(RemovalReason::Killed));
        }
        for id in &pending {
            self.emit(*id, NotificationPhase::Removed(RemovalReason::Killed));
        }
        debug!(
            frame = %self.frame,
            active = active.is_some(),
            pending = pending.len(),
            "notifications_killed"
        );
    }

    /// Re-anchor the active popup after the frame changed size.
    pub(crate) fn on_frame_resized(&self, frame_size: Size) {
        let cfg = self.ctx.config();
        let mut st = self.state.lock();
        let token = st.token.clone();
        let Some(active) = st.active.as_mut() else {
            return;
        };
        active.target = layout::resting_rect(
            frame_size,
            active.target.size(),
            active.arrow,
            cfg.chrome.title_bar,
            cfg.notify.margin,
        );
        if active.phase != ActivePhase::Visible {
            return;
        }
        let (Some(token), Some(host)) = (token, self.host.upgrade()) else {
            return;
        };
        if host.place_popup(active.id, Some(active.target), &token) {
            active.rect = active.target;
            trace!(
                frame = %self.frame,
                id = %active.id,
                rect = %active.rect,
                "notification_reanchored"
            );
        }
    }

    /// Paintable view of the active popup.
    pub(crate) fn view(&self) -> Option<NotificationView> {
        let st = self.state.lock();
        st.active.as_ref().map(|a| NotificationView {
            rect: a.rect,
            arrow: a.arrow,
            lines: a.lines.clone(),
            padding: self.ctx.config().notify.padding,
            arrow_len: self.ctx.config().notify.arrow,
        })
    }

    /// Active notification and its phase.
    pub(crate) fn active(&self) -> Option<(NotificationId, NotificationPhase)> {
        let st = self.state.lock();
        st.active.as_ref().map(|a| {
            let phase = match a.phase {
                ActivePhase::Appearing => NotificationPhase::Appearing,
                ActivePhase::Visible => NotificationPhase::Visible {
                    duration_ms: a.duration,
                },
                ActivePhase::Vanishing => NotificationPhase::Vanishing,
            };
            (a.id, phase)
        })
    }

    /// Number of queued (not yet shown) notifications.
    pub(crate) fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// True while a drain task is running.
    pub(crate) fn is_draining(&self) -> bool {
        self.state.lock().draining
    }

    /// Plain text of recently shown notifications, oldest first.
    pub(crate) fn backlog(&self) -> Vec<String> {
        self.state.lock().backlog.iter().cloned().collect()
    }
}

/// Where a slide ends.
#[derive(Clone, Copy, Debug)]
enum SlideGoal {
    /// The resting rectangle.
    Rest,
    /// Fully off-frame on the exit side.
    Offstage,
}
