//! The frame: a custom-chromed window with its gestures, pin state,
//! notification queue, and dispose lifecycle.
//!
//! All geometry writes go through the frame's state lock. Animation tasks
//! never write directly; they call [`FrameInner::animate_bounds`], which
//! refuses once the task's token is cancelled or the frame is disposed.

use std::{
    fmt, mem,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
};

use chrome_anim::{
    AnimKey, AnimationKind, CancellationToken, Completion, Error as AnimError, FrameId,
    Result as AnimResult, Step, run_steps,
};
use chrome_geom::{ChromeButton, ChromeLayout, Direction, Hit, Point, RectPx, Size, SizeLimits};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    Error, Result,
    context::{FrameInfo, FrameKind, ShellContext},
    dance::{DanceVelocity, dance_step},
    drag::DragSession,
    events::ChromeEvent,
    notification::{
        ArrowSide, DismissFn, Exit, Notification, NotificationHost, NotificationId,
        NotificationPhase, NotificationQueue,
    },
    paint::{ChromeView, HitTestable, PaintContext, PaintOp, Paintable},
    pin::PinMode,
    resize::{ResizeSession, resize_bounds},
};

/// Default bounds of a new frame.
pub const DEFAULT_BOUNDS: RectPx = RectPx::new(100, 100, 640, 480);

/// Callback run before or after a frame closes.
pub type CloseAction = Box<dyn FnOnce() + Send + 'static>;

/// Lifecycle of a frame. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Interactive.
    Open,
    /// Dispose passed confirmation; only the close slide may still move it.
    Closing,
    /// Surface released; never mutated again.
    Disposed,
}

impl Lifecycle {
    /// Decode the atomic representation.
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Open,
            1 => Self::Closing,
            _ => Self::Disposed,
        }
    }
}

/// Result of [`FrameChrome::dispose`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisposeOutcome {
    /// This call disposed the frame.
    Disposed,
    /// The closing confirmation was declined; the frame stays open.
    Declined,
    /// Another call already disposed or is disposing the frame.
    AlreadyDisposed,
}

/// What a pointer event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Nothing happened.
    Ignored,
    /// The active notification received a click.
    NotificationClicked,
    /// A resize gesture began.
    ResizeStarted(Direction),
    /// A drag gesture began.
    DragStarted,
    /// A title-bar button is held down.
    ButtonPressed(ChromeButton),
    /// The press landed in the content area.
    Client,
    /// The frame moved to these bounds.
    Moved(RectPx),
    /// The frame was resized to these bounds.
    Resized(RectPx),
    /// The resize gesture ended.
    ResizeEnded,
    /// The drag gesture ended.
    DragEnded,
    /// A title-bar button was clicked; dispatch with [`FrameChrome::perform`].
    Action(ChromeButton),
}

/// Pointer gesture in progress.
#[derive(Clone, Copy, Debug, Default)]
enum Gesture {
    /// No button held.
    #[default]
    Idle,
    /// Dragging the frame.
    Drag(DragSession),
    /// Resizing the frame.
    Resize(ResizeSession),
    /// Holding a title-bar button.
    Button(ChromeButton),
}

/// Geometry and interaction state, guarded by the frame lock.
struct FrameState {
    /// Screen bounds.
    bounds: RectPx,
    /// Size limits.
    limits: SizeLimits,
    /// Border zones resize.
    resizable: bool,
    /// Cleared when closing.
    resize_enabled: bool,
    /// Drag regions move the frame.
    drag_enabled: bool,
    /// Pin state.
    pin: PinMode,
    /// Has input focus.
    focused: bool,
    /// Shown at least once.
    visible: bool,
    /// Iconified after minimize.
    iconified: bool,
    /// Origin restored after iconify.
    restore: Point,
    /// Region layout for the current size.
    layout: ChromeLayout,
    /// Gesture in progress.
    gesture: Gesture,
    /// Repaint the background once after each resize gesture.
    refresh_on_resize: bool,
}

/// A bounds write that changed something.
#[derive(Clone, Copy, Debug)]
struct BoundsChange {
    /// New bounds.
    bounds: RectPx,
    /// The size changed, not just the origin.
    resized: bool,
}

/// Close hooks.
#[derive(Default)]
struct Hooks {
    /// Message the user must confirm before closing.
    closing_message: Option<String>,
    /// Run before anything is torn down.
    pre_close: Vec<CloseAction>,
    /// Run after the surface is released.
    post_close: Vec<CloseAction>,
}

/// Shared frame data.
pub(crate) struct FrameInner {
    /// Id.
    id: FrameId,
    /// Title.
    title: String,
    /// Console or child.
    kind: FrameKind,
    /// Shell services.
    ctx: ShellContext,
    /// Geometry and interaction state.
    state: Mutex<FrameState>,
    /// [`Lifecycle`] as u8; written with the state lock held.
    lifecycle: AtomicU8,
    /// Set by the first dispose call that gets past the check.
    dispose_started: AtomicBool,
    /// Notification queue.
    notifications: Arc<NotificationQueue>,
    /// Close hooks.
    hooks: Mutex<Hooks>,
}

impl FrameInner {
    /// Current lifecycle.
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_u8(self.lifecycle.load(Ordering::Acquire))
    }

    /// Move the lifecycle forward; the caller holds the state lock.
    fn set_lifecycle(&self, _st: &mut FrameState, to: Lifecycle) {
        self.lifecycle.store(to as u8, Ordering::Release);
    }

    /// Identity for collaborators.
    fn info(&self) -> FrameInfo {
        FrameInfo {
            id: self.id,
            title: self.title.clone(),
            kind: self.kind,
        }
    }

    /// Clamp and store `rect` and push it to the surface.
    ///
    /// Returns `None` when the bounds did not change.
    fn write_bounds(&self, st: &mut FrameState, rect: RectPx) -> Option<BoundsChange> {
        let size = st.limits.clamp(rect.size());
        let applied = RectPx::from_parts(rect.origin(), size);
        if applied == st.bounds {
            return None;
        }
        let resized = size != st.bounds.size();
        st.bounds = applied;
        if resized {
            st.layout = ChromeLayout::for_size(size, self.ctx.config().chrome);
        }
        self.ctx.inner.surfaces.apply_bounds(self.id, applied);
        Some(BoundsChange {
            bounds: applied,
            resized,
        })
    }

    /// Publish a bounds change and re-anchor notifications when resized.
    ///
    /// Must be called without the state lock.
    fn after_bounds(&self, change: Option<BoundsChange>) {
        let Some(change) = change else {
            return;
        };
        self.ctx.publish(ChromeEvent::BoundsChanged {
            frame: self.id,
            bounds: change.bounds,
        });
        if change.resized {
            self.notifications.on_frame_resized(change.bounds.size());
        }
    }

    /// Set bounds from an animation step.
    ///
    /// Refuses once `token` is cancelled or the frame is disposed.
    fn animate_bounds(&self, token: &CancellationToken, rect: RectPx) -> AnimResult<()> {
        let mut st = self.state.lock();
        if token.is_cancelled() {
            return Err(AnimError::AnimationInterrupted("cancelled".into()));
        }
        if self.lifecycle() == Lifecycle::Disposed {
            return Err(AnimError::AnimationInterrupted("frame disposed".into()));
        }
        let change = self.write_bounds(&mut st, rect);
        drop(st);
        self.after_bounds(change);
        Ok(())
    }

    /// Chrome snapshot; the caller holds the state lock.
    fn chrome_view(&self, st: &FrameState) -> ChromeView {
        ChromeView {
            layout: st.layout.clone(),
            resizable: st.resizable && st.resize_enabled,
            title: self.title.clone(),
            pin: st.pin,
            focused: st.focused,
        }
    }
}

impl NotificationHost for FrameInner {
    fn frame_info(&self) -> FrameInfo {
        self.info()
    }

    fn frame_size(&self) -> Option<Size> {
        let st = self.state.lock();
        (self.lifecycle() == Lifecycle::Open).then(|| st.bounds.size())
    }

    fn place_popup(
        &self,
        id: NotificationId,
        rect: Option<RectPx>,
        token: &CancellationToken,
    ) -> bool {
        let _st = self.state.lock();
        if token.is_cancelled() || self.lifecycle() != Lifecycle::Open {
            return false;
        }
        self.ctx.inner.surfaces.apply_overlay(self.id, id, rect);
        true
    }

    fn clear_popup(&self, id: NotificationId) {
        let _st = self.state.lock();
        if self.lifecycle() != Lifecycle::Disposed {
            self.ctx.inner.surfaces.apply_overlay(self.id, id, None);
        }
    }
}

/// Builder for [`FrameChrome`].
pub struct FrameBuilder {
    /// Shell services.
    ctx: ShellContext,
    /// Title.
    title: String,
    /// Initial bounds.
    bounds: RectPx,
    /// Size limits.
    limits: SizeLimits,
    /// Border zones resize.
    resizable: bool,
    /// Console or child.
    kind: FrameKind,
    /// Repaint once after each resize gesture.
    refresh_on_resize: bool,
}

impl FrameBuilder {
    /// Builder for a frame titled `title`.
    pub fn new(ctx: ShellContext, title: impl Into<String>) -> Self {
        Self {
            ctx,
            title: title.into(),
            bounds: DEFAULT_BOUNDS,
            limits: SizeLimits::default(),
            resizable: true,
            kind: FrameKind::Child,
            refresh_on_resize: false,
        }
    }

    /// Initial bounds; the size is clamped to the limits.
    pub fn bounds(mut self, bounds: RectPx) -> Self {
        self.bounds = bounds;
        self
    }

    /// Size limits.
    pub fn limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Whether border zones resize the frame.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Make this a console frame; the first console shown owns pinned frames.
    pub fn console(mut self) -> Self {
        self.kind = FrameKind::Console;
        self
    }

    /// Repaint the background once after each resize gesture.
    pub fn refresh_background_on_resize(mut self, on: bool) -> Self {
        self.refresh_on_resize = on;
        self
    }

    /// Create the frame and its surface. The frame is not shown yet.
    pub fn build(self) -> FrameChrome {
        let Self {
            ctx,
            title,
            bounds,
            limits,
            resizable,
            kind,
            refresh_on_resize,
        } = self;
        let id = ctx.registry().allocate_id();
        let size = limits.clamp(bounds.size());
        let bounds = RectPx::from_parts(bounds.origin(), size);
        let layout = ChromeLayout::for_size(size, ctx.config().chrome);
        let inner = Arc::new_cyclic(|weak: &Weak<FrameInner>| {
            let host: Weak<dyn NotificationHost> = weak.clone();
            FrameInner {
                id,
                title,
                kind,
                ctx: ctx.clone(),
                state: Mutex::new(FrameState {
                    bounds,
                    limits,
                    resizable,
                    resize_enabled: true,
                    drag_enabled: true,
                    pin: PinMode::None,
                    focused: false,
                    visible: false,
                    iconified: false,
                    restore: bounds.origin(),
                    layout,
                    gesture: Gesture::Idle,
                    refresh_on_resize,
                }),
                lifecycle: AtomicU8::new(Lifecycle::Open as u8),
                dispose_started: AtomicBool::new(false),
                notifications: Arc::new(NotificationQueue::new(ctx.clone(), id, host)),
                hooks: Mutex::new(Hooks::default()),
            }
        });
        ctx.registry().insert(id, Arc::downgrade(&inner));
        ctx.inner.surfaces.create(id, bounds);
        debug!(frame = %id, title = %inner.title, %bounds, "frame_created");
        FrameChrome { inner }
    }
}

/// A custom-chromed window.
///
/// Cloning yields another handle to the same frame.
#[derive(Clone)]
pub struct FrameChrome {
    /// Shared data.
    inner: Arc<FrameInner>,
}

impl FrameChrome {
    /// Wrap shared frame data.
    pub(crate) fn from_inner(inner: Arc<FrameInner>) -> Self {
        Self { inner }
    }

    /// Frame id.
    pub fn id(&self) -> FrameId {
        self.inner.id
    }

    /// Title.
    pub fn title(&self) -> &str {
        &self.inner.title
    }

    /// Console or child.
    pub fn kind(&self) -> FrameKind {
        self.inner.kind
    }

    /// Identity as seen by collaborators.
    pub fn info(&self) -> FrameInfo {
        self.inner.info()
    }

    /// Current lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle()
    }

    /// True until dispose passes confirmation.
    pub fn is_open(&self) -> bool {
        self.lifecycle() == Lifecycle::Open
    }

    /// True once the surface is released.
    pub fn is_disposed(&self) -> bool {
        self.lifecycle() == Lifecycle::Disposed
    }

    /// Screen bounds.
    pub fn bounds(&self) -> RectPx {
        self.inner.state.lock().bounds
    }

    /// Size limits.
    pub fn limits(&self) -> SizeLimits {
        self.inner.state.lock().limits
    }

    /// Origin restored after iconify.
    pub fn restore_point(&self) -> Point {
        self.inner.state.lock().restore
    }

    /// Pin state.
    pub fn pin_mode(&self) -> PinMode {
        self.inner.state.lock().pin
    }

    /// True when this frame owns pinned frames.
    pub fn is_owner(&self) -> bool {
        self.inner.ctx.registry().owner() == Some(self.inner.id)
    }

    /// Has input focus.
    pub fn is_focused(&self) -> bool {
        self.inner.state.lock().focused
    }

    /// Iconified after minimize.
    pub fn is_iconified(&self) -> bool {
        self.inner.state.lock().iconified
    }

    /// Show the frame: register with the owner registry and take focus.
    pub fn show(&self) {
        let first = {
            let mut st = self.inner.state.lock();
            if self.inner.lifecycle() != Lifecycle::Open {
                return;
            }
            !mem::replace(&mut st.visible, true)
        };
        if !first {
            return;
        }
        let owner = self
            .inner
            .ctx
            .registry()
            .claim_owner(self.inner.id, self.inner.kind);
        self.inner.ctx.inner.owner.on_frame_shown(&self.inner.info());
        self.inner.ctx.publish(ChromeEvent::FrameShown {
            frame: self.inner.id,
        });
        debug!(frame = %self.inner.id, owner, "frame_shown");
        self.focus();
    }

    /// Give this frame input focus and take it from every other frame.
    pub fn focus(&self) {
        for other in self.inner.ctx.registry().frames() {
            if other.id() != self.inner.id {
                other.blur();
            }
        }
        let mut st = self.inner.state.lock();
        if self.inner.lifecycle() == Lifecycle::Open {
            st.focused = true;
        }
    }

    /// Drop input focus.
    pub fn blur(&self) {
        self.inner.state.lock().focused = false;
    }

    /// Set bounds, clamping the size to the limits.
    ///
    /// Returns the bounds in effect afterwards. Ignored unless the frame is open.
    pub fn set_bounds(&self, rect: RectPx) -> RectPx {
        let mut st = self.inner.state.lock();
        if self.inner.lifecycle() != Lifecycle::Open {
            return st.bounds;
        }
        let change = self.inner.write_bounds(&mut st, rect);
        let applied = st.bounds;
        drop(st);
        self.inner.after_bounds(change);
        applied
    }

    /// Move the frame without resizing it.
    pub fn set_location(&self, origin: Point) -> RectPx {
        let bounds = self.bounds();
        self.set_bounds(bounds.with_origin(origin))
    }

    /// Replace the size limits and re-clamp the current size.
    pub fn set_limits(&self, limits: SizeLimits) -> RectPx {
        let bounds = {
            let mut st = self.inner.state.lock();
            st.limits = limits;
            st.bounds
        };
        self.set_bounds(bounds)
    }

    /// Whether border zones resize the frame.
    pub fn set_resizable(&self, resizable: bool) {
        self.inner.state.lock().resizable = resizable;
    }

    /// Enable or disable dragging.
    pub fn set_drag_enabled(&self, enabled: bool) {
        self.inner.state.lock().drag_enabled = enabled;
    }

    /// Classify a screen point.
    pub fn hit_test(&self, p: Point) -> Hit {
        let st = self.inner.state.lock();
        let (dx, dy) = st.bounds.origin().delta_to(p);
        self.inner.chrome_view(&st).hit_test(Point::new(dx, dy))
    }

    /// Pointer pressed at screen point `p`.
    pub fn pointer_pressed(&self, p: Point) -> PointerOutcome {
        if !self.is_open() {
            return PointerOutcome::Ignored;
        }
        let local = {
            let bounds = self.bounds();
            let (dx, dy) = bounds.origin().delta_to(p);
            Point::new(dx, dy)
        };
        if let Some(view) = self.inner.notifications.view()
            && view.hit_test(local) == Hit::Client
            && self.inner.notifications.click()
        {
            return PointerOutcome::NotificationClicked;
        }
        self.focus();

        let mut st = self.inner.state.lock();
        if self.inner.lifecycle() != Lifecycle::Open {
            return PointerOutcome::Ignored;
        }
        let bounds = st.bounds;
        let outcome = match self.inner.chrome_view(&st).hit_test(local) {
            Hit::Resize(dir) => match ResizeSession::begin(p, bounds, dir) {
                Some(session) => {
                    st.gesture = Gesture::Resize(session);
                    PointerOutcome::ResizeStarted(dir)
                }
                None => PointerOutcome::Ignored,
            },
            Hit::Drag => {
                st.gesture = Gesture::Drag(DragSession::begin(p, bounds));
                PointerOutcome::DragStarted
            }
            Hit::Button(button) => {
                st.gesture = Gesture::Button(button);
                PointerOutcome::ButtonPressed(button)
            }
            Hit::Client => PointerOutcome::Client,
            Hit::Outside => PointerOutcome::Ignored,
        };
        drop(st);
        trace!(frame = %self.inner.id, ?outcome, "pointer_pressed");
        if outcome == PointerOutcome::DragStarted && self.is_owner() {
            self.inner
                .ctx
                .registry()
                .begin_pin_session(self.inner.id, bounds);
        }
        outcome
    }

    /// Pointer moved to screen point `p` with the button held.
    pub fn pointer_dragged(&self, p: Point) -> PointerOutcome {
        let mut st = self.inner.state.lock();
        if self.inner.lifecycle() != Lifecycle::Open {
            return PointerOutcome::Ignored;
        }
        match st.gesture {
            Gesture::Drag(session) => {
                if !(st.drag_enabled && st.focused) {
                    return PointerOutcome::Ignored;
                }
                let target = st.bounds.with_origin(session.target(p));
                let change = self.inner.write_bounds(&mut st, target);
                let applied = st.bounds;
                st.restore = applied.origin();
                drop(st);
                self.inner.after_bounds(change);
                self.move_followers(applied.origin());
                PointerOutcome::Moved(applied)
            }
            Gesture::Resize(session) => {
                if !st.resize_enabled {
                    return PointerOutcome::Ignored;
                }
                let screen = self.inner.ctx.inner.screens.screen_for(&session.start_bounds);
                let target = resize_bounds(&session, p, &st.limits, screen);
                let change = self.inner.write_bounds(&mut st, target);
                let applied = st.bounds;
                drop(st);
                self.inner.after_bounds(change);
                PointerOutcome::Resized(applied)
            }
            Gesture::Button(_) | Gesture::Idle => PointerOutcome::Ignored,
        }
    }

    /// Reposition frames linked to this owner's drag session.
    fn move_followers(&self, origin: Point) {
        let registry = self.inner.ctx.registry();
        for (id, target) in registry.pin_targets(self.inner.id, origin) {
            if let Some(frame) = registry.get(id) {
                frame.set_location(target);
            }
        }
    }

    /// Pointer released at screen point `p`.
    pub fn pointer_released(&self, p: Point) -> PointerOutcome {
        let (gesture, refresh, local) = {
            let mut st = self.inner.state.lock();
            let (dx, dy) = st.bounds.origin().delta_to(p);
            (
                mem::take(&mut st.gesture),
                st.refresh_on_resize,
                Point::new(dx, dy),
            )
        };
        match gesture {
            Gesture::Resize(_) => {
                if refresh && self.is_open() {
                    self.schedule_background_refresh();
                }
                PointerOutcome::ResizeEnded
            }
            Gesture::Drag(_) => {
                self.inner.ctx.registry().end_pin_session(self.inner.id);
                PointerOutcome::DragEnded
            }
            Gesture::Button(button) => {
                if self.hit_test_local(local) == Hit::Button(button) {
                    PointerOutcome::Action(button)
                } else {
                    PointerOutcome::Ignored
                }
            }
            Gesture::Idle => PointerOutcome::Ignored,
        }
    }

    /// Classify a frame-local point.
    fn hit_test_local(&self, local: Point) -> Hit {
        let st = self.inner.state.lock();
        self.inner.chrome_view(&st).hit_test(local)
    }

    /// Repaint the background once, one tick from now.
    fn schedule_background_refresh(&self) {
        let weak = Arc::downgrade(&self.inner);
        let key = AnimKey::new(self.inner.id, AnimationKind::Resize);
        let tick = self.inner.ctx.config().timings.tick();
        self.inner.ctx.animator().start(key, tick, move |_| {
            let inner = weak
                .upgrade()
                .ok_or_else(|| AnimError::AnimationInterrupted("frame dropped".into()))?;
            if inner.lifecycle() == Lifecycle::Open {
                inner
                    .ctx
                    .publish(ChromeEvent::BackgroundRefreshed { frame: inner.id });
            }
            Ok(Step::Done)
        });
    }

    /// Run the action of a title-bar button.
    pub async fn perform(&self, button: ChromeButton) {
        match button {
            ChromeButton::Close => {
                self.dispose(false).await;
            }
            ChromeButton::Minimize => {
                self.minimize_animation().await;
            }
            ChromeButton::Pin => {
                let next = self.pin_mode().next();
                self.set_pin_mode(next);
            }
        }
    }

    /// Set the pin mode and publish the change.
    fn set_pin_mode(&self, mode: PinMode) {
        let changed = {
            let mut st = self.inner.state.lock();
            mem::replace(&mut st.pin, mode) != mode
        };
        if changed {
            debug!(frame = %self.inner.id, %mode, "pin_changed");
            self.inner.ctx.publish(ChromeEvent::PinChanged {
                frame: self.inner.id,
                mode,
            });
        }
    }

    /// Pin to the screen (always on top). Clears owner pinning.
    pub fn set_pinned(&self, pinned: bool) {
        if pinned {
            self.set_pin_mode(PinMode::Screen);
        } else if self.pin_mode() == PinMode::Screen {
            self.set_pin_mode(PinMode::None);
        }
    }

    /// Pin to the owner frame (always on top and following). Clears screen pinning.
    pub fn set_pinned_to_owner(&self, pinned: bool) {
        if pinned {
            self.set_pin_mode(PinMode::Owner);
        } else if self.pin_mode() == PinMode::Owner {
            self.set_pin_mode(PinMode::None);
        }
    }

    /// Require the user to confirm `message` before closing; `None` removes it.
    pub fn set_closing_confirmation(&self, message: Option<String>) {
        self.inner.hooks.lock().closing_message = message;
    }

    /// Run `f` at the start of dispose, after confirmation.
    pub fn add_pre_close_action(&self, f: impl FnOnce() + Send + 'static) {
        self.inner.hooks.lock().pre_close.push(Box::new(f));
    }

    /// Run `f` at the end of dispose, after the surface is released.
    pub fn add_post_close_action(&self, f: impl FnOnce() + Send + 'static) {
        self.inner.hooks.lock().post_close.push(Box::new(f));
    }

    /// Queue a text notification.
    ///
    /// `duration_ms == 0` computes the duration from the word count.
    pub fn notify(
        &self,
        markup: impl Into<String>,
        duration_ms: u64,
        exit: Exit,
        arrow: ArrowSide,
        on_dismiss: Option<DismissFn>,
    ) -> Result<NotificationId> {
        let mut n = Notification::text(markup)
            .duration_ms(duration_ms)
            .exit(exit)
            .arrow(arrow);
        n.on_dismiss = on_dismiss;
        self.notify_with(n)
    }

    /// Queue a notification built with [`Notification`].
    pub fn notify_with(&self, notification: Notification) -> Result<NotificationId> {
        if !self.is_open() {
            return Err(Error::FrameDisposed);
        }
        self.inner.notifications.enqueue(notification)
    }

    /// Click the active notification, as a pointer press on it would.
    pub fn click_notification(&self) -> bool {
        self.inner.notifications.click()
    }

    /// Halt and discard every notification of this frame.
    pub fn kill_notifications(&self) {
        self.inner.notifications.kill_all();
    }

    /// Active notification and its phase.
    pub fn active_notification(&self) -> Option<(NotificationId, NotificationPhase)> {
        self.inner.notifications.active()
    }

    /// Notifications waiting behind the active one.
    pub fn pending_notifications(&self) -> usize {
        self.inner.notifications.pending_len()
    }

    /// True while the notification drain task runs.
    pub fn is_notifying(&self) -> bool {
        self.inner.notifications.is_draining()
    }

    /// Plain text of recently shown notifications, oldest first.
    pub fn notification_backlog(&self) -> Vec<String> {
        self.inner.notifications.backlog()
    }

    /// Bounce the frame around its monitor until stopped.
    pub fn start_dance(&self) {
        if !self.is_open() {
            return;
        }
        let weak = Arc::downgrade(&self.inner);
        let key = AnimKey::new(self.inner.id, AnimationKind::Dance);
        let timings = self.inner.ctx.config().timings;
        let tick = timings.tick();
        self.inner.ctx.animator().spawn(key, move |token| async move {
            let mut vel = DanceVelocity::new(timings.dance_step_px);
            run_steps(&token, tick, |_| {
                let inner = weak
                    .upgrade()
                    .ok_or_else(|| AnimError::AnimationInterrupted("frame dropped".into()))?;
                let bounds = inner.state.lock().bounds;
                let screen = inner.ctx.inner.screens.screen_for(&bounds);
                let origin = dance_step(bounds, screen, &mut vel);
                inner.animate_bounds(&token, bounds.with_origin(origin))?;
                Ok(Step::Continue)
            })
            .await
        });
        debug!(frame = %self.inner.id, "dance_started");
    }

    /// Stop dancing.
    pub fn stop_dance(&self) {
        self.inner
            .ctx
            .animator()
            .stop(AnimKey::new(self.inner.id, AnimationKind::Dance));
    }

    /// True while dancing.
    pub fn is_dancing(&self) -> bool {
        self.inner
            .ctx
            .animator()
            .is_active(AnimKey::new(self.inner.id, AnimationKind::Dance))
    }

    /// Slide `from` to `to` over `frames` steps under `kind`; waits for the end.
    async fn slide(
        &self,
        kind: AnimationKind,
        from: RectPx,
        to: RectPx,
        frames: u32,
    ) -> Completion {
        let weak = Arc::downgrade(&self.inner);
        let tick = self.inner.ctx.config().timings.tick();
        let frames = frames.max(1);
        let handle = self
            .inner
            .ctx
            .animator()
            .spawn(AnimKey::new(self.inner.id, kind), move |token| async move {
                run_steps(&token, tick, |i| {
                    let inner = weak
                        .upgrade()
                        .ok_or_else(|| AnimError::AnimationInterrupted("frame dropped".into()))?;
                    let n = i64::from(i) + 1;
                    let total = i64::from(frames);
                    let lerp = |a: i32, b: i32| {
                        let v = i64::from(a) + (i64::from(b) - i64::from(a)) * n / total;
                        i32::try_from(v).unwrap_or(b)
                    };
                    let rect = RectPx::new(lerp(from.x, to.x), lerp(from.y, to.y), from.w, from.h);
                    inner.animate_bounds(&token, rect)?;
                    Ok(if n >= total { Step::Done } else { Step::Continue })
                })
                .await
            });
        handle.finished().await
    }

    /// Save the restore point, slide down off-screen when enabled, then iconify.
    ///
    /// Returns `false` when the frame is not open or the slide was cancelled.
    pub async fn minimize_animation(&self) -> bool {
        let from = {
            let mut st = self.inner.state.lock();
            if self.inner.lifecycle() != Lifecycle::Open || st.iconified {
                return false;
            }
            st.restore = st.bounds.origin();
            st.bounds
        };
        if self.inner.ctx.inner.prefs.minimize_animation_enabled() {
            let screen = self.inner.ctx.inner.screens.screen_for(&from);
            let to = from.with_origin(Point::new(from.x, screen.bottom()));
            let frames = self.inner.ctx.config().timings.minimize_frames;
            let completion = self.slide(AnimationKind::Minimize, from, to, frames).await;
            if completion != Completion::Finished {
                debug!(frame = %self.inner.id, ?completion, "minimize_interrupted");
                return false;
            }
        }
        let mut st = self.inner.state.lock();
        if self.inner.lifecycle() != Lifecycle::Open {
            return false;
        }
        st.iconified = true;
        st.focused = false;
        drop(st);
        self.inner.ctx.publish(ChromeEvent::Iconified {
            frame: self.inner.id,
        });
        true
    }

    /// Deiconify and move back to the restore point.
    pub fn restore(&self) -> bool {
        let mut st = self.inner.state.lock();
        if self.inner.lifecycle() != Lifecycle::Open || !st.iconified {
            return false;
        }
        st.iconified = false;
        let target = st.bounds.with_origin(st.restore);
        let change = self.inner.write_bounds(&mut st, target);
        drop(st);
        self.inner.after_bounds(change);
        self.inner.ctx.publish(ChromeEvent::Restored {
            frame: self.inner.id,
        });
        self.focus();
        true
    }

    /// Close the frame.
    ///
    /// Steps, in order: confirm (abort if declined), pre-close actions, kill
    /// notifications, cancel animations, disable gestures, close slide
    /// (unless `fast_close` or disabled), deregister, release the surface,
    /// post-close actions. Calls after the first return
    /// [`DisposeOutcome::AlreadyDisposed`] without effect.
    pub async fn dispose(&self, fast_close: bool) -> DisposeOutcome {
        let inner = &self.inner;
        if inner
            .dispose_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!(frame = %inner.id, "dispose_ignored");
            return DisposeOutcome::AlreadyDisposed;
        }
        let info = inner.info();

        let message = inner.hooks.lock().closing_message.clone();
        if let Some(message) = message
            && !inner.ctx.inner.prompt.confirm(&info, &message).await
        {
            inner.dispose_started.store(false, Ordering::Release);
            debug!(frame = %inner.id, "dispose_declined");
            return DisposeOutcome::Declined;
        }
        debug!(frame = %inner.id, fast_close, "dispose_started");
        inner
            .ctx
            .publish(ChromeEvent::DisposeStarted { frame: inner.id });

        let pre = mem::take(&mut inner.hooks.lock().pre_close);
        run_actions(inner.id, "pre_close", pre);

        inner.notifications.kill_all();
        inner.ctx.animator().cancel_frame(inner.id);

        let from = {
            let mut st = inner.state.lock();
            inner.set_lifecycle(&mut st, Lifecycle::Closing);
            st.drag_enabled = false;
            st.resize_enabled = false;
            st.gesture = Gesture::Idle;
            st.focused = false;
            st.bounds
        };
        inner.ctx.registry().end_pin_session(inner.id);

        if !fast_close && inner.ctx.inner.prefs.close_animation_enabled() {
            let screen = inner.ctx.inner.screens.screen_for(&from);
            let off_top = from.cy() - screen.y < screen.bottom() - from.cy();
            let y = if off_top {
                screen.y - from.h
            } else {
                screen.bottom()
            };
            let frames = inner.ctx.config().timings.close_frames;
            let to = from.with_origin(Point::new(from.x, y));
            let completion = self.slide(AnimationKind::Close, from, to, frames).await;
            trace!(frame = %inner.id, ?completion, "close_slide_done");
        }

        inner.ctx.inner.owner.on_frame_disposed(&info);
        inner.ctx.registry().remove(inner.id);

        {
            let mut st = inner.state.lock();
            inner.set_lifecycle(&mut st, Lifecycle::Disposed);
            inner.ctx.inner.surfaces.release(inner.id);
        }
        inner
            .ctx
            .publish(ChromeEvent::FrameDisposed { frame: inner.id });

        let post = mem::take(&mut inner.hooks.lock().post_close);
        run_actions(inner.id, "post_close", post);
        debug!(frame = %inner.id, "frame_disposed");
        DisposeOutcome::Disposed
    }

    /// Display list for the current state.
    ///
    /// Theme and preferences are read on every call.
    pub fn paint(&self) -> Vec<PaintOp> {
        let view = {
            let st = self.inner.state.lock();
            self.inner.chrome_view(&st)
        };
        let theme = &self.inner.ctx.inner.theme;
        let cx = PaintContext {
            accent: theme.accent(),
            rounded: self.inner.ctx.inner.prefs.rounded_window_corners(),
            corner_radius: theme.corner_radius(),
        };
        let mut ops = Vec::new();
        view.paint(&cx, &mut ops);
        if let Some(popup) = self.inner.notifications.view() {
            popup.paint(&cx, &mut ops);
        }
        ops
    }

    /// One-line description for logs.
    pub fn describe(&self) -> String {
        let st = self.inner.state.lock();
        format!(
            "{} \"{}\" {} pin={} {:?}{}",
            self.inner.id,
            self.inner.title,
            st.bounds,
            st.pin,
            self.inner.lifecycle(),
            if st.iconified { " iconified" } else { "" }
        )
    }
}

impl fmt::Debug for FrameChrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Run close actions, logging and swallowing panics.
fn run_actions(frame: FrameId, stage: &str, actions: Vec<CloseAction>) {
    for action in actions {
        if panic::catch_unwind(AssertUnwindSafe(action)).is_err() {
            warn!(%frame, stage, "close_action_panicked");
        }
    }
}
