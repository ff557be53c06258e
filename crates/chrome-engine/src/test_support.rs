//! Recording collaborators and helpers for engine tests.
//! These helpers are public so integration tests can share them.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrome_anim::FrameId;
use chrome_geom::RectPx;
use config::{Config, SharedPreferences, SharedTheme};
use parking_lot::Mutex;
use tokio::time::{Duration, Instant};

use crate::{
    ChromeEvent, ClosingPrompt, EventCursor, FixedScreens, FrameInfo, NotificationContent,
    NotificationId, OwnerRegistry, PopupHost, Result, Shell, ShellContext, SurfaceHost,
};

/// One call received by [`RecordingSurfaces`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCall {
    /// Surface created.
    Create(FrameId, RectPx),
    /// Surface moved or resized.
    Bounds(FrameId, RectPx),
    /// Overlay placed or detached.
    Overlay(FrameId, NotificationId, Option<RectPx>),
    /// Surface released.
    Release(FrameId),
}

impl SurfaceCall {
    /// Frame the call targeted.
    pub fn frame(&self) -> FrameId {
        match self {
            Self::Create(f, _) | Self::Bounds(f, _) | Self::Overlay(f, _, _) | Self::Release(f) => {
                *f
            }
        }
    }
}

/// Surface host that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurfaces {
    /// Calls in arrival order.
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurfaces {
    /// All calls so far.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    /// Calls for `frame` that arrived after its release.
    pub fn calls_after_release(&self, frame: FrameId) -> Vec<SurfaceCall> {
        let calls = self.calls.lock();
        calls
            .iter()
            .filter(|c| c.frame() == frame)
            .skip_while(|c| **c != SurfaceCall::Release(frame))
            .skip(1)
            .cloned()
            .collect()
    }

    /// Overlay placements of `frame`, in order.
    pub fn overlays(&self, frame: FrameId) -> Vec<(NotificationId, Option<RectPx>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Overlay(f, id, rect) if *f == frame => Some((*id, *rect)),
                _ => None,
            })
            .collect()
    }

    /// Whether `frame` was released.
    pub fn released(&self, frame: FrameId) -> bool {
        self.calls.lock().contains(&SurfaceCall::Release(frame))
    }
}

impl SurfaceHost for RecordingSurfaces {
    fn create(&self, frame: FrameId, bounds: RectPx) {
        self.calls.lock().push(SurfaceCall::Create(frame, bounds));
    }

    fn apply_bounds(&self, frame: FrameId, bounds: RectPx) {
        self.calls.lock().push(SurfaceCall::Bounds(frame, bounds));
    }

    fn apply_overlay(&self, frame: FrameId, id: NotificationId, rect: Option<RectPx>) {
        self.calls.lock().push(SurfaceCall::Overlay(frame, id, rect));
    }

    fn release(&self, frame: FrameId) {
        self.calls.lock().push(SurfaceCall::Release(frame));
    }
}

/// Owner registry that records shown and disposed frames.
#[derive(Debug, Default)]
pub struct RecordingOwner {
    /// Frames shown.
    shown: Mutex<Vec<FrameId>>,
    /// Frames disposed.
    disposed: Mutex<Vec<FrameId>>,
}

impl RecordingOwner {
    /// Frames shown, in order.
    pub fn shown(&self) -> Vec<FrameId> {
        self.shown.lock().clone()
    }

    /// Frames disposed, in order.
    pub fn disposed(&self) -> Vec<FrameId> {
        self.disposed.lock().clone()
    }
}

impl OwnerRegistry for RecordingOwner {
    fn on_frame_shown(&self, frame: &FrameInfo) {
        self.shown.lock().push(frame.id);
    }

    fn on_frame_disposed(&self, frame: &FrameInfo) {
        self.disposed.lock().push(frame.id);
    }
}

/// Popup host that records redirected notifications.
#[derive(Debug, Default)]
pub struct RecordingPopups {
    /// Owner frame and description of each popup.
    shown: Mutex<Vec<(FrameId, String)>>,
}

impl RecordingPopups {
    /// Popups shown so far.
    pub fn shown(&self) -> Vec<(FrameId, String)> {
        self.shown.lock().clone()
    }
}

impl PopupHost for RecordingPopups {
    fn show_popup(&self, owner: &FrameInfo, content: &NotificationContent) {
        self.shown.lock().push((owner.id, content.describe()));
    }
}

/// Closing prompt with a fixed answer that counts how often it was asked.
#[derive(Debug)]
pub struct ScriptedPrompt {
    /// Answer to give.
    answer: AtomicBool,
    /// Questions asked.
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    /// Prompt answering `answer`.
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            asked: AtomicUsize::new(0),
        }
    }

    /// Change the answer.
    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    /// Times the prompt was shown.
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClosingPrompt for ScriptedPrompt {
    async fn confirm(&self, _frame: &FrameInfo, _message: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer.load(Ordering::SeqCst)
    }
}

/// A shell wired to recording collaborators.
pub struct TestShell {
    /// The shell.
    pub shell: Shell,
    /// Surface calls.
    pub surfaces: Arc<RecordingSurfaces>,
    /// Owner registry calls.
    pub owner: Arc<RecordingOwner>,
    /// Redirected notifications.
    pub popups: Arc<RecordingPopups>,
    /// Close confirmation; confirms by default.
    pub prompt: Arc<ScriptedPrompt>,
    /// Live preferences.
    pub prefs: SharedPreferences,
    /// Live theme.
    pub theme: SharedTheme,
}

impl TestShell {
    /// Test shell on a single 1920x1080 monitor. Must run inside a tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_screen(config, RectPx::new(0, 0, 1920, 1080))
    }

    /// Test shell on a single monitor with `screen` bounds.
    pub fn with_screen(config: Config, screen: RectPx) -> Result<Self> {
        Self::with_monitors(config, &[screen])
    }

    /// Test shell with one monitor per rectangle, numbered from zero.
    pub fn with_monitors(config: Config, monitors: &[RectPx]) -> Result<Self> {
        let surfaces = Arc::new(RecordingSurfaces::default());
        let owner = Arc::new(RecordingOwner::default());
        let popups = Arc::new(RecordingPopups::default());
        let prompt = Arc::new(ScriptedPrompt::new(true));
        let prefs = SharedPreferences::new(config.prefs);
        let theme = SharedTheme::new(config.theme.clone());
        let ctx = ShellContext::builder(config)
            .surfaces(surfaces.clone())
            .owner_registry(owner.clone())
            .popups(popups.clone())
            .closing_prompt(prompt.clone())
            .preferences(Arc::new(prefs.clone()))
            .theme(Arc::new(theme.clone()))
            .screens(Arc::new(FixedScreens(
                (0..).zip(monitors.iter().copied()).collect(),
            )))
            .build()?;
        Ok(Self {
            shell: Shell::new(ctx),
            surfaces,
            owner,
            popups,
            prompt,
            prefs,
            theme,
        })
    }
}

/// Text of exactly `n` words.
pub fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

/// Wait up to `timeout_ms` for an event matching `pred`, skipping others.
pub async fn wait_event<F>(
    cursor: &mut EventCursor,
    timeout_ms: u64,
    mut pred: F,
) -> Option<ChromeEvent>
where
    F: FnMut(&ChromeEvent) -> bool,
{
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while let Some(ev) = cursor.next_until(deadline).await {
        if pred(&ev) {
            return Some(ev);
        }
    }
    None
}
