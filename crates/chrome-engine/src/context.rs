//! Shell context: the collaborators every frame consumes.
//!
//! A [`ShellContext`] is created once per shell and cloned into each frame.
//! It replaces any process-wide state: theme, preferences, screens, the
//! owner registry, surfaces, and the animator all hang off it, and its
//! lifetime bounds theirs.

use std::{mem, sync::Arc};

use async_trait::async_trait;
use chrome_anim::{Animator, FrameId};
use chrome_geom::{Point, RectPx, Size};
use config::{Config, Preferences, Rgb, SharedPreferences, SharedTheme};
use serde::Serialize;
use tokio::{runtime::Handle, time::Instant};
use tracing::info;

use crate::{
    Result,
    events::{ChromeEvent, DEFAULT_EVENT_CAPACITY, EventCursor, EventHub},
    notification::{NotificationContent, NotificationId},
    registry::FrameRegistry,
};

/// Monitor identifier reported by [`ScreenInfo`].
pub type MonitorId = u32;

/// Bounds used when no monitor is reported.
pub const FALLBACK_SCREEN: RectPx = RectPx::new(0, 0, 1920, 1080);

/// Whether a frame is a console (owner candidate) or a child window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum FrameKind {
    /// A console frame; the first one shown becomes the pin owner.
    Console,
    /// Any other frame.
    #[default]
    Child,
}

/// Identity of a frame as seen by collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameInfo {
    /// Frame id.
    pub id: FrameId,
    /// Title shown in the title bar.
    pub title: String,
    /// Console or child.
    pub kind: FrameKind,
}

/// Current accent colour and corner radius; read on every paint.
pub trait ThemeProvider: Send + Sync {
    /// Accent colour tinting borders and notification backgrounds.
    fn accent(&self) -> Rgb;
    /// Corner radius for rounded frames.
    fn corner_radius(&self) -> i32;
}

impl ThemeProvider for SharedTheme {
    fn accent(&self) -> Rgb {
        Self::accent(self)
    }

    fn corner_radius(&self) -> i32 {
        Self::corner_radius(self)
    }
}

/// Read-only view of the user preference toggles.
pub trait PreferenceStore: Send + Sync {
    /// Snapshot of all toggles.
    fn preferences(&self) -> Preferences;

    /// Slide frames off-screen on close.
    fn close_animation_enabled(&self) -> bool {
        self.preferences().close_animation
    }

    /// Slide frames down before iconifying.
    fn minimize_animation_enabled(&self) -> bool {
        self.preferences().minimize_animation
    }

    /// Notifications never auto-vanish.
    fn persistent_notifications_enabled(&self) -> bool {
        self.preferences().persistent_notifications
    }

    /// Paint rounded frame corners.
    fn rounded_window_corners(&self) -> bool {
        self.preferences().rounded_window_corners
    }
}

impl PreferenceStore for SharedPreferences {
    fn preferences(&self) -> Preferences {
        self.get()
    }
}

/// Monitor geometry.
pub trait ScreenInfo: Send + Sync {
    /// All monitors with their bounds.
    fn monitors(&self) -> Vec<(MonitorId, RectPx)>;

    /// Bounds of monitor `id`.
    fn monitor_bounds(&self, id: MonitorId) -> Option<RectPx> {
        self.monitors()
            .into_iter()
            .find(|(m, _)| *m == id)
            .map(|(_, r)| r)
    }

    /// Monitor containing the centre of `rect`, else the first monitor.
    fn screen_for(&self, rect: &RectPx) -> RectPx {
        let monitors = self.monitors();
        let centre = Point::new(rect.cx(), rect.cy());
        monitors
            .iter()
            .find(|(_, r)| r.contains(centre))
            .or_else(|| monitors.first())
            .map(|(_, r)| *r)
            .unwrap_or(FALLBACK_SCREEN)
    }
}

/// A fixed monitor list.
#[derive(Clone, Debug)]
pub struct FixedScreens(pub Vec<(MonitorId, RectPx)>);

impl FixedScreens {
    /// A single monitor with the given bounds.
    pub fn single(bounds: RectPx) -> Self {
        Self(vec![(0, bounds)])
    }
}

impl Default for FixedScreens {
    fn default() -> Self {
        Self::single(FALLBACK_SCREEN)
    }
}

impl ScreenInfo for FixedScreens {
    fn monitors(&self) -> Vec<(MonitorId, RectPx)> {
        self.0.clone()
    }
}

/// Taskbar/console registration of frames.
pub trait OwnerRegistry: Send + Sync {
    /// A frame became visible.
    fn on_frame_shown(&self, frame: &FrameInfo);
    /// A frame was disposed.
    fn on_frame_disposed(&self, frame: &FrameInfo);
}

/// Owner registry that ignores every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullOwner;

impl OwnerRegistry for NullOwner {
    fn on_frame_shown(&self, _frame: &FrameInfo) {}
    fn on_frame_disposed(&self, _frame: &FrameInfo) {}
}

/// Destination for notifications too large to show inline.
pub trait PopupHost: Send + Sync {
    /// Show `content` in a standalone popup window owned by `owner`.
    fn show_popup(&self, owner: &FrameInfo, content: &NotificationContent);
}

/// Popup host that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPopups;

impl PopupHost for LogPopups {
    fn show_popup(&self, owner: &FrameInfo, content: &NotificationContent) {
        info!(frame = %owner.id, content = %content.describe(), "popup_window");
    }
}

/// Native surfaces backing frames and their notification overlays.
pub trait SurfaceHost: Send + Sync {
    /// Create the surface for a frame.
    fn create(&self, frame: FrameId, bounds: RectPx);
    /// Move or resize the surface.
    fn apply_bounds(&self, frame: FrameId, bounds: RectPx);
    /// Place (`Some`, frame-local) or detach (`None`) a notification overlay.
    fn apply_overlay(&self, frame: FrameId, id: NotificationId, rect: Option<RectPx>);
    /// Release the surface; no further calls for `frame` follow.
    fn release(&self, frame: FrameId);
}

/// Surface host with no backing surfaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurfaces;

impl SurfaceHost for NullSurfaces {
    fn create(&self, _frame: FrameId, _bounds: RectPx) {}
    fn apply_bounds(&self, _frame: FrameId, _bounds: RectPx) {}
    fn apply_overlay(&self, _frame: FrameId, _id: NotificationId, _rect: Option<RectPx>) {}
    fn release(&self, _frame: FrameId) {}
}

/// Text measurement for notification layout.
pub trait TextMetrics: Send + Sync {
    /// Lines of `text` wrapped at `wrap_width` pixels.
    fn wrap(&self, text: &str, wrap_width: i32) -> Vec<String>;
    /// Pixel size of the wrapped lines.
    fn measure(&self, lines: &[String]) -> Size;
}

/// Fixed-advance text metrics with greedy word wrapping.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMetrics {
    /// Advance of one character.
    pub char_width: i32,
    /// Height of one line.
    pub line_height: i32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 7,
            line_height: 16,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn wrap(&self, text: &str, wrap_width: i32) -> Vec<String> {
        let per_line = usize::try_from((wrap_width / self.char_width.max(1)).max(1)).unwrap_or(1);
        let mut lines = Vec::new();
        for para in text.split('\n') {
            let mut line = String::new();
            for word in para.split_whitespace() {
                let needed = if line.is_empty() {
                    word.chars().count()
                } else {
                    line.chars().count() + 1 + word.chars().count()
                };
                if needed > per_line && !line.is_empty() {
                    lines.push(mem::take(&mut line));
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
            }
            lines.push(line);
        }
        lines
    }

    fn measure(&self, lines: &[String]) -> Size {
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let widest = i32::try_from(widest).unwrap_or(i32::MAX);
        let count = i32::try_from(lines.len()).unwrap_or(i32::MAX);
        Size::new(
            widest.saturating_mul(self.char_width),
            count.saturating_mul(self.line_height),
        )
    }
}

/// Interactive confirmation before a frame closes.
#[async_trait]
pub trait ClosingPrompt: Send + Sync {
    /// Ask the user to confirm `message`; `false` aborts the close.
    async fn confirm(&self, frame: &FrameInfo, message: &str) -> bool;
}

/// Prompt that always confirms.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoConfirm;

#[async_trait]
impl ClosingPrompt for AutoConfirm {
    async fn confirm(&self, _frame: &FrameInfo, _message: &str) -> bool {
        true
    }
}

/// Shared collaborators.
pub(crate) struct ContextInner {
    /// Theme colours.
    pub(crate) theme: Arc<dyn ThemeProvider>,
    /// Preference toggles.
    pub(crate) prefs: Arc<dyn PreferenceStore>,
    /// Monitor bounds.
    pub(crate) screens: Arc<dyn ScreenInfo>,
    /// Taskbar registration.
    pub(crate) owner: Arc<dyn OwnerRegistry>,
    /// Oversized notification fallback.
    pub(crate) popups: Arc<dyn PopupHost>,
    /// Native surfaces.
    pub(crate) surfaces: Arc<dyn SurfaceHost>,
    /// Text layout.
    pub(crate) text: Arc<dyn TextMetrics>,
    /// Close confirmation.
    pub(crate) prompt: Arc<dyn ClosingPrompt>,
    /// Animation scheduler.
    pub(crate) animator: Animator,
    /// Live frames and the pin session.
    pub(crate) registry: FrameRegistry,
    /// Static configuration.
    pub(crate) config: Config,
    /// Event fan-out.
    pub(crate) events: EventHub,
    /// Origin of event timestamps.
    pub(crate) epoch: Instant,
}

/// Collaborators and shared services for a shell.
#[derive(Clone)]
pub struct ShellContext {
    /// Shared state.
    pub(crate) inner: Arc<ContextInner>,
}

impl ShellContext {
    /// Start building a context from `config`.
    pub fn builder(config: Config) -> ShellContextBuilder {
        ShellContextBuilder::new(config)
    }

    /// Configuration the context was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Animation scheduler shared by every frame.
    pub fn animator(&self) -> &Animator {
        &self.inner.animator
    }

    /// Registry of live frames.
    pub fn registry(&self) -> &FrameRegistry {
        &self.inner.registry
    }

    /// Current preference snapshot.
    pub fn preferences(&self) -> Preferences {
        self.inner.prefs.preferences()
    }

    /// Subscribe to engine events published from now on.
    pub fn subscribe(&self) -> EventCursor {
        self.inner.events.subscribe()
    }

    /// Milliseconds since the context was created.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.inner.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Publish an event to all subscribers.
    pub(crate) fn publish(&self, event: ChromeEvent) {
        self.inner.events.publish(event);
    }
}

/// Builder for [`ShellContext`]; unset collaborators use the null defaults.
pub struct ShellContextBuilder {
    /// Configuration.
    config: Config,
    /// Theme override.
    theme: Option<Arc<dyn ThemeProvider>>,
    /// Preference override.
    prefs: Option<Arc<dyn PreferenceStore>>,
    /// Screens.
    screens: Arc<dyn ScreenInfo>,
    /// Owner registry.
    owner: Arc<dyn OwnerRegistry>,
    /// Popup host.
    popups: Arc<dyn PopupHost>,
    /// Surfaces.
    surfaces: Arc<dyn SurfaceHost>,
    /// Text metrics.
    text: Arc<dyn TextMetrics>,
    /// Close prompt.
    prompt: Arc<dyn ClosingPrompt>,
    /// Runtime for animations; the current runtime when unset.
    runtime: Option<Handle>,
}

impl ShellContextBuilder {
    /// Builder with default collaborators.
    fn new(config: Config) -> Self {
        Self {
            config,
            theme: None,
            prefs: None,
            screens: Arc::new(FixedScreens::default()),
            owner: Arc::new(NullOwner),
            popups: Arc::new(LogPopups),
            surfaces: Arc::new(NullSurfaces),
            text: Arc::new(MonospaceMetrics::default()),
            prompt: Arc::new(AutoConfirm),
            runtime: None,
        }
    }

    /// Use `theme` instead of one built from the config.
    pub fn theme(mut self, theme: Arc<dyn ThemeProvider>) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Use `prefs` instead of a store built from the config.
    pub fn preferences(mut self, prefs: Arc<dyn PreferenceStore>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    /// Monitor geometry.
    pub fn screens(mut self, screens: Arc<dyn ScreenInfo>) -> Self {
        self.screens = screens;
        self
    }

    /// Taskbar registration.
    pub fn owner_registry(mut self, owner: Arc<dyn OwnerRegistry>) -> Self {
        self.owner = owner;
        self
    }

    /// Oversized notification fallback.
    pub fn popups(mut self, popups: Arc<dyn PopupHost>) -> Self {
        self.popups = popups;
        self
    }

    /// Native surfaces.
    pub fn surfaces(mut self, surfaces: Arc<dyn SurfaceHost>) -> Self {
        self.surfaces = surfaces;
        self
    }

    /// Text measurement.
    pub fn text_metrics(mut self, text: Arc<dyn TextMetrics>) -> Self {
        self.text = text;
        self
    }

    /// Close confirmation prompt.
    pub fn closing_prompt(mut self, prompt: Arc<dyn ClosingPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Runtime that hosts animation tasks.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the context.
    ///
    /// Fails with [`chrome_anim::Error::NoRuntime`] when no runtime was given
    /// and none is current.
    pub fn build(self) -> Result<ShellContext> {
        let animator = match self.runtime {
            Some(handle) => Animator::new(handle),
            None => Animator::current()?,
        };
        let theme = self
            .theme
            .unwrap_or_else(|| Arc::new(SharedTheme::new(self.config.theme.clone())));
        let prefs = self
            .prefs
            .unwrap_or_else(|| Arc::new(SharedPreferences::new(self.config.prefs)));
        Ok(ShellContext {
            inner: Arc::new(ContextInner {
                theme,
                prefs,
                screens: self.screens,
                owner: self.owner,
                popups: self.popups,
                surfaces: self.surfaces,
                text: self.text,
                prompt: self.prompt,
                animator,
                registry: FrameRegistry::new(),
                config: self.config,
                events: EventHub::new(DEFAULT_EVENT_CAPACITY),
                epoch: Instant::now(),
            }),
        })
    }
}
