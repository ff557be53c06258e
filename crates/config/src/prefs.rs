//! Boolean user preferences consumed by the chrome engine.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::defaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// User animation and appearance toggles.
pub struct Preferences {
    /// Slide frames off-screen when they close.
    pub close_animation: bool,
    /// Slide frames downward before iconifying.
    pub minimize_animation: bool,
    /// Notifications stay until dismissed instead of vanishing on a timer.
    pub persistent_notifications: bool,
    /// Paint frames with rounded corners.
    pub rounded_window_corners: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            close_animation: defaults::CLOSE_ANIMATION,
            minimize_animation: defaults::MINIMIZE_ANIMATION,
            persistent_notifications: defaults::PERSISTENT_NOTIFICATIONS,
            rounded_window_corners: defaults::ROUNDED_WINDOW_CORNERS,
        }
    }
}

/// Shared, live-updatable preferences.
///
/// Readers always observe the latest values; the owning shell updates them.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences {
    /// Current values.
    inner: Arc<RwLock<Preferences>>,
}

impl SharedPreferences {
    /// Wrap an initial set of preferences.
    pub fn new(prefs: Preferences) -> Self {
        Self {
            inner: Arc::new(RwLock::new(prefs)),
        }
    }

    /// Snapshot the current values.
    pub fn get(&self) -> Preferences {
        *self.inner.read()
    }

    /// Mutate the preferences in place.
    pub fn update(&self, f: impl FnOnce(&mut Preferences)) {
        f(&mut self.inner.write());
    }
}
