//! Theme accent colour.

use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{defaults, parse_rgb};

/// An opaque rgb colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Theme section: accent colour and frame corner radius.
pub struct Theme {
    /// Accent colour as a name (`"steelblue"`) or `#rrggbb`.
    pub accent: String,
    /// Corner radius used when rounded corners are enabled.
    pub corner_radius: i32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: defaults::ACCENT.to_string(),
            corner_radius: defaults::CORNER_RADIUS,
        }
    }
}

impl Theme {
    /// Resolve the accent colour, falling back to the default on bad input.
    pub fn accent_rgb(&self) -> Rgb {
        let (r, g, b) = parse_rgb(&self.accent).unwrap_or_else(|| {
            warn!(accent = %self.accent, "invalid accent colour, using default");
            parse_rgb(defaults::ACCENT).unwrap_or((0, 0, 0))
        });
        Rgb(r, g, b)
    }
}

/// Shared, live-updatable theme.
#[derive(Debug, Clone, Default)]
pub struct SharedTheme {
    /// Current theme.
    inner: Arc<RwLock<Theme>>,
}

impl SharedTheme {
    /// Wrap an initial theme.
    pub fn new(theme: Theme) -> Self {
        Self {
            inner: Arc::new(RwLock::new(theme)),
        }
    }

    /// Current accent colour.
    pub fn accent(&self) -> Rgb {
        self.inner.read().accent_rgb()
    }

    /// Current corner radius.
    pub fn corner_radius(&self) -> i32 {
        self.inner.read().corner_radius
    }

    /// Replace the accent colour.
    pub fn set_accent(&self, accent: impl Into<String>) {
        self.inner.write().accent = accent.into();
    }
}
