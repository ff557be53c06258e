//! Configuration types for the chrome engine: user preferences, theme colour,
//! animation timings, chrome metrics, and notification tuning.
//!
//! Configuration is read from a RON file; every section and field is
//! optional and falls back to the defaults in this crate.
#![warn(unsafe_op_in_unsafe_fn)]

use std::{
    env,
    path::{Path, PathBuf},
};

mod defaults;
mod error;
mod loader;
mod notify;
mod prefs;
mod theme;
mod timings;

#[cfg(test)]
mod test_parse;

pub use chrome_geom::ChromeMetrics;
pub use error::Error;
pub use loader::{Config, load_from_path};
pub use notify::NotifyConfig;
pub use prefs::{Preferences, SharedPreferences};
pub use theme::{Rgb, SharedTheme, Theme};
pub use timings::AnimationTimings;

/// Parse a colour name or `#rrggbb` string into an rgb tuple.
pub(crate) fn parse_rgb(s: &str) -> Option<(u8, u8, u8)> {
    colornames::Color::try_from(s).ok().map(|c| c.rgb())
}

/// Determine the preferred user config path (`~/.chrome-shell/config.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".chrome-shell");
    p.push("config.ron");
    p
}

/// Resolve the effective config path.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `~/.chrome-shell/config.ron` when it exists.
/// 3) Else `None`: callers run with built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let preferred = default_config_path();
    preferred.exists().then_some(preferred)
}
