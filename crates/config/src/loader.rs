//! Parse and load user configuration.

use std::{ffi::OsStr, fs, path::Path};

use chrome_geom::ChromeMetrics;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AnimationTimings, Error, NotifyConfig, Preferences, Theme};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Complete chrome engine configuration.
pub struct Config {
    /// User preference toggles.
    pub prefs: Preferences,
    /// Theme colours.
    pub theme: Theme,
    /// Animation timing parameters.
    pub timings: AnimationTimings,
    /// Chrome region dimensions.
    pub chrome: ChromeMetrics,
    /// Notification parameters.
    pub notify: NotifyConfig,
}

impl Config {
    /// Parse a configuration from RON source.
    pub fn from_ron(source: &str) -> Result<Self, Error> {
        ron::from_str(source).map_err(|e| Error::Parse {
            path: None,
            message: e.to_string(),
        })
    }
}

/// Load a `Config` from a RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let config = Config::from_ron(&source).map_err(|e| e.with_path(path))?;
    debug!(path = %path.display(), "config_loaded");
    Ok(config)
}
