//! Command-line interface definitions for chrome-demo.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `chrome-demo` binary.
#[derive(Parser, Debug)]
#[command(
    name = "chrome-demo",
    about = "Drive the chrome engine through scripted scenarios",
    version
)]
pub struct Cli {
    /// Logging controls shared across workspace binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Path to a RON config file; defaults to ~/.chrome-shell/config.ron when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Which scenario to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Scenarios.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Queue a burst of notifications on one frame and print their lifecycle.
    Notify(NotifyArgs),
    /// Bounce frames around the screen for a while.
    Dance(DanceArgs),
    /// Drag a console with owner-pinned frames attached.
    Drag(DragArgs),
    /// Open frames and close them with and without the close animation.
    Close,
}

/// Arguments for `notify`.
#[derive(Args, Debug, Clone)]
pub struct NotifyArgs {
    /// Number of notifications to queue.
    #[arg(long, default_value_t = 3)]
    pub count: usize,

    /// Words per notification; durations are derived from the word count.
    #[arg(long, default_value_t = 4)]
    pub words: usize,

    /// Fixed duration in milliseconds; 0 derives it from the text.
    #[arg(long, default_value_t = 0)]
    pub duration_ms: u64,

    /// Kill the queue after this many milliseconds.
    #[arg(long)]
    pub kill_after_ms: Option<u64>,
}

/// Arguments for `dance`.
#[derive(Args, Debug, Clone)]
pub struct DanceArgs {
    /// Number of frames.
    #[arg(long, default_value_t = 3)]
    pub frames: usize,

    /// How long to dance, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    pub millis: u64,
}

/// Arguments for `drag`.
#[derive(Args, Debug, Clone)]
pub struct DragArgs {
    /// Horizontal distance to drag the console.
    #[arg(long, default_value_t = 200, allow_hyphen_values = true)]
    pub dx: i32,

    /// Vertical distance to drag the console.
    #[arg(long, default_value_t = 100, allow_hyphen_values = true)]
    pub dy: i32,

    /// Pointer moves used for the drag.
    #[arg(long, default_value_t = 10)]
    pub steps: i32,
}
