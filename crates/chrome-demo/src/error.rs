//! Error type for the chrome-demo binary.

use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for chrome-demo.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by chrome-demo.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration failed to load.
    #[error("{}", .0.pretty())]
    Config(#[from] config::Error),

    /// The engine rejected a request.
    #[error(transparent)]
    Engine(#[from] chrome_engine::Error),

    /// An event could not be serialized.
    #[error("serialize event: {0}")]
    Json(#[from] serde_json::Error),

    /// The runtime could not be started.
    #[error("runtime: {0}")]
    Io(#[from] io::Error),
}
