use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the hotkeys crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for hotkey configuration and dispatch.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure while reading or writing the persisted store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The persisted store holds data that does not decode.
    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration backend could not serve the request.
    #[error("Configuration backend error: {0}")]
    Backend(String),

    /// An action id that the shell does not expose.
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    /// A channel to an external collaborator has been dropped.
    #[error("{0} channel closed")]
    Closed(&'static str),
}
