//! Error handling for the console crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for console operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running the console.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Errors surfaced by the binding store or its gateway.
    #[error("Hotkeys error: {0}")]
    Hotkeys(#[from] hotkeys::Error),
    /// The stored configuration failed to load, so it was not overwritten.
    #[error("Stored hotkeys did not load ({0}); not saving")]
    NotLoaded(String),
    /// A timestamp could not be rendered.
    #[error("Time formatting error: {0}")]
    TimeFormat(#[from] time::error::Format),
}
