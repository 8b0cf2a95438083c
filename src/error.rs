//! Error types for terminal setup.

use std::io;
use thiserror::Error;

/// Failure to put the terminal into a usable state or measure it.
#[derive(Error, Debug)]
pub enum TerminalError {
    /// I/O error on the controlling terminal
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The cursor position reply did not look like `ESC [ rows ; cols R`
    #[error("Malformed cursor position report: {0:?}")]
    MalformedReport(String),

    /// The terminal has no room to draw in
    #[error("Terminal window is too small ({cols}x{rows})")]
    TooSmall { cols: u16, rows: u16 },
}

/// Result type for terminal operations
pub type Result<T> = std::result::Result<T, TerminalError>;
