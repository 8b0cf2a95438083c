//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::{open_buffer, save_buffer};
pub use event_loop::HELP_MESSAGE;
pub use model::{DEFAULT_QUIT_TIMES, Model, STATUS_TIMEOUT};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::editor::{DEFAULT_TAB_STOP, MAX_TAB_STOP};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    tab_stop: usize,
    quit_times: u8,
}

impl App {
    /// Create a new application, optionally editing the given file.
    pub const fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: DEFAULT_QUIT_TIMES,
        }
    }

    /// Set the tab stop width, clamped to `1..=MAX_TAB_STOP`.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop.clamp(1, MAX_TAB_STOP);
        self
    }

    /// Set how many extra Ctrl-Q presses quit with unsaved changes.
    pub const fn with_quit_times(mut self, quit_times: u8) -> Self {
        self.quit_times = quit_times;
        self
    }
}
