use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::editor::{Buffer, Cursor};
use crate::prompt::Prompt;
use crate::terminal::WindowSize;
use crate::ui::viewport::Viewport;

/// How long a status message stays on the message bar.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Extra Ctrl-Q presses required to quit with unsaved changes.
pub const DEFAULT_QUIT_TIMES: u8 = 3;

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The text being edited
    pub buffer: Buffer,
    /// Cursor position; `line` may equal the line count
    pub cursor: Cursor,
    /// Visible part of the buffer
    pub viewport: Viewport,
    /// Where the buffer is saved to, if known
    pub filename: Option<PathBuf>,
    /// Save-as or search prompt currently reading input
    pub prompt: Option<Prompt>,
    status: Option<StatusMessage>,
    /// Confirmations required before quitting with unsaved changes
    pub quit_times: u8,
    /// Confirmations still required
    pub(super) quit_remaining: u8,
    /// Set by `update` when the buffer should be written out
    pub(super) save_requested: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl Model {
    pub fn new(buffer: Buffer, size: WindowSize) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            viewport: Viewport::new(size.cols, size.text_rows()),
            filename: None,
            prompt: None,
            status: None,
            quit_times: DEFAULT_QUIT_TIMES,
            quit_remaining: DEFAULT_QUIT_TIMES,
            save_requested: false,
            should_quit: false,
        }
    }

    /// Attach a file name and pick its syntax profile.
    #[must_use]
    pub fn with_filename(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.set_filename(path);
        }
        self
    }

    #[must_use]
    pub const fn with_quit_times(mut self, quit_times: u8) -> Self {
        self.quit_times = quit_times;
        self.quit_remaining = quit_times;
        self
    }

    pub fn set_filename(&mut self, path: PathBuf) {
        self.buffer.select_syntax_for(&path.to_string_lossy());
        self.filename = Some(path);
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        });
    }

    pub(super) fn clear_status(&mut self) {
        self.status = None;
    }

    /// Drop the status message once it has been visible long enough.
    /// Returns `true` if the message bar changed.
    pub fn expire_status(&mut self, now: Instant) -> bool {
        if self
            .status
            .as_ref()
            .is_some_and(|status| now.duration_since(status.set_at) >= STATUS_TIMEOUT)
        {
            self.status = None;
            return true;
        }
        false
    }

    /// Text for the message bar: the open prompt, else the status message.
    pub fn message(&self) -> Option<String> {
        self.prompt.as_ref().map_or_else(
            || self.status.as_ref().map(|status| status.text.clone()),
            |prompt| Some(prompt.message()),
        )
    }

    /// Whether the buffer has changes not yet written to disk.
    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Bring the viewport to the cursor.
    pub fn scroll(&mut self) {
        let rx = self.buffer.render_col(self.cursor);
        self.viewport.scroll_to(self.cursor.line, rx);
    }

    pub(super) fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(Buffer::default(), WindowSize { cols: 80, rows: 24 })
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("buffer", &self.buffer)
            .field("cursor", &self.cursor)
            .field("viewport", &self.viewport)
            .field("filename", &self.filename)
            .field("prompt", &self.prompt)
            .field("status", &self.status)
            .field("quit_remaining", &self.quit_remaining)
            .field("should_quit", &self.should_quit)
            .finish()
    }
}
