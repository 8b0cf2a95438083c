use std::io::{Write, stdout};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::app::{App, Message, Model, update};
use crate::input::KeyDecoder;
use crate::terminal::{self, RawModeGuard, StdinSource};

use super::effects::open_buffer;

/// Shown on the message bar at startup.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S save | Ctrl-Q quit | Ctrl-F find";

impl App {
    /// Run the editor until the user quits.
    ///
    /// The loop is single-threaded: draw a frame, wait up to the decoder
    /// timeout for a key, apply it, repeat.
    pub fn run(&mut self) -> Result<()> {
        let buffer = match &self.file_path {
            Some(path) => open_buffer(path, self.tab_stop)?,
            None => crate::editor::Buffer::new(self.tab_stop),
        };

        let _guard = RawModeGuard::enable().context("Failed to enable raw mode")?;
        let mut decoder = KeyDecoder::new(StdinSource::new());
        let size = terminal::window_size(decoder.source_mut())
            .context("Failed to get window size")?;

        let mut model = Model::new(buffer, size)
            .with_filename(self.file_path.clone())
            .with_quit_times(self.quit_times);
        model.set_status(HELP_MESSAGE);

        let mut out = stdout();
        let mut frame = Vec::new();
        let mut needs_render = true;
        loop {
            if model.expire_status(Instant::now()) {
                needs_render = true;
            }

            if needs_render {
                frame.clear();
                crate::ui::render(&model, &mut frame)?;
                out.write_all(&frame)?;
                out.flush()?;
                needs_render = false;
            }

            let key = decoder.read_key().context("Failed to read input")?;
            let msg = match key {
                Some(key) => Self::handle_key(key, &model),
                None => Self::check_resize(&model),
            };
            if let Some(msg) = msg {
                tracing::trace!(?msg, "message");
                model = update(model, msg);
                Self::handle_message_side_effects(&mut model);
                needs_render = true;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// Report a size change noticed while idle.
    fn check_resize(model: &Model) -> Option<Message> {
        let (cols, rows) = crossterm::terminal::size().ok()?;
        let text_rows = rows.saturating_sub(terminal::RESERVED_ROWS);
        if cols == 0 || text_rows == 0 {
            return None;
        }
        (cols != model.viewport.width() || text_rows != model.viewport.height()).then(|| {
            tracing::debug!(cols, rows, "terminal resized");
            Message::Resize(cols, rows)
        })
    }
}
