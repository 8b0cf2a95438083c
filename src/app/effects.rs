use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::app::{App, Model};
use crate::editor::Buffer;

impl App {
    /// Carry out file writes requested by `update`.
    pub(super) fn handle_message_side_effects(model: &mut Model) {
        if model.take_save_request() {
            save(model);
        }
    }
}

/// Load a file into a new buffer. A missing file yields an empty buffer
/// so a new file can be created by saving.
pub fn open_buffer(path: &Path, tab_stop: usize) -> Result<Buffer> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "new file");
            return Ok(Buffer::new(tab_stop));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to open {}", path.display()));
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    let buffer = Buffer::from_text(&text, tab_stop);
    tracing::debug!(
        path = %path.display(),
        lines = buffer.line_count(),
        bytes = bytes.len(),
        "file loaded"
    );
    Ok(buffer)
}

/// Write the buffer to `path`, returning the number of bytes written.
///
/// The file is resized to the new length before writing rather than
/// truncated to zero first.
pub fn save_buffer(path: &Path, buffer: &Buffer) -> io::Result<usize> {
    let text = buffer.to_text();
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.set_len(text.len() as u64)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    Ok(text.len())
}

fn save(model: &mut Model) {
    let Some(path) = model.filename.clone() else {
        return;
    };
    match save_buffer(&path, &model.buffer) {
        Ok(len) => {
            model.buffer.mark_clean();
            tracing::debug!(path = %path.display(), bytes = len, "file saved");
            model.set_status(format!("{len} bytes written to disk"));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "save failed");
            model.set_status(format!("Can't save! I/O error: {err}"));
        }
    }
}
