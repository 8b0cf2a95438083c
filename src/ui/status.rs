use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::Model;

/// Longest file name shown on the status bar.
const FILENAME_MAX_CHARS: usize = 20;

/// Cut `text` so its display width fits in `cols`.
pub fn truncate_to_width(text: &str, cols: usize) -> String {
    let mut width = 0;
    let mut out = String::with_capacity(text.len().min(cols * 4));
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > cols {
            break;
        }
        width += w;
        out.push(ch);
    }
    out
}

/// Status bar text padded to exactly `cols` display columns.
///
/// File name, line count and modified flag on the left; file type and
/// cursor line right-aligned when there is room for them.
pub fn status_line(model: &Model, cols: usize) -> String {
    let name = model.filename().map_or_else(
        || "[No Name]".to_string(),
        |path| {
            path.display()
                .to_string()
                .chars()
                .take(FILENAME_MAX_CHARS)
                .collect()
        },
    );
    let lines = model.buffer.line_count();
    let modified = if model.is_dirty() { " (modified)" } else { "" };
    let left = format!("{name} - {lines} lines{modified}");

    let filetype = model.buffer.syntax().map_or("no ft", |syntax| syntax.filetype);
    let right = format!("{filetype} | {}/{lines}", model.cursor.line + 1);
    let right_width = right.width();

    let mut status = truncate_to_width(&left, cols);
    let mut width = status.width();
    while width < cols {
        if cols - width == right_width {
            status.push_str(&right);
            break;
        }
        status.push(' ');
        width += 1;
    }
    status
}

/// Message bar text, if any, cut to `cols`.
pub fn message_line(model: &Model, cols: usize) -> Option<String> {
    model
        .message()
        .map(|message| truncate_to_width(&message, cols))
}
