//! Text buffer for the editor.
//!
//! A `Vec` of lines, each carrying its tab-expanded render form and
//! per-character highlight classes alongside the raw characters.

mod buffer;
mod line;

pub use buffer::{Buffer, Cursor, DEFAULT_TAB_STOP, Direction};
pub use line::{Line, MAX_TAB_STOP, char_to_render_col, expand_tabs, render_to_char_col};
