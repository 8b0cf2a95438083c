use crate::app::Model;
use crate::editor::Direction;
use crate::input::Key;
use crate::prompt::{Prompt, PromptOutcome, PromptPurpose, PromptTarget};
use crate::search::SearchHandler;

const SAVE_AS_PROMPT: &str = "Save as: {} (ESC to cancel)";
const SEARCH_PROMPT: &str = "Search: {} (ESC/Arrows/Enter)";

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Split line at cursor (Enter)
    InsertNewline,
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character under cursor (Delete)
    DeleteForward,

    // Navigation
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to start of line
    MoveHome,
    /// Move cursor to end of line
    MoveEnd,
    /// Move cursor up one screen
    PageUp,
    /// Move cursor down one screen
    PageDown,

    // File and search
    /// Write the buffer, asking for a name first if needed
    Save,
    /// Open the incremental search prompt
    StartSearch,
    /// Key typed while a prompt is open
    PromptKey(Key),

    // Window
    /// Terminal resized to (cols, rows)
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// File writes are requested through the model and carried out by the
/// event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Any key other than Ctrl-Q re-arms the unsaved-changes warning. Resize
    // comes from the idle poll, not a key.
    if !matches!(msg, Message::Quit | Message::Resize(..)) {
        model.quit_remaining = model.quit_times;
    }

    match msg {
        // Editing
        Message::InsertChar(ch) => model.buffer.insert_char_at(&mut model.cursor, ch),
        Message::InsertNewline => model.buffer.insert_newline(&mut model.cursor),
        Message::DeleteBack => {
            model.buffer.delete_back(&mut model.cursor);
        }
        Message::DeleteForward => {
            model.buffer.move_cursor(&mut model.cursor, Direction::Right);
            model.buffer.delete_back(&mut model.cursor);
        }

        // Navigation
        Message::MoveCursor(direction) => model.buffer.move_cursor(&mut model.cursor, direction),
        Message::MoveHome => model.cursor.col = 0,
        Message::MoveEnd => model.cursor.col = model.buffer.line_len(model.cursor.line),
        Message::PageUp | Message::PageDown => {
            let rows = usize::from(model.viewport.height());
            let direction = if msg == Message::PageUp {
                model.cursor.line = model.viewport.row_offset();
                Direction::Up
            } else {
                model.cursor.line = (model.viewport.row_offset() + rows)
                    .saturating_sub(1)
                    .min(model.buffer.line_count());
                Direction::Down
            };
            for _ in 0..rows {
                model.buffer.move_cursor(&mut model.cursor, direction);
            }
        }

        // File and search
        Message::Save => {
            if model.filename.is_some() {
                model.save_requested = true;
            } else {
                model.prompt = Some(Prompt::new(SAVE_AS_PROMPT, PromptPurpose::SaveAs));
            }
        }
        Message::StartSearch => {
            let purpose = PromptPurpose::Search {
                cursor: model.cursor,
                row_offset: model.viewport.row_offset(),
                col_offset: model.viewport.col_offset(),
            };
            model.prompt = Some(
                Prompt::new(SEARCH_PROMPT, purpose).with_handler(Box::new(SearchHandler::new())),
            );
        }
        Message::PromptKey(key) => handle_prompt_key(&mut model, key),

        // Window
        Message::Resize(cols, rows) => {
            model
                .viewport
                .resize(cols, rows.saturating_sub(crate::terminal::RESERVED_ROWS));
        }
        Message::Redraw => {}

        // Application
        Message::Quit => {
            if model.is_dirty() && model.quit_remaining > 0 {
                model.set_status(format!(
                    "WARNING: Unsaved changes. Press Ctrl-Q {} more times to quit.",
                    model.quit_remaining
                ));
                model.quit_remaining -= 1;
            } else {
                model.should_quit = true;
            }
        }
    }

    model.scroll();
    model
}

fn handle_prompt_key(model: &mut Model, key: Key) {
    let Some(mut prompt) = model.prompt.take() else {
        return;
    };
    let outcome = prompt.handle_key(
        PromptTarget {
            buffer: &mut model.buffer,
            cursor: &mut model.cursor,
            viewport: &mut model.viewport,
        },
        key,
    );

    match (outcome, prompt.purpose()) {
        (PromptOutcome::Pending, _) => model.prompt = Some(prompt),
        (PromptOutcome::Cancelled, PromptPurpose::SaveAs) => model.set_status("Save aborted"),
        (
            PromptOutcome::Cancelled,
            PromptPurpose::Search {
                cursor,
                row_offset,
                col_offset,
            },
        ) => {
            model.clear_status();
            model.cursor = cursor;
            model.viewport.set_offsets(row_offset, col_offset);
        }
        (PromptOutcome::Confirmed(name), PromptPurpose::SaveAs) => {
            model.clear_status();
            model.set_filename(name.into());
            model.save_requested = true;
        }
        (PromptOutcome::Confirmed(_), PromptPurpose::Search { .. }) => model.clear_status(),
    }
}
