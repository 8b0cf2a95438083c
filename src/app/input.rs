use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::input::Key;

impl App {
    /// Map a decoded key to a message. While a prompt is open every key
    /// goes to it.
    pub(super) fn handle_key(key: Key, model: &Model) -> Option<Message> {
        if model.prompt.is_some() {
            return Some(Message::PromptKey(key));
        }

        let msg = match key {
            Key::Enter => Message::InsertNewline,
            Key::Ctrl('q') => Message::Quit,
            Key::Ctrl('s') => Message::Save,
            Key::Ctrl('f') => Message::StartSearch,
            Key::Ctrl('h') | Key::Backspace => Message::DeleteBack,
            Key::Delete => Message::DeleteForward,
            Key::Ctrl('l') | Key::Escape => Message::Redraw,
            Key::Home => Message::MoveHome,
            Key::End => Message::MoveEnd,
            Key::PageUp => Message::PageUp,
            Key::PageDown => Message::PageDown,
            Key::ArrowUp => Message::MoveCursor(Direction::Up),
            Key::ArrowDown => Message::MoveCursor(Direction::Down),
            Key::ArrowLeft => Message::MoveCursor(Direction::Left),
            Key::ArrowRight => Message::MoveCursor(Direction::Right),
            Key::Ctrl(letter) => Message::InsertChar(control_char(letter)?),
            Key::Char(ch) => Message::InsertChar(ch),
        };
        Some(msg)
    }
}

/// The raw control character for an unbound Ctrl-letter, inserted as text.
fn control_char(letter: char) -> Option<char> {
    u8::try_from(letter)
        .ok()
        .filter(u8::is_ascii_lowercase)
        .map(|byte| char::from(byte & 0x1f))
}
