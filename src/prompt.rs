//! Single-line prompts shown in the message bar.
//!
//! A prompt collects text one key at a time. An optional [`PromptHandler`]
//! sees every key together with the current input, which is how
//! incremental search moves the cursor while the user types.

use crate::editor::{Buffer, Cursor};
use crate::input::Key;
use crate::ui::viewport::Viewport;

/// Editor state a prompt handler may change while the prompt is open.
pub struct PromptTarget<'a> {
    pub buffer: &'a mut Buffer,
    pub cursor: &'a mut Cursor,
    pub viewport: &'a mut Viewport,
}

/// Called after every key the prompt receives, including the confirming
/// Enter and the cancelling Escape.
pub trait PromptHandler {
    fn on_key(&mut self, target: PromptTarget<'_>, input: &str, key: Key);
}

/// What the prompt was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    SaveAs,
    /// Cursor and offsets to restore if the search is cancelled.
    Search {
        cursor: Cursor,
        row_offset: usize,
        col_offset: usize,
    },
}

/// Result of feeding one key to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Confirmed(String),
    Cancelled,
}

pub struct Prompt {
    template: &'static str,
    input: String,
    purpose: PromptPurpose,
    handler: Option<Box<dyn PromptHandler>>,
}

impl Prompt {
    /// `template` must contain one `{}`, replaced by the current input.
    pub fn new(template: &'static str, purpose: PromptPurpose) -> Self {
        Self {
            template,
            input: String::new(),
            purpose,
            handler: None,
        }
    }

    pub fn with_handler(mut self, handler: Box<dyn PromptHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub const fn purpose(&self) -> PromptPurpose {
        self.purpose
    }

    /// Text for the message bar.
    pub fn message(&self) -> String {
        self.template.replacen("{}", &self.input, 1)
    }

    /// Apply one key. Enter only confirms a non-empty input.
    pub fn handle_key(&mut self, target: PromptTarget<'_>, key: Key) -> PromptOutcome {
        let outcome = match key {
            Key::Backspace | Key::Delete | Key::Ctrl('h') => {
                self.input.pop();
                PromptOutcome::Pending
            }
            Key::Escape => PromptOutcome::Cancelled,
            Key::Enter if !self.input.is_empty() => PromptOutcome::Confirmed(self.input.clone()),
            Key::Char(ch) if ch.is_ascii() && !ch.is_ascii_control() => {
                self.input.push(ch);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        };
        if let Some(handler) = self.handler.as_mut() {
            handler.on_key(target, &self.input, key);
        }
        outcome
    }
}

impl std::fmt::Debug for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prompt")
            .field("template", &self.template)
            .field("input", &self.input)
            .field("purpose", &self.purpose)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
