// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. prompt::PromptHandler)
    clippy::module_name_repetitions
)]

//! # Kilo
//!
//! A small terminal text editor.
//!
//! Kilo edits one file at a time in the terminal with:
//! - Syntax highlighting, including block comments spanning lines
//! - Incremental search
//! - Save and save-as
//!
//! ## Architecture
//!
//! Kilo uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Line buffer and edit operations
//! - [`highlight`]: Syntax highlighting
//! - [`input`]: Key decoding from raw terminal bytes
//! - [`prompt`]: Message bar prompts
//! - [`search`]: Incremental search
//! - [`terminal`]: Raw mode and window size
//! - [`ui`]: Screen composition

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod highlight;
pub mod input;
pub mod prompt;
pub mod search;
pub mod terminal;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{Buffer, Cursor, Direction};
    pub use crate::ui::viewport::Viewport;
}
