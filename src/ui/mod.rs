//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - the frame compositor, which writes escape sequences for a whole
//!   screen into one buffer
//! - status and message bar text

pub mod viewport;

mod render;
mod status;

pub use render::{render, welcome_message};
pub use status::{message_line, status_line, truncate_to_width};
