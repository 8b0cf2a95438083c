//! Key decoding from raw terminal bytes.
//!
//! The terminal runs in raw mode, so every key press arrives as one or more
//! bytes. [`KeyDecoder`] turns them into [`Key`] events, reading escape
//! sequences with a bounded wait so a lone ESC never blocks the editor.

use std::io;
use std::time::Duration;

/// How long to wait for a byte before reporting "no key".
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

const ESC: u8 = 0x1b;
const ENTER: u8 = b'\r';
const BACKSPACE: u8 = 127;

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A character to insert.
    Char(char),
    /// Ctrl plus a letter, stored lowercase (`Ctrl('q')` for byte 0x11).
    Ctrl(char),
    Enter,
    Backspace,
    Delete,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
}

/// A source of raw input bytes with a bounded wait.
pub trait ByteSource {
    /// Read one byte, waiting at most `timeout`.
    ///
    /// `Ok(None)` means nothing arrived in time.
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Turns raw bytes into [`Key`] events.
pub struct KeyDecoder<S> {
    source: S,
    timeout: Duration,
}

impl<S: ByteSource> KeyDecoder<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            timeout: READ_TIMEOUT,
        }
    }

    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Decode the next key.
    ///
    /// Returns `Ok(None)` when no input arrived within the timeout or the
    /// bytes did not form a usable key. Only device errors are returned as
    /// `Err`.
    pub fn read_key(&mut self) -> io::Result<Option<Key>> {
        let Some(byte) = self.source.read_byte(self.timeout)? else {
            return Ok(None);
        };
        let key = match byte {
            ESC => self.read_escape()?,
            ENTER => Key::Enter,
            BACKSPACE => Key::Backspace,
            b'\t' => Key::Char('\t'),
            0x01..=0x1a => Key::Ctrl(char::from(b'a' + byte - 1)),
            0x80..=0xff => match self.read_utf8(byte)? {
                Some(ch) => Key::Char(ch),
                None => return Ok(None),
            },
            _ => Key::Char(char::from(byte)),
        };
        Ok(Some(key))
    }

    fn next(&mut self) -> io::Result<Option<u8>> {
        self.source.read_byte(self.timeout)
    }

    /// Decode the remainder of an escape sequence. Anything unrecognised or
    /// cut short becomes a bare `Escape`.
    fn read_escape(&mut self) -> io::Result<Key> {
        let Some(first) = self.next()? else {
            return Ok(Key::Escape);
        };
        let Some(second) = self.next()? else {
            return Ok(Key::Escape);
        };
        let key = match (first, second) {
            (b'[', digit @ b'0'..=b'9') => match self.next()? {
                Some(b'~') => match digit {
                    b'1' | b'7' => Key::Home,
                    b'3' => Key::Delete,
                    b'4' | b'8' => Key::End,
                    b'5' => Key::PageUp,
                    b'6' => Key::PageDown,
                    _ => Key::Escape,
                },
                _ => Key::Escape,
            },
            (b'[', b'A') => Key::ArrowUp,
            (b'[', b'B') => Key::ArrowDown,
            (b'[', b'C') => Key::ArrowRight,
            (b'[', b'D') => Key::ArrowLeft,
            (b'[' | b'O', b'H') => Key::Home,
            (b'[' | b'O', b'F') => Key::End,
            _ => Key::Escape,
        };
        Ok(key)
    }

    /// Collect the continuation bytes of a multi-byte UTF-8 character.
    fn read_utf8(&mut self, lead: u8) -> io::Result<Option<char>> {
        let width = match lead {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Ok(None),
        };
        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.next()? {
                Some(b) if b & 0xc0 == 0x80 => *slot = b,
                _ => return Ok(None),
            }
        }
        Ok(std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next()))
    }
}
