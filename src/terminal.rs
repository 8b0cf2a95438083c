//! Terminal collaborator services.
//!
//! Raw mode toggling, window geometry and the polled stdin byte source the
//! key decoder reads from.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::os::fd::AsRawFd;
use std::time::Duration;

use crossterm::terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute};
use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, poll};

use crate::error::{Result, TerminalError};
use crate::input::ByteSource;

/// Rows reserved below the text area for the status and message bars.
pub const RESERVED_ROWS: u16 = 2;

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub cols: u16,
    pub rows: u16,
}

impl WindowSize {
    /// Rows left for buffer text once the status and message bars are drawn.
    pub const fn text_rows(self) -> u16 {
        self.rows.saturating_sub(RESERVED_ROWS)
    }
}

/// Keeps the terminal in raw mode for its lifetime.
///
/// Dropping the guard clears the screen, homes the cursor and restores the
/// original terminal mode, including when unwinding from an error.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0));
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(%err, "failed to restore terminal mode");
        }
    }
}

/// Stdin read one poll at a time.
///
/// Bytes are read straight from the file descriptor into a local queue, so
/// the poll never misses input already sitting in a userspace buffer.
pub struct StdinSource {
    stdin: io::Stdin,
    pending: VecDeque<u8>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            pending: VecDeque::new(),
        }
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let mut poll_fds = [PollFd::new(&self.stdin, PollFlags::POLLIN)];
        match poll(&mut poll_fds, timeout_ms) {
            Ok(n) => Ok(n > 0),
            Err(Errno::EINTR) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(Some(byte));
        }
        if !self.wait_readable(timeout)? {
            return Ok(None);
        }
        let mut buf = [0u8; 64];
        match nix::unistd::read(self.stdin.as_raw_fd(), &mut buf) {
            Ok(0) => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
            Ok(n) => {
                self.pending.extend(&buf[..n]);
                Ok(self.pending.pop_front())
            }
            Err(Errno::EINTR | Errno::EAGAIN) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Query the window size, falling back to the cursor position report when
/// the terminal does not answer the size request.
pub fn window_size(input: &mut impl ByteSource) -> Result<WindowSize> {
    let size = match terminal::size() {
        Ok((cols, rows)) if cols > 0 => WindowSize { cols, rows },
        _ => {
            let mut stdout = io::stdout();
            let size = size_from_cursor_report(&mut stdout, input)?;
            tracing::debug!(?size, "window size from cursor position report");
            size
        }
    };
    if size.text_rows() == 0 || size.cols == 0 {
        return Err(TerminalError::TooSmall {
            cols: size.cols,
            rows: size.rows,
        });
    }
    tracing::debug!(cols = size.cols, rows = size.rows, "window size");
    Ok(size)
}

/// Push the cursor to the bottom-right corner and ask where it ended up.
pub fn size_from_cursor_report(
    out: &mut impl Write,
    input: &mut impl ByteSource,
) -> Result<WindowSize> {
    out.write_all(b"\x1b[999C\x1b[999B\x1b[6n")?;
    out.flush()?;

    let mut reply = Vec::with_capacity(32);
    while reply.len() < 32 {
        match input.read_byte(crate::input::READ_TIMEOUT)? {
            Some(b'R') => break,
            Some(byte) => reply.push(byte),
            None => break,
        }
    }
    parse_cursor_report(&reply)
}

/// Parse `ESC [ rows ; cols` (the trailing `R` already stripped).
pub fn parse_cursor_report(reply: &[u8]) -> Result<WindowSize> {
    let malformed = || TerminalError::MalformedReport(String::from_utf8_lossy(reply).into_owned());
    let body = reply.strip_prefix(b"\x1b[").ok_or_else(malformed)?;
    let body = std::str::from_utf8(body).map_err(|_| malformed())?;
    let (rows, cols) = body.split_once(';').ok_or_else(malformed)?;
    let rows = rows.parse().map_err(|_| malformed())?;
    let cols = cols.parse().map_err(|_| malformed())?;
    Ok(WindowSize { cols, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reply(VecDeque<u8>);

    impl ByteSource for Reply {
        fn read_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
            Ok(self.0.pop_front())
        }
    }

    #[test]
    fn test_parse_cursor_report() {
        let size = parse_cursor_report(b"\x1b[24;80").unwrap();
        assert_eq!(size, WindowSize { cols: 80, rows: 24 });
    }

    #[test]
    fn test_parse_cursor_report_rejects_garbage() {
        assert!(matches!(
            parse_cursor_report(b"24;80"),
            Err(TerminalError::MalformedReport(_))
        ));
        assert!(parse_cursor_report(b"\x1b[24").is_err());
        assert!(parse_cursor_report(b"\x1b[a;b").is_err());
        assert!(parse_cursor_report(b"").is_err());
    }

    #[test]
    fn test_size_from_cursor_report_writes_query() {
        let mut out = Vec::new();
        let mut input = Reply(b"\x1b[50;132R".iter().copied().collect());
        let size = size_from_cursor_report(&mut out, &mut input).unwrap();
        assert_eq!(out, b"\x1b[999C\x1b[999B\x1b[6n");
        assert_eq!(size, WindowSize { cols: 132, rows: 50 });
    }

    #[test]
    fn test_size_from_cursor_report_without_reply_fails() {
        let mut out = Vec::new();
        let mut input = Reply(VecDeque::new());
        assert!(size_from_cursor_report(&mut out, &mut input).is_err());
    }

    #[test]
    fn test_text_rows_reserves_bars() {
        assert_eq!(WindowSize { cols: 80, rows: 24 }.text_rows(), 22);
        assert_eq!(WindowSize { cols: 80, rows: 1 }.text_rows(), 0);
    }
}
