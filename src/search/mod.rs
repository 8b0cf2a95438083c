//! Incremental search.
//!
//! [`SearchHandler`] runs on every key typed into the search prompt. It
//! jumps to the next line containing the query, paints the match and
//! remembers the line's previous highlight so the paint can be undone on the
//! following key.

use crate::editor::Line;
use crate::highlight::Highlight;
use crate::input::Key;
use crate::prompt::{PromptHandler, PromptTarget};

/// Scan direction through the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// A match position: line index and render column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub line: usize,
    pub rx: usize,
}

/// Find the next line after `from` (in `direction`, wrapping around) whose
/// render form contains `query`. With no `from` the scan starts at line 0.
pub fn find_next(
    lines: &[Line],
    query: &[char],
    from: Option<usize>,
    direction: SearchDirection,
) -> Option<Match> {
    let count = lines.len();
    if query.is_empty() || count == 0 {
        return None;
    }
    let mut current = from;
    for _ in 0..count {
        let next = match (current, direction) {
            (None, _) => 0,
            (Some(idx), SearchDirection::Forward) => (idx + 1) % count,
            (Some(0), SearchDirection::Backward) => count - 1,
            (Some(idx), SearchDirection::Backward) => (idx - 1).min(count - 1),
        };
        current = Some(next);
        if let Some(rx) = lines[next]
            .render()
            .windows(query.len())
            .position(|window| window == query)
        {
            return Some(Match { line: next, rx });
        }
    }
    None
}

/// Prompt handler driving incremental search.
#[derive(Debug, Default)]
pub struct SearchHandler {
    last_match: Option<usize>,
    direction: SearchDirection,
    saved: Option<(usize, Vec<Highlight>)>,
}

impl SearchHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line of the most recent match.
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }
}

impl PromptHandler for SearchHandler {
    fn on_key(&mut self, target: PromptTarget<'_>, input: &str, key: Key) {
        if let Some((line, saved)) = self.saved.take() {
            target.buffer.restore_highlights(line, saved);
        }

        match key {
            Key::Enter | Key::Escape => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.direction = SearchDirection::Forward,
            Key::ArrowLeft | Key::ArrowUp => self.direction = SearchDirection::Backward,
            _ => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
        }
        if self.last_match.is_none() {
            self.direction = SearchDirection::Forward;
        }

        let query: Vec<char> = input.chars().collect();
        let Some(hit) = find_next(
            target.buffer.lines(),
            &query,
            self.last_match,
            self.direction,
        ) else {
            return;
        };
        tracing::debug!(line = hit.line, rx = hit.rx, input, "search hit");

        self.last_match = Some(hit.line);
        let tab_stop = target.buffer.tab_stop();
        if let Some(line) = target.buffer.line(hit.line) {
            target.cursor.line = hit.line;
            target.cursor.col = line.rx_to_cx(hit.rx, tab_stop);
        }
        target.viewport.reveal_line(hit.line);

        let saved = target.buffer.overlay_match(hit.line, hit.rx, query.len());
        self.saved = Some((hit.line, saved));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Buffer, Cursor};
    use crate::ui::viewport::Viewport;

    struct Fixture {
        buffer: Buffer,
        cursor: Cursor,
        viewport: Viewport,
        handler: SearchHandler,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            Self {
                buffer: Buffer::from_text(text, 8),
                cursor: Cursor::new(),
                viewport: Viewport::new(80, 22),
                handler: SearchHandler::new(),
            }
        }

        fn key(&mut self, input: &str, key: Key) {
            self.handler.on_key(
                PromptTarget {
                    buffer: &mut self.buffer,
                    cursor: &mut self.cursor,
                    viewport: &mut self.viewport,
                },
                input,
                key,
            );
        }

        fn highlights(&self, line: usize) -> &[Highlight] {
            self.buffer.line(line).unwrap().highlights()
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_forward_search_wraps_to_top() {
        let buf = Buffer::from_text("foo\nbar\nbaz\n", 8);
        let hit = find_next(buf.lines(), &chars("foo"), Some(2), SearchDirection::Forward);
        assert_eq!(hit, Some(Match { line: 0, rx: 0 }));
    }

    #[test]
    fn test_backward_search_wraps_to_bottom_and_back() {
        let buf = Buffer::from_text("foo\nbar\nbaz\n", 8);
        let hit = find_next(buf.lines(), &chars("foo"), Some(0), SearchDirection::Backward);
        assert_eq!(hit, Some(Match { line: 0, rx: 0 }));
    }

    #[test]
    fn test_no_match_and_empty_query() {
        let buf = Buffer::from_text("foo\nbar\n", 8);
        assert_eq!(
            find_next(buf.lines(), &chars("qux"), None, SearchDirection::Forward),
            None
        );
        assert_eq!(
            find_next(buf.lines(), &[], None, SearchDirection::Forward),
            None
        );
        assert_eq!(
            find_next(&[], &chars("foo"), None, SearchDirection::Forward),
            None
        );
    }

    #[test]
    fn test_match_column_is_render_column() {
        let buf = Buffer::from_text("\tfoo\n", 8);
        let hit = find_next(buf.lines(), &chars("foo"), None, SearchDirection::Forward);
        assert_eq!(hit, Some(Match { line: 0, rx: 8 }));
    }

    #[test]
    fn test_typing_moves_cursor_to_match() {
        let mut fx = Fixture::new("alpha\n\tbeta\ngamma\n");
        fx.key("be", Key::Char('e'));
        assert_eq!(fx.cursor, Cursor::at(1, 1));
        assert_eq!(fx.viewport.row_offset(), 1);
        assert_eq!(fx.handler.last_match(), Some(1));
    }

    #[test]
    fn test_match_is_painted_then_restored() {
        let mut fx = Fixture::new("int foo;\nfoo\n");
        fx.buffer.select_syntax_for("a.c");
        fx.key("foo", Key::Char('o'));
        assert_eq!(fx.highlights(0)[4..7], [Highlight::Match; 3]);
        assert_eq!(fx.highlights(0)[0], Highlight::Keyword2);

        fx.key("foo", Key::ArrowDown);
        assert_eq!(fx.highlights(0)[4], Highlight::Normal);
        assert_eq!(fx.highlights(1)[..3], [Highlight::Match; 3]);

        fx.key("foo", Key::Escape);
        assert!(fx.highlights(1).iter().all(|h| *h == Highlight::Normal));
        assert!(!fx.buffer.is_dirty());
    }

    #[test]
    fn test_arrows_step_through_matches() {
        let mut fx = Fixture::new("x foo\ny\nfoo z\nfoo\n");
        fx.key("foo", Key::Char('o'));
        assert_eq!(fx.cursor.line, 0);
        fx.key("foo", Key::ArrowDown);
        assert_eq!(fx.cursor.line, 2);
        fx.key("foo", Key::ArrowRight);
        assert_eq!(fx.cursor.line, 3);
        fx.key("foo", Key::ArrowDown);
        assert_eq!(fx.cursor.line, 0);
        fx.key("foo", Key::ArrowUp);
        assert_eq!(fx.cursor.line, 3);
        fx.key("foo", Key::ArrowLeft);
        assert_eq!(fx.cursor.line, 2);
    }

    #[test]
    fn test_typing_restarts_from_top() {
        let mut fx = Fixture::new("foo\nfoo\nfoo\n");
        fx.key("foo", Key::Char('o'));
        fx.key("foo", Key::ArrowDown);
        assert_eq!(fx.cursor.line, 1);
        fx.key("fo", Key::Backspace);
        assert_eq!(fx.cursor.line, 0);
    }

    #[test]
    fn test_backward_without_previous_match_searches_forward() {
        let mut fx = Fixture::new("a\nfoo\nfoo\n");
        fx.key("foo", Key::ArrowUp);
        assert_eq!(fx.cursor.line, 1);
    }

    #[test]
    fn test_enter_resets_state() {
        let mut fx = Fixture::new("foo\nfoo\n");
        fx.key("foo", Key::Char('o'));
        fx.key("foo", Key::Enter);
        assert_eq!(fx.handler.last_match(), None);
        assert_eq!(fx.cursor.line, 0);
    }

    #[test]
    fn test_no_match_leaves_cursor() {
        let mut fx = Fixture::new("foo\nbar\n");
        fx.cursor = Cursor::at(1, 2);
        fx.key("zzz", Key::Char('z'));
        assert_eq!(fx.cursor, Cursor::at(1, 2));
    }
}
