use crate::highlight::{Highlight, Syntax, select_syntax};

use super::line::{Line, MAX_TAB_STOP};

/// Default tab stop width.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Cursor position in the buffer.
///
/// `line` ranges over `0..=line_count`; the extra position is the empty
/// virtual line after the last one, where typing appends a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character column within the line.
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self { line: 0, col: 0 }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Ordered lines of text plus the state derived from them.
///
/// Every content change rebuilds the touched line's render form and
/// re-highlights before returning, so readers never see stale derived
/// state. A monotonic modification counter tracks unsaved edits.
#[derive(Clone)]
pub struct Buffer {
    lines: Vec<Line>,
    syntax: Option<&'static Syntax>,
    tab_stop: usize,
    dirty: u64,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new(tab_stop: usize) -> Self {
        Self {
            lines: Vec::new(),
            syntax: None,
            tab_stop: tab_stop.clamp(1, MAX_TAB_STOP),
            dirty: 0,
        }
    }

    /// Load newline-delimited text. Trailing CR/LF are stripped per line and
    /// a final newline does not produce an extra empty line.
    pub fn from_text(text: &str, tab_stop: usize) -> Self {
        let mut buf = Self::new(tab_stop);
        buf.lines = text
            .lines()
            .map(|line| Line::from_chars(line.trim_end_matches('\r').chars().collect()))
            .collect();
        for line in &mut buf.lines {
            line.update_render(buf.tab_stop);
        }
        buf.rehighlight(0, buf.lines.len());
        buf
    }

    /// Flatten back to text: every line followed by a newline.
    pub fn to_text(&self) -> String {
        let total: usize = self.lines.iter().map(|line| line.len() + 1).sum();
        let mut text = String::with_capacity(total);
        for line in &self.lines {
            text.extend(line.chars());
            text.push('\n');
        }
        text
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Length of a line in characters, 0 past the end.
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, Line::len)
    }

    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Whether the buffer has been modified since loading or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Number of content changes since loading or last save.
    pub const fn modifications(&self) -> u64 {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    pub const fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    /// Switch profile and re-highlight every line.
    pub fn set_syntax(&mut self, syntax: Option<&'static Syntax>) {
        self.syntax = syntax;
        self.rehighlight(0, self.lines.len());
    }

    /// Select the profile matching `filename` and re-highlight.
    pub fn select_syntax_for(&mut self, filename: &str) {
        let syntax = select_syntax(filename);
        tracing::debug!(
            filename,
            filetype = syntax.map(|s| s.filetype),
            "syntax selected"
        );
        self.set_syntax(syntax);
    }

    /// Render column of `cursor` on its line.
    pub fn render_col(&self, cursor: Cursor) -> usize {
        self.lines
            .get(cursor.line)
            .map_or(0, |line| line.cx_to_rx(cursor.col, self.tab_stop))
    }

    // --- Line operations ---

    /// Insert a new line at `at`, shifting later lines down.
    pub fn insert_line(&mut self, at: usize, chars: &[char]) {
        if at > self.lines.len() {
            return;
        }
        let mut line = Line::from_chars(chars.to_vec());
        line.update_render(self.tab_stop);
        self.lines.insert(at, line);
        // The following line's incoming comment state may have changed too.
        self.rehighlight(at, at + 2);
        self.dirty += 1;
    }

    /// Remove the line at `at`, shifting later lines up.
    pub fn delete_line(&mut self, at: usize) {
        if at >= self.lines.len() {
            return;
        }
        self.lines.remove(at);
        self.rehighlight(at, at + 1);
        self.dirty += 1;
    }

    /// Insert `ch` at column `at` (clamped to the line end).
    pub fn insert_char(&mut self, line: usize, at: usize, ch: char) {
        let Some(target) = self.lines.get_mut(line) else {
            return;
        };
        let chars = target.chars_mut();
        let at = at.min(chars.len());
        chars.insert(at, ch);
        self.refresh_line(line);
    }

    /// Remove the character at column `at`.
    pub fn delete_char(&mut self, line: usize, at: usize) {
        let Some(target) = self.lines.get_mut(line) else {
            return;
        };
        let chars = target.chars_mut();
        if at >= chars.len() {
            return;
        }
        chars.remove(at);
        self.refresh_line(line);
    }

    /// Append characters to the end of a line.
    pub fn append_chars(&mut self, line: usize, extra: &[char]) {
        let Some(target) = self.lines.get_mut(line) else {
            return;
        };
        target.chars_mut().extend_from_slice(extra);
        self.refresh_line(line);
    }

    /// Split a line at `col`; the tail becomes a new following line.
    pub fn split_line(&mut self, line: usize, col: usize) {
        let Some(target) = self.lines.get_mut(line) else {
            return;
        };
        let chars = target.chars_mut();
        let tail = chars.split_off(col.min(chars.len()));
        self.refresh_line(line);
        self.insert_line(line + 1, &tail);
    }

    /// Join a line with its successor.
    pub fn join_with_next(&mut self, line: usize) {
        if line + 1 >= self.lines.len() {
            return;
        }
        let next = self.lines[line + 1].chars().to_vec();
        self.append_chars(line, &next);
        self.delete_line(line + 1);
    }

    // --- Cursor-level editing ---

    /// Insert a character at the cursor and advance past it.
    pub fn insert_char_at(&mut self, cursor: &mut Cursor, ch: char) {
        if cursor.line == self.lines.len() {
            self.insert_line(self.lines.len(), &[]);
        }
        self.insert_char(cursor.line, cursor.col, ch);
        cursor.col += 1;
    }

    /// Split the current line at the cursor (Enter key).
    pub fn insert_newline(&mut self, cursor: &mut Cursor) {
        if cursor.col == 0 {
            self.insert_line(cursor.line, &[]);
        } else {
            self.split_line(cursor.line, cursor.col);
        }
        cursor.line += 1;
        cursor.col = 0;
    }

    /// Delete the character before the cursor (Backspace), joining with the
    /// previous line at column 0.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self, cursor: &mut Cursor) -> bool {
        if cursor.line >= self.lines.len() || (cursor.col == 0 && cursor.line == 0) {
            return false;
        }
        if cursor.col > 0 {
            self.delete_char(cursor.line, cursor.col - 1);
            cursor.col -= 1;
        } else {
            cursor.col = self.line_len(cursor.line - 1);
            self.join_with_next(cursor.line - 1);
            cursor.line -= 1;
        }
        true
    }

    /// Move the cursor one step, wrapping across line ends horizontally
    /// and clamping the column after any move.
    pub fn move_cursor(&self, cursor: &mut Cursor, direction: Direction) {
        let line_len = self.lines.get(cursor.line).map(Line::len);
        match direction {
            Direction::Left => {
                if cursor.col > 0 {
                    cursor.col -= 1;
                } else if cursor.line > 0 {
                    cursor.line -= 1;
                    cursor.col = self.line_len(cursor.line);
                }
            }
            Direction::Right => match line_len {
                Some(len) if cursor.col < len => cursor.col += 1,
                Some(len) if cursor.col == len => {
                    cursor.line += 1;
                    cursor.col = 0;
                }
                _ => {}
            },
            Direction::Up => cursor.line = cursor.line.saturating_sub(1),
            Direction::Down => {
                if cursor.line < self.lines.len() {
                    cursor.line += 1;
                }
            }
        }
        cursor.col = cursor.col.min(self.line_len(cursor.line));
    }

    // --- Search overlay ---

    /// Paint a match over a line's highlights, returning the saved classes.
    pub(crate) fn overlay_match(&mut self, line: usize, start: usize, len: usize) -> Vec<Highlight> {
        self.lines
            .get_mut(line)
            .map(|target| target.overlay(start, len, Highlight::Match))
            .unwrap_or_default()
    }

    pub(crate) fn restore_highlights(&mut self, line: usize, saved: Vec<Highlight>) {
        if let Some(target) = self.lines.get_mut(line) {
            target.restore(saved);
        }
    }

    // --- Private helpers ---

    fn refresh_line(&mut self, line: usize) {
        self.lines[line].update_render(self.tab_stop);
        self.rehighlight(line, line + 1);
        self.dirty += 1;
    }

    /// Highlight lines from `start`, always covering `start..min_end` and
    /// continuing while a line's open-comment flag flips.
    fn rehighlight(&mut self, start: usize, min_end: usize) {
        let mut idx = start;
        while idx < self.lines.len() {
            let starts_in_comment = idx > 0 && self.lines[idx - 1].open_comment();
            let changed = self.lines[idx].update_highlight(self.syntax, starts_in_comment);
            idx += 1;
            if !changed && idx >= min_end {
                break;
            }
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_STOP)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &format_args!("{} lines", self.lines.len()))
            .field("syntax", &self.syntax.map(|s| s.filetype))
            .field("tab_stop", &self.tab_stop)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_buffer(text: &str) -> Buffer {
        let mut buf = Buffer::from_text(text, DEFAULT_TAB_STOP);
        buf.select_syntax_for("test.c");
        buf
    }

    fn line_text(buf: &Buffer, idx: usize) -> String {
        buf.line(idx).map(Line::text).unwrap_or_default()
    }

    fn all_comment(buf: &Buffer, idx: usize) -> bool {
        buf.line(idx)
            .unwrap()
            .highlights()
            .iter()
            .all(|h| *h == Highlight::BlockComment)
    }

    fn assert_derived_state(buf: &Buffer) {
        for line in buf.lines() {
            assert_eq!(line.render().len(), line.highlights().len());
        }
    }

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_no_lines() {
        let buf = Buffer::default();
        assert_eq!(buf.line_count(), 0);
        assert_eq!(buf.to_text(), "");
    }

    #[test]
    fn test_from_text_strips_line_endings() {
        let buf = Buffer::from_text("hello\r\nworld\n", 8);
        assert_eq!(buf.line_count(), 2);
        assert_eq!(line_text(&buf, 0), "hello");
        assert_eq!(line_text(&buf, 1), "world");
    }

    #[test]
    fn test_text_roundtrip() {
        let content = "line one\n\tline two\n\nline four\n";
        let buf = Buffer::from_text(content, 8);
        assert_eq!(buf.to_text(), content);
        let reloaded = Buffer::from_text(&buf.to_text(), 8);
        assert_eq!(reloaded.lines(), buf.lines());
    }

    #[test]
    fn test_from_text_renders_tabs() {
        let buf = Buffer::from_text("\tx", 4);
        assert_eq!(buf.line(0).unwrap().render_text(), "    x");
    }

    #[test]
    fn test_tab_stop_never_zero() {
        assert_eq!(Buffer::new(0).tab_stop(), 1);
    }

    #[test]
    fn test_huge_tab_stop_is_clamped() {
        let buf = Buffer::from_text("\tx\n", usize::MAX);
        assert_eq!(buf.tab_stop(), MAX_TAB_STOP);
        assert_eq!(buf.line(0).unwrap().render().len(), MAX_TAB_STOP + 1);
        assert_eq!(buf.render_col(Cursor::at(0, 1)), MAX_TAB_STOP);
    }

    // --- Dirty tracking ---

    #[test]
    fn test_loaded_buffer_is_clean() {
        let buf = Buffer::from_text("hello\n", 8);
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_every_edit_increments_counter() {
        let mut buf = Buffer::from_text("hello\n", 8);
        buf.insert_char(0, 0, 'x');
        assert_eq!(buf.modifications(), 1);
        buf.delete_char(0, 0);
        assert_eq!(buf.modifications(), 2);
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_rejected_edits_do_not_dirty() {
        let mut buf = Buffer::from_text("hi\n", 8);
        buf.delete_char(0, 5);
        buf.delete_line(3);
        buf.insert_line(5, &[]);
        assert!(!buf.is_dirty());
    }

    // --- Line operations ---

    #[test]
    fn test_insert_and_delete_line_shift_indices() {
        let mut buf = Buffer::from_text("a\nc\n", 8);
        buf.insert_line(1, &['b']);
        assert_eq!(buf.line_count(), 3);
        assert_eq!(line_text(&buf, 1), "b");
        assert_eq!(line_text(&buf, 2), "c");
        buf.delete_line(0);
        assert_eq!(line_text(&buf, 0), "b");
        assert_eq!(line_text(&buf, 1), "c");
    }

    #[test]
    fn test_insert_char_clamps_column() {
        let mut buf = Buffer::from_text("ab\n", 8);
        buf.insert_char(0, 99, 'c');
        assert_eq!(line_text(&buf, 0), "abc");
    }

    #[test]
    fn test_split_and_join() {
        let mut buf = Buffer::from_text("helloworld\n", 8);
        buf.split_line(0, 5);
        assert_eq!(line_text(&buf, 0), "hello");
        assert_eq!(line_text(&buf, 1), "world");
        buf.join_with_next(0);
        assert_eq!(buf.line_count(), 1);
        assert_eq!(line_text(&buf, 0), "helloworld");
    }

    // --- Cursor-level editing ---

    #[test]
    fn test_typing_on_virtual_line_appends() {
        let mut buf = Buffer::default();
        let mut cursor = Cursor::new();
        buf.insert_char_at(&mut cursor, 'h');
        buf.insert_char_at(&mut cursor, 'i');
        assert_eq!(buf.line_count(), 1);
        assert_eq!(line_text(&buf, 0), "hi");
        assert_eq!(cursor, Cursor::at(0, 2));
    }

    #[test]
    fn test_newline_at_column_zero_inserts_above() {
        let mut buf = Buffer::from_text("hello\n", 8);
        let mut cursor = Cursor::new();
        buf.insert_newline(&mut cursor);
        assert_eq!(line_text(&buf, 0), "");
        assert_eq!(line_text(&buf, 1), "hello");
        assert_eq!(cursor, Cursor::at(1, 0));
    }

    #[test]
    fn test_newline_in_middle_splits() {
        let mut buf = Buffer::from_text("hello world\n", 8);
        let mut cursor = Cursor::at(0, 5);
        buf.insert_newline(&mut cursor);
        assert_eq!(line_text(&buf, 0), "hello");
        assert_eq!(line_text(&buf, 1), " world");
        assert_eq!(cursor, Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_at_origin_is_noop() {
        let mut buf = Buffer::from_text("hello\n", 8);
        let mut cursor = Cursor::new();
        assert!(!buf.delete_back(&mut cursor));
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_delete_back_removes_char() {
        let mut buf = Buffer::from_text("hello\n", 8);
        let mut cursor = Cursor::at(0, 5);
        assert!(buf.delete_back(&mut cursor));
        assert_eq!(line_text(&buf, 0), "hell");
        assert_eq!(cursor, Cursor::at(0, 4));
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = Buffer::from_text("hello\nworld\n", 8);
        let mut cursor = Cursor::at(1, 0);
        buf.delete_back(&mut cursor);
        assert_eq!(buf.line_count(), 1);
        assert_eq!(line_text(&buf, 0), "helloworld");
        assert_eq!(cursor, Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_on_virtual_line_is_noop() {
        let mut buf = Buffer::from_text("hello\n", 8);
        let mut cursor = Cursor::at(1, 0);
        assert!(!buf.delete_back(&mut cursor));
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line_end() {
        let buf = Buffer::from_text("hello\nworld\n", 8);
        let mut cursor = Cursor::at(1, 0);
        buf.move_cursor(&mut cursor, Direction::Left);
        assert_eq!(cursor, Cursor::at(0, 5));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let buf = Buffer::from_text("hello\nworld\n", 8);
        let mut cursor = Cursor::at(0, 5);
        buf.move_cursor(&mut cursor, Direction::Right);
        assert_eq!(cursor, Cursor::at(1, 0));
    }

    #[test]
    fn test_move_down_reaches_virtual_line_and_stops() {
        let buf = Buffer::from_text("hello\n", 8);
        let mut cursor = Cursor::at(0, 3);
        buf.move_cursor(&mut cursor, Direction::Down);
        assert_eq!(cursor, Cursor::at(1, 0));
        buf.move_cursor(&mut cursor, Direction::Down);
        assert_eq!(cursor, Cursor::at(1, 0));
    }

    #[test]
    fn test_move_up_clamps_to_shorter_line() {
        let buf = Buffer::from_text("hi\nhello\n", 8);
        let mut cursor = Cursor::at(1, 4);
        buf.move_cursor(&mut cursor, Direction::Up);
        assert_eq!(cursor, Cursor::at(0, 2));
    }

    #[test]
    fn test_render_col_accounts_for_tabs() {
        let buf = Buffer::from_text("\tab\n", 8);
        assert_eq!(buf.render_col(Cursor::at(0, 1)), 8);
        assert_eq!(buf.render_col(Cursor::at(1, 0)), 0);
    }

    // --- Highlight propagation ---

    #[test]
    fn test_block_comment_spans_lines() {
        let buf = c_buffer("/* start\nmiddle\nend */\nafter\n");
        assert!(all_comment(&buf, 0));
        assert!(all_comment(&buf, 1));
        assert!(all_comment(&buf, 2));
        assert!(
            buf.line(3)
                .unwrap()
                .highlights()
                .iter()
                .all(|h| *h == Highlight::Normal)
        );
    }

    #[test]
    fn test_closing_comment_above_rehighlights_below() {
        let mut buf = c_buffer("/* start\nmiddle\nend */\nafter\n");
        buf.insert_char(1, 6, '*');
        buf.insert_char(1, 7, '/');
        assert!(all_comment(&buf, 1));
        assert!(!buf.line(1).unwrap().open_comment());
        assert!(
            buf.line(2)
                .unwrap()
                .highlights()
                .iter()
                .all(|h| *h == Highlight::Normal)
        );
    }

    #[test]
    fn test_opening_comment_propagates_down_chain() {
        let mut buf = c_buffer("a\nb\nc\nd\n");
        buf.insert_char(0, 0, '/');
        buf.insert_char(0, 1, '*');
        for idx in 0..4 {
            assert!(all_comment(&buf, idx), "line {idx} should be comment");
        }
        buf.delete_char(0, 0);
        for idx in 1..4 {
            assert!(!all_comment(&buf, idx), "line {idx} should be normal");
        }
    }

    #[test]
    fn test_deleting_comment_line_rehighlights_successor() {
        let mut buf = c_buffer("/* open\nx */\ny\n");
        buf.delete_line(0);
        assert_eq!(
            buf.line(0).unwrap().highlights()[0],
            Highlight::Normal,
            "x is no longer inside a comment"
        );
    }

    #[test]
    fn test_inserting_line_inside_comment_keeps_successor_commented() {
        let mut buf = c_buffer("/* open\nbody\nclose */\n");
        buf.insert_line(1, &['n', 'e', 'w']);
        assert!(all_comment(&buf, 1));
        assert!(all_comment(&buf, 2));
        assert!(all_comment(&buf, 3));
    }

    #[test]
    fn test_set_syntax_rehighlights_everything() {
        let mut buf = Buffer::from_text("int x;\n", 8);
        assert_eq!(buf.line(0).unwrap().highlights()[0], Highlight::Normal);
        buf.select_syntax_for("main.c");
        assert_eq!(buf.line(0).unwrap().highlights()[0], Highlight::Keyword2);
        buf.set_syntax(None);
        assert_eq!(buf.line(0).unwrap().highlights()[0], Highlight::Normal);
    }

    #[test]
    fn test_overlay_match_saves_previous_classes() {
        let mut buf = c_buffer("int foo;\n");
        let saved = buf.overlay_match(0, 4, 3);
        assert_eq!(buf.line(0).unwrap().highlights()[4..7], [Highlight::Match; 3]);
        buf.restore_highlights(0, saved);
        assert_eq!(buf.line(0).unwrap().highlights()[4], Highlight::Normal);
        assert_eq!(buf.line(0).unwrap().highlights()[0], Highlight::Keyword2);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Edit {
            Type(char),
            Newline,
            Backspace,
            Move(u8),
        }

        fn edit_strategy() -> impl Strategy<Value = Edit> {
            prop_oneof![
                prop::sample::select(vec!['a', '/', '*', '"', '\t', '1', ' ', 'i', 'f'])
                    .prop_map(Edit::Type),
                Just(Edit::Newline),
                Just(Edit::Backspace),
                (0u8..4).prop_map(Edit::Move),
            ]
        }

        proptest! {
            #[test]
            fn derived_state_stays_consistent(edits in prop::collection::vec(edit_strategy(), 0..80)) {
                let mut buf = c_buffer("/* x\ny */\nint z = 1;\n");
                let mut cursor = Cursor::new();
                for edit in edits {
                    match edit {
                        Edit::Type(ch) => buf.insert_char_at(&mut cursor, ch),
                        Edit::Newline => buf.insert_newline(&mut cursor),
                        Edit::Backspace => {
                            buf.delete_back(&mut cursor);
                        }
                        Edit::Move(dir) => {
                            let dir = [Direction::Up, Direction::Down, Direction::Left, Direction::Right][dir as usize];
                            buf.move_cursor(&mut cursor, dir);
                        }
                    }
                    prop_assert!(cursor.line <= buf.line_count());
                    prop_assert!(cursor.col <= buf.line_len(cursor.line));
                }
                assert_derived_state(&buf);

                // Incremental highlighting must agree with a fresh full pass.
                let fresh = c_buffer(&buf.to_text());
                for (edited, reloaded) in buf.lines().iter().zip(fresh.lines()) {
                    prop_assert_eq!(edited.highlights(), reloaded.highlights());
                }
            }
        }
    }
}
