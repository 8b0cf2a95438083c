use crate::highlight::{Highlight, Syntax, highlight_line};

/// Widest tab stop accepted; larger values are clamped down.
pub const MAX_TAB_STOP: usize = 64;

/// Render column reached after the first `cx` characters of `chars`.
///
/// A tab advances to the next multiple of `tab_stop`, anything else by one.
pub fn char_to_render_col(chars: &[char], cx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.clamp(1, MAX_TAB_STOP);
    chars.iter().take(cx).fold(0, |rx, &c| {
        if c == '\t' {
            rx + tab_stop - rx % tab_stop
        } else {
            rx + 1
        }
    })
}

/// Character index whose rendered span contains render column `rx`.
///
/// Returns `chars.len()` when `rx` lies past the rendered width.
pub fn render_to_char_col(chars: &[char], rx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.clamp(1, MAX_TAB_STOP);
    let mut cur_rx = 0;
    for (cx, &c) in chars.iter().enumerate() {
        if c == '\t' {
            cur_rx += tab_stop - cur_rx % tab_stop;
        } else {
            cur_rx += 1;
        }
        if cur_rx > rx {
            return cx;
        }
    }
    chars.len()
}

/// Expand tabs to spaces up to the next tab stop.
pub fn expand_tabs(chars: &[char], tab_stop: usize) -> Vec<char> {
    let tab_stop = tab_stop.clamp(1, MAX_TAB_STOP);
    let tabs = chars.iter().filter(|&&c| c == '\t').count();
    let mut render = Vec::with_capacity(chars.len() + tabs * (tab_stop - 1));
    for &c in chars {
        if c == '\t' {
            render.push(' ');
            while render.len() % tab_stop != 0 {
                render.push(' ');
            }
        } else {
            render.push(c);
        }
    }
    render
}

/// One line of the buffer together with its derived display state.
///
/// `render` and `hl` always have the same length; both are rebuilt by the
/// owning [`Buffer`](super::Buffer) whenever `chars` changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    chars: Vec<char>,
    render: Vec<char>,
    hl: Vec<Highlight>,
    open_comment: bool,
}

impl Line {
    pub(super) fn from_chars(chars: Vec<char>) -> Self {
        Self {
            chars,
            ..Self::default()
        }
    }

    /// Raw characters as stored in the file.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Display form with tabs expanded.
    pub fn render(&self) -> &[char] {
        &self.render
    }

    /// One highlight class per rendered character.
    pub fn highlights(&self) -> &[Highlight] {
        &self.hl
    }

    /// Number of raw characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether this line ends inside an unterminated block comment.
    pub const fn open_comment(&self) -> bool {
        self.open_comment
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn render_text(&self) -> String {
        self.render.iter().collect()
    }

    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        char_to_render_col(&self.chars, cx, tab_stop)
    }

    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        render_to_char_col(&self.chars, rx, tab_stop)
    }

    pub(super) fn chars_mut(&mut self) -> &mut Vec<char> {
        &mut self.chars
    }

    /// Rebuild the render form. Highlights are reset to match its length
    /// and must be recomputed with [`Line::update_highlight`].
    pub(super) fn update_render(&mut self, tab_stop: usize) {
        self.render = expand_tabs(&self.chars, tab_stop);
        self.hl.clear();
        self.hl.resize(self.render.len(), Highlight::Normal);
    }

    /// Re-highlight and report whether the open-comment flag flipped.
    pub(super) fn update_highlight(
        &mut self,
        syntax: Option<&Syntax>,
        starts_in_comment: bool,
    ) -> bool {
        let (hl, open_comment) = highlight_line(&self.render, syntax, starts_in_comment);
        self.hl = hl;
        let changed = self.open_comment != open_comment;
        self.open_comment = open_comment;
        changed
    }

    /// Paint `len` rendered characters starting at `start`, returning the
    /// classes that were there before.
    pub(super) fn overlay(&mut self, start: usize, len: usize, class: Highlight) -> Vec<Highlight> {
        let saved = self.hl.clone();
        let end = (start + len).min(self.hl.len());
        if start < end {
            self.hl[start..end].fill(class);
        }
        saved
    }

    /// Put back classes saved by [`Line::overlay`]. Ignored if the render
    /// form changed length in between.
    pub(super) fn restore(&mut self, saved: Vec<Highlight>) {
        if saved.len() == self.hl.len() {
            self.hl = saved;
        }
    }
}
