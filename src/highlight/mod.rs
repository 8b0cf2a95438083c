//! Syntax highlighting for buffer lines.
//!
//! Highlighting is a left-to-right state machine over a line's render form.
//! The only state carried between lines is whether the previous line ended
//! inside a block comment; [`highlight_line`] takes that as input and
//! returns the state for the next line.

mod syntax;

pub use syntax::{KEYWORD2_SENTINEL, SYNTAXES, Syntax, select_syntax};

/// SGR code restoring the terminal's default foreground color.
pub const DEFAULT_FOREGROUND: u8 = 39;

/// Highlight class assigned to each rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    BlockComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
}

impl Highlight {
    /// SGR foreground code for this class, one of the eight base colors.
    /// `Normal` maps to 39, the default foreground.
    pub const fn color(self) -> u8 {
        match self {
            Self::Comment | Self::BlockComment => 36,
            Self::Keyword1 => 33,
            Self::Keyword2 => 32,
            Self::String => 35,
            Self::Number => 31,
            Self::Match => 34,
            Self::Normal => DEFAULT_FOREGROUND,
        }
    }
}

const SEPARATOR_PUNCTUATION: &str = ",.()+-/*=~%<>[]:;{}";

/// Characters that bound keywords and numbers.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0' || SEPARATOR_PUNCTUATION.contains(c)
}

fn starts_with_at(render: &[char], at: usize, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    let mut rest = render[at..].iter();
    marker.chars().all(|m| rest.next() == Some(&m))
}

fn keyword_at(render: &[char], at: usize, syntax: &Syntax) -> Option<(usize, Highlight)> {
    syntax.classified_keywords().find_map(|(keyword, secondary)| {
        let len = keyword.chars().count();
        let bounded = render.get(at + len).is_none_or(|&c| is_separator(c));
        if len > 0 && bounded && starts_with_at(render, at, keyword) {
            let class = if secondary {
                Highlight::Keyword2
            } else {
                Highlight::Keyword1
            };
            Some((len, class))
        } else {
            None
        }
    })
}

/// Classify every character of `render`.
///
/// `starts_in_comment` is the previous line's open-comment flag. Returns the
/// classes (same length as `render`) and whether this line ends inside an
/// unterminated block comment.
pub fn highlight_line(
    render: &[char],
    syntax: Option<&Syntax>,
    starts_in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = starts_in_comment;

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if let Some(marker) = syntax.line_comment
            && in_string.is_none()
            && !in_comment
            && starts_with_at(render, i, marker)
        {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if let Some((start, end)) = syntax.block_comment
            && in_string.is_none()
        {
            if in_comment {
                hl[i] = Highlight::BlockComment;
                if starts_with_at(render, i, end) {
                    let len = end.chars().count();
                    hl[i..i + len].fill(Highlight::BlockComment);
                    i += len;
                    in_comment = false;
                    prev_sep = true;
                    continue;
                }
                i += 1;
                continue;
            } else if starts_with_at(render, i, start) {
                let len = start.chars().count();
                hl[i..i + len].fill(Highlight::BlockComment);
                i += len;
                in_comment = true;
                continue;
            }
        }

        if syntax.highlight_strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == '\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == '"' || c == '\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == '.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep && let Some((len, class)) = keyword_at(render, i, syntax) {
            hl[i..i + len].fill(class);
            i += len;
            prev_sep = false;
            continue;
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}
