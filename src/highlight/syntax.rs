//! Static per-filetype syntax profiles.

use std::path::Path;

/// A filetype-specific bundle of keywords and comment markers.
///
/// Keywords ending with [`KEYWORD2_SENTINEL`] are highlighted as
/// secondary keywords (types); all others are primary keywords.
#[derive(Debug, PartialEq, Eq)]
pub struct Syntax {
    /// Name shown in the status bar.
    pub filetype: &'static str,
    /// Entries starting with `.` match the file extension, anything else
    /// matches when it appears anywhere in the file name.
    pub filematch: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

/// Trailing marker that promotes a keyword to the secondary class.
pub const KEYWORD2_SENTINEL: char = '|';

const C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
    "typedef", "static", "enum", "class", "case", "int|", "long|", "double|", "float|", "char|",
    "unsigned|", "signed|", "void|", "size_t|", "ssize_t|", "bool|",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self",
    "static", "struct", "super", "trait", "type", "unsafe", "use", "where", "while", "i8|",
    "i16|", "i32|", "i64|", "u8|", "u16|", "u32|", "u64|", "usize|", "isize|", "f32|", "f64|",
    "bool|", "char|", "str|", "String|", "Self|", "Vec|", "Option|", "Result|",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
    "or", "pass", "raise", "return", "try", "while", "with", "yield", "None|", "True|", "False|",
    "int|", "float|", "str|", "list|", "dict|", "set|", "tuple|", "bytes|",
];

/// Profiles in match priority order.
pub static SYNTAXES: &[Syntax] = &[
    Syntax {
        filetype: "c",
        filematch: &[".c", ".h", ".cpp", ".hpp"],
        keywords: C_KEYWORDS,
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    Syntax {
        filetype: "rust",
        filematch: &[".rs"],
        keywords: RUST_KEYWORDS,
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    Syntax {
        filetype: "python",
        filematch: &[".py"],
        keywords: PYTHON_KEYWORDS,
        line_comment: Some("#"),
        block_comment: None,
        highlight_numbers: true,
        highlight_strings: true,
    },
];

impl Syntax {
    /// Whether any `filematch` entry matches the given file name.
    pub fn matches(&self, filename: &str) -> bool {
        let extension = Path::new(filename)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()));
        self.filematch.iter().any(|pattern| {
            if pattern.starts_with('.') {
                extension.as_deref() == Some(*pattern)
            } else {
                filename.contains(pattern)
            }
        })
    }

    /// Iterate keywords as `(text, is_secondary)` with the sentinel stripped.
    pub fn classified_keywords(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.keywords.iter().map(|kw| match kw.strip_suffix(KEYWORD2_SENTINEL) {
            Some(stripped) => (stripped, true),
            None => (*kw, false),
        })
    }
}

/// Pick the first profile in table order that matches `filename`.
pub fn select_syntax(filename: &str) -> Option<&'static Syntax> {
    SYNTAXES.iter().find(|syntax| syntax.matches(filename))
}
