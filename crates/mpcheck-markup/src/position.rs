//! Translation of byte offsets into line/column positions and excerpts.

use std::fmt;

use serde::Serialize;

/// Characters of context kept on each side of the reported column.
const EXCERPT_CONTEXT: usize = 100;

const ELLIPSIS: &str = "...";

/// A line/column position in source text.
///
/// `line` is 1-based; `column` is the 0-based byte offset into that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Locate `offset` in `source`.
///
/// Lines are scanned in order, each consuming its length plus the newline,
/// until the offset falls inside one. Offsets past the end clamp to the end
/// of the last line.
pub fn line_column(source: &str, offset: usize) -> Position {
    let mut consumed = 0;
    let mut last = Position { line: 1, column: 0 };

    for (index, line) in source.split('\n').enumerate() {
        if offset <= consumed + line.len() {
            return Position {
                line: index + 1,
                column: offset - consumed,
            };
        }
        last = Position {
            line: index + 1,
            column: line.len(),
        };
        consumed += line.len() + 1;
    }

    last
}

/// Render a two-line excerpt: the source line around `offset`, then a caret
/// under the reported column.
///
/// At most 100 characters are shown on each side of the column; a left
/// truncation is marked with `...`. Leading tabs are widened to two spaces,
/// and the caret indent counts tabs and non-ASCII characters as two columns
/// wide.
pub fn render_excerpt(source: &str, offset: usize) -> String {
    let position = line_column(source, offset);
    let line = source
        .split('\n')
        .nth(position.line - 1)
        .unwrap_or_default()
        .trim_end_matches('\r');

    let mut column = position.column.min(line.len());
    while !line.is_char_boundary(column) {
        column -= 1;
    }
    let (before, after) = line.split_at(column);

    let before_count = before.chars().count();
    let truncated = before_count > EXCERPT_CONTEXT;
    let before: String = before
        .chars()
        .skip(before_count.saturating_sub(EXCERPT_CONTEXT))
        .collect();
    let after: String = after.chars().take(EXCERPT_CONTEXT).collect();

    let mut indent = before.chars().map(display_width).sum::<usize>();
    let mut excerpt = String::new();
    if truncated {
        excerpt.push_str(ELLIPSIS);
        indent += ELLIPSIS.len();
    }

    let shown = format!("{before}{after}");
    let body = shown.trim_start_matches('\t');
    let leading_tabs = shown.len() - body.len();
    excerpt.push_str(&"  ".repeat(leading_tabs));
    excerpt.push_str(body);

    excerpt.push('\n');
    excerpt.push_str(&" ".repeat(indent));
    excerpt.push('^');
    excerpt
}

fn display_width(c: char) -> usize {
    if c == '\t' || !c.is_ascii() { 2 } else { 1 }
}
