use std::fmt;

/// A 1-based location in the configuration source.
///
/// Either part may be unknown: trees built programmatically carry no
/// position at all, and some parsers only report lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl Position {
    pub const UNKNOWN: Position = Position {
        line: None,
        column: None,
    };

    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
        }
    }

    pub fn at_line(line: usize) -> Self {
        Self {
            line: Some(line),
            column: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.line.is_some()
    }

    /// Computes the position of a byte offset inside `text`.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text[..floor_char_boundary(text, offset)];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self::new(line, column)
    }

    /// Renders the position as an error-message suffix, or nothing when unknown.
    pub(crate) fn suffix(&self) -> String {
        if self.is_known() {
            format!(" ({self})")
        } else {
            String::new()
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "line {line}, column {column}"),
            (Some(line), None) => write!(f, "line {line}"),
            _ => f.write_str("unknown position"),
        }
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
