use std::{fmt, rc::Rc};

/// A single location in a source text.
///
/// `line` and `column` are zero based; they are only turned into one based
/// numbers when rendered for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset into the source.
    pub index:  usize,
    /// Zero based line number.
    pub line:   usize,
    /// Zero based column, in bytes from the start of the line.
    pub column: usize,
}

/// A region of source text, tagged with the name of the source it came from.
///
/// Spans are attached to every token, AST node and runtime value so that
/// errors can point back at the code that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Name of the file or pseudo file (such as `<stdin>`) the text came from.
    pub source: Rc<str>,
    /// First position covered by the span.
    pub start:  Position,
    /// Position just past the end of the span.
    pub end:    Position,
}

impl Span {
    #[must_use]
    pub const fn new(source: Rc<str>, start: Position, end: Position) -> Self {
        Self { source, start, end }
    }

    /// Returns a span covering both `self` and `other`.
    ///
    /// `self` is expected to begin before `other`; the result starts at
    /// `self.start` and ends at `other.end`.
    #[must_use]
    pub fn to(&self, other: &Self) -> Self {
        Self { source: Rc::clone(&self.source),
               start:  self.start,
               end:    other.end, }
    }

    /// The one based line number used in user facing messages.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.start.line + 1
    }
}

/// Renders as `File <source> in line number <line>`.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File {} in line number {}", self.source, self.line_number())
    }
}
