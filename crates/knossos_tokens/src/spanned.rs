//! A trait that can provide the [Span] of a token or ir node

use std::fmt::{Display, Formatter};

/// A trait that can provide the [Span] of a token or ir node
pub trait Spanned {
    fn span(&self) -> Span;
}

/// The position of the first character of a token. Both fields are 1-based.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Span {
    line: usize,
    column: usize,
}

impl Span {
    /// Creates a new span
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The span of the first character of a source
    pub const fn start() -> Self {
        Self::new(1, 1)
    }

    /// Gets the line of this span
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Gets the column of this span
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::start()
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// A line reader struct that's responsible for getting the lines around a span
#[derive(Debug, Default)]
pub struct LineReader {
    before: usize,
    after: usize,
}

impl LineReader {
    /// Creates a new line reader that gets `before` number of lines before a span and `after` number
    /// of lines after.
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }

    /// Gets the lines of `src` surrounding a given span. Returns an empty vec if the span's line
    /// is not in the source.
    pub fn lines(&self, src: &str, span: &Span) -> Vec<Line> {
        let base_line = span.line();
        let range = base_line.saturating_sub(self.before)..=base_line.saturating_add(self.after);
        src.lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(line, _)| range.contains(line))
            .map(|(line, text)| Line {
                line,
                col: if line == base_line {
                    span.column().saturating_sub(1)
                } else {
                    0
                },
                src: text.to_string(),
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct Line {
    pub line: usize,
    pub col: usize,
    pub src: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_is_spanned() {
        let p = Span::new(3, 4).span();
        assert_eq!(p.line(), 3);
        assert_eq!(p.column(), 4);
    }

    #[test]
    fn test_span_ordering() {
        assert!(Span::new(1, 8) < Span::new(2, 1));
        assert!(Span::new(2, 1) < Span::new(2, 3));
    }

    #[test]
    fn test_line_reader() {
        let src = "(def f Float ()\n  1.0)\n(edef g Float Float)\n; trailing\n";
        let lines = LineReader::new(1, 1).lines(src, &Span::new(2, 3));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[1].col, 2);
        assert_eq!(lines[2].src, "(edef g Float Float)");
    }

    #[test]
    fn test_line_reader_out_of_bounds() {
        let lines = LineReader::new(0, 0).lines("x", &Span::new(9, 1));
        assert!(lines.is_empty());
    }
}
