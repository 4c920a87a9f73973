//! The lexical token tree of a source file

use crate::spanned::{Span, Spanned};
use std::fmt::{Debug, Display, Formatter};

/// A node of the lexical tree. Either a value (a literal, name, keyword or type name) or a list
/// of child tokens grouped by parenthesis.
#[derive(Clone)]
pub struct Token {
    span: Span,
    kind: TokenKind,
}

/// The kind for this token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Value(String),
    List(Vec<Token>),
}

impl Token {
    /// Creates a new token
    pub fn new(span: Span, kind: TokenKind) -> Self {
        Self { span, kind }
    }

    /// Creates a new value token
    pub fn value(span: Span, value: impl Into<String>) -> Self {
        Self::new(span, TokenKind::Value(value.into()))
    }

    /// Creates a new list token
    pub fn list(span: Span, children: impl IntoIterator<Item = Token>) -> Self {
        Self::new(span, TokenKind::List(children.into_iter().collect()))
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The line the first character of this token is on
    #[inline]
    pub fn line(&self) -> usize {
        self.span.line()
    }

    /// Whether this is a value token
    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self.kind, TokenKind::Value(_))
    }

    /// Gets the value of a value token
    pub fn as_value(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Value(value) => Some(value),
            TokenKind::List(_) => None,
        }
    }

    /// Gets the children of this token. Always empty for a value token.
    pub fn children(&self) -> &[Token] {
        match &self.kind {
            TokenKind::Value(_) => &[],
            TokenKind::List(children) => children,
        }
    }

    /// Gets a child of this token
    pub fn child(&self, idx: usize) -> Option<&Token> {
        self.children().get(idx)
    }

    /// Gets the first child of a list token
    pub fn head(&self) -> Option<&Token> {
        self.children().first()
    }

    /// Gets every child but the first
    pub fn tail(&self) -> &[Token] {
        self.children().get(1..).unwrap_or(&[])
    }

    /// The number of children of this token
    pub fn len(&self) -> usize {
        self.children().len()
    }

    /// Checks if this token has no children
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// Appends a child to a list token, returning it back if this is a value token
    pub fn push(&mut self, child: Token) -> Result<(), Token> {
        match &mut self.kind {
            TokenKind::Value(_) => Err(child),
            TokenKind::List(children) => {
                children.push(child);
                Ok(())
            }
        }
    }

    /// Prints this token as the root of a source file: each child on its own line, without
    /// enclosing parenthesis. Lexing the output produces an equal tree.
    pub fn to_source(&self) -> String {
        match &self.kind {
            TokenKind::Value(value) => value.clone(),
            TokenKind::List(children) => children
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Pretty prints this token, breaking lists that don't fit in `width` columns so that every
    /// operand is on its own line.
    pub fn pprint(&self, width: usize) -> String {
        let mut out = String::new();
        self.pprint_into(&mut out, 0, width);
        out
    }

    fn pprint_into(&self, out: &mut String, indent: usize, width: usize) {
        let flat = self.to_string();
        match &self.kind {
            TokenKind::List(children) if indent + flat.chars().count() > width && !children.is_empty() => {
                out.push('(');
                children[0].pprint_into(out, indent + 1, width);
                for child in &children[1..] {
                    out.push('\n');
                    out.push_str(&" ".repeat(indent + 2));
                    child.pprint_into(out, indent + 2, width);
                }
                out.push(')');
            }
            _ => out.push_str(&flat),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TokenKind::Value(value) => write!(f, "{value}"),
            TokenKind::List(children) => {
                write!(f, "(")?;
                for (idx, child) in children.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

/// Tokens are equal if their structure is, regardless of where they are
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Token {
        Token::value(Span::start(), s)
    }

    fn l(children: impl IntoIterator<Item = Token>) -> Token {
        Token::list(Span::start(), children)
    }

    #[test]
    fn test_head_and_tail() {
        let token = l([v("add"), v("x"), v("1")]);
        assert_eq!(token.head(), Some(&v("add")));
        assert_eq!(token.tail(), &[v("x"), v("1")]);
        assert!(v("x").tail().is_empty());
        assert!(l([]).head().is_none());
    }

    #[test]
    fn test_push_to_value_fails() {
        let mut token = v("x");
        assert!(token.push(v("y")).is_err());
    }

    #[test]
    fn test_equality_ignores_span() {
        assert_eq!(Token::value(Span::new(1, 1), "x"), Token::value(Span::new(7, 3), "x"));
    }

    #[test]
    fn test_display() {
        let token = l([v("let"), l([v("x"), v("1")]), v("x")]);
        assert_eq!(token.to_string(), "(let (x 1) x)");
        assert_eq!(l([]).to_string(), "()");
    }

    #[test]
    fn test_to_source() {
        let root = l([l([v("f"), v("1")]), l([v("g")])]);
        assert_eq!(root.to_source(), "(f 1)\n(g)");
    }

    #[test]
    fn test_pprint_breaks_long_lists() {
        let token = l([v("def"), v("f"), v("Float"), l([v("add"), v("1.0"), v("2.0")])]);
        assert_eq!(token.pprint(80), "(def f Float (add 1.0 2.0))");
        assert_eq!(
            token.pprint(20),
            "(def\n  f\n  Float\n  (add 1.0 2.0))"
        );
    }

    #[test]
    fn test_pprint_width_counts_chars() {
        let token = l([v("f"), v("\"ééééé\"")]);
        assert_eq!(token.pprint(11), "(f \"ééééé\")");
        assert_eq!(token.pprint(10), "(f\n  \"ééééé\")");
    }
}
