//! Responsible for grouping source text into a tree of tokens

use crate::lexer::token_parsing::{parse_comment_lexeme, parse_lexeme, Lexeme};
use knossos_tokens::spanned::Span;
use knossos_tokens::token::Token;
use thiserror::Error;
use tracing::{debug, trace};

mod token_parsing;

/// Groups source text into a tree of tokens by parenthesis.
///
/// The root token is a synthetic list whose children are the top level forms, in source order.
///
/// # Examples
/// ```
/// # use knossos_parsing::lexer::Lexer;
/// let root = Lexer::new("(def f Float () 1.0) ; a comment").lex().unwrap();
/// assert_eq!(root.len(), 1);
/// assert_eq!(root.child(0).unwrap().len(), 5);
/// ```
#[derive(Debug)]
pub struct Lexer<'s> {
    rest: &'s str,
    line: usize,
    column: usize,
    /// the starts of the block comments we are in
    comments: Vec<Span>,
    /// the lists that have been opened but not closed yet
    open: Vec<(Span, Vec<Token>)>,
    root: Vec<Token>,
}

impl<'s> Lexer<'s> {
    /// Creates a new lexer
    pub fn new(src: &'s str) -> Self {
        Self {
            rest: src,
            line: 1,
            column: 1,
            comments: vec![],
            open: vec![],
            root: vec![],
        }
    }

    /// Builds the token tree
    pub fn lex(mut self) -> LexResult<Token> {
        loop {
            let span = self.span();
            let parsed = if self.comments.is_empty() {
                parse_lexeme(self.rest)
            } else {
                parse_comment_lexeme(self.rest)
            };
            let Ok((rest, lexeme)) = parsed else {
                unreachable!("every character starts a lexeme, atoms take what nothing else does")
            };
            self.advance(rest);

            match lexeme {
                Lexeme::Eof => break,
                Lexeme::Newline | Lexeme::Insignificant => {}
                Lexeme::BlockOpen => self.comments.push(span),
                Lexeme::BlockClose => {
                    if self.comments.pop().is_none() {
                        return Err(LexError::new(LexErrorKind::UnmatchedCommentClose, span));
                    }
                }
                Lexeme::LParen => self.open.push((span, vec![])),
                Lexeme::RParen => {
                    let Some((open_span, children)) = self.open.pop() else {
                        return Err(LexError::new(LexErrorKind::UnmatchedClose, span));
                    };
                    trace!("closed list opened at {open_span}");
                    let list = Token::list(open_span, children);
                    self.current().push(list);
                }
                Lexeme::Value(value) => {
                    let token = Token::value(span, value);
                    self.current().push(token);
                }
                Lexeme::UnterminatedString => {
                    return Err(LexError::new(LexErrorKind::UnterminatedString, span));
                }
            }
        }

        if let Some(start) = self.comments.first() {
            return Err(LexError::new(LexErrorKind::UnterminatedComment, *start));
        }
        if let Some((start, _)) = self.open.last() {
            return Err(LexError::new(LexErrorKind::Unclosed, *start));
        }
        debug!(
            "lexed {} top level forms over {} lines",
            self.root.len(),
            self.line
        );
        Ok(Token::list(Span::start(), self.root))
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn current(&mut self) -> &mut Vec<Token> {
        match self.open.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        }
    }

    /// moves to `rest`, keeping track of lines and columns of what was skipped
    fn advance(&mut self, rest: &'s str) {
        let consumed = &self.rest[..self.rest.len() - rest.len()];
        for c in consumed.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.rest = rest;
    }
}

/// Lexes source text into a token tree
pub fn lex(src: &str) -> LexResult<Token> {
    Lexer::new(src).lex()
}

pub type LexResult<T> = Result<T, LexError>;

/// An error that occurred while lexing
#[derive(Debug, Error, PartialEq)]
#[error("{kind}")]
pub struct LexError {
    kind: LexErrorKind,
    span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind(&self) -> &LexErrorKind {
        &self.kind
    }

    /// Where the error occurred
    pub fn span(&self) -> Span {
        self.span
    }
}

/// [LexError] kind
#[derive(Debug, Error, PartialEq)]
pub enum LexErrorKind {
    #[error("unmatched ')'")]
    UnmatchedClose,
    #[error("'(' is never closed")]
    Unclosed,
    #[error("'|#' outside of a block comment")]
    UnmatchedCommentClose,
    #[error("block comment is never closed")]
    UnterminatedComment,
    #[error("string literal is never closed")]
    UnterminatedString,
}

#[cfg(test)]
mod tests {
    use super::*;
    use knossos_tokens::spanned::Spanned;
    use test_log::test;

    #[test]
    fn test_lexer() {
        let root = lex("(edef f Float (Integer))\n(def g Integer ((x : Integer)) (f x))").unwrap();
        assert_eq!(root.len(), 2);
        let def = root.child(1).unwrap();
        assert_eq!(def.head().and_then(Token::as_value), Some("def"));
        assert_eq!(def.child(3).unwrap().to_string(), "((x : Integer))");
        assert_eq!(def.line(), 2);
    }

    #[test]
    fn test_empty_source() {
        let root = lex("  \n ; nothing here\n").unwrap();
        assert!(root.is_empty());
        assert!(!root.is_value());
    }

    #[test]
    fn test_top_level_values_are_kept() {
        let root = lex("x (y)").unwrap();
        assert_eq!(root.len(), 2);
        assert!(root.child(0).unwrap().is_value());
    }

    #[test]
    fn test_columns() {
        let root = lex("(a\n   (b c))").unwrap();
        let b = root.child(0).unwrap().child(1).unwrap();
        assert_eq!(b.span(), Span::new(2, 4));
        assert_eq!(b.child(1).unwrap().span(), Span::new(2, 7));
    }

    #[test]
    fn test_unmatched_close() {
        let error = lex("(a))").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::UnmatchedClose);
        assert_eq!(error.span(), Span::new(1, 4));
    }

    #[test]
    fn test_unclosed_reports_innermost_open() {
        let error = lex("(a\n  (b").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::Unclosed);
        assert_eq!(error.span().line(), 2);
    }

    #[test]
    fn test_unterminated_comment() {
        let error = lex("(a)\n#| never #| closed |#").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::UnterminatedComment);
        assert_eq!(error.span(), Span::new(2, 1));
    }

    #[test]
    fn test_parens_in_comments_are_ignored() {
        let root = lex("#| ( |# (a) ; )\n(b)").unwrap();
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn test_comments_can_touch_atoms() {
        let root = lex("(a#| c |#)").unwrap();
        assert_eq!(root.child(0).unwrap().to_string(), "(a)");
        let root = lex("(a#b c)").unwrap();
        assert_eq!(root.child(0).unwrap().len(), 2);
    }

    #[test]
    fn test_unterminated_string() {
        let error = lex("(print \"oops)").unwrap_err();
        assert_eq!(error.kind(), &LexErrorKind::UnterminatedString);
    }
}
