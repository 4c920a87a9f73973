use crate::lexer::LexError;
use knossos_ast::signature::Signature;
use knossos_tokens::spanned::{Span, Spanned};
use knossos_tokens::token::Token;
use knossos_tokens::SpannedError;
use std::io;

/// Found tokens longer than this are cut short in error messages
const MAX_FOUND_LEN: usize = 48;

/// Represents an error occurring during parsing
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ParseError(SpannedError<ErrorKind, ParseError>);

impl ParseError {
    /// Creates a new error at a location
    pub fn new(kind: ErrorKind, location: impl Into<Option<Span>>) -> Self {
        Self(SpannedError::new(kind, location, None))
    }

    /// Gets the kind of error
    pub fn kind(&self) -> &ErrorKind {
        self.0.error()
    }

    /// Where the error occurred, if known
    pub fn span(&self) -> Option<Span> {
        self.0.location()
    }

    /// The line of the offending token, if known
    pub fn line(&self) -> Option<usize> {
        self.span().map(|span| span.line())
    }

    /// Renders this error with an excerpt of the source it was found in
    pub fn render(&self, src: &str) -> String {
        self.0.render(src)
    }

    /// A form with the given name does not have the expected shape
    pub fn syntax(form: &'static str, expected: impl Into<String>, found: &Token) -> Self {
        Self::new(
            ErrorKind::Syntax {
                form,
                expected: expected.into(),
                found: describe(found),
            },
            found.span(),
        )
    }

    /// A type could not be parsed from a token
    pub fn type_parse(expected: impl Into<String>, found: &Token) -> Self {
        Self::new(
            ErrorKind::TypeParse {
                expected: expected.into(),
                found: describe(found),
            },
            found.span(),
        )
    }
}

impl From<LexError> for ParseError {
    fn from(value: LexError) -> Self {
        let span = value.span();
        Self::new(ErrorKind::Lex(value), span)
    }
}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::new(ErrorKind::Io(value), None)
    }
}

/// [ParseError] kind
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("malformed {form}: expected {expected}, found {found}")]
    Syntax {
        form: &'static str,
        expected: String,
        found: String,
    },
    #[error("expected {expected}, found {found}")]
    TypeParse { expected: String, found: String },
    #[error("unresolved symbol {0:?}")]
    UnresolvedSymbol(String),
    #[error("{signature} is already defined on line {previous_line}")]
    DuplicateDefinition {
        signature: Signature,
        previous_line: usize,
    },
    #[error("unknown form {0}")]
    UnknownForm(String),
    #[error("source has already been parsed")]
    AlreadyParsed,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type ParseResult<T = ()> = Result<T, ParseError>;

/// Describes a token for an error message
fn describe(token: &Token) -> String {
    if token.is_empty() && !token.is_value() {
        return "()".to_string();
    }
    let text = token.to_string();
    if text.chars().count() > MAX_FOUND_LEN {
        let cut = text.chars().take(MAX_FOUND_LEN).collect::<String>();
        format!("{cut}...")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use test_log::test;

    #[test]
    fn test_lex_errors_keep_their_line() {
        let lex_error = lex("(a\n))").unwrap_err();
        let error = ParseError::from(lex_error);
        assert!(matches!(error.kind(), ErrorKind::Lex(_)));
        assert_eq!(error.line(), Some(2));
        assert!(error.to_string().contains("line 2:2"), "{error}");
    }

    #[test]
    fn test_syntax_error_message() {
        let token = Token::value(Span::new(3, 1), "x");
        let error = ParseError::syntax("if", "3 operands", &token);
        assert_eq!(error.line(), Some(3));
        assert_eq!(
            error.to_string(),
            "malformed if: expected 3 operands, found x\n  -> line 3:1"
        );
    }

    #[test]
    fn test_long_tokens_are_cut() {
        let long = "y".repeat(100);
        let token = Token::value(Span::start(), long);
        let error = ParseError::type_parse("a type", &token);
        let ErrorKind::TypeParse { found, .. } = error.kind() else {
            panic!("wrong kind: {error}");
        };
        assert!(found.ends_with("..."));
    }
}
