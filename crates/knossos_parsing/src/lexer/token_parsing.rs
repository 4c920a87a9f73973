use knossos_common::nom_helpers::recognize_string;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_till1, take_while1};
use nom::character::complete::{anychar, char, one_of};
use nom::combinator::{eof, map, not, recognize, value};
use nom::error::{context, VerboseError};
use nom::multi::many1_count;
use nom::sequence::preceded;
use nom::IResult;

type Result<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// The smallest unit the lexer consumes at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Lexeme<'a> {
    Eof,
    Newline,
    /// whitespace, line comments and the contents of block comments
    Insignificant,
    BlockOpen,
    BlockClose,
    LParen,
    RParen,
    Value(&'a str),
    UnterminatedString,
}

/// Parses a lexeme outside of a block comment
pub(super) fn parse_lexeme(src: &str) -> Result<Lexeme> {
    context(
        "lexeme",
        alt((
            value(Lexeme::Eof, eof),
            value(Lexeme::Newline, char('\n')),
            parse_insignificant,
            value(Lexeme::BlockOpen, tag("#|")),
            value(Lexeme::BlockClose, tag("|#")),
            value(Lexeme::LParen, char('(')),
            value(Lexeme::RParen, char(')')),
            map(recognize_string, Lexeme::Value),
            value(Lexeme::UnterminatedString, char('"')),
            map(parse_atom, Lexeme::Value),
        )),
    )(src)
}

/// Parses a lexeme inside of a block comment, where only newlines and nested comment markers
/// matter
pub(super) fn parse_comment_lexeme(src: &str) -> Result<Lexeme> {
    context(
        "block comment",
        alt((
            value(Lexeme::Eof, eof),
            value(Lexeme::Newline, char('\n')),
            value(Lexeme::BlockOpen, tag("#|")),
            value(Lexeme::BlockClose, tag("|#")),
            value(
                Lexeme::Insignificant,
                take_till1(|c: char| matches!(c, '\n' | '#' | '|')),
            ),
            value(Lexeme::Insignificant, anychar),
        )),
    )(src)
}

fn parse_insignificant(src: &str) -> Result<Lexeme> {
    value(
        Lexeme::Insignificant,
        alt((
            context(
                "whitespace",
                take_while1(|c: char| c.is_whitespace() && c != '\n'),
            ),
            context("line comment", preceded(char(';'), take_till(|c: char| c == '\n'))),
        )),
    )(src)
}

/// Atoms stop at whitespace, parenthesis and the start of a comment
fn parse_atom(src: &str) -> Result<&str> {
    context(
        "atom",
        recognize(many1_count(alt((
            take_till1(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | ';' | '#' | '|')),
            recognize(preceded(not(alt((tag("#|"), tag("|#")))), one_of("#|"))),
        )))),
    )(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_atoms_stop_at_parens() {
        let (rest, lexeme) = parse_lexeme("get$1$2)").unwrap();
        assert_eq!(lexeme, Lexeme::Value("get$1$2"));
        assert_eq!(rest, ")");
    }

    #[test]
    fn test_atoms_stop_at_comment_markers() {
        let (rest, lexeme) = parse_lexeme("a#| c |#)").unwrap();
        assert_eq!(lexeme, Lexeme::Value("a"));
        assert_eq!(rest, "#| c |#)");
        let (rest, lexeme) = parse_lexeme("x|# y").unwrap();
        assert_eq!(lexeme, Lexeme::Value("x"));
        assert_eq!(rest, "|# y");
        let (rest, lexeme) = parse_lexeme("a#b|c d").unwrap();
        assert_eq!(lexeme, Lexeme::Value("a#b|c"));
        assert_eq!(rest, " d");
    }

    #[test]
    fn test_line_comment_stops_at_newline() {
        let (rest, lexeme) = parse_lexeme("; a (comment)\n(x)").unwrap();
        assert_eq!(lexeme, Lexeme::Insignificant);
        assert_eq!(rest, "\n(x)");
    }

    #[test]
    fn test_strings_keep_whitespace() {
        let (rest, lexeme) = parse_lexeme("\"a (b) ; c\" d").unwrap();
        assert_eq!(lexeme, Lexeme::Value("\"a (b) ; c\""));
        assert_eq!(rest, " d");
        let (_, lexeme) = parse_lexeme("\"open").unwrap();
        assert_eq!(lexeme, Lexeme::UnterminatedString);
    }

    #[test]
    fn test_comment_lexemes() {
        let (rest, lexeme) = parse_comment_lexeme("skip me #| nested").unwrap();
        assert_eq!(lexeme, Lexeme::Insignificant);
        assert_eq!(rest, "#| nested");
        let (rest, lexeme) = parse_comment_lexeme("#| nested").unwrap();
        assert_eq!(lexeme, Lexeme::BlockOpen);
        assert_eq!(rest, " nested");
        let (_, lexeme) = parse_comment_lexeme("| lone bar").unwrap();
        assert_eq!(lexeme, Lexeme::Insignificant);
    }
}
