//! nom helpers for recognizing the lexical shape of literals

use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{anychar, char, digit1, multispace1};
use nom::combinator::{map, map_res, opt, recognize, value, verify};
use nom::error::ParseError;
use nom::multi::{fold_many0, many0_count};
use nom::number::complete::recognize_float;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;
use std::str::FromStr;

/// Recognizes a double quoted string, escapes included, without unescaping it.
pub fn recognize_string<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    recognize(delimited(
        char('"'),
        many0_count(alt((is_not("\"\\"), recognize(pair(char('\\'), anychar))))),
        char('"'),
    ))(input)
}

/// Parses a boolean literal
pub fn parse_boolean(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("true")), value(false, tag("false"))))(input)
}

/// Parses a decimal integer literal, with an optional leading minus sign
pub fn parse_integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), i64::from_str)(input)
}

/// Parses a floating point literal. Only literals with a decimal point or an exponent are
/// floats, `1` is an integer.
pub fn parse_float(input: &str) -> IResult<&str, f64> {
    map_res(
        verify(recognize_float, |s: &str| {
            s.contains(['.', 'e', 'E']) && s.chars().any(|c| c.is_ascii_digit())
        }),
        f64::from_str,
    )(input)
}

#[derive(Debug, Clone)]
enum StringFragment<'a> {
    Literal(&'a str),
    EscapedChar(char),
    EscapedWs,
}

fn parse_escaped_char(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            value('\\', char('\\')),
            value('/', char('/')),
            value('"', char('"')),
        )),
    )(input)
}

fn parse_string_fragment(input: &str) -> IResult<&str, StringFragment> {
    alt((
        map(
            verify(is_not("\"\\"), |s: &str| !s.is_empty()),
            StringFragment::Literal,
        ),
        map(parse_escaped_char, StringFragment::EscapedChar),
        value(StringFragment::EscapedWs, preceded(char('\\'), multispace1)),
    ))(input)
}

/// Parses a double quoted string literal into its unescaped contents
pub fn parse_string(input: &str) -> IResult<&str, String> {
    let build_string = fold_many0(
        parse_string_fragment,
        String::new,
        |mut accum, next| {
            match next {
                StringFragment::Literal(l) => accum.push_str(l),
                StringFragment::EscapedChar(c) => accum.push(c),
                StringFragment::EscapedWs => {}
            }
            accum
        },
    );
    delimited(char('"'), build_string, char('"'))(input)
}
