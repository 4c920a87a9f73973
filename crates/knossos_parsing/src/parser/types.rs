//! Parses types from tokens

use crate::parser::error::{ErrorKind, ParseError, ParseResult};
use knossos_ast::types::{ScalarKind, Type};
use knossos_tokens::spanned::Spanned;
use knossos_tokens::token::Token;
use knossos_common::nom_helpers::parse_integer;
use nom::combinator::all_consuming;
use nom::Finish;
use std::str::FromStr;

/// Type constructors that take arguments
const COMPOUND: &[&str] = &["Tensor", "Vec", "Tuple", "Lam", "LM"];

/// Whether a name is a type constructor that takes arguments
pub fn is_type_constructor(name: &str) -> bool {
    COMPOUND.contains(&name)
}

/// Parses a type from a single token
///
/// # Examples
/// ```
/// # use knossos_ast::types::Type;
/// # use knossos_parsing::lexer::lex;
/// # use knossos_parsing::parser::types::parse_type;
/// let root = lex("(Tensor 2 Float)").unwrap();
/// let ty = parse_type(root.child(0).unwrap()).unwrap();
/// assert_eq!(ty, Type::tensor(2, Type::FLOAT));
/// ```
pub fn parse_type(token: &Token) -> ParseResult<Type> {
    if let Some(value) = token.as_value() {
        if value == "Any" {
            return Ok(Type::Any);
        }
        return ScalarKind::from_str(value)
            .map(Type::from)
            .map_err(|_| ParseError::type_parse("a type", token));
    }

    let Some(head) = token.head().and_then(Token::as_value) else {
        return Err(ParseError::type_parse("a type", token));
    };
    let args = token.tail();
    match head {
        "Tensor" => {
            let [dim, elem] = args else {
                return Err(ParseError::type_parse("(Tensor N Type)", token));
            };
            let dim = dim
                .as_value()
                .and_then(|dim| all_consuming(parse_integer)(dim).finish().ok())
                .and_then(|(_, dim)| usize::try_from(dim).ok())
                .filter(|&dim| dim >= 1)
                .ok_or_else(|| ParseError::type_parse("a tensor rank of at least 1", dim))?;
            Ok(Type::tensor(dim, parse_type(elem)?))
        }
        "Vec" => {
            let [elem] = args else {
                return Err(ParseError::type_parse("(Vec Type)", token));
            };
            Ok(Type::tensor(1, parse_type(elem)?))
        }
        "Tuple" => Ok(Type::tuple(
            args.iter().map(parse_type).collect::<ParseResult<Vec<_>>>()?,
        )),
        "Lam" | "LM" => {
            let [arg, ret] = args else {
                return Err(ParseError::type_parse(format!("({head} Type Type)"), token));
            };
            let (arg, ret) = (parse_type(arg)?, parse_type(ret)?);
            if head == "Lam" {
                Ok(Type::lam(arg, ret))
            } else {
                Ok(Type::lm(arg, ret))
            }
        }
        _ => Err(ParseError::type_parse("a type", token)),
    }
}

/// Parses a type from a sequence of tokens, such as what follows the `:` of a binder. A sequence
/// starting with a type constructor is parsed as if it were in parenthesis, so `Vec Float` is
/// the same type as `(Vec Float)`.
pub fn parse_relaxed_type(tokens: &[Token]) -> ParseResult<Type> {
    match tokens {
        [] => Err(ParseError::new(
            ErrorKind::TypeParse {
                expected: "a type".to_string(),
                found: "nothing".to_string(),
            },
            None,
        )),
        [single] => parse_type(single),
        [head, ..] if head.as_value().is_some_and(is_type_constructor) => {
            let wrapped = Token::list(head.span(), tokens.iter().cloned());
            parse_type(&wrapped)
        }
        [_, extra, ..] => Err(ParseError::type_parse("a single type", extra)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use test_log::test;

    fn parse(src: &str) -> ParseResult<Type> {
        let root = lex(src).unwrap();
        parse_type(root.child(0).unwrap())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse("Integer").unwrap(), Type::INTEGER);
        assert_eq!(parse("Bool").unwrap(), Type::BOOL);
        assert_eq!(parse("String").unwrap(), Type::STRING);
        assert_eq!(parse("Any").unwrap(), Type::Any);
        assert!(parse("integer").is_err());
    }

    #[test]
    fn test_compound_types() {
        assert_eq!(parse("(Tensor 2 Float)").unwrap(), Type::tensor(2, Type::FLOAT));
        assert_eq!(parse("(Vec Integer)").unwrap(), Type::tensor(1, Type::INTEGER));
        assert_eq!(
            parse("(Tuple Integer Float)").unwrap(),
            Type::tuple([Type::INTEGER, Type::FLOAT])
        );
        assert_eq!(
            parse("(LM (Vec Float) Float)").unwrap(),
            Type::lm(Type::tensor(1, Type::FLOAT), Type::FLOAT)
        );
        assert_eq!(parse("(Tuple)").unwrap(), Type::tuple([]));
    }

    #[test]
    fn test_bad_tensor_rank() {
        let error = parse("(Tensor x Float)").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::TypeParse { .. }));
        assert!(parse("(Tensor 0 Float)").is_err());
        assert!(parse("(Tensor 1)").is_err());
        for rank in ["+2", "-2", "2.0", "99999999999999999999"] {
            let error = parse(&format!("(Tensor {rank} Float)")).unwrap_err();
            assert!(matches!(error.kind(), ErrorKind::TypeParse { .. }), "{rank}");
        }
    }

    #[test]
    fn test_relaxed() {
        let root = lex("Tensor 1 Float").unwrap();
        assert_eq!(
            parse_relaxed_type(root.children()).unwrap(),
            Type::tensor(1, Type::FLOAT)
        );
        let root = lex("Float Integer").unwrap();
        assert!(parse_relaxed_type(root.children()).is_err());
        assert!(parse_relaxed_type(&[]).is_err());
    }
}
