//! Builds expressions from tokens

use crate::parser::binding::{parse_binder, variable_name};
use crate::parser::context::ParseContext;
use crate::parser::error::{ErrorKind, ParseError, ParseResult};
use crate::parser::items::{parse_declaration, parse_definition, parse_rule};
use crate::parser::keyword::Keyword;
use knossos_ast::expr::{
    BuildExpr, CallExpr, CondExpr, Expr, FoldExpr, GetExpr, LambdaExpr, LetExpr, Literal,
    LiteralValue, TupleExpr, Variable,
};
use knossos_ast::types::Type;
use knossos_common::nom_helpers::{parse_boolean, parse_float, parse_integer, parse_string};
use knossos_tokens::spanned::Spanned;
use knossos_tokens::token::Token;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, map_res};
use nom::sequence::{preceded, separated_pair};
use nom::{Finish, IResult};
use tracing::trace;

/// Parses any token into an expression
pub fn parse_token(ctx: &mut ParseContext, token: &Token) -> ParseResult<Expr> {
    if let Some(value) = token.as_value() {
        return parse_value(ctx, token, value);
    }
    let Some(head) = token.head() else {
        return Err(ParseError::syntax("expression", "a non-empty list", token));
    };
    let Some(name) = head.as_value().filter(|name| !is_literal_shaped(name)) else {
        return Err(ParseError::new(
            ErrorKind::UnknownForm(head.to_string()),
            head.span(),
        ));
    };
    let keyword = Keyword::classify(name);
    trace!(
        "parsing {} on line {}",
        keyword.map_or("call", <&'static str>::from),
        token.line()
    );
    match keyword {
        Some(Keyword::Let) => parse_let(ctx, token).map(Expr::from),
        Some(Keyword::Edef) => parse_declaration(ctx, token).map(Expr::from),
        Some(Keyword::Def) => parse_definition(ctx, token).map(Expr::from),
        Some(Keyword::If) => parse_cond(ctx, token).map(Expr::from),
        Some(Keyword::Build) => parse_build(ctx, token).map(Expr::from),
        Some(Keyword::Tuple) => parse_tuple(ctx, token).map(Expr::from),
        Some(Keyword::Get) => parse_get(ctx, token).map(Expr::from),
        Some(Keyword::Fold) => parse_fold(ctx, token).map(Expr::from),
        Some(Keyword::Lam) => parse_lambda(ctx, token, Type::Unknown).map(Expr::from),
        Some(Keyword::Rule) => parse_rule(ctx, token).map(Expr::from),
        None => parse_call(ctx, name, token).map(Expr::from),
    }
}

/// A literal or a reference to a variable
fn parse_value(ctx: &ParseContext, token: &Token, value: &str) -> ParseResult<Expr> {
    if let Some(literal) = parse_literal(value) {
        return Ok(Literal::new(token.span(), literal).into());
    }
    if is_literal_shaped(value) {
        return Err(ParseError::syntax("literal", "a valid literal", token));
    }
    match ctx.resolve(value) {
        Some(binding) => Ok(Variable::reference(token.span(), value, binding).into()),
        None => Err(ParseError::new(
            ErrorKind::UnresolvedSymbol(value.to_string()),
            token.span(),
        )),
    }
}

/// Parses a value token with the shape of a literal
pub fn parse_literal(value: &str) -> Option<LiteralValue> {
    all_consuming(alt((
        map(parse_boolean, LiteralValue::Bool),
        map(parse_float, LiteralValue::Float),
        map(parse_integer, LiteralValue::Integer),
        map(parse_string, LiteralValue::String),
    )))(value)
    .finish()
    .ok()
    .map(|(_, literal)| literal)
}

/// Whether a value token looks like a literal, even one that can't be converted such as an
/// integer that overflows or a string with an unknown escape. These are never names.
pub fn is_literal_shaped(value: &str) -> bool {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some('"'), _) => true,
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('-' | '.'), Some(c)) if c.is_ascii_digit() => true,
        _ => parse_literal(value).is_some(),
    }
}

/// Checks the number of children of a form, the head included
fn expect_len<'t>(
    form: &'static str,
    token: &'t Token,
    len: usize,
    shape: &str,
) -> ParseResult<&'t [Token]> {
    if token.len() != len {
        return Err(ParseError::syntax(form, shape, token));
    }
    Ok(token.children())
}

/// `(let ((x e) ...) body)` or `(let (x e) body)`
fn parse_let(ctx: &mut ParseContext, token: &Token) -> ParseResult<LetExpr> {
    const SHAPE: &str = "(let ((name value) ...) body)";
    let [_, bindings, body] = expect_len("let", token, 3, SHAPE)? else {
        unreachable!("length was checked")
    };
    if bindings.is_value() {
        return Err(ParseError::syntax("let", SHAPE, bindings));
    }
    let pairs = match bindings.head() {
        Some(head) if head.is_value() => std::slice::from_ref(bindings),
        _ => bindings.children(),
    };

    let mut variables = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let [name, value] = pair.children() else {
            return Err(ParseError::syntax("let", "a binding (name value)", pair));
        };
        let name = variable_name("let", name)?;
        let value = parse_token(ctx, value)?;
        let variable = ctx.bind(name, Type::Unknown, pair.span()).with_init(value);
        variables.push(variable);
    }
    let body = parse_token(ctx, body)?;
    Ok(LetExpr::new(token.span(), variables, body))
}

/// `(if test then else)`
fn parse_cond(ctx: &mut ParseContext, token: &Token) -> ParseResult<CondExpr> {
    let [_, test, then_branch, else_branch] =
        expect_len("if", token, 4, "(if test then else)")?
    else {
        unreachable!("length was checked")
    };
    Ok(CondExpr::new(
        token.span(),
        parse_token(ctx, test)?,
        parse_token(ctx, then_branch)?,
        parse_token(ctx, else_branch)?,
    ))
}

/// `(build size (lam (i : Integer) body))` or `(build size (i : Integer) body)`
fn parse_build(ctx: &mut ParseContext, token: &Token) -> ParseResult<BuildExpr> {
    match token.children() {
        [_, size, lambda] => {
            let size = parse_token(ctx, size)?;
            if !is_form(lambda, "lam") {
                return Err(ParseError::syntax("build", "(lam (i : Integer) body)", lambda));
            }
            let lambda = parse_lambda(ctx, lambda, Type::INTEGER)?;
            Ok(BuildExpr::new(token.span(), size, lambda.var, *lambda.body))
        }
        [_, size, var, body] => {
            let size = parse_token(ctx, size)?;
            let var = parse_binder("build", var)?.bind(ctx, Type::INTEGER);
            let body = parse_token(ctx, body)?;
            Ok(BuildExpr::new(token.span(), size, var, body))
        }
        _ => Err(ParseError::syntax(
            "build",
            "(build size (lam (i : Integer) body))",
            token,
        )),
    }
}

/// `(tuple e ...)`
fn parse_tuple(ctx: &mut ParseContext, token: &Token) -> ParseResult<TupleExpr> {
    let elements = token
        .tail()
        .iter()
        .map(|element| parse_token(ctx, element))
        .collect::<ParseResult<Vec<_>>>()?;
    Ok(TupleExpr::new(token.span(), elements))
}

fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

/// Parses the `i` and `n` out of `get$i$n`
fn get_indices(input: &str) -> IResult<&str, (usize, usize)> {
    preceded(tag("get$"), separated_pair(index, char('$'), index))(input)
}

/// `(get$i$n tuple)`
fn parse_get(ctx: &mut ParseContext, token: &Token) -> ParseResult<GetExpr> {
    const SHAPE: &str = "get$i$n with 1 <= i <= n";
    let (index, arity) = token
        .head()
        .and_then(Token::as_value)
        .and_then(|name| all_consuming(get_indices)(name).finish().ok())
        .map(|(_, indices)| indices)
        .filter(|&(index, arity)| 1 <= index && index <= arity)
        .ok_or_else(|| ParseError::syntax("get", SHAPE, token))?;
    let [_, tuple] = token.children() else {
        return Err(ParseError::syntax("get", "exactly one operand", token));
    };
    Ok(GetExpr::new(
        token.span(),
        index,
        arity,
        parse_token(ctx, tuple)?,
    ))
}

/// `(fold (lam (acc_x : T) body) init sequence)`
fn parse_fold(ctx: &mut ParseContext, token: &Token) -> ParseResult<FoldExpr> {
    let [_, lambda, init, sequence] = expect_len(
        "fold",
        token,
        4,
        "(fold (lam (acc_x : Type) body) init sequence)",
    )?
    else {
        unreachable!("length was checked")
    };
    if !is_form(lambda, "lam") {
        return Err(ParseError::syntax("fold", "(lam (acc_x : Type) body)", lambda));
    }
    let lambda = parse_lambda(ctx, lambda, Type::Unknown)?;
    let init = parse_token(ctx, init)?;
    let sequence = parse_token(ctx, sequence)?;
    Ok(FoldExpr::new(token.span(), lambda, init, sequence))
}

/// `(lam (v : T) body)`, where `v` has the `default` type if none is given
fn parse_lambda(ctx: &mut ParseContext, token: &Token, default: Type) -> ParseResult<LambdaExpr> {
    let [_, var, body] = expect_len("lam", token, 3, "(lam (name : Type) body)")? else {
        unreachable!("length was checked")
    };
    let var = parse_binder("lam", var)?.bind(ctx, default);
    let body = parse_token(ctx, body)?;
    Ok(LambdaExpr::new(token.span(), var, body))
}

/// `(f args ...)`
fn parse_call(ctx: &mut ParseContext, callee: &str, token: &Token) -> ParseResult<CallExpr> {
    let args = token
        .tail()
        .iter()
        .map(|arg| parse_token(ctx, arg))
        .collect::<ParseResult<Vec<_>>>()?;
    Ok(CallExpr::new(token.span(), callee, args))
}

/// Whether a token is a list headed by `keyword`
fn is_form(token: &Token, keyword: &str) -> bool {
    token.head().and_then(Token::as_value) == Some(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use test_log::test;

    fn parse_with(ctx: &mut ParseContext, src: &str) -> ParseResult<Expr> {
        let root = lex(src).unwrap();
        parse_token(ctx, root.child(0).unwrap())
    }

    fn parse(src: &str) -> ParseResult<Expr> {
        parse_with(&mut ParseContext::default(), src)
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_literal("true"), Some(LiteralValue::Bool(true)));
        assert_eq!(parse_literal("-3"), Some(LiteralValue::Integer(-3)));
        assert_eq!(parse_literal("2.5"), Some(LiteralValue::Float(2.5)));
        assert_eq!(
            parse_literal("\"hi there\""),
            Some(LiteralValue::String("hi there".to_string()))
        );
        assert_eq!(parse_literal("x"), None);
        assert_eq!(parse_literal("true_x"), None);
    }

    #[test]
    fn test_bad_literals_are_syntax_errors() {
        for src in ["99999999999999999999", "\"a\\q\"", "1x", "-2.5.1"] {
            let error = parse(src).unwrap_err();
            assert!(
                matches!(error.kind(), ErrorKind::Syntax { form: "literal", .. }),
                "{src}: {error}"
            );
        }
        let error = parse("(99999999999999999999 1)").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnknownForm(_)));
        assert!(is_literal_shaped("-1"));
        assert!(!is_literal_shaped("-"));
        assert!(!is_literal_shaped("x1"));
    }

    #[test]
    fn test_literals_are_not_variable_names() {
        for src in [
            "(let ((1 2)) 1)",
            "(let (true 2) 1)",
            "(lam (2.0 : Float) 1)",
            "(build 3 (\"i\") 1)",
            "(let ((99999999999999999999 2)) 1)",
        ] {
            let error = parse(src).unwrap_err();
            assert!(
                matches!(error.kind(), ErrorKind::Syntax { expected, .. } if expected == "a variable name"),
                "{src}: {error}"
            );
        }
    }

    #[test]
    fn test_call() {
        let expr = parse("(add 1 2.0)").unwrap();
        let Expr::Call(call) = &expr else {
            panic!("expected a call, got {expr}");
        };
        assert_eq!(call.callee, "add");
        assert_eq!(call.args.len(), 2);
        assert_eq!(expr.to_string(), "(add 1 2.0)");
    }

    #[test]
    fn test_let_shapes() {
        let single = parse("(let (x 1) x)").unwrap();
        let many = parse("(let ((x 1) (y x)) (add x y))").unwrap();
        assert_eq!(single.to_string(), "(let ((x 1)) x)");
        assert_eq!(many.to_string(), "(let ((x 1) (y x)) (add x y))");
        assert!(parse("(let ((x 1)) x y)").is_err());
    }

    #[test]
    fn test_let_value_cannot_see_its_own_name() {
        let error = parse("(let ((x x)) x)").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnresolvedSymbol(name) if name == "x"));
    }

    #[test]
    fn test_if_needs_three_operands() {
        assert!(parse("(if true 1 2)").is_ok());
        let error = parse("(if true 1)").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::Syntax { form: "if", .. }));
    }

    #[test]
    fn test_build_forms() {
        let lam = parse("(build 10 (lam (i : Integer) (mul i 2)))").unwrap();
        let binder = parse("(build 10 (i) (mul i 2))").unwrap();
        assert_eq!(lam.to_string(), binder.to_string());
        let Expr::Build(build) = binder else {
            panic!("expected build")
        };
        assert_eq!(build.var.ty, Type::INTEGER);
        assert!(parse("(build 10 (i) )").is_err());
    }

    #[test]
    fn test_get() {
        let expr = parse("(get$2$3 (tuple 1 2 3))").unwrap();
        let Expr::Get(get) = &expr else {
            panic!("expected get, got {expr}");
        };
        assert_eq!((get.index, get.arity), (2, 3));
        assert!(parse("(get$4$3 (tuple 1 2 3))").is_err());
        assert!(parse("(get$0$3 (tuple 1 2 3))").is_err());
        assert!(parse("(get$x$3 (tuple 1 2 3))").is_err());
        assert!(parse("(get$1$2 (tuple 1 2) (tuple 3 4))").is_err());
    }

    #[test]
    fn test_fold_binds_accumulator() {
        let expr = parse("(fold (lam (acc_x : (Tuple Float Float)) (get$1$2 acc_x)) 0.0 (tuple))")
            .unwrap();
        let Expr::Fold(fold) = expr else {
            panic!("expected fold")
        };
        assert_eq!(
            fold.lambda.var.ty,
            Type::tuple([Type::FLOAT, Type::FLOAT])
        );
        assert!(parse("(fold (add 1 2) 0.0 (tuple))").is_err());
    }

    #[test]
    fn test_lambda_type() {
        let expr = parse("(lam (x : Float) x)").unwrap();
        assert_eq!(expr.to_string(), "(lam (x : Float) x)");
    }

    #[test]
    fn test_unknown_forms() {
        let error = parse("((f) 1)").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnknownForm(_)));
        let error = parse("(1 2)").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnknownForm(_)));
        let error = parse("()").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::Syntax { .. }));
    }

    #[test]
    fn test_unresolved_symbol() {
        let error = parse("y").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnresolvedSymbol(name) if name == "y"));
        assert_eq!(error.line(), Some(1));
    }

    #[test]
    fn test_variables_stay_bound() {
        let mut ctx = ParseContext::default();
        parse_with(&mut ctx, "(let ((x 1)) x)").unwrap();
        assert!(parse_with(&mut ctx, "x").is_ok());
    }
}
