//! The forms found at the top of a module

use crate::parser::binding::parse_binders;
use crate::parser::context::ParseContext;
use crate::parser::error::{ErrorKind, ParseError, ParseResult};
use crate::parser::expr::parse_token;
use crate::parser::symbols::RuleEntry;
use crate::parser::types::{is_type_constructor, parse_type};
use knossos_ast::block::Block;
use knossos_ast::expr::{Declaration, Definition, Rule};
use knossos_ast::signature::Signature;
use knossos_ast::types::Type;
use knossos_common::nom_helpers::parse_string;
use knossos_tokens::spanned::Spanned;
use knossos_tokens::token::Token;
use nom::combinator::all_consuming;
use nom::Finish;
use tracing::debug;

/// Parses every child of the root token, in order
pub fn parse_block(ctx: &mut ParseContext, root: &Token) -> ParseResult<Block> {
    let statements = root
        .children()
        .iter()
        .map(|child| parse_token(ctx, child))
        .collect::<ParseResult<Vec<_>>>()?;
    Ok(Block::new(root.span(), statements))
}

fn function_name<'t>(form: &'static str, token: &'t Token) -> ParseResult<&'t str> {
    token
        .as_value()
        .ok_or_else(|| ParseError::syntax(form, "a function name", token))
}

/// `(edef name Ret (T ...))`
pub fn parse_declaration(ctx: &mut ParseContext, token: &Token) -> ParseResult<Declaration> {
    let [_, name, ret, params] = token.children() else {
        return Err(ParseError::syntax(
            "edef",
            "(edef name ReturnType (ParamType ...))",
            token,
        ));
    };
    let name = function_name("edef", name)?;
    let return_type = parse_type(ret)?;
    let param_types = parse_param_types(params)?;
    let signature = Signature::new(name, param_types);
    ctx.signatures
        .declare(signature.clone(), return_type.clone(), token.span());
    Ok(Declaration::new(token.span(), signature, return_type))
}

/// The parameter types of a declaration are either a single type or a list of types
fn parse_param_types(params: &Token) -> ParseResult<Vec<Type>> {
    let single = params.is_value()
        || params
            .head()
            .and_then(Token::as_value)
            .is_some_and(is_type_constructor);
    if single {
        Ok(vec![parse_type(params)?])
    } else {
        params.children().iter().map(parse_type).collect()
    }
}

/// `(def name Ret ((x : T) ...) body)`
pub fn parse_definition(ctx: &mut ParseContext, token: &Token) -> ParseResult<Definition> {
    let [_, name, ret, params, body] = token.children() else {
        return Err(ParseError::syntax(
            "def",
            "(def name ReturnType ((param : Type) ...) body)",
            token,
        ));
    };
    let name = function_name("def", name)?;
    let return_type = parse_type(ret)?;

    let binders = parse_binders("def", params)?;
    if let Some(untyped) = binders.iter().find(|binder| binder.ty.is_none()) {
        return Err(ParseError::new(
            ErrorKind::Syntax {
                form: "def",
                expected: "a typed parameter (name : Type)".to_string(),
                found: untyped.name.to_string(),
            },
            untyped.span,
        ));
    }
    let params = binders
        .into_iter()
        .map(|binder| binder.bind(ctx, Type::Unknown))
        .collect::<Vec<_>>();
    let signature = Signature::new(name, params.iter().map(|param| param.ty.clone()));
    // registered before the body so the body can call itself
    ctx.signatures
        .define(signature, return_type.clone(), token.span())?;

    let body = parse_token(ctx, body)?;
    Ok(Definition::new(token.span(), name, return_type, params, body))
}

/// `(rule "name" ((x : T) ...) pattern replacement)`, the variables can be left out
pub fn parse_rule(ctx: &mut ParseContext, token: &Token) -> ParseResult<Rule> {
    let (name, vars, pattern, replacement) = match token.children() {
        [_, name, pattern, replacement] => (name, None, pattern, replacement),
        [_, name, vars, pattern, replacement] => (name, Some(vars), pattern, replacement),
        _ => {
            return Err(ParseError::syntax(
                "rule",
                "(rule \"name\" ((var : Type) ...) pattern replacement)",
                token,
            ))
        }
    };
    let name = rule_name(name)?;
    if !ctx.rules.set(name.clone(), RuleEntry { span: token.span() }) {
        debug!("rule {name:?} is already registered, keeping the first");
    } else {
        debug!("registered rule {name:?}");
    }

    let vars = match vars {
        Some(vars) => parse_binders("rule", vars)?
            .into_iter()
            .map(|binder| binder.bind(ctx, Type::Unknown))
            .collect(),
        None => vec![],
    };
    let pattern = parse_token(ctx, pattern)?;
    let replacement = parse_token(ctx, replacement)?;
    Ok(Rule::new(token.span(), name, vars, pattern, replacement))
}

/// Rule names may be quoted
fn rule_name(token: &Token) -> ParseResult<String> {
    let Some(name) = token.as_value() else {
        return Err(ParseError::syntax("rule", "a rule name", token));
    };
    if !name.starts_with('"') {
        return Ok(name.to_string());
    }
    all_consuming(parse_string)(name)
        .finish()
        .map(|(_, name)| name)
        .map_err(|_| ParseError::syntax("rule", "a rule name", token))
}
