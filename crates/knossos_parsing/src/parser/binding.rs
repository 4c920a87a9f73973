//! Binders, the `(x : Type)` that introduce variables

use crate::parser::context::ParseContext;
use crate::parser::error::{ParseError, ParseResult};
use crate::parser::expr::is_literal_shaped;
use crate::parser::types::parse_relaxed_type;
use knossos_ast::expr::Variable;
use knossos_ast::types::Type;
use knossos_tokens::spanned::{Span, Spanned};
use knossos_tokens::token::Token;

/// A parsed but not yet bound binder
#[derive(Debug)]
pub struct Binder<'t> {
    pub name: &'t str,
    pub ty: Option<Type>,
    pub span: Span,
}

impl Binder<'_> {
    /// Binds this binder in the context, using `default` if no type was given
    pub fn bind(self, ctx: &mut ParseContext, default: Type) -> Variable {
        ctx.bind(self.name, self.ty.unwrap_or(default), self.span)
    }
}

/// The name a binder introduces, which can't be a literal
pub fn variable_name<'t>(form: &'static str, token: &'t Token) -> ParseResult<&'t str> {
    token
        .as_value()
        .filter(|name| !is_literal_shaped(name))
        .ok_or_else(|| ParseError::syntax(form, "a variable name", token))
}

/// Parses `x`, `(x)` or `(x : Type)`
pub fn parse_binder<'t>(form: &'static str, token: &'t Token) -> ParseResult<Binder<'t>> {
    if token.is_value() {
        return Ok(Binder {
            name: variable_name(form, token)?,
            ty: None,
            span: token.span(),
        });
    }
    match token.children() {
        [name] => Ok(Binder {
            name: variable_name(form, name)?,
            ty: None,
            span: token.span(),
        }),
        [name, colon, ty @ ..] if colon.as_value() == Some(":") && !ty.is_empty() => Ok(Binder {
            name: variable_name(form, name)?,
            ty: Some(parse_relaxed_type(ty)?),
            span: token.span(),
        }),
        _ => Err(ParseError::syntax(form, "a binder (name : Type)", token)),
    }
}

/// Parses a parameter list, `()`, `(x : Type)` or `((x : Type) ...)`
pub fn parse_binders<'t>(form: &'static str, token: &'t Token) -> ParseResult<Vec<Binder<'t>>> {
    if token.is_value() {
        return Err(ParseError::syntax(form, "a list of binders", token));
    }
    match token.head() {
        None => Ok(vec![]),
        Some(head) if head.is_value() => Ok(vec![parse_binder(form, token)?]),
        Some(_) => token
            .children()
            .iter()
            .map(|child| parse_binder(form, child))
            .collect(),
    }
}
