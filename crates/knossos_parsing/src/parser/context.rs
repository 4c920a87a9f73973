use crate::parser::signatures::SignatureRegistry;
use crate::parser::symbols::{RuleEntry, Symbols};
use knossos_ast::expr::{BindingId, Variable};
use knossos_ast::types::Type;
use knossos_tokens::spanned::Span;
use tracing::trace;

/// The mutable state of a single parse
#[derive(Debug)]
pub struct ParseContext {
    /// the most recent binding of every variable name seen so far
    pub variables: Symbols<BindingId>,
    pub rules: Symbols<RuleEntry>,
    pub signatures: SignatureRegistry,
    next_binding: u32,
}

impl ParseContext {
    pub fn new(rules: Symbols<RuleEntry>, signatures: SignatureRegistry) -> Self {
        Self {
            variables: Symbols::new(true),
            rules,
            signatures,
            next_binding: 0,
        }
    }

    /// Binds a name to a fresh binding, shadowing any earlier binding of the same name
    pub fn bind(&mut self, name: &str, ty: Type, span: Span) -> Variable {
        let binding = BindingId::new(self.next_binding);
        self.next_binding += 1;
        trace!("binding {name} to {binding}");
        self.variables.set(name, binding);
        Variable::binder(span, name, ty, binding)
    }

    /// Resolves a name to its most recent binding
    pub fn resolve(&self, name: &str) -> Option<BindingId> {
        self.variables.get(name).copied()
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(Symbols::new(false), SignatureRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing() {
        let mut ctx = ParseContext::default();
        let outer = ctx.bind("x", Type::INTEGER, Span::start());
        let inner = ctx.bind("x", Type::FLOAT, Span::start());
        assert_ne!(outer.binding, inner.binding);
        assert_eq!(ctx.resolve("x"), Some(inner.binding));
        assert_eq!(ctx.resolve("y"), None);
    }
}
