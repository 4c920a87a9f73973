//! The registry of function signatures declared and defined in a module

use crate::parser::error::{ErrorKind, ParseError, ParseResult};
use indexmap::IndexMap;
use knossos_ast::signature::Signature;
use knossos_ast::types::Type;
use knossos_tokens::spanned::Span;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// How a function came to be known
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FunctionKind {
    /// by an `edef`
    Declared,
    /// by a `def`
    Defined,
}

/// A registered function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    pub kind: FunctionKind,
    pub return_type: Type,
    pub span: Span,
}

/// Functions by signature, in the order they were registered. Functions may be overloaded on
/// their parameter types.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    entries: IndexMap<Signature, FunctionEntry>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declaration. Returns false and keeps the earlier entry if the signature is
    /// already known.
    pub fn declare(&mut self, signature: Signature, return_type: Type, span: Span) -> bool {
        if self.entries.contains_key(&signature) {
            debug!("{signature} is already registered, ignoring declaration");
            return false;
        }
        debug!("declared {signature} -> {return_type}");
        self.entries.insert(
            signature,
            FunctionEntry {
                kind: FunctionKind::Declared,
                return_type,
                span,
            },
        );
        true
    }

    /// Registers a definition. A signature can only be defined once, but a declared signature
    /// becomes defined.
    pub fn define(&mut self, signature: Signature, return_type: Type, span: Span) -> ParseResult {
        if let Some(previous) = self.entries.get_mut(&signature) {
            if previous.kind == FunctionKind::Defined {
                return Err(ParseError::new(
                    ErrorKind::DuplicateDefinition {
                        signature,
                        previous_line: previous.span.line(),
                    },
                    span,
                ));
            }
            debug!("defining previously declared {signature}");
            *previous = FunctionEntry {
                kind: FunctionKind::Defined,
                return_type,
                span,
            };
            return Ok(());
        }
        debug!("defined {signature} -> {return_type}");
        self.entries.insert(
            signature,
            FunctionEntry {
                kind: FunctionKind::Defined,
                return_type,
                span,
            },
        );
        Ok(())
    }

    pub fn get(&self, signature: &Signature) -> Option<&FunctionEntry> {
        self.entries.get(signature)
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.entries.contains_key(signature)
    }

    /// All of the functions with a name, in the order they were registered
    pub fn overloads<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a Signature, &'a FunctionEntry)> + 'a {
        self.entries
            .iter()
            .filter(move |(signature, _)| signature.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &FunctionEntry)> {
        self.entries.iter()
    }
}

impl Display for SignatureRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (signature, entry) in &self.entries {
            writeln!(
                f,
                "{signature} -> {} ({}, line {})",
                entry.return_type,
                entry.kind,
                entry.span.line()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn sig(name: &str, params: impl IntoIterator<Item = Type>) -> Signature {
        Signature::new(name, params)
    }

    #[test]
    fn test_overloads() {
        let mut registry = SignatureRegistry::new();
        assert!(registry.declare(sig("f", [Type::INTEGER]), Type::FLOAT, Span::new(1, 1)));
        assert!(registry.declare(sig("f", [Type::FLOAT]), Type::FLOAT, Span::new(2, 1)));
        assert!(registry.declare(sig("g", []), Type::FLOAT, Span::new(3, 1)));
        assert_eq!(registry.overloads("f").count(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut registry = SignatureRegistry::new();
        registry.declare(sig("f", []), Type::FLOAT, Span::new(1, 1));
        assert!(!registry.declare(sig("f", []), Type::INTEGER, Span::new(2, 1)));
        assert_eq!(registry.get(&sig("f", [])).unwrap().return_type, Type::FLOAT);
    }

    #[test]
    fn test_define_upgrades_declaration() {
        let mut registry = SignatureRegistry::new();
        registry.declare(sig("f", [Type::INTEGER]), Type::FLOAT, Span::new(1, 1));
        registry
            .define(sig("f", [Type::INTEGER]), Type::FLOAT, Span::new(2, 1))
            .unwrap();
        let entry = registry.get(&sig("f", [Type::INTEGER])).unwrap();
        assert_eq!(entry.kind, FunctionKind::Defined);
        assert_eq!(entry.span.line(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_definition() {
        let mut registry = SignatureRegistry::new();
        registry
            .define(sig("f", [Type::INTEGER]), Type::FLOAT, Span::new(1, 1))
            .unwrap();
        let error = registry
            .define(sig("f", [Type::INTEGER]), Type::FLOAT, Span::new(4, 1))
            .unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::DuplicateDefinition { previous_line: 1, .. }
        ));
        assert_eq!(error.line(), Some(4));
    }
}
