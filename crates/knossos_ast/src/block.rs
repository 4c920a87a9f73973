use crate::expr::Expr;
use knossos_tokens::spanned::{Span, Spanned};
use std::fmt::{Display, Formatter};

/// A block of statements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    span: Span,
    statements: Vec<Expr>,
}

impl Block {
    pub fn new(span: Span, statements: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            span,
            statements: statements.into_iter().collect(),
        }
    }

    /// Creates a new empty block
    pub const fn empty(span: Span) -> Self {
        Self {
            span,
            statements: vec![],
        }
    }

    /// Appends a statement to this block
    pub fn push(&mut self, statement: impl Into<Expr>) {
        self.statements.push(statement.into())
    }

    pub fn statements(&self) -> &[Expr] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<Expr> {
        self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.statements.iter()
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Expr;
    type IntoIter = std::slice::Iter<'a, Expr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, statement) in self.statements.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
