//! Name tables used while parsing

use indexmap::IndexMap;
use knossos_tokens::spanned::Span;
use tracing::trace;

/// A table of names. Whether an existing name can be set again is fixed when the table is made.
#[derive(Debug, Clone)]
pub struct Symbols<V> {
    reassign: bool,
    table: IndexMap<String, V>,
}

impl<V> Symbols<V> {
    /// Creates a new symbol table. When `reassign` is true setting an existing name replaces its
    /// value, otherwise the first value set is kept.
    pub fn new(reassign: bool) -> Self {
        Self {
            reassign,
            table: IndexMap::new(),
        }
    }

    /// Checks if a name is in this table
    pub fn exists(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Gets the value of a name
    pub fn get(&self, name: &str) -> Option<&V> {
        self.table.get(name)
    }

    /// Sets the value of a name, returning whether the table changed
    pub fn set(&mut self, name: impl Into<String>, value: V) -> bool {
        let name = name.into();
        if !self.reassign && self.table.contains_key(&name) {
            trace!("{name:?} is already set, keeping the first value");
            return false;
        }
        self.table.insert(name, value);
        true
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates over the names in the order they were first set
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.table.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// What the rule table remembers about a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEntry {
    pub span: Span,
}
