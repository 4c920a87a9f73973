//! Function signatures

use crate::types::Type;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// A function name along with its ordered parameter types. Functions are overloaded by their
/// full parameter types, not just their arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: String,
    pub param_types: Vec<Type>,
}

impl Signature {
    /// Creates a new signature
    pub fn new(name: impl Into<String>, param_types: impl IntoIterator<Item = Type>) -> Self {
        Self {
            name: name.into(),
            param_types: param_types.into_iter().collect(),
        }
    }

    /// The number of parameters
    pub fn arity(&self) -> usize {
        self.param_types.len()
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.param_types.iter().join(", "))
    }
}
