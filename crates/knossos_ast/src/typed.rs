//! typing information traits

use crate::types::Type;

/// Gets the type of a node that is known syntactically, from literals and type annotations.
///
/// Returns [Type::Unknown] when only a type checker could tell.
pub trait Typed {
    /// Gets the type
    fn get_type(&self) -> Type;
}
