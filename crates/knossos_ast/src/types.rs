//! Structural types, as written in type annotations

use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// The scalar types
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum ScalarKind {
    Bool,
    Integer,
    Float,
    String,
}

/// A type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Type {
    /// Not known at parse time, left for the type checker
    #[default]
    Unknown,
    /// Accepts a value of any type, only meaningful in rule templates
    Any,
    Scalar(ScalarKind),
    /// `(Tensor N T)`, a tensor of dimension `N >= 1`
    Tensor(usize, Box<Type>),
    /// `(Tuple T1 .. Tn)`
    Tuple(Vec<Type>),
    /// `(Lam S T)`, a function from `S` to `T`
    Lam(Box<Type>, Box<Type>),
    /// `(LM S T)`, a linear map from `S` to `T`
    LM(Box<Type>, Box<Type>),
}

impl Type {
    pub const BOOL: Type = Type::Scalar(ScalarKind::Bool);
    pub const INTEGER: Type = Type::Scalar(ScalarKind::Integer);
    pub const FLOAT: Type = Type::Scalar(ScalarKind::Float);
    pub const STRING: Type = Type::Scalar(ScalarKind::String);

    /// Creates a tensor type
    pub fn tensor(dim: usize, elem: Type) -> Self {
        Self::Tensor(dim, Box::new(elem))
    }

    /// Creates a tuple type
    pub fn tuple(elems: impl IntoIterator<Item = Type>) -> Self {
        Self::Tuple(elems.into_iter().collect())
    }

    /// Creates a lambda type
    pub fn lam(arg: Type, ret: Type) -> Self {
        Self::Lam(Box::new(arg), Box::new(ret))
    }

    /// Creates a linear map type
    pub fn lm(arg: Type, ret: Type) -> Self {
        Self::LM(Box::new(arg), Box::new(ret))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Scalar(_))
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, Type::Tensor(..))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Type::Tuple(_))
    }

    pub fn is_lam_or_lm(&self) -> bool {
        matches!(self, Type::Lam(..) | Type::LM(..))
    }

    /// Whether this type is fully resolved, i.e. it contains no [Type::Unknown]
    pub fn is_known(&self) -> bool {
        match self {
            Type::Unknown => false,
            Type::Any | Type::Scalar(_) => true,
            Type::Tensor(_, elem) => elem.is_known(),
            Type::Tuple(elems) => elems.iter().all(Type::is_known),
            Type::Lam(arg, ret) | Type::LM(arg, ret) => arg.is_known() && ret.is_known(),
        }
    }

    /// Whether [Type::Any] appears anywhere in this type
    pub fn contains_any(&self) -> bool {
        match self {
            Type::Any => true,
            Type::Unknown | Type::Scalar(_) => false,
            Type::Tensor(_, elem) => elem.contains_any(),
            Type::Tuple(elems) => elems.iter().any(Type::contains_any),
            Type::Lam(arg, ret) | Type::LM(arg, ret) => arg.contains_any() || ret.contains_any(),
        }
    }

    /// The dimension of a tensor type
    pub fn tensor_rank(&self) -> Option<usize> {
        match self {
            Type::Tensor(dim, _) => Some(*dim),
            _ => None,
        }
    }

    /// The element type of a tensor type
    pub fn tensor_elem(&self) -> Option<&Type> {
        match self {
            Type::Tensor(_, elem) => Some(elem),
            _ => None,
        }
    }

    /// The elements of a tuple type
    pub fn tuple_elems(&self) -> Option<&[Type]> {
        match self {
            Type::Tuple(elems) => Some(elems),
            _ => None,
        }
    }
}

impl From<ScalarKind> for Type {
    fn from(value: ScalarKind) -> Self {
        Type::Scalar(value)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Unknown => write!(f, "Unknown"),
            Type::Any => write!(f, "Any"),
            Type::Scalar(kind) => write!(f, "{kind}"),
            Type::Tensor(dim, elem) => write!(f, "(Tensor {dim} {elem})"),
            Type::Tuple(elems) if elems.is_empty() => write!(f, "(Tuple)"),
            Type::Tuple(elems) => write!(f, "(Tuple {})", elems.iter().join(" ")),
            Type::Lam(arg, ret) => write!(f, "(Lam {arg} {ret})"),
            Type::LM(arg, ret) => write!(f, "(LM {arg} {ret})"),
        }
    }
}
