//! Expressions

use crate::block::Block;
use crate::signature::Signature;
use crate::types::Type;
use crate::typed::Typed;
use derive_more::From;
use itertools::Itertools;
use knossos_tokens::spanned::{Span, Spanned};
use std::fmt::{Display, Formatter};

/// An expression
#[derive(Debug, Clone, PartialEq, From)]
pub enum Expr {
    Literal(Literal),
    Variable(Variable),
    Call(CallExpr),
    Let(LetExpr),
    Declaration(Declaration),
    Definition(Definition),
    Condition(CondExpr),
    Build(BuildExpr),
    Tuple(TupleExpr),
    Get(GetExpr),
    Fold(FoldExpr),
    Lambda(LambdaExpr),
    Rule(Rule),
    Block(Block),
}

impl Expr {
    /// A short name for the kind of this expression
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Variable(_) => "variable",
            Expr::Call(_) => "call",
            Expr::Let(_) => "let",
            Expr::Declaration(_) => "edef",
            Expr::Definition(_) => "def",
            Expr::Condition(_) => "if",
            Expr::Build(_) => "build",
            Expr::Tuple(_) => "tuple",
            Expr::Get(_) => "get",
            Expr::Fold(_) => "fold",
            Expr::Lambda(_) => "lam",
            Expr::Rule(_) => "rule",
            Expr::Block(_) => "block",
        }
    }
}

macro_rules! delegate {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            Expr::Literal($inner) => $body,
            Expr::Variable($inner) => $body,
            Expr::Call($inner) => $body,
            Expr::Let($inner) => $body,
            Expr::Declaration($inner) => $body,
            Expr::Definition($inner) => $body,
            Expr::Condition($inner) => $body,
            Expr::Build($inner) => $body,
            Expr::Tuple($inner) => $body,
            Expr::Get($inner) => $body,
            Expr::Fold($inner) => $body,
            Expr::Lambda($inner) => $body,
            Expr::Rule($inner) => $body,
            Expr::Block($inner) => $body,
        }
    };
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        delegate!(self, inner => inner.span())
    }
}

impl Typed for Expr {
    fn get_type(&self) -> Type {
        match self {
            Expr::Literal(literal) => literal.get_type(),
            Expr::Variable(variable) => variable.get_type(),
            Expr::Declaration(decl) => decl.get_type(),
            Expr::Definition(def) => def.get_type(),
            Expr::Lambda(lambda) => lambda.get_type(),
            _ => Type::Unknown,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        delegate!(self, inner => Display::fmt(inner, f))
    }
}

macro_rules! spanned {
    ($($ty:ty),* $(,)?) => {
        $(
        impl Spanned for $ty {
            fn span(&self) -> Span {
                self.span
            }
        }
        )*
    };
}

spanned!(
    Literal,
    Variable,
    CallExpr,
    LetExpr,
    Declaration,
    Definition,
    CondExpr,
    BuildExpr,
    TupleExpr,
    GetExpr,
    FoldExpr,
    LambdaExpr,
    Rule,
);

/// The value of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A literal constant
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub span: Span,
    pub value: LiteralValue,
}

impl Literal {
    pub fn new(span: Span, value: LiteralValue) -> Self {
        Self { span, value }
    }
}

impl Typed for Literal {
    fn get_type(&self) -> Type {
        match self.value {
            LiteralValue::Bool(_) => Type::BOOL,
            LiteralValue::Integer(_) => Type::INTEGER,
            LiteralValue::Float(_) => Type::FLOAT,
            LiteralValue::String(_) => Type::STRING,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Integer(i) => write!(f, "{i}"),
            LiteralValue::Float(v) => write!(f, "{v:?}"),
            LiteralValue::String(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\r' => write!(f, "\\r")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

/// Identifies the binder a variable refers to. Every let binding, parameter and lambda variable
/// gets a fresh id while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u32);

impl BindingId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl Display for BindingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A variable, either where it is bound or where it is referenced
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub span: Span,
    pub name: String,
    pub ty: Type,
    pub binding: BindingId,
    pub init: Option<Box<Expr>>,
    reference: bool,
}

impl Variable {
    /// Creates the binder of a variable
    pub fn binder(span: Span, name: impl Into<String>, ty: Type, binding: BindingId) -> Self {
        Self {
            span,
            name: name.into(),
            ty,
            binding,
            init: None,
            reference: false,
        }
    }

    /// Creates a reference to an already bound variable
    pub fn reference(span: Span, name: impl Into<String>, binding: BindingId) -> Self {
        Self {
            span,
            name: name.into(),
            ty: Type::Unknown,
            binding,
            init: None,
            reference: true,
        }
    }

    /// Sets the value this variable is bound to
    pub fn with_init(mut self, init: Expr) -> Self {
        self.init = Some(Box::new(init));
        self
    }

    /// Whether this is a reference to a variable bound elsewhere
    pub fn is_reference(&self) -> bool {
        self.reference
    }

    /// Displays this variable as a typed binder, `(name : Type)`
    pub fn display_typed(&self) -> String {
        format!("({} : {})", self.name, self.ty)
    }
}

impl Typed for Variable {
    fn get_type(&self) -> Type {
        match (&self.ty, &self.init) {
            (Type::Unknown, Some(init)) => init.get_type(),
            (ty, _) => ty.clone(),
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.init {
            Some(init) if !self.reference => write!(f, "({} {init})", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// A call to a function
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub span: Span,
    pub callee: String,
    pub args: Vec<Expr>,
}

impl CallExpr {
    pub fn new(span: Span, callee: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            span,
            callee: callee.into(),
            args: args.into_iter().collect(),
        }
    }
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.callee)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, ")")
    }
}

/// `(let ((x e) ...) body)`
#[derive(Debug, Clone, PartialEq)]
pub struct LetExpr {
    pub span: Span,
    pub bindings: Vec<Variable>,
    pub body: Box<Expr>,
}

impl LetExpr {
    pub fn new(span: Span, bindings: impl IntoIterator<Item = Variable>, body: Expr) -> Self {
        Self {
            span,
            bindings: bindings.into_iter().collect(),
            body: Box::new(body),
        }
    }
}

impl Display for LetExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(let ({}) {})", self.bindings.iter().join(" "), self.body)
    }
}

/// An externally defined function, `(edef name Ret (T ...))`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub span: Span,
    pub signature: Signature,
    pub return_type: Type,
}

impl Declaration {
    pub fn new(span: Span, signature: Signature, return_type: Type) -> Self {
        Self {
            span,
            signature,
            return_type,
        }
    }
}

impl Typed for Declaration {
    fn get_type(&self) -> Type {
        self.return_type.clone()
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(edef {} {} ({}))",
            self.signature.name,
            self.return_type,
            self.signature.param_types.iter().join(" ")
        )
    }
}

/// A function definition, `(def name Ret ((x : T) ...) body)`
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub span: Span,
    pub signature: Signature,
    pub return_type: Type,
    pub params: Vec<Variable>,
    pub body: Box<Expr>,
}

impl Definition {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        return_type: Type,
        params: impl IntoIterator<Item = Variable>,
        body: Expr,
    ) -> Self {
        let params = params.into_iter().collect::<Vec<_>>();
        let signature = Signature::new(name, params.iter().map(|param| param.ty.clone()));
        Self {
            span,
            signature,
            return_type,
            params,
            body: Box::new(body),
        }
    }

    /// The names of the parameters, in order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|param| param.name.as_str())
    }
}

impl Typed for Definition {
    fn get_type(&self) -> Type {
        self.return_type.clone()
    }
}

impl Display for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(def {} {} ({}) {})",
            self.signature.name,
            self.return_type,
            self.params.iter().map(Variable::display_typed).join(" "),
            self.body
        )
    }
}

/// `(if test then else)`
#[derive(Debug, Clone, PartialEq)]
pub struct CondExpr {
    pub span: Span,
    pub test: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
}

impl CondExpr {
    pub fn new(span: Span, test: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Self {
            span,
            test: Box::new(test),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }
}

impl Display for CondExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(if {} {} {})", self.test, self.then_branch, self.else_branch)
    }
}

/// `(build size (lam (i : Integer) body))`, builds a tensor by evaluating `body` for every index
/// up to `size`
#[derive(Debug, Clone, PartialEq)]
pub struct BuildExpr {
    pub span: Span,
    pub size: Box<Expr>,
    pub var: Variable,
    pub body: Box<Expr>,
}

impl BuildExpr {
    pub fn new(span: Span, size: Expr, var: Variable, body: Expr) -> Self {
        Self {
            span,
            size: Box::new(size),
            var,
            body: Box::new(body),
        }
    }
}

impl Display for BuildExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(build {} (lam {} {}))",
            self.size,
            self.var.display_typed(),
            self.body
        )
    }
}

/// `(tuple e ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpr {
    pub span: Span,
    pub elements: Vec<Expr>,
}

impl TupleExpr {
    pub fn new(span: Span, elements: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            span,
            elements: elements.into_iter().collect(),
        }
    }
}

impl Display for TupleExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(tuple")?;
        for element in &self.elements {
            write!(f, " {element}")?;
        }
        write!(f, ")")
    }
}

/// `(get$i$n tuple)`, the 1-based `i`th element of an `n` element tuple
#[derive(Debug, Clone, PartialEq)]
pub struct GetExpr {
    pub span: Span,
    pub index: usize,
    pub arity: usize,
    pub tuple: Box<Expr>,
}

impl GetExpr {
    pub fn new(span: Span, index: usize, arity: usize, tuple: Expr) -> Self {
        Self {
            span,
            index,
            arity,
            tuple: Box::new(tuple),
        }
    }
}

impl Display for GetExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(get${}${} {})", self.index, self.arity, self.tuple)
    }
}

/// `(lam (v : T) body)`
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub span: Span,
    pub var: Variable,
    pub body: Box<Expr>,
}

impl LambdaExpr {
    pub fn new(span: Span, var: Variable, body: Expr) -> Self {
        Self {
            span,
            var,
            body: Box::new(body),
        }
    }
}

impl Typed for LambdaExpr {
    fn get_type(&self) -> Type {
        Type::lam(self.var.ty.clone(), self.body.get_type())
    }
}

impl Display for LambdaExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(lam {} {})", self.var.display_typed(), self.body)
    }
}

/// `(fold (lam (acc_x : T) body) init sequence)`
#[derive(Debug, Clone, PartialEq)]
pub struct FoldExpr {
    pub span: Span,
    pub lambda: LambdaExpr,
    pub init: Box<Expr>,
    pub sequence: Box<Expr>,
}

impl FoldExpr {
    pub fn new(span: Span, lambda: LambdaExpr, init: Expr, sequence: Expr) -> Self {
        Self {
            span,
            lambda,
            init: Box::new(init),
            sequence: Box::new(sequence),
        }
    }
}

impl Display for FoldExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(fold {} {} {})", self.lambda, self.init, self.sequence)
    }
}

/// A named rewrite rule, `(rule "name" ((x : T) ...) pattern replacement)`
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub span: Span,
    pub name: String,
    pub vars: Vec<Variable>,
    pub pattern: Box<Expr>,
    pub replacement: Box<Expr>,
}

impl Rule {
    pub fn new(
        span: Span,
        name: impl Into<String>,
        vars: impl IntoIterator<Item = Variable>,
        pattern: Expr,
        replacement: Expr,
    ) -> Self {
        Self {
            span,
            name: name.into(),
            vars: vars.into_iter().collect(),
            pattern: Box::new(pattern),
            replacement: Box::new(replacement),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(rule \"{}\" ({}) {} {})",
            self.name,
            self.vars.iter().map(Variable::display_typed).join(" "),
            self.pattern,
            self.replacement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::start()
    }

    fn int(i: i64) -> Expr {
        Literal::new(span(), LiteralValue::Integer(i)).into()
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(int(3).to_string(), "3");
        assert_eq!(
            Literal::new(span(), LiteralValue::Float(1.0)).to_string(),
            "1.0"
        );
        assert_eq!(
            Literal::new(span(), LiteralValue::String("a \"b\"".to_string())).to_string(),
            r#""a \"b\"""#
        );
    }

    #[test]
    fn test_let_display() {
        let x = Variable::binder(span(), "x", Type::Unknown, BindingId::new(0)).with_init(int(1));
        let body = Variable::reference(span(), "x", BindingId::new(0));
        let expr = Expr::from(LetExpr::new(span(), [x], body.into()));
        assert_eq!(expr.to_string(), "(let ((x 1)) x)");
        assert_eq!(expr.kind_name(), "let");
    }

    #[test]
    fn test_definition_signature_from_params() {
        let x = Variable::binder(span(), "x", Type::INTEGER, BindingId::new(0));
        let y = Variable::binder(span(), "y", Type::FLOAT, BindingId::new(1));
        let def = Definition::new(span(), "f", Type::FLOAT, [x, y], int(0));
        assert_eq!(def.signature, Signature::new("f", [Type::INTEGER, Type::FLOAT]));
        assert_eq!(def.param_names().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(
            def.to_string(),
            "(def f Float ((x : Integer) (y : Float)) 0)"
        );
    }

    #[test]
    fn test_types_of_expressions() {
        let x = Variable::binder(span(), "x", Type::Unknown, BindingId::new(0)).with_init(int(1));
        assert_eq!(x.get_type(), Type::INTEGER);
        let call = Expr::from(CallExpr::new(span(), "add", [int(1), int(2)]));
        assert_eq!(call.get_type(), Type::Unknown);
        let lam = LambdaExpr::new(
            span(),
            Variable::binder(span(), "i", Type::INTEGER, BindingId::new(1)),
            int(0),
        );
        assert_eq!(lam.get_type(), Type::lam(Type::INTEGER, Type::INTEGER));
    }

    #[test]
    fn test_get_display() {
        let tuple = TupleExpr::new(span(), [int(1), int(2), int(3)]);
        let get = GetExpr::new(span(), 2, 3, tuple.into());
        assert_eq!(get.to_string(), "(get$2$3 (tuple 1 2 3))");
    }
}
