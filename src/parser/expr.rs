use std::fmt;

use crate::analyzer::{Symbol, Ty};

use super::join;

/// An expression together with the type the analyzer inferred for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<Ty>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, ty: None }
    }

    pub fn integer(value: i32) -> Self {
        Self::new(ExprKind::Integer(value))
    }

    pub fn variable(name: &str) -> Self {
        Self::new(ExprKind::Variable(Variable::new(name)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Integer(i32),
    Variable(Variable),
    ArrayIndex(ArrayIndex),
    BinOp(BinOpKind, Box<Expr>, Box<Expr>),
    RelOp(RelOpKind, Box<Expr>, Box<Expr>),
    FunctionCall(String, Option<Vec<Expr>>),
}

/// A plain variable or function argument reference. `symbol` is filled in by
/// the analyzer.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub symbol: Option<Symbol>,
}

impl Variable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayIndex {
    pub name: String,
    pub index: Box<Expr>,
    pub symbol: Option<Symbol>,
}

impl ArrayIndex {
    pub fn new(name: &str, index: Expr) -> Self {
        Self {
            name: name.to_string(),
            index: Box::new(index),
            symbol: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelOpKind {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOpKind::Add => "PLUSOP",
            BinOpKind::Sub => "MINUSOP",
            BinOpKind::Mul => "MULTIPLYOP",
            BinOpKind::Div => "DIVIDEOP",
        })
    }
}

impl fmt::Display for RelOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelOpKind::Equal => "EQOP",
            RelOpKind::NotEqual => "NEOP",
            RelOpKind::LessThan => "LTOP",
            RelOpKind::LessEqual => "LEOP",
            RelOpKind::GreaterThan => "GTOP",
            RelOpKind::GreaterEqual => "GEOP",
        })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.name)
    }
}

impl fmt::Display for ArrayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayIndex(Variable({}), {})", self.name, self.index)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Integer(value) => write!(f, "Integer({})", value),
            ExprKind::Variable(v) => write!(f, "{}", v),
            ExprKind::ArrayIndex(a) => write!(f, "{}", a),
            ExprKind::BinOp(kind, left, right) => write!(f, "BinOp({}, {}, {})", kind, left, right),
            ExprKind::RelOp(kind, left, right) => write!(f, "RelOp({}, {}, {})", kind, left, right),
            ExprKind::FunctionCall(name, None) => write!(f, "FunctionCall({})", name),
            ExprKind::FunctionCall(name, Some(args)) => {
                write!(f, "FunctionCall({}, Arguments({}))", name, join(args))
            }
        }
    }
}
