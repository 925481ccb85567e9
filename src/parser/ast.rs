use std::fmt;

use crate::analyzer::Ty;

use super::{join, ArrayIndex, Expr, Variable};

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub declarations: Option<Declarations>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declarations(pub Vec<Declaration>);

#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Variables(VariableDeclarations),
    Function(FunctionDeclaration),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeSpecifier {
    Int,
}

/// `int a, b[10], c;`
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclarations {
    pub specifier: TypeSpecifier,
    pub variables: Vec<VarDef>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VarDef {
    Variable(String),
    Array(String, usize),
}

impl VarDef {
    pub fn name(&self) -> &str {
        match self {
            VarDef::Variable(name) | VarDef::Array(name, _) => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub params: Option<Vec<String>>,
    pub locals: Option<VariableDeclarations>,
    pub body: Block,
}

impl FunctionDeclaration {
    pub fn params(&self) -> &[String] {
        self.params.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Block(pub Vec<Stmt>);

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Assign(Assign),
    Print(Expr),
    Read(Variable),
    Return(Expr),
    If(Expr, Block, Option<Block>),
    While(Expr, Block),
    Block(Block),
}

#[derive(Clone, Debug, PartialEq)]
pub enum LValue {
    Variable(Variable),
    ArrayIndex(ArrayIndex),
}

impl LValue {
    pub fn name(&self) -> &str {
        match self {
            LValue::Variable(v) => &v.name,
            LValue::ArrayIndex(a) => &a.name,
        }
    }
}

/// `target = value`. `target_ty` and `ty` are filled in by the analyzer.
#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    pub target: LValue,
    pub value: Expr,
    pub target_ty: Option<Ty>,
    pub ty: Option<Ty>,
}

impl Assign {
    pub fn new(target: LValue, value: Expr) -> Self {
        Self {
            target,
            value,
            target_ty: None,
            ty: None,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declarations {
            Some(d) => write!(f, "Program({}, {})", d, self.body),
            None => write!(f, "Program({})", self.body),
        }
    }
}

impl fmt::Display for Declarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Declarations({})", join(&self.0))
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Variables(v) => write!(f, "{}", v),
            Declaration::Function(func) => write!(f, "{}", func),
        }
    }
}

impl fmt::Display for TypeSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpecifier::Int => f.write_str("INT"),
        }
    }
}

impl fmt::Display for VariableDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VariableDeclarations({}, {})",
            self.specifier,
            join(&self.variables)
        )
    }
}

impl fmt::Display for VarDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarDef::Variable(name) => write!(f, "Variable({})", name),
            VarDef::Array(name, size) => {
                write!(f, "ArrayIndex(Variable({}), Integer({}))", name, size)
            }
        }
    }
}

impl fmt::Display for FunctionDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionDeclaration({}", self.name)?;
        if let Some(params) = &self.params {
            let params: Vec<_> = params.iter().map(|p| format!("Variable({})", p)).collect();
            write!(f, ", Arguments({})", params.join(", "))?;
        }
        if let Some(locals) = &self.locals {
            write!(f, ", {}", locals)?;
        }
        write!(f, ", {})", self.body)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", join(&self.0))
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LValue::Variable(v) => write!(f, "{}", v),
            LValue::ArrayIndex(a) => write!(f, "{}", a),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign(a) => write!(f, "Assign({}, {})", a.target, a.value),
            Stmt::Print(e) => write!(f, "Print({})", e),
            Stmt::Read(v) => write!(f, "Read({})", v),
            Stmt::Return(e) => write!(f, "Return({})", e),
            Stmt::If(cond, block, None) => write!(f, "If({}, {})", cond, block),
            Stmt::If(cond, block, Some(else_block)) => {
                write!(f, "If({}, {}, {})", cond, block, else_block)
            }
            Stmt::While(cond, block) => write!(f, "While({}, {})", cond, block),
            Stmt::Block(block) => write!(f, "{}", block),
        }
    }
}
