//! Error taxonomy for every stage of the pipeline.
//!
//! Lexical errors are recoverable and only ever collected. Everything else is
//! fatal and aborts the stage that raised it.

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("line {line}: illegal character '{character}'")]
    IllegalCharacter { character: char, line: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: unexpected token {found:?}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        line: usize,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
    #[error("line {line}: integer literal {literal} does not fit in i32")]
    IntegerOutOfRange { literal: String, line: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("undeclared variable: {0}")]
    UndeclaredVariable(String),
    /// Raised both for unknown names and for calls whose argument count
    /// matches no declared function.
    #[error("undeclared function: {name} taking {arguments} argument(s)")]
    UndeclaredFunction { name: String, arguments: usize },
    #[error("type check error: {0}")]
    TypeCheck(String),
    #[error("redeclared symbol: {0}")]
    Redeclared(String),
}

/// A structurally invalid annotated tree reached the generator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("use of array with unknown size: {0}")]
    UnknownArraySize(String),
    #[error("assignment is only possible to variables and indexed array elements: {0}")]
    InvalidAssignTarget(String),
    #[error("attempt to access unresolved variable symbol: {0}")]
    UnresolvedSymbol(String),
    #[error("expression has no inferred type: {0}")]
    MissingType(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}
