pub mod analyzer;
pub mod codegen;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod repl;

use analyzer::SemanticVisitor;
use codegen::Codegen;
use config::CompileOptions;
use error::{CompileResult, LexError};
use lexer::Lexer;
use parser::{Parser, Program};

/// Lexes and parses `source`. Illegal characters are skipped with a warning.
pub fn parse(source: &str) -> CompileResult<Program> {
    parse_with_errors(source).map(|(program, _)| program)
}

/// Like [`parse`], also returning every illegal character the lexer skipped.
pub fn parse_with_errors(source: &str) -> CompileResult<(Program, Vec<LexError>)> {
    let (tokens, errors) = Lexer::tokenize_with_errors(source);
    let mut parser = Parser::new(tokens);
    Ok((parser.parse()?, errors))
}

/// Parses `source` and annotates the tree with symbols and types.
pub fn analyze(source: &str) -> CompileResult<Program> {
    analyze_with_errors(source).map(|(program, _)| program)
}

/// Like [`analyze`], also returning every illegal character the lexer skipped.
pub fn analyze_with_errors(source: &str) -> CompileResult<(Program, Vec<LexError>)> {
    let (mut program, errors) = parse_with_errors(source)?;
    SemanticVisitor::new().visit_program(&mut program)?;
    Ok((program, errors))
}

/// Compiles `source` to the text of an LLVM IR module.
pub fn compile(source: &str, options: &CompileOptions) -> CompileResult<String> {
    let program = analyze(source)?;
    let ir = Codegen::new(options.clone()).generate(&program)?;
    Ok(ir)
}
