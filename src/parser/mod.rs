mod ast;
mod expr;
mod parser;

use std::fmt::Display;

pub use ast::*;
pub use expr::*;
pub use parser::*;

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
