//! Interactive prompt that runs each line through semantic analysis and
//! prints the annotated tree, or the first error.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "dl > ";

pub struct Repl {
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line == ":quit" {
                        break;
                    }
                    let _ = self.editor.add_history_entry(line);

                    match eval_line(line) {
                        Ok(tree) => println!("{}", tree),
                        Err(message) => println!("{} {}", "error:".bright_red(), message),
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

/// Analyzes one complete program and renders its tree, preceded by one
/// `warning:` line per skipped illegal character.
pub fn eval_line(line: &str) -> Result<String, String> {
    let (program, errors) = crate::analyze_with_errors(line).map_err(|e| e.to_string())?;

    let mut out = String::new();
    for error in errors {
        out.push_str(&format!("warning: {}\n", error));
    }
    out.push_str(&program.to_string());
    Ok(out)
}
