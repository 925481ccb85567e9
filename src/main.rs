use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_stdin::FileOrStdin;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dlc::{
    config::{CompileOptions, PointerStyle},
    lexer::Lexer,
    repl::Repl,
};

#[derive(Parser)]
#[command(version, about = "Compiles DL programs to LLVM IR")]
struct Cli {
    /// Log more; repeat for trace output. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a source file, or `-` for stdin
    Compile(CompileArgs),
    /// Analyze programs interactively
    Repl,
}

#[derive(Args)]
struct CompileArgs {
    input: FileOrStdin,

    /// Defaults to the input path with an `.ll` extension, or stdout for stdin
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spell pointers as `ptr` instead of `i32*`
    #[arg(long)]
    opaque_pointers: bool,

    /// Don't append `ret i32 0` to user functions
    #[arg(long)]
    no_fallthrough_return: bool,

    #[arg(long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    Ir,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn compile(args: CompileArgs) -> anyhow::Result<()> {
    let source_path = (!args.input.is_stdin()).then(|| PathBuf::from(args.input.filename()));
    let name = args.input.filename().to_string();
    let source = args
        .input
        .contents()
        .with_context(|| format!("reading {}", name))?;

    let options = CompileOptions {
        pointer_style: if args.opaque_pointers {
            PointerStyle::Opaque
        } else {
            PointerStyle::Typed
        },
        fallthrough_return: !args.no_fallthrough_return,
    };

    let text = match args.emit {
        Emit::Tokens => Lexer::tokenize(&source)
            .iter()
            .map(|t| format!("{}\n", t))
            .collect(),
        Emit::Ast => format!("{}\n", dlc::analyze(&source)?),
        Emit::Ir => dlc::compile(&source, &options).with_context(|| format!("compiling {}", name))?,
    };

    let output = match (args.output, source_path) {
        (Some(path), _) => Some(path),
        (None, Some(path)) if args.emit == Emit::Ir => Some(path.with_extension("ll")),
        _ => None,
    };
    match output {
        Some(path) => {
            fs::write(&path, text).with_context(|| format!("writing {:?}", path))?;
            info!(output = ?path, "wrote output");
        }
        None => std::io::stdout()
            .write_all(text.as_bytes())
            .context("writing to stdout")?,
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compile(args) => compile(args),
        Command::Repl => {
            let mut repl = Repl::new().context("starting line editor")?;
            repl.run().context("reading input")
        }
    }
}
