use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;
use tracing::debug;

use crate::{
    driver::{ErrorPolicy, Summary, handle_line, run},
    lexer::LexerError,
    runtime::interpreter::InterpreterErr,
};

pub mod ast;
pub mod driver;
pub mod lexer;
pub mod runtime;
pub mod utils;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("{0}")]
    Lexer(LexerError),
    #[error("{0}")]
    Interpreter(InterpreterErr),
    #[error("line {0}: {1}")]
    AtLine(usize, Box<CalcError>),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Readline(#[from] ReadlineError),
    #[error("{0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl From<LexerError> for CalcError {
    fn from(value: LexerError) -> Self {
        Self::Lexer(value)
    }
}

impl From<InterpreterErr> for CalcError {
    fn from(value: InterpreterErr) -> Self {
        Self::Interpreter(value)
    }
}

fn repl(policy: ErrorPolicy) -> Result<Summary, CalcError> {
    let mut editor = DefaultEditor::new()?;
    let mut summary = Summary::default();
    let (mut stdout, mut stderr) = (io::stdout(), io::stderr());
    let mut line_number = 0;

    loop {
        let readline = editor.readline(">> ");
        match readline {
            Ok(line) => {
                line_number += 1;
                let _ = editor.add_history_entry(line.as_str());
                handle_line(
                    line_number,
                    &line,
                    &mut stdout,
                    &mut stderr,
                    policy,
                    &mut summary,
                )?;
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                eprintln!("CTRL-D");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(summary)
}

fn file(path: &Path, policy: ErrorPolicy) -> Result<Summary, CalcError> {
    let reader = BufReader::new(File::open(path)?);
    run(reader, io::stdout().lock(), io::stderr().lock(), policy)
}

fn stdin(policy: ErrorPolicy) -> Result<Summary, CalcError> {
    run(
        io::stdin().lock(),
        io::stdout().lock(),
        io::stderr().lock(),
        policy,
    )
}

/// Evaluates `<operand> <operator> <operand>` lines, where both operands are
/// decimal numbers from 1 to 10 or Roman numerals from I to X.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read expressions from a file instead of standard input.
    #[arg(short, long, conflicts_with = "interactive")]
    path: Option<PathBuf>,

    /// Report failing lines and keep going instead of stopping at the first one.
    #[arg(short, long)]
    keep_going: bool,

    /// Start a line editor session.
    #[arg(short, long)]
    interactive: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    utils::init_logger(args.verbose);
    debug!(?args, "starting");

    let policy = if args.keep_going {
        ErrorPolicy::Report
    } else {
        ErrorPolicy::Abort
    };

    let result = if args.interactive {
        repl(policy)
    } else if let Some(path) = &args.path {
        file(path, policy)
    } else {
        stdin(policy)
    };

    match result {
        Ok(summary) => {
            debug!(?summary, "finished");
            summary.exit_code()
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
