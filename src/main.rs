use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use imperal::{EvaluatorConfig, Interpreter, interpreter::evaluator::core::DEFAULT_MAX_NESTING_DEPTH};

/// imperal runs programs written in Imperal, a small dynamically typed
/// scripting language. Without a file it starts an interactive prompt.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The script to run.
    file: Option<PathBuf>,

    /// How many frames building a `sencap` object may walk.
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_nesting_depth: usize,
}

const PROMPT: &str = "Imperal> ";

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let config = EvaluatorConfig { max_nesting_depth: args.max_nesting_depth };
    let mut session = Interpreter::with_config(config);

    match &args.file {
        Some(path) => run_file(&mut session, path),
        None => run_repl(&mut session),
    }
}

/// Installs a subscriber printing the interpreter's traces to stderr.
///
/// Nothing is installed unless `IMPERAL_LOG` or `RUST_LOG` is set, so the
/// output of scripts stays clean.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = if let Ok(directives) = std::env::var("IMPERAL_LOG") {
        EnvFilter::new(directives)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)
                                                    .with_target(true)
                                                    .with_level(true))
                                  .with(filter)
                                  .init();
}

fn run_file(session: &mut Interpreter, path: &Path) -> ExitCode {
    let Ok(script) = fs::read_to_string(path) else {
        eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                  path.display());
        return ExitCode::FAILURE;
    };

    match session.run(&path.display().to_string(), &script) {
        Ok(result) => {
            println!("{result}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            println!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn run_repl(session: &mut Interpreter) -> ExitCode {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{PROMPT}");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let Some(Ok(line)) = lines.next() else {
            println!();
            return ExitCode::SUCCESS;
        };

        match session.run("<stdin>", &line) {
            Ok(result) => println!("{result}"),
            Err(e) => println!("{e}"),
        }
    }
}
