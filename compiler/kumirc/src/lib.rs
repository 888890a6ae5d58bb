//! Command-line host for the Kumir execution engine.
//!
//! Programs arrive as JSON syntax trees (the `kumir_ir` `json` feature);
//! this crate loads them, wires I/O and limits, and reports diagnostics.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use kumir_eval::{
    buffer_handler_with_input, console_handler, EvalError, EvalMode, Interpreter, RunOutcome,
    SharedIoHandler,
};
use kumir_ir::Program;

/// Top-level failure of a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{}` is not a valid program: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl RunError {
    /// Process exit code: 1 for a program error, 2 for a load error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Eval(_) => 1,
            RunError::Io { .. } | RunError::Json { .. } => 2,
        }
    }
}

/// Options of `kumir run`.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Read `ввод` lines from this file instead of stdin.
    pub input: Option<PathBuf>,
    pub seed: Option<u64>,
    /// Bound recursion depth; runs are unbounded otherwise.
    pub max_depth: Option<usize>,
}

/// Parse a program from its JSON text.
pub fn parse_program(text: &str) -> Result<Program, serde_json::Error> {
    serde_json::from_str(text)
}

/// Read and parse a program file.
pub fn load_program(path: &Path) -> Result<Program, RunError> {
    let text = fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let program = parse_program(&text).map_err(|source| RunError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        algorithms = program.algorithms.len(),
        "program loaded"
    );
    Ok(program)
}

/// Load a program and register its algorithms without running anything.
///
/// Returns the number of algorithms.
pub fn check_file(path: &Path) -> Result<usize, RunError> {
    let program = load_program(path)?;
    let mut interpreter = Interpreter::builder()
        .io_handler(kumir_eval::silent_handler())
        .build();
    interpreter.register(&program)?;
    Ok(interpreter.algorithms().len())
}

/// Load and run a program file.
///
/// Program output goes to stdout. With `options.input` set, input lines
/// come from that file and output is printed once the run ends.
pub fn run_file(path: &Path, options: &RunOptions) -> Result<RunOutcome, RunError> {
    let program = load_program(path)?;
    let scripted = match &options.input {
        Some(input) => {
            let text = fs::read_to_string(input).map_err(|source| RunError::Io {
                path: input.clone(),
                source,
            })?;
            Some(buffer_handler_with_input(text.lines().map(str::to_owned)))
        }
        None => None,
    };
    let io = scripted.clone().unwrap_or_else(console_handler);
    let result = run_program(&program, io, options);
    if let Some(buffer) = scripted {
        print!("{}", buffer.get_output());
    }
    Ok(result?)
}

/// Run an already loaded program against `io`.
pub fn run_program(
    program: &Program,
    io: SharedIoHandler,
    options: &RunOptions,
) -> Result<RunOutcome, EvalError> {
    let mut builder = Interpreter::builder().io_handler(io);
    if let Some(max_call_depth) = options.max_depth {
        builder = builder.mode(EvalMode::Sandboxed {
            max_call_depth,
            statement_budget: u64::MAX,
        });
    }
    if let Some(seed) = options.seed {
        builder = builder.seed(seed);
    }
    let mut interpreter = builder.build();
    let outcome = interpreter.run(program);
    tracing::debug!(
        statements = interpreter.statements_executed(),
        ?outcome,
        "run finished"
    );
    outcome
}

/// Render an engine error with its call stack.
pub fn render_error(path: &Path, err: &EvalError) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}: {err}", path.display());
    for note in &err.notes {
        let _ = match note.span {
            Some(span) => writeln!(text, "  note: {} ({span})", note.message),
            None => writeln!(text, "  note: {}", note.message),
        };
    }
    if let Some(backtrace) = &err.backtrace {
        text.push_str(&backtrace.to_string());
    }
    text
}

static TRACING_INIT: Once = Once::new();

/// Initialize logging to stderr. Safe to call more than once.
///
/// `KUMIR_LOG` holds an `EnvFilter` directive (default `warn`);
/// `KUMIR_LOG_TREE=1` selects indented span trees over flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_env("KUMIR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
        let tree = std::env::var("KUMIR_LOG_TREE").is_ok_and(|v| v == "1");
        let registry = tracing_subscriber::registry().with(filter);
        if tree {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
