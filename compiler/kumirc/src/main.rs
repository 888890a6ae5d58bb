//! Kumir CLI
//!
//! Runs programs handed over as JSON syntax trees.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use kumir_eval::RunOutcome;
use kumirc::{check_file, init_tracing, render_error, run_file, RunError, RunOptions};

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(2);
    }

    match args[1].as_str() {
        "run" => {
            let Some((path, options)) = parse_run_args(&args[2..]) else {
                eprintln!("Usage: kumir run <program.json> [options] (see `kumir help`)");
                return ExitCode::from(2);
            };
            match run_file(&path, &options) {
                Ok(RunOutcome::Completed) => ExitCode::SUCCESS,
                Ok(RunOutcome::Stopped) => {
                    tracing::info!("program executed стоп");
                    ExitCode::SUCCESS
                }
                Err(err) => report(&path, &err),
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: kumir check <program.json>");
                return ExitCode::from(2);
            }
            let path = PathBuf::from(&args[2]);
            match check_file(&path) {
                Ok(count) => {
                    println!("{}: {count} algorithm(s) registered", path.display());
                    ExitCode::SUCCESS
                }
                Err(err) => report(&path, &err),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("kumir {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            ExitCode::from(2)
        }
    }
}

/// `<program.json>` followed by options, in any order.
fn parse_run_args(args: &[String]) -> Option<(PathBuf, RunOptions)> {
    let mut options = RunOptions::default();
    let mut path = None;
    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--input" => options.input = Some(PathBuf::from(rest.next()?)),
            "--seed" => options.seed = Some(rest.next()?.parse().ok()?),
            "--max-depth" => options.max_depth = Some(rest.next()?.parse().ok()?),
            flag if flag.starts_with('-') => {
                eprintln!("error: unknown option '{flag}'");
                return None;
            }
            file if path.is_none() => path = Some(PathBuf::from(file)),
            extra => {
                eprintln!("error: unexpected argument '{extra}'");
                return None;
            }
        }
    }
    Some((path?, options))
}

fn report(path: &Path, err: &RunError) -> ExitCode {
    match err {
        RunError::Eval(eval) => eprint!("{}", render_error(path, eval)),
        other => eprintln!("error: {other}"),
    }
    ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}

fn print_usage() {
    println!("Kumir interpreter");
    println!();
    println!("Usage: kumir <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <program.json>     Run a program");
    println!("      --input <file>     Read input lines from a file");
    println!("      --seed <n>         Seed the random generator");
    println!("      --max-depth <n>    Limit algorithm call depth");
    println!("  check <program.json>   Load and register a program without running it");
    println!("  help                   Show this message");
    println!("  version                Show the version");
    println!();
    println!("Logging: KUMIR_LOG=<filter> (default warn), KUMIR_LOG_TREE=1 for span trees");
}
