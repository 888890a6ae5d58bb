//! Shared helpers for the end-to-end tests.

use std::io::Write as _;
use std::path::PathBuf;

use kumir_eval::{buffer_handler_with_input, EvalError, RunOutcome};
use kumirc::{parse_program, run_program, RunOptions};
use tempfile::NamedTempFile;

/// Parse `json` and run it with scripted `input`; returns the outcome and
/// the captured output.
pub fn run_json(json: &str, input: &[&str]) -> (Result<RunOutcome, EvalError>, String) {
    let program = parse_program(json).expect("test program must parse");
    let io = buffer_handler_with_input(input.iter().copied());
    let options = RunOptions {
        seed: Some(11),
        ..RunOptions::default()
    };
    let result = run_program(&program, io.clone(), &options);
    (result, io.get_output())
}

/// Write `text` to a temporary file that lives as long as the handle.
pub fn temp_file(text: &str) -> (NamedTempFile, PathBuf) {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write temp file");
    let path = file.path().to_path_buf();
    (file, path)
}
