//! Loading programs from files and the `check`/`run` entry points.

use std::path::Path;

use kumir_eval::RunOutcome;
use kumirc::{check_file, load_program, render_error, run_file, RunError, RunOptions};
use pretty_assertions::assert_eq;

use crate::common::{run_json, temp_file};

const TWO_ALGORITHMS: &str = r#"{"algorithms": [
    {"name": "главный", "body": [{"kind": {"Call": {"callee": "помощник"}}}]},
    {"name": "помощник", "body": []}
]}"#;

#[test]
fn load_and_check() {
    let (_file, path) = temp_file(TWO_ALGORITHMS);
    let program = load_program(&path).unwrap();
    assert_eq!(program.algorithms.len(), 2);
    assert_eq!(check_file(&path).unwrap(), 2);
}

#[test]
fn check_reports_registration_errors() {
    let (_file, path) = temp_file(
        r#"{"algorithms": [{"name": "а", "body": []}, {"name": "А", "body": []}]}"#,
    );
    let err = check_file(&path).unwrap_err();
    assert!(matches!(err, RunError::Eval(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn malformed_json_is_a_load_error() {
    let (_file, path) = temp_file(r#"{"algorithms": [{"body": 3}]}"#);
    let err = load_program(&path).unwrap_err();
    assert!(matches!(err, RunError::Json { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn missing_file_is_a_load_error() {
    let err = load_program(Path::new("/nonexistent/program.json")).unwrap_err();
    assert!(matches!(err, RunError::Io { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn run_file_with_scripted_input() {
    let (_program, path) = temp_file(
        r#"{"algorithms": [{"name": "главный", "body": [
            {"kind": {"Declare": {"ty": "лит", "items": [{"name": "s"}]}}},
            {"kind": {"Input": {"targets": [{"Var": "s"}]}}},
            {"kind": {"Output": {"items": [{"Expr": {"kind": {"Ident": "s"}}}, "Newline"]}}}
        ]}]}"#,
    );
    let (_input, input_path) = temp_file("строка\n");
    let options = RunOptions {
        input: Some(input_path),
        ..RunOptions::default()
    };
    assert_eq!(run_file(&path, &options).unwrap(), RunOutcome::Completed);
}

#[test]
fn depth_limit_from_options() {
    let (_file, path) = temp_file(
        r#"{"algorithms": [
            {"name": "главный", "body": [{"kind": {"Call": {"callee": "рек"}}}]},
            {"name": "рек", "body": [{"kind": {"Call": {"callee": "рек"}}}]}
        ]}"#,
    );
    let options = RunOptions {
        max_depth: Some(20),
        ..RunOptions::default()
    };
    let err = run_file(&path, &options).unwrap_err();
    let RunError::Eval(eval) = &err else {
        panic!("expected an evaluation error, got {err:?}");
    };
    let rendered = render_error(&path, eval);
    assert!(rendered.contains("call stack:"));
    assert!(rendered.contains("рек"));
}

#[test]
fn spans_survive_loading() {
    let (result, _) = run_json(
        r#"{"algorithms": [{"name": "главный", "body": [
            {"kind": {"Output": {"items": [{"Expr": {"kind": {"Binary": {
                "op": "Mod",
                "left": {"kind": {"Int": 1}},
                "right": {"kind": {"Int": 0}}}}, "span": {"line": 3, "column": 7}}}]}},
             "span": {"line": 3, "column": 1}}
        ]}]}"#,
        &[],
    );
    let err = result.unwrap_err();
    assert_eq!(err.span, Some(kumir_ir::Span::new(3, 7)));
    assert_eq!(err.to_string(), format!("EvalError at 3:7: {}", err.message));
}

#[test]
fn rendered_error_lists_notes() {
    let (_file, path) = temp_file(
        r#"{"algorithms": [
            {"name": "главный", "body": [{"kind": {"Call": {"callee": "показать",
                "args": [{"kind": {"Str": "пять"}}]}}}]},
            {"name": "показать", "params": [{"name": "n", "ty": "цел"}], "body": [],
             "span": {"line": 4, "column": 1}}
        ]}"#,
    );
    let err = run_file(&path, &RunOptions::default()).unwrap_err();
    let RunError::Eval(eval) = &err else {
        panic!("expected an evaluation error, got {err:?}");
    };
    let rendered = render_error(&path, eval);
    assert!(
        rendered.contains("note: parameter `n` of `показать` is declared `арг цел` (4:1)"),
        "{rendered}"
    );
}
