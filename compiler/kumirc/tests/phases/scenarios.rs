//! Whole programs, loaded from JSON and run with a buffer handler.

use kumir_eval::{EvalErrorKind, RunOutcome};
use kumir_ir::Span;
use pretty_assertions::assert_eq;

use crate::common::run_json;

#[test]
fn assignment_and_addition() {
    let (result, out) = run_json(
        r#"{"algorithms": [{"name": "главный", "body": [
            {"kind": {"Declare": {"ty": "цел", "items": [{"name": "a"}, {"name": "b"}]}}},
            {"kind": {"Assign": {"target": {"Var": "a"}, "value": {"kind": {"Int": 5}}}}},
            {"kind": {"Assign": {"target": {"Var": "b"}, "value": {"kind": {"Binary": {
                "op": "Add",
                "left": {"kind": {"Ident": "a"}},
                "right": {"kind": {"Int": 3}}}}}}}},
            {"kind": {"Output": {"items": [{"Expr": {"kind": {"Ident": "b"}}}]}}}
        ]}]}"#,
        &[],
    );
    assert_eq!(result.unwrap(), RunOutcome::Completed);
    assert_eq!(out, "8");
}

#[test]
fn function_call_leaves_argument_unchanged() {
    let (result, out) = run_json(
        r#"{"algorithms": [
            {"name": "главный", "body": [
                {"kind": {"Declare": {"ty": "цел", "items": [
                    {"name": "x", "init": {"kind": {"Int": 4}}}
                ]}}},
                {"kind": {"Output": {"items": [
                    {"Expr": {"kind": {"Call": {
                        "callee": "квадрат",
                        "args": [{"kind": {"Ident": "x"}}]
                    }}}},
                    {"Expr": {"kind": {"Str": " "}}},
                    {"Expr": {"kind": {"Ident": "x"}}}
                ]}}}
            ]},
            {"name": "квадрат", "return_type": "цел",
             "params": [{"name": "x", "ty": "цел"}],
             "body": [
                {"kind": {"Assign": {"target": "ReturnSlot", "value": {"kind": {"Binary": {
                    "op": "Mul",
                    "left": {"kind": {"Ident": "x"}},
                    "right": {"kind": {"Ident": "x"}}}}}}}},
                {"kind": {"Assign": {"target": {"Var": "x"}, "value": {"kind": {"Int": 0}}}}}
             ]}
        ]}"#,
        &[],
    );
    result.unwrap();
    assert_eq!(out, "16 4");
}

const TABLE_SUM: &str = r#"{"algorithms": [{"name": "главный", "body": [
    {"kind": {"Declare": {"ty": "цел", "is_table": true, "items": [{"name": "A",
        "bounds": [{"lower": {"kind": {"Int": 1}}, "upper": {"kind": {"Int": 3}}}]}]}}},
    {"kind": {"Declare": {"ty": "цел", "items": [
        {"name": "i"},
        {"name": "s", "init": {"kind": {"Int": 0}}}
    ]}}},
    {"kind": {"Assign": {
        "target": {"Element": {"name": "A", "indices": [{"Single": {"kind": {"Int": 1}}}]}},
        "value": {"kind": {"Int": 10}}}}},
    {"kind": {"Assign": {
        "target": {"Element": {"name": "A", "indices": [{"Single": {"kind": {"Int": 2}}}]}},
        "value": {"kind": {"Int": 20}}}}},
    {"kind": {"Assign": {
        "target": {"Element": {"name": "A", "indices": [{"Single": {"kind": {"Int": 3}}}]}},
        "value": {"kind": {"Int": 30}}}}},
    {"kind": {"Loop": {"For": {"var": "i", "from": {"kind": {"Int": 1}}, "to": {"kind": {"Int": 3}},
        "body": [{"kind": {"Assign": {"target": {"Var": "s"}, "value": {"kind": {"Binary": {
            "op": "Add",
            "left": {"kind": {"Ident": "s"}},
            "right": {"kind": {"Index": {
                "target": "A",
                "indices": [{"Single": {"kind": {"Ident": "i"}}}]
            }}}
        }}}}}}]}}}},
    {"kind": {"Output": {"items": [{"Expr": {"kind": {"Ident": "s"}}}, "Newline"]}}},
    {"kind": {"Output": {"items": [{"Expr": {"kind": {"Index": {"target": "A",
        "indices": [{"Single": {"kind": {"Int": 4}}}]}}, "span": {"line": 9, "column": 12}}}]}},
     "span": {"line": 9, "column": 5}}
]}]}"#;

#[test]
fn table_sum_and_out_of_bounds_read() {
    let (result, out) = run_json(TABLE_SUM, &[]);
    assert_eq!(out, "60\n");
    let err = result.unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::IndexOutOfBounds {
            name: "a".to_owned(),
            index: 4,
            lower: 1,
            upper: 3,
        }
    );
    assert_eq!(err.span, Some(Span::new(9, 12)));
    assert_eq!(err.backtrace.unwrap().frames()[0].name, "главный");
}

#[test]
fn while_with_false_condition_runs_zero_times() {
    let (result, out) = run_json(
        r#"{"algorithms": [{"name": "главный", "body": [
            {"kind": {"Loop": {"While": {"cond": {"kind": {"Bool": false}},
                "body": [
                    {"kind": {"Output": {"items": [{"Expr": {"kind": {"Str": "тело"}}}]}}}
                ]}}}},
            {"kind": {"Output": {"items": [{"Expr": {"kind": {"Str": "готово"}}}]}}}
        ]}]}"#,
        &[],
    );
    result.unwrap();
    assert_eq!(out, "готово");
}

#[test]
fn input_drives_the_program() {
    let (result, out) = run_json(
        r#"{"algorithms": [{"name": "главный", "body": [
            {"kind": {"Declare": {"ty": "цел", "items": [{"name": "n"}, {"name": "k"}]}}},
            {"kind": {"Input": {"targets": [{"Var": "n"}]}}},
            {"kind": {"Loop": {"For": {
                "var": "k",
                "from": {"kind": {"Int": 1}},
                "to": {"kind": {"Ident": "n"}},
                "body": [{"kind": {"Output": {"items": [{"Expr": {"kind": {"Ident": "k"}}}]}}}]}}}}
        ]}]}"#,
        &["4"],
    );
    result.unwrap();
    assert_eq!(out, "1234");
}

#[test]
fn stop_ends_the_run_without_error() {
    let (result, out) = run_json(
        r#"{"intro": [{"kind": {"Output": {"items": [{"Expr": {"kind": {"Str": "a"}}}]}}}],
            "algorithms": [{"name": "главный", "body": [
                {"kind": "Stop"},
                {"kind": {"Output": {"items": [{"Expr": {"kind": {"Str": "b"}}}]}}}
            ]}]}"#,
        &[],
    );
    assert_eq!(result.unwrap(), RunOutcome::Stopped);
    assert_eq!(out, "a");
}
