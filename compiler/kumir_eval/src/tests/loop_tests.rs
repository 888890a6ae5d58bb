//! Loop forms and loop exits.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use kumir_ir::{BinaryOp, Expr, Loop, Stmt, StmtKind, TypeTag};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{
    assign, declare, declare_init, for_loop, if_then, main_program, output, run, times_loop,
    while_loop,
};
use crate::EvalErrorKind;

fn add(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Add, left, right)
}

fn eq(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Eq, left, right)
}

fn increment(name: &str) -> Stmt {
    assign(name, add(Expr::ident(name), Expr::int(1)))
}

fn run_ok(body: Vec<Stmt>) -> String {
    let (result, out) = run(&main_program(body));
    result.unwrap();
    out
}

#[test]
fn for_loop_sums_range() {
    let out = run_ok(vec![
        declare(TypeTag::Int, &["i"]),
        declare_init(TypeTag::Int, "s", Expr::int(0)),
        for_loop(
            "i",
            Expr::int(1),
            Expr::int(5),
            None,
            vec![assign("s", add(Expr::ident("s"), Expr::ident("i")))],
        ),
        output(vec![Expr::ident("s"), Expr::string(" "), Expr::ident("i")]),
    ]);
    assert_eq!(out, "15 5");
}

#[test]
fn for_loop_with_negative_step() {
    let out = run_ok(vec![
        declare(TypeTag::Int, &["i"]),
        for_loop(
            "i",
            Expr::int(5),
            Expr::int(1),
            Some(Expr::int(-2)),
            vec![output(vec![Expr::ident("i")])],
        ),
    ]);
    assert_eq!(out, "531");
}

#[test]
fn for_loop_with_empty_range_leaves_counter_alone() {
    let out = run_ok(vec![
        declare_init(TypeTag::Int, "i", Expr::int(42)),
        for_loop("i", Expr::int(3), Expr::int(1), None, vec![output(vec![Expr::string("x")])]),
        output(vec![Expr::ident("i")]),
    ]);
    assert_eq!(out, "42");
}

#[test]
fn zero_step_is_rejected_before_iterating() {
    let err = run(&main_program(vec![
        declare(TypeTag::Int, &["i"]),
        for_loop(
            "i",
            Expr::int(1),
            Expr::int(3),
            Some(Expr::int(0)),
            vec![output(vec![Expr::string("x")])],
        ),
    ]));
    assert_eq!(err.0.unwrap_err().kind, EvalErrorKind::ZeroStep);
    assert_eq!(err.1, "");
}

#[test]
fn exit_leaves_only_the_innermost_loop() {
    let out = run_ok(vec![
        declare(TypeTag::Int, &["i", "j"]),
        for_loop(
            "i",
            Expr::int(1),
            Expr::int(3),
            None,
            vec![
                for_loop(
                    "j",
                    Expr::int(1),
                    Expr::int(3),
                    None,
                    vec![
                        if_then(
                            eq(Expr::ident("j"), Expr::int(2)),
                            vec![StmtKind::LoopExit.into()],
                            None,
                        ),
                        output(vec![Expr::ident("i"), Expr::ident("j")]),
                    ],
                ),
                output(vec![Expr::string(";")]),
            ],
        ),
    ]);
    assert_eq!(out, "11;21;31;");
}

#[test]
fn continue_skips_to_next_iteration() {
    let out = run_ok(vec![
        declare(TypeTag::Int, &["i"]),
        for_loop(
            "i",
            Expr::int(1),
            Expr::int(4),
            None,
            vec![
                if_then(
                    eq(
                        Expr::binary(BinaryOp::Mod, Expr::ident("i"), Expr::int(2)),
                        Expr::int(0),
                    ),
                    vec![StmtKind::LoopContinue.into()],
                    None,
                ),
                output(vec![Expr::ident("i")]),
            ],
        ),
    ]);
    assert_eq!(out, "13");
}

#[test]
fn while_checks_before_each_pass() {
    let out = run_ok(vec![
        declare_init(TypeTag::Int, "n", Expr::int(0)),
        while_loop(
            Expr::binary(BinaryOp::Lt, Expr::ident("n"), Expr::int(3)),
            vec![increment("n"), output(vec![Expr::ident("n")])],
        ),
        while_loop(Expr::bool(false), vec![output(vec![Expr::string("never")])]),
    ]);
    assert_eq!(out, "123");
}

#[test]
fn repeat_runs_body_before_condition() {
    let out = run_ok(vec![
        declare_init(TypeTag::Int, "n", Expr::int(10)),
        StmtKind::Loop(Loop::Repeat {
            body: vec![increment("n"), output(vec![Expr::ident("n")])],
            until: Some(Expr::bool(true)),
        })
        .into(),
    ]);
    assert_eq!(out, "11");
}

#[test]
fn repeat_without_condition_ends_by_exit() {
    let out = run_ok(vec![
        declare_init(TypeTag::Int, "n", Expr::int(0)),
        StmtKind::Loop(Loop::Repeat {
            body: vec![
                increment("n"),
                if_then(eq(Expr::ident("n"), Expr::int(4)), vec![StmtKind::LoopExit.into()], None),
            ],
            until: None,
        })
        .into(),
        output(vec![Expr::ident("n")]),
    ]);
    assert_eq!(out, "4");
}

#[test]
fn times_loop_counts() {
    let out = run_ok(vec![
        times_loop(Expr::int(3), vec![output(vec![Expr::string("*")])]),
        times_loop(Expr::int(-2), vec![output(vec![Expr::string("!")])]),
        times_loop(Expr::int(0), vec![output(vec![Expr::string("!")])]),
    ]);
    assert_eq!(out, "***");
}

#[test]
fn loop_bounds_must_be_integers() {
    let err = run(&main_program(vec![times_loop(Expr::real(2.5), Vec::new())]))
        .0
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn algorithm_exit_inside_loop_leaves_the_algorithm() {
    let out = run_ok(vec![
        times_loop(
            Expr::int(5),
            vec![output(vec![Expr::string("a")]), StmtKind::AlgorithmExit.into()],
        ),
        output(vec![Expr::string("b")]),
    ]);
    assert_eq!(out, "a");
}

proptest! {
    #[test]
    fn for_loop_iteration_count(from in -20_i64..20, to in -20_i64..20, step in 1_i64..5) {
        let out = run_ok(vec![
            declare(TypeTag::Int, &["i"]),
            declare_init(TypeTag::Int, "n", Expr::int(0)),
            for_loop(
                "i",
                Expr::int(from),
                Expr::int(to),
                Some(Expr::int(step)),
                vec![increment("n")],
            ),
            output(vec![Expr::ident("n")]),
        ]);
        let expected = if to < from { 0 } else { (to - from) / step + 1 };
        prop_assert_eq!(out, expected.to_string());
    }
}
