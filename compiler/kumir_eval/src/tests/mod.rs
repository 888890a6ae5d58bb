//! Scenario tests for the interpreter.
//!
//! Programs are built directly as trees; the helpers below keep them
//! readable.

mod loop_tests;

use kumir_ir::{
    AlgorithmDef, AssignTarget, BoundPair, DeclItem, Declaration, Expr, Loop, Name, OutputItem,
    Program, Stmt, StmtKind, TypeTag,
};

use crate::{buffer_handler_with_input, EvalMode, EvalResult, Interpreter, RunOutcome};

pub(super) fn declare(ty: TypeTag, names: &[&str]) -> Stmt {
    StmtKind::Declare(Declaration {
        ty,
        is_table: false,
        items: names
            .iter()
            .map(|name| DeclItem {
                name: Name::new(name),
                bounds: Vec::new(),
                init: None,
            })
            .collect(),
    })
    .into()
}

pub(super) fn declare_init(ty: TypeTag, name: &str, init: Expr) -> Stmt {
    StmtKind::Declare(Declaration {
        ty,
        is_table: false,
        items: vec![DeclItem {
            name: Name::new(name),
            bounds: Vec::new(),
            init: Some(init),
        }],
    })
    .into()
}

pub(super) fn declare_table(ty: TypeTag, name: &str, bounds: &[(Expr, Expr)]) -> Stmt {
    StmtKind::Declare(Declaration {
        ty,
        is_table: true,
        items: vec![DeclItem {
            name: Name::new(name),
            bounds: bounds
                .iter()
                .map(|(lower, upper)| BoundPair {
                    lower: lower.clone(),
                    upper: upper.clone(),
                })
                .collect(),
            init: None,
        }],
    })
    .into()
}

pub(super) fn assign(name: &str, value: Expr) -> Stmt {
    StmtKind::Assign {
        target: AssignTarget::Var(Name::new(name)),
        value,
    }
    .into()
}

pub(super) fn assign_elem(name: &str, indices: Vec<Expr>, value: Expr) -> Stmt {
    StmtKind::Assign {
        target: AssignTarget::Element {
            name: Name::new(name),
            indices: indices.into_iter().map(kumir_ir::IndexArg::Single).collect(),
        },
        value,
    }
    .into()
}

/// `знач := value`
pub(super) fn ret(value: Expr) -> Stmt {
    StmtKind::Assign {
        target: AssignTarget::ReturnSlot,
        value,
    }
    .into()
}

/// `вывод` of the given expressions, without a trailing newline.
pub(super) fn output(items: Vec<Expr>) -> Stmt {
    StmtKind::Output {
        items: items.into_iter().map(OutputItem::Expr).collect(),
    }
    .into()
}

/// `вывод ..., нс`
pub(super) fn output_line(items: Vec<Expr>) -> Stmt {
    let mut items: Vec<OutputItem> = items.into_iter().map(OutputItem::Expr).collect();
    items.push(OutputItem::Newline);
    StmtKind::Output { items }.into()
}

pub(super) fn call(name: &str, args: Vec<Expr>) -> Stmt {
    StmtKind::Call {
        callee: Name::new(name),
        args,
    }
    .into()
}

pub(super) fn if_then(cond: Expr, then_branch: Vec<Stmt>, else_branch: Option<Vec<Stmt>>) -> Stmt {
    StmtKind::If {
        cond,
        then_branch,
        else_branch,
    }
    .into()
}

pub(super) fn for_loop(
    var: &str,
    from: Expr,
    to: Expr,
    step: Option<Expr>,
    body: Vec<Stmt>,
) -> Stmt {
    StmtKind::Loop(Loop::For {
        var: Name::new(var),
        from,
        to,
        step,
        body,
    })
    .into()
}

pub(super) fn while_loop(cond: Expr, body: Vec<Stmt>) -> Stmt {
    StmtKind::Loop(Loop::While { cond, body }).into()
}

pub(super) fn times_loop(count: Expr, body: Vec<Stmt>) -> Stmt {
    StmtKind::Loop(Loop::Times { count, body }).into()
}

/// A program whose only algorithm is a parameterless main with `body`.
pub(super) fn main_program(body: Vec<Stmt>) -> Program {
    Program {
        intro: Vec::new(),
        algorithms: vec![AlgorithmDef::procedure("главный", Vec::new(), body)],
    }
}

/// Run `program` against a buffer preloaded with `input`; returns the run
/// result and everything written.
pub(super) fn run_with_input(
    program: &Program,
    input: &[&str],
) -> (EvalResult<RunOutcome>, String) {
    let io = buffer_handler_with_input(input.iter().copied());
    let mut interpreter = Interpreter::builder()
        .io_handler(io.clone())
        .seed(1)
        .build();
    let result = interpreter.run(program);
    (result, io.get_output())
}

pub(super) fn run(program: &Program) -> (EvalResult<RunOutcome>, String) {
    run_with_input(program, &[])
}

pub(super) fn run_sandboxed(
    program: &Program,
    max_call_depth: usize,
    statement_budget: u64,
) -> EvalResult<RunOutcome> {
    let mut interpreter = Interpreter::builder()
        .mode(EvalMode::Sandboxed {
            max_call_depth,
            statement_budget,
        })
        .build();
    interpreter.run(program)
}
