use kumir_ir::{BinaryOp, Span};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn factories_fill_kind_and_message() {
    let err = division_by_zero();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.category(), ErrorCategory::Eval);
    assert!(err.span.is_none());
}

#[test]
fn categories_follow_error_classes() {
    assert_eq!(duplicate_variable("a").category(), ErrorCategory::Declaration);
    assert_eq!(invalid_bounds("t", 3, 1).category(), ErrorCategory::Declaration);
    assert_eq!(undefined_variable("b").category(), ErrorCategory::Name);
    assert_eq!(undefined_algorithm("f").category(), ErrorCategory::Name);
    assert_eq!(type_mismatch("цел", "лит").category(), ErrorCategory::Type);
    assert_eq!(procedure_in_expression("p").category(), ErrorCategory::Type);
    assert_eq!(wrong_arg_count("f", 1, 2).category(), ErrorCategory::Argument);
    assert_eq!(domain_error("sqrt", "negative").category(), ErrorCategory::Argument);
    assert_eq!(integer_out_of_range(1 << 40).category(), ErrorCategory::Argument);
    assert_eq!(uninitialized_variable("x").category(), ErrorCategory::Eval);
    assert_eq!(index_out_of_bounds("A", 4, 1, 3).category(), ErrorCategory::Eval);
    assert_eq!(assertion_failed("утв", "x > 0").category(), ErrorCategory::Runtime);
    assert_eq!(zero_step().category(), ErrorCategory::Runtime);
    assert_eq!(cancelled().category(), ErrorCategory::Runtime);
    assert_eq!(not_implemented("slice assignment").category(), ErrorCategory::NotImplemented);
    assert_eq!(
        EvalError::new(ErrorCategory::Type, "custom").category(),
        ErrorCategory::Type
    );
}

#[test]
fn display_includes_category_and_position() {
    let err = index_out_of_bounds("A", 4, 1, 3).with_span(Span::new(7, 3));
    assert_eq!(
        err.to_string(),
        "EvalError at 7:3: index 4 of `A` is outside bounds [1:3]"
    );
    assert_eq!(
        invalid_binary_op_for("лог", BinaryOp::Add).to_string(),
        "TypeError: operator `+` cannot be applied to лог"
    );
}

#[test]
fn or_span_keeps_the_innermost_position() {
    let err = division_by_zero()
        .or_span(Span::new(4, 10))
        .or_span(Span::new(2, 1));
    assert_eq!(err.span, Some(Span::new(4, 10)));
    assert_eq!(division_by_zero().or_span(Span::DUMMY).span, None);
}

#[test]
fn arity_message_pluralizes() {
    assert_eq!(wrong_arg_count("sqrt", 1, 2).message, "sqrt expects 1 argument, got 2");
    assert_eq!(wrong_arg_count("imax", 2, 0).message, "imax expects 2 arguments, got 0");
}

#[test]
fn uninitialized_element_lists_indices() {
    assert_eq!(
        uninitialized_element("M", &[2, 3]).message,
        "element M[2, 3] is used before it is assigned"
    );
}

#[test]
fn backtrace_display() {
    let backtrace = EvalBacktrace::new(vec![
        BacktraceFrame {
            name: "факториал".to_string(),
            span: Some(Span::new(5, 12)),
        },
        BacktraceFrame {
            name: "главный".to_string(),
            span: None,
        },
    ]);
    assert_eq!(backtrace.len(), 2);
    assert_eq!(
        backtrace.to_string(),
        "call stack:\n  0: факториал at 5:12\n  1: главный\n"
    );
    assert!(EvalBacktrace::default().to_string().is_empty());
}

#[test]
fn notes_accumulate() {
    let err = type_mismatch("цел", "вещ")
        .with_note(EvalNote::new("real values are never narrowed implicitly"))
        .with_note(EvalNote::with_span("declared here", Span::new(1, 1)));
    assert_eq!(err.notes.len(), 2);
    assert_eq!(err.notes[1].span, Some(Span::new(1, 1)));
}
