#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use kumir_value::{ErrorCategory, EvalErrorKind};
use pretty_assertions::assert_eq;

use super::*;

fn name(raw: &str) -> Name {
    Name::new(raw)
}

#[test]
fn declare_then_read() {
    let mut env = Environment::new();
    let at = env
        .declare_scalar(&name("a"), TypeTag::Int, Some(Value::Int(5)))
        .unwrap();
    assert_eq!(env.read(at).unwrap(), Value::Int(5));
    assert!(env.variable(at).is_initialized());
}

#[test]
fn uninitialized_read_fails() {
    let mut env = Environment::new();
    let at = env.declare_scalar(&name("a"), TypeTag::Int, None).unwrap();
    let err = env.read(at).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Eval);
    assert_eq!(
        err.kind,
        EvalErrorKind::UninitializedVariable {
            name: "a".to_string()
        }
    );
}

#[test]
fn duplicate_in_same_frame_fails() {
    let mut env = Environment::new();
    env.declare_scalar(&name("A"), TypeTag::Int, None).unwrap();
    let err = env
        .declare_scalar(&name("a"), TypeTag::Real, None)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Declaration);
}

#[test]
fn same_site_redeclaration_reinitializes() {
    let mut env = Environment::new();
    let site = Span::new(3, 5);
    let first = env
        .declare_scalar_at(&name("k"), TypeTag::Int, Some(Value::Int(1)), site)
        .unwrap();
    let second = env
        .declare_scalar_at(&name("k"), TypeTag::Int, None, site)
        .unwrap();
    assert_eq!(first, second);
    assert!(!env.variable(second).is_initialized());

    let err = env
        .declare_scalar_at(&name("k"), TypeTag::Int, None, Span::new(4, 5))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Declaration);
}

#[test]
fn locals_shadow_globals() {
    let mut env = Environment::new();
    env.declare_scalar(&name("x"), TypeTag::Int, Some(Value::Int(1)))
        .unwrap();
    env.push_frame();
    env.declare_scalar(&name("x"), TypeTag::Int, Some(Value::Int(2)))
        .unwrap();
    let at = env.find(&name("x")).unwrap();
    assert_eq!(at.frame(), 1);
    assert_eq!(env.read(at).unwrap(), Value::Int(2));
    env.pop_frame();
    let at = env.find(&name("x")).unwrap();
    assert_eq!(env.read(at).unwrap(), Value::Int(1));
}

#[test]
fn lower_frames_stay_visible() {
    let mut env = Environment::new();
    env.declare_scalar(&name("g"), TypeTag::Int, Some(Value::Int(7)))
        .unwrap();
    env.push_frame();
    env.push_frame();
    env.assign(&name("g"), Value::Int(8)).unwrap();
    env.pop_frame();
    env.pop_frame();
    let at = env.find(&name("g")).unwrap();
    assert_eq!(env.read(at).unwrap(), Value::Int(8));
}

#[test]
fn global_frame_is_never_popped() {
    let mut env = Environment::new();
    env.pop_frame();
    env.pop_frame();
    assert_eq!(env.depth(), 1);
}

#[test]
fn unknown_name_is_name_error() {
    let env = Environment::new();
    let err = env.find(&name("нет")).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Name);
}

#[test]
fn assign_coerces_and_checks_range() {
    let mut env = Environment::new();
    env.declare_scalar(&name("r"), TypeTag::Real, None).unwrap();
    env.declare_scalar(&name("i"), TypeTag::Int, None).unwrap();
    env.assign(&name("r"), Value::Int(3)).unwrap();
    let at = env.find(&name("r")).unwrap();
    assert_eq!(env.read(at).unwrap(), Value::Real(3.0));

    let err = env.assign(&name("i"), Value::Real(1.5)).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Type);
    let err = env
        .assign(&name("i"), Value::Int(kumir_value::MAX_INT + 1))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Argument);
}

#[test]
fn table_elements() {
    let mut env = Environment::new();
    let at = env
        .declare_table(&name("A"), TypeTag::Int, vec![Bounds::new(1, 3)])
        .unwrap();
    env.write_element(at, &[2], Value::Int(20)).unwrap();
    assert_eq!(env.read_element(at, &[2]).unwrap(), Value::Int(20));

    let unset = env.read_element(at, &[1]).unwrap_err();
    assert_eq!(unset.category(), ErrorCategory::Eval);
    let outside = env.read_element(at, &[4]).unwrap_err();
    assert!(matches!(
        outside.kind,
        EvalErrorKind::IndexOutOfBounds { index: 4, .. }
    ));
}

#[test]
fn reversed_bounds_fail_declaration() {
    let mut env = Environment::new();
    let err = env
        .declare_table(&name("A"), TypeTag::Int, vec![Bounds::new(5, 1)])
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Declaration);
}

#[test]
fn whole_table_assignment_requires_same_bounds() {
    let mut env = Environment::new();
    let a = env
        .declare_table(&name("A"), TypeTag::Real, vec![Bounds::new(1, 2)])
        .unwrap();
    let b = env
        .declare_table(&name("B"), TypeTag::Int, vec![Bounds::new(1, 2)])
        .unwrap();
    let c = env
        .declare_table(&name("C"), TypeTag::Int, vec![Bounds::new(0, 2)])
        .unwrap();
    env.write_element(b, &[1], Value::Int(4)).unwrap();

    let copy = env.read(b).unwrap();
    env.assign_at(a, copy).unwrap();
    assert_eq!(env.read_element(a, &[1]).unwrap(), Value::Real(4.0));
    // The source is unaffected by later writes to the copy.
    env.write_element(a, &[1], Value::Real(0.5)).unwrap();
    assert_eq!(env.read_element(b, &[1]).unwrap(), Value::Int(4));

    let wrong_shape = env.read(c).unwrap();
    let err = env.assign_at(a, wrong_shape).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Argument);

    let err = env.assign_at(a, Value::Int(1)).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Type);
}

#[test]
fn string_indexing() {
    let mut env = Environment::new();
    let at = env
        .declare_scalar(&name("s"), TypeTag::Str, Some(Value::string("кот")))
        .unwrap();
    assert_eq!(env.read_element(at, &[1]).unwrap(), Value::Char('к'));
    env.write_element(at, &[3], Value::Char('д')).unwrap();
    assert_eq!(env.read(at).unwrap(), Value::string("код"));

    let err = env.read_element(at, &[0]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::IndexOutOfBounds { .. }));
    let err = env.read_element(at, &[1, 1]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::IndexArity { .. }));
}

#[test]
fn scalars_are_not_indexable() {
    let mut env = Environment::new();
    let at = env
        .declare_scalar(&name("n"), TypeTag::Int, Some(Value::Int(1)))
        .unwrap();
    let err = env.read_element(at, &[1]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Type);
}

#[test]
fn table_parameter_copy_is_independent() {
    let mut source = Table::new("A", TypeTag::Int, vec![Bounds::new(1, 1)]).unwrap();
    source.set(&[1], Value::Int(1)).unwrap();
    let mut env = Environment::new();
    env.push_frame();
    let at = env
        .declare_table_value(&name("p"), TypeTag::Int, source.clone())
        .unwrap();
    env.write_element(at, &[1], Value::Int(9)).unwrap();
    assert_eq!(source.get(&[1]).unwrap(), &Value::Int(1));
}
