#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use kumir_ir::TypeTag;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::ErrorCategory;

#[test]
fn int_widens_to_real() {
    assert_eq!(coerce(Value::Int(3), TypeTag::Real).unwrap(), Value::Real(3.0));
}

#[test]
fn real_never_narrows_to_int() {
    let err = coerce(Value::Real(3.0), TypeTag::Int).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Type);
}

#[test]
fn scalars_accept_only_their_kind() {
    assert!(coerce(Value::Bool(true), TypeTag::Int).is_err());
    assert!(coerce(Value::Int(1), TypeTag::Bool).is_err());
    assert!(coerce(Value::Int(65), TypeTag::Char).is_err());
    assert!(coerce(Value::string("да"), TypeTag::Bool).is_err());
    assert!(coerce(Value::Real(1.0), TypeTag::Str).is_err());
}

#[test]
fn char_and_single_char_string_interchange() {
    assert_eq!(
        coerce(Value::Char('я'), TypeTag::Str).unwrap(),
        Value::string("я")
    );
    assert_eq!(
        coerce(Value::string("я"), TypeTag::Char).unwrap(),
        Value::Char('я')
    );
    assert!(coerce(Value::string("яя"), TypeTag::Char).is_err());
    assert!(coerce(Value::string(""), TypeTag::Char).is_err());
}

#[test]
fn colors_from_known_names() {
    assert_eq!(
        coerce(Value::string("Красный"), TypeTag::Color).unwrap(),
        Value::Color("красный".into())
    );
    assert!(coerce(Value::string("бирюзовый"), TypeTag::Color).is_err());
}

#[test]
fn pseudo_types_reject_everything() {
    assert!(coerce(Value::Int(1), TypeTag::Void).is_err());
    assert!(coerce(Value::Int(1), TypeTag::Unknown).is_err());
}

#[test]
fn int_range_is_checked_on_write() {
    assert_eq!(coerce(Value::Int(MAX_INT), TypeTag::Int).unwrap(), Value::Int(MAX_INT));
    assert_eq!(
        coerce(Value::Int(-MAX_INT), TypeTag::Int).unwrap(),
        Value::Int(-MAX_INT)
    );
    let err = coerce(Value::Int(MAX_INT + 1), TypeTag::Int).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Argument);
    assert!(coerce(Value::Int(-MAX_INT - 1), TypeTag::Int).is_err());
}

#[test]
fn defaults() {
    assert_eq!(default_value(TypeTag::Int), Value::Int(0));
    assert_eq!(default_value(TypeTag::Real), Value::Real(0.0));
    assert_eq!(default_value(TypeTag::Bool), Value::Bool(false));
    assert_eq!(default_value(TypeTag::Char), Value::Char(' '));
    assert_eq!(default_value(TypeTag::Str), Value::string(""));
    assert_eq!(default_value(TypeTag::Color), Value::Color("белый".into()));
    assert_eq!(default_value(TypeTag::Void), Value::Void);
}

#[test]
fn static_assignability() {
    assert!(is_assignable(TypeTag::Int, TypeTag::Real));
    assert!(!is_assignable(TypeTag::Real, TypeTag::Int));
    assert!(is_assignable(TypeTag::Char, TypeTag::Str));
    assert!(is_assignable(TypeTag::Str, TypeTag::Char));
    assert!(!is_assignable(TypeTag::Bool, TypeTag::Str));
    assert!(is_assignable(TypeTag::Table, TypeTag::Table));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn stored_ints_stay_in_range(v in any::<i64>()) {
        match coerce(Value::Int(v), TypeTag::Int) {
            Ok(Value::Int(stored)) => prop_assert!((-MAX_INT..=MAX_INT).contains(&stored)),
            Ok(other) => prop_assert!(false, "unexpected value {other:?}"),
            Err(err) => {
                prop_assert!(!(-MAX_INT..=MAX_INT).contains(&v));
                prop_assert_eq!(err.category(), ErrorCategory::Argument);
            }
        }
    }

    #[test]
    fn widening_preserves_value(v in -MAX_INT..=MAX_INT) {
        #[expect(clippy::cast_precision_loss, reason = "exact for цел range")]
        let expected = v as f64;
        prop_assert_eq!(coerce(Value::Int(v), TypeTag::Real).unwrap(), Value::Real(expected));
    }
}
