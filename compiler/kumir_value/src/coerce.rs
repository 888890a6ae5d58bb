//! Coercion rules shared by assignment, parameter binding, and copy-back.
//!
//! - `цел` → `вещ` always widens; `вещ` → `цел` is never implicit.
//! - `лог`, `сим`, `лит` accept only their own kind, except that a `сим`
//!   becomes a one-character `лит` and a one-character `лит` becomes a `сим`
//!   where the target requires it.
//! - Every `цел` write is range-checked against ±`MAX_INT`.

use kumir_ir::TypeTag;

use crate::value::{Value, COLOR_NAMES, MAX_INT};
use crate::{integer_out_of_range, type_mismatch, EvalResult};

/// Convert `value` for storage in a slot of type `target`.
#[expect(
    clippy::cast_precision_loss,
    reason = "range-checked цел values convert to вещ exactly"
)]
pub fn coerce(value: Value, target: TypeTag) -> EvalResult {
    match (value, target) {
        (Value::Int(v), TypeTag::Int) => check_int_range(v).map(Value::Int),
        (Value::Int(v), TypeTag::Real) => {
            check_int_range(v)?;
            Ok(Value::Real(v as f64))
        }
        (value @ Value::Real(_), TypeTag::Real)
        | (value @ Value::Bool(_), TypeTag::Bool)
        | (value @ Value::Char(_), TypeTag::Char)
        | (value @ Value::Str(_), TypeTag::Str)
        | (value @ Value::Color(_), TypeTag::Color)
        | (value @ Value::Table(_), TypeTag::Table) => Ok(value),
        (Value::Char(c), TypeTag::Str) => Ok(Value::Str(c.to_string())),
        (Value::Str(s), TypeTag::Char) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(type_mismatch("сим", "лит")),
            }
        }
        (Value::Str(s), TypeTag::Color) => {
            let lowered = s.to_lowercase();
            if COLOR_NAMES.contains(&lowered.as_str()) {
                Ok(Value::Color(lowered))
            } else {
                Err(type_mismatch("цвет", "лит"))
            }
        }
        (value, target) => Err(type_mismatch(target.keyword(), &value.type_name())),
    }
}

/// Whether a value of kind `from` may be stored into a slot of kind `to`.
///
/// A `true` answer can still fail at run time for the content-checked
/// conversions (`лит` → `сим`, `лит` → `цвет`, out-of-range `цел`).
pub fn is_assignable(from: TypeTag, to: TypeTag) -> bool {
    from == to
        || matches!(
            (from, to),
            (TypeTag::Int, TypeTag::Real)
                | (TypeTag::Char, TypeTag::Str)
                | (TypeTag::Str, TypeTag::Char)
                | (TypeTag::Str, TypeTag::Color)
        )
}

/// Value an `рез` parameter or a function's return slot starts with.
pub fn default_value(ty: TypeTag) -> Value {
    match ty {
        TypeTag::Int => Value::Int(0),
        TypeTag::Real => Value::Real(0.0),
        TypeTag::Bool => Value::Bool(false),
        TypeTag::Char => Value::Char(' '),
        TypeTag::Str => Value::Str(String::new()),
        TypeTag::Color => Value::Color(COLOR_NAMES[0].to_string()),
        TypeTag::Table | TypeTag::Void | TypeTag::Unknown => Value::Void,
    }
}

/// Enforce `-MAX_INT <= v <= MAX_INT`.
#[inline]
pub fn check_int_range(v: i64) -> EvalResult<i64> {
    if (-MAX_INT..=MAX_INT).contains(&v) {
        Ok(v)
    } else {
        Err(integer_out_of_range(v))
    }
}

#[cfg(test)]
mod tests;
