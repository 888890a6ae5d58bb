//! Conversions between numbers and text, shared with the `ввод` statement.

use kumir_ir::TypeTag::{Int, Real, Str};
use kumir_value::{domain_error, format_real, EvalResult, Value};

use super::{int_arg, real_arg, str_arg, BuiltinContext, BuiltinFunction};

pub(super) const FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction::new("цел_в_лит", &[Int], Str, int_to_str),
    BuiltinFunction::new("вещ_в_лит", &[Real], Str, real_to_str),
    BuiltinFunction::new("лит_в_цел", &[Str], Int, str_to_int),
    BuiltinFunction::new("лит_в_вещ", &[Str], Real, str_to_real),
];

/// Parse a `цел` literal: optional sign, decimal digits or `$`-prefixed hex.
pub(crate) fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = match digits.strip_prefix('$') {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            i64::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse::<i64>().ok()?
        }
        None => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a `вещ` literal; `,` is accepted as the decimal separator.
pub(crate) fn parse_real(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    let looks_numeric = normalized
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    if normalized.is_empty() || !looks_numeric {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a `лог` answer.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "да" | "истина" | "true" | "1" => Some(true),
        "нет" | "ложь" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn int_to_str(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Str(int_arg(args, 0)?.to_string()))
}

fn real_to_str(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Str(format_real(real_arg(args, 0)?)))
}

fn str_to_int(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let text = str_arg(args, 0)?;
    parse_int(text)
        .map(Value::Int)
        .ok_or_else(|| domain_error("лит_в_цел", format!("\"{text}\" is not an integer")))
}

fn str_to_real(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let text = str_arg(args, 0)?;
    parse_real(text)
        .map(Value::Real)
        .ok_or_else(|| domain_error("лит_в_вещ", format!("\"{text}\" is not a number")))
}
