//! Binary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch over operand kinds. `и`/`или` short-circuit
//! in the expression evaluator; by the time they reach this module both
//! operands are already evaluated.

use kumir_ir::BinaryOp;
use kumir_value::{
    binary_type_mismatch, division_by_zero, domain_error, integer_overflow,
    invalid_binary_op_for, EvalResult, Value,
};

/// Checked integer arithmetic where the only failure is overflow.
#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Floor division: the quotient rounds toward negative infinity.
pub(crate) fn floor_div(a: i64, b: i64) -> EvalResult<i64> {
    if b == 0 {
        return Err(division_by_zero());
    }
    let q = a.checked_div(b).ok_or_else(|| integer_overflow("div"))?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Floor modulo: the result takes the divisor's sign.
pub(crate) fn floor_mod(a: i64, b: i64) -> EvalResult<i64> {
    if b == 0 {
        return Err(division_by_zero());
    }
    let r = a.checked_rem(b).ok_or_else(|| integer_overflow("mod"))?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

/// Evaluate a binary operation on two already evaluated operands.
///
/// Mixed `цел`/`вещ` arithmetic widens to `вещ`; `/` always yields `вещ`.
/// `+` concatenates when either side is `лит` or `сим`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Operands are consumed values produced by the evaluator"
)]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Int(_) | Value::Real(_), Value::Int(_) | Value::Real(_)) => {
            match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => eval_real_binary(a, b, op),
                _ => Err(binary_type_mismatch(
                    &left.type_name(),
                    &right.type_name(),
                    op,
                )),
            }
        }
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(_) | Value::Char(_), Value::Str(_) | Value::Char(_)) => {
            eval_text_binary(&left, &right, op)
        }
        (Value::Color(a), Value::Color(b)) => eval_color_binary(a, b, op),
        _ => Err(binary_type_mismatch(
            &left.type_name(),
            &right.type_name(),
            op,
        )),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "division of цел values is defined on вещ"
)]
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => {
            if b == 0 {
                return Err(division_by_zero());
            }
            Ok(Value::Real(a as f64 / b as f64))
        }
        BinaryOp::Pow => int_pow(a, b),
        BinaryOp::IntDiv => floor_div(a, b).map(Value::Int),
        BinaryOp::Mod => floor_mod(a, b).map(Value::Int),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::And | BinaryOp::Or => Err(invalid_binary_op_for("цел", op)),
    }
}

/// `цел ** цел`: an integer for non-negative exponents, `вещ` otherwise.
#[expect(
    clippy::cast_precision_loss,
    reason = "negative powers are defined on вещ"
)]
fn int_pow(base: i64, exp: i64) -> EvalResult {
    if exp < 0 {
        return real_result((base as f64).powf(exp as f64), "**");
    }
    let result = match base {
        0 => Some(i64::from(exp == 0)),
        1 => Some(1),
        -1 => Some(if exp % 2 == 0 { 1 } else { -1 }),
        _ => u32::try_from(exp).ok().and_then(|e| base.checked_pow(e)),
    };
    checked_arith(result, "exponentiation")
}

fn real_result(value: f64, function: &str) -> EvalResult {
    if value.is_nan() {
        Err(domain_error(function, "result is not a number"))
    } else if value.is_infinite() {
        Err(domain_error(function, "result is out of range"))
    } else {
        Ok(Value::Real(value))
    }
}

#[expect(
    clippy::float_cmp,
    reason = "Kumir = on вещ is exact comparison"
)]
fn eval_real_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => real_result(a + b, "+"),
        BinaryOp::Sub => real_result(a - b, "-"),
        BinaryOp::Mul => real_result(a * b, "*"),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(division_by_zero());
            }
            real_result(a / b, "/")
        }
        BinaryOp::Pow => real_result(a.powf(b), "**"),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::IntDiv | BinaryOp::Mod | BinaryOp::And | BinaryOp::Or => {
            Err(invalid_binary_op_for("вещ", op))
        }
    }
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => Ok(Value::Bool(a && b)),
        BinaryOp::Or => Ok(Value::Bool(a || b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        _ => Err(invalid_binary_op_for("лог", op)),
    }
}

/// `лит` and `сим` operands; a `сим` behaves as a one-character `лит`.
fn eval_text_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    let (a, b) = (text_of(left), text_of(right));
    match op {
        BinaryOp::Add => Ok(Value::Str(a + &b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(invalid_binary_op_for(&left.type_name(), op)),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Char(c) => c.to_string(),
        Value::Str(s) => s.clone(),
        other => other.to_display_string(),
    }
}

fn eval_color_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        _ => Err(invalid_binary_op_for("цвет", op)),
    }
}
