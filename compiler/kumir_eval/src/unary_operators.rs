//! Unary operator implementations for the evaluator.

use kumir_ir::UnaryOp;
use kumir_value::{integer_overflow, invalid_unary_op_for, EvalResult, Value};

/// Evaluate a unary operation using direct pattern matching.
///
/// Negation and plus follow the numeric rules of their binary
/// counterparts; `не` accepts only `лог`.
pub fn evaluate_unary(value: Value, op: UnaryOp) -> EvalResult {
    match (value, op) {
        (Value::Int(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (Value::Real(f), UnaryOp::Neg) => Ok(Value::Real(-f)),
        (value @ (Value::Int(_) | Value::Real(_)), UnaryOp::Plus) => Ok(value),
        (Value::Bool(b), UnaryOp::Not) => Ok(Value::Bool(!b)),
        (value, op) => Err(invalid_unary_op_for(&value.type_name(), op)),
    }
}
