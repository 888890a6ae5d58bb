//! Expression evaluation.

use kumir_ir::{BinaryOp, Expr, ExprKind, IndexArg, Name, TypeTag};
use kumir_stack::ensure_sufficient_stack;
use kumir_value::{
    index_out_of_bounds, non_bool_condition, not_implemented, not_indexable,
    procedure_in_expression, type_mismatch, undefined_algorithm, undefined_variable,
    uninitialized_variable, write_back_in_expression, EvalResult, Value,
};

use super::{CallOutcome, Interpreter, Unwind, ValueResult};
use crate::builtins::Builtin;
use crate::{evaluate_binary, evaluate_unary, VarRef};

impl<'p> Interpreter<'p> {
    /// Evaluate `expr` to a value.
    ///
    /// Errors without a position take the span of the innermost node that
    /// has one.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> ValueResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
            .map_err(|unwind| unwind.or_span(expr.span))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> ValueResult {
        match &expr.kind {
            ExprKind::Int(v) => Ok(Value::Int(*v)),
            ExprKind::Real(v) => Ok(Value::Real(*v)),
            ExprKind::Bool(v) => Ok(Value::Bool(*v)),
            ExprKind::Char(c) => Ok(Value::Char(*c)),
            ExprKind::Str(s) => Ok(Value::string(s.as_str())),
            ExprKind::Ident(name) => self.eval_ident(name, expr),
            ExprKind::ReturnSlot => Ok(self.return_value()?),
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                Ok(evaluate_unary(value, *op)?)
            }
            ExprKind::Call { callee, args } => self.eval_call(callee, args, expr),
            ExprKind::Index { target, indices } => self.eval_index(target, indices),
        }
    }

    /// A name is a variable first; otherwise a bare call of a
    /// zero-argument function.
    fn eval_ident(&mut self, name: &Name, expr: &Expr) -> ValueResult {
        if let Some(at) = self.env.lookup(name) {
            return Ok(self.env.read(at)?);
        }
        if self.builtins.contains(name) || self.algorithms.contains(name) {
            return self.eval_call(name, &[], expr);
        }
        Err(undefined_variable(name.as_str()).into())
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> ValueResult {
        match op {
            BinaryOp::And | BinaryOp::Or => {
                let lhs = self.eval_expr(left)?;
                let Value::Bool(lhs) = lhs else {
                    return Ok(evaluate_binary(lhs, self.eval_expr(right)?, op)?);
                };
                if lhs == (op == BinaryOp::Or) {
                    return Ok(Value::Bool(lhs));
                }
                let rhs = self.eval_expr(right)?;
                Ok(evaluate_binary(Value::Bool(lhs), rhs, op)?)
            }
            _ => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Ok(evaluate_binary(lhs, rhs, op)?)
            }
        }
    }

    /// A call in expression position must produce a value, so procedures
    /// and functions with write-back parameters are rejected.
    pub(crate) fn eval_call(&mut self, callee: &Name, args: &[Expr], call: &Expr) -> ValueResult {
        match self.builtins.get(callee).copied() {
            Some(Builtin::Function(function)) => {
                let values = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<ValueResult<Vec<_>>>()?;
                return Ok(function.call(&mut self.builtin_context(), values)?);
            }
            Some(Builtin::Procedure(_)) => {
                return Err(procedure_in_expression(callee.as_str()).into());
            }
            None => {}
        }

        let def = self
            .algorithms
            .get(callee)
            .ok_or_else(|| undefined_algorithm(callee.as_str()))?;
        if !def.is_function() {
            return Err(procedure_in_expression(callee.as_str()).into());
        }
        if def.params.iter().any(|p| p.mode.writes_back()) {
            return Err(write_back_in_expression(callee.as_str()).into());
        }
        let bound = self.bind_args(def, args)?;
        match self.invoke(def, bound, call.span)? {
            CallOutcome::Completed(value) => Ok(value),
            CallOutcome::Stopped => Err(Unwind::Stop),
        }
    }

    fn eval_index(&mut self, target: &Name, indices: &[IndexArg]) -> ValueResult {
        let at = self.env.find(target)?;
        if let [IndexArg::Slice { from, to }] = indices {
            let from = self.eval_int(from)?;
            let to = self.eval_int(to)?;
            return Ok(self.substring(target, at, from, to)?);
        }
        let indices = self.eval_indices(indices)?;
        Ok(self.env.read_element(at, &indices)?)
    }

    /// `s[from:to]`, 1-based and inclusive. `to = from - 1` is the empty string.
    #[expect(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        reason = "indices are range-checked against the string length first"
    )]
    fn substring(&self, target: &Name, at: VarRef, from: i64, to: i64) -> EvalResult {
        let var = self.env.variable(at);
        let text = match var.value() {
            Some(Value::Str(text)) => text,
            None if var.ty() == TypeTag::Str && !var.is_table() => {
                return Err(uninitialized_variable(target.as_str()))
            }
            Some(Value::Table(_)) => return Err(not_implemented("срез таблицы")),
            _ => return Err(not_indexable(target.as_str(), &var.type_name())),
        };
        let len = text.chars().count() as i64;
        if from < 1 || from > len + 1 {
            return Err(index_out_of_bounds(target.as_str(), from, 1, len));
        }
        if to < from - 1 || to > len {
            return Err(index_out_of_bounds(target.as_str(), to, from - 1, len));
        }
        let piece: String = text
            .chars()
            .skip((from - 1) as usize)
            .take((to - from + 1) as usize)
            .collect();
        Ok(Value::string(piece))
    }

    /// Evaluate an integer-valued expression: an index, bound, or counter.
    pub(crate) fn eval_int(&mut self, expr: &Expr) -> ValueResult<i64> {
        match self.eval_expr(expr)? {
            Value::Int(v) => Ok(v),
            other => {
                Err(Unwind::from(type_mismatch("цел", &other.type_name())).or_span(expr.span))
            }
        }
    }

    /// Evaluate a condition; it must be `лог`.
    pub(crate) fn eval_condition(&mut self, expr: &Expr) -> ValueResult<bool> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(Unwind::from(non_bool_condition(&other.type_name())).or_span(expr.span)),
        }
    }
}
