//! The four loop forms.
//!
//! Each iteration is an interruption point, so an empty infinite loop still
//! observes cancellation and the statement budget.

use kumir_ir::{Expr, Loop, Name, Stmt};
use kumir_value::{zero_step, Value};

use super::{ExecResult, Interpreter, Outcome};

/// What a loop does with the outcome of one pass over its body:
/// `None` to keep iterating, `Some` to leave the loop with that outcome.
fn absorb(outcome: Outcome) -> Option<Outcome> {
    match outcome {
        Outcome::Normal | Outcome::Continue => None,
        Outcome::Break => Some(Outcome::Normal),
        Outcome::AlgorithmExit | Outcome::Stop => Some(outcome),
    }
}

impl<'p> Interpreter<'p> {
    pub(crate) fn exec_loop(&mut self, form: &'p Loop) -> ExecResult {
        match form {
            Loop::While { cond, body } => self.exec_while(cond, body),
            Loop::Repeat { body, until } => self.exec_repeat(body, until.as_ref()),
            Loop::For {
                var,
                from,
                to,
                step,
                body,
            } => self.exec_for(var, from, to, step.as_ref(), body),
            Loop::Times { count, body } => self.exec_times(count, body),
        }
    }

    fn exec_while(&mut self, cond: &Expr, body: &'p [Stmt]) -> ExecResult {
        loop {
            self.check_interrupts()?;
            if !value_or_stop!(self.eval_condition(cond)) {
                return Ok(Outcome::Normal);
            }
            if let Some(done) = absorb(self.exec_block(body)?) {
                return Ok(done);
            }
        }
    }

    /// Body first, then the exit condition. Without one, only `выход` ends it.
    fn exec_repeat(&mut self, body: &'p [Stmt], until: Option<&Expr>) -> ExecResult {
        loop {
            self.check_interrupts()?;
            if let Some(done) = absorb(self.exec_block(body)?) {
                return Ok(done);
            }
            if let Some(cond) = until {
                if value_or_stop!(self.eval_condition(cond)) {
                    return Ok(Outcome::Normal);
                }
            }
        }
    }

    /// Bounds and step are evaluated once. The counter is assigned before
    /// every pass and keeps its last assigned value afterwards.
    fn exec_for(
        &mut self,
        var: &Name,
        from: &Expr,
        to: &Expr,
        step: Option<&Expr>,
        body: &'p [Stmt],
    ) -> ExecResult {
        let counter = self.env.find(var)?;
        let start = value_or_stop!(self.eval_int(from));
        let end = value_or_stop!(self.eval_int(to));
        let step = match step {
            Some(expr) => value_or_stop!(self.eval_int(expr)),
            None => 1,
        };
        if step == 0 {
            return Err(zero_step());
        }

        let mut current = start;
        while (step > 0 && current <= end) || (step < 0 && current >= end) {
            self.check_interrupts()?;
            self.env.assign_at(counter, Value::Int(current))?;
            if let Some(done) = absorb(self.exec_block(body)?) {
                return Ok(done);
            }
            match current.checked_add(step) {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(Outcome::Normal)
    }

    /// A count of zero or less runs no iterations.
    fn exec_times(&mut self, count: &Expr, body: &'p [Stmt]) -> ExecResult {
        let count = value_or_stop!(self.eval_int(count));
        for _ in 0..count.max(0) {
            self.check_interrupts()?;
            if let Some(done) = absorb(self.exec_block(body)?) {
                return Ok(done);
            }
        }
        Ok(Outcome::Normal)
    }
}
