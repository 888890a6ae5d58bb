//! Statement execution.

use rustc_hash::FxHashSet;

use kumir_ir::{
    AssertKind, AssignTarget, Declaration, Expr, Name, ParamMode, Span, Stmt, StmtKind, SwitchArm,
};
use kumir_stack::ensure_sufficient_stack;
use kumir_value::{
    assertion_failed, duplicate_variable, non_integer_bound, undefined_algorithm, wrong_arg_count,
    Bounds, EvalResult, Value,
};

use super::{CallOutcome, ExecResult, Interpreter, Outcome, Place, ValueResult};
use crate::builtins::{Builtin, BuiltinProcedure};

/// A resolved assignment or input target.
pub(crate) enum Target {
    Place(Place),
    ReturnSlot,
}

impl<'p> Interpreter<'p> {
    /// Run statements in order, stopping at the first non-`Normal` outcome.
    pub(crate) fn exec_block(&mut self, stmts: &'p [Stmt]) -> ExecResult {
        for stmt in stmts {
            let outcome = self.exec_stmt(stmt)?;
            if outcome != Outcome::Normal {
                return Ok(outcome);
            }
        }
        Ok(Outcome::Normal)
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &'p Stmt) -> ExecResult {
        tracing::trace!(span = %stmt.span, "exec");
        self.check_interrupts()
            .map_err(|err| err.or_span(stmt.span))?;
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt)).map_err(|err| err.or_span(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &'p Stmt) -> ExecResult {
        match &stmt.kind {
            StmtKind::Declare(decl) => self.exec_declare(decl, stmt.span),
            StmtKind::Assign { target, value } => {
                let target = value_or_stop!(self.resolve_target(target));
                let value = value_or_stop!(self.eval_expr(value));
                self.store(&target, value)?;
                Ok(Outcome::Normal)
            }
            StmtKind::Output { items } => self.exec_output(items),
            StmtKind::Input { targets } => self.exec_input(targets),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if value_or_stop!(self.eval_condition(cond)) {
                    self.exec_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch)
                } else {
                    Ok(Outcome::Normal)
                }
            }
            StmtKind::Switch { arms, default } => self.exec_switch(arms, default.as_deref()),
            StmtKind::Loop(form) => self.exec_loop(form),
            StmtKind::LoopExit => Ok(Outcome::Break),
            StmtKind::LoopContinue => Ok(Outcome::Continue),
            StmtKind::AlgorithmExit => Ok(Outcome::AlgorithmExit),
            StmtKind::Call { callee, args } => self.exec_call(callee, args, stmt.span),
            StmtKind::Assert { kind, cond, source } => self.check_assertion(*kind, cond, source),
            StmtKind::Stop => {
                tracing::debug!(span = %stmt.span, "стоп");
                Ok(Outcome::Stop)
            }
            StmtKind::Pause => {
                self.io.pause()?;
                Ok(Outcome::Normal)
            }
        }
    }

    /// Items of one statement share its site, so a name repeated within the
    /// statement is rejected here rather than re-initialized.
    fn exec_declare(&mut self, decl: &Declaration, site: Span) -> ExecResult {
        let mut seen = FxHashSet::default();
        if let Some(item) = decl.items.iter().find(|item| !seen.insert(&item.name)) {
            return Err(duplicate_variable(item.name.as_str()));
        }
        for item in &decl.items {
            let init = match &item.init {
                Some(expr) => Some(value_or_stop!(self.eval_expr(expr))),
                None => None,
            };
            if !decl.is_table {
                self.env
                    .declare_scalar_at(&item.name, decl.ty, init, site)?;
                continue;
            }

            let mut bounds = Vec::with_capacity(item.bounds.len());
            for pair in &item.bounds {
                let lower = value_or_stop!(self.eval_bound(&item.name, &pair.lower));
                let upper = value_or_stop!(self.eval_bound(&item.name, &pair.upper));
                bounds.push(Bounds::new(lower, upper));
            }
            let at = self
                .env
                .declare_table_at(&item.name, decl.ty, bounds, site)?;
            if let Some(value) = init {
                self.env.assign_at(at, value)?;
            }
        }
        Ok(Outcome::Normal)
    }

    fn eval_bound(&mut self, name: &Name, expr: &Expr) -> ValueResult<i64> {
        match self.eval_expr(expr)? {
            Value::Int(v) => Ok(v),
            other => Err(non_integer_bound(name.as_str(), &other.type_name()).into()),
        }
    }

    /// The first arm whose condition holds runs; otherwise the default.
    fn exec_switch(&mut self, arms: &'p [SwitchArm], default: Option<&'p [Stmt]>) -> ExecResult {
        for arm in arms {
            if value_or_stop!(self.eval_condition(&arm.cond)) {
                return self.exec_block(&arm.body);
            }
        }
        match default {
            Some(body) => self.exec_block(body),
            None => Ok(Outcome::Normal),
        }
    }

    /// `утв`, `дано`, `надо`: a false condition is an error.
    pub(crate) fn check_assertion(
        &mut self,
        kind: AssertKind,
        cond: &Expr,
        source: &str,
    ) -> ExecResult {
        if value_or_stop!(self.eval_condition(cond)) {
            Ok(Outcome::Normal)
        } else {
            Err(assertion_failed(kind.keyword(), source).or_span(cond.span))
        }
    }

    pub(crate) fn resolve_target(&mut self, target: &AssignTarget) -> ValueResult<Target> {
        match target {
            AssignTarget::Var(name) => Ok(Target::Place(Place::Var(self.env.find(name)?))),
            AssignTarget::Element { name, indices } => {
                let at = self.env.find(name)?;
                let indices = self.eval_indices(indices)?;
                Ok(Target::Place(Place::Element(at, indices)))
            }
            AssignTarget::ReturnSlot => Ok(Target::ReturnSlot),
        }
    }

    pub(crate) fn store(&mut self, target: &Target, value: Value) -> EvalResult<()> {
        match target {
            Target::Place(place) => self.write_place(place, value),
            Target::ReturnSlot => self.set_return_value(value),
        }
    }

    fn exec_call(&mut self, callee: &Name, args: &[Expr], span: Span) -> ExecResult {
        match self.builtins.get(callee).copied() {
            Some(Builtin::Procedure(procedure)) => {
                return self.exec_builtin_procedure(procedure, args);
            }
            Some(Builtin::Function(function)) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(value_or_stop!(self.eval_expr(arg)));
                }
                function.call(&mut self.builtin_context(), values)?;
                return Ok(Outcome::Normal);
            }
            None => {}
        }

        let def = self
            .algorithms
            .get(callee)
            .ok_or_else(|| undefined_algorithm(callee.as_str()))?;
        let bound = value_or_stop!(self.bind_args(def, args));
        match self.invoke(def, bound, span)? {
            CallOutcome::Completed(_) => Ok(Outcome::Normal),
            CallOutcome::Stopped => Ok(Outcome::Stop),
        }
    }

    fn exec_builtin_procedure(&mut self, procedure: BuiltinProcedure, args: &[Expr]) -> ExecResult {
        if args.len() != procedure.params.len() {
            return Err(wrong_arg_count(procedure.name, procedure.params.len(), args.len()));
        }
        let mut values = Vec::with_capacity(args.len());
        let mut places = Vec::new();
        for (index, (arg, &(_, mode))) in args.iter().zip(procedure.params).enumerate() {
            if !mode.writes_back() {
                values.push(value_or_stop!(self.eval_expr(arg)));
                continue;
            }
            let param = format!("#{}", index + 1);
            let place = value_or_stop!(self.resolve_place(arg, procedure.name, &param));
            values.push(if mode == ParamMode::InOut {
                self.read_place(&place).map_err(|err| err.or_span(arg.span))?
            } else {
                Value::Void
            });
            places.push((index, place));
        }

        procedure.call(&mut self.builtin_context(), &mut values)?;

        for (index, place) in places {
            let value = std::mem::replace(&mut values[index], Value::Void);
            self.write_place(&place, value)?;
        }
        Ok(Outcome::Normal)
    }
}
