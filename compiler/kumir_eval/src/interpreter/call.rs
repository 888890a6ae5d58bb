//! The call protocol for user algorithms.
//!
//! 1. Arity and per-argument type/shape checks, in the caller's frame.
//! 2. `рез`/`аргрез` arguments resolve to a [`Place`] in the caller: a
//!    direct handle captured once, before the callee's frame exists.
//! 3. Push the call frame, bind parameters, check `дано`, run the body,
//!    absorb `AlgorithmExit`, check `надо`, collect output values.
//! 4. Pop the frame, then copy the outputs back, unless the body stopped.

use std::sync::Arc;

use kumir_ir::{AlgorithmDef, AssertKind, Expr, ExprKind, IndexArg, Param, ParamMode, Span, TypeTag};
use kumir_value::{
    coerce, default_value, is_assignable, not_implemented, out_argument_not_variable,
    outside_loop, return_outside_function, shape_mismatch, type_mismatch, wrong_arg_count,
    EvalError, EvalNote, EvalResult, Value,
};

use super::{CallOutcome, Interpreter, Outcome, ValueResult};
use crate::diagnostics::{CallFrame, ReturnSlot};
use crate::VarRef;

/// Caller-side write target of an output parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Place {
    Var(VarRef),
    Element(VarRef, Vec<i64>),
}

/// An evaluated actual argument.
#[derive(Clone, Debug)]
pub(crate) struct BoundArg {
    /// Incoming value. `None` only for `рез` scalars; `рез` tables carry the
    /// caller's table so the parameter can take its bounds.
    value: Option<Value>,
    /// Where the final value goes, for `рез`/`аргрез`.
    target: Option<Place>,
}

impl BoundArg {
    pub(crate) fn input(value: Value) -> Self {
        BoundArg {
            value: Some(value),
            target: None,
        }
    }
}

enum BodyOutcome {
    Completed(Vec<(Place, Value)>),
    Stopped,
}

fn shape_name(is_table: bool) -> &'static str {
    if is_table {
        "таблица"
    } else {
        "скаляр"
    }
}

/// Type and shape check of a value passed for `param`.
pub(crate) fn check_arg(param: &Param, value: &Value) -> EvalResult<()> {
    match value {
        Value::Table(table) => {
            if !param.is_table {
                return Err(shape_mismatch(param.name.as_str(), shape_name(false)));
            }
            let elem = table.elem_type();
            if elem != param.ty && !(elem == TypeTag::Int && param.ty == TypeTag::Real) {
                return Err(type_mismatch(
                    &format!("{}таб", param.ty),
                    &value.type_name(),
                ));
            }
        }
        _ => {
            if param.is_table {
                return Err(shape_mismatch(param.name.as_str(), shape_name(true)));
            }
            if !is_assignable(value.type_tag(), param.ty) {
                return Err(type_mismatch(param.ty.keyword(), &value.type_name()));
            }
        }
    }
    Ok(())
}

/// Point a rejected argument at the parameter's declaration.
pub(crate) fn declared_as(err: EvalError, def: &AlgorithmDef, param: &Param) -> EvalError {
    let table = if param.is_table { "таб" } else { "" };
    let message = format!(
        "parameter `{}` of `{}` is declared `{} {}{table}`",
        param.name,
        def.name,
        param.mode.keyword(),
        param.ty,
    );
    let note = if def.span.is_dummy() {
        EvalNote::new(message)
    } else {
        EvalNote::with_span(message, def.span)
    };
    err.with_note(note)
}

impl<'p> Interpreter<'p> {
    /// Evaluate the actual arguments of a call to `def` in the caller's frame.
    pub(crate) fn bind_args(
        &mut self,
        def: &AlgorithmDef,
        args: &[Expr],
    ) -> ValueResult<Vec<BoundArg>> {
        if args.len() != def.params.len() {
            let err = wrong_arg_count(def.name.as_str(), def.params.len(), args.len());
            return Err(err.into());
        }
        def.params
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                self.bind_arg(def, param, arg)
                    .map_err(|unwind| unwind.or_span(arg.span))
            })
            .collect()
    }

    fn bind_arg(&mut self, def: &AlgorithmDef, param: &Param, arg: &Expr) -> ValueResult<BoundArg> {
        if param.mode == ParamMode::In {
            let value = self.eval_expr(arg)?;
            check_arg(param, &value).map_err(|err| declared_as(err, def, param))?;
            return Ok(BoundArg::input(value));
        }

        let place = self.resolve_place(arg, def.name.as_str(), param.name.as_str())?;
        let (ty, is_table) = self.place_type(&place);
        if is_table != param.is_table {
            let err = shape_mismatch(param.name.as_str(), shape_name(param.is_table));
            return Err(declared_as(err, def, param).into());
        }
        let accepts_result = is_assignable(param.ty, ty);
        let supplies_value = param.mode == ParamMode::Out || is_assignable(ty, param.ty);
        if !accepts_result || !supplies_value {
            let err = type_mismatch(param.ty.keyword(), ty.keyword());
            return Err(declared_as(err, def, param).into());
        }
        let value = match (param.mode, param.is_table) {
            (ParamMode::Out, false) => None,
            _ => Some(self.read_place(&place)?),
        };
        Ok(BoundArg {
            value,
            target: Some(place),
        })
    }

    /// Resolve an argument expression to a caller-side variable or element.
    pub(crate) fn resolve_place(
        &mut self,
        arg: &Expr,
        algorithm: &str,
        param: &str,
    ) -> ValueResult<Place> {
        match &arg.kind {
            ExprKind::Ident(name) => Ok(Place::Var(self.env.find(name)?)),
            ExprKind::Index { target, indices } => {
                let at = self.env.find(target)?;
                let indices = self.eval_indices(indices)?;
                Ok(Place::Element(at, indices))
            }
            _ => Err(out_argument_not_variable(algorithm, param).into()),
        }
    }

    /// Evaluate single indices; slices are only readable.
    pub(crate) fn eval_indices(&mut self, indices: &[IndexArg]) -> ValueResult<Vec<i64>> {
        indices
            .iter()
            .map(|index| match index {
                IndexArg::Single(expr) => self.eval_int(expr),
                IndexArg::Slice { .. } => Err(not_implemented("срез как место записи").into()),
            })
            .collect()
    }

    /// Declared type and table-ness of what `place` stores.
    pub(crate) fn place_type(&self, place: &Place) -> (TypeTag, bool) {
        match place {
            Place::Var(at) => {
                let var = self.env.variable(*at);
                (var.ty(), var.is_table())
            }
            Place::Element(at, _) => {
                let var = self.env.variable(*at);
                if var.is_table() {
                    (var.ty(), false)
                } else {
                    (TypeTag::Char, false)
                }
            }
        }
    }

    pub(crate) fn read_place(&self, place: &Place) -> EvalResult {
        match place {
            Place::Var(at) => self.env.read(*at),
            Place::Element(at, indices) => self.env.read_element(*at, indices),
        }
    }

    pub(crate) fn write_place(&mut self, place: &Place, value: Value) -> EvalResult<()> {
        match place {
            Place::Var(at) => self.env.assign_at(*at, value),
            Place::Element(at, indices) => self.env.write_element(*at, indices, value),
        }
    }

    /// Run `def` with already bound arguments.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(algorithm = %def.name, depth = self.call_stack.depth())
    )]
    pub(crate) fn invoke(
        &mut self,
        def: &'p AlgorithmDef,
        args: Vec<BoundArg>,
        call_span: Span,
    ) -> EvalResult<CallOutcome> {
        if args.len() != def.params.len() {
            let err = wrong_arg_count(def.name.as_str(), def.params.len(), args.len());
            return Err(err.or_span(call_span));
        }
        self.call_stack
            .push(CallFrame {
                name: def.name.clone(),
                call_span: (!call_span.is_dummy()).then_some(call_span),
                return_slot: def.return_type.map(|ty| ReturnSlot {
                    ty,
                    value: default_value(ty),
                }),
            })
            .map_err(|err| err.or_span(call_span))?;

        let outcome = self
            .with_frame(|scoped| scoped.run_body(def, args))
            .map_err(|err| self.call_stack.attach_backtrace(err));
        let frame = self.call_stack.pop();

        match outcome? {
            BodyOutcome::Stopped => Ok(CallOutcome::Stopped),
            BodyOutcome::Completed(writes) => {
                for (place, value) in writes {
                    self.write_place(&place, value)
                        .map_err(|err| err.or_span(call_span))?;
                }
                let result = frame
                    .and_then(|frame| frame.return_slot)
                    .map_or(Value::Void, |slot| slot.value);
                Ok(CallOutcome::Completed(result))
            }
        }
    }

    /// Step 3 of the protocol, inside the callee's frame.
    fn run_body(&mut self, def: &'p AlgorithmDef, args: Vec<BoundArg>) -> EvalResult<BodyOutcome> {
        let mut outputs = Vec::new();
        for (param, arg) in def.params.iter().zip(args) {
            let local = self
                .bind_param(param, arg.value)
                .map_err(|err| err.or_span(def.span))?;
            if let Some(target) = arg.target {
                outputs.push((local, target));
            }
        }

        if let Some(pre) = &def.precondition {
            let outcome = self.check_assertion(AssertKind::Precondition, &pre.expr, &pre.source)?;
            if outcome == Outcome::Stop {
                return Ok(BodyOutcome::Stopped);
            }
        }

        match self.exec_block(&def.body)? {
            Outcome::Normal => {}
            Outcome::AlgorithmExit => tracing::debug!(algorithm = %def.name, "algorithm exit"),
            Outcome::Stop => return Ok(BodyOutcome::Stopped),
            Outcome::Break => return Err(outside_loop("выход")),
            Outcome::Continue => return Err(outside_loop("продолжить")),
        }

        if let Some(post) = &def.postcondition {
            let outcome =
                self.check_assertion(AssertKind::Postcondition, &post.expr, &post.source)?;
            if outcome == Outcome::Stop {
                return Ok(BodyOutcome::Stopped);
            }
        }

        let writes = outputs
            .into_iter()
            .map(|(local, place)| self.env.read(local).map(|value| (place, value)))
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(BodyOutcome::Completed(writes))
    }

    /// Declare one parameter in the callee's frame.
    fn bind_param(&mut self, param: &Param, value: Option<Value>) -> EvalResult<VarRef> {
        match (param.is_table, param.mode, value) {
            (true, ParamMode::Out, Some(Value::Table(caller))) => {
                self.env
                    .declare_table(&param.name, param.ty, caller.bounds().to_vec())
            }
            (true, _, Some(Value::Table(table))) => self.env.declare_table_value(
                &param.name,
                param.ty,
                Arc::unwrap_or_clone(table),
            ),
            (false, ParamMode::Out, _) => {
                self.env
                    .declare_scalar(&param.name, param.ty, Some(default_value(param.ty)))
            }
            (false, _, Some(value)) if !value.is_table() => {
                self.env.declare_scalar(&param.name, param.ty, Some(value))
            }
            _ => Err(shape_mismatch(param.name.as_str(), shape_name(param.is_table))),
        }
    }

    /// `знач := value` in the innermost function call.
    pub(crate) fn set_return_value(&mut self, value: Value) -> EvalResult<()> {
        let slot = self
            .call_stack
            .current_mut()
            .and_then(|frame| frame.return_slot.as_mut())
            .ok_or_else(return_outside_function)?;
        slot.value = coerce(value, slot.ty)?;
        Ok(())
    }

    /// Current value of `знач` in the innermost function call.
    pub(crate) fn return_value(&self) -> EvalResult {
        self.call_stack
            .current()
            .and_then(|frame| frame.return_slot.as_ref())
            .map(|slot| slot.value.clone())
            .ok_or_else(return_outside_function)
    }
}
