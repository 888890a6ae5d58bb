//! Closed registry of builtin functions and procedures.
//!
//! The evaluator consults this table before user algorithms. Functions take
//! only `арг` parameters and may appear in expressions; procedures run in
//! statement position and may declare `аргрез` parameters, whose final
//! values the interpreter writes back to the caller's variables.
//!
//! Arguments are arity-checked and coerced to the declared parameter types
//! here, so implementations can read them with the `*_arg` helpers.

mod convert;
mod math;
mod random;
mod robot;
mod strings;
mod system;

use std::fmt;
use std::time::Instant;

use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

use kumir_ir::{Name, ParamMode, TypeTag};
use kumir_value::{coerce, default_value, type_mismatch, wrong_arg_count, EvalResult, Value};

use crate::{Actuator, CancelToken};

pub(crate) use convert::{parse_bool, parse_int, parse_real};

/// Session resources a builtin may touch.
pub struct BuiltinContext<'a> {
    pub rng: &'a mut StdRng,
    pub actuator: &'a mut dyn Actuator,
    pub cancel: &'a CancelToken,
    /// Session start, for `время`.
    pub started: Instant,
}

type FunctionImpl = fn(&mut BuiltinContext<'_>, &[Value]) -> EvalResult;
type ProcedureImpl = fn(&mut BuiltinContext<'_>, &mut [Value]) -> EvalResult<()>;

/// A builtin usable in expressions.
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub params: &'static [TypeTag],
    pub returns: TypeTag,
    imp: FunctionImpl,
}

impl BuiltinFunction {
    const fn new(
        name: &'static str,
        params: &'static [TypeTag],
        returns: TypeTag,
        imp: FunctionImpl,
    ) -> Self {
        BuiltinFunction {
            name,
            params,
            returns,
            imp,
        }
    }

    /// Check arity, coerce the arguments, and run.
    pub fn call(&self, ctx: &mut BuiltinContext<'_>, args: Vec<Value>) -> EvalResult {
        if args.len() != self.params.len() {
            return Err(wrong_arg_count(self.name, self.params.len(), args.len()));
        }
        let args = args
            .into_iter()
            .zip(self.params)
            .map(|(arg, &ty)| coerce(arg, ty))
            .collect::<EvalResult<Vec<_>>>()?;
        (self.imp)(ctx, &args)
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// A builtin usable only as a statement.
#[derive(Clone, Copy)]
pub struct BuiltinProcedure {
    pub name: &'static str,
    pub params: &'static [(TypeTag, ParamMode)],
    imp: ProcedureImpl,
}

impl BuiltinProcedure {
    const fn new(
        name: &'static str,
        params: &'static [(TypeTag, ParamMode)],
        imp: ProcedureImpl,
    ) -> Self {
        BuiltinProcedure { name, params, imp }
    }

    /// Check arity, coerce `арг`/`аргрез` arguments, reset `рез` ones, and
    /// run. On success `args` holds the final parameter values.
    pub fn call(&self, ctx: &mut BuiltinContext<'_>, args: &mut [Value]) -> EvalResult<()> {
        if args.len() != self.params.len() {
            return Err(wrong_arg_count(self.name, self.params.len(), args.len()));
        }
        for (arg, &(ty, mode)) in args.iter_mut().zip(self.params) {
            *arg = match mode {
                ParamMode::Out => default_value(ty),
                ParamMode::In | ParamMode::InOut => {
                    coerce(std::mem::replace(arg, Value::Void), ty)?
                }
            };
        }
        (self.imp)(ctx, args)
    }
}

impl fmt::Debug for BuiltinProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinProcedure")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Builtin {
    Function(BuiltinFunction),
    Procedure(BuiltinProcedure),
}

/// Name → builtin table, one per interpreter.
#[derive(Clone, Debug)]
pub struct BuiltinRegistry {
    entries: FxHashMap<Name, Builtin>,
}

impl BuiltinRegistry {
    /// The full standard library.
    pub fn standard() -> Self {
        let functions = [
            math::FUNCTIONS,
            random::FUNCTIONS,
            strings::FUNCTIONS,
            convert::FUNCTIONS,
            robot::FUNCTIONS,
            system::FUNCTIONS,
        ];
        let procedures = [strings::PROCEDURES, robot::PROCEDURES, system::PROCEDURES];

        let mut entries = FxHashMap::default();
        for function in functions.into_iter().flatten() {
            entries.insert(Name::new(function.name), Builtin::Function(*function));
        }
        for procedure in procedures.into_iter().flatten() {
            entries.insert(Name::new(procedure.name), Builtin::Procedure(*procedure));
        }
        BuiltinRegistry { entries }
    }

    #[inline]
    pub fn get(&self, name: &Name) -> Option<&Builtin> {
        self.entries.get(name)
    }

    pub fn function(&self, name: &Name) -> Option<&BuiltinFunction> {
        match self.entries.get(name) {
            Some(Builtin::Function(function)) => Some(function),
            _ => None,
        }
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// Argument accessors. Arguments are already coerced, so a mismatch here
// means a registry entry disagrees with its implementation.

#[cold]
fn arg_mismatch(expected: &str, got: Option<&Value>) -> kumir_value::EvalError {
    type_mismatch(expected, &got.map_or_else(|| "ничего".to_string(), Value::type_name))
}

fn int_arg(args: &[Value], i: usize) -> EvalResult<i64> {
    match args.get(i) {
        Some(Value::Int(v)) => Ok(*v),
        other => Err(arg_mismatch("цел", other)),
    }
}

fn real_arg(args: &[Value], i: usize) -> EvalResult<f64> {
    match args.get(i) {
        Some(Value::Real(v)) => Ok(*v),
        other => Err(arg_mismatch("вещ", other)),
    }
}

fn bool_arg(args: &[Value], i: usize) -> EvalResult<bool> {
    match args.get(i) {
        Some(Value::Bool(v)) => Ok(*v),
        other => Err(arg_mismatch("лог", other)),
    }
}

fn char_arg(args: &[Value], i: usize) -> EvalResult<char> {
    match args.get(i) {
        Some(Value::Char(v)) => Ok(*v),
        other => Err(arg_mismatch("сим", other)),
    }
}

fn str_arg(args: &[Value], i: usize) -> EvalResult<&str> {
    match args.get(i) {
        Some(Value::Str(v)) => Ok(v),
        other => Err(arg_mismatch("лит", other)),
    }
}
