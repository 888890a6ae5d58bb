//! Tree-walking interpreter for Kumir programs.
//!
//! Statements return an [`Outcome`]; expressions return a value or an
//! [`Unwind`]. Neither loop exits nor `стоп` travel as errors: each
//! construct that can absorb an outcome matches on it explicitly.
//!
//! - loops absorb `Break` and `Continue`
//! - algorithm calls absorb `AlgorithmExit`
//! - [`Interpreter::run`] absorbs `Stop`

/// Evaluate an expression in statement context: a `стоп` raised inside a
/// function call becomes `Outcome::Stop`, errors propagate.
macro_rules! value_or_stop {
    ($e:expr) => {
        match $e {
            Ok(value) => value,
            Err($crate::interpreter::Unwind::Stop) => {
                return Ok($crate::interpreter::Outcome::Stop)
            }
            Err($crate::interpreter::Unwind::Error(err)) => return Err(err),
        }
    };
}

mod builder;
mod call;
mod exec;
mod expr;
mod io;
mod loops;
mod scope_guard;

use std::time::Instant;

use rand::rngs::StdRng;

use kumir_ir::{Name, Program, Span};
use kumir_value::{
    cancelled, main_with_parameters, out_argument_not_variable, undefined_algorithm, EvalError,
    EvalResult, Value,
};

use crate::builtins::{Builtin, BuiltinContext, BuiltinRegistry};
use crate::diagnostics::CallStack;
use crate::eval_mode::{EvalMode, ModeState};
use crate::{Actuator, AlgorithmRegistry, CancelToken, Environment, SharedIoHandler};

pub use builder::InterpreterBuilder;
pub(crate) use call::{BoundArg, Place};

/// How a statement or block finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Normal,
    /// `выход` inside a loop.
    Break,
    Continue,
    /// `выход` outside any loop.
    AlgorithmExit,
    /// `стоп`
    Stop,
}

/// Why expression evaluation stopped early.
#[derive(Clone, Debug, PartialEq)]
pub enum Unwind {
    /// A function called from the expression executed `стоп`.
    Stop,
    Error(EvalError),
}

impl Unwind {
    #[must_use]
    pub fn or_span(self, span: Span) -> Self {
        match self {
            Unwind::Stop => Unwind::Stop,
            Unwind::Error(err) => Unwind::Error(err.or_span(span)),
        }
    }
}

impl From<EvalError> for Unwind {
    fn from(err: EvalError) -> Self {
        Unwind::Error(err)
    }
}

pub(crate) type ExecResult = Result<Outcome, EvalError>;
pub(crate) type ValueResult<T = Value> = Result<T, Unwind>;

/// Result of calling one algorithm.
#[derive(Clone, Debug, PartialEq)]
pub enum CallOutcome {
    /// The function's result, or `Value::Void` for a procedure.
    Completed(Value),
    /// `стоп` was executed; no results were copied back.
    Stopped,
}

/// Result of running a whole program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Stopped,
}

/// One interpreter session. Owns every piece of mutable run state.
pub struct Interpreter<'p> {
    pub(crate) env: Environment,
    pub(crate) algorithms: AlgorithmRegistry<'p>,
    pub(crate) builtins: BuiltinRegistry,
    pub(crate) call_stack: CallStack,
    pub(crate) mode: EvalMode,
    pub(crate) mode_state: ModeState,
    pub(crate) io: SharedIoHandler,
    pub(crate) actuator: Box<dyn Actuator>,
    pub(crate) cancel: CancelToken,
    pub(crate) rng: StdRng,
    pub(crate) started: Instant,
}

impl<'p> Interpreter<'p> {
    /// An interpreter with default settings (console I/O, no robot).
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[inline]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    #[inline]
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    #[inline]
    pub fn io(&self) -> &SharedIoHandler {
        &self.io
    }

    #[inline]
    pub fn mode(&self) -> &EvalMode {
        &self.mode
    }

    #[inline]
    pub fn algorithms(&self) -> &AlgorithmRegistry<'p> {
        &self.algorithms
    }

    /// A handle that cancels this session from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn statements_executed(&self) -> u64 {
        self.mode_state.statements_executed()
    }

    /// Register every algorithm of `program`.
    pub fn register(&mut self, program: &'p Program) -> EvalResult<()> {
        for def in &program.algorithms {
            self.algorithms.register(def)?;
        }
        Ok(())
    }

    /// Run a program: register its algorithms, execute the introduction in
    /// the global frame, then call the main (first) algorithm.
    ///
    /// `стоп` ends the run with [`RunOutcome::Stopped`]; it is not an error.
    #[tracing::instrument(level = "debug", skip_all, fields(algorithms = program.algorithms.len()))]
    pub fn run(&mut self, program: &'p Program) -> EvalResult<RunOutcome> {
        self.register(program)?;

        match self.exec_block(&program.intro)? {
            Outcome::Stop => {
                tracing::debug!("stopped in the introduction");
                return Ok(RunOutcome::Stopped);
            }
            Outcome::Break | Outcome::Continue => {
                return Err(kumir_value::outside_loop("выход"));
            }
            Outcome::Normal | Outcome::AlgorithmExit => {}
        }

        let Some(main) = program.main_algorithm() else {
            return Ok(RunOutcome::Completed);
        };
        if !main.params.is_empty() {
            return Err(main_with_parameters(main.name.as_str()).or_span(main.span));
        }
        match self.invoke(main, Vec::new(), Span::DUMMY)? {
            CallOutcome::Completed(_) => Ok(RunOutcome::Completed),
            CallOutcome::Stopped => {
                tracing::debug!("program stopped");
                Ok(RunOutcome::Stopped)
            }
        }
    }

    /// Call an algorithm or builtin function by name from the host.
    ///
    /// Only `арг` parameters can be supplied this way.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> EvalResult<CallOutcome> {
        let name = Name::new(name);
        if let Some(Builtin::Function(function)) = self.builtins.get(&name).copied() {
            return function
                .call(&mut self.builtin_context(), args)
                .map(CallOutcome::Completed);
        }
        let def = self
            .algorithms
            .get(&name)
            .ok_or_else(|| undefined_algorithm(name.as_str()))?;
        if let Some(param) = def.params.iter().find(|p| p.mode.writes_back()) {
            return Err(out_argument_not_variable(
                def.name.as_str(),
                param.name.as_str(),
            ));
        }
        for (param, value) in def.params.iter().zip(&args) {
            call::check_arg(param, value).map_err(|err| call::declared_as(err, def, param))?;
        }
        let args = args.into_iter().map(BoundArg::input).collect();
        self.invoke(def, args, Span::DUMMY)
    }

    /// Cooperative interruption point: cancellation and statement budget.
    pub(crate) fn check_interrupts(&mut self) -> EvalResult<()> {
        if self.cancel.is_cancelled() {
            return Err(cancelled());
        }
        self.mode_state.check_budget()?;
        Ok(())
    }

    pub(crate) fn builtin_context(&mut self) -> BuiltinContext<'_> {
        BuiltinContext {
            rng: &mut self.rng,
            actuator: self.actuator.as_mut(),
            cancel: &self.cancel,
            started: self.started,
        }
    }
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
