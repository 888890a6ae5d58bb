//! Kumir execution engine.
//!
//! Turns a `kumir_ir::Program` into observable behavior: variable storage,
//! typed value semantics, the three-mode call protocol, expression
//! evaluation, and statement control flow.
//!
//! # Architecture
//!
//! - [`Environment`]: frame stack of declared variables and tables
//! - [`AlgorithmRegistry`]: user algorithms, registered once per program
//! - [`BuiltinRegistry`]: closed table of builtin functions and procedures
//! - [`Interpreter`]: expression evaluator, call protocol, statement executor
//!
//! Control flow is returned, never thrown: statements produce an
//! [`Outcome`] (`Normal`, `Break`, `Continue`, `AlgorithmExit`, `Stop`) and
//! each construct that can absorb an outcome does so explicitly.
//!
//! All mutable state lives in one [`Interpreter`]; there are no
//! process-wide globals, so independent sessions can run side by side.

mod actuator;
mod builtins;
mod cancel;
pub mod diagnostics;
mod environment;
pub mod eval_mode;
mod interpreter;
mod io_handler;
mod operators;
mod procedures;
mod unary_operators;

pub use actuator::{Actuator, ActuatorError, DetachedActuator, Direction, GridActuator};
pub use builtins::{Builtin, BuiltinContext, BuiltinFunction, BuiltinProcedure, BuiltinRegistry};
pub use cancel::CancelToken;
pub use environment::{Environment, VarRef, Variable};
pub use eval_mode::EvalMode;
pub use interpreter::{CallOutcome, Interpreter, InterpreterBuilder, Outcome, RunOutcome, Unwind};
pub use io_handler::{
    buffer_handler, buffer_handler_with_input, console_handler, silent_handler,
    BufferIoHandler, ConsoleIoHandler, IoHandlerImpl, SharedIoHandler,
};
pub use operators::evaluate_binary;
pub use procedures::AlgorithmRegistry;
pub use unary_operators::evaluate_unary;

// Re-export the value layer so hosts need a single dependency.
pub use kumir_value::{
    coerce, default_value, Bounds, ErrorCategory, EvalBacktrace, EvalError, EvalErrorKind,
    EvalResult, Table, Value, MAX_INT,
};

#[cfg(test)]
mod tests;
