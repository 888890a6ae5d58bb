//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::Interpreter;
use crate::diagnostics::CallStack;
use crate::eval_mode::{EvalMode, ModeState};
use crate::{
    buffer_handler, console_handler, Actuator, AlgorithmRegistry, BuiltinRegistry, CancelToken,
    DetachedActuator, Environment, SharedIoHandler,
};

/// Builder for creating Interpreter instances.
///
/// Defaults depend on the mode: `Interpret` talks to the console,
/// `Sandboxed` writes into a buffer and reads no input. No robot is
/// attached unless one is given.
#[derive(Default)]
pub struct InterpreterBuilder {
    mode: EvalMode,
    io: Option<SharedIoHandler>,
    actuator: Option<Box<dyn Actuator>>,
    cancel: Option<CancelToken>,
    seed: Option<u64>,
}

impl InterpreterBuilder {
    /// Create a new builder with default `Interpret` mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation mode (call-depth limit and statement budget).
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the I/O collaborator. Overrides the mode-based default.
    #[must_use]
    pub fn io_handler(mut self, handler: SharedIoHandler) -> Self {
        self.io = Some(handler);
        self
    }

    #[must_use]
    pub fn actuator(mut self, actuator: Box<dyn Actuator>) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Share a cancellation token with the host.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Seed the random generator for reproducible runs.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build<'p>(self) -> Interpreter<'p> {
        let io = self.io.unwrap_or_else(|| match self.mode {
            EvalMode::Interpret => console_handler(),
            EvalMode::Sandboxed { .. } => buffer_handler(),
        });
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Interpreter {
            env: Environment::new(),
            algorithms: AlgorithmRegistry::new(),
            builtins: BuiltinRegistry::standard(),
            call_stack: CallStack::new(self.mode.max_call_depth()),
            mode_state: ModeState::new(&self.mode),
            mode: self.mode,
            io,
            actuator: self
                .actuator
                .unwrap_or_else(|| Box::new(DetachedActuator)),
            cancel: self.cancel.unwrap_or_default(),
            rng,
            started: Instant::now(),
        }
    }
}
