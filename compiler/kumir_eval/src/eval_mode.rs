//! Evaluation modes for the Kumir interpreter.
//!
//! `EvalMode` selects the resource policy of a run; `ModeState` holds the
//! per-run counters that policy needs.

/// Evaluation mode: determines interpreter limits via match dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Standard mode for `kumir run`: no call-depth limit (the host stack
    /// grows on demand) and no statement budget.
    #[default]
    Interpret,
    /// Bounded mode for tests and hosts running untrusted programs.
    Sandboxed {
        /// Maximum number of nested algorithm calls.
        max_call_depth: usize,
        /// Maximum number of statements executed before aborting.
        statement_budget: u64,
    },
}

impl EvalMode {
    /// Maximum call depth, or `None` for unlimited (native `stacker` growth).
    #[inline]
    pub fn max_call_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => {
                #[cfg(target_arch = "wasm32")]
                {
                    Some(200)
                }
                #[cfg(not(target_arch = "wasm32"))]
                {
                    None
                }
            }
            Self::Sandboxed { max_call_depth, .. } => Some(*max_call_depth),
        }
    }

    #[inline]
    pub fn statement_budget(&self) -> Option<u64> {
        match self {
            Self::Interpret => None,
            Self::Sandboxed {
                statement_budget, ..
            } => Some(*statement_budget),
        }
    }
}

/// Per-run counters for the active mode.
#[derive(Debug, Default)]
pub struct ModeState {
    statements: u64,
    budget: Option<u64>,
}

impl ModeState {
    pub fn new(mode: &EvalMode) -> Self {
        Self {
            statements: 0,
            budget: mode.statement_budget(),
        }
    }

    /// Count one statement and check it against the budget.
    #[inline]
    pub fn check_budget(&mut self) -> Result<(), BudgetExceeded> {
        self.statements = self.statements.saturating_add(1);
        match self.budget {
            Some(budget) if self.statements > budget => Err(BudgetExceeded { budget }),
            _ => Ok(()),
        }
    }

    /// Statements dispatched so far in this run.
    #[inline]
    pub fn statements_executed(&self) -> u64 {
        self.statements
    }
}

/// The statement budget of a sandboxed run ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetExceeded {
    pub budget: u64,
}

impl From<BudgetExceeded> for kumir_value::EvalError {
    fn from(exceeded: BudgetExceeded) -> Self {
        kumir_value::budget_exceeded(exceeded.budget)
    }
}
