//! Error types for the Kumir runtime.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the structured data of each failure; every kind
//! belongs to exactly one `ErrorCategory` (declaration, name, type,
//! argument, evaluation, runtime, not-implemented). Factory functions
//! (e.g., `division_by_zero()`) are the public API for building errors;
//! they fill both `kind` and `message`.
//!
//! Control outcomes (loop exit, algorithm exit, stop) are not errors and
//! never pass through this module.

use kumir_ir::{BinaryOp, Span, UnaryOp};
use std::fmt;

/// User-facing error class of an `EvalError`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Duplicate or invalid declarations and bounds.
    Declaration,
    /// Unknown identifier or algorithm.
    Name,
    /// Assignment, argument, return, or operator type mismatch.
    Type,
    /// Arity or value-domain violations.
    Argument,
    /// Uninitialized reads, division by zero, generic evaluation failures.
    Eval,
    /// Assertion failures and other general faults.
    Runtime,
    /// Constructs the engine does not support.
    NotImplemented,
}

impl ErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Declaration => "DeclarationError",
            Self::Name => "NameError",
            Self::Type => "TypeError",
            Self::Argument => "ArgumentError",
            Self::Eval => "EvalError",
            Self::Runtime => "RuntimeError",
            Self::NotImplemented => "NotImplementedError",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed error kind.
///
/// The `Display` impl produces the message stored on `EvalError`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Declaration
    DuplicateVariable {
        name: String,
    },
    DuplicateAlgorithm {
        name: String,
    },
    InvalidBounds {
        name: String,
        lower: i64,
        upper: i64,
    },
    NonIntegerBound {
        name: String,
        got: String,
    },
    UndeclarableType {
        name: String,
        ty: String,
    },
    TableReturnType {
        name: String,
    },

    // Name
    UndefinedVariable {
        name: String,
    },
    UndefinedAlgorithm {
        name: String,
    },

    // Type
    TypeMismatch {
        expected: String,
        got: String,
    },
    InvalidBinaryOp {
        type_name: String,
        op: BinaryOp,
    },
    BinaryTypeMismatch {
        left: String,
        right: String,
        op: BinaryOp,
    },
    InvalidUnaryOp {
        type_name: String,
        op: UnaryOp,
    },
    NonBoolCondition {
        got: String,
    },
    ProcedureInExpression {
        name: String,
    },
    ShapeMismatch {
        name: String,
        expected: &'static str,
    },
    NotIndexable {
        name: String,
        type_name: String,
    },
    InvalidInput {
        name: String,
        expected: String,
        text: String,
    },

    // Argument
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    IntegerOutOfRange {
        value: i64,
    },
    Domain {
        function: String,
        detail: String,
    },
    OutArgumentNotVariable {
        algorithm: String,
        param: String,
    },
    WriteBackInExpression {
        name: String,
    },
    TableShapeMismatch {
        expected: String,
        got: String,
    },

    // Eval
    DivisionByZero,
    IntegerOverflow {
        operation: String,
    },
    UninitializedVariable {
        name: String,
    },
    UninitializedElement {
        name: String,
        indices: Vec<i64>,
    },
    IndexOutOfBounds {
        name: String,
        index: i64,
        lower: i64,
        upper: i64,
    },
    IndexArity {
        name: String,
        expected: usize,
        got: usize,
    },

    // Runtime
    AssertionFailed {
        keyword: &'static str,
        source: String,
    },
    ZeroStep,
    OutsideLoop {
        statement: &'static str,
    },
    ReturnOutsideFunction,
    StackOverflow {
        depth: usize,
    },
    BudgetExceeded {
        budget: u64,
    },
    Cancelled,
    Actuator {
        message: String,
    },
    MainWithParameters {
        name: String,
    },
    InputUnavailable {
        detail: String,
    },

    // Not Implemented
    NotImplemented {
        feature: String,
    },

    /// Catch-all for errors without a structured kind.
    Custom {
        category: ErrorCategory,
        message: String,
    },
}

impl EvalErrorKind {
    /// The user-facing class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateVariable { .. }
            | Self::DuplicateAlgorithm { .. }
            | Self::InvalidBounds { .. }
            | Self::NonIntegerBound { .. }
            | Self::UndeclarableType { .. }
            | Self::TableReturnType { .. } => ErrorCategory::Declaration,

            Self::UndefinedVariable { .. } | Self::UndefinedAlgorithm { .. } => ErrorCategory::Name,

            Self::TypeMismatch { .. }
            | Self::InvalidBinaryOp { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::InvalidUnaryOp { .. }
            | Self::NonBoolCondition { .. }
            | Self::ProcedureInExpression { .. }
            | Self::ShapeMismatch { .. }
            | Self::NotIndexable { .. }
            | Self::InvalidInput { .. } => ErrorCategory::Type,

            Self::ArityMismatch { .. }
            | Self::IntegerOutOfRange { .. }
            | Self::Domain { .. }
            | Self::OutArgumentNotVariable { .. }
            | Self::WriteBackInExpression { .. }
            | Self::TableShapeMismatch { .. } => ErrorCategory::Argument,

            Self::DivisionByZero
            | Self::IntegerOverflow { .. }
            | Self::UninitializedVariable { .. }
            | Self::UninitializedElement { .. }
            | Self::IndexOutOfBounds { .. }
            | Self::IndexArity { .. } => ErrorCategory::Eval,

            Self::AssertionFailed { .. }
            | Self::ZeroStep
            | Self::OutsideLoop { .. }
            | Self::ReturnOutsideFunction
            | Self::StackOverflow { .. }
            | Self::BudgetExceeded { .. }
            | Self::Cancelled
            | Self::Actuator { .. }
            | Self::MainWithParameters { .. }
            | Self::InputUnavailable { .. } => ErrorCategory::Runtime,

            Self::NotImplemented { .. } => ErrorCategory::NotImplemented,

            Self::Custom { category, .. } => *category,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Declaration
            Self::DuplicateVariable { name } => {
                write!(f, "variable `{name}` is already declared in this scope")
            }
            Self::DuplicateAlgorithm { name } => {
                write!(f, "algorithm `{name}` is already defined")
            }
            Self::InvalidBounds { name, lower, upper } => write!(
                f,
                "invalid bounds [{lower}:{upper}] for table `{name}`: lower bound exceeds upper"
            ),
            Self::NonIntegerBound { name, got } => {
                write!(f, "bound of table `{name}` must be цел, got {got}")
            }
            Self::UndeclarableType { name, ty } => {
                write!(f, "cannot declare `{name}` with type {ty}")
            }
            Self::TableReturnType { name } => {
                write!(f, "function `{name}` cannot return a table")
            }

            // Name
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::UndefinedAlgorithm { name } => write!(f, "undefined algorithm: {name}"),

            // Type
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::InvalidBinaryOp { type_name, op } => write!(
                f,
                "operator `{}` cannot be applied to {type_name}",
                op.as_symbol()
            ),
            Self::BinaryTypeMismatch { left, right, op } => write!(
                f,
                "operator `{}` cannot be applied to {left} and {right}",
                op.as_symbol()
            ),
            Self::InvalidUnaryOp { type_name, op } => write!(
                f,
                "unary `{}` cannot be applied to {type_name}",
                op.as_symbol()
            ),
            Self::NonBoolCondition { got } => write!(f, "condition must be лог, got {got}"),
            Self::ProcedureInExpression { name } => write!(
                f,
                "procedure `{name}` returns no value and cannot be used in an expression"
            ),
            Self::ShapeMismatch { name, expected } => {
                write!(f, "`{name}` expects a {expected} value")
            }
            Self::NotIndexable { name, type_name } => {
                write!(f, "`{name}` of type {type_name} cannot be indexed")
            }
            Self::InvalidInput {
                name,
                expected,
                text,
            } => write!(f, "cannot read {expected} value for `{name}` from {text:?}"),

            // Argument
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "{name} expects {expected} {arg_word}, got {got}")
            }
            Self::IntegerOutOfRange { value } => {
                write!(f, "integer {value} is outside the цел range")
            }
            Self::Domain { function, detail } => write!(f, "{function}: {detail}"),
            Self::OutArgumentNotVariable { algorithm, param } => write!(
                f,
                "argument for result parameter `{param}` of `{algorithm}` must be a variable"
            ),
            Self::WriteBackInExpression { name } => write!(
                f,
                "`{name}` has result parameters and cannot be called from an expression"
            ),
            Self::TableShapeMismatch { expected, got } => {
                write!(f, "table shape mismatch: expected {expected}, got {got}")
            }

            // Eval
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            Self::UninitializedVariable { name } => {
                write!(f, "variable `{name}` is used before it is assigned")
            }
            Self::UninitializedElement { name, indices } => {
                write!(f, "element {name}[{}] is used before it is assigned", join(indices))
            }
            Self::IndexOutOfBounds {
                name,
                index,
                lower,
                upper,
            } => write!(
                f,
                "index {index} of `{name}` is outside bounds [{lower}:{upper}]"
            ),
            Self::IndexArity {
                name,
                expected,
                got,
            } => write!(f, "`{name}` takes {expected} indices, got {got}"),

            // Runtime
            Self::AssertionFailed { keyword, source } => {
                write!(f, "{keyword} failed: {source}")
            }
            Self::ZeroStep => write!(f, "loop step is zero"),
            Self::OutsideLoop { statement } => {
                write!(f, "`{statement}` used outside of a loop")
            }
            Self::ReturnOutsideFunction => {
                write!(f, "`знач` used outside of a function")
            }
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::BudgetExceeded { budget } => {
                write!(f, "statement budget of {budget} exhausted")
            }
            Self::Cancelled => write!(f, "execution cancelled"),
            Self::Actuator { message } => write!(f, "actuator: {message}"),
            Self::MainWithParameters { name } => {
                write!(f, "main algorithm `{name}` must not take parameters")
            }
            Self::InputUnavailable { detail } => write!(f, "input unavailable: {detail}"),

            // Not Implemented
            Self::NotImplemented { feature } => write!(f, "{feature} is not supported"),

            Self::Custom { message, .. } => write!(f, "{message}"),
        }
    }
}

fn join(indices: &[i64]) -> String {
    indices
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Additional context note attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Algorithm name.
    pub name: String,
    /// Source location of the call site.
    pub span: Option<Span>,
}

/// Immutable snapshot of the call stack at an error site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    /// Frames, most recent call first.
    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "call stack:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured error kind.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Source location where the error occurred.
    pub span: Option<Span>,
    /// Call chain at the error site.
    pub backtrace: Option<EvalBacktrace>,
    /// Secondary context.
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    /// Create an error with a free-form message in the given category.
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_kind(EvalErrorKind::Custom {
            category,
            message,
        })
    }

    /// Create an error from a structured kind.
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            backtrace: None,
            notes: Vec::new(),
        }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

// Declaration

#[cold]
pub fn duplicate_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_algorithm(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateAlgorithm {
        name: name.to_string(),
    })
}

#[cold]
pub fn invalid_bounds(name: &str, lower: i64, upper: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBounds {
        name: name.to_string(),
        lower,
        upper,
    })
}

#[cold]
pub fn non_integer_bound(name: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonIntegerBound {
        name: name.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn undeclarable_type(name: &str, ty: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclarableType {
        name: name.to_string(),
        ty: ty.to_string(),
    })
}

#[cold]
pub fn table_return_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TableReturnType {
        name: name.to_string(),
    })
}

// Name

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_algorithm(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedAlgorithm {
        name: name.to_string(),
    })
}

// Type

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn invalid_binary_op_for(type_name: &str, op: BinaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidBinaryOp {
        type_name: type_name.to_string(),
        op,
    })
}

#[cold]
pub fn binary_type_mismatch(left: &str, right: &str, op: BinaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        left: left.to_string(),
        right: right.to_string(),
        op,
    })
}

#[cold]
pub fn invalid_unary_op_for(type_name: &str, op: UnaryOp) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        type_name: type_name.to_string(),
        op,
    })
}

#[cold]
pub fn non_bool_condition(got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonBoolCondition {
        got: got.to_string(),
    })
}

#[cold]
pub fn procedure_in_expression(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ProcedureInExpression {
        name: name.to_string(),
    })
}

/// `expected` is `"table"` or `"scalar"`.
#[cold]
pub fn shape_mismatch(name: &str, expected: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ShapeMismatch {
        name: name.to_string(),
        expected,
    })
}

#[cold]
pub fn not_indexable(name: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable {
        name: name.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn invalid_input(name: &str, expected: &str, text: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidInput {
        name: name.to_string(),
        expected: expected.to_string(),
        text: text.to_string(),
    })
}

// Argument

#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn integer_out_of_range(value: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOutOfRange { value })
}

#[cold]
pub fn domain_error(function: &str, detail: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Domain {
        function: function.to_string(),
        detail: detail.into(),
    })
}

#[cold]
pub fn out_argument_not_variable(algorithm: &str, param: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OutArgumentNotVariable {
        algorithm: algorithm.to_string(),
        param: param.to_string(),
    })
}

#[cold]
pub fn write_back_in_expression(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WriteBackInExpression {
        name: name.to_string(),
    })
}

#[cold]
pub fn table_shape_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TableShapeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

// Eval

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn uninitialized_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UninitializedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn uninitialized_element(name: &str, indices: &[i64]) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UninitializedElement {
        name: name.to_string(),
        indices: indices.to_vec(),
    })
}

#[cold]
pub fn index_out_of_bounds(name: &str, index: i64, lower: i64, upper: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds {
        name: name.to_string(),
        index,
        lower,
        upper,
    })
}

#[cold]
pub fn wrong_index_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexArity {
        name: name.to_string(),
        expected,
        got,
    })
}

// Runtime

#[cold]
pub fn assertion_failed(keyword: &'static str, source: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssertionFailed {
        keyword,
        source: source.to_string(),
    })
}

#[cold]
pub fn zero_step() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ZeroStep)
}

#[cold]
pub fn outside_loop(statement: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OutsideLoop { statement })
}

#[cold]
pub fn return_outside_function() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ReturnOutsideFunction)
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn budget_exceeded(budget: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BudgetExceeded { budget })
}

#[cold]
pub fn cancelled() -> EvalError {
    EvalError::from_kind(EvalErrorKind::Cancelled)
}

#[cold]
pub fn actuator_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Actuator {
        message: message.into(),
    })
}

#[cold]
pub fn main_with_parameters(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MainWithParameters {
        name: name.to_string(),
    })
}

#[cold]
pub fn input_unavailable(detail: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InputUnavailable {
        detail: detail.into(),
    })
}

// Not Implemented

#[cold]
pub fn not_implemented(feature: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotImplemented {
        feature: feature.to_string(),
    })
}

#[cfg(test)]
mod tests;
