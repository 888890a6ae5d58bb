//! Call tracking for the evaluator.
//!
//! - `CallStack`: active algorithm calls, with the depth limit folded into
//!   `push()`
//! - `CallFrame`: per-call metadata, including a function's return slot
//!
//! `CallStack` captures backtraces at error sites; the snapshot is stored on
//! `EvalError` as `EvalBacktrace` (defined in `kumir_value`).

use kumir_ir::{Name, Span, TypeTag};
use kumir_value::{BacktraceFrame, EvalBacktrace, EvalError, Value};

/// The `знач` slot of an active function call.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnSlot {
    pub ty: TypeTag,
    pub value: Value,
}

/// A single active call.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Algorithm name.
    pub name: Name,
    /// Where the call was made, not where the algorithm is defined.
    pub call_span: Option<Span>,
    /// Present only for functions.
    pub return_slot: Option<ReturnSlot>,
}

/// Live call stack for the interpreter.
///
/// Each algorithm call pushes a frame; completion pops it. The depth check
/// is integrated into `push()`.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` is `None` for unlimited or `Some(n)` for bounded modes.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a call frame, checking the depth limit.
    ///
    /// The frame is not pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(kumir_value::recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent call frame.
    pub fn pop(&mut self) -> Option<CallFrame> {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The innermost active call.
    pub fn current(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut CallFrame> {
        self.frames.last_mut()
    }

    /// Snapshot of the active calls, most recent first.
    pub fn capture(&self) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|f| BacktraceFrame {
                name: f.name.to_string(),
                span: f.call_span,
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace to `err` unless it already carries one.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}
