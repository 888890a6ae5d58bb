//! RAII guard for call frames.
//!
//! [`ScopedInterpreter`] pushes an environment frame on creation and pops
//! it in `Drop`, so the frame is released on every exit path of a call,
//! early `?` returns and unwinding included.

use std::ops::{Deref, DerefMut};

use super::Interpreter;

/// Access the interpreter through this guard; it implements `Deref` and
/// `DerefMut`. Dropping it pops the frame it pushed.
pub(crate) struct ScopedInterpreter<'guard, 'p> {
    interpreter: &'guard mut Interpreter<'p>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        tracing::trace!(depth = self.interpreter.env.depth(), "pop frame");
        self.interpreter.env.pop_frame();
    }
}

impl<'p> Deref for ScopedInterpreter<'_, 'p> {
    type Target = Interpreter<'p>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'p> Interpreter<'p> {
    /// Push a frame and return a guard that pops it on drop.
    pub(crate) fn scoped(&mut self) -> ScopedInterpreter<'_, 'p> {
        self.env.push_frame();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a fresh frame.
    pub(crate) fn with_frame<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'p>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }
}
