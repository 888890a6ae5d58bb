//! Stack growth for the recursive tree walk.
//!
//! Kumir programs recurse through user algorithms, and every level of
//! program recursion costs several host frames (statement dispatch,
//! expression evaluation, call protocol). Wrapping those entry points in
//! [`ensure_sufficient_stack`] moves the limit from the host thread's stack
//! size to available memory.
//!
//! - **Native targets**: `stacker` allocates a fresh segment when less than
//!   the red zone remains.
//! - **WASM targets**: passthrough.
//!
//! Growth is not a guarantee: a program that recurses without bound still
//! exhausts memory. Hosts that need a hard ceiling configure a call-depth
//! limit on the interpreter instead.

/// Grow when less than this much stack remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, when the platform can report it.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
