//! Kumir values and runtime errors.
//!
//! This crate is the Type System of the engine:
//! - `Value`: immutable tagged runtime values
//! - `Table`: bounded, sparse, multi-dimensional arrays
//! - `coerce`/`default_value`: assignment and parameter-binding rules
//! - `EvalError`: the single error type every evaluation step returns
//!
//! Tables are shared copy-on-write (`Arc<Table>`), so passing a table by
//! value is cheap and mutating a shared table never leaks to other holders.

mod coerce;
mod errors;
mod value;

pub use coerce::{check_int_range, coerce, default_value, is_assignable};
pub use errors::*;
pub use value::{format_real, Bounds, Table, Value, COLOR_NAMES, MAX_INT, MAX_REAL};

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;
