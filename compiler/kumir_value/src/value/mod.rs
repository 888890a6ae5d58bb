//! Runtime values.
//!
//! `Value` is immutable: operations build new values, and the only in-place
//! mutation in the engine is a table element write, which goes through
//! `Arc::make_mut` on the owning variable's table.

mod table;

use std::fmt;
use std::sync::Arc;

use kumir_ir::TypeTag;

pub use table::{Bounds, Table};

/// Largest magnitude of a `цел` value.
pub const MAX_INT: i64 = 2_147_483_647;

/// Largest finite `вещ` value.
pub const MAX_REAL: f64 = f64::MAX;

/// Colors known to the robot field, in palette order.
pub const COLOR_NAMES: [&str; 10] = [
    "белый",
    "черный",
    "серый",
    "фиолетовый",
    "синий",
    "голубой",
    "зеленый",
    "желтый",
    "оранжевый",
    "красный",
];

/// Runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `цел`. Stored wide; the ±`MAX_INT` range is enforced on writes.
    Int(i64),
    /// `вещ`
    Real(f64),
    /// `лог`
    Bool(bool),
    /// `сим`
    Char(char),
    /// `лит`
    Str(String),
    /// `цвет`
    Color(String),
    /// Table value, shared copy-on-write.
    Table(Arc<Table>),
    /// Result of a procedure; never stored in a variable.
    Void,
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn table(table: Table) -> Self {
        Value::Table(Arc::new(table))
    }

    /// The type tag of this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Real(_) => TypeTag::Real,
            Value::Bool(_) => TypeTag::Bool,
            Value::Char(_) => TypeTag::Char,
            Value::Str(_) => TypeTag::Str,
            Value::Color(_) => TypeTag::Color,
            Value::Table(_) => TypeTag::Table,
            Value::Void => TypeTag::Void,
        }
    }

    /// Type name for diagnostics (`цел`, `вещтаб`, ...).
    pub fn type_name(&self) -> String {
        match self {
            Value::Table(table) => format!("{}таб", table.elem_type()),
            other => other.type_tag().keyword().to_string(),
        }
    }

    #[inline]
    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Numeric view for mixed `цел`/`вещ` arithmetic.
    #[expect(
        clippy::cast_precision_loss,
        reason = "цел values are bounded by MAX_INT and convert exactly"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Textual form used by output statements.
    ///
    /// `лог` renders as `да`/`нет`; characters and strings render raw.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Real(v) => format_real(*v),
            Value::Bool(true) => "да".to_string(),
            Value::Bool(false) => "нет".to_string(),
            Value::Char(c) => c.to_string(),
            Value::Str(s) | Value::Color(s) => s.clone(),
            Value::Table(table) => table.describe(),
            Value::Void => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Format a `вещ` value.
///
/// Integral values keep one decimal digit (`2.0`); magnitudes outside
/// `[1e-4, 1e16)` use exponent notation with a signed two-digit exponent
/// (`1e+16`, `1.5e-05`); everything else is the shortest round-trip form.
pub fn format_real(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let repr = format!("{v:e}");
        return match repr.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => repr,
        };
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
