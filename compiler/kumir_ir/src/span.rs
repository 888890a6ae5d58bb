//! Source positions.
//!
//! The front-end reports 1-based line/column pairs. The engine never
//! inspects them beyond carrying them into diagnostics.

use std::fmt;

/// Source position of a node.
///
/// `Span::DUMMY` (0:0) marks nodes synthesized without a source location.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Position for generated nodes.
    pub const DUMMY: Span = Span { line: 0, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Span { line, column }
    }

    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Nodes that carry a source position.
pub trait Spanned {
    fn span(&self) -> Span;
}
