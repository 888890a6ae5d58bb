//! Expression nodes.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use crate::{Name, Span, Spanned};

/// Expression node.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    #[cfg_attr(feature = "json", serde(default))]
    pub span: Span,
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    // Literals
    Int(i64),
    Real(f64),
    Bool(bool),
    Char(char),
    Str(String),

    /// Variable, or a bare call of a zero-argument function.
    Ident(Name),
    /// `знач` read inside a function body.
    ReturnSlot,

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Name,
        #[cfg_attr(feature = "json", serde(default))]
        args: Vec<Expr>,
    },
    /// `A[i, j]` on a table, `s[i]` / `s[i:j]` on a string.
    Index {
        target: Name,
        indices: Vec<IndexArg>,
    },
}

/// One component of an index list.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexArg {
    Single(Expr),
    Slice { from: Expr, to: Expr },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn int(value: i64) -> Self {
        Expr::new(ExprKind::Int(value), Span::DUMMY)
    }

    pub fn real(value: f64) -> Self {
        Expr::new(ExprKind::Real(value), Span::DUMMY)
    }

    pub fn bool(value: bool) -> Self {
        Expr::new(ExprKind::Bool(value), Span::DUMMY)
    }

    pub fn char(value: char) -> Self {
        Expr::new(ExprKind::Char(value), Span::DUMMY)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::new(ExprKind::Str(value.into()), Span::DUMMY)
    }

    pub fn ident(name: &str) -> Self {
        Expr::new(ExprKind::Ident(Name::new(name)), Span::DUMMY)
    }

    pub fn return_slot() -> Self {
        Expr::new(ExprKind::ReturnSlot, Span::DUMMY)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Span::DUMMY,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            Span::DUMMY,
        )
    }

    pub fn call(callee: &str, args: Vec<Expr>) -> Self {
        Expr::new(
            ExprKind::Call {
                callee: Name::new(callee),
                args,
            },
            Span::DUMMY,
        )
    }

    /// Single-component indexing, `target[i, j, ...]`.
    pub fn index(target: &str, indices: Vec<Expr>) -> Self {
        Expr::new(
            ExprKind::Index {
                target: Name::new(target),
                indices: indices.into_iter().map(IndexArg::Single).collect(),
            },
            Span::DUMMY,
        )
    }

    /// The variable this expression names, if it can serve as a write target.
    pub fn as_place(&self) -> Option<&Name> {
        match &self.kind {
            ExprKind::Ident(name) | ExprKind::Index { target: name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}
