//! AST node types.
//!
//! A `Program` is an introduction (global declarations and statements)
//! followed by algorithm definitions; the first algorithm is the entry point.

mod expr;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind, IndexArg};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{
    AssertKind, AssignTarget, BoundPair, DeclItem, Declaration, Loop, OutputItem, Stmt, StmtKind,
    SwitchArm,
};

use crate::{Name, Span, Spanned, TypeTag};

/// Whole program as handed over by the front-end.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    #[cfg_attr(feature = "json", serde(default))]
    pub intro: Vec<Stmt>,
    #[cfg_attr(feature = "json", serde(default))]
    pub algorithms: Vec<AlgorithmDef>,
}

impl Program {
    /// The algorithm run after the introduction.
    pub fn main_algorithm(&self) -> Option<&AlgorithmDef> {
        self.algorithms.first()
    }
}

/// `алг` definition. Procedures have no return type.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmDef {
    pub name: Name,
    #[cfg_attr(feature = "json", serde(default))]
    pub params: Vec<Param>,
    #[cfg_attr(feature = "json", serde(default))]
    pub return_type: Option<TypeTag>,
    /// `дано`, checked once parameters are bound.
    #[cfg_attr(feature = "json", serde(default))]
    pub precondition: Option<Condition>,
    /// `надо`, checked after the body completes normally.
    #[cfg_attr(feature = "json", serde(default))]
    pub postcondition: Option<Condition>,
    pub body: Vec<Stmt>,
    #[cfg_attr(feature = "json", serde(default))]
    pub span: Span,
}

impl AlgorithmDef {
    pub fn procedure(name: &str, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        AlgorithmDef {
            name: Name::new(name),
            params,
            return_type: None,
            precondition: None,
            postcondition: None,
            body,
            span: Span::DUMMY,
        }
    }

    pub fn function(name: &str, return_type: TypeTag, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        AlgorithmDef {
            return_type: Some(return_type),
            ..AlgorithmDef::procedure(name, params, body)
        }
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        self.return_type.is_some()
    }
}

impl Spanned for AlgorithmDef {
    fn span(&self) -> Span {
        self.span
    }
}

/// Formal parameter.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: Name,
    pub ty: TypeTag,
    #[cfg_attr(feature = "json", serde(default))]
    pub mode: ParamMode,
    #[cfg_attr(feature = "json", serde(default))]
    pub is_table: bool,
}

impl Param {
    pub fn new(name: &str, ty: TypeTag, mode: ParamMode) -> Self {
        Param {
            name: Name::new(name),
            ty,
            mode,
            is_table: false,
        }
    }

    pub fn table(name: &str, ty: TypeTag, mode: ParamMode) -> Self {
        Param {
            is_table: true,
            ..Param::new(name, ty, mode)
        }
    }
}

/// Parameter passing mode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamMode {
    /// `арг`: value in.
    #[default]
    In,
    /// `рез`: value out.
    Out,
    /// `аргрез`: value in and out.
    InOut,
}

impl ParamMode {
    pub const fn keyword(self) -> &'static str {
        match self {
            ParamMode::In => "арг",
            ParamMode::Out => "рез",
            ParamMode::InOut => "аргрез",
        }
    }

    /// Whether the caller must supply a writable variable.
    #[inline]
    pub const fn writes_back(self) -> bool {
        matches!(self, ParamMode::Out | ParamMode::InOut)
    }
}

/// Header condition (`дано`/`надо`) with its source text for diagnostics.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub expr: Expr,
    pub source: String,
}
