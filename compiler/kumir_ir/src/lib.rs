//! Kumir IR - syntax tree types consumed by the execution engine.
//!
//! This crate contains the data structures a front-end produces and the
//! evaluator walks:
//! - `Span` for 1-based line/column source positions
//! - `Name` for case-normalized identifiers
//! - `TypeTag`/`TypeSpec` for declared types
//! - AST nodes (`Program`, `AlgorithmDef`, `Stmt`, `Expr`)
//!
//! # Design Philosophy
//!
//! - **Closed node sets**: every node kind is an enum variant, so the
//!   evaluator matches exhaustively and never meets an "unsupported node".
//! - **Distinct exits**: loop exit and algorithm exit are separate statement
//!   kinds; nothing is inferred from source text.
//! - **Front-end agnostic**: with the `json` feature the whole tree derives
//!   `serde`, so any parser can hand a program over as JSON.

pub mod ast;
mod name;
mod span;
mod types;

pub use ast::{
    AlgorithmDef, AssertKind, AssignTarget, BinaryOp, BoundPair, Condition, DeclItem,
    Declaration, Expr, ExprKind, IndexArg, Loop, OutputItem, Param, ParamMode, Program, Stmt,
    StmtKind, SwitchArm, UnaryOp,
};
pub use name::Name;
pub use span::{Span, Spanned};
pub use types::{TypeSpec, TypeTag};
