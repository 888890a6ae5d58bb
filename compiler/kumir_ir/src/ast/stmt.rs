//! Statement Types
//!
//! Statement node and variants for algorithm bodies. Blocks are plain
//! `Vec<Stmt>`; Kumir has no per-block scoping.

use std::fmt;

use super::expr::{Expr, IndexArg};
use crate::{Name, Span, Spanned, TypeTag};

/// Statement node.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    #[cfg_attr(feature = "json", serde(default))]
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl From<StmtKind> for Stmt {
    fn from(kind: StmtKind) -> Self {
        Stmt::new(kind, Span::DUMMY)
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    /// `цел a, b = 3`, `вещ таб T[1:n, 0:m]`
    Declare(Declaration),

    /// `x := e`, `A[i] := e`, `знач := e`
    Assign { target: AssignTarget, value: Expr },

    /// `вывод a, " ", нс`
    Output { items: Vec<OutputItem> },

    /// `ввод a, A[i]`
    Input { targets: Vec<AssignTarget> },

    /// `если c то ... иначе ... все`
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        #[cfg_attr(feature = "json", serde(default))]
        else_branch: Option<Vec<Stmt>>,
    },

    /// `выбор при c1: ... при c2: ... иначе ... все`
    Switch {
        arms: Vec<SwitchArm>,
        #[cfg_attr(feature = "json", serde(default))]
        default: Option<Vec<Stmt>>,
    },

    /// `нц ... кц` in all four forms.
    Loop(Loop),

    /// `выход` inside a loop.
    LoopExit,
    /// Skip to the next condition check of the innermost loop.
    LoopContinue,
    /// `выход` outside any loop: leaves the enclosing algorithm.
    AlgorithmExit,

    /// Procedure call in statement position; any result is discarded.
    Call {
        callee: Name,
        #[cfg_attr(feature = "json", serde(default))]
        args: Vec<Expr>,
    },

    /// `утв`/`дано`/`надо` with the condition's source text.
    Assert {
        kind: AssertKind,
        cond: Expr,
        source: String,
    },

    /// `стоп`
    Stop,
    /// `пауза`
    Pause,
}

/// A declaration statement; all items share type and table-ness.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    pub ty: TypeTag,
    #[cfg_attr(feature = "json", serde(default))]
    pub is_table: bool,
    pub items: Vec<DeclItem>,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclItem {
    pub name: Name,
    /// One pair per dimension; empty for scalars.
    #[cfg_attr(feature = "json", serde(default))]
    pub bounds: Vec<BoundPair>,
    #[cfg_attr(feature = "json", serde(default))]
    pub init: Option<Expr>,
}

/// `lower:upper`, both inclusive.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundPair {
    pub lower: Expr,
    pub upper: Expr,
}

/// Left-hand side of an assignment or an input target.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignTarget {
    Var(Name),
    Element { name: Name, indices: Vec<IndexArg> },
    ReturnSlot,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputItem {
    Expr(Expr),
    /// `нс`
    Newline,
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchArm {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

/// Loop forms. All four absorb `LoopExit` and `LoopContinue` the same way.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum Loop {
    /// `нц пока c ... кц`
    While { cond: Expr, body: Vec<Stmt> },
    /// `нц ... кц при c`; without a condition the loop only ends by exit.
    Repeat {
        body: Vec<Stmt>,
        #[cfg_attr(feature = "json", serde(default))]
        until: Option<Expr>,
    },
    /// `нц для i от a до b шаг s ... кц`
    For {
        var: Name,
        from: Expr,
        to: Expr,
        #[cfg_attr(feature = "json", serde(default))]
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// `нц n раз ... кц`
    Times { count: Expr, body: Vec<Stmt> },
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub enum AssertKind {
    /// `утв`
    Assert,
    /// `дано`
    Precondition,
    /// `надо`
    Postcondition,
}

impl AssertKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            AssertKind::Assert => "утв",
            AssertKind::Precondition => "дано",
            AssertKind::Postcondition => "надо",
        }
    }
}
