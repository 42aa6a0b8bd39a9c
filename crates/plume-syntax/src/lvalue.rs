//! Assignment targets.

use serde::Serialize;

use crate::expr::Expr;
use crate::Span;

/// Left-hand side of an assignment, or the target of an in-place update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lvalue {
    pub span: Span,
    pub kind: LvalueKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LvalueKind {
    Var(String),
    NamedTupleAccess { base: Box<Lvalue>, field: String },
    TupleAccess { base: Box<Lvalue>, index: String },
    /// `l[e]` on a sequence or map.
    Index { base: Box<Lvalue>, index: Box<Expr> },
}

impl Lvalue {
    pub fn new(span: Span, kind: LvalueKind) -> Self {
        Lvalue { span, kind }
    }

    pub fn var(span: Span, name: impl Into<String>) -> Self {
        Lvalue::new(span, LvalueKind::Var(name.into()))
    }
}
