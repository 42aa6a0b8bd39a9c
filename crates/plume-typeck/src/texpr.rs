//! Typed expression tree produced by the checker.
//!
//! Every node records the span it came from and its resolved type. Nodes are
//! built bottom-up once and never modified; renderers and later phases read
//! them through the public fields.

use std::rc::Rc;

use plume_common::Span;
use plume_syntax::{BinaryOp, LinearMode, UnaryOp};

use crate::symbols::{EnumElem, Function, Machine, PEvent, Variable};
use crate::ty::Ty;

#[derive(Clone, Debug, PartialEq)]
pub struct TExpr {
    pub span: Span,
    pub ty: Ty,
    pub kind: TExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TExprKind {
    IntLit(i64),
    FloatLit(f64),
    BoolLit(bool),
    NullLit,
    Var(Rc<Variable>),
    EnumElem(Rc<EnumElem>),
    Event(Rc<PEvent>),
    /// `this` inside a machine-owned function.
    This(Rc<Machine>),
    Nondet,
    FairNondet,
    Unary {
        op: UnaryOp,
        operand: Box<TExpr>,
    },
    /// Arithmetic, comparison, equality and logical operators. `in` becomes
    /// [`TExprKind::ContainsKey`].
    Binary {
        op: BinaryOp,
        lhs: Box<TExpr>,
        rhs: Box<TExpr>,
    },
    Tuple(Vec<TExpr>),
    NamedTuple(Vec<(String, TExpr)>),
    TupleAccess {
        base: Box<TExpr>,
        index: usize,
    },
    NamedTupleAccess {
        base: Box<TExpr>,
        field: String,
    },
    SeqAccess {
        base: Box<TExpr>,
        index: Box<TExpr>,
    },
    MapAccess {
        base: Box<TExpr>,
        key: Box<TExpr>,
    },
    ContainsKey {
        key: Box<TExpr>,
        map: Box<TExpr>,
    },
    Keys(Box<TExpr>),
    Values(Box<TExpr>),
    Sizeof(Box<TExpr>),
    /// Zero value of the node's type.
    Default,
    FunCall {
        function: Rc<Function>,
        args: Vec<TExpr>,
    },
    Ctor {
        machine: Rc<Machine>,
        args: Vec<TExpr>,
    },
    /// `as`: reinterpretation checked at run time; target is the node type.
    Cast(Box<TExpr>),
    /// `to`: value conversion; target is the node type.
    Coerce(Box<TExpr>),
    LinearRef {
        mode: LinearMode,
        var: Rc<Variable>,
    },
}

impl TExpr {
    pub fn new(span: Span, ty: Ty, kind: TExprKind) -> Self {
        TExpr { span, ty, kind }
    }

    /// The variable and mode when this node is a `move`/`swap` reference.
    pub fn as_linear_ref(&self) -> Option<(LinearMode, &Rc<Variable>)> {
        match &self.kind {
            TExprKind::LinearRef { mode, var } => Some((*mode, var)),
            _ => None,
        }
    }
}
