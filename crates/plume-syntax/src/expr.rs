//! Expression nodes.
//!
//! One [`ExprKind`] variant per expression production of the grammar.
//! Subexpressions are boxed children; identifiers and literals keep the
//! text the parser saw.

use std::fmt;

use serde::Serialize;

use crate::types::TypeRef;
use crate::Span;

/// An untyped expression with its source location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// A bare identifier: a variable, enum element or event name.
    Name(String),
    /// Integer literal, raw digits.
    Int(String),
    Float(FloatLiteral),
    Bool(bool),
    Null,
    /// `$`
    Nondet,
    /// `$$`
    FairNondet,
    Halt,
    This,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `(a, b, ...)`
    Tuple(Vec<Expr>),
    /// `(x = a, y = b, ...)`
    NamedTuple(Vec<(String, Expr)>),
    /// `e.0`; the index is the raw integer text.
    TupleAccess {
        base: Box<Expr>,
        index: String,
    },
    /// `e.field`
    NamedTupleAccess {
        base: Box<Expr>,
        field: String,
    },
    /// `e[i]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Keys(Box<Expr>),
    Values(Box<Expr>),
    Sizeof(Box<Expr>),
    Default(TypeRef),
    /// `f(args)`
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    /// `new M(args)`
    New {
        machine: String,
        args: Vec<Expr>,
    },
    /// `e as T`
    Cast {
        expr: Box<Expr>,
        ty: TypeRef,
    },
    /// `e to T`
    Coerce {
        expr: Box<Expr>,
        ty: TypeRef,
    },
    /// `move x` / `swap x`
    Linear {
        mode: LinearMode,
        name: String,
    },
}

/// The two spellings of a float literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FloatLiteral {
    /// `3.14`, `.5`: optional integer part, required fractional digits.
    Decimal { int_part: Option<String>, frac_part: String },
    /// `float(base, exp)`: parsed, but the checker rejects it.
    Exponent { base: String, exp: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    In,
}

impl BinaryOp {
    /// `+ - * /`: numeric operands, result of the left operand's type.
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    /// `< <= > >=`: numeric operands, `bool` result.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    /// `== !=`: operands comparable in either direction.
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }

    /// `&& ||`: `bool` operands.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::In => "in",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => f.write_str("-"),
            UnaryOp::Not => f.write_str("!"),
        }
    }
}

/// How a call argument hands over a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LinearMode {
    /// Ownership moves to the callee.
    Move,
    /// The callee exchanges the value with one of the same type.
    Swap,
}

impl fmt::Display for LinearMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinearMode::Move => f.write_str("move"),
            LinearMode::Swap => f.write_str("swap"),
        }
    }
}

// ── Constructors ────────────────────────────────────────────────────────

impl Expr {
    pub fn new(span: Span, kind: ExprKind) -> Self {
        Expr { span, kind }
    }

    pub fn name(span: Span, name: impl Into<String>) -> Self {
        Expr::new(span, ExprKind::Name(name.into()))
    }

    pub fn int(span: Span, text: impl Into<String>) -> Self {
        Expr::new(span, ExprKind::Int(text.into()))
    }

    /// Decimal float literal `int_part.frac_part`.
    pub fn float(span: Span, int_part: Option<&str>, frac_part: &str) -> Self {
        Expr::new(
            span,
            ExprKind::Float(FloatLiteral::Decimal {
                int_part: int_part.map(str::to_string),
                frac_part: frac_part.to_string(),
            }),
        )
    }

    pub fn bool(span: Span, value: bool) -> Self {
        Expr::new(span, ExprKind::Bool(value))
    }

    pub fn unary(span: Span, op: UnaryOp, operand: Expr) -> Self {
        Expr::new(span, ExprKind::Unary { op, operand: Box::new(operand) })
    }

    pub fn binary(span: Span, op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::new(
            span,
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        )
    }

    pub fn tuple(span: Span, elems: Vec<Expr>) -> Self {
        Expr::new(span, ExprKind::Tuple(elems))
    }

    pub fn tuple_access(span: Span, base: Expr, index: impl Into<String>) -> Self {
        Expr::new(
            span,
            ExprKind::TupleAccess {
                base: Box::new(base),
                index: index.into(),
            },
        )
    }

    pub fn field(span: Span, base: Expr, field: impl Into<String>) -> Self {
        Expr::new(
            span,
            ExprKind::NamedTupleAccess {
                base: Box::new(base),
                field: field.into(),
            },
        )
    }

    pub fn index(span: Span, base: Expr, index: Expr) -> Self {
        Expr::new(
            span,
            ExprKind::Index {
                base: Box::new(base),
                index: Box::new(index),
            },
        )
    }

    pub fn call(span: Span, callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(
            span,
            ExprKind::Call {
                callee: callee.into(),
                args,
            },
        )
    }

    pub fn linear(span: Span, mode: LinearMode, name: impl Into<String>) -> Self {
        Expr::new(span, ExprKind::Linear { mode, name: name.into() })
    }
}
