//! Type errors.
//!
//! Each variant is one way an expression can be rejected, and carries the
//! span of the innermost node that failed. The checker stops at the first
//! error of an expression; there is no partial result.

use std::fmt;

use plume_common::Span;
use plume_syntax::BinaryOp;

use crate::ty::{Ty, TyKind};

/// What a mismatched operand should have been: a concrete type, or any
/// type of a given kind (e.g. "some map").
#[derive(Clone, Debug, PartialEq)]
pub enum Expectation {
    Ty(Ty),
    Kind(TyKind),
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Ty(ty) => write!(f, "`{}`", ty),
            Expectation::Kind(kind) => write!(f, "{}", kind),
        }
    }
}

impl From<Ty> for Expectation {
    fn from(ty: Ty) -> Self {
        Expectation::Ty(ty)
    }
}

impl From<TyKind> for Expectation {
    fn from(kind: TyKind) -> Self {
        Expectation::Kind(kind)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeError {
    /// An operand has the wrong type.
    TypeMismatch {
        found: Ty,
        expected: Vec<Expectation>,
        span: Span,
    },
    /// Operands of an arithmetic or ordering operator disagree or are not
    /// numeric.
    BinOpTypeMismatch {
        op: BinaryOp,
        lhs: Ty,
        rhs: Ty,
        span: Span,
    },
    /// Neither type is assignable from the other (`==`, `!=`, `as`), or the
    /// `to` pair is not a supported conversion.
    IncomparableTypes { left: Ty, right: Ty, span: Span },
    /// A name did not resolve to a declaration of the expected kind.
    MissingDeclaration {
        expected: &'static str,
        name: String,
        span: Span,
    },
    MissingNamedTupleEntry {
        field: String,
        tuple: Ty,
        span: Span,
    },
    OutOfBoundsTupleAccess {
        index: String,
        tuple: Ty,
        span: Span,
    },
    /// A variable was moved or swapped twice in one argument list.
    RelinquishedWithoutOwnership { name: String, span: Span },
    /// `this` outside a machine.
    MisplacedThis { span: Span },
    ArgumentCountMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },
    /// An integer literal that overflows `i64`, or a malformed decimal literal.
    InvalidNumberLiteral { text: String, span: Span },
    /// `float(base, exp)` literals are not supported.
    UnsupportedFloatLiteral { span: Span },
    /// A named tuple type lists the same field twice.
    DuplicateNamedTupleEntry { field: String, span: Span },
}

impl TypeError {
    /// Span of the node the error was reported for.
    pub fn span(&self) -> Span {
        match self {
            TypeError::TypeMismatch { span, .. }
            | TypeError::BinOpTypeMismatch { span, .. }
            | TypeError::IncomparableTypes { span, .. }
            | TypeError::MissingDeclaration { span, .. }
            | TypeError::MissingNamedTupleEntry { span, .. }
            | TypeError::OutOfBoundsTupleAccess { span, .. }
            | TypeError::RelinquishedWithoutOwnership { span, .. }
            | TypeError::MisplacedThis { span }
            | TypeError::ArgumentCountMismatch { span, .. }
            | TypeError::InvalidNumberLiteral { span, .. }
            | TypeError::UnsupportedFloatLiteral { span }
            | TypeError::DuplicateNamedTupleEntry { span, .. } => *span,
        }
    }

    pub(crate) fn mismatch(found: &Ty, expected: impl Into<Expectation>, span: Span) -> Self {
        TypeError::TypeMismatch {
            found: found.clone(),
            expected: vec![expected.into()],
            span,
        }
    }
}

fn join_expectations(expected: &[Expectation]) -> String {
    let parts: Vec<String> = expected.iter().map(ToString::to_string).collect();
    match parts.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::TypeMismatch {
                found, expected, ..
            } => {
                write!(
                    f,
                    "type mismatch: expected {}, found `{}`",
                    join_expectations(expected),
                    found
                )
            }
            TypeError::BinOpTypeMismatch { op, lhs, rhs, .. } => {
                write!(
                    f,
                    "operator `{}` cannot be applied to `{}` and `{}`",
                    op, lhs, rhs
                )
            }
            TypeError::IncomparableTypes { left, right, .. } => {
                write!(f, "types `{}` and `{}` are incomparable", left, right)
            }
            TypeError::MissingDeclaration { expected, name, .. } => {
                write!(f, "no {} named `{}`", expected, name)
            }
            TypeError::MissingNamedTupleEntry { field, tuple, .. } => {
                write!(f, "named tuple `{}` has no field `{}`", tuple, field)
            }
            TypeError::OutOfBoundsTupleAccess { index, tuple, .. } => {
                write!(f, "index {} is out of bounds for tuple `{}`", index, tuple)
            }
            TypeError::RelinquishedWithoutOwnership { name, .. } => {
                write!(
                    f,
                    "`{}` is relinquished more than once in the same call",
                    name
                )
            }
            TypeError::MisplacedThis { .. } => {
                write!(f, "`this` used outside of a machine")
            }
            TypeError::ArgumentCountMismatch {
                expected, found, ..
            } => {
                write!(
                    f,
                    "expected {} argument(s), found {}",
                    expected, found
                )
            }
            TypeError::InvalidNumberLiteral { text, .. } => {
                write!(f, "invalid number literal `{}`", text)
            }
            TypeError::UnsupportedFloatLiteral { .. } => {
                write!(f, "exponent float literals are not supported")
            }
            TypeError::DuplicateNamedTupleEntry { field, .. } => {
                write!(f, "field `{}` appears more than once", field)
            }
        }
    }
}

impl std::error::Error for TypeError {}
