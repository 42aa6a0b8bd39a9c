//! Untyped Plume expression syntax.
//!
//! The parser hands the checker one [`Expr`] tree per expression, one
//! [`Lvalue`] tree per assignment target, and [`TypeRef`]s wherever source
//! text names a type. Every node carries the [`Span`] it was parsed from.
//!
//! Nothing here is resolved: names are plain strings, literals keep their raw
//! text, and type names have not been looked up.

pub mod expr;
pub mod lvalue;
pub mod types;

pub use expr::{BinaryOp, Expr, ExprKind, FloatLiteral, LinearMode, UnaryOp};
pub use lvalue::{Lvalue, LvalueKind};
pub use plume_common::Span;
pub use types::{TypeRef, TypeRefKind};
