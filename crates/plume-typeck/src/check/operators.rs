//! Operators, casts and coercions.
//!
//! Numeric operators never widen: `int` and `float` do not mix, and a
//! program converts explicitly with `to`.

use plume_common::Span;
use plume_syntax::{BinaryOp, Expr, TypeRef, UnaryOp};

use super::{access, ExprChecker};
use crate::error::TypeError;
use crate::resolve::resolve_type;
use crate::texpr::{TExpr, TExprKind};
use crate::ty::{Ty, TyKind};

/// What a `to` coercion does at run time.
enum Conversion {
    /// Source and target are the same; the operand is returned as is.
    Identity,
    Convert,
}

impl ExprChecker<'_> {
    pub(super) fn check_unary(&self, op: UnaryOp, operand: &Expr, span: Span) -> Result<TExpr, TypeError> {
        let operand = self.check_expr(operand)?;
        match op {
            UnaryOp::Neg => {
                if !matches!(operand.ty.kind(), TyKind::Int | TyKind::Float) {
                    return Err(TypeError::TypeMismatch {
                        found: operand.ty.clone(),
                        expected: vec![Ty::Int.into(), Ty::Float.into()],
                        span: operand.span,
                    });
                }
            }
            UnaryOp::Not => {
                if !operand.ty.is_of_kind(TyKind::Bool) {
                    return Err(TypeError::mismatch(&operand.ty, Ty::Bool, operand.span));
                }
            }
        }
        Ok(TExpr::new(
            span,
            operand.ty.clone(),
            TExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        ))
    }

    pub(super) fn check_binary(
        &self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        span: Span,
    ) -> Result<TExpr, TypeError> {
        let lhs = self.check_expr(lhs)?;
        let rhs = self.check_expr(rhs)?;

        if op == BinaryOp::In {
            return access::contains_key(lhs, rhs, span);
        }
        let ty = if op.is_arithmetic() {
            check_numeric_operands(op, &lhs, &rhs, span)?;
            lhs.ty.clone()
        } else if op.is_comparison() {
            check_numeric_operands(op, &lhs, &rhs, span)?;
            Ty::Bool
        } else if op.is_equality() {
            if !comparable(&lhs.ty, &rhs.ty) {
                return Err(TypeError::IncomparableTypes {
                    left: lhs.ty.clone(),
                    right: rhs.ty.clone(),
                    span,
                });
            }
            Ty::Bool
        } else {
            debug_assert!(op.is_logical());
            for operand in [&lhs, &rhs] {
                if !operand.ty.is_of_kind(TyKind::Bool) {
                    return Err(TypeError::mismatch(&operand.ty, Ty::Bool, operand.span));
                }
            }
            Ty::Bool
        };

        Ok(TExpr::new(
            span,
            ty,
            TExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        ))
    }

    /// `e as T`: allowed when either type is assignable from the other.
    pub(super) fn check_cast(&self, expr: &Expr, ty: &TypeRef, span: Span) -> Result<TExpr, TypeError> {
        let operand = self.check_expr(expr)?;
        let target = resolve_type(ty, self.scope)?;
        if !comparable(&operand.ty, &target) {
            return Err(TypeError::IncomparableTypes {
                left: operand.ty.clone(),
                right: target,
                span,
            });
        }
        Ok(TExpr::new(span, target, TExprKind::Cast(Box::new(operand))))
    }

    /// `e to T`: a fixed table of numeric and enum conversions.
    pub(super) fn check_coerce(&self, expr: &Expr, ty: &TypeRef, span: Span) -> Result<TExpr, TypeError> {
        let operand = self.check_expr(expr)?;
        let target = resolve_type(ty, self.scope)?;
        let conversion = match (operand.ty.canonicalize(), target.canonicalize()) {
            (Ty::Int, Ty::Int) | (Ty::Float, Ty::Float) => Some(Conversion::Identity),
            (Ty::Enum(from), Ty::Enum(to)) if from == to => Some(Conversion::Identity),
            (Ty::Int, Ty::Float)
            | (Ty::Int, Ty::Enum(_))
            | (Ty::Float, Ty::Int)
            | (Ty::Enum(_), Ty::Int) => Some(Conversion::Convert),
            _ => None,
        };
        match conversion {
            Some(Conversion::Identity) => Ok(operand),
            Some(Conversion::Convert) => {
                Ok(TExpr::new(span, target, TExprKind::Coerce(Box::new(operand))))
            }
            None => Err(TypeError::IncomparableTypes {
                left: operand.ty.clone(),
                right: target,
                span,
            }),
        }
    }
}

fn comparable(a: &Ty, b: &Ty) -> bool {
    a.is_assignable_from(b) || b.is_assignable_from(a)
}

/// Both `int` or both `float`.
fn check_numeric_operands(op: BinaryOp, lhs: &TExpr, rhs: &TExpr, span: Span) -> Result<(), TypeError> {
    match (lhs.ty.kind(), rhs.ty.kind()) {
        (TyKind::Int, TyKind::Int) | (TyKind::Float, TyKind::Float) => Ok(()),
        _ => Err(TypeError::BinOpTypeMismatch {
            op,
            lhs: lhs.ty.clone(),
            rhs: rhs.ty.clone(),
            span,
        }),
    }
}
