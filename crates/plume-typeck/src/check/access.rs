//! Field access, indexing and collection queries.
//!
//! The free functions here take already-checked operands, so rvalues and
//! lvalues share one rule per construct.

use std::rc::Rc;

use plume_common::Span;
use plume_syntax::{Lvalue, LvalueKind};

use super::ExprChecker;
use crate::error::TypeError;
use crate::texpr::{TExpr, TExprKind};
use crate::ty::{Ty, TyKind};

impl ExprChecker<'_> {
    /// Check an assignment target.
    pub fn check_lvalue(&self, lvalue: &Lvalue) -> Result<TExpr, TypeError> {
        let span = lvalue.span;
        match &lvalue.kind {
            LvalueKind::Var(name) => self.variable(name, span),
            LvalueKind::NamedTupleAccess { base, field } => {
                named_tuple_access(self.check_lvalue(base)?, field, span)
            }
            LvalueKind::TupleAccess { base, index } => {
                tuple_access(self.check_lvalue(base)?, index, span)
            }
            LvalueKind::Index { base, index: key } => {
                let base = self.check_lvalue(base)?;
                let key = self.check_expr(key)?;
                index(base, key, span)
            }
        }
    }

    fn variable(&self, name: &str, span: Span) -> Result<TExpr, TypeError> {
        let var = self
            .scope
            .lookup_variable(name)
            .ok_or_else(|| TypeError::MissingDeclaration {
                expected: "variable",
                name: name.to_string(),
                span,
            })?;
        Ok(TExpr::new(span, var.ty.clone(), TExprKind::Var(Rc::clone(var))))
    }
}

/// `e.N` on a positional tuple. `N` is plain decimal digits; anything else
/// is out of bounds.
pub(super) fn tuple_access(base: TExpr, index: &str, span: Span) -> Result<TExpr, TypeError> {
    let Ty::Tuple(elems) = base.ty.canonicalize() else {
        return Err(TypeError::mismatch(&base.ty, TyKind::Tuple, base.span));
    };
    let digits = !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit());
    let Some((position, elem)) = digits
        .then(|| index.parse::<usize>().ok())
        .flatten()
        .and_then(|i| elems.into_iter().nth(i).map(|elem| (i, elem)))
    else {
        return Err(TypeError::OutOfBoundsTupleAccess {
            index: index.to_string(),
            tuple: base.ty.clone(),
            span,
        });
    };
    Ok(TExpr::new(
        span,
        elem,
        TExprKind::TupleAccess {
            base: Box::new(base),
            index: position,
        },
    ))
}

/// `e.field` on a named tuple.
pub(super) fn named_tuple_access(base: TExpr, field: &str, span: Span) -> Result<TExpr, TypeError> {
    let Ty::NamedTuple(entries) = base.ty.canonicalize() else {
        return Err(TypeError::mismatch(&base.ty, TyKind::NamedTuple, base.span));
    };
    let Some(entry) = entries.into_iter().find(|entry| entry.name == field) else {
        return Err(TypeError::MissingNamedTupleEntry {
            field: field.to_string(),
            tuple: base.ty.clone(),
            span,
        });
    };
    Ok(TExpr::new(
        span,
        entry.ty,
        TExprKind::NamedTupleAccess {
            base: Box::new(base),
            field: field.to_string(),
        },
    ))
}

/// `e[i]`: sequences take an `int`, maps a key assignable to their key type.
pub(super) fn index(base: TExpr, index: TExpr, span: Span) -> Result<TExpr, TypeError> {
    match base.ty.canonicalize() {
        Ty::Seq(elem) => {
            if !index.ty.is_of_kind(TyKind::Int) {
                return Err(TypeError::mismatch(&index.ty, Ty::Int, index.span));
            }
            Ok(TExpr::new(
                span,
                *elem,
                TExprKind::SeqAccess {
                    base: Box::new(base),
                    index: Box::new(index),
                },
            ))
        }
        Ty::Map(key, value) => {
            if !key.is_assignable_from(&index.ty) {
                return Err(TypeError::mismatch(&index.ty, *key, index.span));
            }
            Ok(TExpr::new(
                span,
                *value,
                TExprKind::MapAccess {
                    base: Box::new(base),
                    key: Box::new(index),
                },
            ))
        }
        _ => Err(TypeError::TypeMismatch {
            found: base.ty.clone(),
            expected: vec![TyKind::Seq.into(), TyKind::Map.into()],
            span: base.span,
        }),
    }
}

/// `k in m`.
pub(super) fn contains_key(key: TExpr, map: TExpr, span: Span) -> Result<TExpr, TypeError> {
    let Ty::Map(key_ty, _) = map.ty.canonicalize() else {
        return Err(TypeError::mismatch(&map.ty, TyKind::Map, map.span));
    };
    if !key_ty.is_assignable_from(&key.ty) {
        return Err(TypeError::mismatch(&key.ty, *key_ty, key.span));
    }
    Ok(TExpr::new(
        span,
        Ty::Bool,
        TExprKind::ContainsKey {
            key: Box::new(key),
            map: Box::new(map),
        },
    ))
}

pub(super) fn keys(map: TExpr, span: Span) -> Result<TExpr, TypeError> {
    let Ty::Map(key, _) = map.ty.canonicalize() else {
        return Err(TypeError::mismatch(&map.ty, TyKind::Map, map.span));
    };
    Ok(TExpr::new(span, Ty::seq(*key), TExprKind::Keys(Box::new(map))))
}

pub(super) fn values(map: TExpr, span: Span) -> Result<TExpr, TypeError> {
    let Ty::Map(_, value) = map.ty.canonicalize() else {
        return Err(TypeError::mismatch(&map.ty, TyKind::Map, map.span));
    };
    Ok(TExpr::new(span, Ty::seq(*value), TExprKind::Values(Box::new(map))))
}

pub(super) fn sizeof(collection: TExpr, span: Span) -> Result<TExpr, TypeError> {
    if !matches!(collection.ty.kind(), TyKind::Seq | TyKind::Map) {
        return Err(TypeError::TypeMismatch {
            found: collection.ty.clone(),
            expected: vec![TyKind::Seq.into(), TyKind::Map.into()],
            span: collection.span,
        });
    }
    Ok(TExpr::new(span, Ty::Int, TExprKind::Sizeof(Box::new(collection))))
}
