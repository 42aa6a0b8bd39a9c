//! Function calls, machine constructors and linear references.
//!
//! `move x` and `swap x` hand a variable's storage to the callee. Within one
//! argument list each variable may be handed off at most once; the set of
//! relinquished names lives only for the duration of [`ExprChecker::check_args`],
//! so nested calls start fresh.
//!
//! A linear reference checked on its own, outside any argument list, is typed
//! like its variable and carries no ownership check. Statements that hand
//! values off (`send`, `raise`, assignments from `move`) check their operands
//! through [`ExprChecker::check_args`] to get the same discipline.

use std::rc::Rc;

use plume_common::Span;
use plume_syntax::{Expr, LinearMode};
use rustc_hash::FxHashSet;

use super::ExprChecker;
use crate::error::TypeError;
use crate::payload::validate_payload;
use crate::texpr::{TExpr, TExprKind};
use crate::ty::Ty;

impl ExprChecker<'_> {
    pub(super) fn check_call(&self, callee: &str, args: &[Expr], span: Span) -> Result<TExpr, TypeError> {
        let function = self
            .scope
            .lookup_function(callee)
            .ok_or_else(|| TypeError::MissingDeclaration {
                expected: "function",
                name: callee.to_string(),
                span,
            })?;
        if args.len() != function.params.len() {
            return Err(TypeError::ArgumentCountMismatch {
                expected: function.params.len(),
                found: args.len(),
                span,
            });
        }

        let args = self.check_args(args)?;
        for (param, arg) in function.params.iter().zip(&args) {
            if let Some((LinearMode::Swap, _)) = arg.as_linear_ref() {
                // swap needs the exact parameter type, not just an assignable one
                if !param.ty.is_same_type_as(&arg.ty) {
                    return Err(TypeError::mismatch(&arg.ty, param.ty.clone(), arg.span));
                }
            }
            if !param.ty.is_assignable_from(&arg.ty) {
                return Err(TypeError::mismatch(&arg.ty, param.ty.clone(), arg.span));
            }
        }

        Ok(TExpr::new(
            span,
            function.return_ty.clone(),
            TExprKind::FunCall {
                function: Rc::clone(function),
                args,
            },
        ))
    }

    /// `new M(args)`.
    pub(super) fn check_new(&self, machine: &str, args: &[Expr], span: Span) -> Result<TExpr, TypeError> {
        let machine = self
            .scope
            .lookup_machine(machine)
            .ok_or_else(|| TypeError::MissingDeclaration {
                expected: "machine",
                name: machine.to_string(),
                span,
            })?;
        let args = self.check_args(args)?;
        validate_payload(&machine.payload, &args, span)?;
        Ok(TExpr::new(
            span,
            Ty::Machine,
            TExprKind::Ctor {
                machine: Rc::clone(machine),
                args,
            },
        ))
    }

    /// `move x` / `swap x`: `x` must be a variable.
    pub(super) fn check_linear(&self, mode: LinearMode, name: &str, span: Span) -> Result<TExpr, TypeError> {
        let var = self
            .scope
            .lookup_variable(name)
            .ok_or_else(|| TypeError::MissingDeclaration {
                expected: "variable",
                name: name.to_string(),
                span,
            })?;
        Ok(TExpr::new(
            span,
            var.ty.clone(),
            TExprKind::LinearRef {
                mode,
                var: Rc::clone(var),
            },
        ))
    }

    /// Check arguments left to right, rejecting a second `move`/`swap` of the
    /// same variable.
    pub fn check_args(&self, args: &[Expr]) -> Result<Vec<TExpr>, TypeError> {
        let mut relinquished: FxHashSet<String> = FxHashSet::default();
        let mut checked = Vec::with_capacity(args.len());
        for arg in args {
            let arg = self.check_expr(arg)?;
            if let Some((mode, var)) = arg.as_linear_ref() {
                if !relinquished.insert(var.name.clone()) {
                    tracing::debug!(variable = %var.name, %mode, "variable relinquished twice");
                    return Err(TypeError::RelinquishedWithoutOwnership {
                        name: var.name.clone(),
                        span: arg.span,
                    });
                }
            }
            checked.push(arg);
        }
        Ok(checked)
    }
}
