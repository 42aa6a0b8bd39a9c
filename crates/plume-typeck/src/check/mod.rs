//! The expression checker.
//!
//! Walks one untyped expression bottom-up: children are checked first, then
//! the node's own rule is applied to their types and a typed node is built.
//! The first failing rule aborts the whole expression with its error.
//!
//! The checker reads the [`Scope`] and writes exactly one thing: the owning
//! function's nondeterminism flag, when it meets `$` or `$$`.
//!
//! Rules are split by construct:
//! - [`operators`]: unary and binary operators, `as`, `to`
//! - [`access`]: tuple fields, indexing, `keys`/`values`/`sizeof`, lvalues
//! - [`calls`]: function calls, machine constructors, `move`/`swap`

mod access;
mod calls;
mod operators;

use std::rc::Rc;

use plume_common::Span;
use plume_syntax::{Expr, ExprKind, FloatLiteral};
use rustc_hash::FxHashSet;

use crate::error::TypeError;
use crate::resolve::resolve_type;
use crate::scope::Scope;
use crate::symbols::{Function, PEvent};
use crate::texpr::{TExpr, TExprKind};
use crate::ty::Ty;

/// Checks the expressions of one body.
///
/// `function` is the body's owner: `this` resolves to its machine and
/// nondeterministic choices are recorded on it.
pub struct ExprChecker<'a> {
    scope: &'a Scope,
    function: &'a Function,
}

impl<'a> ExprChecker<'a> {
    /// Checker for the body of `function`, resolving names in `scope`.
    pub fn new(scope: &'a Scope, function: &'a Function) -> Self {
        ExprChecker { scope, function }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(function = %self.function.name, span = ?expr.span))]
    pub fn check_expr(&self, expr: &Expr) -> Result<TExpr, TypeError> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Name(name) => self.check_name(name, span),
            ExprKind::Int(text) => check_int(text, span),
            ExprKind::Float(lit) => check_float(lit, span),
            ExprKind::Bool(value) => Ok(TExpr::new(span, Ty::Bool, TExprKind::BoolLit(*value))),
            ExprKind::Null => Ok(TExpr::new(span, Ty::Null, TExprKind::NullLit)),
            ExprKind::Nondet => Ok(self.nondet(span, TExprKind::Nondet)),
            ExprKind::FairNondet => Ok(self.nondet(span, TExprKind::FairNondet)),
            ExprKind::Halt => self.check_halt(span),
            ExprKind::This => self.check_this(span),
            ExprKind::Unary { op, operand } => self.check_unary(*op, operand, span),
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(*op, lhs, rhs, span),
            ExprKind::Tuple(elems) => {
                let elems = elems
                    .iter()
                    .map(|elem| self.check_expr(elem))
                    .collect::<Result<Vec<_>, _>>()?;
                let ty = Ty::Tuple(elems.iter().map(|e| e.ty.clone()).collect());
                Ok(TExpr::new(span, ty, TExprKind::Tuple(elems)))
            }
            ExprKind::NamedTuple(fields) => self.check_named_tuple(fields, span),
            ExprKind::TupleAccess { base, index } => {
                access::tuple_access(self.check_expr(base)?, index, span)
            }
            ExprKind::NamedTupleAccess { base, field } => {
                access::named_tuple_access(self.check_expr(base)?, field, span)
            }
            ExprKind::Index { base, index } => {
                let base = self.check_expr(base)?;
                let index = self.check_expr(index)?;
                access::index(base, index, span)
            }
            ExprKind::Keys(map) => access::keys(self.check_expr(map)?, span),
            ExprKind::Values(map) => access::values(self.check_expr(map)?, span),
            ExprKind::Sizeof(collection) => access::sizeof(self.check_expr(collection)?, span),
            ExprKind::Default(ty) => {
                let ty = resolve_type(ty, self.scope)?.canonicalize();
                Ok(TExpr::new(span, ty, TExprKind::Default))
            }
            ExprKind::Call { callee, args } => self.check_call(callee, args, span),
            ExprKind::New { machine, args } => self.check_new(machine, args, span),
            ExprKind::Cast { expr, ty } => self.check_cast(expr, ty, span),
            ExprKind::Coerce { expr, ty } => self.check_coerce(expr, ty, span),
            ExprKind::Linear { mode, name } => self.check_linear(*mode, name, span),
        }
    }

    /// Bare identifiers: a variable, else an enum element, else an event.
    fn check_name(&self, name: &str, span: Span) -> Result<TExpr, TypeError> {
        if let Some(var) = self.scope.lookup_variable(name) {
            return Ok(TExpr::new(span, var.ty.clone(), TExprKind::Var(Rc::clone(var))));
        }
        if let Some(elem) = self.scope.lookup_enum_elem(name) {
            return Ok(TExpr::new(span, elem.ty(), TExprKind::EnumElem(Rc::clone(elem))));
        }
        if let Some(event) = self.scope.lookup_event(name) {
            return Ok(TExpr::new(span, Ty::Event, TExprKind::Event(Rc::clone(event))));
        }
        Err(TypeError::MissingDeclaration {
            expected: "variable, enum element, or event",
            name: name.to_string(),
            span,
        })
    }

    fn nondet(&self, span: Span, kind: TExprKind) -> TExpr {
        if !self.function.is_nondeterministic() {
            tracing::debug!(function = %self.function.name, "function marked nondeterministic");
        }
        self.function.mark_nondeterministic();
        TExpr::new(span, Ty::Bool, kind)
    }

    fn check_halt(&self, span: Span) -> Result<TExpr, TypeError> {
        let halt = self
            .scope
            .lookup_event(PEvent::HALT)
            .ok_or_else(|| TypeError::MissingDeclaration {
                expected: "event",
                name: PEvent::HALT.to_string(),
                span,
            })?;
        Ok(TExpr::new(span, Ty::Event, TExprKind::Event(Rc::clone(halt))))
    }

    fn check_this(&self, span: Span) -> Result<TExpr, TypeError> {
        match &self.function.owner {
            Some(machine) => Ok(TExpr::new(span, Ty::Machine, TExprKind::This(Rc::clone(machine)))),
            None => Err(TypeError::MisplacedThis { span }),
        }
    }

    fn check_named_tuple(&self, fields: &[(String, Expr)], span: Span) -> Result<TExpr, TypeError> {
        let mut seen = FxHashSet::default();
        let mut checked = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            if !seen.insert(name.as_str()) {
                return Err(TypeError::DuplicateNamedTupleEntry {
                    field: name.clone(),
                    span: value.span,
                });
            }
            checked.push((name.clone(), self.check_expr(value)?));
        }
        let ty = Ty::named_tuple(checked.iter().map(|(name, e)| (name.clone(), e.ty.clone())));
        Ok(TExpr::new(span, ty, TExprKind::NamedTuple(checked)))
    }
}

fn check_int(text: &str, span: Span) -> Result<TExpr, TypeError> {
    let value = text
        .parse::<i64>()
        .map_err(|_| TypeError::InvalidNumberLiteral {
            text: text.to_string(),
            span,
        })?;
    Ok(TExpr::new(span, Ty::Int, TExprKind::IntLit(value)))
}

fn check_float(lit: &FloatLiteral, span: Span) -> Result<TExpr, TypeError> {
    match lit {
        FloatLiteral::Decimal {
            int_part,
            frac_part,
        } => {
            let int_part = int_part.as_deref().unwrap_or("");
            let text = format!("{}.{}", int_part, frac_part);
            let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
            if frac_part.is_empty() || !digits(frac_part) || !digits(int_part) {
                return Err(TypeError::InvalidNumberLiteral { text, span });
            }
            match text.parse::<f64>() {
                Ok(value) => Ok(TExpr::new(span, Ty::Float, TExprKind::FloatLit(value))),
                Err(_) => Err(TypeError::InvalidNumberLiteral { text, span }),
            }
        }
        FloatLiteral::Exponent { .. } => Err(TypeError::UnsupportedFloatLiteral { span }),
    }
}
