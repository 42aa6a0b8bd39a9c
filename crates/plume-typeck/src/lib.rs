//! Plume expression type checker.
//!
//! Takes untyped expressions from `plume-syntax` and, against a [`Scope`] of
//! declarations, produces typed expression trees or a [`TypeError`] for the
//! innermost construct that failed. The type system is structural:
//!
//! - tuples, named tuples, sequences and maps compare by shape
//! - enums compare by name
//! - aliases are transparent after canonicalization
//! - `int` and `float` never mix implicitly
//!
//! Arguments handed off with `move`/`swap` are tracked per argument list so a
//! variable cannot be relinquished twice in one call.
//!
//! # Architecture
//!
//! - [`ty`]: Type representation, canonicalization, sameness and assignability
//! - [`symbols`]: Variables, functions, machines, events and enum elements
//! - [`scope`]: Frame stack with one value namespace and one type namespace
//! - [`texpr`]: Typed expression tree
//! - [`resolve`]: Written type references to [`ty::Ty`]
//! - [`payload`]: Constructor and event payload validation
//! - [`check`]: The expression checker
//! - [`error`]: Type errors
//! - [`diagnostics`]: Ariadne and JSON rendering of type errors

pub mod check;
pub mod diagnostics;
pub mod error;
pub mod payload;
pub mod resolve;
pub mod scope;
pub mod symbols;
pub mod texpr;
pub mod ty;

pub use check::ExprChecker;

use plume_syntax::Expr;

use crate::diagnostics::DiagnosticOptions;
use crate::error::TypeError;
use crate::scope::Scope;
use crate::symbols::Function;
use crate::texpr::TExpr;

/// The result of checking a batch of independent expressions.
///
/// A failing expression contributes exactly one error and no typed node; the
/// others are unaffected.
#[derive(Debug, Default)]
pub struct TypeckResult {
    /// Typed nodes of the expressions that checked, in input order.
    pub typed: Vec<TExpr>,
    /// One error per expression that failed, in input order.
    pub errors: Vec<TypeError>,
}

impl TypeckResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Render every error against `source`.
    pub fn render_errors(
        &self,
        source: &str,
        filename: &str,
        options: &DiagnosticOptions,
    ) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| diagnostics::render_diagnostic(err, source, filename, options))
            .collect()
    }
}

/// Check one expression in the body of `function`.
pub fn check_expr(expr: &Expr, scope: &Scope, function: &Function) -> Result<TExpr, TypeError> {
    ExprChecker::new(scope, function).check_expr(expr)
}

/// Check independent expressions of one body, collecting every failure.
pub fn check_exprs(exprs: &[Expr], scope: &Scope, function: &Function) -> TypeckResult {
    let checker = ExprChecker::new(scope, function);
    let mut result = TypeckResult::default();
    for expr in exprs {
        match checker.check_expr(expr) {
            Ok(typed) => result.typed.push(typed),
            Err(err) => result.errors.push(err),
        }
    }
    tracing::debug!(
        function = %function.name,
        checked = result.typed.len(),
        failed = result.errors.len(),
        "checked expressions"
    );
    result
}
