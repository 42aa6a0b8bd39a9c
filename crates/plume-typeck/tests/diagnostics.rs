//! Rendering of type errors found by the checker.
//!
//! Human output is checked for its parts (code, message, label, help)
//! rather than snapshotted byte for byte, since the report frame belongs to
//! ariadne.

use plume_syntax::{BinaryOp, Expr, ExprKind, LinearMode, Span};
use plume_typeck::diagnostics::{error_code, render_diagnostic, DiagnosticOptions};
use plume_typeck::scope::Scope;
use plume_typeck::symbols::{Function, Param, Variable};
use plume_typeck::ty::Ty;
use plume_typeck::TypeckResult;

// ── Helpers ────────────────────────────────────────────────────────────

fn opts() -> DiagnosticOptions {
    DiagnosticOptions::colorless()
}

fn sp(start: u32, end: u32) -> Span {
    Span::new(start, end)
}

fn fixture() -> Scope {
    let mut scope = Scope::new();
    scope.declare_variable(Variable::new("x", Ty::Int)).unwrap();
    scope.declare_variable(Variable::new("y", Ty::Float)).unwrap();
    scope
        .declare_function(Function::new(
            "f",
            vec![Param::new("a", Ty::Int), Param::new("b", Ty::Int)],
            Ty::Int,
        ))
        .unwrap();
    scope
}

fn check_all(exprs: &[Expr]) -> TypeckResult {
    let scope = fixture();
    let function = Function::new("main", vec![], Ty::Null);
    plume_typeck::check_exprs(exprs, &scope, &function)
}

/// Check one expression and render its error against `src`.
fn render_first_error(src: &str, expr: Expr, options: &DiagnosticOptions) -> String {
    let result = check_all(&[expr]);
    assert!(
        !result.errors.is_empty(),
        "expected at least one error for source: {:?}",
        src
    );
    render_diagnostic(&result.errors[0], src, "test.p", options)
}

// ── Human Output ───────────────────────────────────────────────────────

#[test]
fn test_diag_binop_mismatch_suggests_conversion() {
    let src = "x + y";
    let expr = Expr::binary(
        sp(0, 5),
        BinaryOp::Add,
        Expr::name(sp(0, 1), "x"),
        Expr::name(sp(4, 5), "y"),
    );
    let output = render_first_error(src, expr, &opts());
    assert!(output.contains("E0002"), "missing error code: {}", output);
    assert!(
        output.contains("operator `+` cannot be applied to `int` and `float`"),
        "missing message: {}",
        output
    );
    assert!(output.contains("x to float"), "missing help: {}", output);
    assert!(output.contains("test.p"), "missing file name: {}", output);
}

#[test]
fn test_diag_relinquished_names_variable() {
    let src = "f(move x, move x)";
    let expr = Expr::call(
        sp(0, 17),
        "f",
        vec![
            Expr::linear(sp(2, 8), LinearMode::Move, "x"),
            Expr::linear(sp(10, 16), LinearMode::Move, "x"),
        ],
    );
    let output = render_first_error(src, expr, &opts());
    assert!(output.contains("E0007"), "missing error code: {}", output);
    assert!(output.contains("already moved or swapped"), "missing label: {}", output);
    assert!(output.contains("at most once per call"), "missing help: {}", output);
}

#[test]
fn test_diag_misplaced_this_on_second_line() {
    let src = "x\nthis";
    let output = render_first_error(src, Expr::new(sp(2, 6), ExprKind::This), &opts());
    assert!(output.contains("E0008"), "missing error code: {}", output);
    assert!(output.contains("owned by a machine"), "missing help: {}", output);
}

#[test]
fn test_colorless_output_has_no_escape_codes() {
    let src = "nope";
    let output = render_first_error(src, Expr::name(sp(0, 4), "nope"), &opts());
    assert!(!output.contains('\u{1b}'), "unexpected ANSI escape: {:?}", output);
}

#[test]
fn test_render_errors_keeps_order() {
    let src = "nope + this";
    let exprs = [
        Expr::name(sp(0, 4), "nope"),
        Expr::new(sp(7, 11), ExprKind::This),
    ];
    let result = check_all(&exprs);
    let rendered = result.render_errors(src, "test.p", &opts());
    assert_eq!(rendered.len(), 2);
    assert!(rendered[0].contains(error_code(&result.errors[0])));
    assert!(rendered[0].contains("E0004"));
    assert!(rendered[1].contains("E0008"));
}

// ── JSON Output ────────────────────────────────────────────────────────

#[test]
fn test_json_output_mode() {
    let src = "f(x)";
    let expr = Expr::call(sp(0, 4), "f", vec![Expr::name(sp(2, 3), "x")]);
    let output = render_first_error(src, expr, &DiagnosticOptions::json_mode());
    let parsed: serde_json::Value = serde_json::from_str(&output)
        .unwrap_or_else(|e| panic!("invalid JSON output: {}\n{}", e, output));
    assert_eq!(parsed["code"], "E0009");
    assert_eq!(parsed["severity"], "error");
    assert_eq!(parsed["file"], "test.p");
    assert!(parsed["message"].as_str().unwrap().contains("expected 2 argument(s)"));
    assert_eq!(parsed["help"], "missing 1 argument(s)");

    let spans = parsed["spans"].as_array().unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0]["start"], 0);
    assert_eq!(spans[0]["end"], 4);
    assert_eq!(spans[0]["line"], 1);
    assert_eq!(spans[0]["col"], 1);
}

#[test]
fn test_json_one_line() {
    let src = "x +\n y";
    let expr = Expr::binary(
        sp(0, 6),
        BinaryOp::Add,
        Expr::name(sp(0, 1), "x"),
        Expr::name(sp(5, 6), "y"),
    );
    let output = render_first_error(src, expr, &DiagnosticOptions::json_mode());
    assert!(!output.contains('\n'), "JSON output should be one line: {}", output);
}

#[test]
fn test_json_omits_missing_help() {
    let src = "nope";
    let output = render_first_error(src, Expr::name(sp(0, 4), "nope"), &DiagnosticOptions::json_mode());
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(parsed.get("help").is_none());
}
