//! Ariadne-based rendering of type errors.
//!
//! Human output is a terse message with an error code, one labeled span and
//! a fix suggestion where a plausible one exists. JSON output carries the same
//! information on a single line for editors and test harnesses.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use serde::Serialize;

use plume_common::LineIndex;

use crate::error::{Expectation, TypeError};
use crate::ty::{Ty, TyKind};

/// How diagnostics are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticOptions {
    /// ANSI colors in human output.
    pub color: bool,
    /// One line of JSON per diagnostic instead of a report.
    pub json: bool,
}

impl DiagnosticOptions {
    /// Plain text without colors; deterministic for tests.
    pub fn colorless() -> Self {
        Self::default()
    }

    pub fn json_mode() -> Self {
        Self {
            color: false,
            json: true,
        }
    }
}

// ── Error Codes ────────────────────────────────────────────────────────

pub fn error_code(err: &TypeError) -> &'static str {
    match err {
        TypeError::TypeMismatch { .. } => "E0001",
        TypeError::BinOpTypeMismatch { .. } => "E0002",
        TypeError::IncomparableTypes { .. } => "E0003",
        TypeError::MissingDeclaration { .. } => "E0004",
        TypeError::MissingNamedTupleEntry { .. } => "E0005",
        TypeError::OutOfBoundsTupleAccess { .. } => "E0006",
        TypeError::RelinquishedWithoutOwnership { .. } => "E0007",
        TypeError::MisplacedThis { .. } => "E0008",
        TypeError::ArgumentCountMismatch { .. } => "E0009",
        TypeError::InvalidNumberLiteral { .. } => "E0010",
        TypeError::UnsupportedFloatLiteral { .. } => "E0011",
        TypeError::DuplicateNamedTupleEntry { .. } => "E0012",
    }
}

// ── Labels and Fix Suggestions ─────────────────────────────────────────

fn label_message(err: &TypeError) -> String {
    match err {
        TypeError::TypeMismatch { found, .. } => format!("this has type `{}`", found),
        TypeError::BinOpTypeMismatch { lhs, rhs, .. } => {
            format!("`{}` on the left, `{}` on the right", lhs, rhs)
        }
        TypeError::IncomparableTypes { left, right, .. } => {
            format!("`{}` is not assignable to or from `{}`", left, right)
        }
        TypeError::MissingDeclaration { expected, .. } => format!("not a known {}", expected),
        TypeError::MissingNamedTupleEntry { field, .. } => format!("no field `{}`", field),
        TypeError::OutOfBoundsTupleAccess { index, .. } => format!("index {} does not exist", index),
        TypeError::RelinquishedWithoutOwnership { name, .. } => {
            format!("`{}` was already moved or swapped in this call", name)
        }
        TypeError::MisplacedThis { .. } => "no enclosing machine".to_string(),
        TypeError::ArgumentCountMismatch { expected, .. } => {
            format!("expected {} argument(s) here", expected)
        }
        TypeError::InvalidNumberLiteral { text, .. } if text.contains('.') => {
            "not a decimal literal".to_string()
        }
        TypeError::InvalidNumberLiteral { .. } => "does not fit in a 64-bit integer".to_string(),
        TypeError::UnsupportedFloatLiteral { .. } => "exponent form".to_string(),
        TypeError::DuplicateNamedTupleEntry { field, .. } => format!("`{}` repeated here", field),
    }
}

fn fix_suggestion(err: &TypeError) -> Option<String> {
    match err {
        TypeError::BinOpTypeMismatch { lhs, rhs, .. } => {
            match (lhs.canonicalize(), rhs.canonicalize()) {
                (Ty::Int, Ty::Float) | (Ty::Float, Ty::Int) => {
                    Some("convert the `int` operand with `x to float`".to_string())
                }
                _ => None,
            }
        }
        TypeError::TypeMismatch {
            found, expected, ..
        } => match (found.canonicalize(), expected.as_slice()) {
            (Ty::Int, [Expectation::Ty(Ty::Float)]) => Some("use `x to float`".to_string()),
            (Ty::Float, [Expectation::Ty(Ty::Int)]) => Some("use `x to int`".to_string()),
            _ => None,
        },
        TypeError::MissingNamedTupleEntry { tuple, .. } => match tuple.canonicalize() {
            Ty::NamedTuple(entries) => {
                let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
                Some(format!("available fields: {}", names.join(", ")))
            }
            _ => None,
        },
        TypeError::OutOfBoundsTupleAccess { tuple, .. } => match tuple.canonicalize() {
            Ty::Tuple(elems) => Some(format!("the tuple has {} element(s)", elems.len())),
            _ => None,
        },
        TypeError::IncomparableTypes { left, right, .. }
            if left.is_of_kind(TyKind::Bool) || right.is_of_kind(TyKind::Bool) =>
        {
            Some("`bool` converts to and from no other type".to_string())
        }
        TypeError::RelinquishedWithoutOwnership { .. } => {
            Some("a variable can be moved or swapped at most once per call".to_string())
        }
        TypeError::MisplacedThis { .. } => {
            Some("`this` is only available in functions owned by a machine".to_string())
        }
        TypeError::ArgumentCountMismatch {
            expected, found, ..
        } => {
            if found < expected {
                Some(format!("missing {} argument(s)", expected - found))
            } else {
                Some(format!("{} extra argument(s)", found - expected))
            }
        }
        TypeError::UnsupportedFloatLiteral { .. } => {
            Some("write the literal in decimal form, e.g. `0.5`".to_string())
        }
        _ => None,
    }
}

// ── Main Rendering Function ────────────────────────────────────────────

/// Render a type error for `source`, the text of `filename`.
pub fn render_diagnostic(
    error: &TypeError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    if options.json {
        return render_json(error, source, filename);
    }

    let range = error.span().to_range(source.len());
    let config = Config::default()
        .with_color(options.color)
        .with_index_type(IndexType::Byte);

    let mut builder = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_code(error_code(error))
        .with_message(error.to_string())
        .with_config(config)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message(error))
                .with_color(Color::Red),
        );
    if let Some(fix) = fix_suggestion(error) {
        builder.set_help(fix);
    }

    let mut buf = Vec::new();
    if builder
        .finish()
        .write((filename, Source::from(source)), &mut buf)
        .is_err()
    {
        // source cache failure: bare message
        return format!("error[{}]: {}", error_code(error), error);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    code: &'static str,
    severity: &'static str,
    message: String,
    file: &'a str,
    spans: Vec<JsonSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

#[derive(Serialize)]
struct JsonSpan {
    start: u32,
    end: u32,
    line: u32,
    col: u32,
    label: String,
}

fn render_json(error: &TypeError, source: &str, filename: &str) -> String {
    let index = LineIndex::new(source);
    let span = error.span();
    let (line, col) = index.line_col(span.start.min(source.len() as u32));
    let diagnostic = JsonDiagnostic {
        code: error_code(error),
        severity: "error",
        message: error.to_string(),
        file: filename,
        spans: vec![JsonSpan {
            start: span.start,
            end: span.end,
            line,
            col,
            label: label_message(error),
        }],
        help: fix_suggestion(error),
    };
    serde_json::to_string(&diagnostic)
        .unwrap_or_else(|_| format!("{{\"code\":\"{}\",\"severity\":\"error\"}}", error_code(error)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_common::Span;
    use plume_syntax::BinaryOp;

    #[test]
    fn codes_are_unique() {
        let span = Span::new(0, 1);
        let errors = [
            TypeError::mismatch(&Ty::Bool, Ty::Int, span),
            TypeError::BinOpTypeMismatch {
                op: BinaryOp::Add,
                lhs: Ty::Int,
                rhs: Ty::Bool,
                span,
            },
            TypeError::IncomparableTypes {
                left: Ty::Int,
                right: Ty::Bool,
                span,
            },
            TypeError::MissingDeclaration {
                expected: "function",
                name: "f".into(),
                span,
            },
            TypeError::MissingNamedTupleEntry {
                field: "z".into(),
                tuple: Ty::named_tuple([("x", Ty::Int)]),
                span,
            },
            TypeError::OutOfBoundsTupleAccess {
                index: "3".into(),
                tuple: Ty::tuple(vec![Ty::Int]),
                span,
            },
            TypeError::RelinquishedWithoutOwnership {
                name: "a".into(),
                span,
            },
            TypeError::MisplacedThis { span },
            TypeError::ArgumentCountMismatch {
                expected: 2,
                found: 1,
                span,
            },
            TypeError::InvalidNumberLiteral {
                text: "99999999999999999999".into(),
                span,
            },
            TypeError::UnsupportedFloatLiteral { span },
            TypeError::DuplicateNamedTupleEntry {
                field: "x".into(),
                span,
            },
        ];
        let mut codes: Vec<&str> = errors.iter().map(error_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn number_literal_label_follows_literal_kind() {
        let span = Span::new(0, 2);
        let float = TypeError::InvalidNumberLiteral {
            text: "3.".into(),
            span,
        };
        insta::assert_snapshot!(label_message(&float), @"not a decimal literal");
        let int = TypeError::InvalidNumberLiteral {
            text: "99999999999999999999".into(),
            span,
        };
        insta::assert_snapshot!(label_message(&int), @"does not fit in a 64-bit integer");
    }

    #[test]
    fn int_float_operands_suggest_conversion() {
        let err = TypeError::BinOpTypeMismatch {
            op: BinaryOp::Add,
            lhs: Ty::Int,
            rhs: Ty::Float,
            span: Span::new(0, 7),
        };
        insta::assert_snapshot!(
            fix_suggestion(&err).unwrap(),
            @"convert the `int` operand with `x to float`"
        );
    }

    #[test]
    fn missing_field_lists_available_fields() {
        let err = TypeError::MissingNamedTupleEntry {
            field: "z".into(),
            tuple: Ty::alias("Point", Ty::named_tuple([("x", Ty::Int), ("y", Ty::Int)])),
            span: Span::new(0, 3),
        };
        insta::assert_snapshot!(fix_suggestion(&err).unwrap(), @"available fields: x, y");
    }

    #[test]
    fn argument_count_help_counts_the_difference() {
        let span = Span::new(0, 1);
        let missing = TypeError::ArgumentCountMismatch {
            expected: 3,
            found: 1,
            span,
        };
        let extra = TypeError::ArgumentCountMismatch {
            expected: 1,
            found: 2,
            span,
        };
        assert_eq!(fix_suggestion(&missing).as_deref(), Some("missing 2 argument(s)"));
        assert_eq!(fix_suggestion(&extra).as_deref(), Some("1 extra argument(s)"));
    }

    #[test]
    fn json_reports_line_and_column() {
        let src = "x = 1\ny = this";
        let err = TypeError::MisplacedThis {
            span: Span::new(10, 14),
        };
        let out = render_diagnostic(&err, src, "main.p", &DiagnosticOptions::json_mode());
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["code"], "E0008");
        assert_eq!(parsed["file"], "main.p");
        assert_eq!(parsed["spans"][0]["line"], 2);
        assert_eq!(parsed["spans"][0]["col"], 5);
    }
}
