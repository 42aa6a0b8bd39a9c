//! Payload validation for machine constructors and event sends.
//!
//! A payload type describes what a `new M(...)`, `send` or `raise` must
//! supply. Zero arguments match a `null` payload, one argument must be
//! assignable to the payload, and several arguments are matched element-wise
//! against a tuple or named tuple payload of the same arity.

use plume_common::Span;

use crate::error::TypeError;
use crate::texpr::TExpr;
use crate::ty::Ty;

/// Check already-typed `args` against `payload`. `span` covers the whole
/// argument list and is used for arity errors.
pub fn validate_payload(payload: &Ty, args: &[TExpr], span: Span) -> Result<(), TypeError> {
    let payload_canon = payload.canonicalize();
    match args {
        [] => {
            if payload_canon == Ty::Null {
                Ok(())
            } else {
                Err(TypeError::ArgumentCountMismatch {
                    expected: 1,
                    found: 0,
                    span,
                })
            }
        }
        [arg] => check_argument(payload, arg),
        _ => {
            let elems: Vec<&Ty> = match &payload_canon {
                Ty::Tuple(elems) => elems.iter().collect(),
                Ty::NamedTuple(fields) => fields.iter().map(|f| &f.ty).collect(),
                _ => {
                    return Err(TypeError::ArgumentCountMismatch {
                        expected: 1,
                        found: args.len(),
                        span,
                    })
                }
            };
            if elems.len() != args.len() {
                return Err(TypeError::ArgumentCountMismatch {
                    expected: elems.len(),
                    found: args.len(),
                    span,
                });
            }
            elems
                .into_iter()
                .zip(args)
                .try_for_each(|(elem, arg)| check_argument(elem, arg))
        }
    }
}

fn check_argument(expected: &Ty, arg: &TExpr) -> Result<(), TypeError> {
    if expected.is_assignable_from(&arg.ty) {
        Ok(())
    } else {
        Err(TypeError::mismatch(&arg.ty, expected.clone(), arg.span))
    }
}
