//! Resolution of syntactic type references.

use rustc_hash::FxHashSet;

use plume_syntax::{TypeRef, TypeRefKind};

use crate::error::TypeError;
use crate::scope::Scope;
use crate::ty::{NamedTupleEntry, Ty};

/// Turn a written type into a [`Ty`].
///
/// Built-in names take precedence over declared ones; anything else must be
/// an enum or alias visible in `scope`. Declared aliases are returned as
/// aliases, not canonicalized.
pub fn resolve_type(ty: &TypeRef, scope: &Scope) -> Result<Ty, TypeError> {
    match &ty.kind {
        TypeRefKind::Named(name) => match builtin(name) {
            Some(builtin) => Ok(builtin),
            None => scope
                .lookup_type(name)
                .cloned()
                .ok_or_else(|| TypeError::MissingDeclaration {
                    expected: "type",
                    name: name.clone(),
                    span: ty.span,
                }),
        },
        TypeRefKind::Tuple(elems) => Ok(Ty::Tuple(
            elems
                .iter()
                .map(|elem| resolve_type(elem, scope))
                .collect::<Result<_, _>>()?,
        )),
        TypeRefKind::NamedTuple(fields) => {
            let mut seen = FxHashSet::default();
            let mut entries = Vec::with_capacity(fields.len());
            for (name, field_ty) in fields {
                if !seen.insert(name.as_str()) {
                    return Err(TypeError::DuplicateNamedTupleEntry {
                        field: name.clone(),
                        span: field_ty.span,
                    });
                }
                entries.push(NamedTupleEntry::new(name.clone(), resolve_type(field_ty, scope)?));
            }
            Ok(Ty::NamedTuple(entries))
        }
        TypeRefKind::Seq(elem) => Ok(Ty::seq(resolve_type(elem, scope)?)),
        TypeRefKind::Map(key, value) => Ok(Ty::map(
            resolve_type(key, scope)?,
            resolve_type(value, scope)?,
        )),
    }
}

fn builtin(name: &str) -> Option<Ty> {
    let ty = match name {
        "int" => Ty::Int,
        "float" => Ty::Float,
        "bool" => Ty::Bool,
        "any" | "data" => Ty::Any,
        "event" => Ty::Event,
        "machine" => Ty::Machine,
        _ => return None,
    };
    Some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_common::Span;

    fn named(name: &str) -> TypeRef {
        TypeRef::named(Span::new(0, name.len() as u32), name)
    }

    #[test]
    fn builtins_and_composites() {
        let scope = Scope::new();
        let map = TypeRef::new(
            Span::new(0, 20),
            TypeRefKind::Map(Box::new(named("int")), Box::new(TypeRef::new(
                Span::new(9, 19),
                TypeRefKind::Seq(Box::new(named("data"))),
            ))),
        );
        assert_eq!(resolve_type(&map, &scope).unwrap(), Ty::map(Ty::Int, Ty::seq(Ty::Any)));
    }

    #[test]
    fn declared_names_resolve_through_scope() {
        let mut scope = Scope::new();
        let color = scope.declare_enum("Color", [("Red", 0)]).unwrap();
        let pair = scope
            .declare_alias("Pair", Ty::tuple(vec![Ty::Int, Ty::Int]))
            .unwrap();
        assert_eq!(resolve_type(&named("Color"), &scope).unwrap(), color);
        assert_eq!(resolve_type(&named("Pair"), &scope).unwrap(), pair);
    }

    #[test]
    fn unknown_name_is_missing_type() {
        let scope = Scope::new();
        let err = resolve_type(&named("Nope"), &scope).unwrap_err();
        assert!(matches!(
            err,
            TypeError::MissingDeclaration { expected: "type", ref name, .. } if name == "Nope"
        ));
    }

    #[test]
    fn named_tuple_fields_must_be_unique() {
        let scope = Scope::new();
        let ty = TypeRef::new(
            Span::new(0, 20),
            TypeRefKind::NamedTuple(vec![
                ("a".into(), named("int")),
                ("a".into(), named("bool")),
            ]),
        );
        let err = resolve_type(&ty, &scope).unwrap_err();
        assert!(matches!(err, TypeError::DuplicateNamedTupleEntry { ref field, .. } if field == "a"));
    }
}
