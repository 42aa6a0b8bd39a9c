//! Type representation for the Plume type system.
//!
//! Types are structural: two tuples with the same element types are the same
//! type no matter where they were written. The only nominal pieces are enums
//! (compared by name) and aliases, which are transparent once canonicalized.

use std::fmt;
use std::rc::Rc;

/// A declared enum. Its elements carry integer values; the base type is Int.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumTy {
    pub name: String,
}

/// One field of a named tuple type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedTupleEntry {
    pub name: String,
    pub ty: Ty,
}

impl NamedTupleEntry {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        NamedTupleEntry { name: name.into(), ty }
    }
}

/// A named reference to another type, introduced by a `type` declaration.
///
/// The target is held by value, so alias chains are finite.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyAlias {
    pub name: String,
    pub target: Ty,
}

/// A Plume type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Int,
    Float,
    Bool,
    /// Top type: every value is assignable to it.
    Any,
    /// Type of the `null` literal.
    Null,
    /// Opaque event reference.
    Event,
    /// Opaque machine reference.
    Machine,
    Enum(EnumTy),
    Tuple(Vec<Ty>),
    NamedTuple(Vec<NamedTupleEntry>),
    Seq(Box<Ty>),
    Map(Box<Ty>, Box<Ty>),
    Alias(Rc<TyAlias>),
}

/// The variant tag of a canonical type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TyKind {
    Int,
    Float,
    Bool,
    Any,
    Null,
    Event,
    Machine,
    Enum,
    Tuple,
    NamedTuple,
    Seq,
    Map,
}

impl Ty {
    /// Create a `seq[elem]` type.
    pub fn seq(elem: Ty) -> Ty {
        Ty::Seq(Box::new(elem))
    }

    /// Create a `map[key, value]` type.
    pub fn map(key: Ty, value: Ty) -> Ty {
        Ty::Map(Box::new(key), Box::new(value))
    }

    /// Create a positional tuple type.
    pub fn tuple(elems: Vec<Ty>) -> Ty {
        Ty::Tuple(elems)
    }

    /// Named tuple from `(field, type)` pairs, in declaration order.
    pub fn named_tuple<S: Into<String>>(fields: impl IntoIterator<Item = (S, Ty)>) -> Ty {
        Ty::NamedTuple(
            fields
                .into_iter()
                .map(|(name, ty)| NamedTupleEntry::new(name, ty))
                .collect(),
        )
    }

    /// Reference to the enum type declared as `name`.
    pub fn enumeration(name: impl Into<String>) -> Ty {
        Ty::Enum(EnumTy { name: name.into() })
    }

    /// Create an alias `name` for `target`.
    pub fn alias(name: impl Into<String>, target: Ty) -> Ty {
        Ty::Alias(Rc::new(TyAlias {
            name: name.into(),
            target,
        }))
    }

    /// Resolve every alias in this type, including inside tuples, sequences
    /// and maps. The result contains no `Ty::Alias`, so canonicalizing it
    /// again returns an equal value.
    pub fn canonicalize(&self) -> Ty {
        match self {
            Ty::Alias(alias) => alias.target.canonicalize(),
            Ty::Tuple(elems) => Ty::Tuple(elems.iter().map(Ty::canonicalize).collect()),
            Ty::NamedTuple(fields) => Ty::NamedTuple(
                fields
                    .iter()
                    .map(|f| NamedTupleEntry::new(f.name.clone(), f.ty.canonicalize()))
                    .collect(),
            ),
            Ty::Seq(elem) => Ty::seq(elem.canonicalize()),
            Ty::Map(key, value) => Ty::map(key.canonicalize(), value.canonicalize()),
            Ty::Int
            | Ty::Float
            | Ty::Bool
            | Ty::Any
            | Ty::Null
            | Ty::Event
            | Ty::Machine
            | Ty::Enum(_) => self.clone(),
        }
    }

    /// Variant tag after alias resolution.
    pub fn kind(&self) -> TyKind {
        match self {
            Ty::Int => TyKind::Int,
            Ty::Float => TyKind::Float,
            Ty::Bool => TyKind::Bool,
            Ty::Any => TyKind::Any,
            Ty::Null => TyKind::Null,
            Ty::Event => TyKind::Event,
            Ty::Machine => TyKind::Machine,
            Ty::Enum(_) => TyKind::Enum,
            Ty::Tuple(_) => TyKind::Tuple,
            Ty::NamedTuple(_) => TyKind::NamedTuple,
            Ty::Seq(_) => TyKind::Seq,
            Ty::Map(..) => TyKind::Map,
            Ty::Alias(alias) => alias.target.kind(),
        }
    }

    pub fn is_of_kind(&self, kind: TyKind) -> bool {
        self.kind() == kind
    }

    /// Structural equality modulo aliases.
    pub fn is_same_type_as(&self, other: &Ty) -> bool {
        self.canonicalize() == other.canonicalize()
    }

    /// Whether a value of type `source` may be used where `self` is expected.
    ///
    /// Not symmetric: `any` accepts `int` but `int` does not accept `any`.
    pub fn is_assignable_from(&self, source: &Ty) -> bool {
        assignable(&self.canonicalize(), &source.canonicalize())
    }
}

/// Assignability on canonical types.
fn assignable(target: &Ty, source: &Ty) -> bool {
    match (target, source) {
        (Ty::Any, _) => true,
        (Ty::Null | Ty::Event | Ty::Machine, Ty::Null) => true,
        (Ty::Enum(a), Ty::Enum(b)) => a == b,
        (Ty::Tuple(ts), Ty::Tuple(ss)) => {
            ts.len() == ss.len() && ts.iter().zip(ss).all(|(t, s)| assignable(t, s))
        }
        (Ty::NamedTuple(ts), Ty::NamedTuple(ss)) => {
            ts.len() == ss.len()
                && ts
                    .iter()
                    .zip(ss)
                    .all(|(t, s)| t.name == s.name && assignable(&t.ty, &s.ty))
        }
        (Ty::Seq(t), Ty::Seq(s)) => assignable(t, s),
        (Ty::Map(tk, tv), Ty::Map(sk, sv)) => assignable(tk, sk) && assignable(tv, sv),
        (Ty::Int, Ty::Int)
        | (Ty::Float, Ty::Float)
        | (Ty::Bool, Ty::Bool)
        | (Ty::Event, Ty::Event)
        | (Ty::Machine, Ty::Machine) => true,
        _ => false,
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for NamedTupleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
            Ty::Bool => write!(f, "bool"),
            Ty::Any => write!(f, "any"),
            Ty::Null => write!(f, "null"),
            Ty::Event => write!(f, "event"),
            Ty::Machine => write!(f, "machine"),
            Ty::Enum(e) => write!(f, "{}", e.name),
            Ty::Alias(alias) => write!(f, "{}", alias.name),
            Ty::Tuple(elems) => {
                write!(f, "(")?;
                write_list(f, elems)?;
                if elems.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Ty::NamedTuple(fields) => {
                write!(f, "(")?;
                write_list(f, fields)?;
                write!(f, ")")
            }
            Ty::Seq(elem) => write!(f, "seq[{}]", elem),
            Ty::Map(key, value) => write!(f, "map[{}, {}]", key, value),
        }
    }
}

impl fmt::Display for TyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TyKind::Int => "int",
            TyKind::Float => "float",
            TyKind::Bool => "bool",
            TyKind::Any => "any",
            TyKind::Null => "null",
            TyKind::Event => "event",
            TyKind::Machine => "machine",
            TyKind::Enum => "enum",
            TyKind::Tuple => "tuple",
            TyKind::NamedTuple => "named tuple",
            TyKind::Seq => "seq",
            TyKind::Map => "map",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_types() -> Vec<Ty> {
        let point = Ty::named_tuple([("x", Ty::Int), ("y", Ty::Int)]);
        let point_alias = Ty::alias("Point", point.clone());
        vec![
            Ty::Int,
            Ty::Float,
            Ty::Bool,
            Ty::Any,
            Ty::Null,
            Ty::Event,
            Ty::Machine,
            Ty::enumeration("Color"),
            Ty::tuple(vec![Ty::Int, Ty::Bool]),
            point.clone(),
            Ty::seq(point_alias.clone()),
            Ty::map(Ty::Int, Ty::seq(Ty::Float)),
            point_alias.clone(),
            Ty::alias("Line", Ty::tuple(vec![point_alias.clone(), point_alias])),
        ]
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for ty in sample_types() {
            let once = ty.canonicalize();
            assert_eq!(once.canonicalize(), once, "type {ty}");
        }
    }

    #[test]
    fn canonicalize_resolves_nested_aliases() {
        let inner = Ty::alias("Id", Ty::Int);
        let outer = Ty::alias("Ids", Ty::seq(inner));
        assert_eq!(outer.canonicalize(), Ty::seq(Ty::Int));
    }

    #[test]
    fn any_accepts_everything() {
        for ty in sample_types() {
            assert!(Ty::Any.is_assignable_from(&ty), "any from {ty}");
        }
    }

    #[test]
    fn every_type_is_same_as_itself() {
        for ty in sample_types() {
            assert!(ty.is_same_type_as(&ty), "type {ty}");
            assert!(ty.is_assignable_from(&ty), "type {ty}");
        }
    }

    #[test]
    fn tuple_assignability() {
        let int_bool = Ty::tuple(vec![Ty::Int, Ty::Bool]);
        assert!(int_bool.is_assignable_from(&int_bool));
        assert!(!int_bool.is_assignable_from(&Ty::tuple(vec![Ty::Int])));
        assert!(!int_bool.is_assignable_from(&Ty::tuple(vec![Ty::Float, Ty::Bool])));
        assert!(Ty::tuple(vec![Ty::Any, Ty::Bool]).is_assignable_from(&int_bool));
        assert!(!int_bool.is_assignable_from(&Ty::tuple(vec![Ty::Any, Ty::Bool])));
    }

    #[test]
    fn named_tuple_fields_must_match_in_order() {
        let xy = Ty::named_tuple([("x", Ty::Int), ("y", Ty::Int)]);
        let yx = Ty::named_tuple([("y", Ty::Int), ("x", Ty::Int)]);
        let xz = Ty::named_tuple([("x", Ty::Int), ("z", Ty::Int)]);
        assert!(xy.is_assignable_from(&xy.clone()));
        assert!(!xy.is_assignable_from(&yx));
        assert!(!xy.is_assignable_from(&xz));
        assert!(!xy.is_assignable_from(&Ty::tuple(vec![Ty::Int, Ty::Int])));
    }

    #[test]
    fn null_only_flows_into_references() {
        assert!(Ty::Machine.is_assignable_from(&Ty::Null));
        assert!(Ty::Event.is_assignable_from(&Ty::Null));
        assert!(Ty::Null.is_assignable_from(&Ty::Null));
        assert!(!Ty::Int.is_assignable_from(&Ty::Null));
        assert!(!Ty::seq(Ty::Int).is_assignable_from(&Ty::Null));
    }

    #[test]
    fn collections_compare_components() {
        assert!(Ty::seq(Ty::Any).is_assignable_from(&Ty::seq(Ty::Int)));
        assert!(!Ty::seq(Ty::Int).is_assignable_from(&Ty::seq(Ty::Any)));
        assert!(Ty::map(Ty::Int, Ty::Any).is_assignable_from(&Ty::map(Ty::Int, Ty::Bool)));
        assert!(!Ty::map(Ty::Int, Ty::Bool).is_assignable_from(&Ty::map(Ty::Bool, Ty::Bool)));
    }

    #[test]
    fn enums_are_nominal() {
        let color = Ty::enumeration("Color");
        assert!(color.is_assignable_from(&Ty::enumeration("Color")));
        assert!(!color.is_assignable_from(&Ty::enumeration("Shape")));
        assert!(!Ty::Int.is_assignable_from(&color));
        assert!(!color.is_assignable_from(&Ty::Int));
    }

    #[test]
    fn aliases_are_transparent() {
        let id = Ty::alias("Id", Ty::Int);
        assert!(id.is_same_type_as(&Ty::Int));
        assert!(Ty::Int.is_same_type_as(&id));
        assert!(id.is_assignable_from(&Ty::Int));
        assert!(id.is_of_kind(TyKind::Int));
        assert_ne!(id, Ty::Int);
    }

    #[test]
    fn primitives_need_exact_match() {
        assert!(!Ty::Float.is_assignable_from(&Ty::Int));
        assert!(!Ty::Int.is_assignable_from(&Ty::Float));
        assert!(!Ty::Int.is_assignable_from(&Ty::Any));
        assert!(!Ty::Machine.is_assignable_from(&Ty::Event));
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(Ty::map(Ty::Int, Ty::seq(Ty::Bool)).to_string(), @"map[int, seq[bool]]");
        insta::assert_snapshot!(Ty::tuple(vec![Ty::Int]).to_string(), @"(int,)");
        insta::assert_snapshot!(
            Ty::named_tuple([("x", Ty::Float), ("who", Ty::Machine)]).to_string(),
            @"(x: float, who: machine)"
        );
        insta::assert_snapshot!(Ty::alias("Point", Ty::tuple(vec![])).to_string(), @"Point");
        insta::assert_snapshot!(TyKind::NamedTuple.to_string(), @"named tuple");
    }
}
