//! Type references as written in source.

use serde::Serialize;

use crate::Span;

/// A syntactic type, resolved against a scope by the checker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRef {
    pub span: Span,
    pub kind: TypeRefKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeRefKind {
    /// A built-in (`int`, `bool`, ...) or declared (enum, alias) type name.
    Named(String),
    Tuple(Vec<TypeRef>),
    NamedTuple(Vec<(String, TypeRef)>),
    Seq(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    pub fn new(span: Span, kind: TypeRefKind) -> Self {
        TypeRef { span, kind }
    }

    pub fn named(span: Span, name: impl Into<String>) -> Self {
        TypeRef::new(span, TypeRefKind::Named(name.into()))
    }
}
