//! Declarations the checker resolves names to.
//!
//! These are produced by declaration-level checking and shared through the
//! [`Scope`](crate::scope::Scope) as `Rc`s; typed nodes point back at them.

use std::cell::Cell;
use std::rc::Rc;

use crate::ty::{EnumTy, Ty};

/// A local, parameter or machine field.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: Ty,
    /// The machine whose state this variable belongs to, if any.
    pub owner: Option<Rc<Machine>>,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Variable {
            name: name.into(),
            ty,
            owner: None,
        }
    }
}

/// A formal parameter of a function.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Param { name: name.into(), ty }
    }
}

/// A function or handler body.
///
/// `nondeterministic` is set while checking the body when it contains `$` or
/// `$$`; later phases use it to decide whether every choice must be explored.
/// Interior mutability keeps the function shareable through the scope, and
/// also makes `Function` `!Sync`: each checking unit needs its own.
#[derive(Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_ty: Ty,
    pub owner: Option<Rc<Machine>>,
    nondeterministic: Cell<bool>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<Param>, return_ty: Ty) -> Self {
        Function {
            name: name.into(),
            params,
            return_ty,
            owner: None,
            nondeterministic: Cell::new(false),
        }
    }

    /// A function declared inside `machine`, where `this` is available.
    pub fn owned_by(mut self, machine: Rc<Machine>) -> Self {
        self.owner = Some(machine);
        self
    }

    pub fn is_nondeterministic(&self) -> bool {
        self.nondeterministic.get()
    }

    pub fn mark_nondeterministic(&self) {
        self.nondeterministic.set(true);
    }
}

/// A machine declaration. `payload` is what `new M(...)` must supply;
/// `null` when the constructor takes nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Machine {
    pub name: String,
    pub payload: Ty,
}

impl Machine {
    pub fn new(name: impl Into<String>, payload: Ty) -> Self {
        Machine {
            name: name.into(),
            payload,
        }
    }
}

/// An event declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct PEvent {
    pub name: String,
    pub payload: Option<Ty>,
}

impl PEvent {
    pub const HALT: &'static str = "halt";

    pub fn new(name: impl Into<String>, payload: Option<Ty>) -> Self {
        PEvent {
            name: name.into(),
            payload,
        }
    }

    pub fn halt() -> Self {
        PEvent::new(Self::HALT, None)
    }
}

/// One element of an enum declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumElem {
    pub name: String,
    pub owner: EnumTy,
    pub value: i64,
}

impl EnumElem {
    pub fn ty(&self) -> Ty {
        Ty::Enum(self.owner.clone())
    }
}
