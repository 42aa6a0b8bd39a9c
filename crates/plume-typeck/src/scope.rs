//! Symbol table with a frame stack.
//!
//! Variables, functions, machines, events and enum elements share one value
//! namespace: a name binds to exactly one of them per frame. Enum and alias
//! names live in a separate type namespace. Entering a body or block pushes a
//! frame; lookups search from the innermost frame outward, so an inner
//! binding shadows an outer one of any kind.
//!
//! Expression checking only reads the scope.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::symbols::{EnumElem, Function, Machine, PEvent, Variable};
use crate::ty::{EnumTy, Ty};

/// What a value name is bound to.
#[derive(Clone, Debug)]
pub enum Binding {
    Variable(Rc<Variable>),
    Function(Rc<Function>),
    Machine(Rc<Machine>),
    EnumElem(Rc<EnumElem>),
    Event(Rc<PEvent>),
}

impl Binding {
    /// Human-readable kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Binding::Variable(_) => "variable",
            Binding::Function(_) => "function",
            Binding::Machine(_) => "machine",
            Binding::EnumElem(_) => "enum element",
            Binding::Event(_) => "event",
        }
    }
}

/// Declaration-time failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    /// The name is already bound in the current frame.
    Duplicate { name: String, existing: &'static str },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::Duplicate { name, existing } => {
                write!(f, "`{}` is already declared as a {}", name, existing)
            }
        }
    }
}

impl std::error::Error for ScopeError {}

#[derive(Default)]
struct Frame {
    values: FxHashMap<String, Binding>,
    types: FxHashMap<String, Ty>,
}

pub struct Scope {
    /// Index 0 is the global frame.
    frames: Vec<Frame>,
}

impl Scope {
    /// A scope with one global frame holding the `halt` event.
    pub fn new() -> Self {
        let mut global = Frame::default();
        global.values.insert(
            PEvent::HALT.to_string(),
            Binding::Event(Rc::new(PEvent::halt())),
        );
        Scope {
            frames: vec![global],
        }
    }

    /// Enter a body or block.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Leave the innermost frame, dropping its bindings.
    ///
    /// # Panics
    ///
    /// Panics if only the global frame remains.
    pub fn pop_frame(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the global frame");
        self.frames.pop();
    }

    fn current(&mut self) -> &mut Frame {
        self.frames
            .last_mut()
            .expect("frame stack should never be empty")
    }

    fn bind(&mut self, name: &str, binding: Binding) -> Result<(), ScopeError> {
        let frame = self.current();
        if let Some(existing) = frame.values.get(name) {
            return Err(ScopeError::Duplicate {
                name: name.to_string(),
                existing: existing.kind_name(),
            });
        }
        frame.values.insert(name.to_string(), binding);
        Ok(())
    }

    fn bind_type(&mut self, name: &str, ty: Ty) -> Result<(), ScopeError> {
        let frame = self.current();
        if frame.types.contains_key(name) {
            return Err(ScopeError::Duplicate {
                name: name.to_string(),
                existing: "type",
            });
        }
        frame.types.insert(name.to_string(), ty);
        Ok(())
    }

    /// Bind a variable in the current frame.
    pub fn declare_variable(&mut self, var: Variable) -> Result<Rc<Variable>, ScopeError> {
        let var = Rc::new(var);
        self.bind(&var.name, Binding::Variable(Rc::clone(&var)))?;
        Ok(var)
    }

    /// Bind a function in the current frame.
    pub fn declare_function(&mut self, function: Function) -> Result<Rc<Function>, ScopeError> {
        let function = Rc::new(function);
        self.bind(&function.name, Binding::Function(Rc::clone(&function)))?;
        Ok(function)
    }

    /// Bind a machine in the current frame.
    pub fn declare_machine(&mut self, machine: Machine) -> Result<Rc<Machine>, ScopeError> {
        let machine = Rc::new(machine);
        self.bind(&machine.name, Binding::Machine(Rc::clone(&machine)))?;
        Ok(machine)
    }

    /// Bind an event in the current frame.
    pub fn declare_event(&mut self, event: PEvent) -> Result<Rc<PEvent>, ScopeError> {
        let event = Rc::new(event);
        self.bind(&event.name, Binding::Event(Rc::clone(&event)))?;
        Ok(event)
    }

    /// Declare an enum type and each of its `(element, value)` pairs.
    pub fn declare_enum<'n>(
        &mut self,
        name: &str,
        elems: impl IntoIterator<Item = (&'n str, i64)>,
    ) -> Result<Ty, ScopeError> {
        let owner = EnumTy {
            name: name.to_string(),
        };
        self.bind_type(name, Ty::Enum(owner.clone()))?;
        for (elem, value) in elems {
            let elem = Rc::new(EnumElem {
                name: elem.to_string(),
                owner: owner.clone(),
                value,
            });
            self.bind(&elem.name, Binding::EnumElem(Rc::clone(&elem)))?;
        }
        Ok(Ty::Enum(owner))
    }

    /// Bind `name` as an alias of `target` in the type namespace.
    pub fn declare_alias(&mut self, name: &str, target: Ty) -> Result<Ty, ScopeError> {
        let alias = Ty::alias(name, target);
        self.bind_type(name, alias.clone())?;
        Ok(alias)
    }

    /// Innermost binding of `name`, of any kind.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.values.get(name))
    }

    /// Innermost binding of `name` if it is a variable.
    pub fn lookup_variable(&self, name: &str) -> Option<&Rc<Variable>> {
        match self.lookup(name)? {
            Binding::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// Innermost binding of `name` if it is a function.
    pub fn lookup_function(&self, name: &str) -> Option<&Rc<Function>> {
        match self.lookup(name)? {
            Binding::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Innermost binding of `name` if it is a machine.
    pub fn lookup_machine(&self, name: &str) -> Option<&Rc<Machine>> {
        match self.lookup(name)? {
            Binding::Machine(machine) => Some(machine),
            _ => None,
        }
    }

    /// Innermost binding of `name` if it is an enum element.
    pub fn lookup_enum_elem(&self, name: &str) -> Option<&Rc<EnumElem>> {
        match self.lookup(name)? {
            Binding::EnumElem(elem) => Some(elem),
            _ => None,
        }
    }

    /// Innermost binding of `name` if it is an event.
    pub fn lookup_event(&self, name: &str) -> Option<&Rc<PEvent>> {
        match self.lookup(name)? {
            Binding::Event(event) => Some(event),
            _ => None,
        }
    }

    /// Innermost enum or alias named `name`.
    pub fn lookup_type(&self, name: &str) -> Option<&Ty> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.types.get(name))
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_kind() {
        let mut scope = Scope::new();
        scope.declare_variable(Variable::new("x", Ty::Int)).unwrap();
        scope
            .declare_function(Function::new("f", vec![], Ty::Null))
            .unwrap();

        assert!(scope.lookup_variable("x").is_some());
        assert!(scope.lookup_function("x").is_none());
        assert!(scope.lookup_function("f").is_some());
        assert!(scope.lookup_variable("f").is_none());
        assert!(scope.lookup("y").is_none());
    }

    #[test]
    fn halt_is_predeclared() {
        let scope = Scope::new();
        let halt = scope.lookup_event("halt").expect("halt event");
        assert_eq!(halt.name, "halt");
        assert!(halt.payload.is_none());
    }

    #[test]
    fn enum_declares_type_and_elements() {
        let mut scope = Scope::new();
        let color = scope.declare_enum("Color", [("Red", 0), ("Green", 5)]).unwrap();

        assert_eq!(scope.lookup_type("Color"), Some(&color));
        let green = scope.lookup_enum_elem("Green").unwrap();
        assert_eq!(green.value, 5);
        assert_eq!(green.ty(), color);
    }

    #[test]
    fn duplicate_in_same_frame_is_rejected() {
        let mut scope = Scope::new();
        scope.declare_variable(Variable::new("x", Ty::Int)).unwrap();
        let err = scope
            .declare_machine(Machine::new("x", Ty::Null))
            .unwrap_err();
        assert_eq!(
            err,
            ScopeError::Duplicate {
                name: "x".into(),
                existing: "variable"
            }
        );
        insta::assert_snapshot!(err.to_string(), @"`x` is already declared as a variable");
    }

    #[test]
    fn inner_frame_shadows_outer_binding_of_any_kind() {
        let mut scope = Scope::new();
        scope.declare_event(PEvent::new("ping", None)).unwrap();

        scope.push_frame();
        scope.declare_variable(Variable::new("ping", Ty::Bool)).unwrap();
        assert!(scope.lookup_variable("ping").is_some());
        assert!(scope.lookup_event("ping").is_none());

        scope.pop_frame();
        assert!(scope.lookup_event("ping").is_some());
        assert!(scope.lookup_variable("ping").is_none());
    }

    #[test]
    fn aliases_live_in_the_type_namespace() {
        let mut scope = Scope::new();
        scope.declare_variable(Variable::new("Point", Ty::Int)).unwrap();
        let point = scope
            .declare_alias("Point", Ty::tuple(vec![Ty::Int, Ty::Int]))
            .unwrap();
        assert_eq!(scope.lookup_type("Point"), Some(&point));
        assert!(scope.lookup_variable("Point").is_some());
    }

    #[test]
    #[should_panic(expected = "cannot pop the global frame")]
    fn pop_global_frame_panics() {
        let mut scope = Scope::new();
        scope.pop_frame();
    }
}
