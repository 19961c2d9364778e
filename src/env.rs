// ABOUTME: Environment module managing lexically chained name bindings

use crate::error::RuntimeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A name → value table with a link to the enclosing scope. The chain is a
/// tree whose root is the global environment; function values keep their
/// defining frame alive through the `Rc`.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates the global environment (no enclosing scope).
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a child environment chained to an enclosing scope.
    pub fn with_outer(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// The enclosing scope, if any.
    pub fn outer(&self) -> Option<Rc<Environment>> {
        self.outer.clone()
    }

    /// Binds a name in THIS scope (never walks the outer chain).
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks a name up in this scope, then outward through the chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        if let Some(ref outer) = self.outer {
            return outer.get(name);
        }
        None
    }

    /// Updates an existing binding wherever it lives along the chain.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        if let Some(ref outer) = self.outer {
            return outer.assign(name, value);
        }
        Err(RuntimeError::UndefinedIdentifier(name.to_string()))
    }
}
