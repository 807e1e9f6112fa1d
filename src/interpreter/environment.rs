use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single lexical scope with a link to its enclosing scope.
///
/// Cloning an `Environment` aliases the same scope: the interpreter keeps
/// one handle for the globals and one for the current scope, and a block
/// or call makes a fresh child whose `parent` is the scope it opened in.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: Rc<RefCell<HashMap<String, Value>>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            values: Rc::new(RefCell::new(HashMap::new())),
            parent: None,
        }
    }

    pub fn with_parent(parent: Rc<Environment>) -> Self {
        Self {
            values: Rc::new(RefCell::new(HashMap::new())),
            parent: Some(parent),
        }
    }

    /// Create a binding in this scope. Returns false if the name is
    /// already bound here; shadowing a binding in an enclosing scope is
    /// allowed and does not touch the outer binding.
    pub fn define(&self, name: &str, value: Value) -> bool {
        let mut values = self.values.borrow_mut();
        if values.contains_key(name) {
            return false;
        }
        values.insert(name.to_string(), value);
        true
    }

    /// Update an existing binding, searching this scope then the enclosing
    /// chain outward. Returns false if the name is defined nowhere; never
    /// creates a binding.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut values = self.values.borrow_mut();
        if values.contains_key(name) {
            values.insert(name.to_string(), value);
            return true;
        }
        drop(values);

        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => false,
        }
    }

    /// Look a name up, searching outward through the enclosing chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.borrow().get(name) {
            return Some(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.get(name),
            None => None,
        }
    }
}
