use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::error::RuntimeError;
use crate::value::Value;

/// One scope: its own binding table plus an optional parent link.
struct Scope {
    parent: Option<Environment>,
    bindings: RefCell<HashMap<String, Value>>,
}

/// A node in the lexical scope chain.
///
/// Cloning an `Environment` is cheap and yields another handle to the same
/// scope, which is how closures keep their declaration scope alive. Children
/// hold a handle to their parent; nothing ever points the other way, and a
/// scope only ever writes to its own table — ancestors are read-only from
/// below.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<Scope>,
}

impl Environment {
    /// A fresh root scope.
    pub fn new() -> Self {
        Self {
            scope: Rc::new(Scope {
                parent: None,
                bindings: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// A fresh scope whose lookups fall through to `parent`.
    pub fn with_parent(parent: &Environment) -> Self {
        Self {
            scope: Rc::new(Scope {
                parent: Some(parent.clone()),
                bindings: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Binds `name` in this scope and hands the value back. Fails if `name`
    /// is already bound here; bindings in ancestors don't conflict (they are
    /// shadowed instead).
    pub fn declare(&self, name: &str, value: Value) -> Result<Value, RuntimeError> {
        let mut bindings = self.scope.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(RuntimeError::duplicate_binding(name));
        }
        bindings.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Finds the innermost scope that binds `name`.
    pub fn resolve(&self, name: &str) -> Option<Environment> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            if env.scope.bindings.borrow().contains_key(name) {
                return Some(env);
            }
            current = env.scope.parent.clone();
        }
        None
    }

    /// Looks `name` up through the chain, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.resolve(name)
            .and_then(|env| env.scope.bindings.borrow().get(name).cloned())
    }

    /// True when both handles refer to the same scope.
    pub fn same_scope(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bindings can contain closures that point back into this chain;
        // print names only.
        let mut names: Vec<String> = self.scope.bindings.borrow().keys().cloned().collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("has_parent", &self.scope.parent.is_some())
            .finish()
    }
}
