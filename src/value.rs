use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::ast::Expr;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;

/// A runtime value. Objects and functions are reference-counted so that
/// values can be shared between bindings without deep copies.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Number(f64),
    Bool(bool),
    String(Rc<str>),
    Object(Rc<RefCell<IndexMap<String, Value>>>),
    Function(Rc<Function>),
    NativeFunction(Rc<NativeFunction>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Object(left), Value::Object(right)) => left == right,
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            (Value::NativeFunction(left), Value::NativeFunction(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(numeric_value) = self {
            Some(*numeric_value)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(bool_value) = self {
            Some(*bool_value)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(string_ref) = self {
            Some(string_ref.as_ref())
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<Ref<'_, IndexMap<String, Value>>> {
        if let Value::Object(object) = self {
            Some(object.borrow())
        } else {
            None
        }
    }

    /// The value's kind, as it appears in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::NativeFunction(_) => "native function",
        }
    }
}

/// A user-defined function. The environment captured here is the one active
/// at the declaration site, which is what makes closures lexical; it also
/// already contains the function's own binding once declared, so direct
/// recursion resolves by ordinary name lookup.
#[derive(Clone)]
pub struct Function {
    pub name: Rc<str>,
    pub parameters: Vec<Rc<str>>,
    pub declaration_env: Environment,
    pub body: Vec<Expr>,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The captured environment can reach this function again; keep it
        // out of the debug output.
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("body", &self.body.len())
            .finish()
    }
}

/// A host-supplied callable. The callback receives the evaluated argument
/// list and the environment at the call site; any effect (output, clocks,
/// ...) happens on the host's side of this boundary.
pub struct NativeFunction {
    pub name: Rc<str>,
    call: Box<dyn Fn(&[Value], &Environment) -> Result<Value, RuntimeError>>,
}

impl NativeFunction {
    pub fn invoke(&self, args: &[Value], env: &Environment) -> Result<Value, RuntimeError> {
        (self.call)(args, env)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Wraps a host callback as a `Value` ready to be declared in an environment.
pub fn native(
    name: impl Into<Rc<str>>,
    call: impl Fn(&[Value], &Environment) -> Result<Value, RuntimeError> + 'static,
) -> Value {
    Value::NativeFunction(Rc::new(NativeFunction {
        name: name.into(),
        call: Box::new(call),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Number(3.0), Value::Number(3.0));
        assert_ne!(Value::Number(3.0), Value::Bool(true));
        assert_eq!(Value::String(Rc::from("a")), Value::String(Rc::from("a")));
        assert_eq!(Value::Unit, Value::Unit);
    }

    #[test]
    fn test_native_functions_compare_by_identity() {
        let a = native("print", |_, _| Ok(Value::Unit));
        let b = native("print", |_, _| Ok(Value::Unit));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Unit.type_name(), "unit");
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::String(Rc::from("s")).type_name(), "string");
    }
}
