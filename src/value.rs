// ABOUTME: Runtime value variants produced by the evaluator

use crate::ast::Block;
use crate::env::Environment;
use crate::error::RuntimeError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A native operation callable by name from user code. The environment is
/// the caller's frame; only `getInput` writes into it.
pub type BuiltInFn = fn(&[Value], &Rc<Environment>) -> Result<Value, RuntimeError>;

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Str(String),
    /// Shared interior mutability so `push` can append in place.
    List(Rc<RefCell<Vec<Value>>>),
    Function {
        params: Vec<String>,
        body: Rc<Block>,
        env: Rc<Environment>,
    },
    BuiltIn(BuiltInFn),
    /// Wrapper that carries an `r:` result up through nested blocks until it
    /// meets the nearest enclosing call or the program root.
    Return(Box<Value>),
    /// Type tag consumed by `getInput`.
    DataType(&'static str),
    /// The unit / null value.
    Empty,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOATING",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::List(_) => "LIST",
            Value::Function { .. } => "FUNCTION",
            Value::BuiltIn(_) => "BUILTIN",
            Value::Return(_) => "RETURN_VALUE",
            Value::DataType(_) => "DATATYPE",
            Value::Empty => "EMPTY",
        }
    }

    /// Convenience constructor for list values.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "{}", value),
            Value::List(items) => {
                let rendered: Vec<String> =
                    items.borrow().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Function { params, .. } => write!(f, "f({})", params.join(", ")),
            Value::BuiltIn(_) => write!(f, "builtin function"),
            Value::Return(inner) => write!(f, "{}", inner),
            Value::DataType(name) => write!(f, "{}", name),
            Value::Empty => Ok(()),
        }
    }
}

// Manual Debug: a function that captures the environment it is bound in
// would otherwise recurse forever through the env chain.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "Integer({})", value),
            Value::Float(value) => write!(f, "Float({})", value),
            Value::Boolean(value) => write!(f, "Boolean({})", value),
            Value::Str(value) => write!(f, "Str({:?})", value),
            Value::List(items) => f.debug_tuple("List").field(&items.borrow()).finish(),
            Value::Function { params, .. } => {
                f.debug_struct("Function").field("params", params).finish()
            }
            Value::BuiltIn(_) => write!(f, "BuiltIn"),
            Value::Return(inner) => f.debug_tuple("Return").field(inner).finish(),
            Value::DataType(name) => write!(f, "DataType({})", name),
            Value::Empty => write!(f, "Empty"),
        }
    }
}

// Structural equality for the data variants; functions compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(l), Value::Integer(r)) => l == r,
            (Value::Float(l), Value::Float(r)) => l == r,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::List(l), Value::List(r)) => {
                Rc::ptr_eq(l, r) || *l.borrow() == *r.borrow()
            }
            (
                Value::Function { body: l, env: le, .. },
                Value::Function { body: r, env: re, .. },
            ) => Rc::ptr_eq(l, r) && Rc::ptr_eq(le, re),
            (Value::BuiltIn(l), Value::BuiltIn(r)) => *l as usize == *r as usize,
            (Value::Return(l), Value::Return(r)) => l == r,
            (Value::DataType(l), Value::DataType(r)) => l == r,
            (Value::Empty, Value::Empty) => true,
            _ => false,
        }
    }
}
