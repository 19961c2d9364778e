//! List and string inspection: len, head, last, tail, init, isNull, push
//!
//! Lists have no literal syntax; they enter programs through these builtins
//! and through host bindings, so `push` mutates its list in place rather
//! than returning a copy.

use crate::env::Environment;
use crate::error::{RuntimeError, ARITY_AT_LEAST_TWO, ARITY_ONE};
use crate::value::{BuiltInFn, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Byte length of a string or element count of a list.
pub fn builtin_len(args: &[Value], _env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::arity_error("len", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::Str(text) => Ok(Value::Integer(text.len() as i64)),
        Value::List(items) => Ok(Value::Integer(items.borrow().len() as i64)),
        other => Err(RuntimeError::type_error("len", "STRING or LIST", other, 1)),
    }
}

/// First element of a non-empty list, or the first byte of a non-empty
/// string as a single-character string.
pub fn builtin_head(args: &[Value], _env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::arity_error("head", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::List(items) => match items.borrow().first() {
            Some(first) => Ok(first.clone()),
            None => Err(RuntimeError::builtin_failure("head", "head of empty list")),
        },
        Value::Str(text) => match text.as_bytes().first() {
            Some(first) => Ok(Value::Str((*first as char).to_string())),
            None => Err(RuntimeError::builtin_failure("head", "head of empty string")),
        },
        other => Err(RuntimeError::type_error("head", "LIST or STRING", other, 1)),
    }
}

/// Symmetric to head for the last element / byte.
pub fn builtin_last(args: &[Value], _env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::arity_error("last", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::List(items) => match items.borrow().last() {
            Some(last) => Ok(last.clone()),
            None => Err(RuntimeError::builtin_failure("last", "last of empty list")),
        },
        Value::Str(text) => match text.as_bytes().last() {
            Some(last) => Ok(Value::Str((*last as char).to_string())),
            None => Err(RuntimeError::builtin_failure("last", "last of empty string")),
        },
        other => Err(RuntimeError::type_error("last", "LIST or STRING", other, 1)),
    }
}

/// All but the first element of a non-empty list. A one-element list
/// yields an empty list.
pub fn builtin_tail(args: &[Value], _env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::arity_error("tail", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::List(items) => {
            let items = items.borrow();
            if items.is_empty() {
                return Err(RuntimeError::builtin_failure("tail", "tail of empty list"));
            }
            Ok(Value::list(items[1..].to_vec()))
        }
        other => Err(RuntimeError::type_error("tail", "LIST", other, 1)),
    }
}

/// All but the last element of a non-empty list.
pub fn builtin_init(args: &[Value], _env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::arity_error("init", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::List(items) => {
            let items = items.borrow();
            if items.is_empty() {
                return Err(RuntimeError::builtin_failure("init", "init of empty list"));
            }
            Ok(Value::list(items[..items.len() - 1].to_vec()))
        }
        other => Err(RuntimeError::type_error("init", "LIST", other, 1)),
    }
}

/// True iff the argument is a list with zero elements.
pub fn builtin_is_null(args: &[Value], _env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::arity_error("isNull", ARITY_ONE, args.len()));
    }
    match &args[0] {
        Value::List(items) => Ok(Value::Boolean(items.borrow().is_empty())),
        _ => Ok(Value::Boolean(false)),
    }
}

/// Appends each value to the list in order, mutating it. Returns Empty.
pub fn builtin_push(args: &[Value], _env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() < 2 {
        return Err(RuntimeError::arity_error(
            "push",
            ARITY_AT_LEAST_TWO,
            args.len(),
        ));
    }
    let items = match &args[0] {
        Value::List(items) => items,
        other => return Err(RuntimeError::type_error("push", "LIST", other, 1)),
    };
    for (offset, value) in args[1..].iter().enumerate() {
        match value {
            Value::Integer(_)
            | Value::Float(_)
            | Value::Boolean(_)
            | Value::Str(_)
            | Value::List(_) => {}
            other => {
                return Err(RuntimeError::type_error(
                    "push",
                    "INTEGER, FLOATING, BOOLEAN, STRING or LIST",
                    other,
                    offset + 2,
                ));
            }
        }
        items.borrow_mut().push(value.clone());
    }
    Ok(Value::Empty)
}

/// Register all list builtins in the table
pub fn register(table: &mut HashMap<&'static str, BuiltInFn>) {
    table.insert("len", builtin_len);
    table.insert("head", builtin_head);
    table.insert("last", builtin_last);
    table.insert("tail", builtin_tail);
    table.insert("init", builtin_init);
    table.insert("isNull", builtin_is_null);
    table.insert("push", builtin_push);
}
