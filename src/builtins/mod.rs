//! # Built-in Functions Module
//!
//! The fixed name → native-operation table consulted by identifier lookup
//! when the environment chain has no binding for a name.
//!
//! ## Categories
//!
//! - **[lists]** (7): len, head, last, tail, init, isNull, push
//! - **[console]** (1): print
//! - **[input]** (1): getInput
//!
//! Each category is a sub-module with its own register function that adds its
//! entries to the table. The module also owns the type-tag table mapping the
//! primitive type spellings (`int`, `flt`, `bool`, `str`) to `DataType`
//! values for `getInput`.

use crate::value::{BuiltInFn, Value};
use std::collections::HashMap;

pub mod console;
pub mod input;
pub mod lists;

/// Assembles the complete built-in table.
pub fn all() -> HashMap<&'static str, BuiltInFn> {
    let mut table = HashMap::new();
    lists::register(&mut table);
    console::register(&mut table);
    input::register(&mut table);
    table
}

/// Resolves a primitive type spelling to its tag value.
pub fn type_tag(name: &str) -> Option<Value> {
    match name {
        "int" => Some(Value::DataType("int")),
        "flt" => Some(Value::DataType("flt")),
        "bool" => Some(Value::DataType("bool")),
        "str" => Some(Value::DataType("str")),
        _ => None,
    }
}
