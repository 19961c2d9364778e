//! Host-side input: getInput
//!
//! `getInput(name, type)` reads one line from standard input, parses it
//! according to the named primitive type and binds the result in the
//! calling environment. The type argument is one of the `DataType` tags
//! (`int`, `flt`, `bool`, `str`).

use crate::env::Environment;
use crate::error::{RuntimeError, ARITY_TWO};
use crate::value::{BuiltInFn, Value};
use std::collections::HashMap;
use std::io::BufRead;
use std::rc::Rc;

/// Reads a line from stdin, parses it per the type tag and binds it.
/// Returns Empty.
pub fn builtin_get_input(args: &[Value], env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if args.len() != 2 {
        return Err(RuntimeError::arity_error("getInput", ARITY_TWO, args.len()));
    }
    let name = match &args[0] {
        Value::Str(name) => name.clone(),
        other => return Err(RuntimeError::type_error("getInput", "STRING", other, 1)),
    };
    let tag = match &args[1] {
        Value::DataType(tag) => *tag,
        other => return Err(RuntimeError::type_error("getInput", "DATATYPE", other, 2)),
    };

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| RuntimeError::builtin_failure("getInput", e.to_string()))?;

    let value = parse_input(tag, &line)?;
    env.define(name, value);
    Ok(Value::Empty)
}

/// Parses one input line according to a primitive type tag.
fn parse_input(tag: &str, line: &str) -> Result<Value, RuntimeError> {
    let text = line.trim_end_matches(['\n', '\r']);
    match tag {
        "int" => text.parse::<i64>().map(Value::Integer).map_err(|_| {
            RuntimeError::builtin_failure(
                "getInput",
                format!("could not parse {:?} as \"int\"", text),
            )
        }),
        "flt" => text.parse::<f64>().map(Value::Float).map_err(|_| {
            RuntimeError::builtin_failure(
                "getInput",
                format!("could not parse {:?} as \"flt\"", text),
            )
        }),
        "bool" => match text {
            "true" | "TRUE" => Ok(Value::Boolean(true)),
            "false" | "FALSE" => Ok(Value::Boolean(false)),
            _ => Err(RuntimeError::builtin_failure(
                "getInput",
                format!("could not parse {:?} as \"bool\"", text),
            )),
        },
        "str" => Ok(Value::Str(text.to_string())),
        other => Err(RuntimeError::builtin_failure(
            "getInput",
            format!("unknown datatype {:?}", other),
        )),
    }
}

/// Register all input builtins in the table
pub fn register(table: &mut HashMap<&'static str, BuiltInFn>) {
    table.insert("getInput", builtin_get_input);
}
