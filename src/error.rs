// ABOUTME: Error types for lexing, parsing and evaluation failures in the Colon interpreter

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

/// Fatal lexical errors. The driver maps these to exit code 65.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Error on line {line} : ILLEGAL_TOKEN [ {found} ] found.")]
    IllegalCharacter { found: String, line: usize },

    #[error("Error on line {line} : string literal may not be closed")]
    UnterminatedString { line: usize },
}

/// A recoverable parse error: the parser accumulates these and keeps going.
/// `snippet` is the offending source line quoted below the diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error on line {line} : {message}\n\n\t{snippet}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
    pub snippet: String,
}

/// Fatal evaluation errors. The driver maps these to exit code 22.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Type mismatch with function name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String, // "1", "2", "at least 2"
        actual: usize,
    },

    /// Failure inside a built-in, with function context
    #[error("{function}: {message}")]
    BuiltInFailure { function: String, message: String },

    #[error("unknown prefix operation, operator used => [ {0} ]")]
    UnknownPrefixOperator(String),

    #[error("cannot perform {operation} operation on type \"{type_name}\"")]
    PrefixTypeError {
        operation: &'static str,
        type_name: &'static str,
    },

    #[error("cannot apply operator [ {operator} ] to types \"{left}\" and \"{right}\"")]
    InfixTypeError {
        operator: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("{construct} condition must be a BOOLEAN, got \"{type_name}\"")]
    NonBooleanCondition {
        construct: &'static str,
        type_name: &'static str,
    },

    #[error("identifier not found: {0}")]
    UndefinedIdentifier(String),

    #[error("value of type \"{0}\" is not callable")]
    NotCallable(&'static str),

    #[error("expression did not evaluate to a legal datatype")]
    IllegalVarValue,
}

impl RuntimeError {
    /// Create a type mismatch error with full context
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        RuntimeError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        RuntimeError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a built-in failure with function context
    pub fn builtin_failure(function: &str, message: impl Into<String>) -> Self {
        RuntimeError::BuiltInFailure {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
