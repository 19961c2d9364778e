// ABOUTME: Front-to-back pipeline gluing lexer, parser and evaluator together

use crate::env::Environment;
use crate::error::{LexError, ParseError, RuntimeError};
use crate::eval::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;
use std::rc::Rc;
use thiserror::Error;

/// The single choke-point for every fatal condition in the pipeline. Only
/// `main` turns one of these into a process exit; tests inspect them as
/// values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error("Runtime Error : {0}")]
    Runtime(#[from] RuntimeError),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    rendered.join("\n")
}

impl InterpretError {
    /// The process exit code this error maps to: 65 for lexical errors,
    /// 22 for parse and runtime errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpretError::Lex(_) => 65,
            InterpretError::Parse(_) | InterpretError::Runtime(_) => 22,
        }
    }
}

/// Runs a source string through the whole pipeline in a fresh environment
/// and returns the program's resulting value.
pub fn interpret(source: &str) -> Result<Value, InterpretError> {
    let env = Environment::new();
    let mut evaluator = Evaluator::new();
    interpret_in(source, &env, &mut evaluator)
}

/// Like [`interpret`], but reusing an existing environment and evaluator so
/// a REPL can keep bindings across lines.
pub fn interpret_in(
    source: &str,
    env: &Rc<Environment>,
    evaluator: &mut Evaluator,
) -> Result<Value, InterpretError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.lex()?;
    let mut parser = Parser::new(tokens, lexer.source_lines());
    let program = parser.parse();
    if !parser.errors().is_empty() {
        return Err(InterpretError::Parse(parser.errors().to_vec()));
    }
    Ok(evaluator.eval_program(&program, env)?)
}
