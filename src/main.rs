mod ast;
mod builtins;
mod env;
mod error;
mod eval;
mod interpreter;
mod lexer;
mod parser;
mod token;
mod value;

use clap::Parser;
use env::Environment;
use eval::Evaluator;
use interpreter::{interpret, interpret_in};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::{Path, PathBuf};
use std::process;
use value::Value;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interpreter for the Colon programming language
#[derive(Parser, Debug)]
#[command(name = "colon")]
#[command(version = VERSION)]
#[command(about = "Colon Programming Language Interpreter")]
#[command(long_about = "A tree-walking interpreter for Colon, a small \
dynamically-typed scripting language whose blocks open and close with the \
colon character.\n\nSource: https://github.com/colon-lang/colon-rs")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    match args.script {
        Some(path) => run_file(&path),
        None => repl(),
    }
}

/// Executes a script file. Diagnostics go to standard output; fatal errors
/// terminate the process with the matching exit code.
fn run_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            println!("Error reading file : {} ({})", path.display(), e);
            process::exit(1);
        }
    };
    if let Err(e) = interpret(&source) {
        println!("{}", e);
        process::exit(e.exit_code());
    }
    Ok(())
}

/// The interactive loop. Bindings persist across lines; errors are printed
/// and the loop continues.
fn repl() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(config)
        .map_err(|e| format!("Failed to initialize REPL: {}", e))?;

    let history_file = ".colon_history";
    let _ = rl.load_history(history_file);

    println!("COLON v{}", VERSION);
    println!("Type q: to quit.");

    let env = Environment::new();
    let mut evaluator = Evaluator::new();

    loop {
        match rl.readline("::> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "q:" {
                    println!("Goodbye!");
                    break;
                }
                match interpret_in(line, &env, &mut evaluator) {
                    Ok(Value::Empty) => {}
                    Ok(value) => println!("=> {}", value),
                    Err(e) => println!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}
