// ABOUTME: Tree-walking evaluator executing a parsed Program in an environment chain

use crate::ast::{Block, Expression, Identifier, Program, Statement};
use crate::builtins;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::{BuiltInFn, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Evaluator context: the built-in table plus the loop flag consulted by the
/// var-statement binding rule. The flag is saved and restored around each
/// loop so nesting behaves.
pub struct Evaluator {
    builtins: HashMap<&'static str, BuiltInFn>,
    in_loop: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            builtins: builtins::all(),
            in_loop: false,
        }
    }

    /// Evaluates a program top to bottom. An `r:` at program level unwraps
    /// and halts execution with its payload as the program result.
    pub fn eval_program(
        &mut self,
        program: &Program,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let mut result = Value::Empty;
        for statement in &program.statements {
            result = self.eval_statement(statement, env)?;
            if let Value::Return(inner) = result {
                return Ok(*inner);
            }
        }
        Ok(result)
    }

    fn eval_statement(
        &mut self,
        statement: &Statement,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        match statement {
            Statement::Var { name, value, .. } => self.eval_var_statement(name, value, env),
            Statement::Return { value, .. } => {
                let value = self.eval_expression(value, env)?;
                Ok(Value::Return(Box::new(value)))
            }
            Statement::Expr { expression, .. } => self.eval_expression(expression, env),
        }
    }

    /// A `Return` produced anywhere in the block propagates up still
    /// wrapped, so enclosing blocks pass it along unmodified.
    fn eval_block(&mut self, block: &Block, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
        let mut result = Value::Empty;
        for statement in &block.statements {
            let value = self.eval_statement(statement, env)?;
            if matches!(value, Value::Return(_)) {
                return Ok(value);
            }
            result = value;
        }
        Ok(result)
    }

    fn eval_expression(
        &mut self,
        expression: &Expression,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Integer { value, .. } => Ok(Value::Integer(*value)),
            Expression::Float { value, .. } => Ok(Value::Float(*value)),
            Expression::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Expression::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expression::Identifier(identifier) => self.eval_identifier(&identifier.name, env),
            Expression::Prefix {
                operator, right, ..
            } => {
                let right = self.eval_expression(right, env)?;
                eval_prefix_expression(operator, right)
            }
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                eval_infix_expression(operator, left, right)
            }
            Expression::If {
                condition,
                if_body,
                else_body,
                ..
            } => self.eval_if_expression(condition, if_body, else_body.as_ref(), env),
            Expression::Loop {
                condition, body, ..
            } => self.eval_loop_expression(condition, body, env),
            Expression::Function { params, body, .. } => Ok(Value::Function {
                params: params.iter().map(|p| p.name.clone()).collect(),
                body: Rc::new(body.clone()),
                env: env.clone(),
            }),
            Expression::Call { callee, args, .. } => self.eval_call_expression(callee, args, env),
        }
    }

    fn eval_identifier(
        &mut self,
        name: &str,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        if let Some(value) = env.get(name) {
            return Ok(value);
        }
        if let Some(builtin) = self.builtins.get(name) {
            return Ok(Value::BuiltIn(*builtin));
        }
        if let Some(tag) = builtins::type_tag(name) {
            return Ok(tag);
        }
        Err(RuntimeError::UndefinedIdentifier(name.to_string()))
    }

    fn eval_if_expression(
        &mut self,
        condition: &Expression,
        if_body: &Block,
        else_body: Option<&Block>,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        match self.eval_expression(condition, env)? {
            Value::Boolean(true) => self.eval_block(if_body, env),
            Value::Boolean(false) => match else_body {
                Some(block) => self.eval_block(block, env),
                None => Ok(Value::Empty),
            },
            other => Err(RuntimeError::NonBooleanCondition {
                construct: "IF",
                type_name: other.type_name(),
            }),
        }
    }

    fn eval_loop_expression(
        &mut self,
        condition: &Expression,
        body: &Block,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        // condition and body both run in a frame chained to the current one
        let loop_env = Environment::with_outer(env.clone());
        let was_in_loop = self.in_loop;
        self.in_loop = true;
        let outcome = self.run_loop(condition, body, &loop_env);
        self.in_loop = was_in_loop;
        match outcome? {
            Value::Return(inner) => Ok(*inner),
            value => Ok(value),
        }
    }

    fn run_loop(
        &mut self,
        condition: &Expression,
        body: &Block,
        loop_env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let mut result = Value::Empty;
        loop {
            match self.eval_expression(condition, loop_env)? {
                Value::Boolean(true) => result = self.eval_block(body, loop_env)?,
                Value::Boolean(false) => break,
                other => {
                    return Err(RuntimeError::NonBooleanCondition {
                        construct: "LOOP",
                        type_name: other.type_name(),
                    });
                }
            }
        }
        Ok(result)
    }

    fn eval_var_statement(
        &mut self,
        name: &Identifier,
        value: &Expression,
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let value = self.eval_expression(value, env)?;
        if matches!(value, Value::Empty) {
            return Err(RuntimeError::IllegalVarValue);
        }
        // inside a loop, `v:` re-binds an existing outer name in place so
        // each iteration mutates one binding instead of shadowing it
        if self.in_loop {
            if let Some(outer) = env.outer() {
                if outer.get(&name.name).is_some() {
                    outer.assign(&name.name, value)?;
                    return Ok(Value::Empty);
                }
            }
        }
        env.define(name.name.clone(), value);
        Ok(Value::Empty)
    }

    fn eval_call_expression(
        &mut self,
        callee: &Expression,
        args: &[Expression],
        env: &Rc<Environment>,
    ) -> Result<Value, RuntimeError> {
        let callee = self.eval_expression(callee, env)?;
        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.eval_expression(arg, env)?);
        }
        match callee {
            Value::Function {
                params,
                body,
                env: captured,
            } => {
                let call_env = Environment::with_outer(captured);
                // positional binding; surplus arguments are dropped
                for (param, arg) in params.iter().zip(evaluated) {
                    call_env.define(param.clone(), arg);
                }
                match self.eval_block(&body, &call_env)? {
                    Value::Return(inner) => Ok(*inner),
                    value => Ok(value),
                }
            }
            Value::BuiltIn(function) => function(&evaluated, env),
            other => Err(RuntimeError::NotCallable(other.type_name())),
        }
    }
}

fn eval_prefix_expression(operator: &str, right: Value) -> Result<Value, RuntimeError> {
    match operator {
        "!" => match right {
            Value::Boolean(value) => Ok(Value::Boolean(!value)),
            other => Err(RuntimeError::PrefixTypeError {
                operation: "LOGICAL_NOT",
                type_name: other.type_name(),
            }),
        },
        "-" => match right {
            Value::Integer(value) => Ok(Value::Integer(-value)),
            Value::Float(value) => Ok(Value::Float(-value)),
            other => Err(RuntimeError::PrefixTypeError {
                operation: "NUMERIC_NEGATION",
                type_name: other.type_name(),
            }),
        },
        other => Err(RuntimeError::UnknownPrefixOperator(other.to_string())),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => eval_int_int_infix(operator, l, r),
        (Value::Float(l), Value::Float(r)) => eval_flt_flt_infix(operator, l, r),
        // mixed numeric operands promote the integer side
        (Value::Integer(l), Value::Float(r)) => eval_flt_flt_infix(operator, l as f64, r),
        (Value::Float(l), Value::Integer(r)) => eval_flt_flt_infix(operator, l, r as f64),
        (Value::Str(l), Value::Str(r)) => eval_str_str_infix(operator, l, r),
        (Value::Boolean(l), Value::Boolean(r)) => eval_bool_bool_infix(operator, l, r),
        (l, r) => Err(RuntimeError::InfixTypeError {
            operator: operator.to_string(),
            left: l.type_name(),
            right: r.type_name(),
        }),
    }
}

fn eval_int_int_infix(operator: &str, l: i64, r: i64) -> Result<Value, RuntimeError> {
    let value = match operator {
        "+" => Value::Integer(l + r),
        "-" => Value::Integer(l - r),
        "*" => Value::Integer(l * r),
        "/" => Value::Integer(l / r),
        "%" => Value::Integer(l % r),
        "^" => {
            // repeated multiplication; a non-positive exponent yields 1
            let mut result: i64 = 1;
            for _ in 0..r {
                result *= l;
            }
            Value::Integer(result)
        }
        "<" => Value::Boolean(l < r),
        ">" => Value::Boolean(l > r),
        "<=" => Value::Boolean(l <= r),
        ">=" => Value::Boolean(l >= r),
        "==" => Value::Boolean(l == r),
        "!=" => Value::Boolean(l != r),
        other => {
            return Err(RuntimeError::InfixTypeError {
                operator: other.to_string(),
                left: "INTEGER",
                right: "INTEGER",
            });
        }
    };
    Ok(value)
}

fn eval_flt_flt_infix(operator: &str, l: f64, r: f64) -> Result<Value, RuntimeError> {
    let value = match operator {
        "+" => Value::Float(l + r),
        "-" => Value::Float(l - r),
        "*" => Value::Float(l * r),
        "/" => Value::Float(l / r),
        "<" => Value::Boolean(l < r),
        ">" => Value::Boolean(l > r),
        "<=" => Value::Boolean(l <= r),
        ">=" => Value::Boolean(l >= r),
        "==" => Value::Boolean(l == r),
        "!=" => Value::Boolean(l != r),
        other => {
            return Err(RuntimeError::InfixTypeError {
                operator: other.to_string(),
                left: "FLOATING",
                right: "FLOATING",
            });
        }
    };
    Ok(value)
}

fn eval_str_str_infix(operator: &str, l: String, r: String) -> Result<Value, RuntimeError> {
    match operator {
        "+" => Ok(Value::Str(l + &r)),
        "==" => Ok(Value::Boolean(l == r)),
        "!=" => Ok(Value::Boolean(l != r)),
        other => Err(RuntimeError::InfixTypeError {
            operator: other.to_string(),
            left: "STRING",
            right: "STRING",
        }),
    }
}

fn eval_bool_bool_infix(operator: &str, l: bool, r: bool) -> Result<Value, RuntimeError> {
    match operator {
        "==" => Ok(Value::Boolean(l == r)),
        "!=" => Ok(Value::Boolean(l != r)),
        "&" => Ok(Value::Boolean(l && r)),
        "|" => Ok(Value::Boolean(l || r)),
        other => Err(RuntimeError::InfixTypeError {
            operator: other.to_string(),
            left: "BOOLEAN",
            right: "BOOLEAN",
        }),
    }
}
