// ABOUTME: Typed AST produced by the parser; Display renders re-parseable source

use crate::token::Token;
use std::fmt;

/// Root node: an ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// A name, kept with its originating token for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `v: name = expr`
    Var {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    /// `r: expr`
    Return { token: Token, value: Expression },
    /// a bare expression at statement position
    Expr { token: Token, expression: Expression },
}

/// A statement sequence delimited by the opening `:` and a terminator
/// keyword (`:i`, `:e`, `:l`, `:f`).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer {
        token: Token,
        value: i64,
    },
    Float {
        token: Token,
        value: f64,
    },
    Boolean {
        token: Token,
        value: bool,
    },
    Str {
        token: Token,
        value: String,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        if_body: Block,
        else_body: Option<Block>,
    },
    Loop {
        token: Token,
        condition: Box<Expression>,
        body: Block,
    },
    Function {
        token: Token,
        params: Vec<Identifier>,
        body: Block,
    },
    Call {
        token: Token,
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.statements.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", rendered.join("\n"))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Var { name, value, .. } => write!(f, "v: {} = {}", name, value),
            Statement::Return { value, .. } => write!(f, "r: {}", value),
            Statement::Expr { expression, .. } => write!(f, "{}", expression),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.statements.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", rendered.join("\n"))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            // numeric literals render from their token text so that 2.0
            // survives a round trip as a float
            Expression::Integer { token, .. }
            | Expression::Float { token, .. }
            | Expression::Boolean { token, .. } => write!(f, "{}", token.literal),
            Expression::Str { value, .. } => write!(f, "\"{}\"", value),
            Expression::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                if_body,
                else_body,
                ..
            } => {
                write!(f, "i({}):\n{}\n:i", condition, if_body)?;
                if let Some(else_body) = else_body {
                    write!(f, " e:\n{}\n:e", else_body)?;
                }
                Ok(())
            }
            Expression::Loop {
                condition, body, ..
            } => write!(f, "l({}):\n{}\n:l", condition, body),
            Expression::Function { params, body, .. } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "f({}):\n{}\n:f", params.join(", "), body)
            }
            Expression::Call { callee, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", callee, args.join(", "))
            }
        }
    }
}
