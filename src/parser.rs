// ABOUTME: Pratt parser turning the token stream into a Program AST

use crate::ast::{Block, Expression, Identifier, Program, Statement};
use crate::error::ParseError;
use crate::token::{Token, TokenType};

/// Operator precedence / binding power, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assignment,
    Logical,      // & |
    Comparison,   // == != < > <= >=
    SimpleArith,  // + -
    ComplexArith, // * / %
    Power,        // ^
    Prefix,       // ! and unary -
    Call,         // '(' used as an infix token
}

fn precedence_of(token_type: TokenType) -> Precedence {
    match token_type {
        TokenType::And | TokenType::Or => Precedence::Logical,
        TokenType::Eq
        | TokenType::NotEq
        | TokenType::Lt
        | TokenType::Gt
        | TokenType::LtEq
        | TokenType::GtEq => Precedence::Comparison,
        TokenType::Plus | TokenType::Minus => Precedence::SimpleArith,
        TokenType::Asterisk | TokenType::Slash | TokenType::Percent => Precedence::ComplexArith,
        TokenType::Caret => Precedence::Power,
        TokenType::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

/// Token kinds that may appear in infix position.
fn has_infix(token_type: TokenType) -> bool {
    precedence_of(token_type) > Precedence::Lowest
}

/// Recursive-descent state over the token list. Errors accumulate; the
/// parser recovers where it can and the driver decides whether the result
/// is usable.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParseError>,
    source_lines: Vec<String>,
}

impl Parser {
    /// `tokens` must be Eof-terminated (the lexer guarantees this);
    /// `source_lines` is used to quote offending lines in diagnostics.
    pub fn new(tokens: Vec<Token>, source_lines: Vec<String>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| t.token_type),
            Some(TokenType::Eof)
        ));
        Parser {
            tokens,
            current: 0,
            errors: Vec::new(),
            source_lines,
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Parses the whole token stream into a Program. Check `errors()`
    /// afterwards; a partial AST is returned even when errors occurred.
    pub fn parse(&mut self) -> Program {
        let mut program = Program::default();
        while !self.curr_is(TokenType::Eof) {
            if self.curr_is(TokenType::Eol) {
                self.advance();
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.advance();
        }
        program
    }

    /* ----------------------------------------------------------------
                    Statement parsing
    ---------------------------------------------------------------- */

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.curr().token_type {
            TokenType::Var => self.parse_var_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_var_statement(&mut self) -> Option<Statement> {
        let token = self.curr().clone();
        if !self.expect_peek(TokenType::Block) {
            return None;
        }
        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        let name = Identifier {
            token: self.curr().clone(),
            name: self.curr().literal.clone(),
        };
        if !self.expect_peek(TokenType::Assign) {
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenType::Eol) {
            self.advance();
        }
        Some(Statement::Var { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.curr().clone();
        if !self.expect_peek(TokenType::Block) {
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenType::Eol) {
            self.advance();
        }
        Some(Statement::Return { token, value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.curr().clone();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenType::Eol) {
            self.advance();
        }
        Some(Statement::Expr { token, expression })
    }

    /// Statements until (and including) the given block terminator.
    /// The current token must be the opening `:`.
    fn parse_block(&mut self, terminator: TokenType) -> Option<Block> {
        let token = self.curr().clone();
        let mut statements = Vec::new();
        self.advance();
        while !self.curr_is(terminator) {
            if self.curr_is(TokenType::Eof) {
                self.error_at_curr(format!(
                    "Expecting token of type {} but got {} instead",
                    terminator,
                    TokenType::Eof
                ));
                return None;
            }
            if self.curr_is(TokenType::Eol) {
                self.advance();
                continue;
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.advance();
        }
        Some(Block { token, statements })
    }

    /* ----------------------------------------------------------------
                    Expression parsing
    ---------------------------------------------------------------- */

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;
        while !self.peek_is(TokenType::Eol) && precedence < self.peek_precedence() {
            if !has_infix(self.peek().token_type) {
                return Some(left);
            }
            self.advance();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    /// Prefix dispatch table, keyed by the current token's kind.
    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.curr().token_type {
            TokenType::Ident => Some(Expression::Identifier(Identifier {
                token: self.curr().clone(),
                name: self.curr().literal.clone(),
            })),
            TokenType::Int => self.parse_integer_literal(),
            TokenType::Float => self.parse_float_literal(),
            TokenType::Bool => self.parse_boolean_literal(),
            TokenType::Str => Some(Expression::Str {
                token: self.curr().clone(),
                value: self.curr().literal.clone(),
            }),
            TokenType::Minus | TokenType::Bang => self.parse_prefix_expression(),
            TokenType::LParen => self.parse_grouped_expression(),
            TokenType::IfBegin => self.parse_if_expression(),
            TokenType::FnBegin => self.parse_function_expression(),
            TokenType::LoopBegin => self.parse_loop_expression(),
            other => {
                self.error_at_curr(format!(
                    "{:?} is not a valid 'prefix' expression/token.",
                    other.to_string()
                ));
                None
            }
        }
    }

    /// Infix dispatch: the current token is the operator (or the `(` of a
    /// call), `left` is the already-parsed operand.
    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        if self.curr_is(TokenType::LParen) {
            return self.parse_call_expression(left);
        }
        let token = self.curr().clone();
        let operator = token.literal.clone();
        let mut precedence = precedence_of(token.token_type);
        // ^ is right-associative: recurse one level below its own power
        if token.token_type == TokenType::Caret {
            precedence = Precedence::ComplexArith;
        }
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.curr().clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer { token, value }),
            Err(_) => {
                self.literal_conversion_error(&token, "integer");
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let token = self.curr().clone();
        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Float { token, value }),
            Err(_) => {
                self.literal_conversion_error(&token, "decimal-number");
                None
            }
        }
    }

    fn parse_boolean_literal(&mut self) -> Option<Expression> {
        let token = self.curr().clone();
        let value = match token.literal.as_str() {
            "true" | "TRUE" => true,
            "false" | "FALSE" => false,
            _ => {
                self.literal_conversion_error(&token, "boolean");
                return None;
            }
        };
        Some(Expression::Boolean { token, value })
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.curr().clone();
        let operator = token.literal.clone();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let expression = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.curr().clone();
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::Block) {
            return None;
        }
        let if_body = self.parse_block(TokenType::IfEnd)?;
        let else_body = if self.peek_is(TokenType::ElseBegin) {
            self.advance();
            if !self.expect_peek(TokenType::Block) {
                return None;
            }
            Some(self.parse_block(TokenType::ElseEnd)?)
        } else {
            None
        };
        Some(Expression::If {
            token,
            condition: Box::new(condition),
            if_body,
            else_body,
        })
    }

    fn parse_loop_expression(&mut self) -> Option<Expression> {
        let token = self.curr().clone();
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::Block) {
            return None;
        }
        let body = self.parse_block(TokenType::LoopEnd)?;
        Some(Expression::Loop {
            token,
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_function_expression(&mut self) -> Option<Expression> {
        let token = self.curr().clone();
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        let params = self.parse_function_params()?;
        if !self.expect_peek(TokenType::Block) {
            return None;
        }
        let body = self.parse_block(TokenType::FnEnd)?;
        Some(Expression::Function {
            token,
            params,
            body,
        })
    }

    /// Comma-separated identifiers; the current token is the `(`. Leaves the
    /// current token on the closing `)`.
    fn parse_function_params(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();
        if self.peek_is(TokenType::RParen) {
            self.advance();
            return Some(params);
        }
        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        params.push(Identifier {
            token: self.curr().clone(),
            name: self.curr().literal.clone(),
        });
        while self.peek_is(TokenType::Comma) {
            self.advance();
            if !self.expect_peek(TokenType::Ident) {
                return None;
            }
            params.push(Identifier {
                token: self.curr().clone(),
                name: self.curr().literal.clone(),
            });
        }
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(params)
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Option<Expression> {
        let token = self.curr().clone();
        let args = self.parse_call_args()?;
        Some(Expression::Call {
            token,
            callee: Box::new(callee),
            args,
        })
    }

    /// Comma-separated argument expressions; the current token is the `(`.
    /// Leaves the current token on the closing `)`.
    fn parse_call_args(&mut self) -> Option<Vec<Expression>> {
        let mut args = Vec::new();
        if self.peek_is(TokenType::RParen) {
            self.advance();
            return Some(args);
        }
        self.advance();
        args.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.advance();
            args.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(args)
    }

    /* ----------------------------------------------------------------
                    Helpers
    ---------------------------------------------------------------- */

    fn curr(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek(&self) -> &Token {
        &self.tokens[(self.current + 1).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
    }

    fn curr_is(&self, token_type: TokenType) -> bool {
        self.curr().token_type == token_type
    }

    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek().token_type)
    }

    /// Advances past the next token only when it has the expected kind;
    /// otherwise records a diagnostic and stays put.
    fn expect_peek(&mut self, expected: TokenType) -> bool {
        if self.peek_is(expected) {
            self.advance();
            return true;
        }
        self.expected_token_error(expected);
        false
    }

    /* ----------------------------------------------------------------
                    Error recording
    ---------------------------------------------------------------- */

    fn snippet_for(&self, line: usize) -> String {
        self.source_lines.get(line).cloned().unwrap_or_default()
    }

    fn expected_token_error(&mut self, expected: TokenType) {
        let got = self.peek().clone();
        let snippet = self.snippet_for(got.line);
        self.errors.push(ParseError {
            line: got.line,
            message: format!(
                "Expecting token of type {} but got {} instead",
                expected, got.token_type
            ),
            snippet,
        });
    }

    fn literal_conversion_error(&mut self, token: &Token, target: &str) {
        let snippet = self.snippet_for(token.line);
        self.errors.push(ParseError {
            line: token.line,
            message: format!("Could not parse {:?} as {:?}", token.literal, target),
            snippet,
        });
    }

    fn error_at_curr(&mut self, message: String) {
        let line = self.curr().line;
        let snippet = self.snippet_for(line);
        self.errors.push(ParseError {
            line,
            message,
            snippet,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_program(source: &str) -> Program {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.lex().expect("lexing failed");
        let mut parser = Parser::new(tokens, lexer.source_lines());
        let program = parser.parse();
        assert!(
            parser.errors().is_empty(),
            "unexpected parse errors: {:?}",
            parser.errors()
        );
        program
    }

    fn parse_with_errors(source: &str) -> Vec<ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.lex().expect("lexing failed");
        let mut parser = Parser::new(tokens, lexer.source_lines());
        parser.parse();
        parser.errors().to_vec()
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("1 + 2 * 3", "(1 + (2 * 3))"),
            ("1 * 2 + 3", "((1 * 2) + 3)"),
            ("2 ^ 3 ^ 2", "(2 ^ (3 ^ 2))"),
            ("-x + y", "((-x) + y)"),
            ("a & b | c", "((a & b) | c)"),
            ("1 + 2 == 4 - 1", "((1 + 2) == (4 - 1))"),
            ("a == b & c == d", "((a == b) & (c == d))"),
            ("!flag == false", "((!flag) == false)"),
            ("2 * 3 ^ 2", "(2 * (3 ^ 2))"),
            ("5 % 2 + 1", "((5 % 2) + 1)"),
            ("(1 + 2) * 3", "((1 + 2) * 3)"),
            ("add(1, 2 * 3)", "add(1, (2 * 3))"),
            ("-fn(x)", "(-fn(x))"),
        ];
        for (source, expected) in cases {
            let program = parse_program(source);
            assert_eq!(program.to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_var_statement() {
        let program = parse_program("v: answer = 42");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Var { name, value, .. } => {
                assert_eq!(name.name, "answer");
                assert!(matches!(value, Expression::Integer { value: 42, .. }));
            }
            other => panic!("expected var statement, got {:?}", other),
        }
    }

    #[test]
    fn test_return_statement() {
        let program = parse_program("r: num + 2");
        match &program.statements[0] {
            Statement::Return { value, .. } => {
                assert_eq!(value.to_string(), "(num + 2)");
            }
            other => panic!("expected return statement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_expression() {
        let program = parse_program("i(x > 2):\n\ty\n:i");
        match &program.statements[0] {
            Statement::Expr { expression, .. } => match expression {
                Expression::If {
                    condition,
                    if_body,
                    else_body,
                    ..
                } => {
                    assert_eq!(condition.to_string(), "(x > 2)");
                    assert_eq!(if_body.statements.len(), 1);
                    assert!(else_body.is_none());
                }
                other => panic!("expected if expression, got {:?}", other),
            },
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_expression() {
        let program = parse_program("i(x > 2):\n\ty\n:i e:\n\tz\n:e");
        match &program.statements[0] {
            Statement::Expr {
                expression: Expression::If { else_body, .. },
                ..
            } => {
                let else_body = else_body.as_ref().expect("expected else body");
                assert_eq!(else_body.statements.len(), 1);
            }
            other => panic!("expected if/else, got {:?}", other),
        }
    }

    #[test]
    fn test_loop_expression() {
        let program = parse_program("l(iter <= 5):\n\tv: iter = iter + 1\n:l");
        match &program.statements[0] {
            Statement::Expr {
                expression: Expression::Loop {
                    condition, body, ..
                },
                ..
            } => {
                assert_eq!(condition.to_string(), "(iter <= 5)");
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("expected loop expression, got {:?}", other),
        }
    }

    #[test]
    fn test_function_expression() {
        let program = parse_program("f(a, b):\n\tr: a + b\n:f");
        match &program.statements[0] {
            Statement::Expr {
                expression: Expression::Function { params, body, .. },
                ..
            } => {
                let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("expected function expression, got {:?}", other),
        }
    }

    #[test]
    fn test_function_with_no_params() {
        let program = parse_program("f():\n\tr: 1\n:f");
        match &program.statements[0] {
            Statement::Expr {
                expression: Expression::Function { params, .. },
                ..
            } => assert!(params.is_empty()),
            other => panic!("expected function expression, got {:?}", other),
        }
    }

    #[test]
    fn test_call_expression() {
        let program = parse_program("addTwo(5)");
        match &program.statements[0] {
            Statement::Expr {
                expression: Expression::Call { callee, args, .. },
                ..
            } => {
                assert_eq!(callee.to_string(), "addTwo");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_no_args() {
        let program = parse_program("answer()");
        match &program.statements[0] {
            Statement::Expr {
                expression: Expression::Call { args, .. },
                ..
            } => assert!(args.is_empty()),
            other => panic!("expected call expression, got {:?}", other),
        }
    }

    #[test]
    fn test_var_with_function_value() {
        let program = parse_program("v: addTwo = f(num):\n\tr: num + 2\n:f\nprint(addTwo(5))");
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Statement::Var { value, .. } => {
                assert!(matches!(value, Expression::Function { .. }));
            }
            other => panic!("expected var statement, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_identifier_in_var() {
        let errors = parse_with_errors("v: = 3");
        assert!(!errors.is_empty());
        assert!(errors[0]
            .message
            .contains("Expecting token of type IDENTIFIER"));
    }

    #[test]
    fn test_missing_closing_paren() {
        let errors = parse_with_errors("(1 + 2");
        assert!(!errors.is_empty());
        assert!(errors[0]
            .message
            .contains("Expecting token of type RIGHT_PARENTHESES"));
    }

    #[test]
    fn test_missing_prefix_handler() {
        let errors = parse_with_errors("* 42");
        assert!(!errors.is_empty());
        assert!(errors[0].message.contains("not a valid 'prefix'"));
    }

    #[test]
    fn test_unterminated_block_reports_terminator() {
        let errors = parse_with_errors("i(x > 2):\n\ty\n");
        assert!(!errors.is_empty());
        assert!(errors[0].message.contains("END: IF"));
    }

    #[test]
    fn test_error_includes_offending_line() {
        let errors = parse_with_errors("v: good = 1\nv: = 3");
        assert!(!errors.is_empty());
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[0].snippet, "v: = 3");
    }

    #[test]
    fn test_round_trip_through_display() {
        let sources = [
            "v: addTwo = f(num):\nr: (num + 2)\n:f\nprint(addTwo(5))",
            "i((x > 2)):\ny\n:i e:\nz\n:e",
            "l((iter <= 5)):\nv: sum = (sum + iter)\n:l",
            "print((\"hello\" + \" world\"))",
        ];
        for source in sources {
            let first = parse_program(source);
            let second = parse_program(&first.to_string());
            assert_eq!(first, second, "source: {}", source);
        }
    }
}
