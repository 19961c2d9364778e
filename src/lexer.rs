// ABOUTME: Byte-at-a-time lexer turning Colon source text into a token stream

use crate::error::LexError;
use crate::token::{is_digit, is_letter, lookup_keyword, Token, TokenType};

/// Scanner state: one byte of lookahead over the raw source bytes.
/// `ch == 0` marks end of input.
pub struct Lexer {
    source: Vec<u8>,
    pos: usize,
    next: usize,
    ch: u8,
    line: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes().to_vec();
        let ch = bytes.first().copied().unwrap_or(0);
        Lexer {
            source: bytes,
            pos: 0,
            next: 1,
            ch,
            line: 0,
        }
    }

    fn read_char(&mut self) {
        self.ch = self.source.get(self.next).copied().unwrap_or(0);
        self.pos = self.next;
        self.next += 1;
    }

    fn peek_char(&self) -> u8 {
        self.source.get(self.next).copied().unwrap_or(0)
    }

    fn skip_whitespace(&mut self) {
        while self.ch == b' ' || self.ch == b'\t' || self.ch == b'\r' {
            self.read_char();
        }
    }

    /// Produces the next token. Newlines are tokens of their own; the line
    /// counter advances when one is emitted.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let token = match self.ch {
            b'\n' => {
                let token = Token::new(TokenType::Eol, "", self.line);
                self.line += 1;
                token
            }
            b',' => Token::new(TokenType::Comma, ",", self.line),
            b'+' => Token::new(TokenType::Plus, "+", self.line),
            b'-' => Token::new(TokenType::Minus, "-", self.line),
            b'*' => Token::new(TokenType::Asterisk, "*", self.line),
            b'/' => Token::new(TokenType::Slash, "/", self.line),
            b'%' => Token::new(TokenType::Percent, "%", self.line),
            b'^' => Token::new(TokenType::Caret, "^", self.line),
            b'(' => Token::new(TokenType::LParen, "(", self.line),
            b')' => Token::new(TokenType::RParen, ")", self.line),
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::Eq, "==", self.line)
                } else {
                    Token::new(TokenType::Assign, "=", self.line)
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::NotEq, "!=", self.line)
                } else {
                    Token::new(TokenType::Bang, "!", self.line)
                }
            }
            b'>' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::GtEq, ">=", self.line)
                } else {
                    Token::new(TokenType::Gt, ">", self.line)
                }
            }
            b'<' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::LtEq, "<=", self.line)
                } else {
                    Token::new(TokenType::Lt, "<", self.line)
                }
            }
            b'&' => Token::new(TokenType::And, "&", self.line),
            b'|' => Token::new(TokenType::Or, "|", self.line),
            0 => Token::new(TokenType::Eof, "", self.line),
            b':' => {
                // block terminators (:i, :e, :l, :f) are read as one word
                if is_letter(self.peek_char()) {
                    self.read_word()
                } else {
                    Token::new(TokenType::Block, ":", self.line)
                }
            }
            b'"' => self.read_string()?,
            ch if is_digit(ch) => self.read_number()?,
            ch if is_letter(ch) => self.read_word(),
            other => {
                return Err(LexError::IllegalCharacter {
                    found: (other as char).to_string(),
                    line: self.line,
                });
            }
        };
        Ok(token)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let mut number = String::from(self.ch as char);
        let mut floating = false;
        while is_digit(self.peek_char()) || self.peek_char() == b'.' {
            if self.peek_char() == b'.' {
                if floating {
                    break;
                }
                self.read_char();
                if !is_digit(self.peek_char()) {
                    // a trailing dot makes the whole literal illegal
                    return Err(LexError::IllegalCharacter {
                        found: format!("{}.", number),
                        line: self.line,
                    });
                }
                floating = true;
                number.push('.');
            } else {
                self.read_char();
                number.push(self.ch as char);
            }
        }
        let token_type = if floating {
            TokenType::Float
        } else {
            TokenType::Int
        };
        Ok(Token::new(token_type, number, self.line))
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::from(self.ch as char);
        while is_letter(self.peek_char()) {
            self.read_char();
            word.push(self.ch as char);
        }
        if let Some(keyword) = lookup_keyword(&word) {
            return Token::new(keyword, word, self.line);
        }
        if matches!(word.as_str(), "true" | "false" | "TRUE" | "FALSE") {
            return Token::new(TokenType::Bool, word, self.line);
        }
        Token::new(TokenType::Ident, word, self.line)
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let opening_line = self.line;
        // bytes, not chars: string bodies may hold multi-byte UTF-8
        let mut text = Vec::new();
        self.read_char();
        while self.ch != b'"' {
            if self.ch == 0 {
                return Err(LexError::UnterminatedString { line: opening_line });
            }
            if self.ch == b'\\' && self.peek_char() == b'"' {
                // the escape is stored verbatim, uninterpreted
                text.push(b'\\');
                self.read_char();
            }
            text.push(self.ch);
            self.read_char();
        }
        let text = String::from_utf8_lossy(&text).into_owned();
        Ok(Token::new(TokenType::Str, text, opening_line))
    }

    /// Scans the whole source into a token list terminated by a single Eof.
    pub fn lex(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while self.ch != 0 {
            tokens.push(self.next_token()?);
            self.read_char();
        }
        tokens.push(Token::new(TokenType::Eof, "", self.line));
        Ok(tokens)
    }

    /// The source split on newlines, for quoting lines in parser diagnostics.
    pub fn source_lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.source)
            .split('\n')
            .map(str::to_string)
            .collect()
    }
}
