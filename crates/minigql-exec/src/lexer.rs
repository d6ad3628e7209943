//! Tokenizer for request documents.
//!
//! Commas, whitespace, and `#` comments are insignificant and skipped.

use crate::ast::Pos;
use crate::error::{ExecError, ExecResult};

const PUNCTUATORS: &[char] = &['{', '}', '(', ')', '[', ']', ':', '!', '$', '='];

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Punct(char),
    Name(String),
    Int(i64),
    Float(f64),
    Str(String),
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

pub struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> ExecResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn error(&self, pos: Pos, message: impl Into<String>) -> ExecError {
        ExecError::Parse {
            message: message.into(),
            line: pos.line,
            column: pos.column,
        }
    }

    fn skip_ignored(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | ',' | '\u{feff}' => {
                    self.bump();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> ExecResult<Token> {
        self.skip_ignored();
        let pos = self.pos();
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
            });
        };
        let kind = match ch {
            c if PUNCTUATORS.contains(&c) => {
                self.bump();
                TokenKind::Punct(c)
            }
            '.' if self.rest().starts_with("...") => {
                return Err(self.error(pos, "fragments are not supported"));
            }
            '"' => self.string(pos)?,
            '-' | '0'..='9' => self.number(pos)?,
            c if c == '_' || c.is_ascii_alphabetic() => self.name(),
            other => return Err(self.error(pos, format!("unexpected character {other:?}"))),
        };
        Ok(Token { kind, pos })
    }

    fn name(&mut self) -> TokenKind {
        let start = self.offset;
        while matches!(self.peek(), Some(c) if c == '_' || c.is_ascii_alphanumeric()) {
            self.bump();
        }
        TokenKind::Name(self.src[start..self.offset].to_string())
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
            count += 1;
        }
        count
    }

    fn number(&mut self, pos: Pos) -> ExecResult<TokenKind> {
        let start = self.offset;
        if self.peek() == Some('-') {
            self.bump();
        }
        if self.digits() == 0 {
            return Err(self.error(pos, "expected digit"));
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            self.bump();
            is_float = true;
            if self.digits() == 0 {
                return Err(self.error(pos, "expected digit after '.'"));
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            is_float = true;
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.digits() == 0 {
                return Err(self.error(pos, "expected exponent digits"));
            }
        }
        if matches!(self.peek(), Some(c) if c == '_' || c == '.' || c.is_ascii_alphabetic()) {
            return Err(self.error(pos, "invalid number literal"));
        }
        let text = &self.src[start..self.offset];
        if is_float {
            text.parse()
                .map(TokenKind::Float)
                .map_err(|_| self.error(pos, format!("invalid float {text}")))
        } else {
            text.parse()
                .map(TokenKind::Int)
                .map_err(|_| self.error(pos, format!("integer {text} is out of range")))
        }
    }

    fn string(&mut self, pos: Pos) -> ExecResult<TokenKind> {
        if self.rest().starts_with("\"\"\"") {
            return self.block_string(pos);
        }
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error(pos, "unterminated string"));
                }
                Some('"') => return Ok(TokenKind::Str(out)),
                Some('\\') => out.push(self.escape(pos)?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, pos: Pos) -> ExecResult<char> {
        let ch = match self.bump() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => {
                let hex: String = (0..4).filter_map(|_| self.bump()).collect();
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error(pos, format!("invalid unicode escape \\u{hex}")))?
            }
            Some(other) => return Err(self.error(pos, format!("invalid escape \\{other}"))),
            None => return Err(self.error(pos, "unterminated string")),
        };
        Ok(ch)
    }

    fn block_string(&mut self, pos: Pos) -> ExecResult<TokenKind> {
        for _ in 0..3 {
            self.bump();
        }
        let start = self.offset;
        loop {
            if self.rest().starts_with("\"\"\"") {
                let raw = self.src[start..self.offset].to_string();
                for _ in 0..3 {
                    self.bump();
                }
                return Ok(TokenKind::Str(raw.trim().to_string()));
            }
            if self.bump().is_none() {
                return Err(self.error(pos, "unterminated block string"));
            }
        }
    }
}
