//! Lexer engine shared by every mau grammar.
//!
//! A grammar is an ordered list of recognizer rules. The engine loop handles
//! end of input, blank lines and trailing whitespace itself and then tries
//! the grammar's rules in order; the first rule that matches emits its
//! tokens and the loop restarts from the new position.

pub mod arguments;
pub mod condition;
pub mod document;
pub mod text;
pub mod variables;

use crate::error::{MauError, Result};
use crate::token::{Token, TokenType};
use mau_types::{Context, Position};

/// A recognizer: `Ok(None)` when the rule does not apply at the current
/// position, otherwise the emitted tokens (possibly none).
pub type LexRule = fn(&mut TextBuffer) -> Result<Option<Vec<Token>>>;

/// Line-oriented cursor over the text being lexed.
///
/// `origin` is the absolute position of the first character, so that
/// sub-regions lexed on their own still report positions in the enclosing
/// source.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    line: usize,
    column: usize,
    origin: Position,
    source: Option<String>,
}

impl TextBuffer {
    pub fn new(text: &str, origin: Position, source: Option<String>) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            line: 0,
            column: 0,
            origin,
            source,
        }
    }

    pub fn eof(&self) -> bool {
        self.line >= self.lines.len()
    }

    /// The whole current line, empty at end of input.
    pub fn current_line(&self) -> &str {
        self.lines.get(self.line).map(String::as_str).unwrap_or("")
    }

    /// The rest of the current line from the cursor.
    pub fn tail(&self) -> &str {
        &self.current_line()[self.column..]
    }

    pub fn at_line_start(&self) -> bool {
        self.column == 0
    }

    /// Absolute position of the cursor.
    pub fn position(&self) -> Position {
        self.position_at(self.line, self.column)
    }

    fn position_at(&self, line: usize, byte: usize) -> Position {
        let text = self.lines.get(line).map(String::as_str).unwrap_or("");
        let column = text[..byte.min(text.len())].chars().count();
        if line == 0 {
            Position::new(self.origin.line, self.origin.column + column)
        } else {
            Position::new(self.origin.line + line, column)
        }
    }

    /// Context of the byte range `start..end` of the current line.
    pub fn span(&self, start: usize, end: usize) -> Context {
        Context::new(
            self.position_at(self.line, start),
            self.position_at(self.line, end),
            self.source.clone(),
        )
    }

    pub fn context_from(&self, start: Position) -> Context {
        Context::new(start, self.position(), self.source.clone())
    }

    pub fn source(&self) -> Option<String> {
        self.source.clone()
    }

    /// Token covering `start..end` of the current line.
    pub fn token(&self, kind: TokenType, value: impl Into<String>, start: usize, end: usize) -> Token {
        Token::new(kind, value, self.span(start, end))
    }

    /// Token for the next `len` bytes of the tail, consuming them.
    pub fn take(&mut self, kind: TokenType, len: usize) -> Token {
        let start = self.column;
        let end = (start + len).min(self.current_line().len());
        let token = self.token(kind, &self.current_line()[start..end], start, end);
        self.column = end;
        token
    }

    pub fn next_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    fn offset(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

/// A grammar plugged into the shared lexing loop.
#[derive(Debug, Clone, Copy)]
pub struct Lexer {
    pub name: &'static str,
    rules: &'static [LexRule],
}

impl Lexer {
    pub const fn new(name: &'static str, rules: &'static [LexRule]) -> Self {
        Self { name, rules }
    }

    /// Lex `text` whose first character sits at `origin`.
    pub fn tokenize(&self, text: &str, origin: Position, source: Option<String>) -> Result<Vec<Token>> {
        let mut buffer = TextBuffer::new(text, origin, source);
        self.process(&mut buffer)
    }

    /// Run the engine loop until end of input. The stream always ends with
    /// exactly one EOF token.
    pub fn process(&self, buffer: &mut TextBuffer) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            if buffer.eof() {
                let here = buffer.position();
                tokens.push(Token::new(
                    TokenType::Eof,
                    "",
                    Context::at(here, buffer.source()),
                ));
                return Ok(tokens);
            }

            let before = buffer.offset();
            match self.step(buffer)? {
                Some(new_tokens) => tokens.extend(new_tokens),
                None => {
                    let start = buffer.position();
                    return Err(MauError::lexer(
                        format!("Cannot process token: {:?}", buffer.tail()),
                        Context::at(start, buffer.source()),
                    ));
                }
            }

            if buffer.offset() == before {
                return Err(MauError::lexer(
                    format!("Loop detected in {} lexer", self.name),
                    Context::at(buffer.position(), buffer.source()),
                ));
            }
        }
    }

    fn step(&self, buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
        if let Some(tokens) = empty_line(buffer) {
            return Ok(Some(tokens));
        }
        if let Some(tokens) = trailing_space(buffer) {
            return Ok(Some(tokens));
        }
        for rule in self.rules {
            if let Some(tokens) = rule(buffer)? {
                return Ok(Some(tokens));
            }
        }
        Ok(None)
    }
}

/// A line made only of spaces becomes an EOL token carrying them.
fn empty_line(buffer: &mut TextBuffer) -> Option<Vec<Token>> {
    if !buffer.at_line_start() || !buffer.current_line().trim().is_empty() {
        return None;
    }
    let line = buffer.current_line();
    let token = buffer.token(TokenType::Eol, line, 0, line.len());
    buffer.next_line();
    Some(vec![token])
}

/// Whitespace up to the end of the line is dropped.
fn trailing_space(buffer: &mut TextBuffer) -> Option<Vec<Token>> {
    if !buffer.tail().trim().is_empty() {
        return None;
    }
    buffer.next_line();
    Some(Vec::new())
}

/// Byte length of the leading run of `tail` whose chars satisfy `pred`.
pub(crate) fn run_length(tail: &str, pred: impl Fn(char) -> bool) -> usize {
    tail.char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(i, _)| i)
        .unwrap_or(tail.len())
}
