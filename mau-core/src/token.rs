//! Tokens shared by every mau grammar.

use mau_types::Context;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Classification of a lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    Arguments,
    Block,
    Command,
    Control,
    Eof,
    Eol,
    Header,
    HorizontalRule,
    Include,
    List,
    Literal,
    Text,
    Label,
    Variable,
    Whitespace,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Arguments => "ARGUMENTS",
            TokenType::Block => "BLOCK",
            TokenType::Command => "COMMAND",
            TokenType::Control => "CONTROL",
            TokenType::Eof => "EOF",
            TokenType::Eol => "EOL",
            TokenType::Header => "HEADER",
            TokenType::HorizontalRule => "HORIZONTAL_RULE",
            TokenType::Include => "INCLUDE",
            TokenType::List => "LIST",
            TokenType::Literal => "LITERAL",
            TokenType::Text => "TEXT",
            TokenType::Label => "LABEL",
            TokenType::Variable => "VARIABLE",
            TokenType::Whitespace => "WHITESPACE",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed token.
///
/// Equality and hashing only look at `kind` and `value`: two tokens lexed
/// at different places in the source compare equal.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenType,
    pub value: String,
    pub context: Context,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, context: Context) -> Self {
        Self {
            kind,
            value: value.into(),
            context,
        }
    }

    pub fn is(&self, kind: TokenType) -> bool {
        self.kind == kind
    }

    pub fn is_literal(&self, value: &str) -> bool {
        self.kind == TokenType::Literal && self.value == value
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({:?})", self.kind, self.value)
        }
    }
}

/// Describes the token a cursor operation expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher<'m> {
    pub kind: TokenType,
    pub value: Option<&'m str>,
}

impl<'m> Matcher<'m> {
    pub fn kind(kind: TokenType) -> Self {
        Self { kind, value: None }
    }

    pub fn exact(kind: TokenType, value: &'m str) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }

    pub fn literal(value: &'m str) -> Self {
        Self::exact(TokenType::Literal, value)
    }

    pub fn matches(&self, token: &Token) -> bool {
        token.kind == self.kind && self.value.map_or(true, |value| token.value == value)
    }
}

impl fmt::Display for Matcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}({:?})", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}
