//! Block-level grammar: every rule recognizes a whole line.

use super::{LexRule, Lexer, TextBuffer};
use crate::error::{MauError, Result};
use crate::token::{Token, TokenType};
use mau_types::Context;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([+\-]?)([a-zA-Z0-9_.\-]+):(.*)$").expect("valid regex"));
static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^::([a-zA-Z0-9_\-]+)(?::(.*))?$").expect("valid regex"));
static LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.([a-z0-9_\-]*)\s+(\S.*)$").expect("valid regex"));
static CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([a-z]+)\s+(\S.*)$").expect("valid regex"));
static ARGUMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(.*)\]$").expect("valid regex"));
static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(=+!?)\s+(\S.*)$").expect("valid regex"));
static INCLUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<<\s*([a-zA-Z0-9_\-]+)(?::(.*))?$").expect("valid regex"));
static LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([*#]+)\s+(\S.*)$").expect("valid regex"));

const MULTILINE_COMMENT: &str = "////";

const RULES: &[LexRule] = &[
    multiline_comment,
    comment,
    horizontal_rule,
    variable,
    command,
    label,
    control,
    arguments,
    block,
    header,
    include,
    list,
    text,
];

pub const DOCUMENT: Lexer = Lexer::new("document", RULES);

/// The current line without trailing whitespace.
fn line(buffer: &TextBuffer) -> &str {
    buffer.current_line().trim_end()
}

/// Token for capture group `group`, if it matched something non-empty.
fn group_token(
    buffer: &TextBuffer,
    caps: &Captures<'_>,
    group: usize,
    kind: TokenType,
) -> Option<Token> {
    caps.get(group)
        .filter(|m| !m.as_str().trim().is_empty())
        .map(|m| buffer.token(kind, m.as_str().trim(), m.start(), m.end()))
}

/// Match the whole current line against `regex`; on success build the
/// tokens and move to the next line.
fn match_line(
    buffer: &mut TextBuffer,
    regex: &Regex,
    build: impl FnOnce(&TextBuffer, &Captures<'_>) -> Vec<Token>,
) -> Result<Option<Vec<Token>>> {
    let tokens = {
        let current = line(buffer);
        match regex.captures(current) {
            Some(caps) => build(&*buffer, &caps),
            None => return Ok(None),
        }
    };
    buffer.next_line();
    Ok(Some(tokens))
}

fn multiline_comment(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    if line(buffer) != MULTILINE_COMMENT {
        return Ok(None);
    }
    let start = buffer.position();
    buffer.next_line();
    while !buffer.eof() {
        let closed = line(buffer) == MULTILINE_COMMENT;
        buffer.next_line();
        if closed {
            return Ok(Some(Vec::new()));
        }
    }
    Err(MauError::lexer(
        "Unclosed multi-line comment",
        Context::at(start, buffer.source()),
    ))
}

fn comment(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    if !buffer.current_line().starts_with("//") {
        return Ok(None);
    }
    buffer.next_line();
    Ok(Some(Vec::new()))
}

fn horizontal_rule(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    if line(buffer) != "---" {
        return Ok(None);
    }
    let token = buffer.token(TokenType::HorizontalRule, "---", 0, 3);
    buffer.next_line();
    Ok(Some(vec![token]))
}

fn variable(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &VARIABLE, |buffer, caps| {
        let name = format!("{}{}", &caps[1], &caps[2]);
        let end = caps.get(2).map_or(0, |m| m.end());
        let mut tokens = vec![buffer.token(TokenType::Variable, name, 0, end)];
        tokens.extend(group_token(buffer, caps, 3, TokenType::Text));
        tokens
    })
}

fn command(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &COMMAND, |buffer, caps| {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let mut tokens = vec![buffer.token(TokenType::Command, name, 0, 2 + name.len())];
        tokens.extend(group_token(buffer, caps, 2, TokenType::Arguments));
        tokens
    })
}

fn label(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &LABEL, |buffer, caps| {
        let role = caps.get(1).map_or("", |m| m.as_str());
        let mut tokens = vec![buffer.token(TokenType::Label, role, 0, 1 + role.len())];
        tokens.extend(group_token(buffer, caps, 2, TokenType::Text));
        tokens
    })
}

fn control(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &CONTROL, |buffer, caps| {
        let operator = caps.get(1).map_or("", |m| m.as_str());
        let mut tokens = vec![buffer.token(TokenType::Control, operator, 0, 1 + operator.len())];
        tokens.extend(group_token(buffer, caps, 2, TokenType::Text));
        tokens
    })
}

fn arguments(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &ARGUMENTS, |buffer, caps| {
        let end = caps.get(0).map_or(0, |m| m.end());
        let mut tokens = vec![buffer.token(TokenType::Literal, "[", 0, 1)];
        tokens.extend(group_token(buffer, caps, 1, TokenType::Arguments));
        tokens.push(buffer.token(TokenType::Literal, "]", end - 1, end));
        tokens
    })
}

/// A block delimiter is a run of at least four identical punctuation
/// characters.
fn is_block_delimiter(line: &str) -> bool {
    let Some(first) = line.chars().next() else {
        return false;
    };
    if first.is_alphanumeric() || first.is_whitespace() || first == '_' {
        return false;
    }
    line.chars().count() >= 4 && line.chars().all(|c| c == first)
}

/// Opening delimiter, one TEXT token per raw body line, closing delimiter.
/// The body is not lexed here: the block engine decides how to read it.
fn block(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let delimiter = line(buffer).to_string();
    if !is_block_delimiter(&delimiter) {
        return Ok(None);
    }

    let start = buffer.position();
    let mut tokens = vec![buffer.token(
        TokenType::Block,
        delimiter.as_str(),
        0,
        delimiter.len(),
    )];
    buffer.next_line();

    while !buffer.eof() {
        if line(buffer) == delimiter {
            tokens.push(buffer.token(
                TokenType::Block,
                delimiter.as_str(),
                0,
                delimiter.len(),
            ));
            buffer.next_line();
            return Ok(Some(tokens));
        }
        let raw = buffer.current_line();
        tokens.push(buffer.token(TokenType::Text, raw, 0, raw.len()));
        buffer.next_line();
    }

    Err(MauError::lexer(
        format!("Unclosed block {}", delimiter),
        Context::at(start, buffer.source()),
    ))
}

fn header(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &HEADER, |buffer, caps| {
        let marker = caps.get(1).map_or("", |m| m.as_str());
        let mut tokens = vec![buffer.token(TokenType::Header, marker, 0, marker.len())];
        tokens.extend(group_token(buffer, caps, 2, TokenType::Text));
        tokens
    })
}

fn include(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &INCLUDE, |buffer, caps| {
        let mut tokens = Vec::new();
        tokens.extend(group_token(buffer, caps, 1, TokenType::Include));
        tokens.extend(group_token(buffer, caps, 2, TokenType::Arguments));
        tokens
    })
}

fn list(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match_line(buffer, &LIST, |buffer, caps| {
        let mut tokens = Vec::new();
        tokens.extend(group_token(buffer, caps, 1, TokenType::List));
        tokens.extend(group_token(buffer, caps, 2, TokenType::Text));
        tokens
    })
}

fn text(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let current = line(buffer);
    let token = buffer.token(TokenType::Text, current, 0, current.len());
    buffer.next_line();
    Ok(Some(vec![token]))
}
