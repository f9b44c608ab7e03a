//! Grammar of argument lists: `a, "b c", key=value`.

use super::{run_length, LexRule, Lexer, TextBuffer};
use crate::error::Result;
use crate::token::{Token, TokenType};

const SPECIAL: &[char] = &['\\', ',', '"', '='];

const RULES: &[LexRule] = &[literal, whitespace, text];

pub const ARGUMENTS: Lexer = Lexer::new("arguments", RULES);

fn literal(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match buffer.tail().chars().next() {
        Some(c) if SPECIAL.contains(&c) => Ok(Some(vec![buffer.take(TokenType::Literal, 1)])),
        _ => Ok(None),
    }
}

fn whitespace(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let len = run_length(buffer.tail(), char::is_whitespace);
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(vec![buffer.take(TokenType::Whitespace, len)]))
}

fn text(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let len = run_length(buffer.tail(), |c| !c.is_whitespace() && !SPECIAL.contains(&c));
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(vec![buffer.take(TokenType::Text, len)]))
}
