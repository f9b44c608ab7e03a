//! Grammar of conditions: `VARIABLE==VALUE` or `VARIABLE!=VALUE`.

use super::{run_length, LexRule, Lexer, TextBuffer};
use crate::error::Result;
use crate::token::{Token, TokenType};

const RULES: &[LexRule] = &[operator, whitespace, text];

pub const CONDITION: Lexer = Lexer::new("condition", RULES);

fn operator(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let tail = buffer.tail();
    if tail.starts_with("==") || tail.starts_with("!=") {
        return Ok(Some(vec![buffer.take(TokenType::Literal, 2)]));
    }
    Ok(None)
}

fn whitespace(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let len = run_length(buffer.tail(), char::is_whitespace);
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(vec![buffer.take(TokenType::Whitespace, len)]))
}

/// Everything up to the next operator or whitespace. A lone `=` or `!` is
/// plain text.
fn text(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let tail = buffer.tail();
    let mut len = 0;
    for (i, c) in tail.char_indices() {
        let rest = &tail[i..];
        if c.is_whitespace() || rest.starts_with("==") || rest.starts_with("!=") {
            break;
        }
        len = i + c.len_utf8();
    }
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(vec![buffer.take(TokenType::Text, len)]))
}
