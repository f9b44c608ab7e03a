//! Grammar for `{variable}` interpolation.

use super::{run_length, LexRule, Lexer, TextBuffer};
use crate::error::Result;
use crate::token::{Token, TokenType};

const SPECIAL: &[char] = &['\\', '{', '}'];

const RULES: &[LexRule] = &[literal, text];

pub const VARIABLES: Lexer = Lexer::new("variables", RULES);

fn literal(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match buffer.tail().chars().next() {
        Some(c) if SPECIAL.contains(&c) => Ok(Some(vec![buffer.take(TokenType::Literal, 1)])),
        _ => Ok(None),
    }
}

/// Anything else, whitespace included.
fn text(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let len = run_length(buffer.tail(), |c| !SPECIAL.contains(&c));
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(vec![buffer.take(TokenType::Text, len)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mau_types::Position;

    #[test]
    fn test_tokens() {
        let tokens = VARIABLES
            .tokenize(r"a {b} \{c}", Position::default(), None)
            .unwrap();
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["a ", "{", "b", "}", " ", "\\", "{", "c", "}", ""]);
    }
}
