//! Inline grammar used for paragraphs, headers, list items and macro
//! bodies.

use super::{run_length, LexRule, Lexer, TextBuffer};
use crate::error::Result;
use crate::token::{Token, TokenType};

/// Characters with a meaning in inline text. Each one is its own LITERAL.
pub const SPECIAL: &[char] = &[
    '\\', '[', ']', '(', ')', '`', '$', '%', '_', '*', '^', '~', '"',
];

const RULES: &[LexRule] = &[literal, whitespace, word];

pub const TEXT: Lexer = Lexer::new("text", RULES);

fn literal(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    match buffer.tail().chars().next() {
        Some(c) if SPECIAL.contains(&c) => Ok(Some(vec![buffer.take(TokenType::Literal, c.len_utf8())])),
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

fn word(buffer: &mut TextBuffer) -> Result<Option<Vec<Token>>> {
    let len = run_length(buffer.tail(), |c| !c.is_whitespace() && !SPECIAL.contains(&c));
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(vec![buffer.take(TokenType::Text, len)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mau_types::Position;

    fn values(text: &str) -> Vec<(TokenType, String)> {
        TEXT.tokenize(text, Position::default(), None)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_words_and_literals() {
        assert_eq!(
            values("a *b* [link](x)"),
            vec![
                (TokenType::Text, "a".to_string()),
                (TokenType::Whitespace, " ".to_string()),
                (TokenType::Literal, "*".to_string()),
                (TokenType::Text, "b".to_string()),
                (TokenType::Literal, "*".to_string()),
                (TokenType::Whitespace, " ".to_string()),
                (TokenType::Literal, "[".to_string()),
                (TokenType::Text, "link".to_string()),
                (TokenType::Literal, "]".to_string()),
                (TokenType::Literal, "(".to_string()),
                (TokenType::Text, "x".to_string()),
                (TokenType::Literal, ")".to_string()),
                (TokenType::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_trailing_space_dropped() {
        assert_eq!(
            values("word   "),
            vec![
                (TokenType::Text, "word".to_string()),
                (TokenType::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_unicode_words() {
        let tokens = TEXT.tokenize("café ok", Position::default(), None).unwrap();
        assert_eq!(tokens[0].value, "café");
        assert_eq!(tokens[2].context.start, Position::new(0, 5));
    }
}
