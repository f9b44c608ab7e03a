//! Parser for argument lists.
//!
//! `value, "quoted, value", key=value, #tag, *subtype`
//!
//! Values are either quoted, running to the next unescaped `"`, or bare,
//! running to the next top-level `,`. Once a named argument has been seen
//! every following argument must be named too.

use super::base::{join_values, span_of, Grammar, ParseFailure, ParseResult, TokenCursor};
use crate::arguments::Arguments;
use crate::error::{MauError, Result};
use crate::lexers::arguments::ARGUMENTS;
use crate::token::{Matcher, Token, TokenType};
use mau_types::Context;

#[derive(Debug, Clone, Copy)]
pub enum ArgumentRule {
    Separator,
    Named,
    Unnamed,
}

pub struct ArgumentsParser {
    cursor: TokenCursor,
    context: Context,
    unnamed: Vec<(String, Context)>,
    named: Vec<(String, String)>,
}

impl ArgumentsParser {
    pub fn new(tokens: Vec<Token>, context: Context) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            context,
            unnamed: Vec::new(),
            named: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Arguments> {
        self.run()?;
        self.finish()
    }

    fn whitespace(&mut self) {
        while self.cursor.at(Matcher::kind(TokenType::Whitespace)) {
            self.cursor.next();
        }
    }

    fn value(&mut self) -> ParseResult<(String, Context)> {
        if self.cursor.at(Matcher::literal("\"")) {
            let open = self.cursor.next();
            let body = self.cursor.collect(&[Matcher::literal("\"")], false);
            let close = self.cursor.force(Matcher::literal("\""))?;
            let context = open.context.merge(&close.context);
            return Ok((join_values(&body), context));
        }

        let body = self.cursor.collect(&[Matcher::literal(",")], false);
        let value = join_values(&body).trim().to_string();
        if value.is_empty() {
            return Err(ParseFailure::Mismatch);
        }
        Ok((value, span_of(&body, &self.context)))
    }

    fn end_of_argument(&mut self) -> ParseResult<()> {
        self.whitespace();
        if self.cursor.at_eof() || self.cursor.at(Matcher::literal(",")) {
            Ok(())
        } else {
            let token = self.cursor.current();
            Err(ParseFailure::Fatal(MauError::parser(
                format!("Unexpected {} after argument value", token),
                token.context.clone(),
            )))
        }
    }

    /// Split positional values into tags, subtype and plain values.
    fn finish(self) -> Result<Arguments> {
        let mut arguments = Arguments::new();
        arguments.named = self.named.into_iter().collect();

        for (value, context) in self.unnamed {
            if let Some(tag) = value.strip_prefix('#') {
                arguments.tags.push(tag.to_string());
            } else if let Some(subtype) = value.strip_prefix('*') {
                if let Some(previous) = &arguments.subtype {
                    return Err(MauError::parser(
                        format!(
                            "Multiple subtypes detected: {} and {}",
                            previous, subtype
                        ),
                        context,
                    ));
                }
                arguments.subtype = Some(subtype.to_string());
            } else {
                arguments.unnamed.push(value);
            }
        }

        Ok(arguments)
    }
}

impl Grammar for ArgumentsParser {
    type Rule = ArgumentRule;

    const RULES: &'static [ArgumentRule] = &[
        ArgumentRule::Separator,
        ArgumentRule::Named,
        ArgumentRule::Unnamed,
    ];

    fn name(&self) -> &'static str {
        "arguments"
    }

    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }

    fn apply(&mut self, rule: ArgumentRule) -> ParseResult<()> {
        match rule {
            ArgumentRule::Separator => {
                self.cursor.peek_where(|t| {
                    t.is_literal(",") || t.is(TokenType::Whitespace)
                })?;
                self.cursor.next();
                Ok(())
            }
            ArgumentRule::Named => {
                self.cursor
                    .peek_where(|t| t.is(TokenType::Text) && is_key(&t.value))?;
                let key = self.cursor.next();
                self.whitespace();
                self.cursor.get(Matcher::literal("="))?;
                self.whitespace();
                let (value, _) = self.value()?;
                self.end_of_argument()?;
                self.named.push((key.value, value));
                Ok(())
            }
            ArgumentRule::Unnamed => {
                let (value, context) = self.value()?;
                self.end_of_argument()?;
                if !self.named.is_empty() {
                    return Err(ParseFailure::Fatal(MauError::parser(
                        format!(
                            "Unnamed argument {:?} after named arguments",
                            value
                        ),
                        context,
                    )));
                }
                self.unnamed.push((value, context));
                Ok(())
            }
        }
    }
}

/// Keys are plain identifiers, so a value such as `https://x.com/?q=1`
/// stays positional.
fn is_key(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Lex and parse an argument list that starts at `context`.
pub fn parse_arguments(text: &str, context: &Context) -> Result<Arguments> {
    let tokens = ARGUMENTS.tokenize(text, context.start, context.source.clone())?;
    ArgumentsParser::new(tokens, context.clone()).parse()
}
