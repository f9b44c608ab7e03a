//! `{variable}` interpolation, applied to text before it is parsed.

use super::base::{Grammar, ParseFailure, ParseResult, TokenCursor};
use crate::environment::Environment;
use crate::error::{MauError, Result};
use crate::lexers::variables::VARIABLES;
use crate::token::{Matcher, Token, TokenType};
use mau_types::Context;

#[derive(Debug, Clone, Copy)]
pub enum VariableRule {
    Escape,
    Variable,
    Text,
}

pub struct VariablesParser<'p> {
    cursor: TokenCursor,
    environment: &'p Environment,
    preserve_escaped: bool,
    output: String,
}

impl<'p> VariablesParser<'p> {
    /// With `preserve_escaped` an escaped brace keeps its backslash, so
    /// that a later parser sees the escape too.
    pub fn new(tokens: Vec<Token>, environment: &'p Environment, preserve_escaped: bool) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            environment,
            preserve_escaped,
            output: String::new(),
        }
    }

    pub fn parse(mut self) -> Result<String> {
        self.run()?;
        Ok(self.output)
    }
}

impl Grammar for VariablesParser<'_> {
    type Rule = VariableRule;

    const RULES: &'static [VariableRule] =
        &[VariableRule::Escape, VariableRule::Variable, VariableRule::Text];

    fn name(&self) -> &'static str {
        "variables"
    }

    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }

    fn apply(&mut self, rule: VariableRule) -> ParseResult<()> {
        match rule {
            VariableRule::Escape => {
                let backslash = self.cursor.get(Matcher::literal("\\"))?;
                let escaped = self.cursor.get(Matcher::kind(TokenType::Literal))?;
                if self.preserve_escaped {
                    self.output.push_str(&backslash.value);
                }
                self.output.push_str(&escaped.value);
                Ok(())
            }
            VariableRule::Variable => {
                let open = self.cursor.get(Matcher::literal("{"))?;
                let name = self.cursor.get(Matcher::kind(TokenType::Text))?;
                if name.value.contains(char::is_whitespace) {
                    return Err(ParseFailure::Mismatch);
                }
                let close = self.cursor.get(Matcher::literal("}"))?;
                let value = self.environment.get_text(&name.value).ok_or_else(|| {
                    MauError::parser(
                        format!("Variable {:?} has not been defined", name.value),
                        open.context.merge(&close.context),
                    )
                })?;
                self.output.push_str(&value);
                Ok(())
            }
            VariableRule::Text => {
                let token = self.cursor.next();
                self.output.push_str(&token.value);
                Ok(())
            }
        }
    }
}

/// Replace every `{name}` in `text` with the value of `name`.
pub fn interpolate(
    text: &str,
    context: &Context,
    environment: &Environment,
    preserve_escaped: bool,
) -> Result<String> {
    if !text.contains(['{', '\\']) {
        return Ok(text.to_string());
    }
    let tokens = VARIABLES.tokenize(text, context.start, context.source.clone())?;
    VariablesParser::new(tokens, environment, preserve_escaped).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        let mut env = Environment::new();
        env.set("name", "Mau");
        env.set("site.title", "Docs");
        env
    }

    #[test]
    fn test_replace() {
        let out = interpolate("Hi {name}, see {site.title}", &Context::default(), &env(), false);
        assert_eq!(out.unwrap(), "Hi Mau, see Docs");
    }

    #[test]
    fn test_undefined_variable() {
        let err = interpolate("{missing}", &Context::default(), &env(), false).unwrap_err();
        assert!(err.is_parser());
        assert!(err.message().contains("missing"));
    }

    #[test]
    fn test_escaped_brace() {
        let ctx = Context::default();
        assert_eq!(interpolate(r"\{name}", &ctx, &env(), false).unwrap(), "{name}");
        assert_eq!(interpolate(r"\{name}", &ctx, &env(), true).unwrap(), r"\{name}");
    }

    #[test]
    fn test_unmatched_braces_are_text() {
        let ctx = Context::default();
        assert_eq!(interpolate("a { b", &ctx, &env(), false).unwrap(), "a { b");
        assert_eq!(interpolate("}", &ctx, &env(), false).unwrap(), "}");
    }
}
