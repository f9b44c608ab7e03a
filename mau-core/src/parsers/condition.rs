//! Parser for `VARIABLE==VALUE` and `VARIABLE!=VALUE` conditions.

use super::base::{join_values, Grammar, ParseResult, TokenCursor};
use crate::environment::Environment;
use crate::error::{MauError, Result};
use crate::lexers::condition::CONDITION;
use crate::token::{Matcher, Token, TokenType};
use mau_types::Context;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub variable: String,
    pub comparison: Comparison,
    pub value: String,
    pub context: Context,
}

impl Condition {
    /// Compare the variable against the value. The variable must be
    /// defined.
    pub fn evaluate(&self, environment: &Environment) -> Result<bool> {
        let current = environment.get_text(&self.variable).ok_or_else(|| {
            MauError::parser(
                format!("Variable {:?} has not been defined", self.variable),
                self.context.clone(),
            )
        })?;
        Ok(match self.comparison {
            Comparison::Equal => current == self.value,
            Comparison::NotEqual => current != self.value,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.variable, self.comparison.as_str(), self.value)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ConditionRule {
    Condition,
}

pub struct ConditionParser {
    cursor: TokenCursor,
    context: Context,
    condition: Option<Condition>,
}

impl ConditionParser {
    pub fn new(tokens: Vec<Token>, context: Context) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            context,
            condition: None,
        }
    }

    pub fn parse(mut self) -> Result<Condition> {
        self.run()?;
        self.condition.ok_or_else(|| {
            MauError::parser("Empty condition", self.context.clone())
        })
    }

    fn skip_whitespace(&mut self) {
        while self.cursor.at(Matcher::kind(TokenType::Whitespace)) {
            self.cursor.next();
        }
    }
}

impl Grammar for ConditionParser {
    type Rule = ConditionRule;

    const RULES: &'static [ConditionRule] = &[ConditionRule::Condition];

    fn name(&self) -> &'static str {
        "condition"
    }

    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }

    fn apply(&mut self, rule: ConditionRule) -> ParseResult<()> {
        match rule {
            ConditionRule::Condition => {
                self.skip_whitespace();
                let variable = self.cursor.get(Matcher::kind(TokenType::Text))?;
                self.skip_whitespace();
                let operator = self.cursor.force(Matcher::kind(TokenType::Literal))?;
                let comparison = match operator.value.as_str() {
                    "==" => Comparison::Equal,
                    _ => Comparison::NotEqual,
                };
                self.skip_whitespace();
                let rest = self.cursor.collect(&[], true);
                self.condition = Some(Condition {
                    variable: variable.value,
                    comparison,
                    value: join_values(&rest).trim_end().to_string(),
                    context: self.context.clone(),
                });
                Ok(())
            }
        }
    }
}

pub fn parse_condition(text: &str, context: &Context) -> Result<Condition> {
    let tokens = CONDITION.tokenize(text, context.start, context.source.clone())?;
    ConditionParser::new(tokens, context.clone()).parse()
}
