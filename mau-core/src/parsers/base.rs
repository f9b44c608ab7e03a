//! Backtracking engine shared by every mau parser.
//!
//! A parser is a [`TokenCursor`] plus an ordered list of rules. The engine
//! tries each rule inside a scoped region: a rule that reports
//! [`ParseFailure::Mismatch`] leaves the cursor where it found it and the
//! next rule is tried, while a fatal error aborts the parse.

use crate::error::{MauError, Result};
use crate::token::{Matcher, Token, TokenType};
use mau_types::Context;
use std::fmt;

/// Why a rule did not produce a result.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseFailure {
    /// The rule does not apply here. Routine, never reported.
    Mismatch,
    /// The input is invalid.
    Fatal(MauError),
}

impl From<MauError> for ParseFailure {
    fn from(error: MauError) -> Self {
        ParseFailure::Fatal(error)
    }
}

pub type ParseResult<T> = std::result::Result<T, ParseFailure>;

/// Index and save points over a token list that always ends with EOF.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
    saved: Vec<usize>,
}

impl TokenCursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenType::Eof)) {
            let context = tokens
                .last()
                .map(|t| Context::at(t.context.end, t.context.source.clone()))
                .unwrap_or_default();
            tokens.push(Token::new(TokenType::Eof, "", context));
        }
        Self {
            tokens,
            index: 0,
            saved: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The token under the cursor. Past the end this is the final EOF.
    pub fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.index.min(last)]
    }

    pub fn at(&self, matcher: Matcher<'_>) -> bool {
        matcher.matches(self.current())
    }

    pub fn at_eof(&self) -> bool {
        self.current().is(TokenType::Eof)
    }

    pub fn peek(&self, matcher: Matcher<'_>) -> ParseResult<&Token> {
        if self.at(matcher) {
            Ok(self.current())
        } else {
            Err(ParseFailure::Mismatch)
        }
    }

    /// Lookahead with an arbitrary predicate.
    pub fn peek_where(&self, pred: impl Fn(&Token) -> bool) -> ParseResult<&Token> {
        let token = self.current();
        if pred(token) {
            Ok(token)
        } else {
            Err(ParseFailure::Mismatch)
        }
    }

    /// Consume the current token whatever it is. EOF is never consumed.
    pub fn next(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is(TokenType::Eof) {
            self.index += 1;
        }
        token
    }

    pub fn get(&mut self, matcher: Matcher<'_>) -> ParseResult<Token> {
        self.peek(matcher)?;
        Ok(self.next())
    }

    /// Like [`get`](Self::get) when no alternative is left: a mismatch is
    /// an error.
    pub fn force(&mut self, matcher: Matcher<'_>) -> Result<Token> {
        if self.at(matcher) {
            return Ok(self.next());
        }
        let found = self.current();
        Err(MauError::parser(
            format!("Expected {}, found {}", matcher, found),
            found.context.clone(),
        ))
    }

    /// Consume tokens up to the first stop token, which is left in place.
    /// EOF always stops. A literal backslash escapes the token after it,
    /// which then never stops the collection. The backslash is dropped
    /// only in front of a stop token, and kept there too if
    /// `preserve_escaped` is set.
    pub fn collect(&mut self, stops: &[Matcher<'_>], preserve_escaped: bool) -> Vec<Token> {
        let mut collected = Vec::new();
        loop {
            let token = self.current();
            if token.is(TokenType::Eof) || stops.iter().any(|m| m.matches(token)) {
                return collected;
            }
            let token = self.next();
            if token.is_literal("\\") && !self.at_eof() {
                let escapes_stop = stops.iter().any(|m| m.matches(self.current()));
                if preserve_escaped || !escapes_stop {
                    collected.push(token);
                }
                collected.push(self.next());
                continue;
            }
            collected.push(token);
        }
    }

    pub fn save(&mut self) {
        self.saved.push(self.index);
    }

    pub fn commit(&mut self) {
        self.saved.pop();
    }

    pub fn restore(&mut self) {
        if let Some(index) = self.saved.pop() {
            self.index = index;
        }
    }
}

/// Concatenated values of `tokens`.
pub fn join_values(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.value.as_str()).collect()
}

/// Union of the contexts of `tokens`, or `fallback` when there are none.
pub fn span_of(tokens: &[Token], fallback: &Context) -> Context {
    match tokens.split_first() {
        Some((first, rest)) => rest
            .iter()
            .fold(first.context.clone(), |acc, t| acc.merge(&t.context)),
        None => fallback.clone(),
    }
}

/// A parser plugged into the shared rule-selection loop.
pub trait Grammar {
    type Rule: Copy + fmt::Debug + 'static;

    /// Rules in the order they are tried.
    const RULES: &'static [Self::Rule];

    fn name(&self) -> &'static str;

    fn cursor(&self) -> &TokenCursor;

    fn cursor_mut(&mut self) -> &mut TokenCursor;

    fn apply(&mut self, rule: Self::Rule) -> ParseResult<()>;

    /// Run `f` in a scoped region. On mismatch the cursor is restored and
    /// `None` returned; fatal errors restore the cursor and propagate.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> Result<Option<T>>
    where
        Self: Sized,
    {
        self.cursor_mut().save();
        match f(self) {
            Ok(value) => {
                self.cursor_mut().commit();
                Ok(Some(value))
            }
            Err(ParseFailure::Mismatch) => {
                self.cursor_mut().restore();
                Ok(None)
            }
            Err(ParseFailure::Fatal(error)) => {
                self.cursor_mut().restore();
                Err(error)
            }
        }
    }

    /// Apply rules until EOF.
    fn run(&mut self) -> Result<()>
    where
        Self: Sized,
    {
        while !self.cursor().at_eof() {
            let before = self.cursor().index();
            let mut applied = false;

            for rule in Self::RULES {
                tracing::trace!(parser = self.name(), ?rule, "trying rule");
                if self.attempt(|parser| parser.apply(*rule))?.is_some() {
                    applied = true;
                    break;
                }
            }

            let token = self.cursor().current();
            if !applied {
                return Err(MauError::parser(
                    format!("Cannot parse token {}", token),
                    token.context.clone(),
                ));
            }
            if self.cursor().index() == before {
                return Err(MauError::parser(
                    format!("Loop detected in {} parser at {}", self.name(), token),
                    token.context.clone(),
                ));
            }
        }
        Ok(())
    }
}
