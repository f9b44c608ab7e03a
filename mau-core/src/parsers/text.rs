//! Inline parser: styles, verbatim, escapes and macros.
//!
//! Macro bodies marked as rich text are parsed again with this same
//! grammar. Plain words are merged into [`NodeKind::Text`] nodes once a
//! sentence is complete. References are registered only after the whole
//! text parsed, so abandoned attempts leave nothing behind.

use super::arguments::parse_arguments;
use super::base::{join_values, Grammar, ParseFailure, ParseResult, TokenCursor};
use super::condition::parse_condition;
use crate::arguments::Arguments;
use crate::environment::Environment;
use crate::error::{MauError, Result};
use crate::lexers::text::TEXT;
use crate::managers::Managers;
use crate::nodes::{FootnoteIds, ImageData, NodeArena, NodeId, NodeKind, Style, CONTENT};
use crate::token::{Matcher, Token, TokenType};
use mau_types::Context;

const STYLE_MARKERS: &[&str] = &["_", "*", "^", "~"];

#[derive(Debug, Clone, Copy)]
pub enum TextRule {
    Eol,
    Sentence,
}

/// Result of a single element.
#[derive(Debug)]
enum Element {
    Word(String, Context),
    Nodes(Vec<NodeId>),
}

pub struct TextParser<'p> {
    cursor: TokenCursor,
    arena: &'p mut NodeArena,
    environment: &'p Environment,
    nodes: Vec<NodeId>,
}

impl<'p> TextParser<'p> {
    pub fn new(
        tokens: Vec<Token>,
        arena: &'p mut NodeArena,
        environment: &'p Environment,
    ) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            arena,
            environment,
            nodes: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Vec<NodeId>> {
        self.run()?;
        Ok(self.nodes)
    }

    fn is_boundary(token: &Token) -> bool {
        token.is(TokenType::Eof) || token.is(TokenType::Eol)
    }

    /// Elements up to a stop token, EOL or EOF, with adjacent words merged.
    fn parse_sentence(&mut self, stops: &[Matcher<'_>]) -> ParseResult<Vec<NodeId>> {
        let mut elements = Vec::new();
        while let Some(element) = self.attempt(|parser| parser.parse_element(stops))? {
            elements.push(element);
        }
        Ok(self.merge_words(elements))
    }

    fn merge_words(&mut self, elements: Vec<Element>) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut pending: Option<(String, Context)> = None;

        for element in elements {
            match element {
                Element::Word(value, context) => {
                    pending = Some(match pending.take() {
                        Some((text, span)) => (text + &value, span.merge(&context)),
                        None => (value, context),
                    });
                }
                Element::Nodes(ids) => {
                    if let Some((value, context)) = pending.take() {
                        nodes.push(self.arena.alloc(NodeKind::Text { value }, context));
                    }
                    nodes.extend(ids);
                }
            }
        }
        if let Some((value, context)) = pending {
            nodes.push(self.arena.alloc(NodeKind::Text { value }, context));
        }
        nodes
    }

    fn parse_element(&mut self, stops: &[Matcher<'_>]) -> ParseResult<Element> {
        let token = self.cursor.current();
        if Self::is_boundary(token) || stops.iter().any(|m| m.matches(token)) {
            return Err(ParseFailure::Mismatch);
        }

        if let Some(element) = self.attempt(Self::parse_escape)? {
            return Ok(element);
        }
        if let Some(element) = self.attempt(Self::parse_macro)? {
            return Ok(element);
        }
        if let Some(element) = self.attempt(Self::parse_verbatim)? {
            return Ok(element);
        }
        if let Some(element) = self.attempt(Self::parse_escaped_span)? {
            return Ok(element);
        }
        if let Some(element) = self.attempt(Self::parse_style)? {
            return Ok(element);
        }

        let word = self.cursor.next();
        Ok(Element::Word(word.value, word.context))
    }

    fn parse_escape(&mut self) -> ParseResult<Element> {
        self.cursor.get(Matcher::literal("\\"))?;
        self.cursor.peek_where(|t| !Self::is_boundary(t))?;
        let escaped = self.cursor.next();
        Ok(Element::Word(escaped.value, escaped.context))
    }

    fn parse_verbatim(&mut self) -> ParseResult<Element> {
        let open = self.cursor.get(Matcher::literal("`"))?;
        let body = self.cursor.collect(
            &[Matcher::literal("`"), Matcher::kind(TokenType::Eol)],
            false,
        );
        let close = self.cursor.get(Matcher::literal("`"))?;
        let node = self.arena.alloc(
            NodeKind::Verbatim {
                value: join_values(&body),
            },
            open.context.merge(&close.context),
        );
        Ok(Element::Nodes(vec![node]))
    }

    /// `$...$` and `%...%`: everything inside is plain text.
    fn parse_escaped_span(&mut self) -> ParseResult<Element> {
        let open = self
            .cursor
            .peek_where(|t| t.is_literal("$") || t.is_literal("%"))?
            .clone();
        self.cursor.next();
        let body = self.cursor.collect(
            &[
                Matcher::literal(&open.value),
                Matcher::kind(TokenType::Eol),
            ],
            false,
        );
        let close = self.cursor.get(Matcher::literal(&open.value))?;
        Ok(Element::Word(
            join_values(&body),
            open.context.merge(&close.context),
        ))
    }

    fn parse_style(&mut self) -> ParseResult<Element> {
        let open = self
            .cursor
            .peek_where(|t| t.kind == TokenType::Literal && STYLE_MARKERS.contains(&t.value.as_str()))?
            .clone();
        self.cursor.next();

        let content = self.parse_sentence(&[Matcher::literal(&open.value)])?;
        if content.is_empty() {
            return Err(ParseFailure::Mismatch);
        }
        let close = self.cursor.get(Matcher::literal(&open.value))?;

        let style = Style::from_marker(&open.value).ok_or(ParseFailure::Mismatch)?;
        let node = self
            .arena
            .alloc(NodeKind::Style(style), open.context.merge(&close.context));
        self.arena.attach_all(node, CONTENT, &content);
        Ok(Element::Nodes(vec![node]))
    }

    /// `[name](arguments)`
    fn parse_macro(&mut self) -> ParseResult<Element> {
        let open = self.cursor.get(Matcher::literal("["))?;
        let name = self.cursor.get(Matcher::kind(TokenType::Text))?;
        self.cursor.get(Matcher::literal("]"))?;
        self.cursor.get(Matcher::literal("("))?;
        let (raw, close) = self.macro_arguments()?;

        let context = open.context.merge(&close.context);
        let arguments = parse_arguments(&raw, &context)?;
        tracing::trace!(name = %name.value, "macro");
        let nodes = self.build_macro(&name.value, arguments, context)?;
        Ok(Element::Nodes(nodes))
    }

    /// Raw text up to the closing parenthesis. Inside double quotes `,` and
    /// `)` are data; quotes and escapes are kept for the arguments parser.
    fn macro_arguments(&mut self) -> ParseResult<(String, Token)> {
        let mut raw = String::new();
        let mut quoted = false;

        loop {
            self.cursor.peek_where(|t| !Self::is_boundary(t))?;
            let token = self.cursor.next();

            if token.is_literal("\\") {
                self.cursor.peek_where(|t| !Self::is_boundary(t))?;
                raw.push_str(&token.value);
                raw.push_str(&self.cursor.next().value);
                continue;
            }
            if token.is_literal("\"") {
                quoted = !quoted;
            } else if token.is_literal(")") && !quoted {
                return Ok((raw, token));
            }
            raw.push_str(&token.value);
        }
    }

    fn build_macro(
        &mut self,
        name: &str,
        mut arguments: Arguments,
        context: Context,
    ) -> Result<Vec<NodeId>> {
        if let Some(condition) = name.strip_prefix("if:") {
            return self.conditional(condition, arguments, &context, false);
        }
        if let Some(condition) = name.strip_prefix("ifeval:") {
            return self.conditional(condition, arguments, &context, true);
        }

        let (kind, body) = match name {
            "link" | "mailto" => {
                arguments.set_names_strict(&["target"], &["text"], &context)?;
                let target = named(&arguments, "target");
                let text = arguments
                    .get("text")
                    .map(str::to_string)
                    .unwrap_or_else(|| target.clone());
                let target = if name == "mailto" {
                    format!("mailto:{}", target)
                } else {
                    target
                };
                (NodeKind::Link { target }, Some(text))
            }
            "header" => {
                arguments.set_names_strict(&["alias", "text"], &[], &context)?;
                let kind = NodeKind::HeaderLink {
                    alias: named(&arguments, "alias"),
                    target_id: None,
                };
                (kind, Some(named(&arguments, "text")))
            }
            "image" => {
                arguments.set_names_strict(&["uri"], &["alt_text", "width", "height"], &context)?;
                let image = ImageData {
                    uri: named(&arguments, "uri"),
                    alt_text: arguments.get("alt_text").map(str::to_string),
                    width: arguments.get("width").map(str::to_string),
                    height: arguments.get("height").map(str::to_string),
                };
                (NodeKind::Image(image), None)
            }
            "footnote" => {
                arguments.set_names_strict(&["name"], &[], &context)?;
                let kind = NodeKind::FootnoteRef {
                    name: named(&arguments, "name"),
                    ids: FootnoteIds::default(),
                    declaration: None,
                };
                (kind, None)
            }
            "class" => {
                arguments.set_names_strict(&["classes", "text"], &[], &context)?;
                let classes = split_list(&named(&arguments, "classes"));
                (NodeKind::Class { classes }, Some(named(&arguments, "text")))
            }
            "unicode" | "raw" => {
                arguments.set_names_strict(&["value"], &[], &context)?;
                let value = named(&arguments, "value");
                let kind = if name == "unicode" {
                    NodeKind::Unicode { value }
                } else {
                    NodeKind::Raw { value }
                };
                (kind, None)
            }
            _ => (
                NodeKind::Macro {
                    name: name.to_string(),
                },
                None,
            ),
        };

        let content = match body {
            Some(text) => self.parse_rich(&text, &context)?,
            None => Vec::new(),
        };

        let node = self.arena.alloc(kind, context);
        self.arena.get_mut(node).info.arguments = arguments;
        self.arena.attach_all(node, CONTENT, &content);
        Ok(vec![node])
    }

    /// `[if:COND](true, false)` and `[ifeval:COND](true, false)`. The chosen
    /// case replaces the macro. With `evaluate` it names a variable whose
    /// value is used instead.
    fn conditional(
        &mut self,
        condition: &str,
        mut arguments: Arguments,
        context: &Context,
        evaluate: bool,
    ) -> Result<Vec<NodeId>> {
        let condition = parse_condition(condition, context)?;
        arguments.set_names_strict(&["true_case"], &["false_case"], context)?;

        let case = if condition.evaluate(self.environment)? {
            arguments.get("true_case")
        } else {
            arguments.get("false_case")
        };
        let Some(case) = case else {
            return Ok(Vec::new());
        };

        let text = if evaluate {
            self.environment.get_text(case).ok_or_else(|| {
                MauError::parser(
                    format!("Variable {:?} has not been defined", case),
                    context.clone(),
                )
            })?
        } else {
            case.to_string()
        };
        self.parse_rich(&text, context)
    }

    fn parse_rich(&mut self, text: &str, context: &Context) -> Result<Vec<NodeId>> {
        parse_fragment(text, context, &mut *self.arena, self.environment)
    }
}

impl Grammar for TextParser<'_> {
    type Rule = TextRule;

    const RULES: &'static [TextRule] = &[TextRule::Eol, TextRule::Sentence];

    fn name(&self) -> &'static str {
        "text"
    }

    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }

    fn apply(&mut self, rule: TextRule) -> ParseResult<()> {
        match rule {
            TextRule::Eol => {
                self.cursor.get(Matcher::kind(TokenType::Eol))?;
                Ok(())
            }
            TextRule::Sentence => {
                let nodes = self.parse_sentence(&[])?;
                if nodes.is_empty() && !self.cursor.at_eof() {
                    return Err(ParseFailure::Mismatch);
                }
                self.nodes.extend(nodes);
                Ok(())
            }
        }
    }
}

fn named(arguments: &Arguments, name: &str) -> String {
    arguments.get(name).unwrap_or_default().to_string()
}

/// Split `a, b` into trimmed non-empty items.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_fragment(
    text: &str,
    context: &Context,
    arena: &mut NodeArena,
    environment: &Environment,
) -> Result<Vec<NodeId>> {
    let tokens = TEXT.tokenize(text, context.start, context.source.clone())?;
    TextParser::new(tokens, arena, environment).parse()
}

/// Lex and parse inline `text` that starts at `context`. Footnote mentions
/// and header links are registered with `managers` in text order.
pub fn parse_inline(
    text: &str,
    context: &Context,
    arena: &mut NodeArena,
    environment: &Environment,
    managers: &mut Managers,
) -> Result<Vec<NodeId>> {
    let nodes = parse_fragment(text, context, arena, environment)?;
    for root in &nodes {
        for node in std::iter::once(*root).chain(arena.descendants(*root)) {
            match arena.kind(node) {
                NodeKind::HeaderLink { .. } => managers.header_links.add_link(node),
                NodeKind::FootnoteRef { .. } => managers.footnotes.add_mention(node),
                _ => {}
            }
        }
    }
    Ok(nodes)
}
