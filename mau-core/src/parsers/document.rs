//! Block-level parser.
//!
//! Every rule but the buffer-filling ones (arguments, label, control)
//! produces one node. Those nodes drain the buffers, and references they
//! register are staged in a scratch [`Managers`] that is merged only once
//! the node is kept: a node discarded by a false `@if` leaves nothing
//! behind.

use super::arguments::parse_arguments;
use super::base::{span_of, Grammar, ParseFailure, ParseResult, TokenCursor};
use super::buffers::{Buffers, Control, Label, Pending};
use super::condition::parse_condition;
use super::text::{parse_inline, split_list};
use super::variables::interpolate;
use crate::arguments::Arguments;
use crate::config::ParserConfig;
use crate::environment::Environment;
use crate::error::{MauError, Result};
use crate::lexers::document::DOCUMENT;
use crate::loader::SourceLoader;
use crate::managers::Managers;
use crate::nodes::{
    BlockData, FootnoteIds, HeaderData, ImageData, NodeArena, NodeId, NodeKind, SourceLine,
    CONTENT,
};
use crate::token::{Matcher, Token, TokenType};
use mau_types::{Context, Position};
use std::collections::BTreeMap;

const DEFAULT_LABEL_ROLE: &str = "title";

#[derive(Debug, Clone, Copy)]
pub enum DocumentRule {
    BlankLine,
    HorizontalRule,
    Variable,
    Command,
    Label,
    Control,
    Arguments,
    Header,
    Block,
    Include,
    List,
    Paragraph,
}

/// How a sub-parse relates to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Same environment, references merged into the parent.
    Shared,
    /// Same environment, references resolved inside the sub-parse.
    Isolated,
    /// Fresh environment, references resolved inside the sub-parse.
    Fresh,
}

pub struct DocumentParser<'p> {
    cursor: TokenCursor,
    arena: &'p mut NodeArena,
    environment: &'p mut Environment,
    loader: &'p dyn SourceLoader,
    /// Sources currently being parsed, outermost first.
    includes: Vec<String>,
    buffers: Buffers,
    managers: Managers,
    nodes: Vec<NodeId>,
    /// Start of the next `start=auto` ordered list.
    list_counter: usize,
}

impl<'p> DocumentParser<'p> {
    pub fn new(
        tokens: Vec<Token>,
        arena: &'p mut NodeArena,
        environment: &'p mut Environment,
        loader: &'p dyn SourceLoader,
    ) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            arena,
            environment,
            loader,
            includes: Vec::new(),
            buffers: Buffers::default(),
            managers: Managers::new(),
            nodes: Vec::new(),
            list_counter: 1,
        }
    }

    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.includes = includes;
        self
    }

    pub fn with_list_counter(mut self, counter: usize) -> Self {
        self.list_counter = counter;
        self
    }

    /// Parse every token. Returns the top-level nodes and the unresolved
    /// manager state, which the caller finalizes or merges.
    pub fn parse(self) -> Result<(Vec<NodeId>, Managers)> {
        let (nodes, managers, _) = self.parse_counted()?;
        Ok((nodes, managers))
    }

    /// Like [`parse`](Self::parse), also returning the list counter so a
    /// parent parse can continue numbering after it.
    fn parse_counted(mut self) -> Result<(Vec<NodeId>, Managers, usize)> {
        self.run()?;
        if !self.buffers.is_empty() {
            tracing::debug!("metadata at end of input is not attached to any node");
        }
        Ok((self.nodes, self.managers, self.list_counter))
    }

    /// Attach label and arguments, evaluate the control and keep the node
    /// if it passes. Returns whether the node was kept.
    fn finish(
        &mut self,
        node: NodeId,
        label: Option<Label>,
        control: Option<Control>,
        mut scratch: Managers,
        in_content: bool,
    ) -> Result<bool> {
        if let Some(control) = control {
            if !control.process(self.environment)? {
                tracing::trace!(condition = %control.condition, "node discarded");
                return Ok(false);
            }
        }

        if let Some(label) = label {
            let text = interpolate(&label.text, &label.context, self.environment, true)?;
            let nodes = parse_inline(
                &text,
                &label.context,
                &mut *self.arena,
                self.environment,
                &mut scratch,
            )?;
            self.arena.attach_label(node, &label.role, &nodes);
        }

        self.managers.update(scratch)?;
        if in_content {
            self.nodes.push(node);
        }
        Ok(true)
    }

    fn alloc(&mut self, kind: NodeKind, context: Context, arguments: Arguments) -> NodeId {
        let node = self.arena.alloc(kind, context);
        self.arena.get_mut(node).info.arguments = arguments;
        node
    }

    /// Interpolate and parse one line of inline text.
    fn inline(&mut self, token: &Token, scratch: &mut Managers) -> Result<Vec<NodeId>> {
        let text = interpolate(&token.value, &token.context, self.environment, true)?;
        parse_inline(
            &text,
            &token.context,
            &mut *self.arena,
            self.environment,
            scratch,
        )
    }

    /// Arguments given on the line itself replace buffered ones.
    fn line_arguments(&self, token: Option<&Token>, buffered: Arguments) -> Result<Arguments> {
        match token {
            Some(token) => {
                let text = interpolate(&token.value, &token.context, self.environment, true)?;
                parse_arguments(&text, &token.context)
            }
            None => Ok(buffered),
        }
    }

    fn sub_parse(
        &mut self,
        tokens: Vec<Token>,
        includes: Vec<String>,
        scope: Scope,
    ) -> Result<(Vec<NodeId>, Managers)> {
        tracing::debug!(?scope, tokens = tokens.len(), "sub-parse");
        match scope {
            Scope::Fresh => {
                let mut environment = Environment::new();
                let (nodes, managers) =
                    DocumentParser::new(tokens, &mut *self.arena, &mut environment, self.loader)
                        .with_includes(includes)
                        .parse()?;
                managers.finalize(&mut *self.arena)?;
                Ok((nodes, Managers::new()))
            }
            Scope::Isolated | Scope::Shared => {
                let (nodes, managers, counter) = DocumentParser::new(
                    tokens,
                    &mut *self.arena,
                    &mut *self.environment,
                    self.loader,
                )
                .with_includes(includes)
                .with_list_counter(self.list_counter)
                .parse_counted()?;
                self.list_counter = counter;
                if scope == Scope::Isolated {
                    managers.finalize(&mut *self.arena)?;
                    return Ok((nodes, Managers::new()));
                }
                Ok((nodes, managers))
            }
        }
    }

    fn parse_variable(&mut self) -> ParseResult<()> {
        let token = self.cursor.get(Matcher::kind(TokenType::Variable))?;
        let value = match self.cursor.peek(Matcher::kind(TokenType::Text)) {
            Ok(_) => Some(self.cursor.next()),
            Err(_) => None,
        };

        if let Some(name) = token.value.strip_prefix('+') {
            self.environment.set(name, true);
        } else if let Some(name) = token.value.strip_prefix('-') {
            self.environment.set(name, false);
        } else {
            let text = match &value {
                Some(value) => interpolate(&value.value, &value.context, self.environment, false)?,
                None => String::new(),
            };
            self.environment.set(&token.value, text);
        }
        Ok(())
    }

    fn parse_command(&mut self) -> ParseResult<()> {
        let token = self.cursor.get(Matcher::kind(TokenType::Command))?;
        let inline = match self.cursor.peek(Matcher::kind(TokenType::Arguments)) {
            Ok(_) => Some(self.cursor.next()),
            Err(_) => None,
        };

        let Pending {
            arguments,
            label,
            control,
        } = self.buffers.drain();
        let mut arguments = self.line_arguments(inline.as_ref(), arguments)?;
        let context = match &inline {
            Some(inline) => token.context.merge(&inline.context),
            None => token.context.clone(),
        };

        let kind = match token.value.as_str() {
            "toc" => NodeKind::TocCommand {
                flat: None,
                nested: None,
            },
            "footnotes" => NodeKind::FootnotesCommand {
                entries: Vec::new(),
            },
            "blockgroup" => {
                arguments.set_names_strict(&["group"], &[], &context)?;
                NodeKind::BlockGroupCommand {
                    group: arguments.get("group").unwrap_or_default().to_string(),
                    blocks: BTreeMap::new(),
                }
            }
            name => NodeKind::Command {
                name: name.to_string(),
            },
        };

        let node = self.alloc(kind, context, arguments);
        let mut scratch = Managers::new();
        match self.arena.kind(node) {
            NodeKind::TocCommand { .. } => scratch.toc.add_command(node),
            NodeKind::FootnotesCommand { .. } => scratch.footnotes.add_command(node),
            NodeKind::BlockGroupCommand { .. } => scratch.block_groups.add_command(node),
            _ => {}
        }
        self.finish(node, label, control, scratch, true)?;
        Ok(())
    }

    fn parse_label(&mut self) -> ParseResult<()> {
        let token = self.cursor.get(Matcher::kind(TokenType::Label))?;
        let text = self.cursor.force(Matcher::kind(TokenType::Text))?;
        let role = if token.value.is_empty() {
            DEFAULT_LABEL_ROLE.to_string()
        } else {
            token.value
        };
        self.buffers.label.push(Label {
            role,
            text: text.value,
            context: text.context,
        });
        Ok(())
    }

    fn parse_control(&mut self) -> ParseResult<()> {
        let token = self.cursor.get(Matcher::kind(TokenType::Control))?;
        let text = self.cursor.force(Matcher::kind(TokenType::Text))?;
        if token.value != "if" {
            return Err(ParseFailure::Fatal(MauError::parser(
                format!("Control operator {:?} is not supported", token.value),
                token.context,
            )));
        }
        let condition = parse_condition(&text.value, &text.context)?;
        self.buffers.control.push(Control {
            operator: token.value,
            condition,
            context: token.context.merge(&text.context),
        });
        Ok(())
    }

    fn parse_arguments_line(&mut self) -> ParseResult<()> {
        self.cursor.get(Matcher::literal("["))?;
        let token = match self.cursor.peek(Matcher::kind(TokenType::Arguments)) {
            Ok(_) => Some(self.cursor.next()),
            Err(_) => None,
        };
        self.cursor.force(Matcher::literal("]"))?;
        let arguments = self.line_arguments(token.as_ref(), Arguments::new())?;
        self.buffers.arguments.push(arguments);
        Ok(())
    }

    fn parse_header(&mut self) -> ParseResult<()> {
        let marker = self.cursor.get(Matcher::kind(TokenType::Header))?;
        let text = self.cursor.force(Matcher::kind(TokenType::Text))?;
        let Pending {
            arguments,
            label,
            control,
        } = self.buffers.drain();

        let mut scratch = Managers::new();
        let content = self.inline(&text, &mut scratch)?;
        let alias = arguments.get("alias").map(str::to_string);
        let context = marker.context.merge(&text.context);
        let data = HeaderData {
            level: marker.value.chars().filter(|c| *c == '=').count(),
            text: interpolate(&text.value, &text.context, self.environment, false)?,
            alias: alias.clone(),
            internal_id: None,
            in_toc: !marker.value.ends_with('!'),
        };

        let node = self.alloc(NodeKind::Header(data), context.clone(), arguments);
        self.arena.attach_all(node, CONTENT, &content);
        scratch.toc.add_header(node);
        if let Some(alias) = alias {
            scratch.header_links.add_header(&alias, node, &context)?;
        }
        self.finish(node, label, control, scratch, true)?;
        Ok(())
    }

    fn parse_block(&mut self) -> ParseResult<()> {
        let open = self.cursor.get(Matcher::kind(TokenType::Block))?;
        let mut lines = Vec::new();
        while self.cursor.at(Matcher::kind(TokenType::Text)) {
            lines.push(self.cursor.next());
        }
        let close = self
            .cursor
            .force(Matcher::exact(TokenType::Block, &open.value))?;

        let Pending {
            mut arguments,
            label,
            control,
        } = self.buffers.drain();
        let counter = self.list_counter;
        let context = open.context.merge(&close.context);
        let config = ParserConfig::from_environment(self.environment);
        let engine = arguments
            .get("engine")
            .map(str::to_string)
            .unwrap_or(config.default_block_engine.clone());
        let classes = arguments.get("classes").map(split_list).unwrap_or_default();
        tracing::debug!(%engine, lines = lines.len(), "block");

        let mut scratch = Managers::new();
        let mut data = BlockData {
            engine: engine.clone(),
            classes,
            language: None,
        };

        let (kind, content, in_content) = match engine.as_str() {
            "default" | "mau" => {
                let scope = if engine == "mau" {
                    Scope::Fresh
                } else if arguments.get("isolate") == Some("true") {
                    Scope::Isolated
                } else {
                    Scope::Shared
                };
                let content = self.parse_body(&lines, &close, scope, &mut scratch)?;
                (NodeKind::Block(data), content, true)
            }
            "raw" => {
                let content = lines
                    .iter()
                    .map(|line| {
                        self.arena.alloc(
                            NodeKind::RawLine {
                                value: line.value.clone(),
                            },
                            line.context.clone(),
                        )
                    })
                    .collect();
                (NodeKind::Block(data), content, true)
            }
            "source" => {
                arguments.set_names(&[], &["language"], &context)?;
                data.language = Some(arguments.get("language").unwrap_or("text").to_string());
                let delimiter = arguments
                    .get("marker_delimiter")
                    .map(str::to_string)
                    .unwrap_or(config.source_marker_delimiter);
                let prefix = arguments
                    .get("highlight_prefix")
                    .map(str::to_string)
                    .unwrap_or(config.source_highlight_prefix);
                let content = lines
                    .iter()
                    .enumerate()
                    .map(|(index, line)| {
                        let source_line = split_callout(index + 1, &line.value, &delimiter, &prefix);
                        self.arena
                            .alloc(NodeKind::SourceLine(source_line), line.context.clone())
                    })
                    .collect();
                (NodeKind::Block(data), content, true)
            }
            "footnote" => {
                arguments.set_names(&["name"], &[], &context)?;
                let name = arguments.get("name").unwrap_or_default().to_string();
                let content = self.parse_body(&lines, &close, Scope::Shared, &mut scratch)?;
                let kind = NodeKind::Footnote {
                    name,
                    ids: FootnoteIds::default(),
                };
                (kind, content, false)
            }
            "group" => {
                arguments.set_names(&["group", "position"], &[], &context)?;
                let content = self.parse_body(&lines, &close, Scope::Shared, &mut scratch)?;
                (NodeKind::Block(data), content, false)
            }
            other => {
                return Err(ParseFailure::Fatal(MauError::parser(
                    format!("Engine {:?} is not available", other),
                    context,
                )));
            }
        };

        let node = self.alloc(kind, context.clone(), arguments);
        self.arena.attach_all(node, CONTENT, &content);

        match engine.as_str() {
            "footnote" => {
                let name = self
                    .arena
                    .get(node)
                    .info
                    .arguments
                    .get("name")
                    .unwrap_or_default()
                    .to_string();
                scratch.footnotes.add_declaration(&name, node, &context)?;
            }
            "group" => {
                let arguments = &self.arena.get(node).info.arguments;
                let group = arguments.get("group").unwrap_or_default().to_string();
                let position = arguments.get("position").unwrap_or_default().to_string();
                scratch
                    .block_groups
                    .add_block(&group, &position, node, &context)?;
            }
            _ => {}
        }

        if !self.finish(node, label, control, scratch, in_content)? {
            self.list_counter = counter;
        }
        Ok(())
    }

    /// Parse block body lines with the document grammar.
    fn parse_body(
        &mut self,
        lines: &[Token],
        close: &Token,
        scope: Scope,
        scratch: &mut Managers,
    ) -> Result<Vec<NodeId>> {
        let origin = lines.first().unwrap_or(close).context.start;
        let text = lines
            .iter()
            .map(|line| line.value.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let tokens = DOCUMENT.tokenize(&text, origin, close.context.source.clone())?;
        let (nodes, managers) = self.sub_parse(tokens, self.includes.clone(), scope)?;
        scratch.update(managers)?;
        Ok(nodes)
    }

    fn parse_include(&mut self) -> ParseResult<()> {
        let token = self.cursor.get(Matcher::kind(TokenType::Include))?;
        let inline = match self.cursor.peek(Matcher::kind(TokenType::Arguments)) {
            Ok(_) => Some(self.cursor.next()),
            Err(_) => None,
        };

        let Pending {
            arguments,
            label,
            control,
        } = self.buffers.drain();
        let mut arguments = self.line_arguments(inline.as_ref(), arguments)?;
        let context = match &inline {
            Some(inline) => token.context.merge(&inline.context),
            None => token.context.clone(),
        };
        let counter = self.list_counter;
        let mut scratch = Managers::new();

        let (kind, content) = match token.value.as_str() {
            "image" => {
                arguments.set_names_strict(&["uri"], &["alt_text", "width", "height"], &context)?;
                let image = ImageData {
                    uri: arguments.get("uri").unwrap_or_default().to_string(),
                    alt_text: arguments.get("alt_text").map(str::to_string),
                    width: arguments.get("width").map(str::to_string),
                    height: arguments.get("height").map(str::to_string),
                };
                (NodeKind::IncludeImage(image), Vec::new())
            }
            "mau" => {
                arguments.set_names_strict(&["uri"], &[], &context)?;
                let uri = arguments.get("uri").unwrap_or_default().to_string();
                let content = self.include_mau(&uri, &context, &mut scratch)?;
                (NodeKind::IncludeMau { uri }, content)
            }
            include_type => {
                let mut uris = arguments.unnamed.clone();
                if let Some(uri) = arguments.get("uri") {
                    uris.push(uri.to_string());
                }
                if uris.is_empty() {
                    return Err(ParseFailure::Fatal(MauError::parser(
                        format!("Include {:?} requires at least one URI", include_type),
                        context,
                    )));
                }
                let kind = NodeKind::Include {
                    include_type: include_type.to_string(),
                    uris,
                };
                (kind, Vec::new())
            }
        };

        let node = self.alloc(kind, context, arguments);
        self.arena.attach_all(node, CONTENT, &content);
        if !self.finish(node, label, control, scratch, true)? {
            self.list_counter = counter;
        }
        Ok(())
    }

    fn include_mau(
        &mut self,
        uri: &str,
        context: &Context,
        scratch: &mut Managers,
    ) -> Result<Vec<NodeId>> {
        let mut chain = self.includes.clone();
        chain.push(uri.to_string());
        if self.includes.iter().any(|name| name == uri) {
            return Err(MauError::parser(
                format!("Include cycle detected: {}", chain.join(" -> ")),
                context.clone(),
            ));
        }

        tracing::debug!(%uri, depth = chain.len(), "include");
        let text = self.loader.load(uri).map_err(|error| {
            MauError::parser(format!("Cannot load {:?}: {}", uri, error), context.clone())
        })?;
        let tokens = DOCUMENT.tokenize(&text, Position::default(), Some(uri.to_string()))?;
        let (nodes, managers) = self.sub_parse(tokens, chain, Scope::Shared)?;
        scratch.update(managers)?;
        Ok(nodes)
    }

    fn parse_list(&mut self) -> ParseResult<()> {
        let first = self.cursor.peek(Matcher::kind(TokenType::List))?.clone();
        let Pending {
            arguments,
            label,
            control,
        } = self.buffers.drain();

        let ordered = first.value.starts_with('#');
        let start = match arguments.get("start") {
            None | Some("auto") => self.list_counter,
            Some(value) => value.parse::<usize>().map_err(|_| {
                MauError::parser(
                    format!("Invalid list start {:?}", value),
                    first.context.clone(),
                )
            })?,
        };

        let mut scratch = Managers::new();
        let level = first.value.chars().count();
        let (node, items) = self.parse_list_level(level, true, &mut scratch)?;
        if let NodeKind::List { start: slot, .. } = &mut self.arena.get_mut(node).kind {
            *slot = start;
        }
        self.arena.get_mut(node).info.arguments = arguments;

        if self.finish(node, label, control, scratch, true)? && ordered {
            self.list_counter = start + items;
        }
        Ok(())
    }

    /// Items whose marker has `level` characters. Longer markers open a
    /// nested list inside the last item; a shorter one ends a nested list
    /// and is an error for the main list. Returns the list and its item
    /// count.
    fn parse_list_level(
        &mut self,
        level: usize,
        main: bool,
        scratch: &mut Managers,
    ) -> Result<(NodeId, usize)> {
        let first = self.cursor.current().clone();
        let list = self.arena.alloc(
            NodeKind::List {
                ordered: first.value.starts_with('#'),
                main,
                start: 1,
            },
            first.context.clone(),
        );
        let mut last_item = None;
        let mut items = 0;

        loop {
            let marker = self.cursor.current().clone();
            if !marker.is(TokenType::List) {
                break;
            }
            let depth = marker.value.chars().count();

            if depth == level {
                self.cursor.next();
                let text = self.cursor.force(Matcher::kind(TokenType::Text))?;
                let content = self.inline(&text, scratch)?;
                let item = self.arena.alloc(
                    NodeKind::ListItem { level },
                    marker.context.merge(&text.context),
                );
                self.arena.attach_all(item, CONTENT, &content);
                self.arena.attach(list, CONTENT, item);
                last_item = Some(item);
                items += 1;
            } else if depth > level {
                let Some(item) = last_item else {
                    return Err(MauError::parser(
                        format!("List marker {} has no parent item", marker.value),
                        marker.context,
                    ));
                };
                let (nested, _) = self.parse_list_level(depth, false, scratch)?;
                self.arena.attach(item, CONTENT, nested);
            } else if main {
                return Err(MauError::parser(
                    format!(
                        "List marker {} is shorter than the list level {}",
                        marker.value, level
                    ),
                    marker.context,
                ));
            } else {
                break;
            }
        }

        Ok((list, items))
    }

    fn parse_paragraph(&mut self) -> ParseResult<()> {
        let mut lines = vec![self.cursor.get(Matcher::kind(TokenType::Text))?];
        while self.cursor.at(Matcher::kind(TokenType::Text)) {
            lines.push(self.cursor.next());
        }
        let Pending {
            arguments,
            label,
            control,
        } = self.buffers.drain();

        let context = span_of(&lines, &lines[0].context);
        let mut joined = Vec::with_capacity(lines.len());
        for line in &lines {
            joined.push(interpolate(
                line.value.trim(),
                &line.context,
                self.environment,
                true,
            )?);
        }
        let mut scratch = Managers::new();
        let content = parse_inline(
            &joined.join(" "),
            &lines[0].context,
            &mut *self.arena,
            self.environment,
            &mut scratch,
        )?;

        let node = self.alloc(NodeKind::Paragraph, context, arguments);
        self.arena.attach_all(node, CONTENT, &content);
        self.finish(node, label, control, scratch, true)?;
        Ok(())
    }
}

/// Split a trailing `:marker:` or `:@style:` callout off a source line.
fn split_callout(number: usize, line: &str, delimiter: &str, prefix: &str) -> SourceLine {
    let plain = SourceLine {
        number,
        text: line.to_string(),
        marker: None,
        highlight: None,
    };
    if delimiter.is_empty() {
        return plain;
    }
    let Some((head, fragment)) = line
        .strip_suffix(delimiter)
        .and_then(|stripped| stripped.rsplit_once(delimiter))
    else {
        return plain;
    };
    if fragment.is_empty() || fragment.contains(char::is_whitespace) {
        return plain;
    }

    let (marker, highlight) = match fragment.strip_prefix(prefix) {
        Some(style) if !prefix.is_empty() => {
            let style = if style.is_empty() { "default" } else { style };
            (None, Some(style.to_string()))
        }
        _ => (Some(fragment.to_string()), None),
    };
    SourceLine {
        number,
        text: head.trim_end().to_string(),
        marker,
        highlight,
    }
}

impl Grammar for DocumentParser<'_> {
    type Rule = DocumentRule;

    const RULES: &'static [DocumentRule] = &[
        DocumentRule::BlankLine,
        DocumentRule::HorizontalRule,
        DocumentRule::Variable,
        DocumentRule::Command,
        DocumentRule::Label,
        DocumentRule::Control,
        DocumentRule::Arguments,
        DocumentRule::Header,
        DocumentRule::Block,
        DocumentRule::Include,
        DocumentRule::List,
        DocumentRule::Paragraph,
    ];

    fn name(&self) -> &'static str {
        "document"
    }

    fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }

    fn apply(&mut self, rule: DocumentRule) -> ParseResult<()> {
        match rule {
            DocumentRule::BlankLine => {
                self.cursor.get(Matcher::kind(TokenType::Eol))?;
                Ok(())
            }
            DocumentRule::HorizontalRule => {
                let token = self.cursor.get(Matcher::kind(TokenType::HorizontalRule))?;
                let Pending {
                    arguments,
                    label,
                    control,
                } = self.buffers.drain();
                let node = self.alloc(NodeKind::HorizontalRule, token.context, arguments);
                self.finish(node, label, control, Managers::new(), true)?;
                Ok(())
            }
            DocumentRule::Variable => self.parse_variable(),
            DocumentRule::Command => self.parse_command(),
            DocumentRule::Label => self.parse_label(),
            DocumentRule::Control => self.parse_control(),
            DocumentRule::Arguments => self.parse_arguments_line(),
            DocumentRule::Header => self.parse_header(),
            DocumentRule::Block => self.parse_block(),
            DocumentRule::Include => self.parse_include(),
            DocumentRule::List => self.parse_list(),
            DocumentRule::Paragraph => self.parse_paragraph(),
        }
    }
}
