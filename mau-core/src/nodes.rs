//! Node tree stored in an arena.
//!
//! Ownership flows strictly from parent to child through named child
//! collections. `parent` is a lookup convenience set once, when a node is
//! attached. Cross references created by the resolution managers
//! (footnote bodies, ToC entries, block groups) are plain [`NodeId`]s and
//! never take part in ownership.

use crate::arguments::Arguments;
use crate::slug::unique_slug;
use mau_types::Context;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Main child collection of every container node.
pub const CONTENT: &str = "content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata shared by every node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeInfo {
    pub context: Context,
    pub arguments: Arguments,
}

impl NodeInfo {
    pub fn unnamed_args(&self) -> &[String] {
        &self.arguments.unnamed
    }

    pub fn named_args(&self) -> &BTreeMap<String, String> {
        &self.arguments.named
    }

    pub fn tags(&self) -> &[String] {
        &self.arguments.tags
    }

    pub fn subtype(&self) -> Option<&str> {
        self.arguments.subtype.as_deref()
    }
}

/// Inline style markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Underscore,
    Star,
    Caret,
    Tilde,
}

impl Style {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "_" => Some(Style::Underscore),
            "*" => Some(Style::Star),
            "^" => Some(Style::Caret),
            "~" => Some(Style::Tilde),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Underscore => "underscore",
            Style::Star => "star",
            Style::Caret => "caret",
            Style::Tilde => "tilde",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderData {
    pub level: usize,
    /// Header text after variable interpolation, before inline parsing.
    pub text: String,
    pub alias: Option<String>,
    /// Unique anchor, assigned when the document is finalized.
    pub internal_id: Option<String>,
    pub in_toc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockData {
    pub engine: String,
    pub classes: Vec<String>,
    /// Only set by the `source` engine.
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number inside the block.
    pub number: usize,
    pub text: String,
    pub marker: Option<String>,
    pub highlight: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageData {
    pub uri: String,
    pub alt_text: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteIds {
    pub public_id: Option<String>,
    pub private_id: Option<String>,
}

/// Type-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,

    // Block level
    HorizontalRule,
    Paragraph,
    Header(HeaderData),
    Block(BlockData),
    RawLine {
        value: String,
    },
    SourceLine(SourceLine),
    List {
        ordered: bool,
        /// Top-level list, as opposed to a nested one.
        main: bool,
        start: usize,
    },
    ListItem {
        level: usize,
    },
    Command {
        name: String,
    },
    TocCommand {
        flat: Option<NodeId>,
        nested: Option<NodeId>,
    },
    FootnotesCommand {
        entries: Vec<NodeId>,
    },
    BlockGroupCommand {
        group: String,
        blocks: BTreeMap<String, NodeId>,
    },
    Include {
        include_type: String,
        uris: Vec<String>,
    },
    IncludeImage(ImageData),
    IncludeMau {
        uri: String,
    },
    Footnote {
        name: String,
        ids: FootnoteIds,
    },
    Toc,
    TocEntry {
        header: NodeId,
    },

    // Inline
    Text {
        value: String,
    },
    Verbatim {
        value: String,
    },
    Style(Style),
    Link {
        target: String,
    },
    HeaderLink {
        alias: String,
        target_id: Option<String>,
    },
    Image(ImageData),
    FootnoteRef {
        name: String,
        ids: FootnoteIds,
        declaration: Option<NodeId>,
    },
    Class {
        classes: Vec<String>,
    },
    Unicode {
        value: String,
    },
    Raw {
        value: String,
    },
    Macro {
        name: String,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::HorizontalRule => "horizontal_rule",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Header(_) => "header",
            NodeKind::Block(_) => "block",
            NodeKind::RawLine { .. } => "raw",
            NodeKind::SourceLine(_) => "source_line",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem { .. } => "list_item",
            NodeKind::Command { .. } => "command",
            NodeKind::TocCommand { .. } => "toc_command",
            NodeKind::FootnotesCommand { .. } => "footnotes_command",
            NodeKind::BlockGroupCommand { .. } => "blockgroup_command",
            NodeKind::Include { .. } => "include",
            NodeKind::IncludeImage(_) => "include_image",
            NodeKind::IncludeMau { .. } => "include_mau",
            NodeKind::Footnote { .. } => "footnote",
            NodeKind::Toc => "toc",
            NodeKind::TocEntry { .. } => "toc_entry",
            NodeKind::Text { .. } => "text",
            NodeKind::Verbatim { .. } => "verbatim",
            NodeKind::Style(_) => "style",
            NodeKind::Link { .. } => "macro.link",
            NodeKind::HeaderLink { .. } => "macro.header",
            NodeKind::Image(_) => "macro.image",
            NodeKind::FootnoteRef { .. } => "macro.footnote",
            NodeKind::Class { .. } => "macro.class",
            NodeKind::Unicode { .. } => "macro.unicode",
            NodeKind::Raw { .. } => "macro.raw",
            NodeKind::Macro { .. } => "macro",
        }
    }
}

/// A node: payload, metadata and owned child collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub info: NodeInfo,
    pub children: BTreeMap<&'static str, Vec<NodeId>>,
    /// Label children keyed by role (`title` by default).
    pub labels: BTreeMap<String, Vec<NodeId>>,
}

impl Node {
    fn new(kind: NodeKind, context: Context) -> Self {
        Self {
            kind,
            parent: None,
            info: NodeInfo {
                context,
                arguments: Arguments::default(),
            },
            children: BTreeMap::new(),
            labels: BTreeMap::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.info.context
    }

    pub fn content(&self) -> &[NodeId] {
        self.collection(CONTENT)
    }

    pub fn collection(&self, name: &str) -> &[NodeId] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn label(&self, role: &str) -> &[NodeId] {
        self.labels.get(role).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Storage for every node produced by one top-level parse, sub-parses
/// included.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    /// Header anchors handed out so far, across every sub-parse.
    anchors: HashSet<String>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: NodeKind, context: Context) -> NodeId {
        self.nodes.push(Node::new(kind, context));
        NodeId(self.nodes.len() - 1)
    }

    /// Mark `id` as used so generated anchors avoid it.
    pub fn reserve_anchor(&mut self, id: &str) {
        self.anchors.insert(id.to_string());
    }

    /// A new anchor derived from `text`, unique within the whole document.
    pub fn unique_anchor(&mut self, text: &str, fallback: &str) -> String {
        unique_slug(text, fallback, &mut self.anchors)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Append `child` to the `collection` of `parent` and record the back
    /// reference. A node is attached at most once.
    pub fn attach(&mut self, parent: NodeId, collection: &'static str, child: NodeId) {
        let node = self.get_mut(child);
        debug_assert!(node.parent.is_none(), "node {} attached twice", child);
        node.parent = Some(parent);
        self.get_mut(parent)
            .children
            .entry(collection)
            .or_default()
            .push(child);
    }

    pub fn attach_all(&mut self, parent: NodeId, collection: &'static str, children: &[NodeId]) {
        for child in children {
            self.attach(parent, collection, *child);
        }
    }

    pub fn attach_label(&mut self, parent: NodeId, role: &str, children: &[NodeId]) {
        for child in children {
            let node = self.get_mut(*child);
            debug_assert!(node.parent.is_none(), "node {} attached twice", child);
            node.parent = Some(parent);
        }
        self.get_mut(parent)
            .labels
            .entry(role.to_string())
            .or_default()
            .extend_from_slice(children);
    }

    pub fn content(&self, id: NodeId) -> &[NodeId] {
        self.get(id).content()
    }

    /// Concatenated text of a node and everything below its content.
    pub fn plain_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.get(id).kind {
            NodeKind::Text { value }
            | NodeKind::Verbatim { value }
            | NodeKind::Unicode { value }
            | NodeKind::Raw { value } => out.push_str(value),
            _ => {
                for child in self.content(id) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Depth-first walk below `id` (excluding `id`) over `content`
    /// collections.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.content(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.content(next).iter().rev().copied());
        }
        out
    }
}
