//! Entry point: parse a whole source into a [`Document`].

use crate::environment::Environment;
use crate::error::Result;
use crate::lexers::document::DOCUMENT;
use crate::loader::{FsLoader, SourceLoader};
use crate::nodes::{NodeArena, NodeId, NodeKind, CONTENT};
use crate::parsers::DocumentParser;
use mau_types::{Context, Position};
use serde::Serialize;

/// A parsed and fully linked document.
#[derive(Debug, Clone)]
pub struct Document {
    pub arena: NodeArena,
    pub root: NodeId,
    pub toc_flat: NodeId,
    pub toc_nested: NodeId,
    /// The environment after every variable definition has run.
    pub environment: Environment,
}

/// One line of [`Document::outline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub depth: usize,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub context: Context,
}

impl Document {
    pub fn content(&self) -> &[NodeId] {
        self.arena.content(self.root)
    }

    /// Depth-first listing of the tree below the root, labels included.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        for node in self.content() {
            self.walk(*node, 0, &mut entries);
        }
        entries
    }

    fn walk(&self, id: NodeId, depth: usize, entries: &mut Vec<OutlineEntry>) {
        let node = self.arena.get(id);
        entries.push(OutlineEntry {
            depth,
            kind: node.kind.name(),
            detail: detail(&node.kind),
            context: node.context().clone(),
        });
        for children in node.labels.values() {
            for child in children {
                self.walk(*child, depth + 1, entries);
            }
        }
        for child in node.content() {
            self.walk(*child, depth + 1, entries);
        }
    }
}

fn detail(kind: &NodeKind) -> Option<String> {
    match kind {
        NodeKind::Header(data) => Some(format!(
            "{} {}",
            data.level,
            data.internal_id.as_deref().unwrap_or_default()
        )),
        NodeKind::Block(data) => Some(data.engine.clone()),
        NodeKind::Text { value }
        | NodeKind::Verbatim { value }
        | NodeKind::RawLine { value }
        | NodeKind::Unicode { value }
        | NodeKind::Raw { value } => Some(format!("{:?}", value)),
        NodeKind::SourceLine(line) => Some(format!("{:?}", line.text)),
        NodeKind::List { ordered, start, .. } => Some(if *ordered {
            format!("ordered from {}", start)
        } else {
            "unordered".to_string()
        }),
        NodeKind::Command { name } | NodeKind::Macro { name } => Some(name.clone()),
        NodeKind::Link { target } => Some(target.clone()),
        NodeKind::HeaderLink { target_id, .. } => target_id.clone(),
        NodeKind::FootnoteRef { ids, .. } => ids.public_id.clone(),
        NodeKind::Include { include_type, .. } => Some(include_type.clone()),
        NodeKind::IncludeMau { uri } => Some(uri.clone()),
        NodeKind::IncludeImage(image) | NodeKind::Image(image) => Some(image.uri.clone()),
        _ => None,
    }
}

/// Parser front end holding the initial environment and the loader used
/// for `<< mau:` includes.
pub struct Mau {
    environment: Environment,
    loader: Box<dyn SourceLoader>,
}

impl Mau {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            loader: Box::new(FsLoader::new(".")),
        }
    }

    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Lex, parse and link `text`. `source` names the text in diagnostics
    /// and starts the include chain.
    pub fn parse(&self, text: &str, source: Option<&str>) -> Result<Document> {
        let source = source.map(str::to_string);
        tracing::debug!(source = ?source, bytes = text.len(), "parsing document");

        let mut arena = NodeArena::new();
        let mut environment = self.environment.clone();
        let tokens = DOCUMENT.tokenize(text, Position::default(), source.clone())?;
        let includes = source.iter().cloned().collect();

        let (nodes, managers) =
            DocumentParser::new(tokens, &mut arena, &mut environment, self.loader.as_ref())
                .with_includes(includes)
                .parse()?;
        let trees = managers.finalize(&mut arena)?;

        let root = arena.alloc(NodeKind::Document, Context::at(Position::default(), source));
        arena.attach_all(root, CONTENT, &nodes);
        tracing::debug!(nodes = arena.len(), "document ready");

        Ok(Document {
            arena,
            root,
            toc_flat: trees.flat,
            toc_nested: trees.nested,
            environment,
        })
    }
}

impl Default for Mau {
    fn default() -> Self {
        Self::new(Environment::new())
    }
}
