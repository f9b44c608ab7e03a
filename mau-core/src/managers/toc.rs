//! Table of contents.
//!
//! Headers are collected in document order. At finalize every header gets
//! a unique anchor and two trees of [`NodeKind::TocEntry`] nodes are built:
//! a flat one and one nested by level, where a header contains the
//! following strictly deeper headers up to the next one of equal or
//! shallower level.

use crate::error::Result;
use crate::nodes::{NodeArena, NodeId, NodeKind, CONTENT};
use mau_types::Context;

/// Roots of the two ToC trees produced by one finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocTrees {
    pub flat: NodeId,
    pub nested: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct TocManager {
    headers: Vec<NodeId>,
    commands: Vec<NodeId>,
}

impl TocManager {
    pub fn add_header(&mut self, node: NodeId) {
        self.headers.push(node);
    }

    pub fn add_command(&mut self, node: NodeId) {
        self.commands.push(node);
    }

    pub fn headers(&self) -> &[NodeId] {
        &self.headers
    }

    pub fn update(&mut self, other: TocManager) {
        self.headers.extend(other.headers);
        self.commands.extend(other.commands);
    }

    fn assign_ids(&self, arena: &mut NodeArena) {
        // Explicit ids are reserved first so generated ones avoid them.
        for header in &self.headers {
            if let Some(id) = arena.get(*header).info.arguments.get("id").map(str::to_string) {
                arena.reserve_anchor(&id);
            }
        }

        for header in &self.headers {
            let node = arena.get(*header);
            let explicit = node.info.arguments.get("id").map(str::to_string);
            let NodeKind::Header(data) = &node.kind else {
                continue;
            };
            let id = match explicit {
                Some(id) => id,
                None => {
                    let text = data.text.clone();
                    arena.unique_anchor(&text, "header")
                }
            };
            if let NodeKind::Header(data) = &mut arena.get_mut(*header).kind {
                data.internal_id = Some(id);
            }
        }
    }

    pub fn finalize(self, arena: &mut NodeArena) -> Result<TocTrees> {
        self.assign_ids(arena);

        let entries: Vec<(NodeId, usize)> = self
            .headers
            .iter()
            .filter_map(|header| match arena.kind(*header) {
                NodeKind::Header(data) if data.in_toc => Some((*header, data.level)),
                _ => None,
            })
            .collect();

        let flat = arena.alloc(NodeKind::Toc, Context::default());
        for (header, _) in &entries {
            let entry = new_entry(arena, *header);
            arena.attach(flat, CONTENT, entry);
        }

        let nested = arena.alloc(NodeKind::Toc, Context::default());
        let mut open: Vec<(NodeId, usize)> = Vec::new();
        for (header, level) in &entries {
            while open.last().is_some_and(|(_, open_level)| open_level >= level) {
                open.pop();
            }
            let entry = new_entry(arena, *header);
            let parent = open.last().map_or(nested, |(node, _)| *node);
            arena.attach(parent, CONTENT, entry);
            open.push((entry, *level));
        }

        for command in &self.commands {
            if let NodeKind::TocCommand {
                flat: flat_slot,
                nested: nested_slot,
            } = &mut arena.get_mut(*command).kind
            {
                *flat_slot = Some(flat);
                *nested_slot = Some(nested);
            }
        }

        tracing::debug!(entries = entries.len(), "table of contents built");
        Ok(TocTrees { flat, nested })
    }
}

fn new_entry(arena: &mut NodeArena, header: NodeId) -> NodeId {
    let context = arena.get(header).context().clone();
    arena.alloc(NodeKind::TocEntry { header }, context)
}
