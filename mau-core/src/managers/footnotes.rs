use crate::error::{MauError, Result};
use crate::nodes::{FootnoteIds, NodeArena, NodeId, NodeKind};
use crate::slug::slugify;
use mau_types::Context;
use std::collections::HashMap;

/// Links `[footnote](name)` mentions to `engine=footnote` bodies.
#[derive(Debug, Clone, Default)]
pub struct FootnotesManager {
    declarations: Vec<(String, NodeId, Context)>,
    mentions: Vec<NodeId>,
    commands: Vec<NodeId>,
}

impl FootnotesManager {
    pub fn add_declaration(&mut self, name: &str, node: NodeId, context: &Context) -> Result<()> {
        if self.declarations.iter().any(|(n, _, _)| n == name) {
            return Err(MauError::parser(
                format!("Duplicate footnote name {:?}", name),
                context.clone(),
            ));
        }
        self.declarations.push((name.to_string(), node, context.clone()));
        Ok(())
    }

    pub fn add_mention(&mut self, node: NodeId) {
        self.mentions.push(node);
    }

    pub fn add_command(&mut self, node: NodeId) {
        self.commands.push(node);
    }

    pub fn mentions(&self) -> &[NodeId] {
        &self.mentions
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.mentions.is_empty() && self.commands.is_empty()
    }

    pub fn update(&mut self, other: FootnotesManager) -> Result<()> {
        for (name, node, context) in other.declarations {
            self.add_declaration(&name, node, &context)?;
        }
        self.mentions.extend(other.mentions);
        self.commands.extend(other.commands);
        Ok(())
    }

    /// Number declarations in order of first mention, then the ones never
    /// mentioned. Every mention must have a declaration.
    pub fn finalize(self, arena: &mut NodeArena) -> Result<()> {
        let declared: HashMap<&str, NodeId> = self
            .declarations
            .iter()
            .map(|(name, node, _)| (name.as_str(), *node))
            .collect();

        let mut order: Vec<&str> = Vec::new();
        for mention in &self.mentions {
            let NodeKind::FootnoteRef { name, .. } = arena.kind(*mention) else {
                continue;
            };
            if !declared.contains_key(name.as_str()) {
                return Err(MauError::parser(
                    format!("Footnote {:?} has not been defined", name),
                    arena.get(*mention).context().clone(),
                ));
            }
            if let Some((declared_name, _, _)) =
                self.declarations.iter().find(|(n, _, _)| n == name)
            {
                if !order.contains(&declared_name.as_str()) {
                    order.push(declared_name.as_str());
                }
            }
        }
        for (name, _, _) in &self.declarations {
            if !order.contains(&name.as_str()) {
                order.push(name.as_str());
            }
        }

        let ids: HashMap<&str, FootnoteIds> = order
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let ids = FootnoteIds {
                    public_id: Some((index + 1).to_string()),
                    private_id: Some(format!("footnote-{}", slugify(name))),
                };
                (*name, ids)
            })
            .collect();

        let mut entries = Vec::with_capacity(order.len());
        for name in &order {
            let node = declared[name];
            if let NodeKind::Footnote { ids: slot, .. } = &mut arena.get_mut(node).kind {
                *slot = ids[name].clone();
            }
            entries.push(node);
        }

        for mention in &self.mentions {
            if let NodeKind::FootnoteRef {
                name,
                ids: slot,
                declaration,
            } = &mut arena.get_mut(*mention).kind
            {
                *slot = ids[name.as_str()].clone();
                *declaration = declared.get(name.as_str()).copied();
            }
        }

        for command in &self.commands {
            if let NodeKind::FootnotesCommand { entries: slot } = &mut arena.get_mut(*command).kind {
                *slot = entries.clone();
            }
        }

        tracing::debug!(
            footnotes = entries.len(),
            mentions = self.mentions.len(),
            "footnotes linked"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(arena: &mut NodeArena, name: &str) -> NodeId {
        arena.alloc(
            NodeKind::Footnote {
                name: name.to_string(),
                ids: FootnoteIds::default(),
            },
            Context::default(),
        )
    }

    fn mention(arena: &mut NodeArena, name: &str) -> NodeId {
        arena.alloc(
            NodeKind::FootnoteRef {
                name: name.to_string(),
                ids: FootnoteIds::default(),
                declaration: None,
            },
            Context::default(),
        )
    }

    fn public_id(arena: &NodeArena, node: NodeId) -> Option<String> {
        match arena.kind(node) {
            NodeKind::Footnote { ids, .. } | NodeKind::FootnoteRef { ids, .. } => {
                ids.public_id.clone()
            }
            _ => None,
        }
    }

    #[test]
    fn test_numbered_in_mention_order() {
        let mut arena = NodeArena::new();
        let mut manager = FootnotesManager::default();
        let a = declaration(&mut arena, "A");
        let b = declaration(&mut arena, "B");
        let unused = declaration(&mut arena, "C");
        manager.add_declaration("A", a, &Context::default()).unwrap();
        manager.add_declaration("B", b, &Context::default()).unwrap();
        manager.add_declaration("C", unused, &Context::default()).unwrap();
        let mb = mention(&mut arena, "B");
        let ma = mention(&mut arena, "A");
        manager.add_mention(mb);
        manager.add_mention(ma);
        let command = arena.alloc(
            NodeKind::FootnotesCommand {
                entries: Vec::new(),
            },
            Context::default(),
        );
        manager.add_command(command);

        manager.finalize(&mut arena).unwrap();

        assert_eq!(public_id(&arena, b).as_deref(), Some("1"));
        assert_eq!(public_id(&arena, a).as_deref(), Some("2"));
        assert_eq!(public_id(&arena, unused).as_deref(), Some("3"));
        assert_eq!(public_id(&arena, mb).as_deref(), Some("1"));
        match arena.kind(ma) {
            NodeKind::FootnoteRef {
                ids, declaration, ..
            } => {
                assert_eq!(ids.private_id.as_deref(), Some("footnote-a"));
                assert_eq!(*declaration, Some(a));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            arena.kind(command),
            &NodeKind::FootnotesCommand {
                entries: vec![b, a, unused]
            }
        );
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut arena = NodeArena::new();
        let mut manager = FootnotesManager::default();
        let a = declaration(&mut arena, "A");
        manager.add_declaration("A", a, &Context::default()).unwrap();
        assert!(manager.add_declaration("A", a, &Context::default()).is_err());

        let mut other = FootnotesManager::default();
        other.add_declaration("A", a, &Context::default()).unwrap();
        assert!(manager.update(other).is_err());
    }

    #[test]
    fn test_orphan_mention() {
        let mut arena = NodeArena::new();
        let mut manager = FootnotesManager::default();
        let m = mention(&mut arena, "missing");
        manager.add_mention(m);
        let err = manager.finalize(&mut arena).unwrap_err();
        assert!(err.message().contains("missing"));
    }
}
