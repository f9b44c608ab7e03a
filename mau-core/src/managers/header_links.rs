use crate::error::{MauError, Result};
use crate::nodes::{NodeArena, NodeId, NodeKind};
use mau_types::Context;
use std::collections::BTreeMap;

/// Links `[header](alias)` macros to headers declared with `alias=`.
#[derive(Debug, Clone, Default)]
pub struct HeaderLinksManager {
    headers: BTreeMap<String, (NodeId, Context)>,
    links: Vec<NodeId>,
}

impl HeaderLinksManager {
    pub fn add_header(&mut self, alias: &str, node: NodeId, context: &Context) -> Result<()> {
        if self.headers.contains_key(alias) {
            return Err(MauError::parser(
                format!("Duplicate header alias {:?}", alias),
                context.clone(),
            ));
        }
        self.headers
            .insert(alias.to_string(), (node, context.clone()));
        Ok(())
    }

    pub fn add_link(&mut self, node: NodeId) {
        self.links.push(node);
    }

    pub fn update(&mut self, other: HeaderLinksManager) -> Result<()> {
        for (alias, (node, context)) in other.headers {
            self.add_header(&alias, node, &context)?;
        }
        self.links.extend(other.links);
        Ok(())
    }

    /// Copy the header id onto every link. Runs after header ids exist.
    pub fn finalize(self, arena: &mut NodeArena) -> Result<()> {
        for link in &self.links {
            let NodeKind::HeaderLink { alias, .. } = arena.kind(*link) else {
                continue;
            };
            let Some((header, _)) = self.headers.get(alias) else {
                return Err(MauError::parser(
                    format!("Cannot find header with alias {:?}", alias),
                    arena.get(*link).context().clone(),
                ));
            };
            let internal_id = match arena.kind(*header) {
                NodeKind::Header(data) => data.internal_id.clone(),
                _ => None,
            };
            if let NodeKind::HeaderLink { target_id, .. } = &mut arena.get_mut(*link).kind {
                *target_id = internal_id;
            }
        }
        Ok(())
    }
}
