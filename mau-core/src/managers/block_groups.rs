use crate::error::{MauError, Result};
use crate::nodes::{NodeArena, NodeId, NodeKind};
use mau_types::Context;
use std::collections::BTreeMap;

/// Blocks registered with `engine=group`, keyed by group and position,
/// and the `::blockgroup` commands that display them.
#[derive(Debug, Clone, Default)]
pub struct BlockGroupsManager {
    groups: BTreeMap<String, BTreeMap<String, (NodeId, Context)>>,
    commands: Vec<NodeId>,
}

impl BlockGroupsManager {
    pub fn add_block(
        &mut self,
        group: &str,
        position: &str,
        node: NodeId,
        context: &Context,
    ) -> Result<()> {
        let slots = self.groups.entry(group.to_string()).or_default();
        if slots.contains_key(position) {
            return Err(MauError::parser(
                format!(
                    "Duplicate position {:?} in block group {:?}",
                    position, group
                ),
                context.clone(),
            ));
        }
        slots.insert(position.to_string(), (node, context.clone()));
        Ok(())
    }

    pub fn add_command(&mut self, node: NodeId) {
        self.commands.push(node);
    }

    pub fn update(&mut self, other: BlockGroupsManager) -> Result<()> {
        for (group, slots) in other.groups {
            for (position, (node, context)) in slots {
                self.add_block(&group, &position, node, &context)?;
            }
        }
        self.commands.extend(other.commands);
        Ok(())
    }

    pub fn finalize(self, arena: &mut NodeArena) -> Result<()> {
        for command in &self.commands {
            let NodeKind::BlockGroupCommand { group, .. } = arena.kind(*command) else {
                continue;
            };
            let Some(slots) = self.groups.get(group) else {
                return Err(MauError::parser(
                    format!("Block group {:?} has not been defined", group),
                    arena.get(*command).context().clone(),
                ));
            };
            let resolved: BTreeMap<String, NodeId> = slots
                .iter()
                .map(|(position, (node, _))| (position.clone(), *node))
                .collect();
            if let NodeKind::BlockGroupCommand { blocks, .. } = &mut arena.get_mut(*command).kind {
                *blocks = resolved;
            }
        }
        Ok(())
    }
}
