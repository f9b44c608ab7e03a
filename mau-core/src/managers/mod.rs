//! Deferred cross-reference resolution.
//!
//! Every manager collects declarations and references while the document
//! is parsed and links them in a single `finalize` once the node tree is
//! complete. Duplicate declarations fail as soon as they are registered,
//! dangling references only at finalize.

pub mod block_groups;
pub mod footnotes;
pub mod header_links;
pub mod toc;

pub use block_groups::BlockGroupsManager;
pub use footnotes::FootnotesManager;
pub use header_links::HeaderLinksManager;
pub use toc::{TocManager, TocTrees};

use crate::error::Result;
use crate::nodes::NodeArena;

/// The state of all managers for one parse unit.
#[derive(Debug, Clone, Default)]
pub struct Managers {
    pub footnotes: FootnotesManager,
    pub header_links: HeaderLinksManager,
    pub toc: TocManager,
    pub block_groups: BlockGroupsManager,
}

impl Managers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import the state of a sub-parse. Conflicts are reported exactly as
    /// if the entries had been registered here directly.
    pub fn update(&mut self, other: Managers) -> Result<()> {
        self.footnotes.update(other.footnotes)?;
        self.header_links.update(other.header_links)?;
        self.toc.update(other.toc);
        self.block_groups.update(other.block_groups)?;
        Ok(())
    }

    /// Link everything. Header ids are assigned first since header links
    /// copy them.
    pub fn finalize(self, arena: &mut NodeArena) -> Result<TocTrees> {
        let trees = self.toc.finalize(arena)?;
        self.header_links.finalize(arena)?;
        self.footnotes.finalize(arena)?;
        self.block_groups.finalize(arena)?;
        Ok(trees)
    }
}
