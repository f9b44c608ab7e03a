mod manager_tests;
mod parser_tests;

use crate::*;

/// Parse with an in-memory loader.
pub(crate) fn parse_with(text: &str, loader: MemoryLoader) -> Result<Document> {
    Mau::new(Environment::new())
        .with_loader(loader)
        .parse(text, Some("main.mau"))
}

pub(crate) fn parse(text: &str) -> Result<Document> {
    parse_with(text, MemoryLoader::new())
}

/// Every node reachable from the root through content collections, in
/// document order.
pub(crate) fn reachable(document: &Document) -> Vec<NodeId> {
    document.arena.descendants(document.root)
}

pub(crate) fn find(document: &Document, kind: &str) -> Vec<NodeId> {
    reachable(document)
        .into_iter()
        .filter(|id| document.arena.kind(*id).name() == kind)
        .collect()
}

pub(crate) fn top_kinds(document: &Document) -> Vec<&'static str> {
    document
        .content()
        .iter()
        .map(|id| document.arena.kind(*id).name())
        .collect()
}
