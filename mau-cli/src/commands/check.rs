use super::parse_file;
use anyhow::Result;
use mau_core::Environment;
use std::path::Path;

pub fn check_file(path: &Path, environment: Environment) -> Result<()> {
    let document = parse_file(path, environment)?;

    let reachable = document.arena.descendants(document.root);
    let count = |name: &str| {
        reachable
            .iter()
            .filter(|id| document.arena.kind(**id).name() == name)
            .count()
    };

    println!(
        "{}: ok ({} nodes, {} headers, {} footnote references, {} includes)",
        path.display(),
        reachable.len(),
        count("header"),
        count("macro.footnote"),
        count("include_mau")
    );
    Ok(())
}
