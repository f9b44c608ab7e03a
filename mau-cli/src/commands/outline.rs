//! Node tree dump.

use super::parse_file;
use anyhow::Result;
use mau_core::{Environment, OutlineEntry};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct OutlineResponse {
    nodes: Vec<OutlineEntry>,
    toc_entries: usize,
}

pub fn show_outline(path: &Path, environment: Environment, json: bool) -> Result<()> {
    let document = parse_file(path, environment)?;
    let nodes = document.outline();

    if json {
        let payload = OutlineResponse {
            toc_entries: document.arena.content(document.toc_flat).len(),
            nodes,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for entry in &nodes {
        let position = entry.context.start.to_string();
        match &entry.detail {
            Some(detail) => println!(
                "{:<8}{}{} {}",
                position,
                "  ".repeat(entry.depth),
                entry.kind,
                detail
            ),
            None => println!("{:<8}{}{}", position, "  ".repeat(entry.depth), entry.kind),
        }
    }
    Ok(())
}
