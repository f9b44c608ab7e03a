//! Token stream dump for the document grammar.

use super::read_source;
use anyhow::{anyhow, Result};
use mau_core::lexers::document::DOCUMENT;
use mau_core::ErrorReport;
use mau_types::{Context, Position};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct TokenRow<'a> {
    kind: &'static str,
    value: &'a str,
    context: &'a Context,
}

pub fn show_tokens(path: &Path, json: bool) -> Result<()> {
    let source = read_source(path)?;
    let tokens = DOCUMENT
        .tokenize(&source.text, Position::default(), Some(source.name.clone()))
        .map_err(|error| {
            anyhow!(
                "{}",
                ErrorReport::new(&source.text, &error).to_string().trim_end()
            )
        })?;

    if json {
        let rows: Vec<TokenRow<'_>> = tokens
            .iter()
            .map(|token| TokenRow {
                kind: token.kind.as_str(),
                value: &token.value,
                context: &token.context,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for token in &tokens {
        println!("{}\t{}\t{:?}", token.context.start, token.kind, token.value);
    }
    Ok(())
}
