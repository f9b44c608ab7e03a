//! CLI command implementations.

pub mod check;
pub mod outline;
pub mod tokens;

pub use check::check_file;
pub use outline::show_outline;
pub use tokens::show_tokens;

use anyhow::{anyhow, bail, Context, Result};
use mau_core::{Document, Environment, ErrorReport, FsLoader, Mau, MauError};
use std::fs;
use std::path::Path;

/// Initial environment: the YAML config, then every `KEY=VALUE` override.
pub fn load_environment(config: Option<&Path>, vars: &[String]) -> Result<Environment> {
    let mut environment = match config {
        Some(path) => Environment::from_yaml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Environment::new(),
    };

    for var in vars {
        let Some((key, value)) = var.split_once('=') else {
            bail!("Invalid --var {:?}, expected KEY=VALUE", var);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid --var {:?}, empty key", var);
        }
        environment.set(key, value);
    }

    Ok(environment)
}

pub(crate) struct SourceFile {
    pub name: String,
    pub text: String,
}

pub(crate) fn read_source(path: &Path) -> Result<SourceFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceFile { name, text })
}

/// Parse `path`, resolving includes relative to its directory.
pub(crate) fn parse_file(path: &Path, environment: Environment) -> Result<Document> {
    let source = read_source(path)?;
    let root = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    tracing::debug!("Parsing {:?}", path);
    Mau::new(environment)
        .with_loader(FsLoader::new(root))
        .parse(&source.text, Some(&source.name))
        .map_err(|error| diagnostic(&source, root, &error))
}

/// Render a parse failure against the text it points into, which is an
/// included file when the error happened there.
fn diagnostic(main: &SourceFile, root: &Path, error: &MauError) -> anyhow::Error {
    let text = match error.context().source_name() {
        Some(name) if name != main.name => fs::read_to_string(root.join(name)).ok(),
        _ => Some(main.text.clone()),
    };
    match text {
        Some(text) => anyhow!("{}", ErrorReport::new(&text, error).to_string().trim_end()),
        None => anyhow!("{}", error),
    }
}
