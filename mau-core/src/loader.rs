//! Loading of named resources for `<< mau:` includes.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Reads a named resource as UTF-8 text.
pub trait SourceLoader {
    fn load(&self, name: &str) -> io::Result<String>;
}

/// Loads resources from the filesystem, relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceLoader for FsLoader {
    fn load(&self, name: &str) -> io::Result<String> {
        let path = self.root.join(name);
        tracing::debug!("Loading include {:?}", path);
        std::fs::read_to_string(path)
    }
}

/// In-memory resources, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(name.into(), text.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, name: &str) -> io::Result<String> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", name)))
    }
}
