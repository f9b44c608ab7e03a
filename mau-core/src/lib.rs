//! # Mau
//!
//! Parsing pipeline for the Mau markup language:
//! - A shared lexer engine with five grammars (document, inline text,
//!   arguments, conditions, variables)
//! - A backtracking parser engine reused by one parser per grammar
//! - A typed node tree stored in an arena
//! - Deferred resolution of footnotes, header links, the table of
//!   contents and block groups
//!
//! ## Example
//!
//! ```
//! use mau_core::{Environment, Mau, NodeKind};
//!
//! let document = Mau::new(Environment::new())
//!     .parse("= Title\n\nSome *text*.", Some("intro.mau"))
//!     .unwrap();
//! let first = document.content()[0];
//! assert!(matches!(document.arena.kind(first), NodeKind::Header(_)));
//! ```

pub mod arguments;
pub mod config;
pub mod document;
pub mod environment;
pub mod error;
pub mod lexers;
pub mod loader;
pub mod managers;
pub mod nodes;
pub mod parsers;
pub mod slug;
pub mod token;

#[cfg(test)]
mod tests;

pub use arguments::Arguments;
pub use config::ParserConfig;
pub use document::{Document, Mau, OutlineEntry};
pub use environment::{Environment, EnvironmentError, Value};
pub use error::{ErrorReport, MauError, Result};
pub use loader::{FsLoader, MemoryLoader, SourceLoader};
pub use managers::{Managers, TocTrees};
pub use nodes::{Node, NodeArena, NodeId, NodeInfo, NodeKind, Style, CONTENT};
pub use token::{Token, TokenType};

pub use mau_types::{Context, Position};
