//! Shared types for mau
//!
//! This crate provides the source-location types used across the mau
//! ecosystem. Positions are stored 0-based and only adjusted to 1-based
//! line/column numbers when displayed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column pair, both 0-based.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A source span plus the optional name of the source it belongs to.
///
/// Contexts are immutable values: every operation returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Context {
    pub fn new(start: Position, end: Position, source: Option<String>) -> Self {
        Self { start, end, source }
    }

    /// A zero-width context at `position`.
    pub fn at(position: Position, source: Option<String>) -> Self {
        Self::new(position, position, source)
    }

    /// Union of two spans. The source name of `self` is kept.
    pub fn merge(&self, other: &Context) -> Context {
        Context {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            source: self.source.clone(),
        }
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}", source, self.start),
            None => write!(f, "{}", self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn context(a: (usize, usize), b: (usize, usize)) -> Context {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Context::new(
            Position::new(start.0, start.1),
            Position::new(end.0, end.1),
            Some("main.mau".to_string()),
        )
    }

    #[test]
    fn test_merge_spans() {
        let left = Context::new(Position::new(1, 4), Position::new(1, 9), Some("a".into()));
        let right = Context::new(Position::new(0, 2), Position::new(1, 6), Some("b".into()));
        let merged = left.merge(&right);

        assert_eq!(merged.start, Position::new(0, 2));
        assert_eq!(merged.end, Position::new(1, 9));
        assert_eq!(merged.source_name(), Some("a"));
    }

    #[test]
    fn test_display_is_one_based() {
        let ctx = Context::at(Position::new(0, 0), Some("doc.mau".into()));
        assert_eq!(ctx.to_string(), "doc.mau:1:1");
        assert_eq!(Context::at(Position::new(4, 2), None).to_string(), "5:3");
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(a in (0usize..50, 0usize..80), b in (0usize..50, 0usize..80)) {
            let ctx = context(a, b);
            prop_assert_eq!(ctx.merge(&ctx), ctx);
        }

        #[test]
        fn merge_is_associative(
            a in ((0usize..50, 0usize..80), (0usize..50, 0usize..80)),
            b in ((0usize..50, 0usize..80), (0usize..50, 0usize..80)),
            c in ((0usize..50, 0usize..80), (0usize..50, 0usize..80)),
        ) {
            let (a, b, c) = (context(a.0, a.1), context(b.0, b.1), context(c.0, c.1));
            prop_assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        }
    }
}
