//! Parser settings read from the `mau.parser` namespace of the environment.

use crate::environment::Environment;

const DEFAULT_MARKER_DELIMITER: &str = ":";
const DEFAULT_HIGHLIGHT_PREFIX: &str = "@";
const DEFAULT_BLOCK_ENGINE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Delimiter closing a callout at the end of a `source` line.
    pub source_marker_delimiter: String,
    /// Prefix turning a callout into a highlight directive.
    pub source_highlight_prefix: String,
    /// Engine used by blocks without an `engine` argument.
    pub default_block_engine: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            source_marker_delimiter: DEFAULT_MARKER_DELIMITER.to_string(),
            source_highlight_prefix: DEFAULT_HIGHLIGHT_PREFIX.to_string(),
            default_block_engine: DEFAULT_BLOCK_ENGINE.to_string(),
        }
    }
}

impl ParserConfig {
    pub fn from_environment(env: &Environment) -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: String| {
            env.get_text(&format!("mau.parser.{}", key))
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        Self {
            source_marker_delimiter: read(
                "source_marker_delimiter",
                defaults.source_marker_delimiter,
            ),
            source_highlight_prefix: read(
                "source_highlight_prefix",
                defaults.source_highlight_prefix,
            ),
            default_block_engine: read("default_block_engine", defaults.default_block_engine),
        }
    }
}
