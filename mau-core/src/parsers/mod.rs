//! Parsers built on the shared backtracking engine.
//!
//! Each parser consumes the tokens of its own grammar and calls the others
//! on re-lexed sub-regions: block bodies and includes go back to the
//! document parser, headers and paragraphs to the text parser, macro and
//! boxed arguments to the arguments parser.

pub mod arguments;
pub mod base;
pub mod buffers;
pub mod condition;
pub mod document;
pub mod text;
pub mod variables;

pub use arguments::{parse_arguments, ArgumentsParser};
pub use base::{Grammar, ParseFailure, ParseResult, TokenCursor};
pub use buffers::{Buffer, Buffers, Control, Label};
pub use condition::{parse_condition, Comparison, Condition};
pub use document::DocumentParser;
pub use text::{parse_inline, TextParser};
pub use variables::interpolate;
