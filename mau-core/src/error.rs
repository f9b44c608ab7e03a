use std::fmt;

pub use mau_types::{Context, Position};

/// Errors that abort a parse unit.
///
/// Both categories are fatal: a failing sub-parse (block body, include)
/// aborts the outer parse as well.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MauError {
    #[error("Lexer error at {context}: {message}")]
    Lexer { message: String, context: Context },

    #[error("Parser error at {context}: {message}")]
    Parser { message: String, context: Context },
}

impl MauError {
    pub fn lexer(message: impl Into<String>, context: Context) -> Self {
        MauError::Lexer {
            message: message.into(),
            context,
        }
    }

    pub fn parser(message: impl Into<String>, context: Context) -> Self {
        MauError::Parser {
            message: message.into(),
            context,
        }
    }

    pub fn context(&self) -> &Context {
        match self {
            MauError::Lexer { context, .. } => context,
            MauError::Parser { context, .. } => context,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            MauError::Lexer { message, .. } => message,
            MauError::Parser { message, .. } => message,
        }
    }

    /// Short category name, `lexer` or `parser`.
    pub fn category(&self) -> &'static str {
        match self {
            MauError::Lexer { .. } => "lexer",
            MauError::Parser { .. } => "parser",
        }
    }

    pub fn is_lexer(&self) -> bool {
        matches!(self, MauError::Lexer { .. })
    }

    pub fn is_parser(&self) -> bool {
        matches!(self, MauError::Parser { .. })
    }
}

pub type Result<T> = std::result::Result<T, MauError>;

/// An error rendered against the text it points into.
pub struct ErrorReport<'a> {
    pub source: &'a str,
    pub error: &'a MauError,
}

impl<'a> ErrorReport<'a> {
    pub fn new(source: &'a str, error: &'a MauError) -> Self {
        Self { source, error }
    }

    /// The line the error starts on.
    pub fn source_line(&self) -> Option<&'a str> {
        self.source.lines().nth(self.error.context().start.line)
    }

    /// 1-based line and column of the error start.
    pub fn line_col(&self) -> (usize, usize) {
        let start = self.error.context().start;
        (start.line + 1, start.column + 1)
    }
}

impl<'a> fmt::Display for ErrorReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.line_col();
        match self.error.context().source_name() {
            Some(name) => writeln!(f, "Error in {} at line {}, column {}:", name, line, col)?,
            None => writeln!(f, "Error at line {}, column {}:", line, col)?,
        }
        writeln!(f, "  {}", self.error.message())?;

        if let Some(source_line) = self.source_line() {
            let ctx = self.error.context();
            let col_start = (col - 1).min(source_line.len());
            let width = if ctx.end.line == ctx.start.line {
                ctx.end.column.saturating_sub(ctx.start.column)
            } else {
                source_line.len().saturating_sub(col_start)
            };
            writeln!(f)?;
            writeln!(f, "  {}", source_line)?;
            writeln!(f, "  {}{}", " ".repeat(col_start), "^".repeat(width.max(1)))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_points_at_span() {
        let source = "first line\n:name value\n";
        let error = MauError::parser(
            "Broken variable",
            Context::new(Position::new(1, 0), Position::new(1, 5), None),
        );
        let report = ErrorReport::new(source, &error).to_string();

        assert!(report.contains("line 2, column 1"));
        assert!(report.contains(":name value"));
        assert!(report.contains("^^^^^"));
    }

    #[test]
    fn test_category() {
        let ctx = Context::default();
        assert_eq!(MauError::lexer("x", ctx.clone()).category(), "lexer");
        assert!(MauError::parser("x", ctx).is_parser());
    }
}
