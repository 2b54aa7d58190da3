//! Error taxonomy.
//!
//! Malformed stylesheet text never aborts a parse. Errors are collected on
//! the [`Stylesheet`](crate::Stylesheet) (lex, syntax and import errors) or
//! returned next to a best-effort value (value errors).

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Where in which file an error was found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// File name, `None` for inline sources.
    pub filename: Option<Arc<str>>,
    /// Character offset into the source.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl SourceLocation {
    /// Locate character `offset` within `source`.
    #[must_use]
    pub fn new(filename: Option<Arc<str>>, source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for c in source.chars().take(offset) {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self {
            filename,
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filename = self.filename.as_deref().unwrap_or("<inline>");
        write!(f, "{filename}:{}:{}", self.line, self.column)
    }
}

/// A declaration's lexemes did not match the requested value grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValueError {
    /// What was wrong.
    pub message: String,
    /// Character offset of the offending lexeme in the stylesheet source.
    pub offset: usize,
}

impl ValueError {
    /// A value error at `offset`.
    #[must_use]
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Everything that can go wrong while turning stylesheet text into styles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Unrecognized characters.
    #[error("{location}: unrecognized input '{text}'")]
    Lex {
        /// The offending text.
        text: String,
        /// Where it was found.
        location: SourceLocation,
    },

    /// A selector, at-rule or declaration is structurally invalid.
    #[error("{location}: {message}")]
    Syntax {
        /// What was expected.
        message: String,
        /// Where parsing failed.
        location: SourceLocation,
    },

    /// A declaration value does not match its property's grammar.
    #[error("{location}: invalid value for '{property}': {source}")]
    Value {
        /// Property name.
        property: String,
        /// The grammar failure.
        source: ValueError,
        /// Where the value starts.
        location: SourceLocation,
    },

    /// A stylesheet source could not be read.
    #[error("{location}: cannot import '{path}': {reason}")]
    Import {
        /// The requested path.
        path: String,
        /// Why it could not be read.
        reason: String,
        /// The `@import` rule, or a default location for a root file.
        location: SourceLocation,
    },
}

impl StyleError {
    /// Where the error was found.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::Lex { location, .. }
            | Self::Syntax { location, .. }
            | Self::Value { location, .. }
            | Self::Import { location, .. } => location,
        }
    }

    /// Short kind name, e.g. for report headings.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Lex { .. } => "lex error",
            Self::Syntax { .. } => "syntax error",
            Self::Value { .. } => "value error",
            Self::Import { .. } => "import error",
        }
    }

    /// Whether this is a [`StyleError::Syntax`].
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_line_and_column() {
        let location = SourceLocation::new(Some("app.css".into()), "a{}\nb {\n  c", 10);
        assert_eq!(location.line, 3);
        assert_eq!(location.column, 3);
        assert_eq!(location.to_string(), "app.css:3:3");
    }

    #[test]
    fn test_inline_location_display() {
        let location = SourceLocation::new(None, "x", 0);
        assert_eq!(location.to_string(), "<inline>:1:1");
    }
}
