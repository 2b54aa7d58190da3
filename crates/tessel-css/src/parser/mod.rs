//! Stylesheet parser module.
//!
//! Builds [`Stylesheet`](crate::Stylesheet)s from lexemes. Declarations keep
//! their raw lexemes; value grammars are applied later, on demand.

/// Sources for `@import`.
pub mod loader;
/// The `an+b` micro-grammar of nth pseudo-classes.
pub mod nth;
/// The recursive-descent parser.
pub mod stylesheet_parser;

pub use loader::{FsLoader, MemoryLoader, SourceLoader};
pub use nth::parse_an_plus_b;
pub use stylesheet_parser::{MAX_IMPORT_DEPTH, StylesheetParser, parse_selector};
