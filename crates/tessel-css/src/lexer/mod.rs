//! Stylesheet lexer module.
//!
//! The lexer is context sensitive: the consumer tells it whether it is
//! outside a declaration block (selector context, nesting 0) or inside one
//! (declaration context, nesting > 0), and the same characters classify
//! differently in each. See [`StylesheetLexer`].

/// Lexemes, token kinds and lexeme flags.
pub mod lexeme;
/// Context-sensitive lexer with pushback and a source stack.
pub mod stylesheet_lexer;

pub use lexeme::{Lexeme, LexemeFlags, Literal, SourceRange, TokenKind};
pub use stylesheet_lexer::StylesheetLexer;

/// Lex `source` completely at a fixed nesting level.
///
/// Convenient for tests and for value strings, which are lexed in
/// declaration context (`nesting = 1`).
#[must_use]
pub fn lex_all(source: &str, nesting: usize) -> Vec<Lexeme> {
    let mut lexer = StylesheetLexer::with_nesting(source, nesting);
    std::iter::from_fn(|| lexer.next_lexeme()).collect()
}
