//! A cursor over a declaration's value lexemes.

use crate::error::ValueError;
use crate::lexer::{Lexeme, TokenKind};

/// Reads value lexemes one at a time and collects recoverable problems.
///
/// Value parsers receive the cursor; a parser that fails part-way may
/// [`rewind`](Self::rewind) to an earlier [`position`](Self::position).
#[derive(Debug, Clone)]
pub struct ValueLexer<'a> {
    lexemes: &'a [Lexeme],
    position: usize,
    errors: Vec<ValueError>,
}

impl<'a> ValueLexer<'a> {
    /// A cursor at the first lexeme.
    #[must_use]
    pub const fn new(lexemes: &'a [Lexeme]) -> Self {
        Self {
            lexemes,
            position: 0,
            errors: Vec::new(),
        }
    }

    /// The lexeme under the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.position)
    }

    /// The lexeme `offset` places after the cursor.
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<&'a Lexeme> {
        self.lexemes.get(self.position + offset)
    }

    /// Kind of the lexeme under the cursor.
    #[must_use]
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|l| l.kind)
    }

    /// Consume and return the lexeme under the cursor.
    pub fn next_lexeme(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.lexemes.get(self.position)?;
        self.position += 1;
        Some(lexeme)
    }

    /// Whether the cursor is on a lexeme of `kind`.
    #[must_use]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Whether the cursor is on the identifier or keyword `name`.
    #[must_use]
    pub fn at_ident(&self, name: &str) -> bool {
        self.peek().is_some_and(|l| l.is_ident(name))
    }

    /// Whether the cursor is on `name(`.
    #[must_use]
    pub fn at_function(&self, name: &str) -> bool {
        self.at_ident(name) && self.peek_at(1).is_some_and(|l| l.is(TokenKind::LeftParen))
    }

    /// Consume a lexeme of `kind` if present.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consume the identifier `name` if present.
    pub fn eat_ident(&mut self, name: &str) -> bool {
        if self.at_ident(name) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consume a lexeme of `kind`, or record that `expected` was missing.
    pub fn expect(&mut self, kind: TokenKind, expected: &str) -> Option<&'a Lexeme> {
        if self.at(kind) {
            self.next_lexeme()
        } else {
            self.error(format!("expected {expected}"));
            None
        }
    }

    /// Consume an identifier or keyword and return its text.
    pub fn ident(&mut self) -> Option<&'a str> {
        let text = self.peek()?.ident()?;
        self.position += 1;
        Some(text)
    }

    /// Consume a unitless number.
    pub fn number(&mut self) -> Option<f64> {
        if self.at(TokenKind::Number) {
            self.next_lexeme().and_then(Lexeme::number)
        } else {
            None
        }
    }

    /// Whether every lexeme has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.lexemes.len()
    }

    /// Index of the next lexeme.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Move back to a position returned by [`position`](Self::position).
    pub fn rewind(&mut self, position: usize) {
        self.position = position.min(self.lexemes.len());
    }

    /// Record a problem at the cursor.
    pub fn error(&mut self, message: impl Into<String>) {
        let offset = self
            .peek()
            .or_else(|| self.lexemes.last())
            .map_or(0, |l| l.range.start);
        self.errors.push(ValueError::new(message, offset));
    }

    /// Problems recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ValueError] {
        &self.errors
    }

    /// Recorded problems, for parsers that run nested cursors.
    pub fn errors_mut(&mut self) -> &mut Vec<ValueError> {
        &mut self.errors
    }

    /// Take the recorded problems.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValueError> {
        self.errors
    }

    /// Split the remaining lexemes at top-level commas. Parenthesized
    /// arguments stay together. The cursor ends at the end.
    pub fn split_commas(&mut self) -> Vec<&'a [Lexeme]> {
        let rest = &self.lexemes[self.position..];
        self.position = self.lexemes.len();

        let mut segments = Vec::new();
        let mut depth = 0_usize;
        let mut start = 0;
        for (i, lexeme) in rest.iter().enumerate() {
            match lexeme.kind {
                TokenKind::Comma if depth == 0 => {
                    segments.push(&rest[start..i]);
                    start = i + 1;
                }
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                kind if opens_paren(kind) => depth += 1,
                _ => {}
            }
        }
        segments.push(&rest[start..]);
        segments
    }
}

/// Lexemes that are closed by a `)`.
pub(crate) const fn opens_paren(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftParen
            | TokenKind::Rgb
            | TokenKind::Rgba
            | TokenKind::Hsl
            | TokenKind::Hsla
            | TokenKind::Hsb
            | TokenKind::Hsba
            | TokenKind::LinearGradient
            | TokenKind::RadialGradient
    )
}
