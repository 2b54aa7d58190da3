//! Lexemes produced by [`StylesheetLexer`](super::StylesheetLexer).

use bitflags::bitflags;
use strum_macros::Display;

/// The classification of a lexeme.
///
/// Some kinds are only produced in one lexing context; see the context
/// notes on each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Unrecognized input; the text holds the offending characters.
    Error,

    // Numbers. The literal holds the value (and unit for dimensions).
    /// A unitless number.
    Number,
    /// `50%`
    Percentage,
    /// `1.5em`
    Ems,
    /// `2ex`
    Exs,
    /// `px`, `dpx`, `cm`, `mm`, `in`, `pt`, `pc`
    Length,
    /// `deg`, `rad`, `grad`
    Angle,
    /// `ms`, `s`
    Time,
    /// `hz`, `khz`
    Frequency,
    /// Any other unit.
    Dimension,

    // Names.
    /// A plain identifier.
    Identifier,
    /// A value keyword (`auto`, `none`, `inherit`, `initial`).
    /// Declaration context only.
    Keyword,
    /// A quoted string; the literal holds the decoded text.
    String,
    /// `.name` (selector context).
    Class,
    /// `#name` (selector context).
    Id,
    /// `#rrggbb` (declaration context).
    HexColor,
    /// `url(...)`; the literal holds the decoded location.
    Url,
    /// `!important` (declaration context).
    Important,

    // Punctuation.
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,
    /// `,`
    Comma,
    /// `>`
    GreaterThan,
    /// `+`
    Plus,
    /// `~`
    Tilde,
    /// `*`
    Star,
    /// `|`
    Pipe,
    /// `/`
    Slash,
    /// `=`
    Equal,
    /// `^=`
    StartsWith,
    /// `$=`
    EndsWith,
    /// `*=`
    Contains,
    /// `~=`
    ListContains,
    /// `|=`
    EqualsWithHyphen,

    // Color and gradient functions, including the open paren (declaration context).
    /// `rgb(`
    Rgb,
    /// `rgba(`
    Rgba,
    /// `hsl(`
    Hsl,
    /// `hsla(`
    Hsla,
    /// `hsb(`
    Hsb,
    /// `hsba(`
    Hsba,
    /// `linear-gradient(`
    LinearGradient,
    /// `radial-gradient(`
    RadialGradient,

    // At-keywords.
    /// `@import`
    Import,
    /// `@media`
    Media,
    /// `@font-face`
    FontFace,
    /// `@keyframes`
    Keyframes,
    /// `@namespace`
    Namespace,
    /// `and` in a media query (selector context).
    And,

    // Structural pseudo-classes (selector context).
    /// `:root`
    RootPseudoClass,
    /// `:first-child`
    FirstChildPseudoClass,
    /// `:last-child`
    LastChildPseudoClass,
    /// `:first-of-type`
    FirstOfTypePseudoClass,
    /// `:last-of-type`
    LastOfTypePseudoClass,
    /// `:only-child`
    OnlyChildPseudoClass,
    /// `:only-of-type`
    OnlyOfTypePseudoClass,
    /// `:empty`
    EmptyPseudoClass,

    // Functional pseudo-classes, including the open paren (selector context).
    /// `:not(`
    NotPseudoClass,
    /// `:nth-child(`
    NthChildPseudoClass,
    /// `:nth-last-child(`
    NthLastChildPseudoClass,
    /// `:nth-of-type(`
    NthOfTypePseudoClass,
    /// `:nth-last-of-type(`
    NthLastOfTypePseudoClass,
    /// The `an+b` argument of an nth pseudo-class, up to the closing paren.
    Nth,

    // Pseudo-elements (selector context).
    /// `::first-line`
    FirstLinePseudoElement,
    /// `::first-letter`
    FirstLetterPseudoElement,
    /// `::before`
    BeforePseudoElement,
    /// `::after`
    AfterPseudoElement,
}

impl TokenKind {
    /// Whether this kind carries a numeric literal.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::Percentage
                | Self::Ems
                | Self::Exs
                | Self::Length
                | Self::Angle
                | Self::Time
                | Self::Frequency
                | Self::Dimension
        )
    }

    /// Whether this kind is one of the `:nth-*(` openers.
    #[must_use]
    pub const fn is_nth_function(self) -> bool {
        matches!(
            self,
            Self::NthChildPseudoClass
                | Self::NthLastChildPseudoClass
                | Self::NthOfTypePseudoClass
                | Self::NthLastOfTypePseudoClass
        )
    }
}

bitflags! {
    /// Per-lexeme flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LexemeFlags: u8 {
        /// Whitespace (or a comment, or a source boundary) preceded this lexeme.
        const FOLLOWS_WHITESPACE = 1;
        /// A string or url ran into a newline or end of input.
        const UNCLOSED = 1 << 1;
    }
}

/// A pre-decoded lexeme value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// The value of a number or percentage.
    Number(f64),
    /// The value and lowercase unit of a dimension.
    Dimension {
        /// Numeric part.
        value: f64,
        /// Unit, lowercased.
        unit: String,
    },
    /// Decoded text: string contents, url location, or a class/id/hex name
    /// without its prefix.
    Text(String),
}

/// Character range of a lexeme within its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRange {
    /// Character offset of the first character.
    pub start: usize,
    /// Length in characters.
    pub len: usize,
}

impl SourceRange {
    /// Offset just past the last character.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

/// An immutable token.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// Classification.
    pub kind: TokenKind,
    /// Raw source text.
    pub text: String,
    /// Decoded value, if the kind has one.
    pub literal: Option<Literal>,
    /// Where the text came from.
    pub range: SourceRange,
    /// Context flags.
    pub flags: LexemeFlags,
}

impl Lexeme {
    /// A lexeme with no literal and no flags.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, range: SourceRange) -> Self {
        Self {
            kind,
            text: text.into(),
            literal: None,
            range,
            flags: LexemeFlags::empty(),
        }
    }

    /// Attach a literal.
    #[must_use]
    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Whether the lexeme has the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether whitespace preceded this lexeme.
    #[must_use]
    pub const fn follows_whitespace(&self) -> bool {
        self.flags.contains(LexemeFlags::FOLLOWS_WHITESPACE)
    }

    /// Identifier or keyword text.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Identifier | TokenKind::Keyword => Some(&self.text),
            _ => None,
        }
    }

    /// Whether this is an identifier or keyword matching `name` case-insensitively.
    #[must_use]
    pub fn is_ident(&self, name: &str) -> bool {
        self.ident().is_some_and(|text| text.eq_ignore_ascii_case(name))
    }

    /// Numeric value of a number, percentage or dimension.
    #[must_use]
    pub fn number(&self) -> Option<f64> {
        match self.literal {
            Some(Literal::Number(value) | Literal::Dimension { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Unit of a dimension.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Dimension { unit, .. }) => Some(unit),
            _ => None,
        }
    }

    /// Decoded text of a string, url, class, id or hex color.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Text(text)) => Some(text),
            _ => None,
        }
    }
}
