use std::mem;

use super::lexeme::{Lexeme, LexemeFlags, Literal, SourceRange, TokenKind};

/// Saved outer position while an imported source is being lexed.
#[derive(Debug)]
struct SourceFrame {
    input: Vec<char>,
    position: usize,
    nesting: usize,
}

/// What one scan step produced, before it is wrapped into a [`Lexeme`].
struct Scanned {
    kind: TokenKind,
    literal: Option<Literal>,
    unclosed: bool,
}

impl Scanned {
    const fn plain(kind: TokenKind) -> Self {
        Self {
            kind,
            literal: None,
            unclosed: false,
        }
    }

    const fn with(kind: TokenKind, literal: Literal) -> Self {
        Self {
            kind,
            literal: Some(literal),
            unclosed: false,
        }
    }
}

/// Lazy, context-sensitive stylesheet lexer.
///
/// The code point algorithms (strings, escapes, numbers, names) follow
/// [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
/// Classification on top of them depends on the nesting level:
///
/// | Input          | nesting 0 (selectors)     | nesting > 0 (declarations) |
/// |----------------|---------------------------|----------------------------|
/// | `#abc`         | `Id`                      | `HexColor`                 |
/// | `.abc`         | `Class`                   | `Error`                    |
/// | `auto`         | `Identifier`              | `Keyword`                  |
/// | `and`          | `And`                     | `Identifier`               |
/// | `:first-child` | `FirstChildPseudoClass`   | `Colon`, `Identifier`      |
/// | `rgb(`         | `Identifier`, `LeftParen` | `Rgb`                      |
/// | `!important`   | `Error`, `Identifier`     | `Important`                |
///
/// Whitespace and comments never surface as lexemes; the next lexeme gets
/// [`LexemeFlags::FOLLOWS_WHITESPACE`] instead.
#[derive(Debug)]
pub struct StylesheetLexer {
    /// The source being lexed
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Declaration block depth; 0 is selector context
    nesting: usize,
    /// Lexemes handed back by the consumer, most recent last
    pushed: Vec<Lexeme>,
    /// Outer sources suspended by `push_source`
    frames: Vec<SourceFrame>,
    /// The next lexeme is the argument of an `:nth-*(`
    expect_nth: bool,
}

impl StylesheetLexer {
    /// A lexer over `source` in selector context.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self::with_nesting(source, 0)
    }

    /// A lexer over `source` starting at the given nesting level.
    #[must_use]
    pub fn with_nesting(source: &str, nesting: usize) -> Self {
        Self {
            input: source.chars().collect(),
            position: 0,
            nesting,
            pushed: Vec::new(),
            frames: Vec::new(),
            expect_nth: false,
        }
    }

    /// Current nesting level.
    #[must_use]
    pub const fn nesting(&self) -> usize {
        self.nesting
    }

    /// Enter a declaration block.
    pub const fn increase_nesting(&mut self) {
        self.nesting += 1;
    }

    /// Leave a declaration block. Never goes below zero.
    pub const fn decrease_nesting(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Un-consume a lexeme; it is returned by the next [`next_lexeme`](Self::next_lexeme).
    ///
    /// Pushed lexemes keep the kind they were lexed with, so a consumer that
    /// changes nesting must do so before reading past the boundary lexeme.
    pub fn push_lexeme(&mut self, lexeme: Lexeme) {
        self.pushed.push(lexeme);
    }

    /// Start lexing `source` in place of the current input.
    ///
    /// The current position and nesting are saved and restored once the
    /// new source is exhausted. The new source starts in selector context.
    pub fn push_source(&mut self, source: &str) {
        let frame = SourceFrame {
            input: mem::replace(&mut self.input, source.chars().collect()),
            position: mem::take(&mut self.position),
            nesting: mem::take(&mut self.nesting),
        };
        self.frames.push(frame);
        self.expect_nth = false;
    }

    /// Number of pushed sources that have not been exhausted yet.
    #[must_use]
    pub fn source_depth(&self) -> usize {
        self.frames.len()
    }

    /// Character offset in the current source.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Produce the next lexeme, or `None` at the end of the outermost source.
    pub fn next_lexeme(&mut self) -> Option<Lexeme> {
        if let Some(lexeme) = self.pushed.pop() {
            return Some(lexeme);
        }

        let mut follows_whitespace = self.skip_whitespace_and_comments();
        while self.peek().is_none() {
            // End of an imported source: resume the importer.
            let frame = self.frames.pop()?;
            self.input = frame.input;
            self.position = frame.position;
            self.nesting = frame.nesting;
            follows_whitespace |= self.skip_whitespace_and_comments();
        }

        let start = self.position;
        let scanned = if mem::take(&mut self.expect_nth) && self.peek() != Some(')') {
            self.consume_nth_expression()
        } else {
            self.consume_lexeme()
        };
        if scanned.kind.is_nth_function() {
            self.expect_nth = true;
        }

        let mut lexeme = Lexeme::new(
            scanned.kind,
            self.input[start..self.position].iter().collect::<String>(),
            SourceRange {
                start,
                len: self.position - start,
            },
        );
        lexeme.literal = scanned.literal;
        lexeme
            .flags
            .set(LexemeFlags::FOLLOWS_WHITESPACE, follows_whitespace);
        lexeme.flags.set(LexemeFlags::UNCLOSED, scanned.unclosed);
        Some(lexeme)
    }

    const fn in_block(&self) -> bool {
        self.nesting > 0
    }

    /// Skip whitespace and comments, reporting whether anything was skipped.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        let start = self.position;
        loop {
            if self.peek().is_some_and(is_whitespace) {
                let _ = self.consume();
            } else if self.peek() == Some('/') && self.peek_at(1) == Some('*') {
                // [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
                self.position += 2;
                loop {
                    match self.consume() {
                        Some('*') if self.peek() == Some('/') => {
                            let _ = self.consume();
                            break;
                        }
                        Some(_) => {}
                        None => break,
                    }
                }
            } else {
                return self.position > start;
            }
        }
    }

    fn consume_lexeme(&mut self) -> Scanned {
        let Some(c) = self.consume() else {
            return Scanned::plain(TokenKind::Error);
        };

        match c {
            '"' | '\'' => self.consume_string(c),

            '#' => {
                if self.peek().is_some_and(is_ident_code_point) || self.starts_with_escape(0) {
                    let name = self.consume_ident_sequence();
                    let kind = if self.in_block() {
                        TokenKind::HexColor
                    } else {
                        TokenKind::Id
                    };
                    Scanned::with(kind, Literal::Text(name))
                } else {
                    Scanned::plain(TokenKind::Error)
                }
            }

            '(' => Scanned::plain(TokenKind::LeftParen),
            ')' => Scanned::plain(TokenKind::RightParen),
            '[' => Scanned::plain(TokenKind::LeftBracket),
            ']' => Scanned::plain(TokenKind::RightBracket),
            '{' => Scanned::plain(TokenKind::LeftBrace),
            '}' => Scanned::plain(TokenKind::RightBrace),
            ',' => Scanned::plain(TokenKind::Comma),
            ';' => Scanned::plain(TokenKind::Semicolon),
            '/' => Scanned::plain(TokenKind::Slash),
            '=' => Scanned::plain(TokenKind::Equal),
            '>' => Scanned::plain(TokenKind::GreaterThan),

            '+' => {
                if self.in_block() && self.would_start_number(true) {
                    self.reconsume();
                    self.consume_numeric()
                } else {
                    Scanned::plain(TokenKind::Plus)
                }
            }

            '-' => {
                if self.would_start_number(true) {
                    self.reconsume();
                    self.consume_numeric()
                } else if self.would_start_ident(true) {
                    self.reconsume();
                    self.consume_ident_like()
                } else {
                    Scanned::plain(TokenKind::Error)
                }
            }

            '.' => {
                if self.would_start_number(true) {
                    self.reconsume();
                    self.consume_numeric()
                } else if !self.in_block() && self.would_start_ident(false) {
                    Scanned::with(TokenKind::Class, Literal::Text(self.consume_ident_sequence()))
                } else {
                    Scanned::plain(TokenKind::Error)
                }
            }

            ':' => self.consume_colon(),

            '~' => self.operator_or(TokenKind::ListContains, TokenKind::Tilde),
            '*' => self.operator_or(TokenKind::Contains, TokenKind::Star),
            '|' => self.operator_or(TokenKind::EqualsWithHyphen, TokenKind::Pipe),
            '^' => self.operator_or(TokenKind::StartsWith, TokenKind::Error),
            '$' => self.operator_or(TokenKind::EndsWith, TokenKind::Error),

            '!' => self.consume_important(),
            '@' => self.consume_at_keyword(),

            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric()
            }

            c if is_ident_start_code_point(c) || (c == '\\' && self.starts_with_escape(-1)) => {
                self.reconsume();
                self.consume_ident_like()
            }

            _ => Scanned::plain(TokenKind::Error),
        }
    }

    /// `X=` if the next code point is `=`, otherwise `fallback`.
    fn operator_or(&mut self, with_equal: TokenKind, fallback: TokenKind) -> Scanned {
        if self.peek() == Some('=') {
            let _ = self.consume();
            Scanned::plain(with_equal)
        } else {
            Scanned::plain(fallback)
        }
    }

    /// After a `:`. Pseudo-class and pseudo-element names are only
    /// recognized outside declaration blocks.
    fn consume_colon(&mut self) -> Scanned {
        let double = self.peek() == Some(':');
        if self.in_block() {
            if double {
                let _ = self.consume();
                return Scanned::plain(TokenKind::DoubleColon);
            }
            return Scanned::plain(TokenKind::Colon);
        }

        let name_start = self.position + usize::from(double);
        let saved = self.position;
        self.position = name_start;
        if !self.would_start_ident(false) {
            self.position = saved;
            return self.plain_colon(double);
        }
        let name = self.consume_ident_sequence().to_ascii_lowercase();
        let has_paren = self.peek() == Some('(');

        let kind = match (name.as_str(), has_paren) {
            ("first-line", false) => Some(TokenKind::FirstLinePseudoElement),
            ("first-letter", false) => Some(TokenKind::FirstLetterPseudoElement),
            ("before", false) => Some(TokenKind::BeforePseudoElement),
            ("after", false) => Some(TokenKind::AfterPseudoElement),
            _ if double => None,
            ("root", false) => Some(TokenKind::RootPseudoClass),
            ("first-child", false) => Some(TokenKind::FirstChildPseudoClass),
            ("last-child", false) => Some(TokenKind::LastChildPseudoClass),
            ("first-of-type", false) => Some(TokenKind::FirstOfTypePseudoClass),
            ("last-of-type", false) => Some(TokenKind::LastOfTypePseudoClass),
            ("only-child", false) => Some(TokenKind::OnlyChildPseudoClass),
            ("only-of-type", false) => Some(TokenKind::OnlyOfTypePseudoClass),
            ("empty", false) => Some(TokenKind::EmptyPseudoClass),
            ("not", true) => Some(TokenKind::NotPseudoClass),
            ("nth-child", true) => Some(TokenKind::NthChildPseudoClass),
            ("nth-last-child", true) => Some(TokenKind::NthLastChildPseudoClass),
            ("nth-of-type", true) => Some(TokenKind::NthOfTypePseudoClass),
            ("nth-last-of-type", true) => Some(TokenKind::NthLastOfTypePseudoClass),
            _ => None,
        };

        if let Some(kind) = kind {
            if has_paren {
                let _ = self.consume();
            }
            Scanned::plain(kind)
        } else {
            // Generic pseudo-class or pseudo-element: the name is lexed
            // separately as an identifier.
            self.position = saved;
            self.plain_colon(double)
        }
    }

    fn plain_colon(&mut self, double: bool) -> Scanned {
        if double {
            let _ = self.consume();
            Scanned::plain(TokenKind::DoubleColon)
        } else {
            Scanned::plain(TokenKind::Colon)
        }
    }

    /// `!important`, with optional whitespace after the `!`.
    fn consume_important(&mut self) -> Scanned {
        if !self.in_block() {
            return Scanned::plain(TokenKind::Error);
        }
        let saved = self.position;
        let _ = self.skip_whitespace_and_comments();
        if self.would_start_ident(false) {
            let name = self.consume_ident_sequence();
            if name.eq_ignore_ascii_case("important") {
                return Scanned::plain(TokenKind::Important);
            }
        }
        self.position = saved;
        Scanned::plain(TokenKind::Error)
    }

    fn consume_at_keyword(&mut self) -> Scanned {
        if !self.would_start_ident(false) {
            return Scanned::plain(TokenKind::Error);
        }
        let name = self.consume_ident_sequence().to_ascii_lowercase();
        let kind = match name.as_str() {
            "import" => TokenKind::Import,
            "media" => TokenKind::Media,
            "font-face" => TokenKind::FontFace,
            "keyframes" => TokenKind::Keyframes,
            "namespace" => TokenKind::Namespace,
            _ => TokenKind::Error,
        };
        Scanned::plain(kind)
    }

    /// Everything up to (not including) the closing paren of an nth
    /// pseudo-class, trimmed. The parser interprets it.
    fn consume_nth_expression(&mut self) -> Scanned {
        while let Some(c) = self.peek() {
            if matches!(c, ')' | '{' | '}' | ';' | ',') {
                break;
            }
            let _ = self.consume();
        }
        while self.position > 0 && self.input[self.position - 1].is_whitespace() {
            self.position -= 1;
        }
        Scanned::plain(TokenKind::Nth)
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, ending_code_point: char) -> Scanned {
        let mut value = String::new();
        let mut unclosed = false;

        loop {
            match self.consume() {
                Some(c) if c == ending_code_point => break,
                None => {
                    unclosed = true;
                    break;
                }
                // "newline": a bad string. Keep what we have and leave the
                // newline for the next lexeme.
                Some('\n') => {
                    self.reconsume();
                    unclosed = true;
                    break;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },
                Some(c) => value.push(c),
            }
        }

        Scanned {
            kind: TokenKind::String,
            literal: Some(Literal::Text(value)),
            unclosed,
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric(&mut self) -> Scanned {
        let value = self.consume_number();

        if self.peek() == Some('%') {
            let _ = self.consume();
            return Scanned::with(TokenKind::Percentage, Literal::Number(value));
        }

        if self.would_start_ident(false) {
            let unit = self.consume_ident_sequence().to_ascii_lowercase();
            let kind = match unit.as_str() {
                "em" => TokenKind::Ems,
                "ex" => TokenKind::Exs,
                "px" | "dpx" | "cm" | "mm" | "in" | "pt" | "pc" => TokenKind::Length,
                "deg" | "rad" | "grad" => TokenKind::Angle,
                "ms" | "s" => TokenKind::Time,
                "hz" | "khz" => TokenKind::Frequency,
                _ => TokenKind::Dimension,
            };
            return Scanned::with(kind, Literal::Dimension { value, unit });
        }

        Scanned::with(TokenKind::Number, Literal::Number(value))
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like(&mut self) -> Scanned {
        let name = self.consume_ident_sequence();
        let lower = name.to_ascii_lowercase();

        if self.peek() == Some('(') {
            if lower == "url" {
                let _ = self.consume();
                return self.consume_url();
            }
            if self.in_block() {
                let function = match lower.as_str() {
                    "rgb" => Some(TokenKind::Rgb),
                    "rgba" => Some(TokenKind::Rgba),
                    "hsl" => Some(TokenKind::Hsl),
                    "hsla" => Some(TokenKind::Hsla),
                    "hsb" => Some(TokenKind::Hsb),
                    "hsba" => Some(TokenKind::Hsba),
                    "linear-gradient" => Some(TokenKind::LinearGradient),
                    "radial-gradient" => Some(TokenKind::RadialGradient),
                    _ => None,
                };
                if let Some(kind) = function {
                    let _ = self.consume();
                    return Scanned::plain(kind);
                }
            }
            // Other functions are an identifier followed by `(`.
            return Scanned::plain(TokenKind::Identifier);
        }

        let kind = if self.in_block() {
            match lower.as_str() {
                "auto" | "none" | "inherit" | "initial" => TokenKind::Keyword,
                _ => TokenKind::Identifier,
            }
        } else if lower == "and" {
            TokenKind::And
        } else {
            TokenKind::Identifier
        };
        Scanned::plain(kind)
    }

    /// [§ 4.3.7 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token),
    /// extended to accept a quoted location as well.
    fn consume_url(&mut self) -> Scanned {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }

        let mut value = String::new();
        let mut unclosed = false;

        if let Some(quote @ ('"' | '\'')) = self.peek() {
            let _ = self.consume();
            let string = self.consume_string(quote);
            unclosed = string.unclosed;
            if let Some(Literal::Text(text)) = string.literal {
                value = text;
            }
            while self.peek().is_some_and(is_whitespace) {
                let _ = self.consume();
            }
            if self.peek() == Some(')') {
                let _ = self.consume();
            } else {
                unclosed = true;
            }
        } else {
            loop {
                match self.consume() {
                    Some(')') => break,
                    None => {
                        unclosed = true;
                        break;
                    }
                    Some('\\') if self.starts_with_escape(-1) => {
                        value.push(self.consume_escaped_code_point());
                    }
                    Some(c) if is_whitespace(c) => {}
                    Some(c) => value.push(c),
                }
            }
        }

        Scanned {
            kind: TokenKind::Url,
            literal: Some(Literal::Text(value)),
            unclosed,
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        while let Some(c) = self.peek() {
            if is_ident_code_point(c) {
                result.push(c);
                let _ = self.consume();
            } else if c == '\\' && self.starts_with_escape(0) {
                let _ = self.consume();
                result.push(self.consume_escaped_code_point());
            } else {
                break;
            }
        }
        result
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> f64 {
        let start = self.position;

        if matches!(self.peek(), Some('+' | '-')) {
            let _ = self.consume();
        }
        self.consume_digits();

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            let _ = self.consume();
            self.consume_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.position += digit_at;
                self.consume_digits();
            }
        }

        self.input[start..self.position]
            .iter()
            .collect::<String>()
            .parse()
            .unwrap_or(0.0)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called with the backslash already consumed.
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    if let Some(digit) = self.consume() {
                        hex.push(digit);
                    }
                }
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&cp| cp != 0)
                    .and_then(char::from_u32)
                    .unwrap_or('\u{FFFD}')
            }
            Some(c) => c,
            None => '\u{FFFD}',
        }
    }

    /// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape),
    /// for the backslash at `offset` from the current position.
    fn starts_with_escape(&self, offset: isize) -> bool {
        let Some(at) = self.position.checked_add_signed(offset) else {
            return false;
        };
        self.input.get(at) == Some(&'\\') && self.input.get(at + 1).is_some_and(|&c| c != '\n')
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// With `reconsumed`, the check starts at the code point just consumed.
    fn would_start_ident(&self, reconsumed: bool) -> bool {
        let base = if reconsumed { -1 } else { 0 };
        let at = |i: isize| {
            self.position
                .checked_add_signed(base + i)
                .and_then(|p| self.input.get(p).copied())
        };
        match at(0) {
            Some('-') => {
                at(1).is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || self.starts_with_escape(base + 1)
            }
            Some(c) if is_ident_start_code_point(c) => true,
            Some('\\') => self.starts_with_escape(base),
            _ => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    ///
    /// With `reconsumed`, the check starts at the code point just consumed.
    fn would_start_number(&self, reconsumed: bool) -> bool {
        let base = if reconsumed { -1 } else { 0 };
        let at = |i: isize| {
            self.position
                .checked_add_signed(base + i)
                .and_then(|p| self.input.get(p).copied())
        };
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match at(0) {
            Some('+' | '-') => is_digit(at(1)) || (at(1) == Some('.') && is_digit(at(2))),
            Some('.') => is_digit(at(1)),
            c => is_digit(c),
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    const fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str, nesting: usize) -> Vec<TokenKind> {
        let mut lexer = StylesheetLexer::with_nesting(source, nesting);
        std::iter::from_fn(|| lexer.next_lexeme())
            .map(|l| l.kind)
            .collect()
    }

    #[test]
    fn test_hash_depends_on_nesting() {
        assert_eq!(kinds("#abc", 0), vec![TokenKind::Id]);
        assert_eq!(kinds("#abc", 1), vec![TokenKind::HexColor]);
    }

    #[test]
    fn test_nth_expression_is_one_lexeme() {
        let mut lexer = StylesheetLexer::new(":nth-child( 2n + 1 )");
        let opener = lexer.next_lexeme().map(|l| l.kind);
        let nth = lexer.next_lexeme();
        let close = lexer.next_lexeme().map(|l| l.kind);

        assert_eq!(opener, Some(TokenKind::NthChildPseudoClass));
        assert_eq!(nth.as_ref().map(|l| l.kind), Some(TokenKind::Nth));
        assert_eq!(nth.map(|l| l.text), Some("2n + 1".to_string()));
        assert_eq!(close, Some(TokenKind::RightParen));
    }

    #[test]
    fn test_escape_in_identifier() {
        let mut lexer = StylesheetLexer::new(r"a\2c b");
        let lexeme = lexer.next_lexeme();
        assert_eq!(lexeme.map(|l| l.kind), Some(TokenKind::Identifier));
    }

    #[test]
    fn test_source_stack_restores_nesting() {
        let mut lexer = StylesheetLexer::with_nesting("red", 1);
        lexer.push_source("auto");
        assert_eq!(lexer.source_depth(), 1);
        // Imported text starts in selector context.
        assert_eq!(lexer.next_lexeme().map(|l| l.kind), Some(TokenKind::Identifier));
        assert_eq!(lexer.next_lexeme().map(|l| l.kind), Some(TokenKind::Identifier));
        assert_eq!(lexer.source_depth(), 0);
        assert_eq!(lexer.nesting(), 1);
        assert_eq!(lexer.next_lexeme(), None);
    }
}
