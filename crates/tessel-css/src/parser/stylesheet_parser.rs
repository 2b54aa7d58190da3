//! Recursive-descent stylesheet parser.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing), reduced to the
//! rule shapes this engine understands. Errors never abort the parse: a bad
//! rule is recorded and skipped, a bad declaration is recorded and dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::loader::SourceLoader;
use super::nth::parse_an_plus_b;
use crate::error::{SourceLocation, StyleError};
use crate::lexer::{Lexeme, StylesheetLexer, TokenKind};
use crate::selector::{
    AttributeOperator, AttributeSelector, Combinator, NamespaceConstraint, NthKind,
    PseudoClassPredicate, Selector, TypeSelector,
};
use crate::stylesheet::{
    Declaration, DeclarationContainer, Keyframe, KeyframeBlock, MediaExpression, MediaGroup,
    MediaValue, Origin, RuleSet, Stylesheet,
};
use crate::values::Dimension;

/// Imports nested deeper than this are refused.
pub const MAX_IMPORT_DEPTH: usize = 16;

type ParseResult<T> = Result<T, StyleError>;

/// A source currently feeding the lexer.
struct SourceFile {
    name: Option<Arc<str>>,
    path: Option<PathBuf>,
    text: String,
}

/// Turns stylesheet text into a [`Stylesheet`].
///
/// The parser holds one lexeme of lookahead. Because the lexer is context
/// sensitive, nesting is adjusted while `{` or `}` is the lookahead, before
/// anything past it is lexed.
pub struct StylesheetParser<'l> {
    loader: &'l dyn SourceLoader,
    lexer: StylesheetLexer,
    current: Option<Lexeme>,
    files: Vec<SourceFile>,
    sheet: Stylesheet,
}

impl<'l> StylesheetParser<'l> {
    /// A parser resolving `@import` through `loader`.
    #[must_use]
    pub fn new(loader: &'l dyn SourceLoader) -> Self {
        Self {
            loader,
            lexer: StylesheetLexer::new(""),
            current: None,
            files: Vec::new(),
            sheet: Stylesheet::new(Origin::Application),
        }
    }

    /// Parse a whole stylesheet. `path` names the source for error
    /// locations and is the base for relative imports.
    #[must_use]
    pub fn parse(mut self, source: &str, origin: Origin, path: Option<&Path>) -> Stylesheet {
        self.start(source, 0, origin, path);
        self.parse_rules();

        debug!(
            file = %path.map_or_else(|| "<inline>".into(), |p| p.display().to_string()),
            origin = %origin,
            rule_sets = self.sheet.all_rule_sets().len(),
            errors = self.sheet.errors.len(),
            "parsed stylesheet"
        );
        self.sheet
    }

    /// Parse the body of an inline `style` attribute, e.g.
    /// `color: red; opacity: 0.5`, into a stylesheet with one rule set that
    /// matches any node.
    #[must_use]
    pub fn parse_inline(mut self, source: &str) -> Stylesheet {
        self.start(source, 1, Origin::Inline, None);
        let declarations = self.parse_declaration_block(false);
        self.sheet.add_rule_set(RuleSet::new(
            Selector::Type(TypeSelector::universal()),
            Arc::new(declarations),
            Origin::Inline,
        ));
        self.sheet
    }

    fn start(&mut self, source: &str, nesting: usize, origin: Origin, path: Option<&Path>) {
        self.sheet = Stylesheet::new(origin);
        self.sheet.file_path = path.map(Path::to_path_buf);
        self.lexer = StylesheetLexer::with_nesting(source, nesting);
        self.files = vec![SourceFile {
            name: path.map(|p| Arc::from(p.display().to_string())),
            path: path.map(Path::to_path_buf),
            text: source.to_string(),
        }];
        self.advance();
    }

    // Lookahead management.

    fn advance(&mut self) {
        self.current = self.lexer.next_lexeme();
        // Sources the lexer has finished with.
        self.files.truncate(self.lexer.source_depth() + 1);
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.current.take();
        self.advance();
        lexeme
    }

    fn kind(&self) -> Option<TokenKind> {
        self.current.as_ref().map(|l| l.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Kind of the lexeme after the lookahead, and whether whitespace
    /// separates the two.
    fn peek_next(&mut self) -> Option<(TokenKind, bool)> {
        let next = self.lexer.next_lexeme()?;
        let info = (next.kind, next.follows_whitespace());
        self.lexer.push_lexeme(next);
        Some(info)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Lexeme> {
        match self.current.take() {
            Some(lexeme) if lexeme.is(kind) => {
                self.advance();
                Ok(lexeme)
            }
            other => {
                self.current = other;
                Err(self.unexpected(expected))
            }
        }
    }

    fn expect_ident(&mut self, expected: &str) -> ParseResult<String> {
        match self.current.take() {
            Some(lexeme) if lexeme.ident().is_some() => {
                self.advance();
                Ok(lexeme.text)
            }
            other => {
                self.current = other;
                Err(self.unexpected(expected))
            }
        }
    }

    /// Consume `{` and switch the lexer to declaration context.
    fn enter_block(&mut self, expected: &str) -> ParseResult<()> {
        if !self.at(TokenKind::LeftBrace) {
            return Err(self.unexpected(expected));
        }
        self.lexer.increase_nesting();
        self.advance();
        Ok(())
    }

    /// Consume `}` and switch the lexer back to selector context.
    fn leave_block(&mut self) {
        self.lexer.decrease_nesting();
        self.advance();
    }

    // Errors.

    fn location_at(&self, offset: usize) -> SourceLocation {
        self.files.last().map_or_else(SourceLocation::default, |file| {
            SourceLocation::new(file.name.clone(), &file.text, offset)
        })
    }

    fn here(&self) -> SourceLocation {
        let offset = self.current.as_ref().map_or_else(
            || self.files.last().map_or(0, |f| f.text.chars().count()),
            |l| l.range.start,
        );
        self.location_at(offset)
    }

    fn syntax_error(&self, message: impl Into<String>) -> StyleError {
        StyleError::Syntax {
            message: message.into(),
            location: self.here(),
        }
    }

    fn lex_error(&self, lexeme: &Lexeme) -> StyleError {
        StyleError::Lex {
            text: lexeme.text.clone(),
            location: self.location_at(lexeme.range.start),
        }
    }

    fn unexpected(&self, expected: &str) -> StyleError {
        match &self.current {
            Some(lexeme) if lexeme.is(TokenKind::Error) => self.lex_error(lexeme),
            Some(lexeme) => self.syntax_error(format!("expected {expected}, found '{}'", lexeme.text)),
            None => self.syntax_error(format!("expected {expected}, found end of input")),
        }
    }

    fn record(&mut self, error: StyleError) {
        debug!(%error, "stylesheet error");
        self.sheet.errors.push(error);
    }

    /// Skip the rest of a malformed rule: through the next `;` or balanced
    /// `{...}` block. Inside a group (`nested`), a `}` that closes the group
    /// is left for the caller.
    fn recover(&mut self, nested: bool) {
        let mut depth = 0_usize;
        while let Some(kind) = self.kind() {
            match kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LeftBrace => {
                    depth += 1;
                    self.lexer.increase_nesting();
                    self.advance();
                }
                TokenKind::RightBrace if depth == 0 => {
                    if !nested {
                        self.advance();
                    }
                    return;
                }
                TokenKind::RightBrace => {
                    depth -= 1;
                    self.leave_block();
                    if depth == 0 {
                        return;
                    }
                }
                _ => self.advance(),
            }
        }
    }

    // Rules.

    fn parse_rules(&mut self) {
        while let Some(kind) = self.kind() {
            let result = match kind {
                TokenKind::Import => self.parse_import(),
                TokenKind::Namespace => self.parse_namespace(),
                TokenKind::Media => self.parse_media(),
                TokenKind::FontFace => self.parse_font_face(),
                TokenKind::Keyframes => self.parse_keyframes(),
                _ => self.parse_rule_set().map(|rule_sets| {
                    for rule_set in rule_sets {
                        self.sheet.add_rule_set(rule_set);
                    }
                }),
            };
            if let Err(error) = result {
                self.record(error);
                self.recover(false);
            }
        }
    }

    /// `selector, selector { declarations }`: one rule set per selector,
    /// all sharing the declarations.
    fn parse_rule_set(&mut self) -> ParseResult<Vec<RuleSet>> {
        let selectors = self.parse_selector_list()?;
        self.enter_block("'{' after selector")?;
        let declarations = Arc::new(self.parse_declaration_block(true));
        let origin = self.sheet.origin;
        Ok(selectors
            .into_iter()
            .map(|selector| RuleSet::new(selector, Arc::clone(&declarations), origin))
            .collect())
    }

    /// Declarations up to the closing `}` (consumed), or to the end of input
    /// when the block is not `closed` by a brace.
    fn parse_declaration_block(&mut self, closed: bool) -> DeclarationContainer {
        let mut container = DeclarationContainer::new();
        loop {
            match self.kind() {
                None => {
                    if closed {
                        let error = self.syntax_error("unclosed declaration block");
                        self.record(error);
                    }
                    break;
                }
                Some(TokenKind::RightBrace) if closed => {
                    self.leave_block();
                    break;
                }
                Some(TokenKind::RightBrace) => {
                    let error = self.syntax_error("unexpected '}' outside a block");
                    self.record(error);
                    self.advance();
                }
                Some(TokenKind::Semicolon) => self.advance(),
                Some(_) => match self.parse_declaration() {
                    Ok(declaration) => container.add(declaration),
                    Err(error) => {
                        self.record(error);
                        self.skip_declaration();
                    }
                },
            }
        }
        container
    }

    /// `name: value [!important]`
    fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        let name_lexeme = match self.current.take() {
            Some(lexeme) if lexeme.ident().is_some() => lexeme,
            other => {
                self.current = other;
                return Err(self.unexpected("a property name"));
            }
        };
        let location = self.location_at(name_lexeme.range.start);
        self.advance();
        let _ = self.expect(TokenKind::Colon, "':' after property name")?;

        let mut lexemes = Vec::new();
        let mut important = false;
        while let Some(kind) = self.kind() {
            if matches!(kind, TokenKind::Semicolon | TokenKind::RightBrace) {
                break;
            }
            let Some(lexeme) = self.bump() else { break };
            match lexeme.kind {
                TokenKind::Error => return Err(self.lex_error(&lexeme)),
                TokenKind::Important => important = true,
                _ if important => {
                    return Err(StyleError::Syntax {
                        message: format!("unexpected '{}' after !important", lexeme.text),
                        location: self.location_at(lexeme.range.start),
                    });
                }
                _ => lexemes.push(lexeme),
            }
        }

        if lexemes.is_empty() {
            return Err(StyleError::Syntax {
                message: format!("missing value for '{}'", name_lexeme.text),
                location,
            });
        }

        Ok(Declaration {
            important,
            location,
            ..Declaration::new(&name_lexeme.text, lexemes)
        })
    }

    /// Skip to the end of a malformed declaration, leaving a closing `}`.
    fn skip_declaration(&mut self) {
        let mut depth = 0_usize;
        while let Some(kind) = self.kind() {
            match kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace if depth == 0 => return,
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    // At-rules.

    /// `@import "file.css";` or `@import url(file.css);`
    ///
    /// The imported text is spliced into the lexer so its rules take the
    /// place of the `@import` in source order.
    fn parse_import(&mut self) -> ParseResult<()> {
        let at = self.here();
        self.advance();
        let target = match self.current.take() {
            Some(lexeme) if matches!(lexeme.kind, TokenKind::String | TokenKind::Url) => {
                lexeme.text_value().unwrap_or(&lexeme.text).to_string()
            }
            other => {
                self.current = other;
                return Err(self.unexpected("an import location"));
            }
        };
        self.advance();
        if !self.at(TokenKind::Semicolon) && self.kind().is_some() {
            return Err(self.unexpected("';' after @import"));
        }

        let base = self
            .files
            .last()
            .and_then(|f| f.path.as_deref())
            .and_then(Path::parent);
        let path = match base {
            Some(dir) => dir.join(&target),
            None => PathBuf::from(&target),
        };

        let import_error = |reason: String| StyleError::Import {
            path: path.display().to_string(),
            reason,
            location: at.clone(),
        };
        if self.files.iter().any(|f| f.path.as_deref() == Some(path.as_path())) {
            return Err(import_error("circular import".to_string()));
        }
        if self.files.len() > MAX_IMPORT_DEPTH {
            return Err(import_error(format!(
                "imports nested deeper than {MAX_IMPORT_DEPTH}"
            )));
        }
        let text = self
            .loader
            .load(&path)
            .map_err(|e| import_error(e.to_string()))?;

        debug!(path = %path.display(), "importing stylesheet");
        self.sheet.imported_files.push(path.clone());
        // The `;` is the lookahead; everything after it now comes from the
        // imported text until that is exhausted.
        self.lexer.push_source(&text);
        self.files.push(SourceFile {
            name: Some(Arc::from(path.display().to_string())),
            path: Some(path),
            text,
        });
        self.advance();
        Ok(())
    }

    /// `@namespace [prefix] "uri";`
    fn parse_namespace(&mut self) -> ParseResult<()> {
        self.advance();
        let prefix = match &self.current {
            Some(lexeme) if lexeme.is(TokenKind::Identifier) => {
                let prefix = lexeme.text.clone();
                self.advance();
                prefix
            }
            _ => String::new(),
        };
        let uri = match self.current.take() {
            Some(lexeme) if matches!(lexeme.kind, TokenKind::String | TokenKind::Url) => {
                lexeme.text_value().unwrap_or(&lexeme.text).to_string()
            }
            other => {
                self.current = other;
                return Err(self.unexpected("a namespace uri"));
            }
        };
        self.advance();
        let _ = self.expect(TokenKind::Semicolon, "';' after @namespace")?;
        let _ = self.sheet.namespaces.insert(prefix, uri);
        Ok(())
    }

    /// `@media query { rule sets }`
    fn parse_media(&mut self) -> ParseResult<()> {
        self.advance();
        let query = self.parse_media_query_list()?;
        let _ = self.expect(TokenKind::LeftBrace, "'{' after media query")?;

        let mut rule_sets = Vec::new();
        loop {
            match self.kind() {
                None => {
                    let error = self.syntax_error("unclosed @media block");
                    self.record(error);
                    break;
                }
                Some(TokenKind::RightBrace) => {
                    self.advance();
                    break;
                }
                Some(kind) => {
                    let result = if matches!(
                        kind,
                        TokenKind::Import
                            | TokenKind::Namespace
                            | TokenKind::Media
                            | TokenKind::FontFace
                            | TokenKind::Keyframes
                    ) {
                        Err(self.syntax_error(format!(
                            "'{}' is not allowed inside @media",
                            self.current.as_ref().map_or("", |l| l.text.as_str())
                        )))
                    } else {
                        self.parse_rule_set()
                    };
                    match result {
                        Ok(parsed) => {
                            for mut rule_set in parsed {
                                rule_set.set_source_order(self.sheet.take_source_order());
                                rule_sets.push(Arc::new(rule_set));
                            }
                        }
                        Err(error) => {
                            self.record(error);
                            self.recover(true);
                        }
                    }
                }
            }
        }

        self.sheet.media_groups.push(MediaGroup {
            query,
            origin: self.sheet.origin,
            rule_sets,
        });
        Ok(())
    }

    /// Comma-separated queries, each an `and`-joined list of media types and
    /// `(feature[: value])` tests.
    fn parse_media_query_list(&mut self) -> ParseResult<MediaExpression> {
        let mut queries = Vec::new();
        let mut terms = Vec::new();
        loop {
            match self.kind() {
                Some(TokenKind::LeftBrace) | None => break,
                Some(TokenKind::Comma) => {
                    self.advance();
                    queries.push(MediaExpression::And(std::mem::take(&mut terms)));
                }
                Some(TokenKind::And) => self.advance(),
                Some(TokenKind::Identifier) => {
                    let name = self.expect_ident("a media type")?.to_ascii_lowercase();
                    if name != "only" {
                        terms.push(MediaExpression::Type(name));
                    }
                }
                Some(TokenKind::LeftParen) => terms.push(self.parse_media_feature()?),
                Some(_) => return Err(self.unexpected("a media query")),
            }
        }
        queries.push(MediaExpression::And(terms));

        Ok(if queries.len() == 1 {
            queries.swap_remove(0)
        } else {
            MediaExpression::Or(queries)
        })
    }

    /// `(name)` or `(name: value)`; lengths are kept in points.
    fn parse_media_feature(&mut self) -> ParseResult<MediaExpression> {
        let _ = self.expect(TokenKind::LeftParen, "'('")?;
        let name = self.expect_ident("a media feature")?.to_ascii_lowercase();
        let mut value = None;
        if self.at(TokenKind::Colon) {
            self.advance();
            value = match self.bump() {
                Some(lexeme) if lexeme.ident().is_some() => {
                    Some(MediaValue::Ident(lexeme.text.to_ascii_lowercase()))
                }
                Some(lexeme) if lexeme.kind.is_numeric() => {
                    media_number(&lexeme).map(MediaValue::Number)
                }
                _ => None,
            };
            if value.is_none() {
                return Err(self.syntax_error(format!("invalid value for media feature '{name}'")));
            }
        }
        let _ = self.expect(TokenKind::RightParen, "')' after media feature")?;
        Ok(MediaExpression::Feature { name, value })
    }

    /// `@font-face { declarations }`
    fn parse_font_face(&mut self) -> ParseResult<()> {
        self.advance();
        self.enter_block("'{' after @font-face")?;
        let declarations = self.parse_declaration_block(true);
        self.sheet.font_faces.push(Arc::new(declarations));
        Ok(())
    }

    /// `@keyframes name { offsets { declarations } ... }`
    fn parse_keyframes(&mut self) -> ParseResult<()> {
        self.advance();
        let name = match self.current.take() {
            Some(lexeme) if lexeme.is(TokenKind::Identifier) => lexeme.text,
            Some(lexeme) if lexeme.is(TokenKind::String) => {
                lexeme.text_value().unwrap_or(&lexeme.text).to_string()
            }
            other => {
                self.current = other;
                return Err(self.unexpected("an animation name"));
            }
        };
        self.advance();
        let _ = self.expect(TokenKind::LeftBrace, "'{' after @keyframes name")?;

        let mut keyframe = Keyframe {
            name,
            blocks: Vec::new(),
        };
        loop {
            match self.kind() {
                None => {
                    let error = self.syntax_error("unclosed @keyframes block");
                    self.record(error);
                    break;
                }
                Some(TokenKind::RightBrace) => {
                    self.advance();
                    break;
                }
                Some(_) => match self.parse_keyframe_block() {
                    Ok(block) => keyframe.blocks.push(block),
                    Err(error) => {
                        self.record(error);
                        self.recover(true);
                    }
                },
            }
        }

        self.sheet.add_keyframe(keyframe);
        Ok(())
    }

    /// `from, 50%, to { declarations }`
    fn parse_keyframe_block(&mut self) -> ParseResult<KeyframeBlock> {
        let mut offsets = Vec::new();
        loop {
            let offset = match &self.current {
                Some(lexeme) if lexeme.is_ident("from") => 0.0,
                Some(lexeme) if lexeme.is_ident("to") => 1.0,
                Some(lexeme) if lexeme.is(TokenKind::Percentage) => {
                    lexeme.number().unwrap_or(0.0) / 100.0
                }
                _ => return Err(self.unexpected("a keyframe offset")),
            };
            offsets.push(offset);
            self.advance();
            if !self.at(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.enter_block("'{' after keyframe offsets")?;
        let declarations = self.parse_declaration_block(true);
        Ok(KeyframeBlock {
            offsets,
            declarations: Arc::new(declarations),
        })
    }

    // Selectors.

    fn parse_selector_list(&mut self) -> ParseResult<Vec<Selector>> {
        let mut selectors = vec![self.parse_complex_selector()?];
        while self.at(TokenKind::Comma) {
            self.advance();
            selectors.push(self.parse_complex_selector()?);
        }
        Ok(selectors)
    }

    /// Compound selectors joined by combinators, left-associative so the
    /// rightmost compound is the subject.
    fn parse_complex_selector(&mut self) -> ParseResult<Selector> {
        let mut selector = Selector::Type(self.parse_compound_selector()?);
        loop {
            let Some(lexeme) = &self.current else { break };
            let (combinator, explicit) = match lexeme.kind {
                TokenKind::GreaterThan => (Combinator::Child, true),
                TokenKind::Plus => (Combinator::AdjacentSibling, true),
                TokenKind::Tilde => (Combinator::GeneralSibling, true),
                TokenKind::LeftBrace | TokenKind::Comma | TokenKind::RightParen => break,
                kind if lexeme.follows_whitespace() && starts_compound(kind) => {
                    (Combinator::Descendant, false)
                }
                _ => return Err(self.unexpected("a combinator or '{'")),
            };
            if explicit {
                self.advance();
            }
            let right = self.parse_compound_selector()?;
            selector = Selector::Combinator {
                kind: combinator,
                left: Box::new(selector),
                right: Box::new(Selector::Type(right)),
            };
        }
        Ok(selector)
    }

    /// `ns|type.class#id[attr]:state::element`, with no whitespace inside.
    fn parse_compound_selector(&mut self) -> ParseResult<TypeSelector> {
        let mut compound = TypeSelector::universal();
        if let Some(uri) = self.sheet.default_namespace() {
            compound.namespace = NamespaceConstraint::Uri(uri.to_string());
        }
        let mut consumed = self.parse_type_part(&mut compound)?;

        loop {
            let Some(lexeme) = &self.current else { break };
            if consumed && lexeme.follows_whitespace() {
                break;
            }
            let kind = lexeme.kind;

            if let Some(predicate) = structural_predicate(kind) {
                compound
                    .attribute_expressions
                    .push(Selector::PseudoClassPredicate(predicate));
                self.advance();
            } else if let Some(element) = pseudo_element_name(kind) {
                compound.pseudo_element = Some(element.to_string());
                self.advance();
            } else if let Some(nth) = nth_kind(kind) {
                let expression = self.parse_nth(nth)?;
                compound.attribute_expressions.push(expression);
            } else {
                match kind {
                    TokenKind::Class => {
                        let name = simple_name(lexeme, '.');
                        compound.attribute_expressions.push(Selector::Class(name));
                        self.advance();
                    }
                    TokenKind::Id => {
                        let name = simple_name(lexeme, '#');
                        compound.attribute_expressions.push(Selector::Id(name));
                        self.advance();
                    }
                    TokenKind::LeftBracket => {
                        let attribute = self.parse_attribute()?;
                        compound.attribute_expressions.push(attribute);
                    }
                    TokenKind::Colon => {
                        self.advance();
                        let name = self.expect_ident("a pseudo-class name")?;
                        if self.at(TokenKind::LeftParen) {
                            return Err(self.syntax_error(format!(
                                "unsupported functional pseudo-class ':{name}()'"
                            )));
                        }
                        compound
                            .attribute_expressions
                            .push(Selector::PseudoClass(name.to_ascii_lowercase()));
                    }
                    TokenKind::DoubleColon => {
                        self.advance();
                        let name = self.expect_ident("a pseudo-element name")?;
                        compound.pseudo_element = Some(name.to_ascii_lowercase());
                    }
                    TokenKind::NotPseudoClass => {
                        let negated = self.parse_not()?;
                        compound.attribute_expressions.push(negated);
                    }
                    _ => break,
                }
            }
            consumed = true;
        }

        if consumed {
            Ok(compound)
        } else {
            Err(self.unexpected("a selector"))
        }
    }

    /// The optional `[ns|]name` head of a compound selector.
    fn parse_type_part(&mut self, compound: &mut TypeSelector) -> ParseResult<bool> {
        let prefixed = match self.kind() {
            Some(TokenKind::Pipe) => {
                self.advance();
                compound.namespace = NamespaceConstraint::None;
                compound.explicit_namespace = true;
                true
            }
            Some(TokenKind::Identifier | TokenKind::Star) => {
                if matches!(self.peek_next(), Some((TokenKind::Pipe, false))) {
                    compound.namespace = self.namespace_for_prefix()?;
                    compound.explicit_namespace = true;
                    self.advance();
                    true
                } else {
                    false
                }
            }
            _ => return Ok(false),
        };

        match self.current.take() {
            Some(lexeme) if lexeme.is(TokenKind::Star) => {
                self.advance();
                Ok(true)
            }
            Some(lexeme) if lexeme.is(TokenKind::Identifier) => {
                compound.type_name = Some(lexeme.text);
                self.advance();
                Ok(true)
            }
            other => {
                self.current = other;
                if prefixed {
                    Err(self.unexpected("an element name after '|'"))
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Resolve the prefix in the lookahead (an identifier or `*`) and
    /// consume it. The `|` that follows is left for the caller.
    fn namespace_for_prefix(&mut self) -> ParseResult<NamespaceConstraint> {
        let constraint = match &self.current {
            Some(lexeme) if lexeme.is(TokenKind::Star) => NamespaceConstraint::Any,
            Some(lexeme) => match self.sheet.namespace_uri(&lexeme.text) {
                Some(uri) => NamespaceConstraint::Uri(uri.to_string()),
                None => {
                    return Err(self.syntax_error(format!(
                        "undeclared namespace prefix '{}'",
                        lexeme.text
                    )));
                }
            },
            None => return Err(self.unexpected("a namespace prefix")),
        };
        self.advance();
        Ok(constraint)
    }

    /// `[ns|name]` or `[ns|name op value]`
    fn parse_attribute(&mut self) -> ParseResult<Selector> {
        let _ = self.expect(TokenKind::LeftBracket, "'['")?;

        let mut namespace = None;
        match self.kind() {
            Some(TokenKind::Pipe) => self.advance(),
            Some(TokenKind::Identifier | TokenKind::Star)
                if matches!(self.peek_next(), Some((TokenKind::Pipe, false))) =>
            {
                namespace = match self.namespace_for_prefix()? {
                    NamespaceConstraint::Uri(uri) => Some(uri),
                    _ => Some("*".to_string()),
                };
                self.advance();
            }
            _ => {}
        }
        let name = self.expect_ident("an attribute name")?;
        let attribute = AttributeSelector { namespace, name };

        let operator = match self.kind() {
            Some(TokenKind::RightBracket) => {
                self.advance();
                return Ok(Selector::Attribute(attribute));
            }
            Some(TokenKind::Equal) => AttributeOperator::Equal,
            Some(TokenKind::ListContains) => AttributeOperator::ListContains,
            Some(TokenKind::EqualsWithHyphen) => AttributeOperator::EqualWithHyphen,
            Some(TokenKind::StartsWith) => AttributeOperator::StartsWith,
            Some(TokenKind::EndsWith) => AttributeOperator::EndsWith,
            Some(TokenKind::Contains) => AttributeOperator::Contains,
            _ => return Err(self.unexpected("an attribute operator or ']'")),
        };
        self.advance();

        let value = match self.current.take() {
            Some(lexeme) if lexeme.is(TokenKind::String) => {
                lexeme.text_value().unwrap_or(&lexeme.text).to_string()
            }
            Some(lexeme) if lexeme.is(TokenKind::Identifier) || lexeme.kind.is_numeric() => {
                lexeme.text
            }
            other => {
                self.current = other;
                return Err(self.unexpected("an attribute value"));
            }
        };
        self.advance();
        let _ = self.expect(TokenKind::RightBracket, "']'")?;

        Ok(Selector::AttributeOperator {
            operator,
            attribute,
            value,
        })
    }

    /// `:nth-child(an+b)` and relatives; the opener is the lookahead.
    fn parse_nth(&mut self, kind: NthKind) -> ParseResult<Selector> {
        self.advance();
        let text = match self.current.take() {
            Some(lexeme) if lexeme.is(TokenKind::Nth) => lexeme.text,
            other => {
                self.current = other;
                return Err(self.unexpected("an nth expression"));
            }
        };
        let Some((modulus, remainder)) = parse_an_plus_b(&text) else {
            return Err(self.syntax_error(format!("invalid nth expression '{text}'")));
        };
        self.advance();
        let _ = self.expect(TokenKind::RightParen, "')' after nth expression")?;
        Ok(Selector::PseudoClassFunction {
            kind,
            modulus,
            remainder,
        })
    }

    /// `:not(compound)`; the opener is the lookahead.
    fn parse_not(&mut self) -> ParseResult<Selector> {
        self.advance();
        let mut inner = self.parse_compound_selector()?;
        let _ = self.expect(TokenKind::RightParen, "')' after :not argument")?;

        // `:not(.x)` keeps just the condition.
        let negated = if inner.is_universal()
            && inner.pseudo_element.is_none()
            && inner.attribute_expressions.len() == 1
        {
            inner
                .attribute_expressions
                .pop()
                .unwrap_or_else(|| Selector::Type(TypeSelector::universal()))
        } else {
            Selector::Type(inner)
        };
        Ok(Selector::Not(Box::new(negated)))
    }
}

/// Parse a standalone selector such as `window > button.primary:hover`.
///
/// # Errors
///
/// Returns the first lex or syntax error.
pub fn parse_selector(text: &str) -> Result<Selector, StyleError> {
    let loader = super::loader::MemoryLoader::new();
    let mut parser = StylesheetParser::new(&loader);
    parser.start(text, 0, Origin::Application, None);
    let selector = parser.parse_complex_selector()?;
    if parser.current.is_some() {
        return Err(parser.unexpected("end of selector"));
    }
    Ok(selector)
}

/// Lexemes that can begin a compound selector.
const fn starts_compound(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::Star
            | TokenKind::Pipe
            | TokenKind::Class
            | TokenKind::Id
            | TokenKind::LeftBracket
            | TokenKind::Colon
            | TokenKind::DoubleColon
            | TokenKind::NotPseudoClass
    ) || kind.is_nth_function()
        || structural_predicate(kind).is_some()
        || pseudo_element_name(kind).is_some()
}

const fn structural_predicate(kind: TokenKind) -> Option<PseudoClassPredicate> {
    Some(match kind {
        TokenKind::RootPseudoClass => PseudoClassPredicate::Root,
        TokenKind::FirstChildPseudoClass => PseudoClassPredicate::FirstChild,
        TokenKind::LastChildPseudoClass => PseudoClassPredicate::LastChild,
        TokenKind::FirstOfTypePseudoClass => PseudoClassPredicate::FirstOfType,
        TokenKind::LastOfTypePseudoClass => PseudoClassPredicate::LastOfType,
        TokenKind::OnlyChildPseudoClass => PseudoClassPredicate::OnlyChild,
        TokenKind::OnlyOfTypePseudoClass => PseudoClassPredicate::OnlyOfType,
        TokenKind::EmptyPseudoClass => PseudoClassPredicate::Empty,
        _ => return None,
    })
}

const fn pseudo_element_name(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::FirstLinePseudoElement => Some("first-line"),
        TokenKind::FirstLetterPseudoElement => Some("first-letter"),
        TokenKind::BeforePseudoElement => Some("before"),
        TokenKind::AfterPseudoElement => Some("after"),
        _ => None,
    }
}

const fn nth_kind(kind: TokenKind) -> Option<NthKind> {
    match kind {
        TokenKind::NthChildPseudoClass => Some(NthKind::NthChild),
        TokenKind::NthLastChildPseudoClass => Some(NthKind::NthLastChild),
        TokenKind::NthOfTypePseudoClass => Some(NthKind::NthOfType),
        TokenKind::NthLastOfTypePseudoClass => Some(NthKind::NthLastOfType),
        _ => None,
    }
}

/// Decoded name of a `.class` or `#id` lexeme.
fn simple_name(lexeme: &Lexeme, sigil: char) -> String {
    lexeme
        .text_value()
        .map_or_else(|| lexeme.text.trim_start_matches(sigil).to_string(), str::to_string)
}

/// A media feature number: lengths in points, anything else as written.
fn media_number(lexeme: &Lexeme) -> Option<f64> {
    match lexeme.kind {
        TokenKind::Length | TokenKind::Ems | TokenKind::Exs => {
            Dimension::from_lexeme(lexeme).map(Dimension::to_points)
        }
        _ => lexeme.number(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MemoryLoader;

    fn parse(source: &str) -> Stylesheet {
        StylesheetParser::new(&MemoryLoader::new()).parse(source, Origin::Application, None)
    }

    #[test]
    fn test_selector_list_shares_declarations() {
        let sheet = parse("button, label { color: red; }");
        let rule_sets = sheet.rule_sets();
        assert_eq!(rule_sets.len(), 2);
        assert!(Arc::ptr_eq(
            rule_sets[0].shared_declarations(),
            rule_sets[1].shared_declarations()
        ));
        assert_eq!(rule_sets[0].source_order(), 0);
        assert_eq!(rule_sets[1].source_order(), 1);
    }

    #[test]
    fn test_descendant_needs_whitespace() {
        let compound = parse_selector("button.primary").ok();
        assert!(matches!(compound, Some(Selector::Type(_))));

        let descendant = parse_selector("window .primary").ok();
        assert!(matches!(
            descendant,
            Some(Selector::Combinator {
                kind: Combinator::Descendant,
                ..
            })
        ));
    }

    #[test]
    fn test_bad_declaration_is_dropped_alone() {
        let sheet = parse("button { color red; opacity: 0.5; }");
        assert_eq!(sheet.errors().len(), 1);
        let declarations = sheet.rule_sets()[0].declarations();
        assert_eq!(declarations.len(), 1);
        assert!(declarations.contains("opacity"));
    }

    #[test]
    fn test_unknown_at_rule_is_a_lex_error() {
        let sheet = parse("@bogus foo; button { color: red; }");
        assert_eq!(sheet.rule_sets().len(), 1);
        assert!(matches!(sheet.errors(), [StyleError::Lex { .. }]));
    }

    #[test]
    fn test_inline_style() {
        let sheet = StylesheetParser::new(&MemoryLoader::new()).parse_inline("color: red; opacity: 1");
        assert_eq!(sheet.origin(), Origin::Inline);
        assert_eq!(sheet.rule_sets()[0].declarations().len(), 2);
        assert!(sheet.errors().is_empty());
    }

    #[test]
    fn test_inline_stray_brace_is_skipped() {
        let sheet =
            StylesheetParser::new(&MemoryLoader::new()).parse_inline("color: red; } opacity: 1");
        let declarations = sheet.rule_sets()[0].declarations();
        assert_eq!(declarations.len(), 2);
        assert!(declarations.get("opacity").is_some());
        assert!(matches!(sheet.errors(), [StyleError::Syntax { .. }]));
    }
}
