//! Declarations keep their raw lexemes; typed values are computed on demand
//! by the value parsers.

use std::sync::Arc;

use crate::error::{SourceLocation, StyleError, ValueError};
use crate::lexer::{Lexeme, StylesheetLexer, TokenKind};
use crate::values::{
    AnimationInfo, BorderInfo, Color, Dimension, LineBreakMode, Offsets, Paint, ParsedValue,
    Shadow, Size, TextAlignment, TextBorderStyle, TextTransform, Transform, TransitionInfo, Value,
    ValueParserRegistry,
};

/// `name: lexemes [!important]`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Property name, lowercased.
    pub name: String,
    /// Value lexemes, without the `!important` marker.
    pub lexemes: Vec<Lexeme>,
    /// Whether `!important` was given.
    pub important: bool,
    /// Where the property name appeared.
    pub location: SourceLocation,
}

impl Declaration {
    /// A declaration from already lexed value lexemes.
    #[must_use]
    pub fn new(name: &str, lexemes: Vec<Lexeme>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            lexemes,
            important: false,
            location: SourceLocation::default(),
        }
    }

    /// A declaration from value text, e.g. `("color", "red !important")`.
    #[must_use]
    pub fn from_value(name: &str, value: &str) -> Self {
        let mut lexer = StylesheetLexer::with_nesting(value, 1);
        let mut lexemes: Vec<Lexeme> = std::iter::from_fn(|| lexer.next_lexeme()).collect();
        let important = lexemes.last().is_some_and(|l| l.is(TokenKind::Important));
        if important {
            let _ = lexemes.pop();
        }
        Self {
            important,
            ..Self::new(name, lexemes)
        }
    }

    /// The value as written, normalized to single spaces.
    #[must_use]
    pub fn value_text(&self) -> String {
        let mut text = String::new();
        for (i, lexeme) in self.lexemes.iter().enumerate() {
            if i > 0 && lexeme.follows_whitespace() {
                text.push(' ');
            }
            text.push_str(&lexeme.text);
        }
        text
    }

    /// Parse the value with the named parser from `registry`.
    #[must_use]
    pub fn parse_with(&self, registry: &ValueParserRegistry, parser: &str) -> ParsedValue {
        registry.parse(parser, &self.lexemes)
    }

    /// Parse the value with the named parser from the shared registry.
    #[must_use]
    pub fn parse_as(&self, parser: &str) -> ParsedValue {
        self.parse_with(ValueParserRegistry::shared(), parser)
    }

    /// Attach this declaration's context to a value error.
    #[must_use]
    pub fn value_error(&self, error: ValueError) -> StyleError {
        StyleError::Value {
            property: self.name.clone(),
            location: SourceLocation {
                offset: error.offset,
                ..self.location.clone()
            },
            source: error,
        }
    }

    /// The value as a number; `0.0` when it is not one.
    #[must_use]
    pub fn float_value(&self) -> f64 {
        self.parse_as("float").value.and_then(Value::into_float).unwrap_or(0.0)
    }

    /// The value as a boolean (`true`/`yes`/`false`/`no`); `false` otherwise.
    #[must_use]
    pub fn boolean_value(&self) -> bool {
        matches!(self.parse_as("boolean").value, Some(Value::Boolean(true)))
    }

    /// The value as a string; strings are unquoted, anything else is
    /// returned as written.
    #[must_use]
    pub fn string_value(&self) -> String {
        match self.parse_as("string").value {
            Some(Value::String(text)) => text,
            _ => self.value_text(),
        }
    }

    /// Comma-separated identifiers.
    #[must_use]
    pub fn name_list_value(&self) -> Vec<String> {
        self.parse_as("name-list")
            .value
            .map(Value::into_list)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| match v {
                Value::Name(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// A `url(...)` or string location.
    #[must_use]
    pub fn url_value(&self) -> Option<String> {
        match self.parse_as("url").value {
            Some(Value::Url(url)) => Some(url),
            _ => None,
        }
    }

    /// A duration in seconds; `0.0` when invalid.
    #[must_use]
    pub fn seconds_value(&self) -> f64 {
        self.parse_as("seconds").value.and_then(Value::into_float).unwrap_or(0.0)
    }

    /// A color; transparent black when invalid.
    #[must_use]
    pub fn color_value(&self) -> Color {
        match self.parse_as("color").value {
            Some(Value::Color(color)) => color,
            _ => Color::TRANSPARENT,
        }
    }

    /// A dimension; zero points when invalid.
    #[must_use]
    pub fn dimension_value(&self) -> Dimension {
        match self.parse_as("dimension").value {
            Some(Value::Dimension(dimension)) => dimension,
            _ => Dimension::ZERO,
        }
    }

    /// A width and height; zero when invalid.
    #[must_use]
    pub fn size_value(&self) -> Size {
        match self.parse_as("size").value {
            Some(Value::Size(size)) => size,
            _ => Size::default(),
        }
    }

    /// Four edge offsets; zero when invalid.
    #[must_use]
    pub fn offsets_value(&self) -> Offsets {
        match self.parse_as("offsets").value {
            Some(Value::Offsets(offsets)) => offsets,
            _ => Offsets::default(),
        }
    }

    /// A paint, `None` when invalid.
    #[must_use]
    pub fn paint_value(&self) -> Option<Paint> {
        match self.parse_as("paint").value {
            Some(Value::Paint(paint)) => Some(paint),
            _ => None,
        }
    }

    /// One or more shadows, empty when invalid.
    #[must_use]
    pub fn shadow_value(&self) -> Vec<Shadow> {
        match self.parse_as("shadow").value {
            Some(Value::Shadow(shadows)) => shadows,
            _ => Vec::new(),
        }
    }

    /// Border width, style and paint; style `none` when invalid.
    #[must_use]
    pub fn border_value(&self) -> BorderInfo {
        match self.parse_as("border").value {
            Some(Value::Border(border)) => border,
            _ => BorderInfo::default(),
        }
    }

    /// Animation descriptors, empty when invalid.
    #[must_use]
    pub fn animation_info_list(&self) -> Vec<AnimationInfo> {
        self.parse_as("animation-info")
            .value
            .map(Value::into_list)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| match v {
                Value::Animation(info) => Some(info),
                _ => None,
            })
            .collect()
    }

    /// Transition descriptors, empty when invalid.
    #[must_use]
    pub fn transition_info_list(&self) -> Vec<TransitionInfo> {
        self.parse_as("transition-info")
            .value
            .map(Value::into_list)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| match v {
                Value::Transition(info) => Some(info),
                _ => None,
            })
            .collect()
    }

    /// A 2D affine transform; identity when invalid.
    #[must_use]
    pub fn transform_value(&self) -> Transform {
        match self.parse_as("transform").value {
            Some(Value::Transform(transform)) => transform,
            _ => Transform::IDENTITY,
        }
    }

    /// Line break mode, truncating the tail when invalid.
    #[must_use]
    pub fn line_break_mode_value(&self) -> LineBreakMode {
        match self.parse_as("line-break-mode").value {
            Some(Value::LineBreakMode(mode)) => mode,
            _ => LineBreakMode::default(),
        }
    }

    /// Text alignment, `left` when invalid.
    #[must_use]
    pub fn text_alignment_value(&self) -> TextAlignment {
        match self.parse_as("text-alignment").value {
            Some(Value::TextAlignment(alignment)) => alignment,
            _ => TextAlignment::default(),
        }
    }

    /// Text field border style, `none` when invalid.
    #[must_use]
    pub fn text_border_style_value(&self) -> TextBorderStyle {
        match self.parse_as("text-border-style").value {
            Some(Value::TextBorderStyle(style)) => style,
            _ => TextBorderStyle::default(),
        }
    }

    /// `text` with this declaration's `text-transform` keyword applied;
    /// unchanged when the keyword is invalid.
    #[must_use]
    pub fn transform_string(&self, text: &str) -> String {
        match self.parse_as("text-transform").value {
            Some(Value::TextTransform(transform)) => transform.apply(text),
            _ => text.to_string(),
        }
    }
}

/// An ordered set of declarations with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationContainer {
    declarations: Vec<Declaration>,
}

impl DeclarationContainer {
    /// An empty container.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Add a declaration, replacing an earlier one with the same name
    /// unless the earlier one is important and the new one is not.
    pub fn add(&mut self, declaration: Declaration) {
        match self
            .declarations
            .iter_mut()
            .find(|d| d.name == declaration.name)
        {
            Some(existing) => {
                if declaration.important || !existing.important {
                    *existing = declaration;
                }
            }
            None => self.declarations.push(declaration),
        }
    }

    /// Look up a declaration by (lowercase) name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Remove a declaration by name.
    pub fn remove(&mut self, name: &str) -> Option<Declaration> {
        let index = self.declarations.iter().position(|d| d.name == name)?;
        Some(self.declarations.remove(index))
    }

    /// Whether a declaration with `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether there are no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl FromIterator<Declaration> for DeclarationContainer {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut container = Self::new();
        for declaration in iter {
            container.add(declaration);
        }
        container
    }
}

impl<'a> IntoIterator for &'a DeclarationContainer {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}

/// Shared so that every rule set of a selector list points at one container.
pub type SharedDeclarations = Arc<DeclarationContainer>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value_strips_important() {
        let declaration = Declaration::from_value("Color", "red !important");
        assert_eq!(declaration.name, "color");
        assert!(declaration.important);
        assert_eq!(declaration.value_text(), "red");
    }

    #[test]
    fn test_container_keeps_important_over_later_normal() {
        let mut container = DeclarationContainer::new();
        container.add(Declaration::from_value("color", "red !important"));
        container.add(Declaration::from_value("color", "blue"));
        assert_eq!(container.len(), 1);
        assert_eq!(container.get("color").map(Declaration::value_text), Some("red".to_string()));
    }

    #[test]
    fn test_value_text_keeps_spacing() {
        let declaration = Declaration::from_value("border", "1px  solid   rgb(0,0,0)");
        assert_eq!(declaration.value_text(), "1px solid rgb(0,0,0)");
    }
}
