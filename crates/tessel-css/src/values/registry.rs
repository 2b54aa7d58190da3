//! Named value parsers.
//!
//! Declarations keep raw lexemes; consumers ask for a value by parser
//! name (`"color"`, `"paint"`, ...) when they need it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::trace;

use super::animation::{
    AnimationDirection, AnimationFillMode, AnimationPlayState, parse_animation_info, parse_keyword,
    parse_seconds, parse_timing_function, parse_transition_info,
};
use super::color::{parse_color, starts_color};
use super::dimension::{parse_border_radius, parse_dimension, parse_offsets, parse_size};
use super::paint::{parse_border, parse_border_style, parse_paint, parse_shadow, starts_paint};
use super::text::{LineBreakMode, TextAlignment, TextBorderStyle, TextTransform};
use super::transform::parse_transform;
use super::{Value, ValueLexer};
use crate::error::ValueError;
use crate::lexer::{Lexeme, TokenKind};

/// A grammar for one kind of value.
pub trait ValueParser: Send + Sync {
    /// Whether the lexeme under the cursor can start this value.
    fn can_parse(&self, cursor: &ValueLexer<'_>) -> bool {
        !cursor.is_at_end()
    }

    /// Parse a value, recording problems on the cursor.
    fn parse(&self, cursor: &mut ValueLexer<'_>) -> Option<Value>;
}

/// The outcome of a parse: the value, if one could be built, and every
/// problem found on the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedValue {
    /// The parsed value.
    pub value: Option<Value>,
    /// Recoverable problems.
    pub errors: Vec<ValueError>,
}

impl ParsedValue {
    /// Whether a value was produced without problems.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.value.is_some() && self.errors.is_empty()
    }
}

/// A built-in parser from a pair of functions.
struct BuiltinParser {
    can_parse: fn(&ValueLexer<'_>) -> bool,
    parse: fn(&mut ValueLexer<'_>) -> Option<Value>,
}

impl ValueParser for BuiltinParser {
    fn can_parse(&self, cursor: &ValueLexer<'_>) -> bool {
        (self.can_parse)(cursor)
    }

    fn parse(&self, cursor: &mut ValueLexer<'_>) -> Option<Value> {
        (self.parse)(cursor)
    }
}

/// A comma-separated list of another parser's values.
struct ListParser {
    element: Arc<dyn ValueParser>,
}

impl ValueParser for ListParser {
    fn can_parse(&self, cursor: &ValueLexer<'_>) -> bool {
        self.element.can_parse(cursor)
    }

    fn parse(&self, cursor: &mut ValueLexer<'_>) -> Option<Value> {
        let mut values = Vec::new();
        for segment in cursor.split_commas() {
            let mut inner = ValueLexer::new(segment);
            if !self.element.can_parse(&inner) {
                inner.error("unexpected value in list");
            } else if let Some(value) = self.element.parse(&mut inner) {
                if !inner.is_at_end() {
                    inner.error("unexpected trailing value in list item");
                }
                values.push(value);
            }
            cursor.errors_mut().extend(inner.into_errors());
        }
        (!values.is_empty()).then_some(Value::List(values))
    }
}

/// Parsers by name.
///
/// [`shared`](Self::shared) is a process-wide registry with the built-in
/// parsers. Hosts that add parsers build their own with
/// [`with_builtins`](Self::with_builtins) and [`register`](Self::register).
#[derive(Clone, Default)]
pub struct ValueParserRegistry {
    parsers: HashMap<String, Arc<dyn ValueParser>>,
}

impl fmt::Debug for ValueParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ValueParserRegistry")
            .field("parsers", &names)
            .finish()
    }
}

impl ValueParserRegistry {
    /// A registry with no parsers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry of built-in parsers.
    #[must_use]
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<ValueParserRegistry> = OnceLock::new();
        SHARED.get_or_init(Self::with_builtins)
    }

    /// A registry with every built-in parser.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, can_parse, parse) in BUILTINS {
            registry.register(name, BuiltinParser { can_parse, parse });
        }
        for (name, element) in BUILTIN_LISTS {
            if let Some(element) = registry.parsers.get(element).cloned() {
                registry.register(name, ListParser { element });
            }
        }
        registry
    }

    /// Add or replace the parser called `name`.
    pub fn register(&mut self, name: &str, parser: impl ValueParser + 'static) {
        let _ = self.parsers.insert(name.to_string(), Arc::new(parser));
    }

    /// The parser called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ValueParser> {
        self.parsers.get(name).map(AsRef::as_ref)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse `lexemes` with the parser called `name`. Leftover lexemes are
    /// reported but do not discard the value.
    #[must_use]
    pub fn parse(&self, name: &str, lexemes: &[Lexeme]) -> ParsedValue {
        let Some(parser) = self.parsers.get(name) else {
            return ParsedValue {
                value: None,
                errors: vec![ValueError::new(format!("unknown value parser '{name}'"), 0)],
            };
        };

        let mut cursor = ValueLexer::new(lexemes);
        let value = if parser.can_parse(&cursor) {
            parser.parse(&mut cursor)
        } else {
            None
        };

        if value.is_some() && !cursor.is_at_end() {
            cursor.error(format!("unexpected trailing value for {name}"));
        }
        if value.is_none() && cursor.errors().is_empty() {
            cursor.error(format!("expected {name}"));
        }

        trace!(parser = name, ok = value.is_some(), "parsed value");
        ParsedValue {
            value,
            errors: cursor.into_errors(),
        }
    }

    /// Parse a comma-separated list whose elements use the parser called
    /// `element_name`.
    #[must_use]
    pub fn parse_list(&self, element_name: &str, lexemes: &[Lexeme]) -> ParsedValue {
        let Some(element) = self.parsers.get(element_name).cloned() else {
            return ParsedValue {
                value: None,
                errors: vec![ValueError::new(
                    format!("unknown value parser '{element_name}'"),
                    0,
                )],
            };
        };
        let list = ListParser { element };
        let mut cursor = ValueLexer::new(lexemes);
        let value = list.parse(&mut cursor);
        ParsedValue {
            value,
            errors: cursor.into_errors(),
        }
    }
}

type CanParse = fn(&ValueLexer<'_>) -> bool;
type Parse = fn(&mut ValueLexer<'_>) -> Option<Value>;

const BUILTINS: [(&str, CanParse, Parse); 29] = [
    ("float", at_numeric, float),
    ("number", at_numeric, float),
    ("boolean", at_ident, boolean),
    ("name", at_ident, name),
    ("string", at_text, string),
    ("url", at_text, url),
    ("seconds", at_numeric, seconds),
    ("color", starts_color, color),
    ("dimension", at_numeric, dimension),
    ("length", at_numeric, dimension),
    ("size", at_numeric, size),
    ("offsets", at_numeric, offsets),
    ("insets", at_numeric, offsets),
    ("border-radius", at_numeric, border_radius),
    ("paint", starts_paint, paint),
    ("shadow", not_empty, shadow_group),
    ("border", not_empty, border),
    ("border-style", at_ident, border_style),
    ("animation-info", not_empty, animation_info),
    ("transition-info", not_empty, transition_info),
    ("timing-function", at_ident, timing_function),
    ("direction", at_ident, direction),
    ("fill-mode", at_ident, fill_mode),
    ("play-state", at_ident, play_state),
    ("transform", not_empty, transform),
    ("line-break-mode", at_ident, line_break_mode),
    ("text-alignment", at_ident, text_alignment),
    ("text-border-style", at_ident, text_border_style),
    ("text-transform", at_ident, text_transform),
];

/// List parsers and the element parser each one repeats.
const BUILTIN_LISTS: [(&str, &str); 9] = [
    ("float-list", "float"),
    ("name-list", "name"),
    ("seconds-list", "seconds"),
    ("paint-list", "paint"),
    ("border-style-list", "border-style"),
    ("animation-timing-function", "timing-function"),
    ("animation-direction", "direction"),
    ("animation-fill-mode", "fill-mode"),
    ("animation-play-state", "play-state"),
];

fn not_empty(cursor: &ValueLexer<'_>) -> bool {
    !cursor.is_at_end()
}

fn at_numeric(cursor: &ValueLexer<'_>) -> bool {
    cursor.peek_kind().is_some_and(TokenKind::is_numeric)
}

fn at_ident(cursor: &ValueLexer<'_>) -> bool {
    cursor.peek().is_some_and(|l| l.ident().is_some())
}

fn at_text(cursor: &ValueLexer<'_>) -> bool {
    at_ident(cursor)
        || matches!(
            cursor.peek_kind(),
            Some(TokenKind::String | TokenKind::Url)
        )
}

fn float(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    cursor.next_lexeme()?.number().map(Value::Float)
}

fn boolean(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    let word = cursor.ident()?;
    match word.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(Value::Boolean(true)),
        "false" | "no" => Some(Value::Boolean(false)),
        _ => {
            cursor.error(format!("'{word}' is not a boolean"));
            None
        }
    }
}

fn name(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    cursor.ident().map(|n| Value::Name(n.to_string()))
}

fn string(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    let lexeme = cursor.next_lexeme()?;
    let text = lexeme.text_value().unwrap_or(&lexeme.text);
    Some(Value::String(text.to_string()))
}

fn url(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    let lexeme = cursor.next_lexeme()?;
    let text = lexeme.text_value().unwrap_or(&lexeme.text);
    Some(Value::Url(text.to_string()))
}

fn seconds(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_seconds(cursor).map(Value::Float)
}

fn color(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_color(cursor).map(Value::Color)
}

fn dimension(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_dimension(cursor).map(Value::Dimension)
}

fn size(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_size(cursor).map(Value::Size)
}

fn offsets(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_offsets(cursor).map(Value::Offsets)
}

fn border_radius(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_border_radius(cursor).map(Value::BorderRadii)
}

fn paint(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_paint(cursor).map(Value::Paint)
}

/// Shadows separated by commas.
fn shadow_group(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    if cursor.eat_ident("none") {
        return Some(Value::Shadow(Vec::new()));
    }
    let mut shadows = Vec::new();
    loop {
        shadows.push(parse_shadow(cursor)?);
        if !cursor.eat(TokenKind::Comma) {
            break;
        }
    }
    Some(Value::Shadow(shadows))
}

fn border(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_border(cursor).map(Value::Border)
}

fn border_style(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_border_style(cursor).map(Value::BorderStyle)
}

fn animation_info(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    each_segment(cursor, |segment| {
        parse_animation_info(segment).map(Value::Animation)
    })
}

fn transition_info(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    each_segment(cursor, |segment| {
        parse_transition_info(segment).map(Value::Transition)
    })
}

fn timing_function(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_timing_function(cursor).map(Value::TimingFunction)
}

fn direction(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_keyword::<AnimationDirection>(cursor).map(Value::AnimationDirection)
}

fn fill_mode(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_keyword::<AnimationFillMode>(cursor).map(Value::AnimationFillMode)
}

fn play_state(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_keyword::<AnimationPlayState>(cursor).map(Value::AnimationPlayState)
}

fn transform(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_transform(cursor).map(Value::Transform)
}

fn line_break_mode(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_keyword::<LineBreakMode>(cursor).map(Value::LineBreakMode)
}

fn text_alignment(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_keyword::<TextAlignment>(cursor).map(Value::TextAlignment)
}

fn text_border_style(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_keyword::<TextBorderStyle>(cursor).map(Value::TextBorderStyle)
}

fn text_transform(cursor: &mut ValueLexer<'_>) -> Option<Value> {
    parse_keyword::<TextTransform>(cursor).map(Value::TextTransform)
}

/// Apply `parse` to each comma-separated segment; errors from all
/// segments are kept and failed segments are skipped.
fn each_segment(
    cursor: &mut ValueLexer<'_>,
    parse: impl Fn(&mut ValueLexer<'_>) -> Option<Value>,
) -> Option<Value> {
    let mut values = Vec::new();
    for segment in cursor.split_commas() {
        let mut inner = ValueLexer::new(segment);
        if let Some(value) = parse(&mut inner) {
            values.push(value);
        }
        cursor.errors_mut().extend(inner.into_errors());
    }
    (!values.is_empty()).then_some(Value::List(values))
}
