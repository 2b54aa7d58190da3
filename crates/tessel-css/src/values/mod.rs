//! Typed property values.
//!
//! - [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//! - [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/)
//! - [CSS Animations Level 1](https://www.w3.org/TR/css-animations-1/)
//! - [CSS Transforms Level 1](https://www.w3.org/TR/css-transforms-1/)
//! - [CSS Text Level 3](https://www.w3.org/TR/css-text-3/)

mod animation;
mod color;
mod dimension;
mod paint;
mod registry;
mod text;
mod transform;
mod value_lexer;

use serde::Serialize;

pub use animation::{
    AnimationDirection, AnimationFillMode, AnimationInfo, AnimationPlayState, TimingFunction,
    TransitionInfo, parse_animation_info, parse_seconds, parse_timing_function,
    parse_transition_info,
};
pub use color::{Color, parse_color};
pub use dimension::{
    BorderRadii, DEFAULT_FONT_SIZE, Dimension, DimensionUnit, Offsets, Size, parse_border_radius,
    parse_dimension, parse_offsets, parse_size,
};
pub use paint::{
    BorderInfo, BorderStyle, GradientStop, LinearGradient, Paint, RadialGradient, Shadow,
    parse_border, parse_border_style, parse_paint, parse_shadow,
};
pub use registry::{ParsedValue, ValueParser, ValueParserRegistry};
pub use text::{LineBreakMode, TextAlignment, TextBorderStyle, TextTransform};
pub use transform::{Transform, parse_transform};
pub use value_lexer::ValueLexer;

/// A parsed property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Value {
    /// A number.
    Float(f64),
    /// `true`/`yes` or `false`/`no`.
    Boolean(bool),
    /// Unquoted string text.
    String(String),
    /// An identifier.
    Name(String),
    /// A resource location.
    Url(String),
    /// A color.
    Color(Color),
    /// A number with a unit.
    Dimension(Dimension),
    /// Width and height.
    Size(Size),
    /// Four edges.
    Offsets(Offsets),
    /// Four corner radii.
    BorderRadii(BorderRadii),
    /// A fill or stroke.
    Paint(Paint),
    /// A shadow group; empty for `none`.
    Shadow(Vec<Shadow>),
    /// The `border` shorthand.
    Border(BorderInfo),
    /// A border style keyword.
    BorderStyle(BorderStyle),
    /// One animation descriptor.
    Animation(AnimationInfo),
    /// One transition descriptor.
    Transition(TransitionInfo),
    /// An easing function.
    TimingFunction(TimingFunction),
    /// An animation direction.
    AnimationDirection(AnimationDirection),
    /// An animation fill mode.
    AnimationFillMode(AnimationFillMode),
    /// An animation play state.
    AnimationPlayState(AnimationPlayState),
    /// A 2D transform.
    Transform(Transform),
    /// A line break mode keyword.
    LineBreakMode(LineBreakMode),
    /// A text alignment keyword.
    TextAlignment(TextAlignment),
    /// A text field border style keyword.
    TextBorderStyle(TextBorderStyle),
    /// A text transform keyword.
    TextTransform(TextTransform),
    /// A comma-separated list.
    List(Vec<Value>),
}

impl Value {
    /// The number held by a float.
    #[must_use]
    pub fn into_float(self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(value),
            _ => None,
        }
    }

    /// The elements of a list; any other value is a list of one.
    #[must_use]
    pub fn into_list(self) -> Vec<Self> {
        match self {
            Self::List(values) => values,
            other => vec![other],
        }
    }
}
