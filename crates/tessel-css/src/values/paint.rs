//! Paints, shadows and borders.
//!
//! [CSS Images Level 3](https://www.w3.org/TR/css-images-3/) and
//! [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/)

use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::color::{Color, parse_color, starts_color};
use super::dimension::{Dimension, parse_dimension, parse_dimensions};
use super::ValueLexer;
use crate::lexer::TokenKind;

/// One color stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Stop color.
    pub color: Color,
    /// Position in `[0, 1]`; `None` spaces stops evenly.
    pub offset: Option<f64>,
}

/// [§ 3.1 Linear gradients](https://www.w3.org/TR/css-images-3/#linear-gradients)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearGradient {
    /// "The gradient line's angle of direction", in degrees; 180 is
    /// top to bottom.
    pub angle: f64,
    /// Color stops in order.
    pub stops: Vec<GradientStop>,
}

/// [§ 3.2 Radial gradients](https://www.w3.org/TR/css-images-3/#radial-gradients)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialGradient {
    /// Color stops from the center outwards.
    pub stops: Vec<GradientStop>,
}

/// What fills or strokes a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Paint {
    /// A single color.
    Solid {
        /// The color.
        color: Color,
    },
    /// A linear gradient.
    LinearGradient(LinearGradient),
    /// A radial gradient.
    RadialGradient(RadialGradient),
    /// An image by url.
    Image {
        /// Image location.
        url: String,
    },
    /// Paints layered first to last.
    Group {
        /// The layers.
        paints: Vec<Paint>,
    },
}

impl Paint {
    /// A solid paint.
    #[must_use]
    pub const fn solid(color: Color) -> Self {
        Self::Solid { color }
    }

    /// Lighten every color in the paint.
    #[must_use]
    pub fn lighten(&self, percent: f64) -> Self {
        self.map_colors(&|color| color.lighten(percent))
    }

    /// Darken every color in the paint.
    #[must_use]
    pub fn darken(&self, percent: f64) -> Self {
        self.map_colors(&|color| color.darken(percent))
    }

    /// Whether the paint covers everything beneath it.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        match self {
            Self::Solid { color } => color.a == 255,
            Self::LinearGradient(gradient) => gradient.stops.iter().all(|s| s.color.a == 255),
            Self::RadialGradient(gradient) => gradient.stops.iter().all(|s| s.color.a == 255),
            Self::Image { .. } => false,
            Self::Group { paints } => paints.iter().any(Self::is_opaque),
        }
    }

    fn map_colors(&self, f: &dyn Fn(Color) -> Color) -> Self {
        let stops = |stops: &[GradientStop]| {
            stops
                .iter()
                .map(|stop| GradientStop {
                    color: f(stop.color),
                    offset: stop.offset,
                })
                .collect()
        };
        match self {
            Self::Solid { color } => Self::solid(f(*color)),
            Self::LinearGradient(gradient) => Self::LinearGradient(LinearGradient {
                angle: gradient.angle,
                stops: stops(&gradient.stops),
            }),
            Self::RadialGradient(gradient) => Self::RadialGradient(RadialGradient {
                stops: stops(&gradient.stops),
            }),
            Self::Image { .. } => self.clone(),
            Self::Group { paints } => Self::Group {
                paints: paints.iter().map(|p| p.map_colors(f)).collect(),
            },
        }
    }
}

/// [§ 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
///
/// `<shadow> = inset? && <length>{2,4} && <color>?`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shadow {
    /// Drawn inside the shape instead of behind it.
    pub inset: bool,
    /// Horizontal offset in points. Positive = right.
    pub horizontal_offset: f64,
    /// Vertical offset in points. Positive = down.
    pub vertical_offset: f64,
    /// Blur radius in points.
    pub blur_distance: f64,
    /// Spread distance in points.
    pub spread_distance: f64,
    /// Shadow color; black when omitted.
    pub color: Color,
}

/// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BorderStyle {
    /// No border.
    #[default]
    None,
    /// Like `none`, but wins border conflicts.
    Hidden,
    /// A series of dots.
    Dotted,
    /// A series of dashes.
    Dashed,
    /// A single line.
    Solid,
    /// Two parallel lines.
    Double,
    /// Carved into the surface.
    Groove,
    /// Coming out of the surface.
    Ridge,
    /// The box looks embedded.
    Inset,
    /// The box looks raised.
    Outset,
}

/// [§ 4.4 'border' shorthand](https://www.w3.org/TR/css-backgrounds-3/#the-border-shorthands)
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BorderInfo {
    /// Stroke width.
    pub width: Dimension,
    /// Line style.
    pub style: BorderStyle,
    /// Stroke paint; `None` uses the foreground color.
    pub paint: Option<Paint>,
}

/// Parse a paint: a color, a gradient or an image url. The keyword
/// `none` is transparent.
pub fn parse_paint(cursor: &mut ValueLexer<'_>) -> Option<Paint> {
    match cursor.peek_kind()? {
        TokenKind::LinearGradient => parse_linear_gradient(cursor).map(Paint::LinearGradient),
        TokenKind::RadialGradient => parse_radial_gradient(cursor).map(Paint::RadialGradient),
        TokenKind::Url => {
            let lexeme = cursor.next_lexeme()?;
            Some(Paint::Image {
                url: lexeme.text_value().unwrap_or(&lexeme.text).to_string(),
            })
        }
        TokenKind::Keyword if cursor.eat_ident("none") => Some(Paint::solid(Color::TRANSPARENT)),
        _ => parse_color(cursor).map(Paint::solid),
    }
}

/// Whether the cursor is on something [`parse_paint`] may accept.
pub(crate) fn starts_paint(cursor: &ValueLexer<'_>) -> bool {
    matches!(
        cursor.peek_kind(),
        Some(TokenKind::LinearGradient | TokenKind::RadialGradient | TokenKind::Url)
    ) || cursor.at_ident("none")
        || starts_color(cursor)
}

/// `linear-gradient([<angle> | to <side-or-corner>,] <stop>#)`
fn parse_linear_gradient(cursor: &mut ValueLexer<'_>) -> Option<LinearGradient> {
    let _ = cursor.next_lexeme();

    let mut angle = 180.0;
    if cursor.at(TokenKind::Angle) || cursor.at(TokenKind::Number) {
        angle = parse_dimension(cursor)?.to_degrees();
        let _ = cursor.expect(TokenKind::Comma, "',' after gradient angle")?;
    } else if cursor.eat_ident("to") {
        angle = parse_side_or_corner(cursor)?;
        let _ = cursor.expect(TokenKind::Comma, "',' after gradient direction")?;
    }

    let stops = parse_gradient_stops(cursor)?;
    Some(LinearGradient { angle, stops })
}

/// [§ 3.1.1](https://www.w3.org/TR/css-images-3/#linear-gradient-syntax)
/// "to top" is 0deg, "to right" is 90deg, and so on; corners are halfway.
fn parse_side_or_corner(cursor: &mut ValueLexer<'_>) -> Option<f64> {
    let mut vertical = None;
    let mut horizontal = None;
    while let Some(side) = cursor.peek().and_then(|l| l.ident()) {
        match side.to_ascii_lowercase().as_str() {
            "top" => vertical = Some(0.0),
            "bottom" => vertical = Some(180.0),
            "left" => horizontal = Some(270.0),
            "right" => horizontal = Some(90.0),
            _ => break,
        }
        let _ = cursor.next_lexeme();
    }
    match (vertical, horizontal) {
        (Some(v), None) => Some(v),
        (None, Some(h)) => Some(h),
        // Corners average their sides, except top-left which wraps past 0.
        (Some(v), Some(h)) if v < 90.0 && h > 180.0 => Some(315.0),
        (Some(v), Some(h)) => Some(f64::midpoint(v, h)),
        (None, None) => {
            cursor.error("expected a side or corner after 'to'");
            None
        }
    }
}

/// `radial-gradient([circle | ellipse,] <stop>#)`
fn parse_radial_gradient(cursor: &mut ValueLexer<'_>) -> Option<RadialGradient> {
    let _ = cursor.next_lexeme();
    if cursor.eat_ident("circle") || cursor.eat_ident("ellipse") {
        let _ = cursor.expect(TokenKind::Comma, "',' after gradient shape")?;
    }
    let stops = parse_gradient_stops(cursor)?;
    Some(RadialGradient { stops })
}

/// `<color> [<percentage>]` separated by commas, through the closing `)`.
fn parse_gradient_stops(cursor: &mut ValueLexer<'_>) -> Option<Vec<GradientStop>> {
    let mut stops = Vec::new();
    loop {
        let Some(color) = parse_color(cursor) else {
            cursor.error("expected a gradient color stop");
            return None;
        };
        let offset = if cursor.at(TokenKind::Percentage) {
            cursor.next_lexeme().and_then(|l| l.number()).map(|p| p / 100.0)
        } else {
            None
        };
        stops.push(GradientStop { color, offset });
        if !cursor.eat(TokenKind::Comma) {
            break;
        }
    }
    let _ = cursor.expect(TokenKind::RightParen, "')' after gradient stops")?;
    Some(stops)
}

/// `[inset] <h> <v> [<blur> [<spread>]] [<color>]`, with `inset` and the
/// color allowed at either end.
pub fn parse_shadow(cursor: &mut ValueLexer<'_>) -> Option<Shadow> {
    let mut inset = cursor.eat_ident("inset");
    let leading_color = if starts_color(cursor) {
        parse_color(cursor)
    } else {
        None
    };

    let lengths: Vec<f64> = parse_dimensions(cursor, 4)
        .into_iter()
        .map(Dimension::to_points)
        .collect();
    if lengths.len() < 2 {
        cursor.error("a shadow needs horizontal and vertical offsets");
        return None;
    }

    let color = match leading_color {
        Some(color) => color,
        None if starts_color(cursor) => parse_color(cursor)?,
        None => Color::BLACK,
    };
    inset |= cursor.eat_ident("inset");

    Some(Shadow {
        inset,
        horizontal_offset: lengths[0],
        vertical_offset: lengths[1],
        blur_distance: lengths.get(2).copied().unwrap_or(0.0),
        spread_distance: lengths.get(3).copied().unwrap_or(0.0),
        color,
    })
}

/// A single border style keyword.
pub fn parse_border_style(cursor: &mut ValueLexer<'_>) -> Option<BorderStyle> {
    let style = BorderStyle::from_str(cursor.peek()?.ident()?).ok()?;
    let _ = cursor.next_lexeme();
    Some(style)
}

/// Width, style and paint in any order, each at most once.
pub fn parse_border(cursor: &mut ValueLexer<'_>) -> Option<BorderInfo> {
    let mut border = BorderInfo::default();
    let (mut has_width, mut has_style) = (false, false);
    let start = cursor.position();

    while !cursor.is_at_end() {
        if !has_width && cursor.peek_kind().is_some_and(TokenKind::is_numeric) {
            border.width = parse_dimension(cursor)?;
            has_width = true;
        } else if let Some(style) = (!has_style).then(|| parse_border_style(cursor)).flatten() {
            border.style = style;
            has_style = true;
        } else if border.paint.is_none() && starts_paint(cursor) {
            border.paint = Some(parse_paint(cursor)?);
        } else {
            break;
        }
    }

    (cursor.position() > start).then_some(border)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex_all;
    use crate::values::DimensionUnit;

    fn parse<T>(text: &str, f: fn(&mut ValueLexer<'_>) -> Option<T>) -> Option<T> {
        let lexemes = lex_all(text, 1);
        let mut cursor = ValueLexer::new(&lexemes);
        f(&mut cursor)
    }

    #[test]
    fn test_linear_gradient_direction() {
        let paint = parse("linear-gradient(to right, red, blue 80%)", parse_paint);
        let Some(Paint::LinearGradient(gradient)) = paint else {
            panic!("expected a linear gradient, got {paint:?}");
        };
        assert_eq!(gradient.angle, 90.0);
        assert_eq!(gradient.stops.len(), 2);
        assert_eq!(gradient.stops[1].offset, Some(0.8));
    }

    #[test]
    fn test_shadow_with_trailing_color_and_inset() {
        let shadow = parse("2px 3px 4px #ff0000 inset", parse_shadow);
        assert_eq!(
            shadow,
            Some(Shadow {
                inset: true,
                horizontal_offset: 2.0,
                vertical_offset: 3.0,
                blur_distance: 4.0,
                spread_distance: 0.0,
                color: Color::rgba(255, 0, 0, 255),
            })
        );
    }

    #[test]
    fn test_border_any_order() {
        let border = parse("dashed red 2px", parse_border);
        assert_eq!(
            border,
            Some(BorderInfo {
                width: Dimension::new(2.0, DimensionUnit::Pixels),
                style: BorderStyle::Dashed,
                paint: Some(Paint::solid(Color::rgba(255, 0, 0, 255))),
            })
        );
    }

    #[test]
    fn test_darken_reaches_gradient_stops() {
        let paint = parse("linear-gradient(white, white)", parse_paint);
        let darker = paint.map(|p| p.darken(100.0));
        let Some(Paint::LinearGradient(gradient)) = darker else {
            panic!("expected a gradient");
        };
        assert!(gradient.stops.iter().all(|s| s.color == Color::BLACK));
    }
}
