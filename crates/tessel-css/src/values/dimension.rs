//! Dimensions and the geometry built from them.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

use std::f64::consts::PI;

use serde::Serialize;
use strum_macros::Display;

use super::ValueLexer;
use crate::lexer::{Lexeme, TokenKind};

/// Font size that `em` and `ex` are relative to, in points.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Unit of a [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DimensionUnit {
    /// `pt`, the native unit.
    #[default]
    Points,
    /// `px`, equal to points.
    Pixels,
    /// `dpx`, a device pixel; equal to points at scale 1.
    DevicePixels,
    /// `cm`
    Centimeters,
    /// `mm`
    Millimeters,
    /// `in`
    Inches,
    /// `pc`
    Picas,
    /// `em`
    Ems,
    /// `ex`
    Exs,
    /// `%`
    Percent,
    /// `deg`
    Degrees,
    /// `rad`
    Radians,
    /// `grad`
    Gradians,
    /// `ms`
    Milliseconds,
    /// `s`
    Seconds,
    /// `hz`
    Hertz,
    /// `khz`
    Kilohertz,
    /// No unit.
    Number,
}

impl DimensionUnit {
    /// The unit for a lowercased unit suffix.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "pt" => Self::Points,
            "px" => Self::Pixels,
            "dpx" => Self::DevicePixels,
            "cm" => Self::Centimeters,
            "mm" => Self::Millimeters,
            "in" => Self::Inches,
            "pc" => Self::Picas,
            "em" => Self::Ems,
            "ex" => Self::Exs,
            "%" => Self::Percent,
            "deg" => Self::Degrees,
            "rad" => Self::Radians,
            "grad" => Self::Gradians,
            "ms" => Self::Milliseconds,
            "s" => Self::Seconds,
            "hz" => Self::Hertz,
            "khz" => Self::Kilohertz,
            _ => return None,
        })
    }

    /// Whether the unit measures length.
    #[must_use]
    pub const fn is_length(self) -> bool {
        matches!(
            self,
            Self::Points
                | Self::Pixels
                | Self::DevicePixels
                | Self::Centimeters
                | Self::Millimeters
                | Self::Inches
                | Self::Picas
                | Self::Ems
                | Self::Exs
        )
    }

    /// Whether the unit measures an angle.
    #[must_use]
    pub const fn is_angle(self) -> bool {
        matches!(self, Self::Degrees | Self::Radians | Self::Gradians)
    }
}

/// [§ 4 Numeric data types](https://www.w3.org/TR/css-values-4/#numeric-types):
/// a number with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Dimension {
    /// The magnitude.
    pub number: f64,
    /// The unit.
    pub unit: DimensionUnit,
}

impl Dimension {
    /// Zero points.
    pub const ZERO: Self = Self::points(0.0);

    /// A dimension with an explicit unit.
    #[must_use]
    pub const fn new(number: f64, unit: DimensionUnit) -> Self {
        Self { number, unit }
    }

    /// A length in points.
    #[must_use]
    pub const fn points(number: f64) -> Self {
        Self::new(number, DimensionUnit::Points)
    }

    /// The dimension of a numeric lexeme.
    #[must_use]
    pub fn from_lexeme(lexeme: &Lexeme) -> Option<Self> {
        let number = lexeme.number()?;
        let unit = match lexeme.kind {
            TokenKind::Number => DimensionUnit::Number,
            TokenKind::Percentage => DimensionUnit::Percent,
            _ => DimensionUnit::from_suffix(lexeme.unit()?)?,
        };
        Some(Self::new(number, unit))
    }

    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    ///
    /// The length in points ("1in = 72pt"). Unitless numbers count as
    /// points; percentages and non-lengths are 0.
    #[must_use]
    pub fn to_points(self) -> f64 {
        match self.unit {
            DimensionUnit::Points
            | DimensionUnit::Pixels
            | DimensionUnit::DevicePixels
            | DimensionUnit::Number => self.number,
            DimensionUnit::Inches => self.number * 72.0,
            DimensionUnit::Centimeters => self.number * 72.0 / 2.54,
            DimensionUnit::Millimeters => self.number * 72.0 / 25.4,
            DimensionUnit::Picas => self.number * 12.0,
            DimensionUnit::Ems => self.number * DEFAULT_FONT_SIZE,
            DimensionUnit::Exs => self.number * DEFAULT_FONT_SIZE / 2.0,
            _ => 0.0,
        }
    }

    /// [§ 7.1 Angle units](https://www.w3.org/TR/css-values-4/#angles)
    ///
    /// The angle in degrees. Unitless numbers count as degrees.
    #[must_use]
    pub fn to_degrees(self) -> f64 {
        match self.unit {
            DimensionUnit::Degrees | DimensionUnit::Number => self.number,
            DimensionUnit::Radians => self.number * 180.0 / PI,
            DimensionUnit::Gradians => self.number * 0.9,
            _ => 0.0,
        }
    }

    /// The angle in radians.
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.to_degrees().to_radians()
    }

    /// The duration in seconds. Unitless numbers count as seconds.
    #[must_use]
    pub fn to_seconds(self) -> f64 {
        match self.unit {
            DimensionUnit::Seconds | DimensionUnit::Number => self.number,
            DimensionUnit::Milliseconds => self.number / 1000.0,
            _ => 0.0,
        }
    }
}

/// A width and a height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: Dimension,
    /// Vertical extent.
    pub height: Dimension,
}

/// Four edge offsets, as used by padding, margins and insets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Offsets {
    /// Top edge.
    pub top: Dimension,
    /// Right edge.
    pub right: Dimension,
    /// Bottom edge.
    pub bottom: Dimension,
    /// Left edge.
    pub left: Dimension,
}

impl Offsets {
    /// [§ 1.3 Shorthand properties](https://www.w3.org/TR/css-cascade-4/#shorthand):
    /// one value applies to all edges, two to vertical then horizontal, three
    /// to top, horizontal, bottom, four clockwise from the top.
    #[must_use]
    pub fn from_shorthand(values: &[Dimension]) -> Option<Self> {
        let (top, right, bottom, left) = match *values {
            [all] => (all, all, all, all),
            [vertical, horizontal] => (vertical, horizontal, vertical, horizontal),
            [top, horizontal, bottom] => (top, horizontal, bottom, horizontal),
            [top, right, bottom, left] => (top, right, bottom, left),
            _ => return None,
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

/// [§ 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius):
/// the radii of the four corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderRadii {
    /// Top-left corner.
    pub top_left: Size,
    /// Top-right corner.
    pub top_right: Size,
    /// Bottom-right corner.
    pub bottom_right: Size,
    /// Bottom-left corner.
    pub bottom_left: Size,
}

/// Parse one numeric lexeme as a dimension.
pub fn parse_dimension(cursor: &mut ValueLexer<'_>) -> Option<Dimension> {
    let lexeme = cursor.peek()?;
    if !lexeme.kind.is_numeric() {
        return None;
    }
    let Some(dimension) = Dimension::from_lexeme(lexeme) else {
        cursor.error(format!("unknown unit in '{}'", lexeme.text));
        return None;
    };
    let _ = cursor.next_lexeme();
    Some(dimension)
}

/// Consecutive dimensions, at most `limit`.
pub(crate) fn parse_dimensions(cursor: &mut ValueLexer<'_>, limit: usize) -> Vec<Dimension> {
    let mut dimensions = Vec::new();
    while dimensions.len() < limit {
        match parse_dimension(cursor) {
            Some(dimension) => dimensions.push(dimension),
            None => break,
        }
    }
    dimensions
}

/// `<width> [<height>]`; one value fills both.
pub fn parse_size(cursor: &mut ValueLexer<'_>) -> Option<Size> {
    let width = parse_dimension(cursor)?;
    let height = parse_dimension(cursor).unwrap_or(width);
    Some(Size { width, height })
}

/// One to four dimensions in shorthand order.
pub fn parse_offsets(cursor: &mut ValueLexer<'_>) -> Option<Offsets> {
    Offsets::from_shorthand(&parse_dimensions(cursor, 4))
}

/// `<horizontal>{1,4} [ / <vertical>{1,4} ]`
pub fn parse_border_radius(cursor: &mut ValueLexer<'_>) -> Option<BorderRadii> {
    let horizontal = Offsets::from_shorthand(&parse_dimensions(cursor, 4))?;
    let vertical = if cursor.eat(TokenKind::Slash) {
        let vertical = Offsets::from_shorthand(&parse_dimensions(cursor, 4));
        if vertical.is_none() {
            cursor.error("expected vertical radii after '/'");
        }
        vertical?
    } else {
        horizontal
    };

    // Offsets order is top, right, bottom, left; corners go clockwise from
    // the top-left.
    let corner = |h: Dimension, v: Dimension| Size {
        width: h,
        height: v,
    };
    Some(BorderRadii {
        top_left: corner(horizontal.top, vertical.top),
        top_right: corner(horizontal.right, vertical.right),
        bottom_right: corner(horizontal.bottom, vertical.bottom),
        bottom_left: corner(horizontal.left, vertical.left),
    })
}
