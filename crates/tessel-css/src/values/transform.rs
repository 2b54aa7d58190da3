//! 2D affine transforms.
//!
//! [CSS Transforms Level 1](https://www.w3.org/TR/css-transforms-1/), 2D
//! functions only.

use serde::Serialize;

use super::dimension::{Dimension, parse_dimension};
use super::ValueLexer;
use crate::lexer::TokenKind;

/// The matrix
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0  1  |
/// ```
///
/// applied to column vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    /// Row 1, column 1.
    pub a: f64,
    /// Row 2, column 1.
    pub b: f64,
    /// Row 1, column 2.
    pub c: f64,
    /// Row 2, column 2.
    pub d: f64,
    /// Horizontal translation.
    pub tx: f64,
    /// Vertical translation.
    pub ty: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// `matrix(a, b, c, d, tx, ty)`
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, c, d, tx, ty }
    }

    /// A translation.
    #[must_use]
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// A scale about the origin.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// A rotation about the origin; positive angles turn clockwise in a
    /// y-down coordinate system.
    #[must_use]
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// A skew by two angles in radians.
    #[must_use]
    pub fn skew(ax: f64, ay: f64) -> Self {
        Self::new(1.0, ay.tan(), ax.tan(), 1.0, 0.0, 0.0)
    }

    /// `self × other`: `other` is applied first, then `self`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self::new(
            self.a.mul_add(other.a, self.c * other.b),
            self.b.mul_add(other.a, self.d * other.b),
            self.a.mul_add(other.c, self.c * other.d),
            self.b.mul_add(other.c, self.d * other.d),
            self.a.mul_add(other.tx, self.c.mul_add(other.ty, self.tx)),
            self.b.mul_add(other.tx, self.d.mul_add(other.ty, self.ty)),
        )
    }

    /// Map a point.
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a.mul_add(x, self.c.mul_add(y, self.tx)),
            self.b.mul_add(x, self.d.mul_add(y, self.ty)),
        )
    }

    /// Whether this is the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// A list of transform functions, composed left to right as in
/// [§ 7 The transform-function lists](https://www.w3.org/TR/css-transforms-1/#transform-function-lists).
/// The keyword `none` is the identity.
pub fn parse_transform(cursor: &mut ValueLexer<'_>) -> Option<Transform> {
    if cursor.eat_ident("none") {
        return Some(Transform::IDENTITY);
    }
    let mut transform = Transform::IDENTITY;
    let mut any = false;
    while !cursor.is_at_end() {
        let function = parse_transform_function(cursor)?;
        transform = transform.multiply(&function);
        any = true;
    }
    any.then_some(transform)
}

fn parse_transform_function(cursor: &mut ValueLexer<'_>) -> Option<Transform> {
    let Some(name) = cursor.peek().and_then(|l| l.ident()) else {
        cursor.error("expected a transform function");
        return None;
    };
    if !cursor.at_function(name) {
        cursor.error(format!("expected '(' after '{name}'"));
        return None;
    }
    let name = name.to_ascii_lowercase();
    let _ = cursor.next_lexeme();
    let _ = cursor.next_lexeme();

    let mut args: Vec<Dimension> = Vec::new();
    while let Some(arg) = parse_dimension(cursor) {
        args.push(arg);
        let _ = cursor.eat(TokenKind::Comma);
    }
    let _ = cursor.expect(TokenKind::RightParen, "')' after transform arguments")?;

    let length = |i: usize| args.get(i).map(|d| d.to_points());
    let angle = |i: usize| args.get(i).map(|d| d.to_radians());
    let number = |i: usize| args.get(i).map(|d| d.number);

    let transform = match (name.as_str(), args.len()) {
        ("translate", 1 | 2) => {
            Transform::translate(length(0)?, length(1).unwrap_or(0.0))
        }
        ("translatex", 1) => Transform::translate(length(0)?, 0.0),
        ("translatey", 1) => Transform::translate(0.0, length(0)?),
        ("scale", 1 | 2) => {
            let sx = number(0)?;
            Transform::scale(sx, number(1).unwrap_or(sx))
        }
        ("scalex", 1) => Transform::scale(number(0)?, 1.0),
        ("scaley", 1) => Transform::scale(1.0, number(0)?),
        ("skew", 1 | 2) => Transform::skew(angle(0)?, angle(1).unwrap_or(0.0)),
        ("skewx", 1) => Transform::skew(angle(0)?, 0.0),
        ("skewy", 1) => Transform::skew(0.0, angle(0)?),
        ("rotate", 1) => Transform::rotate(angle(0)?),
        ("rotate", 3) => {
            let (cx, cy) = (length(1)?, length(2)?);
            Transform::translate(cx, cy)
                .multiply(&Transform::rotate(angle(0)?))
                .multiply(&Transform::translate(-cx, -cy))
        }
        ("matrix", 6) => Transform::new(
            number(0)?,
            number(1)?,
            number(2)?,
            number(3)?,
            length(4)?,
            length(5)?,
        ),
        _ => {
            cursor.error(format!(
                "unknown transform '{name}' with {} arguments",
                args.len()
            ));
            return None;
        }
    };
    Some(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex_all;

    fn transform(text: &str) -> Option<Transform> {
        let lexemes = lex_all(text, 1);
        parse_transform(&mut ValueLexer::new(&lexemes))
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_functions_compose_left_to_right() {
        // Scale first in the list means it applies last to the point.
        let t = transform("scale(2) translate(10px, 0)").unwrap_or_default();
        assert!(close(t.apply(1.0, 1.0), (22.0, 2.0)));
    }

    #[test]
    fn test_rotate_about_center() {
        let t = transform("rotate(90deg, 1, 1)").unwrap_or_default();
        assert!(close(t.apply(1.0, 1.0), (1.0, 1.0)));
        assert!(close(t.apply(2.0, 1.0), (1.0, 2.0)));
    }

    #[test]
    fn test_none_and_errors() {
        assert_eq!(transform("none"), Some(Transform::IDENTITY));
        assert_eq!(transform("spin(3)"), None);
        assert_eq!(transform("translate(1, 2, 3)"), None);
    }
}
