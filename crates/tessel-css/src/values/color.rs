//! Colors.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/), plus the `hsb()`
//! notation used by design tools.

use serde::Serialize;

use super::ValueLexer;
use crate::lexer::{Lexeme, TokenKind};

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Color {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Transparent black, the initial value of most paints.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// A color from its four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color from `0xRRGGBB`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_rgb_u32(rgb: u32) -> Self {
        Self::rgba((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 => Some(Self::rgba(digit(0)?, digit(1)?, digit(2)?, 255)),
            4 => Some(Self::rgba(digit(0)?, digit(1)?, digit(2)?, digit(3)?)),
            6 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, 255)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors),
    /// plus `transparent`.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .binary_search_by(|(candidate, _)| candidate.cmp(&name.as_str()))
            .ok()
            .map(|i| Self::from_rgb_u32(NAMED_COLORS[i].1))
    }

    /// [§ 7 HSL Colors](https://www.w3.org/TR/css-color-4/#the-hsl-notation)
    ///
    /// Hue in degrees; saturation, lightness and alpha in `[0, 1]`.
    #[must_use]
    pub fn from_hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        // HSL to HSB: same hue, derived brightness and saturation.
        let brightness = l + s * l.min(1.0 - l);
        let hsb_saturation = if brightness == 0.0 {
            0.0
        } else {
            2.0 * (1.0 - l / brightness)
        };
        Self::from_hsba(hue, hsb_saturation, brightness, alpha)
    }

    /// Hue in degrees; saturation, brightness and alpha in `[0, 1]`.
    #[must_use]
    pub fn from_hsba(hue: f64, saturation: f64, brightness: f64, alpha: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);

        let chroma = v * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h {
            h if h < 1.0 => (chroma, x, 0.0),
            h if h < 2.0 => (x, chroma, 0.0),
            h if h < 3.0 => (0.0, chroma, x),
            h if h < 4.0 => (0.0, x, chroma),
            h if h < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;
        Self::rgba(
            unit_to_u8(r + m),
            unit_to_u8(g + m),
            unit_to_u8(b + m),
            unit_to_u8(alpha),
        )
    }

    /// Hue in degrees, saturation and brightness in `[0, 1]`.
    #[must_use]
    pub fn to_hsb(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if (max - r).abs() < f64::EPSILON {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if (max - g).abs() < f64::EPSILON {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };
        (hue, saturation, max)
    }

    /// Alpha in `[0, 1]`.
    #[must_use]
    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Raise HSB brightness by `percent` points.
    #[must_use]
    pub fn lighten(self, percent: f64) -> Self {
        self.adjust_brightness(percent / 100.0)
    }

    /// Lower HSB brightness by `percent` points.
    #[must_use]
    pub fn darken(self, percent: f64) -> Self {
        self.adjust_brightness(-percent / 100.0)
    }

    fn adjust_brightness(self, delta: f64) -> Self {
        let (hue, saturation, brightness) = self.to_hsb();
        Self::from_hsba(hue, saturation, brightness + delta, self.alpha())
    }

    /// Convert to hex string notation (#RRGGBB or #RRGGBBAA if alpha != 255)
    #[must_use]
    pub fn to_hex_string(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

fn unit_to_u8(value: f64) -> u8 {
    // Clamped to [0, 255] first, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    byte
}

/// Parse a color: a hex color, a named color, or one of the color
/// functions. Consumes nothing on failure.
pub fn parse_color(cursor: &mut ValueLexer<'_>) -> Option<Color> {
    let lexeme = cursor.peek()?;
    let color = match lexeme.kind {
        TokenKind::HexColor => {
            let hex = lexeme.text_value().unwrap_or(&lexeme.text);
            let color = Color::from_hex(hex);
            if color.is_none() {
                cursor.error(format!("invalid hex color '{}'", lexeme.text));
            }
            let _ = cursor.next_lexeme();
            color?
        }
        TokenKind::Identifier => {
            let color = Color::from_named(&lexeme.text)?;
            let _ = cursor.next_lexeme();
            color
        }
        TokenKind::Rgb | TokenKind::Rgba => {
            let args = color_arguments(cursor)?;
            rgb_from_args(cursor, &args)?
        }
        TokenKind::Hsl | TokenKind::Hsla | TokenKind::Hsb | TokenKind::Hsba => {
            let hsl = matches!(lexeme.kind, TokenKind::Hsl | TokenKind::Hsla);
            let args = color_arguments(cursor)?;
            hue_from_args(cursor, &args, hsl)?
        }
        _ => return None,
    };
    Some(color)
}

/// Whether the cursor is on something [`parse_color`] may accept.
pub(crate) fn starts_color(cursor: &ValueLexer<'_>) -> bool {
    cursor.peek().is_some_and(|lexeme| match lexeme.kind {
        TokenKind::HexColor
        | TokenKind::Rgb
        | TokenKind::Rgba
        | TokenKind::Hsl
        | TokenKind::Hsla
        | TokenKind::Hsb
        | TokenKind::Hsba => true,
        TokenKind::Identifier => Color::from_named(&lexeme.text).is_some(),
        _ => false,
    })
}

/// The numeric arguments of a color function, with commas and `/`
/// skipped. The opener is under the cursor.
fn color_arguments<'a>(cursor: &mut ValueLexer<'a>) -> Option<Vec<&'a Lexeme>> {
    let start = cursor.position();
    let _ = cursor.next_lexeme();
    let mut args = Vec::new();
    loop {
        match cursor.peek_kind() {
            Some(TokenKind::RightParen) => {
                let _ = cursor.next_lexeme();
                return Some(args);
            }
            Some(TokenKind::Comma | TokenKind::Slash) => {
                let _ = cursor.next_lexeme();
            }
            Some(kind) if kind.is_numeric() => args.extend(cursor.next_lexeme()),
            _ => {
                cursor.error("expected a number or ')' in color function");
                cursor.rewind(start);
                return None;
            }
        }
    }
}

/// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "Values outside these ranges are not invalid, but are clamped to the
/// ranges defined here at parsed-value time."
fn rgb_from_args(cursor: &mut ValueLexer<'_>, args: &[&Lexeme]) -> Option<Color> {
    if !(3..=4).contains(&args.len()) {
        cursor.error("rgb() takes three or four arguments");
        return None;
    }
    let channel = |lexeme: &Lexeme| {
        let value = lexeme.number().unwrap_or(0.0);
        if lexeme.is(TokenKind::Percentage) {
            unit_to_u8(value / 100.0)
        } else {
            unit_to_u8(value / 255.0)
        }
    };
    Some(Color::rgba(
        channel(args[0]),
        channel(args[1]),
        channel(args[2]),
        args.get(3).map_or(255, |a| unit_to_u8(alpha_value(a))),
    ))
}

/// `hsl(h, s%, l%[, a])` or `hsb(h, s%, b%[, a])`.
fn hue_from_args(cursor: &mut ValueLexer<'_>, args: &[&Lexeme], hsl: bool) -> Option<Color> {
    if !(3..=4).contains(&args.len()) {
        cursor.error("hue color functions take three or four arguments");
        return None;
    }
    let hue = match (args[0].unit(), args[0].number()) {
        (Some("rad"), Some(value)) => value.to_degrees(),
        (Some("grad"), Some(value)) => value * 0.9,
        (_, value) => value.unwrap_or(0.0),
    };
    let fraction = |lexeme: &Lexeme| {
        let value = lexeme.number().unwrap_or(0.0);
        if lexeme.is(TokenKind::Percentage) || value > 1.0 {
            value / 100.0
        } else {
            value
        }
    };
    let alpha = args.get(3).map_or(1.0, |a| alpha_value(a));
    Some(if hsl {
        Color::from_hsla(hue, fraction(args[1]), fraction(args[2]), alpha)
    } else {
        Color::from_hsba(hue, fraction(args[1]), fraction(args[2]), alpha)
    })
}

/// "The final argument, <alpha-value>, specifies the alpha of the color."
fn alpha_value(lexeme: &Lexeme) -> f64 {
    let value = lexeme.number().unwrap_or(1.0);
    if lexeme.is(TokenKind::Percentage) {
        value / 100.0
    } else {
        value
    }
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors),
/// sorted by name.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xF0_F8_FF),
    ("antiquewhite", 0xFA_EB_D7),
    ("aqua", 0x00_FF_FF),
    ("aquamarine", 0x7F_FF_D4),
    ("azure", 0xF0_FF_FF),
    ("beige", 0xF5_F5_DC),
    ("bisque", 0xFF_E4_C4),
    ("black", 0x00_00_00),
    ("blanchedalmond", 0xFF_EB_CD),
    ("blue", 0x00_00_FF),
    ("blueviolet", 0x8A_2B_E2),
    ("brown", 0xA5_2A_2A),
    ("burlywood", 0xDE_B8_87),
    ("cadetblue", 0x5F_9E_A0),
    ("chartreuse", 0x7F_FF_00),
    ("chocolate", 0xD2_69_1E),
    ("coral", 0xFF_7F_50),
    ("cornflowerblue", 0x64_95_ED),
    ("cornsilk", 0xFF_F8_DC),
    ("crimson", 0xDC_14_3C),
    ("cyan", 0x00_FF_FF),
    ("darkblue", 0x00_00_8B),
    ("darkcyan", 0x00_8B_8B),
    ("darkgoldenrod", 0xB8_86_0B),
    ("darkgray", 0xA9_A9_A9),
    ("darkgreen", 0x00_64_00),
    ("darkgrey", 0xA9_A9_A9),
    ("darkkhaki", 0xBD_B7_6B),
    ("darkmagenta", 0x8B_00_8B),
    ("darkolivegreen", 0x55_6B_2F),
    ("darkorange", 0xFF_8C_00),
    ("darkorchid", 0x99_32_CC),
    ("darkred", 0x8B_00_00),
    ("darksalmon", 0xE9_96_7A),
    ("darkseagreen", 0x8F_BC_8F),
    ("darkslateblue", 0x48_3D_8B),
    ("darkslategray", 0x2F_4F_4F),
    ("darkslategrey", 0x2F_4F_4F),
    ("darkturquoise", 0x00_CE_D1),
    ("darkviolet", 0x94_00_D3),
    ("deeppink", 0xFF_14_93),
    ("deepskyblue", 0x00_BF_FF),
    ("dimgray", 0x69_69_69),
    ("dimgrey", 0x69_69_69),
    ("dodgerblue", 0x1E_90_FF),
    ("firebrick", 0xB2_22_22),
    ("floralwhite", 0xFF_FA_F0),
    ("forestgreen", 0x22_8B_22),
    ("fuchsia", 0xFF_00_FF),
    ("gainsboro", 0xDC_DC_DC),
    ("ghostwhite", 0xF8_F8_FF),
    ("gold", 0xFF_D7_00),
    ("goldenrod", 0xDA_A5_20),
    ("gray", 0x80_80_80),
    ("green", 0x00_80_00),
    ("greenyellow", 0xAD_FF_2F),
    ("grey", 0x80_80_80),
    ("honeydew", 0xF0_FF_F0),
    ("hotpink", 0xFF_69_B4),
    ("indianred", 0xCD_5C_5C),
    ("indigo", 0x4B_00_82),
    ("ivory", 0xFF_FF_F0),
    ("khaki", 0xF0_E6_8C),
    ("lavender", 0xE6_E6_FA),
    ("lavenderblush", 0xFF_F0_F5),
    ("lawngreen", 0x7C_FC_00),
    ("lemonchiffon", 0xFF_FA_CD),
    ("lightblue", 0xAD_D8_E6),
    ("lightcoral", 0xF0_80_80),
    ("lightcyan", 0xE0_FF_FF),
    ("lightgoldenrodyellow", 0xFA_FA_D2),
    ("lightgray", 0xD3_D3_D3),
    ("lightgreen", 0x90_EE_90),
    ("lightgrey", 0xD3_D3_D3),
    ("lightpink", 0xFF_B6_C1),
    ("lightsalmon", 0xFF_A0_7A),
    ("lightseagreen", 0x20_B2_AA),
    ("lightskyblue", 0x87_CE_FA),
    ("lightslategray", 0x77_88_99),
    ("lightslategrey", 0x77_88_99),
    ("lightsteelblue", 0xB0_C4_DE),
    ("lightyellow", 0xFF_FF_E0),
    ("lime", 0x00_FF_00),
    ("limegreen", 0x32_CD_32),
    ("linen", 0xFA_F0_E6),
    ("magenta", 0xFF_00_FF),
    ("maroon", 0x80_00_00),
    ("mediumaquamarine", 0x66_CD_AA),
    ("mediumblue", 0x00_00_CD),
    ("mediumorchid", 0xBA_55_D3),
    ("mediumpurple", 0x93_70_DB),
    ("mediumseagreen", 0x3C_B3_71),
    ("mediumslateblue", 0x7B_68_EE),
    ("mediumspringgreen", 0x00_FA_9A),
    ("mediumturquoise", 0x48_D1_CC),
    ("mediumvioletred", 0xC7_15_85),
    ("midnightblue", 0x19_19_70),
    ("mintcream", 0xF5_FF_FA),
    ("mistyrose", 0xFF_E4_E1),
    ("moccasin", 0xFF_E4_B5),
    ("navajowhite", 0xFF_DE_AD),
    ("navy", 0x00_00_80),
    ("oldlace", 0xFD_F5_E6),
    ("olive", 0x80_80_00),
    ("olivedrab", 0x6B_8E_23),
    ("orange", 0xFF_A5_00),
    ("orangered", 0xFF_45_00),
    ("orchid", 0xDA_70_D6),
    ("palegoldenrod", 0xEE_E8_AA),
    ("palegreen", 0x98_FB_98),
    ("paleturquoise", 0xAF_EE_EE),
    ("palevioletred", 0xDB_70_93),
    ("papayawhip", 0xFF_EF_D5),
    ("peachpuff", 0xFF_DA_B9),
    ("peru", 0xCD_85_3F),
    ("pink", 0xFF_C0_CB),
    ("plum", 0xDD_A0_DD),
    ("powderblue", 0xB0_E0_E6),
    ("purple", 0x80_00_80),
    ("rebeccapurple", 0x66_33_99),
    ("red", 0xFF_00_00),
    ("rosybrown", 0xBC_8F_8F),
    ("royalblue", 0x41_69_E1),
    ("saddlebrown", 0x8B_45_13),
    ("salmon", 0xFA_80_72),
    ("sandybrown", 0xF4_A4_60),
    ("seagreen", 0x2E_8B_57),
    ("seashell", 0xFF_F5_EE),
    ("sienna", 0xA0_52_2D),
    ("silver", 0xC0_C0_C0),
    ("skyblue", 0x87_CE_EB),
    ("slateblue", 0x6A_5A_CD),
    ("slategray", 0x70_80_90),
    ("slategrey", 0x70_80_90),
    ("snow", 0xFF_FA_FA),
    ("springgreen", 0x00_FF_7F),
    ("steelblue", 0x46_82_B4),
    ("tan", 0xD2_B4_8C),
    ("teal", 0x00_80_80),
    ("thistle", 0xD8_BF_D8),
    ("tomato", 0xFF_63_47),
    ("turquoise", 0x40_E0_D0),
    ("violet", 0xEE_82_EE),
    ("wheat", 0xF5_DE_B3),
    ("white", 0xFF_FF_FF),
    ("whitesmoke", 0xF5_F5_F5),
    ("yellow", 0xFF_FF_00),
    ("yellowgreen", 0x9A_CD_32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_table_is_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::from_hex("#f00"), Some(Color::rgba(255, 0, 0, 255)));
        assert_eq!(Color::from_hex("ff000080"), Some(Color::rgba(255, 0, 0, 128)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#ggg"), None);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::from_hsla(0.0, 1.0, 0.5, 1.0), Color::rgba(255, 0, 0, 255));
        assert_eq!(Color::from_hsla(120.0, 1.0, 0.25, 1.0), Color::rgba(0, 128, 0, 255));
        assert_eq!(Color::from_hsba(240.0, 1.0, 1.0, 0.0), Color::rgba(0, 0, 255, 0));
    }

    #[test]
    fn test_lighten_and_darken() {
        let gray = Color::rgba(128, 128, 128, 255);
        assert_eq!(gray.lighten(100.0), Color::WHITE);
        assert_eq!(gray.darken(100.0), Color::BLACK);
        assert_eq!(Color::BLACK.lighten(50.0), Color::rgba(128, 128, 128, 255));
    }
}
