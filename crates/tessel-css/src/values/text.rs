//! Text layout keywords.
//!
//! [CSS Text Level 3](https://www.w3.org/TR/css-text-3/), plus the label and
//! text field keywords hosts map onto their native controls.

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// How a label breaks or truncates text that does not fit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum LineBreakMode {
    /// Wrap at word boundaries.
    WordWrap,
    /// Wrap at any character.
    CharacterWrap,
    /// Cut off at the edge.
    Clip,
    /// Drop the start of the line, showing an ellipsis.
    EllipsisHead,
    /// Drop the end of the line, showing an ellipsis.
    #[default]
    EllipsisTail,
    /// Drop the middle of the line, showing an ellipsis.
    EllipsisMiddle,
}

/// [§ 7.1 'text-align'](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlignment {
    /// `left`, the initial value.
    #[default]
    Left,
    /// `center`
    Center,
    /// `right`
    Right,
    /// `justify`
    Justify,
    /// Follow the writing direction.
    Natural,
}

/// The frame drawn around a text field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextBorderStyle {
    /// No frame.
    #[default]
    None,
    /// A thin rectangle.
    Line,
    /// A sunken bezel.
    Bezel,
    /// A rounded rectangle.
    RoundedRect,
}

/// [§ 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform-property)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextTransform {
    /// Text as written.
    #[default]
    None,
    /// `uppercase`
    Uppercase,
    /// `lowercase`
    Lowercase,
    /// First letter of each word in uppercase.
    Capitalize,
}

impl TextTransform {
    /// `text` with this transform applied.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_string(),
            Self::Uppercase => text.to_uppercase(),
            Self::Lowercase => text.to_lowercase(),
            Self::Capitalize => {
                let mut result = String::with_capacity(text.len());
                let mut at_word_start = true;
                for c in text.chars() {
                    if at_word_start && c.is_alphanumeric() {
                        result.extend(c.to_uppercase());
                    } else {
                        result.push(c);
                    }
                    at_word_start = c.is_whitespace();
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            "Ellipsis-Middle".parse::<LineBreakMode>().ok(),
            Some(LineBreakMode::EllipsisMiddle)
        );
        assert_eq!(
            "rounded-rect".parse::<TextBorderStyle>().ok(),
            Some(TextBorderStyle::RoundedRect)
        );
        assert!("sideways".parse::<TextAlignment>().is_err());
    }

    #[test]
    fn test_transform_text() {
        assert_eq!(TextTransform::Uppercase.apply("Ok go"), "OK GO");
        assert_eq!(TextTransform::Capitalize.apply("hello  wide world"), "Hello  Wide World");
        assert_eq!(TextTransform::None.apply("As Is"), "As Is");
    }
}
