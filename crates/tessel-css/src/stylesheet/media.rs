//! Media queries gating groups of rule sets.
//!
//! The grammar is a small subset of
//! [Media Queries Level 3](https://www.w3.org/TR/mediaqueries-3/): a
//! comma-separated list of `and`-joined terms, each either a media type or a
//! parenthesized feature test. Features describe the host device rather than
//! a viewport.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::rule_set::RuleSet;
use super::Origin;

/// Device orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

/// The host device that media queries are evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MediaContext {
    /// Media type; `all` and `screen` always match as well.
    pub media_type: String,
    /// Current orientation.
    pub orientation: Orientation,
    /// Device family, e.g. `phone` or `tablet`.
    pub device: Option<String>,
    /// Device width in points.
    pub device_width: f64,
    /// Device height in points.
    pub device_height: f64,
    /// Pixels per point.
    pub scale: f64,
}

impl Default for MediaContext {
    fn default() -> Self {
        Self {
            media_type: "screen".to_string(),
            orientation: Orientation::Portrait,
            device: None,
            device_width: 0.0,
            device_height: 0.0,
            scale: 1.0,
        }
    }
}

/// The value side of a `(feature: value)` test.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaValue {
    /// A number, or a length converted to points.
    Number(f64),
    /// An identifier, lowercased.
    Ident(String),
}

/// A parsed media query.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaExpression {
    /// A media type such as `screen`.
    Type(String),
    /// `(name)` or `(name: value)`.
    Feature {
        /// Feature name, lowercased.
        name: String,
        /// Compared value, if any.
        value: Option<MediaValue>,
    },
    /// All terms must hold.
    And(Vec<MediaExpression>),
    /// Any query must hold (the comma list).
    Or(Vec<MediaExpression>),
}

impl MediaExpression {
    /// Evaluate against the host device.
    #[must_use]
    pub fn matches(&self, context: &MediaContext) -> bool {
        match self {
            Self::Type(media_type) => {
                matches!(media_type.as_str(), "all" | "screen")
                    || media_type.eq_ignore_ascii_case(&context.media_type)
            }
            Self::Feature { name, value } => feature_matches(name, value.as_ref(), context),
            Self::And(terms) => terms.iter().all(|t| t.matches(context)),
            Self::Or(queries) => queries.iter().any(|q| q.matches(context)),
        }
    }
}

fn feature_matches(name: &str, value: Option<&MediaValue>, context: &MediaContext) -> bool {
    let (base, comparison) = if let Some(base) = name.strip_prefix("min-") {
        (base, Some(std::cmp::Ordering::Greater))
    } else if let Some(base) = name.strip_prefix("max-") {
        (base, Some(std::cmp::Ordering::Less))
    } else {
        (name, None)
    };

    let actual = match base {
        "orientation" => {
            return match value {
                Some(MediaValue::Ident(wanted)) => *wanted == context.orientation.to_string(),
                None => comparison.is_none(),
                Some(MediaValue::Number(_)) => false,
            };
        }
        "device" => {
            return match (value, &context.device) {
                (Some(MediaValue::Ident(wanted)), Some(device)) => {
                    wanted.eq_ignore_ascii_case(device)
                }
                (None, device) => comparison.is_none() && device.is_some(),
                _ => false,
            };
        }
        "device-width" => context.device_width,
        "device-height" => context.device_height,
        "scale" => context.scale,
        _ => return false,
    };

    match (value, comparison) {
        (None, None) => actual > 0.0,
        (Some(MediaValue::Number(expected)), None) => (actual - expected).abs() < f64::EPSILON,
        (Some(MediaValue::Number(expected)), Some(std::cmp::Ordering::Greater)) => {
            actual >= *expected
        }
        (Some(MediaValue::Number(expected)), Some(_)) => actual <= *expected,
        _ => false,
    }
}

/// Rule sets that apply only while a media query holds.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaGroup {
    /// The gating query.
    pub query: MediaExpression,
    /// Origin of the owning stylesheet.
    pub origin: Origin,
    /// The gated rule sets, in source order.
    pub rule_sets: Vec<Arc<RuleSet>>,
}

impl MediaGroup {
    /// Whether the group currently applies.
    #[must_use]
    pub fn is_active(&self, context: &MediaContext) -> bool {
        self.query.matches(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> MediaContext {
        MediaContext {
            device: Some("phone".to_string()),
            device_width: 375.0,
            device_height: 812.0,
            scale: 3.0,
            ..MediaContext::default()
        }
    }

    fn feature(name: &str, value: MediaValue) -> MediaExpression {
        MediaExpression::Feature {
            name: name.to_string(),
            value: Some(value),
        }
    }

    #[test]
    fn test_min_and_max_widths() {
        let context = phone();
        assert!(feature("min-device-width", MediaValue::Number(320.0)).matches(&context));
        assert!(!feature("max-device-width", MediaValue::Number(320.0)).matches(&context));
    }

    #[test]
    fn test_orientation_and_type() {
        let query = MediaExpression::And(vec![
            MediaExpression::Type("screen".to_string()),
            feature("orientation", MediaValue::Ident("landscape".to_string())),
        ]);
        assert!(!query.matches(&phone()));
        let landscape = MediaContext {
            orientation: Orientation::Landscape,
            ..phone()
        };
        assert!(query.matches(&landscape));
    }

    #[test]
    fn test_unknown_feature_is_false() {
        assert!(!feature("color-gamut", MediaValue::Ident("p3".to_string())).matches(&phone()));
    }

    #[test]
    fn test_print_type_does_not_match_screen() {
        assert!(!MediaExpression::Type("print".to_string()).matches(&phone()));
    }
}
