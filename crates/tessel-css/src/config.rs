//! Engine configuration.
//!
//! Configuration comes from JSON or from a stylesheet. In a stylesheet the
//! same kebab-case keys are declarations of the reserved element
//! [`CONFIG_ELEMENT`]:
//!
//! ```css
//! tessel-config {
//!     parse-error-destination: log;
//!     style-cache-capacity: 512;
//! }
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tessel_common::warning::warn_once;
use tessel_dom::{ElementData, StyleTree};
use thiserror::Error;
use tracing::warn;

use crate::cascade::{self, MergedDeclarations};
use crate::selector::MatchContext;
use crate::stylesheet::{MediaContext, Stylesheet};

/// Element name whose declarations configure the engine.
pub const CONFIG_ELEMENT: &str = "tessel-config";

/// Default maximum number of cached resolutions.
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Where parse errors go once a stylesheet has been parsed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ParseErrorDestination {
    /// Keep them on [`Stylesheet::errors`] only.
    #[default]
    None,
    /// Print each distinct error once to stderr.
    Console,
    /// Emit a `tracing` warning per error.
    Log,
}

impl ParseErrorDestination {
    /// Send the errors of `sheet` here.
    pub fn report(self, sheet: &Stylesheet) {
        for error in sheet.errors() {
            match self {
                Self::None => {}
                Self::Console => {
                    let _ = warn_once(error.kind_name(), &error.to_string());
                }
                Self::Log => warn!(kind = error.kind_name(), "{error}"),
            }
        }
    }
}

/// Failure to read a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for the registry and resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StyleConfig {
    /// Where parse errors go.
    pub parse_error_destination: ParseErrorDestination,
    /// Whether resolutions are cached.
    pub cache_styles: bool,
    /// Maximum number of cached resolutions.
    pub style_cache_capacity: usize,
    /// Whether loaded files are watched for changes.
    pub watch_files: bool,
    /// The device media queries are evaluated against.
    pub media: MediaContext,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            parse_error_destination: ParseErrorDestination::None,
            cache_styles: true,
            style_cache_capacity: DEFAULT_CACHE_CAPACITY,
            watch_files: false,
            media: MediaContext::default(),
        }
    }
}

impl StyleConfig {
    /// Read configuration from JSON. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when `text` is not a configuration object.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Json`] when its content is not a configuration object.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Read configuration from resolved declarations. Keys that are absent
    /// keep their defaults; values that do not parse are ignored.
    #[must_use]
    pub fn from_declarations(merged: &MergedDeclarations) -> Self {
        let mut config = Self::default();
        if let Some(destination) = merged
            .get("parse-error-destination")
            .and_then(|d| d.string_value().parse().ok())
        {
            config.parse_error_destination = destination;
        }
        if let Some(declaration) = merged.get("cache-styles") {
            config.cache_styles = declaration.boolean_value();
        }
        if let Some(declaration) = merged.get("style-cache-capacity") {
            let capacity = declaration.float_value();
            if capacity >= 1.0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let capacity = capacity as usize;
                config.style_cache_capacity = capacity;
            }
        }
        if let Some(declaration) = merged.get("watch-files") {
            config.watch_files = declaration.boolean_value();
        }
        if let Some(declaration) = merged.get("media-type") {
            config.media.media_type = declaration.string_value();
        }
        if let Some(declaration) = merged.get("device") {
            config.media.device = Some(declaration.string_value());
        }
        config
    }

    /// Read configuration from the [`CONFIG_ELEMENT`] rules of `sheets`.
    #[must_use]
    pub fn from_stylesheets<'s>(sheets: impl IntoIterator<Item = &'s Stylesheet>) -> Self {
        let mut tree = StyleTree::new();
        let root = tree.alloc(ElementData::new(CONFIG_ELEMENT));
        let merged = cascade::resolve(
            &tree.node(root),
            &MatchContext::default(),
            sheets,
            &MediaContext::default(),
        );
        Self::from_declarations(&merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::Origin;

    #[test]
    fn test_json_defaults_missing_keys() {
        let config = StyleConfig::from_json_str(r#"{ "cache-styles": false }"#);
        assert!(config.is_ok_and(|c| !c.cache_styles && c.style_cache_capacity == 2048));
    }

    #[test]
    fn test_json_rejects_unknown_destination() {
        let config = StyleConfig::from_json_str(r#"{ "parse-error-destination": "pager" }"#);
        assert!(matches!(config, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_stylesheet() {
        let sheet = Stylesheet::parse(
            "tessel-config { parse-error-destination: log; style-cache-capacity: 16; \
             watch-files: yes; } Label { cache-styles: false; }",
            Origin::Application,
        );
        let config = StyleConfig::from_stylesheets([&sheet]);
        assert_eq!(config.parse_error_destination, ParseErrorDestination::Log);
        assert_eq!(config.style_cache_capacity, 16);
        assert!(config.watch_files);
        assert!(config.cache_styles);
    }
}
