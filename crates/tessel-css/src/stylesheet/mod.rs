//! Stylesheets and what they contain.
//!
//! A [`Stylesheet`] is parsed once and is immutable afterwards; hot reload
//! replaces whole stylesheets in the
//! [`StylesheetRegistry`](crate::StylesheetRegistry).

/// Declarations and declaration containers.
pub mod declaration;
/// `@keyframes` animations.
pub mod keyframe;
/// `@media` queries and groups.
pub mod media;
/// Rule sets.
pub mod rule_set;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tessel_dom::Styleable;

use crate::error::{SourceLocation, StyleError};
use crate::parser::{FsLoader, SourceLoader, StylesheetParser};
use crate::selector::MatchContext;
use crate::specificity::Specificity;
pub use declaration::{Declaration, DeclarationContainer, SharedDeclarations};
pub use keyframe::{Keyframe, KeyframeBlock};
pub use media::{MediaContext, MediaExpression, MediaGroup, MediaValue, Orientation};
pub use rule_set::RuleSet;

/// Provenance tier of a stylesheet, lowest precedence first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Origin {
    /// Styles shipped with the application.
    Application,
    /// Styles supplied by the user.
    User,
    /// Styles attached to one view hierarchy.
    View,
    /// Styles attached to a single node. Always highest.
    Inline,
}

impl Origin {
    /// Every origin, lowest precedence first.
    pub const ALL: [Self; 4] = [Self::Application, Self::User, Self::View, Self::Inline];

    /// Value of the origin specificity counter.
    #[must_use]
    pub const fn rank(self) -> u32 {
        match self {
            Self::Application => 0,
            Self::User => 1,
            Self::View => 2,
            Self::Inline => 3,
        }
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub(crate) origin: Origin,
    pub(crate) file_path: Option<PathBuf>,
    pub(crate) rule_sets: Vec<Arc<RuleSet>>,
    pub(crate) media_groups: Vec<MediaGroup>,
    pub(crate) keyframes: HashMap<String, Keyframe>,
    pub(crate) namespaces: HashMap<String, String>,
    pub(crate) font_faces: Vec<SharedDeclarations>,
    pub(crate) imported_files: Vec<PathBuf>,
    pub(crate) errors: Vec<StyleError>,
    next_source_order: usize,
}

impl Stylesheet {
    /// An empty stylesheet.
    #[must_use]
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            file_path: None,
            rule_sets: Vec::new(),
            media_groups: Vec::new(),
            keyframes: HashMap::new(),
            namespaces: HashMap::new(),
            font_faces: Vec::new(),
            imported_files: Vec::new(),
            errors: Vec::new(),
            next_source_order: 0,
        }
    }

    /// Parse inline source text. Imports resolve against the working directory.
    #[must_use]
    pub fn parse(source: &str, origin: Origin) -> Self {
        StylesheetParser::new(&FsLoader).parse(source, origin, None)
    }

    /// Parse source text that was read from `path`.
    #[must_use]
    pub fn parse_named(source: &str, origin: Origin, path: &Path) -> Self {
        StylesheetParser::new(&FsLoader).parse(source, origin, Some(path))
    }

    /// Parse with a custom loader for `@import`.
    #[must_use]
    pub fn parse_with_loader(
        source: &str,
        origin: Origin,
        path: Option<&Path>,
        loader: &dyn SourceLoader,
    ) -> Self {
        StylesheetParser::new(loader).parse(source, origin, path)
    }

    /// Read and parse a file.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Import`] if the file cannot be read. Problems
    /// inside the file are collected in [`Stylesheet::errors`] instead.
    pub fn from_file(path: &Path, origin: Origin) -> Result<Self, StyleError> {
        Self::from_file_with_loader(path, origin, &FsLoader)
    }

    /// Read and parse a file through `loader`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Import`] if the loader cannot read the file.
    pub fn from_file_with_loader(
        path: &Path,
        origin: Origin,
        loader: &dyn SourceLoader,
    ) -> Result<Self, StyleError> {
        let source = loader.load(path).map_err(|e| StyleError::Import {
            path: path.display().to_string(),
            reason: e.to_string(),
            location: SourceLocation::default(),
        })?;
        Ok(Self::parse_with_loader(&source, origin, Some(path), loader))
    }

    /// The stylesheet origin.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// The file this stylesheet was read from.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Top-level rule sets in source order.
    #[must_use]
    pub fn rule_sets(&self) -> &[Arc<RuleSet>] {
        &self.rule_sets
    }

    /// Media groups in source order.
    #[must_use]
    pub fn media_groups(&self) -> &[MediaGroup] {
        &self.media_groups
    }

    /// Every rule set, top-level and gated, in source order.
    #[must_use]
    pub fn all_rule_sets(&self) -> Vec<&Arc<RuleSet>> {
        let mut all: Vec<&Arc<RuleSet>> = self
            .rule_sets
            .iter()
            .chain(self.media_groups.iter().flat_map(|g| g.rule_sets.iter()))
            .collect();
        all.sort_by_key(|r| r.source_order());
        all
    }

    /// Rule sets that apply under `media`, in source order.
    #[must_use]
    pub fn active_rule_sets(&self, media: &MediaContext) -> Vec<&Arc<RuleSet>> {
        let mut active: Vec<&Arc<RuleSet>> = self
            .rule_sets
            .iter()
            .chain(
                self.media_groups
                    .iter()
                    .filter(|g| g.is_active(media))
                    .flat_map(|g| g.rule_sets.iter()),
            )
            .collect();
        active.sort_by_key(|r| r.source_order());
        active
    }

    /// Active rule sets matching `node`, with the specificity they matched at.
    #[must_use]
    pub fn rule_sets_matching<N: Styleable>(
        &self,
        node: &N,
        context: &MatchContext<'_>,
        media: &MediaContext,
    ) -> Vec<(Arc<RuleSet>, Specificity)> {
        self.active_rule_sets(media)
            .into_iter()
            .filter_map(|rule_set| {
                rule_set
                    .matching_specificity(node, context)
                    .map(|specificity| (Arc::clone(rule_set), specificity))
            })
            .collect()
    }

    /// Keyframes by name.
    #[must_use]
    pub const fn keyframes(&self) -> &HashMap<String, Keyframe> {
        &self.keyframes
    }

    /// Look up a keyframe animation.
    #[must_use]
    pub fn keyframe(&self, name: &str) -> Option<&Keyframe> {
        self.keyframes.get(name)
    }

    /// Register a keyframe animation, replacing one with the same name.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) {
        let _ = self.keyframes.insert(keyframe.name.clone(), keyframe);
    }

    /// Namespace URIs by prefix; the default namespace has prefix `""`.
    #[must_use]
    pub const fn namespaces(&self) -> &HashMap<String, String> {
        &self.namespaces
    }

    /// The URI bound to `prefix`.
    #[must_use]
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// The default namespace, if one was declared.
    #[must_use]
    pub fn default_namespace(&self) -> Option<&str> {
        self.namespace_uri("")
    }

    /// `@font-face` declaration blocks.
    #[must_use]
    pub fn font_faces(&self) -> &[SharedDeclarations] {
        &self.font_faces
    }

    /// Files pulled in with `@import`.
    #[must_use]
    pub fn imported_files(&self) -> &[PathBuf] {
        &self.imported_files
    }

    /// Problems found while parsing.
    #[must_use]
    pub fn errors(&self) -> &[StyleError] {
        &self.errors
    }

    /// Append a rule set at the end of the source order.
    pub fn add_rule_set(&mut self, mut rule_set: RuleSet) {
        rule_set.set_source_order(self.take_source_order());
        self.rule_sets.push(Arc::new(rule_set));
    }

    pub(crate) const fn take_source_order(&mut self) -> usize {
        let order = self.next_source_order;
        self.next_source_order += 1;
        order
    }
}
