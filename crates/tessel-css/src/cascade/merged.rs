use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::stylesheet::{Declaration, DeclarationContainer, RuleSet};
use crate::values::{ParsedValue, Value, ValueParserRegistry};

/// The cascade winner for every property that applies to a node, plus the
/// rule sets that contributed, lowest precedence first.
///
/// Typed values are parsed on first request and kept per
/// `(property, parser)` pair.
#[derive(Debug)]
pub struct MergedDeclarations {
    declarations: IndexMap<String, Declaration>,
    rule_sets: Vec<Arc<RuleSet>>,
    values: Mutex<HashMap<(String, String), ParsedValue>>,
}

impl MergedDeclarations {
    pub(crate) fn new(
        declarations: IndexMap<String, Declaration>,
        rule_sets: Vec<Arc<RuleSet>>,
    ) -> Self {
        Self {
            declarations,
            rule_sets,
            values: Mutex::new(HashMap::new()),
        }
    }

    /// No declarations at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(IndexMap::new(), Vec::new())
    }

    /// The winning declaration for `property`.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&Declaration> {
        self.declarations.get(property)
    }

    /// Whether `property` has a winner.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.declarations.contains_key(property)
    }

    /// Winning declarations, in the order their properties were first seen.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether nothing applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Rule sets that matched, lowest precedence first.
    #[must_use]
    pub fn rule_sets(&self) -> &[Arc<RuleSet>] {
        &self.rule_sets
    }

    /// Parse `property` with the shared registry's `parser`. `None` when the
    /// property has no winner; otherwise the value and any problems found.
    #[must_use]
    pub fn parsed(&self, property: &str, parser: &str) -> Option<ParsedValue> {
        let declaration = self.declarations.get(property)?;
        let key = (property.to_string(), parser.to_string());
        let mut values = self.values.lock();
        let parsed = values
            .entry(key)
            .or_insert_with(|| declaration.parse_as(parser));
        Some(parsed.clone())
    }

    /// The typed value of `property`, if it has a winner that parses.
    #[must_use]
    pub fn value(&self, property: &str, parser: &str) -> Option<Value> {
        self.parsed(property, parser).and_then(|p| p.value)
    }

    /// Parse `property` with a parser from `registry`. Not cached, since
    /// the registry may differ between calls.
    #[must_use]
    pub fn parse_with(
        &self,
        registry: &ValueParserRegistry,
        property: &str,
        parser: &str,
    ) -> Option<ParsedValue> {
        self.declarations
            .get(property)
            .map(|d| d.parse_with(registry, parser))
    }

    /// The winning declarations as a container.
    #[must_use]
    pub fn into_container(self) -> DeclarationContainer {
        self.declarations.into_values().collect()
    }
}

impl Clone for MergedDeclarations {
    fn clone(&self) -> Self {
        Self::new(self.declarations.clone(), self.rule_sets.clone())
    }
}

impl PartialEq for MergedDeclarations {
    fn eq(&self, other: &Self) -> bool {
        self.declarations == other.declarations && self.rule_sets == other.rule_sets
    }
}

impl Default for MergedDeclarations {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a MergedDeclarations {
    type Item = &'a Declaration;
    type IntoIter = indexmap::map::Values<'a, String, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.values()
    }
}
