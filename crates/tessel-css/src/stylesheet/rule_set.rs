use std::sync::Arc;

use tessel_dom::Styleable;

use super::Origin;
use super::declaration::{DeclarationContainer, SharedDeclarations};
use crate::cascade;
use crate::selector::{MatchContext, Selector, TypeSelector};
use crate::specificity::Specificity;

/// Selectors plus the declarations they apply.
///
/// The parser emits one rule set per selector of a selector list, so that
/// each carries the exact specificity of its selector. A rule set with
/// several selectors matches when any of them does.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    selectors: Vec<Selector>,
    declarations: SharedDeclarations,
    specificity: Specificity,
    origin: Origin,
    source_order: usize,
}

impl RuleSet {
    /// A rule set for one selector.
    #[must_use]
    pub fn new(selector: Selector, declarations: SharedDeclarations, origin: Origin) -> Self {
        let mut rule_set = Self {
            selectors: Vec::new(),
            declarations,
            specificity: Specificity::default(),
            origin,
            source_order: 0,
        };
        rule_set.add_selector(selector);
        rule_set
    }

    /// A rule set without selectors, as produced by [`RuleSet::merge`].
    #[must_use]
    pub fn from_declarations(declarations: DeclarationContainer, origin: Origin) -> Self {
        let mut specificity = Specificity::default();
        specificity.set_origin(origin);
        Self {
            selectors: Vec::new(),
            declarations: Arc::new(declarations),
            specificity,
            origin,
            source_order: 0,
        }
    }

    /// Add a selector; the specificity becomes the highest of all selectors.
    pub fn add_selector(&mut self, selector: Selector) {
        let mut specificity = selector.specificity();
        specificity.set_origin(self.origin);
        self.specificity = self.specificity.max(specificity);
        self.selectors.push(selector);
    }

    /// Merge several rule sets into a new one whose declarations are the
    /// cascade winners among them. Its selectors and specificity carry no
    /// meaning.
    #[must_use]
    pub fn merge(rule_sets: &[Arc<Self>]) -> Self {
        let origin = rule_sets
            .iter()
            .map(|r| r.origin)
            .max()
            .unwrap_or(Origin::Application);
        let merged = cascade::merge_rule_sets(rule_sets.iter().cloned());
        Self::from_declarations(merged.into_container(), origin)
    }

    /// The selectors.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// The declarations.
    #[must_use]
    pub fn declarations(&self) -> &DeclarationContainer {
        &self.declarations
    }

    /// The shared declaration container.
    #[must_use]
    pub fn shared_declarations(&self) -> &SharedDeclarations {
        &self.declarations
    }

    /// Specificity including the origin counter.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// The origin of the owning stylesheet.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Position of this rule set in its stylesheet.
    #[must_use]
    pub const fn source_order(&self) -> usize {
        self.source_order
    }

    pub(crate) const fn set_source_order(&mut self, order: usize) {
        self.source_order = order;
    }

    /// The subject compound of the first selector, if it has one.
    #[must_use]
    pub fn target_type_selector(&self) -> Option<&TypeSelector> {
        self.selectors.first().and_then(Selector::subject)
    }

    /// Whether any selector matches.
    #[must_use]
    pub fn matches<N: Styleable>(&self, node: &N, context: &MatchContext<'_>) -> bool {
        self.selectors.iter().any(|s| s.matches(node, context))
    }

    /// Specificity of the most specific matching selector, with origin.
    #[must_use]
    pub fn matching_specificity<N: Styleable>(
        &self,
        node: &N,
        context: &MatchContext<'_>,
    ) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|s| s.matches(node, context))
            .map(|s| {
                let mut specificity = s.specificity();
                specificity.set_origin(self.origin);
                specificity
            })
            .max()
    }
}
