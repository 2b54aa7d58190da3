//! Cascading and style resolution.
//!
//! This module implements the cascade of
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//! adapted to stylesheet origins: application, user, view and inline.
//!
//! [`resolve`] is the pure algorithm. [`StyleResolver`] wraps it with the
//! [`ResolutionCache`] and the [`StylesheetRegistry`](crate::StylesheetRegistry).

mod cache;
mod merged;
mod resolver;

use std::sync::Arc;

use indexmap::IndexMap;
use tessel_dom::Styleable;

use crate::selector::MatchContext;
use crate::specificity::Specificity;
use crate::stylesheet::{Declaration, MediaContext, Origin, RuleSet, Stylesheet};
pub use cache::{CacheKey, CacheStats, CacheTag, ResolutionCache};
pub use merged::MergedDeclarations;
pub use resolver::StyleResolver;

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// A matched rule set with what it matched at.
struct MatchedRule {
    rule_set: Arc<RuleSet>,
    specificity: Specificity,
    sheet: usize,
}

impl MatchedRule {
    fn sort_key(&self) -> (Specificity, usize, usize) {
        (self.specificity, self.sheet, self.rule_set.source_order())
    }
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Precedence of one declaration. Fields compare in declaration order, so
/// origin dominates importance, which dominates specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Precedence {
    origin: Origin,
    important: bool,
    specificity: Specificity,
    sheet: usize,
    source_order: usize,
    position: usize,
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
/// "The cascade takes an unordered list of declared values for a given
/// property on a given element, sorts them by their declaration's
/// precedence, and outputs a single cascaded value."
///
/// Resolve the declarations that apply to `node`. `sheets` are searched in
/// the order given; their position only breaks ties between rule sets of
/// the same origin and specificity. Rule sets inside `@media` groups take
/// part only when their query holds for `media`.
#[must_use]
pub fn resolve<'s, N: Styleable>(
    node: &N,
    context: &MatchContext<'_>,
    sheets: impl IntoIterator<Item = &'s Stylesheet>,
    media: &MediaContext,
) -> MergedDeclarations {
    let matched = sheets
        .into_iter()
        .enumerate()
        .flat_map(|(sheet, stylesheet)| {
            stylesheet
                .rule_sets_matching(node, context, media)
                .into_iter()
                .map(move |(rule_set, specificity)| MatchedRule {
                    rule_set,
                    specificity,
                    sheet,
                })
        })
        .collect();
    cascade(matched)
}

/// Merge rule sets by their own specificity and source order, without
/// matching. Backs [`RuleSet::merge`].
pub(crate) fn merge_rule_sets(
    rule_sets: impl IntoIterator<Item = Arc<RuleSet>>,
) -> MergedDeclarations {
    let matched = rule_sets
        .into_iter()
        .map(|rule_set| MatchedRule {
            specificity: rule_set.specificity(),
            rule_set,
            sheet: 0,
        })
        .collect();
    cascade(matched)
}

fn cascade(mut matched: Vec<MatchedRule>) -> MergedDeclarations {
    // [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
    // Lowest first, so introspection lists rule sets in application order.
    matched.sort_by_key(MatchedRule::sort_key);

    let mut winners: IndexMap<String, (Precedence, Declaration)> = IndexMap::new();
    for entry in &matched {
        for (position, declaration) in entry.rule_set.declarations().iter().enumerate() {
            let precedence = Precedence {
                origin: entry.rule_set.origin(),
                important: declaration.important,
                specificity: entry.specificity,
                sheet: entry.sheet,
                source_order: entry.rule_set.source_order(),
                position,
            };
            match winners.get_mut(&declaration.name) {
                Some(current) => {
                    if precedence > current.0 {
                        *current = (precedence, declaration.clone());
                    }
                }
                None => {
                    let _ = winners
                        .insert(declaration.name.clone(), (precedence, declaration.clone()));
                }
            }
        }
    }

    let declarations = winners
        .into_iter()
        .map(|(name, (_, declaration))| (name, declaration))
        .collect();
    let rule_sets = matched.into_iter().map(|m| m.rule_set).collect();
    MergedDeclarations::new(declarations, rule_sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_dom::{ElementData, StyleTree};

    fn color_of(merged: &MergedDeclarations) -> String {
        merged
            .get("color")
            .map(Declaration::value_text)
            .unwrap_or_default()
    }

    #[test]
    fn test_inline_normal_beats_user_important() {
        let user = Stylesheet::parse("Label { color: blue !important; }", Origin::User);
        let inline = Stylesheet::parse("* { color: red; }", Origin::Inline);
        let mut tree = StyleTree::new();
        let id = tree.alloc(ElementData::new("Label"));
        let merged = resolve(
            &tree.node(id),
            &MatchContext::default(),
            [&user, &inline],
            &MediaContext::default(),
        );
        assert_eq!(color_of(&merged), "red");
    }

    #[test]
    fn test_important_wins_within_origin() {
        let sheet = Stylesheet::parse(
            "#a { color: blue; } Label { color: green !important; }",
            Origin::Application,
        );
        let mut tree = StyleTree::new();
        let id = tree.alloc(ElementData::new("Label").with_id("a"));
        let merged = resolve(
            &tree.node(id),
            &MatchContext::default(),
            [&sheet],
            &MediaContext::default(),
        );
        assert_eq!(color_of(&merged), "green");
        assert_eq!(merged.rule_sets().len(), 2);
    }

    #[test]
    fn test_merge_rule_sets_uses_source_order() {
        let sheet = Stylesheet::parse(
            ".a { color: blue; width: 1; } .b { color: red; }",
            Origin::Application,
        );
        let merged = merge_rule_sets(sheet.rule_sets().iter().cloned());
        assert_eq!(color_of(&merged), "red");
        assert!(merged.get("width").is_some());
    }
}
