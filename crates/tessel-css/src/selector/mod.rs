//! Selector model and matching.
//!
//! Selectors follow [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//! restricted to a closed set of variants. Matching is a pure read of the
//! [`Styleable`] tree: only combinators recurse, every other variant is a
//! predicate over one node.
//!
//! Selectors are built by the stylesheet parser; see
//! [`parse_selector`](crate::parse_selector) for parsing a standalone one.

mod display;

use tessel_dom::{ChildrenInfo, Styleable};

use crate::specificity::{Specificity, SpecificityType};

/// State under which a node is being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchContext<'a> {
    /// Requested pseudo-class state, e.g. `Some("highlighted")`.
    /// `None` means the node's default pseudo-class.
    pub pseudo_state: Option<&'a str>,
    /// Pseudo-element being styled, `None` for the element itself.
    pub pseudo_element: Option<&'a str>,
}

impl<'a> MatchContext<'a> {
    /// Context for styling the element itself in `pseudo_state`.
    #[must_use]
    pub const fn with_state(pseudo_state: Option<&'a str>) -> Self {
        Self {
            pseudo_state,
            pseudo_element: None,
        }
    }

    /// Context used for nodes reached through a combinator: they are
    /// matched in their own default state and never as a pseudo-element.
    const fn for_relative() -> Self {
        Self {
            pseudo_state: None,
            pseudo_element: None,
        }
    }
}

/// Namespace requirement of a type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceConstraint {
    /// `*|name`, or no prefix and no default namespace.
    Any,
    /// `|name`: elements without a namespace.
    None,
    /// `prefix|name`, or no prefix under a default namespace.
    Uri(String),
}

/// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
/// with its attached simple selectors.
///
/// This is one compound selector: `ns|Button.primary[role]:hover::icon`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSelector {
    /// Namespace requirement.
    pub namespace: NamespaceConstraint,
    /// Whether the namespace was written as a prefix (`*|`, `|`, `ns|`)
    /// rather than implied by the stylesheet default.
    pub explicit_namespace: bool,
    /// Element name; `None` is the universal selector.
    pub type_name: Option<String>,
    /// Class, id, attribute, pseudo-class and `:not` conditions.
    pub attribute_expressions: Vec<Selector>,
    /// Pseudo-element this compound styles, e.g. `before`.
    pub pseudo_element: Option<String>,
}

impl TypeSelector {
    /// The universal selector with no conditions.
    #[must_use]
    pub const fn universal() -> Self {
        Self {
            namespace: NamespaceConstraint::Any,
            explicit_namespace: false,
            type_name: None,
            attribute_expressions: Vec::new(),
            pseudo_element: None,
        }
    }

    /// A type selector for `name` with no conditions.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            type_name: Some(name.to_string()),
            ..Self::universal()
        }
    }

    /// Whether this is `*` (no type name).
    #[must_use]
    pub const fn is_universal(&self) -> bool {
        self.type_name.is_none()
    }

    /// The id required by an attached `#id`.
    #[must_use]
    pub fn style_id(&self) -> Option<&str> {
        self.attribute_expressions.iter().find_map(|s| match s {
            Selector::Id(id) => Some(id.as_str()),
            _ => None,
        })
    }

    /// The classes required by attached `.class` selectors.
    #[must_use]
    pub fn style_classes(&self) -> Vec<&str> {
        self.attribute_expressions
            .iter()
            .filter_map(|s| match s {
                Selector::Class(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether a `:name` pseudo-class is attached.
    #[must_use]
    pub fn has_pseudo_class(&self, name: &str) -> bool {
        self.attribute_expressions
            .iter()
            .any(|s| matches!(s, Selector::PseudoClass(p) if p == name))
    }

    fn matches<N: Styleable>(&self, node: &N, context: &MatchContext<'_>) -> bool {
        let namespace_ok = match &self.namespace {
            NamespaceConstraint::Any => true,
            NamespaceConstraint::None => node.namespace().is_none(),
            NamespaceConstraint::Uri(uri) => node.namespace() == Some(uri.as_str()),
        };
        if !namespace_ok {
            return false;
        }

        if self
            .type_name
            .as_ref()
            .is_some_and(|name| !name.eq_ignore_ascii_case(node.element_name()))
        {
            return false;
        }

        let pseudo_element_ok = match (&self.pseudo_element, context.pseudo_element) {
            (None, None) => true,
            (Some(wanted), Some(requested)) => {
                wanted.eq_ignore_ascii_case(requested)
                    && (node.supported_pseudo_elements().is_empty()
                        || node
                            .supported_pseudo_elements()
                            .iter()
                            .any(|s| s.eq_ignore_ascii_case(wanted)))
            }
            _ => false,
        };

        pseudo_element_ok
            && self
                .attribute_expressions
                .iter()
                .all(|expression| expression.matches(node, context))
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors):
/// `[ns|name]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// `None` for unprefixed attributes, `Some("*")` for any namespace,
    /// otherwise the namespace URI.
    pub namespace: Option<String>,
    /// Attribute name.
    pub name: String,
}

impl AttributeSelector {
    /// An attribute without namespace.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            namespace: None,
            name: name.to_string(),
        }
    }

    fn value<'n, N: Styleable>(&self, node: &'n N) -> Option<&'n str> {
        node.attribute(&self.name, self.namespace.as_deref())
    }
}

/// Attribute value comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[a=v]`: exactly `v`.
    Equal,
    /// `[a~=v]`: a whitespace-separated word is exactly `v`.
    ListContains,
    /// `[a|=v]`: exactly `v` or starts with `v-`.
    EqualWithHyphen,
    /// `[a^=v]`: starts with `v`.
    StartsWith,
    /// `[a$=v]`: ends with `v`.
    EndsWith,
    /// `[a*=v]`: contains `v`.
    Contains,
}

impl AttributeOperator {
    fn test(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Equal => actual == expected,
            Self::ListContains => {
                !expected.is_empty() && actual.split_whitespace().any(|word| word == expected)
            }
            Self::EqualWithHyphen => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            Self::StartsWith => !expected.is_empty() && actual.starts_with(expected),
            Self::EndsWith => !expected.is_empty() && actual.ends_with(expected),
            Self::Contains => !expected.is_empty() && actual.contains(expected),
        }
    }
}

/// [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
/// that take no argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClassPredicate {
    /// `:root`, a node without a parent.
    Root,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-child`
    OnlyChild,
    /// `:only-of-type`
    OnlyOfType,
    /// `:empty`, a node without children.
    Empty,
}

impl PseudoClassPredicate {
    fn matches<N: Styleable>(self, node: &N) -> bool {
        let info = || node.children_info();
        match self {
            Self::Root => node.parent().is_none(),
            Self::FirstChild => info().index == 0,
            Self::LastChild => {
                let info = info();
                info.index + 1 == info.count
            }
            Self::FirstOfType => info().of_type_index == 0,
            Self::LastOfType => {
                let info = info();
                info.of_type_index + 1 == info.of_type_count
            }
            Self::OnlyChild => info().count == 1,
            Self::OnlyOfType => info().of_type_count == 1,
            Self::Empty => node.children().is_empty(),
        }
    }
}

/// The `:nth-*()` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthKind {
    /// `:nth-child(an+b)`, counting all siblings from the start.
    NthChild,
    /// `:nth-last-child(an+b)`, counting all siblings from the end.
    NthLastChild,
    /// `:nth-of-type(an+b)`, counting same-named siblings from the start.
    NthOfType,
    /// `:nth-last-of-type(an+b)`, counting same-named siblings from the end.
    NthLastOfType,
}

impl NthKind {
    /// 1-based position of the node as this kind counts it.
    #[must_use]
    pub const fn position(self, info: &ChildrenInfo) -> usize {
        match self {
            Self::NthChild => info.index + 1,
            Self::NthLastChild => info.count - info.index,
            Self::NthOfType => info.of_type_index + 1,
            Self::NthLastOfType => info.of_type_count - info.of_type_index,
        }
    }
}

/// [§ 14.4.1 `:nth-child()`](https://www.w3.org/TR/selectors-4/#nth-child-pseudo)
///
/// "The :nth-child(An+B) pseudo-class notation represents elements that are
/// among An+Bth elements from the list composed of their inclusive siblings"
/// for some non-negative integer n.
#[must_use]
pub const fn nth_matches(modulus: i32, remainder: i32, position: i64) -> bool {
    let offset = position - remainder as i64;
    if modulus == 0 {
        return offset == 0;
    }
    let modulus = modulus as i64;
    offset % modulus == 0 && offset / modulus >= 0
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`: some ancestor matches `A`.
    Descendant,
    /// `A > B`: the parent matches `A`.
    Child,
    /// `A + B`: the immediately preceding sibling matches `A`.
    AdjacentSibling,
    /// `A ~ B`: some preceding sibling matches `A`.
    GeneralSibling,
}

/// A selector: one of a closed set of variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A compound selector headed by a type (or universal) selector.
    Type(TypeSelector),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html): `.name`
    Class(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors): `#name`
    Id(String),
    /// Attribute presence: `[name]`
    Attribute(AttributeSelector),
    /// Attribute comparison: `[name op "value"]`
    AttributeOperator {
        /// Comparison.
        operator: AttributeOperator,
        /// Compared attribute.
        attribute: AttributeSelector,
        /// Comparison string.
        value: String,
    },
    /// A named state: `:hover`, `:highlighted`
    PseudoClass(String),
    /// A structural test such as `:first-child`
    PseudoClassPredicate(PseudoClassPredicate),
    /// `:nth-child(an+b)` and relatives
    PseudoClassFunction {
        /// Which siblings are counted, and from which end.
        kind: NthKind,
        /// `a`
        modulus: i32,
        /// `b`
        remainder: i32,
    },
    /// [§ 4.3 Negation](https://www.w3.org/TR/selectors-4/#negation): `:not(x)`
    Not(Box<Selector>),
    /// Two selectors joined by a combinator; `right` is the subject.
    Combinator {
        /// Relationship between the two sides.
        kind: Combinator,
        /// Selector the related node must match.
        left: Box<Selector>,
        /// Selector the candidate node must match.
        right: Box<Selector>,
    },
}

impl Selector {
    /// Whether `node` matches this selector in `context`.
    #[must_use]
    pub fn matches<N: Styleable>(&self, node: &N, context: &MatchContext<'_>) -> bool {
        match self {
            Self::Type(type_selector) => type_selector.matches(node, context),
            Self::Class(name) => node.style_classes().iter().any(|c| c == name),
            Self::Id(id) => node.style_id() == Some(id.as_str()),
            Self::Attribute(attribute) => attribute.value(node).is_some(),
            Self::AttributeOperator {
                operator,
                attribute,
                value,
            } => attribute
                .value(node)
                .is_some_and(|actual| operator.test(actual, value)),
            Self::PseudoClass(name) => pseudo_class_matches(name, node, context),
            Self::PseudoClassPredicate(predicate) => predicate.matches(node),
            Self::PseudoClassFunction {
                kind,
                modulus,
                remainder,
            } => {
                let position = kind.position(&node.children_info());
                i64::try_from(position).is_ok_and(|p| nth_matches(*modulus, *remainder, p))
            }
            Self::Not(inner) => !inner.matches(node, context),
            Self::Combinator { kind, left, right } => {
                right.matches(node, context) && combinator_matches(*kind, left, node)
            }
        }
    }

    /// Add this selector's weight to `specificity`.
    pub fn add_specificity(&self, specificity: &mut Specificity) {
        match self {
            Self::Type(type_selector) => {
                if !type_selector.is_universal() {
                    specificity.increment(SpecificityType::Element);
                }
                if type_selector.pseudo_element.is_some() {
                    specificity.increment(SpecificityType::Element);
                }
                for expression in &type_selector.attribute_expressions {
                    expression.add_specificity(specificity);
                }
            }
            Self::Id(_) => specificity.increment(SpecificityType::Id),
            Self::Class(_)
            | Self::Attribute(_)
            | Self::AttributeOperator { .. }
            | Self::PseudoClass(_)
            | Self::PseudoClassPredicate(_)
            | Self::PseudoClassFunction { .. } => {
                specificity.increment(SpecificityType::ClassOrAttribute);
            }
            // "The specificity of a :not() pseudo-class is replaced by the
            // specificity of the most specific complex selector in its
            // selector list argument."
            Self::Not(inner) => inner.add_specificity(specificity),
            Self::Combinator { left, right, .. } => {
                left.add_specificity(specificity);
                right.add_specificity(specificity);
            }
        }
    }

    /// The selector's specificity with a zero origin.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut specificity = Specificity::default();
        self.add_specificity(&mut specificity);
        specificity
    }

    /// The subject compound selector (the rightmost one).
    #[must_use]
    pub fn subject(&self) -> Option<&TypeSelector> {
        match self {
            Self::Type(type_selector) => Some(type_selector),
            Self::Combinator { right, .. } => right.subject(),
            _ => None,
        }
    }
}

/// A named state matches the node's active pseudo-classes, or the state the
/// node is being resolved for (its default state when none is requested).
fn pseudo_class_matches<N: Styleable>(name: &str, node: &N, context: &MatchContext<'_>) -> bool {
    let supported = node.supported_pseudo_classes();
    if !supported.is_empty() && !supported.iter().any(|s| s == name) {
        return false;
    }
    if node.active_pseudo_classes().iter().any(|s| s == name) {
        return true;
    }
    context.pseudo_state.or_else(|| node.default_pseudo_class()) == Some(name)
}

fn combinator_matches<N: Styleable>(kind: Combinator, left: &Selector, node: &N) -> bool {
    let context = MatchContext::for_relative();
    match kind {
        Combinator::Descendant => node.ancestors().any(|a| left.matches(&a, &context)),
        Combinator::Child => node.parent().is_some_and(|p| left.matches(&p, &context)),
        Combinator::AdjacentSibling => node
            .previous_sibling()
            .is_some_and(|s| left.matches(&s, &context)),
        Combinator::GeneralSibling => node
            .preceding_siblings()
            .iter()
            .any(|s| left.matches(s, &context)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_matches_odd() {
        let matched: Vec<i64> = (1..=7).filter(|&p| nth_matches(2, 1, p)).collect();
        assert_eq!(matched, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_nth_matches_negative_modulus() {
        // -n+3: the first three
        let matched: Vec<i64> = (1..=7).filter(|&p| nth_matches(-1, 3, p)).collect();
        assert_eq!(matched, vec![1, 2, 3]);
    }

    #[test]
    fn test_nth_matches_zero_modulus() {
        let matched: Vec<i64> = (1..=7).filter(|&p| nth_matches(0, 4, p)).collect();
        assert_eq!(matched, vec![4]);
    }

    #[test]
    fn test_attribute_operators() {
        assert!(AttributeOperator::ListContains.test("a b c", "b"));
        assert!(!AttributeOperator::ListContains.test("abc", "b"));
        assert!(AttributeOperator::EqualWithHyphen.test("en-US", "en"));
        assert!(!AttributeOperator::EqualWithHyphen.test("english", "en"));
        assert!(!AttributeOperator::StartsWith.test("abc", ""));
    }

    #[test]
    fn test_not_contributes_inner_specificity() {
        let selector = Selector::Not(Box::new(Selector::Id("x".to_string())));
        assert_eq!(selector.specificity(), Specificity::new(0, 1, 0, 0));
    }
}
