//! Selector serialization, used by diagnostics and the CLI.

use std::fmt;

use super::{
    AttributeOperator, AttributeSelector, Combinator, NamespaceConstraint, NthKind,
    PseudoClassPredicate, Selector, TypeSelector,
};

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(type_selector) => fmt::Display::fmt(type_selector, f),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Attribute(attribute) => write!(f, "[{attribute}]"),
            Self::AttributeOperator {
                operator,
                attribute,
                value,
            } => write!(f, "[{attribute}{operator}\"{value}\"]"),
            Self::PseudoClass(name) => write!(f, ":{name}"),
            Self::PseudoClassPredicate(predicate) => fmt::Display::fmt(predicate, f),
            Self::PseudoClassFunction {
                kind,
                modulus,
                remainder,
            } => write!(f, ":{kind}({modulus}n{remainder:+})"),
            Self::Not(inner) => write!(f, ":not({inner})"),
            Self::Combinator { kind, left, right } => match kind {
                Combinator::Descendant => write!(f, "{left} {right}"),
                Combinator::Child => write!(f, "{left} > {right}"),
                Combinator::AdjacentSibling => write!(f, "{left} + {right}"),
                Combinator::GeneralSibling => write!(f, "{left} ~ {right}"),
            },
        }
    }
}

impl fmt::Display for TypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An implied namespace reparses the same under the same default.
        if self.explicit_namespace {
            match &self.namespace {
                NamespaceConstraint::Any => f.write_str("*|")?,
                NamespaceConstraint::None => f.write_str("|")?,
                NamespaceConstraint::Uri(uri) => write!(f, "{uri}|")?,
            }
        }
        let bare = self.type_name.is_none() && !self.attribute_expressions.is_empty();
        match &self.type_name {
            Some(name) => f.write_str(name)?,
            None if !bare => f.write_str("*")?,
            None => {}
        }
        for expression in &self.attribute_expressions {
            fmt::Display::fmt(expression, f)?;
        }
        if let Some(pseudo_element) = &self.pseudo_element {
            write!(f, "::{pseudo_element}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}|")?;
        }
        f.write_str(&self.name)
    }
}

impl fmt::Display for AttributeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "=",
            Self::ListContains => "~=",
            Self::EqualWithHyphen => "|=",
            Self::StartsWith => "^=",
            Self::EndsWith => "$=",
            Self::Contains => "*=",
        })
    }
}

impl fmt::Display for PseudoClassPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Root => ":root",
            Self::FirstChild => ":first-child",
            Self::LastChild => ":last-child",
            Self::FirstOfType => ":first-of-type",
            Self::LastOfType => ":last-of-type",
            Self::OnlyChild => ":only-child",
            Self::OnlyOfType => ":only-of-type",
            Self::Empty => ":empty",
        })
    }
}

impl fmt::Display for NthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NthChild => "nth-child",
            Self::NthLastChild => "nth-last-child",
            Self::NthOfType => "nth-of-type",
            Self::NthLastOfType => "nth-last-of-type",
        })
    }
}
