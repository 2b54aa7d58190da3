//! [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules),
//! extended with a leading origin counter.
//!
//! "A selector's specificity is calculated for a given element as follows:
//!  - count the number of ID selectors in the selector (= A)
//!  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
//!  - count the number of type selectors and pseudo-elements in the selector (= C)"
//!
//! The origin of the owning stylesheet is prepended, so comparing two
//! specificities lexicographically also orders stylesheet origins.

use std::fmt;

use strum_macros::Display;

use crate::stylesheet::Origin;

/// One of the four specificity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SpecificityType {
    /// Stylesheet origin rank.
    Origin,
    /// ID selectors (A).
    Id,
    /// Class, attribute and pseudo-class selectors (B).
    ClassOrAttribute,
    /// Type selectors and pseudo-elements (C).
    Element,
}

impl SpecificityType {
    const fn index(self) -> usize {
        match self {
            Self::Origin => 0,
            Self::Id => 1,
            Self::ClassOrAttribute => 2,
            Self::Element => 3,
        }
    }
}

/// `(origin, id, class-or-attribute, element)`, compared in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity([u32; 4]);

impl Specificity {
    /// Create a specificity from its four components.
    #[must_use]
    pub const fn new(origin: u32, id: u32, class_or_attribute: u32, element: u32) -> Self {
        Self([origin, id, class_or_attribute, element])
    }

    /// Read one counter.
    #[must_use]
    pub const fn get(&self, kind: SpecificityType) -> u32 {
        self.0[kind.index()]
    }

    /// Add one to a counter.
    pub const fn increment(&mut self, kind: SpecificityType) {
        self.0[kind.index()] += 1;
    }

    /// Overwrite one counter.
    pub const fn set(&mut self, kind: SpecificityType, value: u32) {
        self.0[kind.index()] = value;
    }

    /// Set the origin counter from a stylesheet origin.
    pub const fn set_origin(&mut self, origin: Origin) {
        self.set(SpecificityType::Origin, origin.rank());
    }

    /// Add every counter of `other` except the origin.
    pub const fn add_selector_counts(&mut self, other: &Self) {
        self.0[1] += other.0[1];
        self.0[2] += other.0[2];
        self.0[3] += other.0[3];
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [origin, id, class, element] = self.0;
        write!(f, "({origin},{id},{class},{element})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_dominates() {
        let inline = Specificity::new(Origin::Inline.rank(), 0, 0, 1);
        let application = Specificity::new(Origin::Application.rank(), 5, 0, 0);
        assert!(inline > application);
    }

    #[test]
    fn test_id_beats_any_number_of_classes() {
        assert!(Specificity::new(0, 1, 0, 0) > Specificity::new(0, 0, 12, 3));
    }

    #[test]
    fn test_increment_and_display() {
        let mut specificity = Specificity::default();
        specificity.increment(SpecificityType::ClassOrAttribute);
        specificity.increment(SpecificityType::ClassOrAttribute);
        specificity.increment(SpecificityType::Element);
        specificity.set_origin(Origin::View);
        assert_eq!(specificity.to_string(), "(2,0,2,1)");
    }
}
