use std::fmt::Write as _;

/// Read-only view of a host UI element, as seen by selector matching.
///
/// Implementors are cheap handles (a reference plus an index, an `Rc`, ...):
/// the matcher clones them freely while walking parents and siblings.
/// `PartialEq` must be identity, not structural equality, because sibling
/// positions are found by searching the parent's children for `self`.
///
/// The engine never mutates a node through this trait.
pub trait Styleable: Clone + PartialEq {
    /// Element name used by type selectors, e.g. `"button"`.
    fn element_name(&self) -> &str;

    /// Namespace URI of the element, if any.
    fn namespace(&self) -> Option<&str> {
        None
    }

    /// The style id matched by `#id` selectors.
    fn style_id(&self) -> Option<&str>;

    /// The style classes matched by `.class` selectors.
    fn style_classes(&self) -> &[String];

    /// Pseudo-classes the element is currently in, e.g. `["highlighted"]`.
    fn active_pseudo_classes(&self) -> &[String] {
        &[]
    }

    /// Pseudo-classes this element can be styled for.
    ///
    /// An empty list means "no restriction".
    fn supported_pseudo_classes(&self) -> &[String] {
        &[]
    }

    /// State assumed when a resolution does not name a pseudo-state.
    fn default_pseudo_class(&self) -> Option<&str> {
        None
    }

    /// Pseudo-elements (`before`, `icon`, ...) this element exposes.
    ///
    /// An empty list means "no restriction".
    fn supported_pseudo_elements(&self) -> &[String] {
        &[]
    }

    /// Look up an attribute value.
    ///
    /// `namespace` of `None` asks for the attribute without a namespace;
    /// `Some("*")` accepts any namespace.
    fn attribute(&self, name: &str, namespace: Option<&str>) -> Option<&str>;

    /// The parent element, `None` for a root.
    fn parent(&self) -> Option<Self>;

    /// The ordered child elements.
    fn children(&self) -> Vec<Self>;

    /// The sibling immediately before this node.
    fn previous_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let index = siblings.iter().position(|s| s == self)?;
        index.checked_sub(1).map(|i| siblings[i].clone())
    }

    /// All preceding siblings, nearest first.
    fn preceding_siblings(&self) -> Vec<Self> {
        let Some(parent) = self.parent() else {
            return Vec::new();
        };
        let mut siblings = parent.children();
        match siblings.iter().position(|s| s == self) {
            Some(index) => {
                siblings.truncate(index);
                siblings.reverse();
                siblings
            }
            None => Vec::new(),
        }
    }

    /// Iterate over ancestors, from parent to root.
    fn ancestors(&self) -> Ancestors<Self> {
        Ancestors {
            current: self.parent(),
        }
    }

    /// Position of this node among its siblings.
    ///
    /// A root counts as the only child of an invisible parent.
    fn children_info(&self) -> ChildrenInfo {
        let Some(parent) = self.parent() else {
            return ChildrenInfo::ROOT;
        };
        let mut info = ChildrenInfo {
            count: 0,
            index: 0,
            of_type_count: 0,
            of_type_index: 0,
        };
        for sibling in parent.children() {
            let same_type = sibling.element_name() == self.element_name()
                && sibling.namespace() == self.namespace();
            if sibling == *self {
                info.index = info.count;
                info.of_type_index = info.of_type_count;
            }
            info.count += 1;
            if same_type {
                info.of_type_count += 1;
            }
        }
        info
    }

    /// A key identifying this node's place in the tree.
    ///
    /// Defaults to the slash-joined `name:index` path from the root, so a
    /// node's key is a path prefix of every descendant's key. Hosts with a
    /// stable identity of their own may override it, keeping that property.
    fn style_key(&self) -> String {
        let mut segments = vec![segment(self)];
        segments.extend(self.ancestors().map(|a| segment(&a)));
        let mut key = String::new();
        for segment in segments.iter().rev() {
            key.push('/');
            key.push_str(segment);
        }
        key
    }
}

fn segment<N: Styleable>(node: &N) -> String {
    let mut segment = node.element_name().to_string();
    let _ = write!(segment, ":{}", node.children_info().index);
    segment
}

/// Sibling counts and 0-based positions for structural pseudo-classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildrenInfo {
    /// Number of siblings including the node itself.
    pub count: usize,
    /// Position among all siblings.
    pub index: usize,
    /// Number of siblings with the same element name.
    pub of_type_count: usize,
    /// Position among same-named siblings.
    pub of_type_index: usize,
}

impl ChildrenInfo {
    /// Info for a node without a parent.
    pub const ROOT: Self = Self {
        count: 1,
        index: 0,
        of_type_count: 1,
        of_type_index: 0,
    };
}

/// Iterator over ancestors of a node.
pub struct Ancestors<N> {
    current: Option<N>,
}

impl<N: Styleable> Iterator for Ancestors<N> {
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current.take()?;
        self.current = node.parent();
        Some(node)
    }
}
