use std::fmt;

use crate::Styleable;

/// A type-safe index into a [`StyleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A namespaced attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URI, `None` for plain attributes.
    pub namespace: Option<String>,
    /// Local attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// Everything selector matching can observe about one element.
///
/// Built with the `with_*` methods:
///
/// ```
/// use tessel_dom::ElementData;
///
/// let button = ElementData::new("button")
///     .with_id("ok")
///     .with_classes("primary large")
///     .with_attribute("role", "default");
/// assert_eq!(button.style_classes, ["primary", "large"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    /// Element name matched by type selectors.
    pub name: String,
    /// Element namespace URI.
    pub namespace: Option<String>,
    /// Style id matched by `#id`.
    pub style_id: Option<String>,
    /// Style classes matched by `.class`.
    pub style_classes: Vec<String>,
    /// Attribute list.
    pub attributes: Vec<Attribute>,
    /// Pseudo-classes the element is currently in.
    pub active_pseudo_classes: Vec<String>,
    /// Pseudo-classes the element can be styled for (empty = any).
    pub supported_pseudo_classes: Vec<String>,
    /// State assumed when none is requested.
    pub default_pseudo_class: Option<String>,
    /// Pseudo-elements the element exposes (empty = any).
    pub supported_pseudo_elements: Vec<String>,
}

impl ElementData {
    /// Element data with only a name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Set the style id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.style_id = Some(id.to_string());
        self
    }

    /// Set the style classes from a whitespace-separated list.
    #[must_use]
    pub fn with_classes(mut self, classes: &str) -> Self {
        self.style_classes = split_list(classes);
        self
    }

    /// Set the element namespace URI.
    #[must_use]
    pub fn with_namespace(mut self, uri: &str) -> Self {
        self.namespace = Some(uri.to_string());
        self
    }

    /// Add a plain attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(Attribute {
            namespace: None,
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Add a namespaced attribute.
    #[must_use]
    pub fn with_namespaced_attribute(mut self, namespace: &str, name: &str, value: &str) -> Self {
        self.attributes.push(Attribute {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Set the active pseudo-classes from a whitespace-separated list.
    #[must_use]
    pub fn with_active_pseudo_classes(mut self, states: &str) -> Self {
        self.active_pseudo_classes = split_list(states);
        self
    }

    /// Restrict the pseudo-classes this element supports, first one as default.
    #[must_use]
    pub fn with_supported_pseudo_classes(mut self, states: &str) -> Self {
        self.supported_pseudo_classes = split_list(states);
        self.default_pseudo_class = self.supported_pseudo_classes.first().cloned();
        self
    }

    /// Restrict the pseudo-elements this element exposes.
    #[must_use]
    pub fn with_pseudo_elements(mut self, names: &str) -> Self {
        self.supported_pseudo_elements = split_list(names);
        self
    }

    /// Look up an attribute; see [`Styleable::attribute`] for namespace rules.
    #[must_use]
    pub fn attribute(&self, name: &str, namespace: Option<&str>) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| {
                a.name == name
                    && match namespace {
                        Some("*") => true,
                        ns => a.namespace.as_deref() == ns,
                    }
            })
            .map(|a| a.value.as_str())
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

/// A node in the arena: element data plus index links.
#[derive(Debug, Clone)]
pub struct Node {
    /// The element this node represents.
    pub data: ElementData,
    /// Parent node, `None` for roots.
    pub parent: Option<NodeId>,
    /// Ordered children.
    pub children: Vec<NodeId>,
}

/// Arena-based element tree with O(1) node access and traversal.
///
/// Nodes are allocated detached and linked with [`StyleTree::append_child`].
/// A tree may hold several roots.
#[derive(Debug, Clone, Default)]
pub struct StyleTree {
    nodes: Vec<Node>,
}

impl StyleTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, data: ElementData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Panics
    /// Panics if either id was not allocated by this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate `data` and append it under `parent` in one step.
    pub fn add_child(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let child = self.alloc(data);
        self.append_child(parent, child);
        child
    }

    /// Mutable access to an element, for hosts changing ids, classes or state.
    ///
    /// Cached resolutions are not invalidated implicitly.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id.0).map(|n| &mut n.data)
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// A matchable handle for `id`.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node {id:?} is not in this tree");
        NodeRef { tree: self, id }
    }
}

/// A borrowed handle to one node of a [`StyleTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a StyleTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The node's element data.
    #[must_use]
    pub fn data(&self) -> &'a ElementData {
        &self.tree.nodes[self.id.0].data
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.data().name)
            .finish()
    }
}

impl Styleable for NodeRef<'_> {
    fn element_name(&self) -> &str {
        &self.data().name
    }

    fn namespace(&self) -> Option<&str> {
        self.data().namespace.as_deref()
    }

    fn style_id(&self) -> Option<&str> {
        self.data().style_id.as_deref()
    }

    fn style_classes(&self) -> &[String] {
        &self.data().style_classes
    }

    fn active_pseudo_classes(&self) -> &[String] {
        &self.data().active_pseudo_classes
    }

    fn supported_pseudo_classes(&self) -> &[String] {
        &self.data().supported_pseudo_classes
    }

    fn default_pseudo_class(&self) -> Option<&str> {
        self.data().default_pseudo_class.as_deref()
    }

    fn supported_pseudo_elements(&self) -> &[String] {
        &self.data().supported_pseudo_elements
    }

    fn attribute(&self, name: &str, namespace: Option<&str>) -> Option<&str> {
        self.data().attribute(name, namespace)
    }

    fn parent(&self) -> Option<Self> {
        self.tree.parent(self.id).map(|id| Self {
            tree: self.tree,
            id,
        })
    }

    fn children(&self) -> Vec<Self> {
        self.tree
            .children(self.id)
            .iter()
            .map(|&id| Self {
                tree: self.tree,
                id,
            })
            .collect()
    }
}
