use core::fmt;
use std::iter::FusedIterator;

use serde_json::Value;

use super::{display::XmlAdapter, Layout, NodeId, NodeKind, Scalar, Tree};
use crate::{convert, navigator::Cursor};

/// A borrowed handle to a single node of a [`Tree`].
///
/// Handles are cheap to copy. Two handles compare equal when they point at the same node of the
/// same tree, regardless of the node's contents.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    pub(crate) tree: &'t Tree,
    pub(crate) id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub(crate) fn new(tree: &'t Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    #[inline]
    fn with(self, id: Option<NodeId>) -> Option<NodeRef<'t>> {
        id.map(|id| NodeRef::new(self.tree, id))
    }

    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn tree(self) -> &'t Tree {
        self.tree
    }

    #[must_use]
    pub fn kind(self) -> NodeKind {
        self.tree.node(self.id).kind
    }

    /// How the children of this node are interpreted.
    #[must_use]
    pub fn layout(self) -> Layout {
        self.tree.layout(self.id)
    }

    /// The member key of this node, [`ELEMENT`](super::ELEMENT) for array elements, or an empty
    /// string for the document and a scalar top-level value.
    #[must_use]
    pub fn label(self) -> &'t str {
        self.tree.node(self.id).label.as_str()
    }

    /// Canonical text of a leaf. Containers have no value.
    #[must_use]
    pub fn value(self) -> Option<&'t str> {
        self.tree.node(self.id).text.as_deref()
    }

    /// The JSON type a leaf was decoded from.
    #[must_use]
    pub fn scalar(self) -> Option<Scalar> {
        match self.kind() {
            NodeKind::Leaf(scalar) => Some(scalar),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_leaf(self) -> bool {
        matches!(self.kind(), NodeKind::Leaf(_))
    }

    #[must_use]
    pub fn is_document(self) -> bool {
        self.kind() == NodeKind::Document
    }

    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'t>> {
        self.with(self.tree.node(self.id).parent)
    }

    #[must_use]
    pub fn first_child(self) -> Option<NodeRef<'t>> {
        self.with(self.tree.node(self.id).first_child)
    }

    #[must_use]
    pub fn last_child(self) -> Option<NodeRef<'t>> {
        self.with(self.tree.node(self.id).last_child)
    }

    #[must_use]
    pub fn prev_sibling(self) -> Option<NodeRef<'t>> {
        self.with(self.tree.node(self.id).prev_sibling)
    }

    #[must_use]
    pub fn next_sibling(self) -> Option<NodeRef<'t>> {
        self.with(self.tree.node(self.id).next_sibling)
    }

    /// Direct children in source order.
    #[must_use]
    pub fn child_nodes(self) -> Children<'t> {
        Children {
            tree: self.tree,
            next: self.tree.node(self.id).first_child,
        }
    }

    /// The direct child at `index`, counted in source order.
    #[must_use]
    pub fn child(self, index: usize) -> Option<NodeRef<'t>> {
        self.child_nodes().nth(index)
    }

    /// The first direct child labelled `name`.
    ///
    /// ```rust
    /// # fn main() -> Result<(), jsonquery::Error> {
    /// let tree = jsonquery::parse_str(r#"{"name": "John", "age": 31}"#)?;
    /// let document = tree.document();
    /// assert_eq!(document.select_element("age").map(|n| n.inner_text()), Some("31".to_string()));
    /// assert!(document.select_element("city").is_none());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn select_element(self, name: &str) -> Option<NodeRef<'t>> {
        self.child_nodes().find(|child| child.label() == name)
    }

    /// All nodes below this one in document order, excluding the node itself.
    #[must_use]
    pub fn descendants(self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            scope: self.id,
            next: self.tree.node(self.id).first_child,
        }
    }

    /// The string value of this node.
    ///
    /// For a leaf this is its text. For a container it is the text of every leaf below it,
    /// concatenated in document order without separators.
    #[must_use]
    pub fn inner_text(self) -> String {
        self.tree.inner_text(self.id)
    }

    /// A navigator cursor positioned at this node.
    #[must_use]
    pub fn cursor(self) -> Cursor<'t> {
        Cursor::new(self.tree, self.id)
    }

    /// Convert this node into a plain JSON value.
    #[must_use]
    pub fn to_value(self) -> Value {
        convert::to_value(self)
    }

    /// Convert this node into the minimal document fragment leading from the root to it.
    #[must_use]
    pub fn to_full_path_value(self) -> Value {
        convert::to_full_path_value(self)
    }

    /// Render this subtree as XML elements named after the node labels.
    #[must_use]
    pub fn output_xml(self) -> XmlAdapter<'t> {
        XmlAdapter::new(self.tree, self.id)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id.get())
            .field("kind", &self.kind())
            .field("label", &self.label())
            .field("value", &self.value())
            .finish()
    }
}

/// Iterator over the direct children of a node.
#[derive(Clone)]
pub struct Children<'t> {
    tree: &'t Tree,
    next: Option<NodeId>,
}

impl<'t> Iterator for Children<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.node(id).next_sibling;
        Some(NodeRef::new(self.tree, id))
    }
}

impl FusedIterator for Children<'_> {}

/// Iterator over the descendants of a node in document order.
#[derive(Clone)]
pub struct Descendants<'t> {
    tree: &'t Tree,
    scope: NodeId,
    next: Option<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.next_in_subtree(self.scope, id);
        Some(NodeRef::new(self.tree, id))
    }
}

impl FusedIterator for Descendants<'_> {}
