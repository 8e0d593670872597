mod display;
mod node_ref;

use std::{iter::successors, num::NonZeroUsize};

pub use display::XmlAdapter;
pub use node_ref::{Children, Descendants, NodeRef};

/// Label carried by every child of an array-typed container.
pub const ELEMENT: &str = "element";

/// Index of a node inside its [`Tree`].
///
/// Ids are handed out in document order, so comparing two ids of the same tree compares their
/// positions in the source document. An id is only meaningful for the tree that issued it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
    #[inline]
    fn new(value: usize) -> NodeId {
        NodeId(NonZeroUsize::new(value).expect("Value is zero"))
    }
    #[inline]
    pub(crate) fn root_id() -> NodeId {
        NodeId::new(1)
    }
    #[inline]
    pub(crate) fn get(self) -> usize {
        self.0.get()
    }
}

/// Structural role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The synthetic root. Its children are the members or elements of the top-level value.
    Document,
    /// An object member or array element whose value is an object.
    Object,
    /// An object member or array element whose value is an array.
    Array,
    /// A scalar value.
    Leaf(Scalar),
}

/// JSON type a leaf was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    String,
    Number,
    Bool,
    /// `null`, whose text is the empty string.
    Null,
}

/// How the children of a node are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Children are object members keyed by their labels.
    Object,
    /// Children are array elements, all labelled [`ELEMENT`].
    Array,
    /// A leaf, or a document whose top-level value is a scalar.
    Scalar,
}

#[derive(Debug)]
pub(crate) enum Label {
    Key(Box<str>),
    Element,
    None,
}

impl Label {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Label::Key(key) => key,
            Label::Element => ELEMENT,
            Label::None => "",
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) label: Label,
    pub(crate) kind: NodeKind,
    pub(crate) text: Option<Box<str>>,
}

/// An ordered, immutable tree decoded from a JSON document.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`], so the tree has no reference
/// cycles and can be shared across threads once built. Use [`Tree::document`] to obtain a handle
/// to the root.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    top: Layout,
}

impl Tree {
    pub(crate) fn new(top: Layout) -> Self {
        // dummy slot at index 0, the document at index 1
        let nodes = vec![
            Node::empty(NodeKind::Document, None),
            Node::empty(NodeKind::Document, None),
        ];
        Tree { nodes, top }
    }

    /// Append a new last child to `parent`.
    pub(crate) fn append(
        &mut self,
        parent: NodeId,
        label: Label,
        kind: NodeKind,
        text: Option<Box<str>>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let mut node = Node::empty(kind, Some(parent));
        node.label = label;
        node.text = text;

        if let Some(last_child_id) = self.nodes[parent.get()].last_child {
            self.nodes[last_child_id.get()].next_sibling = Some(id);
            node.prev_sibling = Some(last_child_id);
        } else {
            self.nodes[parent.get()].first_child = Some(id);
        }
        self.nodes[parent.get()].last_child = Some(id);
        self.nodes.push(node);

        id
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.get()]
    }

    /// Id of the document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::root_id()
    }

    /// Handle to the document root.
    #[must_use]
    pub fn document(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.root())
    }

    /// Handle to the node with the given id, or `None` if the id is past the end of this tree.
    ///
    /// Only the bounds are checked. An id issued by another tree that happens to be in range
    /// resolves to whatever node of this tree has the same index.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.get() < self.nodes.len()).then(|| NodeRef::new(self, id))
    }

    /// Number of nodes, the document root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Layout of the top-level JSON value.
    #[must_use]
    pub fn top_layout(&self) -> Layout {
        self.top
    }

    pub(crate) fn layout(&self, id: NodeId) -> Layout {
        match self.node(id).kind {
            NodeKind::Document => self.top,
            NodeKind::Object => Layout::Object,
            NodeKind::Array => Layout::Array,
            NodeKind::Leaf(_) => Layout::Scalar,
        }
    }

    pub(crate) fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        successors(self.node(id).first_child, |&node| self.node(node).next_sibling)
    }

    pub(crate) fn children_rev(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        successors(self.node(id).last_child, |&node| self.node(node).prev_sibling)
    }

    /// Next node after `id` in document order that is still inside the subtree of `scope`.
    pub(crate) fn next_in_subtree(&self, scope: NodeId, id: NodeId) -> Option<NodeId> {
        if let Some(child) = self.node(id).first_child {
            return Some(child);
        }
        let mut current = id;
        while current != scope {
            let node = self.node(current);
            if let Some(sibling) = node.next_sibling {
                return Some(sibling);
            }
            current = node.parent?;
        }
        None
    }

    /// Leaf text of `id`, or the concatenated text of all leaves below it in document order.
    pub(crate) fn inner_text(&self, id: NodeId) -> String {
        let mut buffer = String::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            if let Some(text) = &self.node(node_id).text {
                buffer.push_str(text);
            }
            current = self.next_in_subtree(id, node_id);
        }
        buffer
    }
}

impl Node {
    fn empty(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Node {
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            label: Label::None,
            kind,
            text: None,
        }
    }
}
