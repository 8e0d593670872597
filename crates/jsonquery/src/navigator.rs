//! Read-only traversal contract consumed by path-query engines.
use std::borrow::Cow;

use crate::tree::{NodeId, NodeKind, NodeRef, Tree};

/// Coarse node category reported to query engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// The document root.
    Root,
    /// An object or array.
    Container,
    /// A scalar.
    Leaf,
}

/// Primitives a format-agnostic path-query engine needs to walk an ordered tree.
///
/// A navigator is a cursor: it points at one node and moves around. Cloning it yields an
/// independent cursor at the same position. Every `move_*` method that returns `bool` leaves the
/// cursor where it was when it returns `false`.
pub trait Navigator: Clone {
    /// Category of the current node.
    fn node_type(&self) -> NodeType;
    /// Name of the current node as seen by the query language.
    fn local_name(&self) -> &str;
    /// String value of the current node: the leaf text, or for containers the concatenated text
    /// of all descendant leaves in document order.
    fn value(&self) -> Cow<'_, str>;
    /// Move to the document root. Always succeeds.
    fn move_to_root(&mut self);
    /// Move to the parent. Fails at the document root.
    fn move_to_parent(&mut self) -> bool;
    /// Move to the first child.
    fn move_to_child(&mut self) -> bool;
    /// Move to the first sibling. Fails when already there.
    fn move_to_first(&mut self) -> bool;
    /// Move to the next sibling.
    fn move_to_next(&mut self) -> bool;
    /// Move to the previous sibling.
    fn move_to_previous(&mut self) -> bool;
    /// Move to the position of `other`. Fails when `other` walks a different tree.
    fn move_to(&mut self, other: &Self) -> bool;
    /// Whether both cursors point at the very same node.
    fn is_same_position(&self, other: &Self) -> bool;
}

/// A [`Navigator`] over a [`Tree`].
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t> {
    tree: &'t Tree,
    current: NodeId,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(tree: &'t Tree, current: NodeId) -> Self {
        Self { tree, current }
    }

    /// The node under the cursor.
    #[must_use]
    pub fn node(&self) -> NodeRef<'t> {
        NodeRef::new(self.tree, self.current)
    }

    #[inline]
    fn step(&mut self, target: Option<NodeId>) -> bool {
        match target {
            Some(id) => {
                self.current = id;
                true
            }
            None => false,
        }
    }
}

impl Navigator for Cursor<'_> {
    fn node_type(&self) -> NodeType {
        match self.tree.node(self.current).kind {
            NodeKind::Document => NodeType::Root,
            NodeKind::Object | NodeKind::Array => NodeType::Container,
            NodeKind::Leaf(_) => NodeType::Leaf,
        }
    }

    fn local_name(&self) -> &str {
        self.tree.node(self.current).label.as_str()
    }

    fn value(&self) -> Cow<'_, str> {
        match &self.tree.node(self.current).text {
            Some(text) => Cow::Borrowed(&**text),
            None => Cow::Owned(self.tree.inner_text(self.current)),
        }
    }

    fn move_to_root(&mut self) {
        self.current = self.tree.root();
    }

    fn move_to_parent(&mut self) -> bool {
        self.step(self.tree.node(self.current).parent)
    }

    fn move_to_child(&mut self) -> bool {
        self.step(self.tree.node(self.current).first_child)
    }

    fn move_to_first(&mut self) -> bool {
        let node = self.tree.node(self.current);
        if node.prev_sibling.is_none() {
            return false;
        }
        let first = node
            .parent
            .and_then(|parent| self.tree.node(parent).first_child);
        self.step(first)
    }

    fn move_to_next(&mut self) -> bool {
        self.step(self.tree.node(self.current).next_sibling)
    }

    fn move_to_previous(&mut self) -> bool {
        self.step(self.tree.node(self.current).prev_sibling)
    }

    fn move_to(&mut self, other: &Self) -> bool {
        if std::ptr::eq(self.tree, other.tree) {
            self.current = other.current;
            true
        } else {
            false
        }
    }

    fn is_same_position(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

/// An external path-query engine.
///
/// Implementations compile and evaluate `expr` however they like, walking the tree only through
/// the [`Navigator`] contract, and return the matched positions.
pub trait PathEngine {
    type Error;

    /// Evaluate `expr` with `context` as the context node.
    ///
    /// # Errors
    ///
    /// Whatever the engine reports for invalid or failing expressions.
    fn select<'t>(&self, expr: &str, context: Cursor<'t>) -> Result<Vec<Cursor<'t>>, Self::Error>;
}

impl<'t> NodeRef<'t> {
    /// Evaluate `expr` relative to this node and return every match in the order the engine
    /// produced them.
    ///
    /// # Errors
    ///
    /// Engine failures are returned unchanged.
    pub fn query_all<E: PathEngine>(
        self,
        engine: &E,
        expr: &str,
    ) -> Result<Vec<NodeRef<'t>>, E::Error> {
        let matches = engine.select(expr, self.cursor())?;
        tracing::trace!(expr, matches = matches.len(), "Evaluated path query");
        Ok(matches.iter().map(Cursor::node).collect())
    }

    /// Evaluate `expr` relative to this node and return the first match.
    ///
    /// # Errors
    ///
    /// Engine failures are returned unchanged.
    pub fn query<E: PathEngine>(
        self,
        engine: &E,
        expr: &str,
    ) -> Result<Option<NodeRef<'t>>, E::Error> {
        Ok(self.query_all(engine, expr)?.into_iter().next())
    }
}

impl Tree {
    /// Evaluate `expr` against the document root.
    ///
    /// # Errors
    ///
    /// Engine failures are returned unchanged.
    pub fn query_all<E: PathEngine>(
        &self,
        engine: &E,
        expr: &str,
    ) -> Result<Vec<NodeRef<'_>>, E::Error> {
        self.document().query_all(engine, expr)
    }

    /// Evaluate `expr` against the document root and return the first match.
    ///
    /// # Errors
    ///
    /// Engine failures are returned unchanged.
    pub fn query<E: PathEngine>(
        &self,
        engine: &E,
        expr: &str,
    ) -> Result<Option<NodeRef<'_>>, E::Error> {
        self.document().query(engine, expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    const PEOPLE: &str = r#"{"people": [{"name": "joe", "age": 45}, {"name": "mark", "age": 2}], "n": null}"#;

    #[test]
    fn test_walk() {
        let tree = parse_str(PEOPLE).expect("Valid JSON");
        let mut cursor = tree.document().cursor();
        assert_eq!(cursor.node_type(), NodeType::Root);
        assert_eq!(cursor.local_name(), "");

        assert!(cursor.move_to_child());
        assert_eq!(cursor.local_name(), "people");
        assert_eq!(cursor.node_type(), NodeType::Container);
        assert!(cursor.move_to_child());
        assert_eq!(cursor.local_name(), "element");
        assert!(cursor.move_to_next());
        assert!(cursor.move_to_child());
        assert_eq!(cursor.local_name(), "name");
        assert_eq!(cursor.value(), "mark");
        assert_eq!(cursor.node_type(), NodeType::Leaf);
        assert!(cursor.move_to_next());
        assert_eq!(cursor.value(), "2");

        assert!(cursor.move_to_parent());
        assert_eq!(cursor.value(), "mark2");
        assert!(cursor.move_to_previous());
        assert_eq!(cursor.value(), "joe45");

        cursor.move_to_root();
        assert_eq!(cursor.node_type(), NodeType::Root);
        assert_eq!(cursor.value(), "joe45mark2");
    }

    #[test]
    fn test_failed_moves_keep_position() {
        let tree = parse_str(PEOPLE).expect("Valid JSON");
        let mut cursor = tree.document().cursor();
        let root = cursor;
        assert!(!cursor.move_to_parent());
        assert!(!cursor.move_to_next());
        assert!(!cursor.move_to_previous());
        assert!(!cursor.move_to_first());
        assert!(cursor.is_same_position(&root));

        assert!(cursor.move_to_child());
        let people = cursor;
        assert!(!cursor.move_to_previous());
        assert!(!cursor.move_to_first());
        assert!(cursor.is_same_position(&people));

        // `n` is a leaf
        assert!(cursor.move_to_next());
        let null = cursor;
        assert!(!cursor.move_to_child());
        assert!(!cursor.move_to_next());
        assert!(cursor.is_same_position(&null));
        assert_eq!(cursor.value(), "");
    }

    #[test]
    fn test_move_to_first_sibling() {
        let tree = parse_str("[1, 2, 3]").expect("Valid JSON");
        let mut cursor = tree.document().cursor();
        assert!(cursor.move_to_child());
        let first = cursor;
        assert!(cursor.move_to_next());
        assert!(cursor.move_to_next());
        assert_eq!(cursor.value(), "3");
        assert!(cursor.move_to_first());
        assert!(cursor.is_same_position(&first));
    }

    #[test]
    fn test_duplicates_are_independent() {
        let tree = parse_str(PEOPLE).expect("Valid JSON");
        let original = tree.document().cursor();
        let mut copy = original;
        assert!(copy.move_to_child());
        assert!(!copy.is_same_position(&original));
        assert_eq!(original.node_type(), NodeType::Root);

        let mut other = original;
        assert!(other.move_to(&copy));
        assert!(other.is_same_position(&copy));
        assert_eq!(other.node(), copy.node());
    }

    #[test]
    fn test_cursors_of_different_trees() {
        let first = parse_str("[1]").expect("Valid JSON");
        let second = parse_str("[1]").expect("Valid JSON");
        let mut cursor = first.document().cursor();
        let foreign = second.document().cursor();
        assert!(!cursor.is_same_position(&foreign));
        assert!(!cursor.move_to(&foreign));
    }

    struct Children;

    impl PathEngine for Children {
        type Error = String;

        fn select<'t>(
            &self,
            expr: &str,
            context: Cursor<'t>,
        ) -> Result<Vec<Cursor<'t>>, Self::Error> {
            if expr != "*" {
                return Err(format!("unsupported expression: {expr}"));
            }
            let mut matches = Vec::new();
            let mut cursor = context;
            if cursor.move_to_child() {
                loop {
                    matches.push(cursor);
                    if !cursor.move_to_next() {
                        break;
                    }
                }
            }
            Ok(matches)
        }
    }

    #[test]
    fn test_query_bridge() {
        let tree = parse_str(r#"{"a": 1, "b": 2}"#).expect("Valid JSON");
        let labels: Vec<_> = tree
            .query_all(&Children, "*")
            .expect("Supported")
            .into_iter()
            .map(NodeRef::label)
            .collect();
        assert_eq!(labels, vec!["a", "b"]);
        let first = tree.query(&Children, "*").expect("Supported");
        assert_eq!(first.map(NodeRef::label), Some("a"));
        let leaf = first.expect("Match exists");
        assert_eq!(leaf.query(&Children, "*"), Ok(None));
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let tree = parse_str("[]").expect("Valid JSON");
        assert_eq!(
            tree.query_all(&Children, "//x"),
            Err("unsupported expression: //x".to_string())
        );
    }
}
