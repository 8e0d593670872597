//! Turning matched nodes back into JSON values.
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::tree::{Layout, NodeId, NodeKind, NodeRef, Scalar, Tree};

/// How each matched node is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The node's own value only.
    #[default]
    Flat,
    /// The node's value wrapped in a pruned copy of its ancestors, up to the document root.
    FullPath,
}

/// Materialize every node in `nodes`, preserving their order.
///
/// Each node is converted independently. In [`Mode::FullPath`] two matches sharing ancestors
/// still produce two separate fragments.
///
/// ```rust
/// use jsonquery::Mode;
/// use serde_json::json;
///
/// # fn main() -> Result<(), jsonquery::Error> {
/// let tree = jsonquery::parse_str(r#"{"top": {"sites": [{"a": 1, "b": 2}]}}"#)?;
/// let site = tree.document().descendants().find(|n| n.label() == "b").expect("Member exists");
/// assert_eq!(jsonquery::nodes_to_value([site], Mode::Flat), json!(["2"]));
/// assert_eq!(
///     jsonquery::nodes_to_value([site], Mode::FullPath),
///     json!([{"top": {"sites": [{"b": "2"}]}}])
/// );
/// # Ok(())
/// # }
/// ```
pub fn nodes_to_value<'t>(nodes: impl IntoIterator<Item = NodeRef<'t>>, mode: Mode) -> Value {
    let convert = match mode {
        Mode::Flat => to_value,
        Mode::FullPath => to_full_path_value,
    };
    Value::Array(nodes.into_iter().map(convert).collect())
}

enum Step {
    Enter(NodeId),
    /// Assemble a container out of the last `usize` converted values.
    Exit(NodeId, usize),
}

pub(crate) fn to_value(node: NodeRef<'_>) -> Value {
    let tree = node.tree;
    let mut steps = vec![Step::Enter(node.id)];
    let mut values = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(id) => {
                let current = tree.node(id);
                if let NodeKind::Leaf(scalar) = current.kind {
                    values.push(leaf_value(scalar, current.text.as_deref()));
                    continue;
                }
                steps.push(Step::Exit(id, tree.children(id).count()));
                steps.extend(tree.children_rev(id).map(Step::Enter));
            }
            Step::Exit(id, count) => {
                let items = values.split_off(values.len() - count);
                values.push(assemble(tree, id, items));
            }
        }
    }

    values.pop().unwrap_or(Value::Null)
}

fn leaf_value(scalar: Scalar, text: Option<&str>) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        _ => Value::String(text.unwrap_or_default().to_owned()),
    }
}

fn assemble(tree: &Tree, id: NodeId, items: Vec<Value>) -> Value {
    match tree.layout(id) {
        Layout::Array => Value::Array(items),
        Layout::Object => {
            // Sorted keys; the last of duplicate keys wins
            let mut members = BTreeMap::new();
            for (child, value) in tree.children(id).zip(items) {
                members.insert(tree.node(child).label.as_str(), value);
            }
            Value::Object(
                members
                    .into_iter()
                    .map(|(key, value)| (key.to_owned(), value))
                    .collect::<Map<String, Value>>(),
            )
        }
        Layout::Scalar => items.into_iter().next().unwrap_or(Value::Null),
    }
}

pub(crate) fn to_full_path_value(node: NodeRef<'_>) -> Value {
    let tree = node.tree;
    let mut value = to_value(node);
    let mut current = node.id;
    while let Some(parent) = tree.node(current).parent {
        value = match tree.layout(parent) {
            Layout::Array => Value::Array(vec![value]),
            Layout::Object => {
                let mut member = Map::with_capacity(1);
                member.insert(tree.node(current).label.as_str().to_owned(), value);
                Value::Object(member)
            }
            Layout::Scalar => value,
        };
        current = parent;
    }
    value
}
