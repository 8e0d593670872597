use serde_json::Value;

use crate::{
    tree::{Label, Layout, NodeId, NodeKind, Scalar, Tree},
    Error,
};

struct Pending<'v> {
    parent: NodeId,
    label: Label,
    value: &'v Value,
    /// Nesting level this value opens if it is a container.
    level: usize,
}

/// Build a tree out of an already decoded JSON value.
///
/// The document root counts as the first nesting level when the top-level value is a container.
pub(crate) fn build(value: &Value, max_depth: usize) -> Result<Tree, Error> {
    let top = match value {
        Value::Object(_) => Layout::Object,
        Value::Array(_) => Layout::Array,
        _ => Layout::Scalar,
    };
    if top != Layout::Scalar && max_depth == 0 {
        return Err(Error::depth_limit_exceeded(max_depth));
    }
    let mut tree = Tree::new(top);
    let mut stack = Vec::new();
    let root = tree.root();
    match value {
        Value::Object(_) | Value::Array(_) => push_children(&mut stack, root, value, 2),
        scalar => stack.push(Pending {
            parent: root,
            label: Label::None,
            value: scalar,
            level: 1,
        }),
    }

    while let Some(Pending {
        parent,
        label,
        value,
        level,
    }) = stack.pop()
    {
        match value {
            Value::Null => {
                tree.append(
                    parent,
                    label,
                    NodeKind::Leaf(Scalar::Null),
                    Some(Box::default()),
                );
            }
            Value::Bool(b) => {
                let text = if *b { "true" } else { "false" };
                tree.append(parent, label, NodeKind::Leaf(Scalar::Bool), Some(text.into()));
            }
            Value::Number(n) => {
                tree.append(
                    parent,
                    label,
                    NodeKind::Leaf(Scalar::Number),
                    Some(n.to_string().into_boxed_str()),
                );
            }
            Value::String(s) => {
                tree.append(
                    parent,
                    label,
                    NodeKind::Leaf(Scalar::String),
                    Some(s.as_str().into()),
                );
            }
            Value::Object(_) | Value::Array(_) => {
                if level > max_depth {
                    return Err(Error::depth_limit_exceeded(max_depth));
                }
                let kind = if value.is_object() {
                    NodeKind::Object
                } else {
                    NodeKind::Array
                };
                let node_id = tree.append(parent, label, kind, None);
                push_children(&mut stack, node_id, value, level + 1);
            }
        }
    }

    tracing::debug!(
        nodes = tree.node_count(),
        top = ?tree.top_layout(),
        "Decoded JSON document"
    );
    Ok(tree)
}

/// Schedule the members or elements of `value`, last first, so they pop in source order.
fn push_children<'v>(stack: &mut Vec<Pending<'v>>, parent: NodeId, value: &'v Value, level: usize) {
    match value {
        Value::Object(object) => {
            for (key, member) in object.iter().rev() {
                stack.push(Pending {
                    parent,
                    label: Label::Key(key.as_str().into()),
                    value: member,
                    level,
                });
            }
        }
        Value::Array(items) => {
            for item in items.iter().rev() {
                stack.push(Pending {
                    parent,
                    label: Label::Element,
                    value: item,
                    level,
                });
            }
        }
        _ => {}
    }
}
