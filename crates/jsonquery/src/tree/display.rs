use core::fmt::{self, Write};

use super::{Label, NodeId, NodeKind, Tree};

/// Renders a subtree the way path-query engines see it: every member or element becomes an XML
/// element named after its label and leaves carry their text.
///
/// ```rust
/// # fn main() -> Result<(), jsonquery::Error> {
/// let tree = jsonquery::parse_str(r#"{"name": "Ford", "models": ["Fiesta", "Focus"]}"#)?;
/// assert_eq!(
///     tree.document().output_xml().to_string(),
///     concat!(
///         r#"<?xml version="1.0" encoding="utf-8"?><root>"#,
///         "<name>Ford</name>",
///         "<models><element>Fiesta</element><element>Focus</element></models>",
///         "</root>",
///     )
/// );
/// # Ok(())
/// # }
/// ```
pub struct XmlAdapter<'t> {
    tree: &'t Tree,
    node_id: NodeId,
}

impl<'t> XmlAdapter<'t> {
    pub(super) fn new(tree: &'t Tree, node_id: NodeId) -> Self {
        Self { tree, node_id }
    }

    fn write_open(
        &self,
        f: &mut fmt::Formatter<'_>,
        node_id: NodeId,
        steps: &mut Vec<Step>,
    ) -> fmt::Result {
        let node = self.tree.node(node_id);
        if node.kind == NodeKind::Document {
            f.write_str(r#"<?xml version="1.0" encoding="utf-8"?><root>"#)?;
            steps.push(Step::Close(node_id));
            steps.extend(self.tree.children_rev(node_id).map(Step::Open));
            return Ok(());
        }
        if let Label::None = node.label {
            // Scalar top-level value
            return write_escaped(f, node.text.as_deref().unwrap_or_default());
        }
        f.write_char('<')?;
        write_escaped(f, node.label.as_str())?;
        f.write_char('>')?;
        if let Some(text) = &node.text {
            write_escaped(f, text)?;
            self.write_close(f, node_id)
        } else {
            steps.push(Step::Close(node_id));
            steps.extend(self.tree.children_rev(node_id).map(Step::Open));
            Ok(())
        }
    }

    fn write_close(&self, f: &mut fmt::Formatter<'_>, node_id: NodeId) -> fmt::Result {
        let node = self.tree.node(node_id);
        if node.kind == NodeKind::Document {
            return f.write_str("</root>");
        }
        f.write_str("</")?;
        write_escaped(f, node.label.as_str())?;
        f.write_char('>')
    }
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl fmt::Display for XmlAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut steps = vec![Step::Open(self.node_id)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(node_id) => self.write_open(f, node_id, &mut steps)?,
                Step::Close(node_id) => self.write_close(f, node_id)?,
            }
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        let replacement = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&apos;",
            _ => continue,
        };
        f.write_str(&text[start..idx])?;
        f.write_str(replacement)?;
        start = idx + ch.len_utf8();
    }
    f.write_str(&text[start..])
}
