//! DOM Serializer - Convert the arena back to HTML markup
//!
//! Follows the HTML fragment serialization rules closely enough for
//! round-tripping MkDocs output: void elements have no end tag, raw-text
//! elements (`style`, `script`) are emitted verbatim, everything else is
//! escaped.

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::*;

/// Pending work while walking the tree
enum Step {
    Open(NodeId),
    Close(NodeId),
    /// Text inside `style`/`script`, emitted unescaped
    Raw(NodeId),
}

/// DOM Tree Serializer
#[derive(Debug, Clone, Copy)]
pub struct DomSerializer;

impl DomSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the whole tree starting at the root
    pub fn serialize(&self, arena: &DomArena) -> Result<String> {
        let mut output = String::with_capacity(4096);
        if let Some(root_id) = arena.root_id() {
            self.serialize_node(arena, root_id, &mut output)?;
        }
        Ok(output)
    }

    /// Outer HTML of a single node
    pub fn outer_html(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::new();
        self.serialize_node(arena, node_id, &mut output)?;
        Ok(output)
    }

    fn serialize_node(&self, arena: &DomArena, node_id: NodeId, output: &mut String) -> Result<()> {
        let mut stack = vec![Step::Open(node_id)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Open(id) => {
                    let node = arena.get(id)?;
                    match node.node_type {
                        NodeType::Element => {
                            open_tag(node, output);
                            if VOID_ELEMENTS.contains(&node.node_name.as_str()) {
                                continue;
                            }

                            stack.push(Step::Close(id));
                            let raw = RAW_TEXT_ELEMENTS.contains(&node.node_name.as_str());
                            // reversed so the leftmost child pops first
                            for &child_id in node.children_ids.iter().rev() {
                                if raw && arena.get(child_id)?.is_text() {
                                    stack.push(Step::Raw(child_id));
                                } else {
                                    stack.push(Step::Open(child_id));
                                }
                            }
                        }
                        NodeType::Text => escape_into(&node.node_value, false, output),
                        NodeType::Comment => {
                            output.push_str("<!--");
                            output.push_str(&node.node_value);
                            output.push_str("-->");
                        }
                    }
                }
                Step::Close(id) => {
                    output.push_str("</");
                    output.push_str(&arena.get(id)?.node_name);
                    output.push('>');
                }
                Step::Raw(id) => output.push_str(&arena.get(id)?.node_value),
            }
        }

        Ok(())
    }
}

fn open_tag(node: &DomNode, output: &mut String) {
    output.push('<');
    output.push_str(&node.node_name);
    for (name, value) in &node.attributes {
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        escape_into(value, true, output);
        output.push('"');
    }
    output.push('>');
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(text: &str, attribute: bool, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if attribute => output.push_str("&quot;"),
            '<' if !attribute => output.push_str("&lt;"),
            '>' if !attribute => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}
