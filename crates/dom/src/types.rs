//! Node types for the document tree
//!
//! Attributes stay in source order so a parse/serialize cycle of untouched
//! markup reproduces it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Slot in the owning [`DomArena`](crate::DomArena)
pub type NodeId = u32;

/// `Node.nodeType` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
}

/// One node of a parsed page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// Lower-case tag name for elements, `#text` or `#comment`
    pub node_name: String,
    /// Text content for text/comment nodes
    pub node_value: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
}

impl DomNode {
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: impl Into<String>) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name: node_name.into(),
            node_value: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create an element node. Tag names are stored lower-case.
    pub fn element(node_id: NodeId, tag: &str) -> Self {
        Self::new(node_id, NodeType::Element, tag.to_ascii_lowercase())
    }

    /// Create a text node
    pub fn text(node_id: NodeId, value: impl Into<String>) -> Self {
        let mut node = Self::new(node_id, NodeType::Text, "#text");
        node.node_value = value.into();
        node
    }

    /// Element with this tag, compared case-insensitively
    pub fn is_tag(&self, tag: &str) -> bool {
        self.node_type == NodeType::Element && self.node_name.eq_ignore_ascii_case(tag)
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Attribute value; names compare case-insensitively
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set attribute value, keeping its original position when it exists
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_ascii_lowercase(), value)),
        }
    }

    /// Remove attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index).1)
    }

    /// Whitespace-separated class list contains `class_name`
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }
}

/// Elements that never have children or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text content is emitted without escaping
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_keep_order() {
        let mut node = DomNode::element(0, "A");
        node.set_attr("href", "/one");
        node.set_attr("class", "md-nav__link");
        node.set_attr("HREF", "/two");

        assert_eq!(node.node_name, "a");
        assert_eq!(
            node.attributes,
            vec![
                ("href".to_string(), "/two".to_string()),
                ("class".to_string(), "md-nav__link".to_string()),
            ]
        );
        assert_eq!(node.remove_attr("href").as_deref(), Some("/two"));
        assert!(!node.has_attr("href"));
    }

    #[test]
    fn test_has_class() {
        let mut node = DomNode::element(0, "div");
        node.set_attr("class", "md-sidebar  md-sidebar--primary");

        assert!(node.has_class("md-sidebar"));
        assert!(node.has_class("md-sidebar--primary"));
        assert!(!node.has_class("md-side"));
    }
}
