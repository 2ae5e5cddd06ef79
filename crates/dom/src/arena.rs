//! Node storage for one parsed page
//!
//! ```text
//! nodes: [html][head][body][p][#text]...
//!          0     1     2    3    4      ← NodeId = slot index
//! ```
//!
//! Storage is append-only. Removing a node detaches it from its parent;
//! the slot stays allocated but is no longer reachable from the root, and
//! every query below walks from the root, so detached nodes never show up.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Flat node store; links between nodes are `NodeId`s, never pointers
#[derive(Debug, Clone)]
pub struct DomArena {
    nodes: Vec<DomNode>,
    /// Document element once parsing finished
    root_id: Option<NodeId>,
}

impl DomArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(1024), // a small MkDocs page
            root_id: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Store `node` in the next free slot.
    ///
    /// The node's own `node_id` is overwritten with its arena slot.
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        self.nodes.push(node);
        node_id
    }

    /// Allocate a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.add_node(DomNode::element(0, tag))
    }

    /// Allocate a detached text node
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.add_node(DomNode::text(0, value))
    }

    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Document element
    pub fn root(&self) -> Result<&DomNode> {
        let root_id = self.root_id.ok_or(DomError::NoRoot)?;
        self.get(root_id)
    }

    /// Total number of allocated nodes, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child nodes in document order
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Ancestors of a node, nearest first (the node itself excluded)
    pub fn ancestors(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.get(node_id).ok().and_then(|n| n.parent_id);
        while let Some(id) = current {
            out.push(id);
            current = self.get(id).ok().and_then(|n| n.parent_id);
        }
        out
    }

    /// Whether the node is reachable from the root
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        let Some(root_id) = self.root_id else {
            return false;
        };
        node_id == root_id || self.ancestors(node_id).last() == Some(&root_id)
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_node = self.get(parent)?;
        if !parent_node.is_element() {
            return Err(DomError::InvalidNodeType {
                expected: "element".to_string(),
                actual: parent_node.node_name.clone(),
            });
        }
        self.get(child)?;
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child)?;
        self.get_mut(parent)?.children_ids.push(child);
        self.get_mut(child)?.parent_id = Some(parent);
        Ok(())
    }

    /// Remove a node (and its subtree) from its parent
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let parent_id = self.get(node_id)?.parent_id;
        if let Some(parent_id) = parent_id {
            let parent = self.get_mut(parent_id)?;
            parent.children_ids.retain(|id| *id != node_id);
        }
        self.get_mut(node_id)?.parent_id = None;
        Ok(())
    }

    /// Pre-order walk from `start_id`; stops at the first error `visit` returns
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // reversed so the leftmost child pops first
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Node IDs of the subtree rooted at `start_id`, in document order
    /// (the start node first)
    pub fn subtree(&self, start_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let _ = self.traverse_df(start_id, |node| {
            out.push(node.node_id);
            Ok(())
        });
        out
    }

    /// Find nodes under `start_id` matching predicate, in document order
    pub fn find_in<F>(&self, start_id: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.subtree(start_id)
            .into_iter()
            .filter(|&id| self.get(id).map(&predicate).unwrap_or(false))
            .collect()
    }

    /// First node under `start_id` matching predicate
    pub fn find_one_in<F>(&self, start_id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.subtree(start_id)
            .into_iter()
            .find(|&id| self.get(id).map(&predicate).unwrap_or(false))
    }

    /// Find connected nodes matching predicate
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        match self.root_id {
            Some(root_id) => self.find_in(root_id, predicate),
            None => Vec::new(),
        }
    }

    /// Find first connected node matching predicate
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        self.find_one_in(self.root_id?, predicate)
    }

    /// `getElementsByTagName`
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| node.is_tag(tag))
    }

    /// `getElementById`
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_one(|node| node.node_type == NodeType::Element && node.attr("id") == Some(id))
    }

    /// Find all elements carrying a class
    pub fn find_by_class(&self, class_name: &str) -> Vec<NodeId> {
        self.find(|node| node.is_element() && node.has_class(class_name))
    }

    /// Nearest inclusive ancestor matching predicate
    pub fn closest<F>(&self, node_id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        std::iter::once(node_id)
            .chain(self.ancestors(node_id))
            .find(|&id| self.get(id).map(&predicate).unwrap_or(false))
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomArena, NodeId, NodeId, NodeId) {
        // root -> [child1, child2]
        let mut arena = DomArena::new();
        let root = arena.create_element("div");
        arena.set_root(root).unwrap();
        let child1 = arena.create_element("span");
        let child2 = arena.create_element("p");
        arena.append_child(root, child1).unwrap();
        arena.append_child(root, child2).unwrap();
        (arena, root, child1, child2)
    }

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();

        let id = arena.add_node(DomNode::element(42, "div"));
        assert_eq!(id, 0);

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.node_name, "div");
        assert_eq!(retrieved.node_id, 0);
    }

    #[test]
    fn test_traverse_df() {
        let (arena, root, _, _) = sample();

        let mut visited = Vec::new();
        arena
            .traverse_df(root, |node| {
                visited.push(node.node_name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["div", "span", "p"]);
    }

    #[test]
    fn test_detached_nodes_are_not_found() {
        let (mut arena, _, child1, _) = sample();

        assert_eq!(arena.find_by_tag("span"), vec![child1]);
        arena.detach(child1).unwrap();

        assert!(arena.find_by_tag("span").is_empty());
        assert!(!arena.is_connected(child1));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut arena, root, child1, child2) = sample();

        arena.append_child(child2, child1).unwrap();

        assert_eq!(arena.get(root).unwrap().children_ids.as_slice(), &[child2]);
        assert_eq!(arena.get(child1).unwrap().parent_id, Some(child2));
        assert_eq!(arena.ancestors(child1), vec![child2, root]);
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut arena, root, child1, _) = sample();

        assert!(matches!(
            arena.append_child(child1, root),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_text_cannot_have_children() {
        let (mut arena, _, child1, _) = sample();
        let text = arena.create_text("a");
        let other = arena.create_text("b");
        arena.append_child(child1, text).unwrap();

        assert!(matches!(
            arena.append_child(text, other),
            Err(DomError::InvalidNodeType { .. })
        ));
    }

    #[test]
    fn test_closest() {
        let (mut arena, root, child1, _) = sample();
        let text = arena.create_text("hello");
        arena.append_child(child1, text).unwrap();

        assert_eq!(arena.closest(text, |n| n.is_tag("span")), Some(child1));
        assert_eq!(arena.closest(text, |n| n.is_tag("div")), Some(root));
        assert_eq!(arena.closest(text, |n| n.is_tag("a")), None);
    }
}
