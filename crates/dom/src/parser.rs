//! HTML parsing - html5ever tree builder into the arena
//!
//! html5ever does the heavy lifting (tokenizer, tree construction, error
//! recovery). We walk the resulting RcDom once and copy it into a
//! [`DomArena`] rooted at the document element, dropping the `#document`
//! wrapper, doctype and processing instructions.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Parse a full HTML document
///
/// The returned arena's root is the `<html>` element. html5ever synthesizes
/// `html`/`head`/`body` when the markup omits them, so any string yields a
/// rooted tree.
pub fn parse_html(html: &str) -> Result<DomArena> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            // <noscript> content is parsed as markup, so sanitizing sees it
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts).one(html);

    let mut arena = DomArena::with_capacity(html.len() / 16 + 16);
    let document_element = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .ok_or(DomError::NoRoot)?;

    let root_id = convert_tree(&document_element, &mut arena)?.ok_or(DomError::NoRoot)?;
    arena.set_root(root_id)?;

    tracing::trace!(nodes = arena.len(), "parsed html document");
    Ok(arena)
}

/// Copy the RcDom subtree into the arena with an explicit work stack.
///
/// Nesting depth is bounded only by the input, so no recursion here.
/// Children are linked directly: a freshly built tree cannot contain a
/// cycle, and `append_child`'s ancestor check would make deep pages
/// quadratic.
fn convert_tree(document_element: &Handle, arena: &mut DomArena) -> Result<Option<NodeId>> {
    let mut root_id = None;
    let mut stack: Vec<(Handle, Option<NodeId>)> = vec![(document_element.clone(), None)];

    while let Some((handle, parent_id)) = stack.pop() {
        let Some(mut node) = convert_node(&handle) else {
            continue;
        };
        node.parent_id = parent_id;
        let node_id = arena.add_node(node);

        match parent_id {
            Some(parent_id) => arena.get_mut(parent_id)?.children_ids.push(node_id),
            None => root_id = Some(node_id),
        }

        // reversed so the leftmost child pops first
        for child in child_handles(&handle).into_iter().rev() {
            stack.push((child, Some(node_id)));
        }
    }

    Ok(root_id)
}

fn convert_node(handle: &Handle) -> Option<DomNode> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut node = DomNode::element(0, &name.local);
            for attr in attrs.borrow().iter() {
                let key = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                    None => attr.name.local.to_string(),
                };
                node.attributes.push((key, attr.value.to_string()));
            }
            Some(node)
        }
        NodeData::Text { contents } => Some(DomNode::text(0, contents.borrow().to_string())),
        NodeData::Comment { contents } => {
            let mut node = DomNode::new(0, NodeType::Comment, "#comment");
            node.node_value = contents.to_string();
            Some(node)
        }
        _ => None,
    }
}

/// `<template>` keeps its children in a separate fragment
fn child_handles(handle: &Handle) -> Vec<Handle> {
    match &handle.data {
        NodeData::Element {
            template_contents, ..
        } => match &*template_contents.borrow() {
            Some(content) => content.children.borrow().clone(),
            None => handle.children.borrow().clone(),
        },
        _ => handle.children.borrow().clone(),
    }
}
