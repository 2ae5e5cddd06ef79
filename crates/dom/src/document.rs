//! Document - a parsed tree plus the listeners attached to it
//!
//! This is the unit the reader passes around: transformer steps receive
//! one by value, mutate it, and hand it on.

use std::fmt;

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::events::{self, DomEvent, EventKind, Listener, ListenerRegistry};
use crate::parser;
use crate::serializer::DomSerializer;
use crate::types::NodeId;

#[derive(Clone, Default)]
pub struct Document {
    arena: DomArena,
    listeners: ListenerRegistry,
}

impl Document {
    /// Parse markup into a rooted document
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self::from_arena(parser::parse_html(html)?))
    }

    pub fn from_arena(arena: DomArena) -> Self {
        Self {
            arena,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut DomArena {
        &mut self.arena
    }

    /// Document element (`<html>`)
    pub fn root_id(&self) -> Option<NodeId> {
        self.arena.root_id()
    }

    /// The `<head>` element directly under the root
    pub fn head(&self) -> Option<NodeId> {
        let root = self.arena.root().ok()?;
        root.children_ids
            .iter()
            .copied()
            .find(|&id| self.arena.get(id).map(|n| n.is_tag("head")).unwrap_or(false))
    }

    pub fn add_event_listener(
        &mut self,
        node_id: NodeId,
        kind: EventKind,
        capture: bool,
        listener: Listener,
    ) -> Result<()> {
        self.arena.get(node_id)?;
        self.listeners.add(node_id, kind, capture, listener);
        Ok(())
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Dispatch an event at a connected node
    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) -> Result<DomEvent> {
        if !self.arena.is_connected(target) {
            return Err(DomError::NodeNotFound(target));
        }
        Ok(events::dispatch(
            &mut self.arena,
            &self.listeners,
            target,
            kind,
        ))
    }

    /// Serialize the document element
    pub fn to_html(&self) -> Result<String> {
        DomSerializer::new().serialize(&self.arena)
    }

    pub fn outer_html(&self, node_id: NodeId) -> Result<String> {
        DomSerializer::new().outer_html(&self.arena, node_id)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.arena.root_id())
            .field("nodes", &self.arena.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_head_lookup() {
        let doc = Document::parse("<title>x</title><p>y</p>").unwrap();

        let head = doc.head().unwrap();
        assert_eq!(doc.arena().get(head).unwrap().node_name, "head");
    }

    #[test]
    fn test_dispatch_rejects_detached_target() {
        let mut doc = Document::parse("<p id=\"gone\">y</p>").unwrap();
        let p = doc.arena().find_by_id("gone").unwrap();
        doc.arena_mut().detach(p).unwrap();

        assert!(matches!(
            doc.dispatch(p, EventKind::Click),
            Err(DomError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_clone_shares_listeners() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut doc = Document::parse("<a href=\"#x\">x</a>").unwrap();
        let a = doc.arena().find_by_tag("a")[0];
        let counter = hits.clone();
        doc.add_event_listener(
            a,
            EventKind::Click,
            false,
            Arc::new(move |_arena: &mut DomArena, _event: &mut DomEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        let mut copy = doc.clone();
        copy.dispatch(a, EventKind::Click).unwrap();
        doc.dispatch(a, EventKind::Click).unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
