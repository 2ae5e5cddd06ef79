//! DOM events - listener registry and capture/bubble dispatch
//!
//! Listeners are plain closures stored per node. They receive the arena
//! they are dispatched against, so a listener can mutate the tree
//! (toggle styles, strip attributes) without reaching for shared state.

use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;

use crate::arena::DomArena;
use crate::types::NodeId;

/// Event kinds the reader cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    /// Resource finished loading (stylesheets)
    Load,
}

impl EventKind {
    /// Whether the event propagates to ancestors after reaching its target
    pub fn bubbles(self) -> bool {
        matches!(self, EventKind::Click)
    }
}

/// A single dispatched event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    /// Node whose listener is currently running
    pub current_target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Event listener callback
pub type Listener = Arc<dyn Fn(&mut DomArena, &mut DomEvent) + Send + Sync>;

#[derive(Clone)]
struct Registration {
    kind: EventKind,
    capture: bool,
    listener: Listener,
}

/// Listeners keyed by the node they are attached to
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    by_node: AHashMap<NodeId, Vec<Registration>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node_id: NodeId, kind: EventKind, capture: bool, listener: Listener) {
        self.by_node.entry(node_id).or_default().push(Registration {
            kind,
            capture,
            listener,
        });
    }

    /// Number of listeners of `kind` attached to a node, both phases
    pub fn count(&self, node_id: NodeId, kind: EventKind) -> usize {
        self.by_node
            .get(&node_id)
            .map(|regs| regs.iter().filter(|r| r.kind == kind).count())
            .unwrap_or(0)
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.by_node.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of matching listeners, so callbacks may run while the
    /// registry itself is not borrowed
    pub fn matching(&self, node_id: NodeId, kind: EventKind, capture: bool) -> Vec<Listener> {
        self.by_node
            .get(&node_id)
            .map(|regs| {
                regs.iter()
                    .filter(|r| r.kind == kind && r.capture == capture)
                    .map(|r| Arc::clone(&r.listener))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("nodes", &self.by_node.len())
            .field("listeners", &self.len())
            .finish()
    }
}

/// Run one event through its propagation path
///
/// Capture listeners fire root → target, then non-capture listeners fire
/// target → root (target only for non-bubbling kinds).
pub fn dispatch(
    arena: &mut DomArena,
    listeners: &ListenerRegistry,
    target: NodeId,
    kind: EventKind,
) -> DomEvent {
    let mut event = DomEvent::new(kind, target);

    // root first
    let mut path = arena.ancestors(target);
    path.reverse();

    let capture_path = path.iter().copied().chain(std::iter::once(target));
    for node_id in capture_path {
        run_listeners(arena, listeners.matching(node_id, kind, true), node_id, &mut event);
        if event.propagation_stopped() {
            return event;
        }
    }

    let bubble_path: Vec<NodeId> = if kind.bubbles() {
        std::iter::once(target).chain(path.iter().rev().copied()).collect()
    } else {
        vec![target]
    };
    for node_id in bubble_path {
        run_listeners(arena, listeners.matching(node_id, kind, false), node_id, &mut event);
        if event.propagation_stopped() {
            break;
        }
    }

    event
}

fn run_listeners(
    arena: &mut DomArena,
    listeners: Vec<Listener>,
    node_id: NodeId,
    event: &mut DomEvent,
) {
    for listener in listeners {
        event.current_target = node_id;
        listener(arena, event);
    }
}
