//! Sidebar tracking - pin MkDocs sidebars below the shadow host
//!
//! MkDocs sidebars are `position: fixed`. Inside the app they must start
//! where the docs start, so every window scroll or resize resets their
//! `top` to the shadow host's viewport offset (never above 0).

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use techdocs_dom::utils::set_style_property;
use techdocs_dom::{DomArena, NodeId};

use crate::host::Host;
use crate::listeners::{WindowEventKind, WindowListenerGuard};
use crate::shadow::ShadowRoot;

const TRACKED_EVENTS: &[WindowEventKind] = &[WindowEventKind::Scroll, WindowEventKind::Resize];

/// `top` value for a shadow host at `host_top`
pub fn sidebar_top(host_top: f64) -> String {
    format!("{}px", host_top.max(0.0))
}

/// Set `top` on every sidebar in `arena`
pub fn position_sidebars(arena: &mut DomArena, sidebars: &[NodeId], top: &str) {
    for &sidebar in sidebars {
        if let Ok(node) = arena.get_mut(sidebar) {
            set_style_property(node, "top", top);
        }
    }
}

struct TrackerInner {
    host: Arc<dyn Host>,
    shadow_root: ShadowRoot,
    sidebars: Mutex<Vec<NodeId>>,
    guard: Mutex<Option<WindowListenerGuard>>,
}

impl TrackerInner {
    fn update_position(&self) {
        // copy out so the subtree lock is never taken while holding ours
        let sidebars = self.sidebars.lock().clone();
        if sidebars.is_empty() {
            return;
        }

        let top = sidebar_top(self.host.shadow_host_top());
        self.shadow_root
            .with_document_mut(|doc| position_sidebars(doc.arena_mut(), &sidebars, &top));
    }
}

/// Window listener lifecycle for the current sidebar set
#[derive(Clone)]
pub struct SidebarTracker {
    inner: Arc<TrackerInner>,
}

impl SidebarTracker {
    pub fn new(host: Arc<dyn Host>, shadow_root: ShadowRoot) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                host,
                shadow_root,
                sidebars: Mutex::new(Vec::new()),
                guard: Mutex::new(None),
            }),
        }
    }

    /// Track a new sidebar set.
    ///
    /// Listeners for the previous set are removed before the new ones are
    /// added. Safe to call while the shadow root is being dispatched; it
    /// does not reposition anything itself.
    pub fn set_sidebars(&self, sidebars: Vec<NodeId>) {
        tracing::debug!("[SidebarTracker] tracking {} sidebars", sidebars.len());
        *self.inner.sidebars.lock() = sidebars;

        let weak: Weak<TrackerInner> = Arc::downgrade(&self.inner);
        let mut guard = self.inner.guard.lock();
        if let Some(mut previous) = guard.take() {
            previous.detach();
        }
        *guard = Some(WindowListenerGuard::attach(
            self.inner.host.window(),
            TRACKED_EVENTS,
            Arc::new(move |_kind| {
                if let Some(inner) = weak.upgrade() {
                    inner.update_position();
                }
            }),
        ));
    }

    pub fn sidebars(&self) -> Vec<NodeId> {
        self.inner.sidebars.lock().clone()
    }

    /// Reposition now; must not be called from inside a shadow root dispatch
    pub fn update_position(&self) {
        self.inner.update_position();
    }

    /// Remove window listeners and forget the sidebars
    pub fn detach(&self) {
        if let Some(mut guard) = self.inner.guard.lock().take() {
            guard.detach();
        }
        self.inner.sidebars.lock().clear();
    }

    pub fn is_attached(&self) -> bool {
        self.inner
            .guard
            .lock()
            .as_ref()
            .map(WindowListenerGuard::is_attached)
            .unwrap_or(false)
    }

    pub(crate) fn downgrade(&self) -> WeakSidebarTracker {
        WeakSidebarTracker(Arc::downgrade(&self.inner))
    }
}

/// Non-owning handle for callbacks stored inside the mounted document
#[derive(Clone)]
pub(crate) struct WeakSidebarTracker(Weak<TrackerInner>);

impl WeakSidebarTracker {
    pub(crate) fn upgrade(&self) -> Option<SidebarTracker> {
        self.0.upgrade().map(|inner| SidebarTracker { inner })
    }
}
