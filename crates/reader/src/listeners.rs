//! Window listeners - scroll/resize subscriptions with paired teardown
//!
//! Every `attach` hands back a guard. Dropping the guard (or calling
//! `detach`) removes exactly the listeners it added, once, no matter how
//! the owner exits.

use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Window-level events the reader listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    Scroll,
    Resize,
}

pub type ListenerId = Uuid;

/// Window listener callback
pub type WindowCallback = Arc<dyn Fn(WindowEventKind) + Send + Sync>;

/// Registry of window listeners, shared between the host and its users
#[derive(Clone, Default)]
pub struct WindowListeners {
    listeners: Arc<DashMap<ListenerId, (WindowEventKind, WindowCallback)>>,
}

impl WindowListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, kind: WindowEventKind, callback: WindowCallback) -> ListenerId {
        let id = Uuid::now_v7();
        self.listeners.insert(id, (kind, callback));
        tracing::trace!("[WindowListeners] added {:?} listener {}", kind, id);
        id
    }

    /// Returns false when the listener was already gone
    pub fn remove(&self, id: &ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    /// Fire an event, returns how many listeners ran
    pub fn dispatch(&self, kind: WindowEventKind) -> usize {
        // Snapshot first: callbacks may add or remove listeners
        let callbacks: Vec<WindowCallback> = self
            .listeners
            .iter()
            .filter(|entry| entry.value().0 == kind)
            .map(|entry| Arc::clone(&entry.value().1))
            .collect();

        for callback in &callbacks {
            callback(kind);
        }
        callbacks.len()
    }

    pub fn count(&self, kind: WindowEventKind) -> usize {
        self.listeners
            .iter()
            .filter(|entry| entry.value().0 == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Listeners added by one `attach`, removed together
pub struct WindowListenerGuard {
    window: WindowListeners,
    ids: Vec<ListenerId>,
}

impl WindowListenerGuard {
    /// Register `callback` once for every kind in `kinds`
    pub fn attach(
        window: &WindowListeners,
        kinds: &[WindowEventKind],
        callback: WindowCallback,
    ) -> Self {
        let ids = kinds
            .iter()
            .map(|&kind| window.add(kind, Arc::clone(&callback)))
            .collect();
        Self {
            window: window.clone(),
            ids,
        }
    }

    /// Remove the listeners; later calls are no-ops
    pub fn detach(&mut self) {
        for id in self.ids.drain(..) {
            self.window.remove(&id);
        }
    }

    pub fn is_attached(&self) -> bool {
        !self.ids.is_empty()
    }
}

impl Drop for WindowListenerGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> WindowCallback {
        let counter = counter.clone();
        Arc::new(move |_kind| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_guard_pairs_attach_and_detach() {
        let window = WindowListeners::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let mut guard = WindowListenerGuard::attach(
            &window,
            &[WindowEventKind::Scroll, WindowEventKind::Resize],
            counting(&counter),
        );
        assert_eq!(window.count(WindowEventKind::Scroll), 1);
        assert_eq!(window.count(WindowEventKind::Resize), 1);

        assert_eq!(window.dispatch(WindowEventKind::Scroll), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        guard.detach();
        guard.detach();
        assert!(window.is_empty());
        assert!(!guard.is_attached());
        assert_eq!(window.dispatch(WindowEventKind::Scroll), 0);
    }

    #[test]
    fn test_drop_detaches() {
        let window = WindowListeners::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let unrelated = window.add(WindowEventKind::Resize, counting(&counter));

        {
            let _guard =
                WindowListenerGuard::attach(&window, &[WindowEventKind::Scroll], counting(&counter));
            assert_eq!(window.len(), 2);
        }

        assert_eq!(window.len(), 1);
        assert!(window.remove(&unrelated));
        assert!(!window.remove(&unrelated));
    }

    #[test]
    fn test_callback_may_remove_itself() {
        let window = WindowListeners::new();
        let slot: Arc<parking_lot::Mutex<Option<ListenerId>>> = Arc::default();
        let inner_window = window.clone();
        let inner_slot = slot.clone();
        let id = window.add(
            WindowEventKind::Scroll,
            Arc::new(move |_| {
                if let Some(id) = inner_slot.lock().take() {
                    inner_window.remove(&id);
                }
            }),
        );
        *slot.lock() = Some(id);

        assert_eq!(window.dispatch(WindowEventKind::Scroll), 1);
        assert!(window.is_empty());
    }
}
