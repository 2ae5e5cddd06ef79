//! Host environment - the browser surface the reader lives in
//!
//! The reader never touches a real window. Location, history, scrolling and
//! window events all go through [`Host`], which keeps the controller
//! testable and lets an embedding decide how routing actually happens.

use parking_lot::{Mutex, RwLock};
use techdocs_dom::NodeId;
use url::Url;

use crate::listeners::WindowListeners;

pub trait Host: Send + Sync {
    /// Current location (`window.location.href`)
    fn location(&self) -> Url;

    /// Update path and fragment without a route transition
    fn push_state(&self, path: &str);

    /// Full in-app route transition
    fn navigate(&self, path: &str);

    fn scroll_to_top(&self);

    /// Scroll a node of the mounted document into view
    fn scroll_into_view(&self, node_id: NodeId);

    /// Top of the element hosting the isolated subtree, relative to the
    /// viewport (`getBoundingClientRect().top`)
    fn shadow_host_top(&self) -> f64;

    fn window(&self) -> &WindowListeners;
}

/// Everything a [`HeadlessHost`] was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    PushState(String),
    Navigate(String),
    ScrollToTop,
    ScrollIntoView(NodeId),
}

/// In-memory host: tracks location and records actions
pub struct HeadlessHost {
    location: RwLock<Url>,
    shadow_host_top: RwLock<f64>,
    actions: Mutex<Vec<HostAction>>,
    window: WindowListeners,
}

impl HeadlessHost {
    pub fn new(location: Url) -> Self {
        Self {
            location: RwLock::new(location),
            shadow_host_top: RwLock::new(0.0),
            actions: Mutex::new(Vec::new()),
            window: WindowListeners::new(),
        }
    }

    pub fn parse(location: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(location)?))
    }

    pub fn set_location(&self, location: Url) {
        *self.location.write() = location;
    }

    /// Simulate the shadow host moving (page scrolled by `top` pixels)
    pub fn set_shadow_host_top(&self, top: f64) {
        *self.shadow_host_top.write() = top;
    }

    pub fn actions(&self) -> Vec<HostAction> {
        self.actions.lock().clone()
    }

    pub fn clear_actions(&self) {
        self.actions.lock().clear();
    }

    fn record(&self, action: HostAction) {
        tracing::trace!("[HeadlessHost] {:?}", action);
        self.actions.lock().push(action);
    }

    fn move_to(&self, path: &str) {
        let mut location = self.location.write();
        match location.join(path) {
            Ok(next) => *location = next,
            Err(err) => tracing::warn!("[HeadlessHost] cannot resolve {}: {}", path, err),
        }
    }
}

impl Host for HeadlessHost {
    fn location(&self) -> Url {
        self.location.read().clone()
    }

    fn push_state(&self, path: &str) {
        self.move_to(path);
        self.record(HostAction::PushState(path.to_string()));
    }

    fn navigate(&self, path: &str) {
        self.move_to(path);
        self.record(HostAction::Navigate(path.to_string()));
    }

    fn scroll_to_top(&self) {
        self.record(HostAction::ScrollToTop);
    }

    fn scroll_into_view(&self, node_id: NodeId) {
        self.record(HostAction::ScrollIntoView(node_id));
    }

    fn shadow_host_top(&self) -> f64 {
        *self.shadow_host_top.read()
    }

    fn window(&self) -> &WindowListeners {
        &self.window
    }
}
