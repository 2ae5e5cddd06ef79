//! Scroll-to-hash - bring the fragment target into view after mount

use std::sync::Arc;
use std::time::Duration;
use techdocs_dom::Document;

use crate::host::Host;
use crate::pipeline::Transformer;
use crate::shadow::ShadowRoot;

pub const DEFAULT_SCROLL_DELAY: Duration = Duration::from_millis(200);

/// Scroll the element named by the host location's fragment into view.
///
/// Returns false when there is no fragment or no element with that id.
pub fn scroll_to_fragment(host: &dyn Host, shadow_root: &ShadowRoot) -> bool {
    let location = host.location();
    let Some(fragment) = location.fragment().filter(|f| !f.is_empty()) else {
        return false;
    };

    match shadow_root.element_by_id(fragment) {
        Some(node_id) => {
            host.scroll_into_view(node_id);
            true
        }
        None => {
            tracing::debug!("[ScrollToHash] no element with id {}", fragment);
            false
        }
    }
}

/// Deferred scroll; the document passes through unchanged
pub struct ScrollToHash {
    host: Arc<dyn Host>,
    shadow_root: ShadowRoot,
    delay: Duration,
}

impl ScrollToHash {
    pub fn new(host: Arc<dyn Host>, shadow_root: ShadowRoot, delay: Duration) -> Self {
        Self {
            host,
            shadow_root,
            delay,
        }
    }
}

impl Transformer for ScrollToHash {
    fn name(&self) -> &str {
        "scroll-to-hash"
    }

    fn transform(&self, dom: Document) -> Option<Document> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let host = Arc::clone(&self.host);
                let shadow_root = self.shadow_root.clone();
                let delay = self.delay;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    scroll_to_fragment(host.as_ref(), &shadow_root);
                });
            }
            Err(_) => tracing::debug!("[ScrollToHash] no runtime, skipping deferred scroll"),
        }
        Some(dom)
    }
}
