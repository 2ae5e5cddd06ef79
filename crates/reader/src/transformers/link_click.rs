//! Click interception - keep same-origin navigation inside the app

use std::sync::Arc;
use techdocs_dom::{Document, DomArena, DomEvent, EventKind, NodeId};
use url::Url;

use crate::pipeline::Transformer;

/// Called with the arena being dispatched, the click event and the resolved
/// link target
pub type LinkClickHandler = Arc<dyn Fn(&DomArena, &DomEvent, &Url) + Send + Sync>;

pub struct AddLinkClickListener {
    base_url: Url,
    location: Url,
    on_click: LinkClickHandler,
}

impl AddLinkClickListener {
    /// Links whose origin matches `base_url` are intercepted. Relative
    /// hrefs resolve against `base_url` unless a location is given.
    pub fn new(base_url: Url, on_click: LinkClickHandler) -> Self {
        Self {
            location: base_url.clone(),
            base_url,
            on_click,
        }
    }

    pub fn resolve_against(mut self, location: Url) -> Self {
        self.location = location;
        self
    }
}

/// Target of the anchor enclosing `node_id`, if any
fn clicked_link(arena: &DomArena, node_id: NodeId, location: &Url) -> Option<Url> {
    let anchor = arena.closest(node_id, |node| node.is_tag("a") && node.has_attr("href"))?;
    let href = arena.get(anchor).ok()?.attr("href")?;
    match location.join(href) {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::debug!("[LinkClick] unresolvable href {}: {}", href, err);
            None
        }
    }
}

impl Transformer for AddLinkClickListener {
    fn name(&self) -> &str {
        "add-link-click-listener"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        let root = dom.root_id()?;

        let origin = self.base_url.origin();
        let location = self.location.clone();
        let on_click = Arc::clone(&self.on_click);

        dom.add_event_listener(
            root,
            EventKind::Click,
            true,
            Arc::new(move |arena: &mut DomArena, event: &mut DomEvent| {
                let Some(url) = clicked_link(arena, event.target, &location) else {
                    return;
                };
                if url.origin() != origin {
                    return;
                }
                event.prevent_default();
                on_click(arena, event, &url);
            }),
        )
        .ok()?;

        Some(dom)
    }
}
