//! CSS-ready toggle - hide the document until its stylesheets arrive
//!
//! Only stylesheets served from docs storage are waited for. `on_loading`
//! runs during the transform when there is at least one; `on_loaded` runs
//! from the `load` listener of whichever sheet finishes last.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use techdocs_dom::{Document, DomArena, DomEvent, EventKind, NodeId};
use url::Url;

use crate::pipeline::Transformer;

/// Callback over the arena and its root element
pub type DomCallback = Arc<dyn Fn(&mut DomArena, NodeId) + Send + Sync>;

pub struct OnCssReady {
    doc_storage_url: String,
    on_loading: DomCallback,
    on_loaded: DomCallback,
}

impl OnCssReady {
    pub fn new(
        doc_storage_url: impl Into<String>,
        on_loading: DomCallback,
        on_loaded: DomCallback,
    ) -> Self {
        Self {
            doc_storage_url: doc_storage_url.into(),
            on_loading,
            on_loaded,
        }
    }

    /// `head > link[rel=stylesheet]` served from storage
    fn storage_stylesheets(&self, dom: &Document) -> Vec<NodeId> {
        let Ok(storage) = Url::parse(&self.doc_storage_url) else {
            tracing::debug!("[OnCssReady] storage url {:?} does not parse", self.doc_storage_url);
            return Vec::new();
        };
        let Some(head) = dom.head() else {
            return Vec::new();
        };
        let Ok(children) = dom.arena().children(head) else {
            return Vec::new();
        };

        children
            .into_iter()
            .filter(|node| node.is_tag("link"))
            .filter(|node| {
                node.attr("rel")
                    .map(|rel| {
                        rel.split_ascii_whitespace()
                            .any(|r| r.eq_ignore_ascii_case("stylesheet"))
                    })
                    .unwrap_or(false)
            })
            .filter(|node| {
                node.attr("href")
                    .map(|href| served_from(&storage, href))
                    .unwrap_or(false)
            })
            .map(|node| node.node_id)
            .collect()
    }
}

/// Same origin as `storage`, and under its path on a segment boundary
fn served_from(storage: &Url, href: &str) -> bool {
    let Ok(href) = Url::parse(href) else {
        return false;
    };
    if href.origin() != storage.origin() {
        return false;
    }
    let base = storage.path().trim_end_matches('/');
    let path = href.path();
    base.is_empty()
        || path == base
        || path.strip_prefix(base).map(|rest| rest.starts_with('/')).unwrap_or(false)
}

impl Transformer for OnCssReady {
    fn name(&self) -> &str {
        "on-css-ready"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        let root = dom.root_id()?;

        let sheets = self.storage_stylesheets(&dom);
        if sheets.is_empty() {
            return Some(dom);
        }

        tracing::debug!("[OnCssReady] waiting for {} stylesheets", sheets.len());
        (self.on_loading)(dom.arena_mut(), root);

        let remaining = Arc::new(AtomicUsize::new(sheets.len()));
        for sheet in sheets {
            let remaining = Arc::clone(&remaining);
            let on_loaded = Arc::clone(&self.on_loaded);
            // a sheet counts once even if its load fires again
            let fired = AtomicBool::new(false);

            dom.add_event_listener(
                sheet,
                EventKind::Load,
                false,
                Arc::new(move |arena: &mut DomArena, _event: &mut DomEvent| {
                    if fired.swap(true, Ordering::SeqCst) {
                        return;
                    }
                    if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                        on_loaded(arena, root);
                    }
                }),
            )
            .ok()?;
        }

        Some(dom)
    }
}
