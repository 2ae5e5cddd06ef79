//! Isolated rendering subtree
//!
//! Holds the one document currently mounted by the reader. Mounting
//! replaces whatever was there; nothing outside this handle sees the
//! document's nodes, styles or listeners.

use parking_lot::RwLock;
use std::sync::Arc;
use techdocs_dom::{Document, DomEvent, EventKind, NodeId};

use crate::error::{ReaderError, Result};

#[derive(Clone, Default)]
pub struct ShadowRoot {
    mounted: Arc<RwLock<Option<Document>>>,
}

impl ShadowRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all content with `document`
    pub fn mount(&self, document: Document) {
        *self.mounted.write() = Some(document);
    }

    /// Remove all content, returning what was mounted
    pub fn clear(&self) -> Option<Document> {
        self.mounted.write().take()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.read().is_some()
    }

    /// Run `f` on the mounted document by value while holding the subtree.
    ///
    /// Whatever `f` returns becomes the new content; `None` leaves the
    /// subtree empty. Returns whether anything is mounted afterwards.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(Document) -> Option<Document>,
    {
        let mut mounted = self.mounted.write();
        *mounted = mounted.take().and_then(f);
        mounted.is_some()
    }

    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> Option<R> {
        self.mounted.read().as_ref().map(f)
    }

    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        self.mounted.write().as_mut().map(f)
    }

    /// `shadowRoot.getElementById`
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.with_document(|doc| doc.arena().find_by_id(id)).flatten()
    }

    /// `shadowRoot.querySelectorAll('.class')`
    pub fn elements_by_class(&self, class_name: &str) -> Vec<NodeId> {
        self.with_document(|doc| doc.arena().find_by_class(class_name))
            .unwrap_or_default()
    }

    /// Dispatch a DOM event into the mounted document.
    ///
    /// Listeners run while the subtree is held; they get the arena directly
    /// and must not call back into this handle.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Result<DomEvent> {
        let mut mounted = self.mounted.write();
        let document = mounted.as_mut().ok_or(ReaderError::NotMounted)?;
        Ok(document.dispatch(target, kind)?)
    }

    pub fn to_html(&self) -> Result<String> {
        let mounted = self.mounted.read();
        let document = mounted.as_ref().ok_or(ReaderError::NotMounted)?;
        Ok(document.to_html()?)
    }
}
