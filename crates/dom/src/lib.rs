//! TechDocs DOM
//!
//! Small arena-backed HTML tree used by the reader's transformer steps.
//!
//! ## Core Design
//!
//! ```text
//! HTML string → html5ever (RcDom) → DomArena (owned) → queries / mutation → HTML string
//!                                        ↓
//!                                 NodeId (u32) + listeners
//! ```

pub mod arena;
pub mod document;
pub mod error;
pub mod events;
pub mod parser;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use document::Document;
pub use error::{DomError, Result};
pub use events::{DomEvent, EventKind, Listener};
pub use parser::parse_html;
pub use serializer::DomSerializer;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mutate_serialize() {
        let mut doc = Document::parse("<body><div class=\"md-header\">h</div><p>kept</p></body>").unwrap();
        let header = doc.arena().find_by_class("md-header")[0];
        doc.arena_mut().detach(header).unwrap();

        assert_eq!(
            doc.to_html().unwrap(),
            "<html><head></head><body><p>kept</p></body></html>"
        );
    }
}
