//! MkDocs chrome cleanup
//!
//! The embedding app has its own header, and the generated footer carries a
//! "made with" notice. Both are cosmetic; missing nodes make these no-ops.

use techdocs_dom::Document;

use crate::pipeline::Transformer;

pub const HEADER_CLASS: &str = "md-header";
pub const FOOTER_CLASS: &str = "md-footer";
pub const COPYRIGHT_CLASS: &str = "md-copyright";
pub const NAV_TITLE_CLASS: &str = "md-nav__title";
pub const SIDEBAR_CLASS: &str = "md-sidebar";

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoveMkdocsHeader;

impl Transformer for RemoveMkdocsHeader {
    fn name(&self) -> &str {
        "remove-mkdocs-header"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        let arena = dom.arena_mut();
        if let Some(header) = arena.find_one(|node| node.is_element() && node.has_class(HEADER_CLASS)) {
            let _ = arena.detach(header);
        }
        Some(dom)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SimplifyMkdocsFooter;

impl Transformer for SimplifyMkdocsFooter {
    fn name(&self) -> &str {
        "simplify-mkdocs-footer"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        let arena = dom.arena_mut();
        let copyright = arena.find_by_class(FOOTER_CLASS).into_iter().find_map(|footer| {
            arena.find_one_in(footer, |node| node.is_element() && node.has_class(COPYRIGHT_CLASS))
        });
        if let Some(copyright) = copyright {
            let _ = arena.detach(copyright);
        }
        Some(dom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<body><header class=\"md-header\"><nav>top</nav></header>\
        <main class=\"md-main\"><p class=\"md-copyright\">not in footer</p></main>\
        <footer class=\"md-footer\"><div class=\"md-footer-nav\">next</div>\
        <div class=\"md-copyright\">Made with Material for MkDocs</div></footer></body>";

    #[test]
    fn test_header_removed() {
        let dom = RemoveMkdocsHeader
            .transform(Document::parse(PAGE).unwrap())
            .unwrap();

        assert!(dom.arena().find_by_class(HEADER_CLASS).is_empty());
        assert_eq!(dom.arena().find_by_tag("main").len(), 1);
    }

    #[test]
    fn test_footer_copyright_removed_only() {
        let dom = SimplifyMkdocsFooter
            .transform(Document::parse(PAGE).unwrap())
            .unwrap();
        let html = dom.to_html().unwrap();

        assert!(!html.contains("Made with Material"));
        assert!(html.contains("not in footer"));
        assert!(html.contains("<div class=\"md-footer-nav\">next</div>"));
    }

    #[test]
    fn test_missing_nodes_are_noop() {
        let html = "<html><head></head><body><p>plain</p></body></html>";
        let dom = Document::parse(html).unwrap();

        let dom = RemoveMkdocsHeader.transform(dom).unwrap();
        let dom = SimplifyMkdocsFooter.transform(dom).unwrap();

        assert_eq!(dom.to_html().unwrap(), html);
    }
}
