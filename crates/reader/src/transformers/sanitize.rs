//! Sanitize - strip anything that could execute or restyle the host page
//!
//! Removes script-like and style-leaking elements with their subtrees,
//! inline event handlers, and script-bearing URLs. Everything else is left
//! exactly as it was.

use techdocs_dom::Document;

use crate::pipeline::Transformer;

/// Elements removed together with their subtree
///
/// SVG animation elements can assign a script URL to another element's
/// `href` through `values`/`to`/`from`, and `meta` can trigger a refresh
/// redirect, so neither survives.
pub const FORBIDDEN_TAGS: &[&str] = &[
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet", "base",
    "noscript", "meta", "animate", "set", "animatemotion", "animatetransform",
];

/// Attributes holding a URL the browser may navigate to or load
pub const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "poster", "xlink:href"];

#[derive(Debug, Default, Clone, Copy)]
pub struct SanitizeDom;

impl SanitizeDom {
    pub fn new() -> Self {
        Self
    }
}

fn is_event_handler(name: &str) -> bool {
    name.len() > 2
        && name
            .get(..2)
            .map(|prefix| prefix.eq_ignore_ascii_case("on"))
            .unwrap_or(false)
}

/// Browsers ignore whitespace and control characters inside a scheme
fn normalized_scheme_prefix(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase()
}

fn is_unsafe_url(tag: &str, name: &str, value: &str) -> bool {
    if !URL_ATTRIBUTES.iter().any(|a| a.eq_ignore_ascii_case(name)) {
        return false;
    }

    let prefix = normalized_scheme_prefix(value);
    if prefix.starts_with("javascript:") || prefix.starts_with("vbscript:") {
        return true;
    }

    // Inline images are fine, inline documents are not
    let image_source = name.eq_ignore_ascii_case("src") && matches!(tag, "img" | "source");
    prefix.starts_with("data:") && !image_source
}

impl Transformer for SanitizeDom {
    fn name(&self) -> &str {
        "sanitize"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        let arena = dom.arena_mut();

        let forbidden = arena.find(|node| {
            node.is_element() && FORBIDDEN_TAGS.contains(&node.node_name.as_str())
        });
        for node_id in &forbidden {
            let _ = arena.detach(*node_id);
        }

        let mut stripped = 0usize;
        for node_id in arena.find(|node| node.is_element()) {
            let Ok(node) = arena.get_mut(node_id) else {
                continue;
            };
            let tag = node.node_name.clone();
            let before = node.attributes.len();
            node.attributes
                .retain(|(name, value)| !is_event_handler(name) && !is_unsafe_url(&tag, name, value));
            stripped += before - node.attributes.len();
        }

        if !forbidden.is_empty() || stripped > 0 {
            tracing::debug!(
                "[Sanitize] removed {} elements, {} attributes",
                forbidden.len(),
                stripped
            );
        }
        Some(dom)
    }
}
