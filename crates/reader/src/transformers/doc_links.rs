//! Doc-link rewrite - point cross-page links at the reader's own routes
//!
//! MkDocs emits links relative to the current page (`../setup/`,
//! `./setup.md#install`). They are resolved against the current location
//! treated as a directory, so they route inside the embedding app.
//! External links open in a new tab.

use techdocs_dom::Document;
use url::Url;

use crate::pipeline::Transformer;

pub struct RewriteDocLinks {
    location: Url,
}

impl RewriteDocLinks {
    /// `location` is the page the document is shown at
    pub fn new(location: Url) -> Self {
        Self {
            location: normalize_location(location),
        }
    }
}

/// Directory form of a location: path ends in `/`, no query or fragment
pub fn normalize_location(mut location: Url) -> Url {
    if !location.path().ends_with('/') {
        let path = format!("{}/", location.path());
        location.set_path(&path);
    }
    location.set_query(None);
    location.set_fragment(None);
    location
}

fn is_external(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `setup.md` → `setup`, `guide/index.md` → `guide/`
fn strip_markdown_suffix(url: &mut Url) {
    let Some(stripped) = url.path().strip_suffix(".md").map(str::to_string) else {
        return;
    };
    let path = match stripped.strip_suffix("index") {
        Some(dir) if dir.ends_with('/') => dir.to_string(),
        _ => stripped,
    };
    url.set_path(&path);
}

impl Transformer for RewriteDocLinks {
    fn name(&self) -> &str {
        "rewrite-doc-links"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        dom.root_id()?;

        for node_id in dom.arena().find_by_tag("a") {
            let Ok(node) = dom.arena_mut().get_mut(node_id) else {
                continue;
            };
            let Some(href) = node.attr("href").map(str::to_string) else {
                continue;
            };
            if href.is_empty() {
                continue;
            }
            if is_external(&href) {
                node.set_attr("target", "_blank");
                continue;
            }

            match self.location.join(&href) {
                Ok(mut resolved) => {
                    if resolved.origin() == self.location.origin() {
                        strip_markdown_suffix(&mut resolved);
                    }
                    node.set_attr("href", resolved.to_string());
                }
                Err(err) => tracing::debug!("[RewriteDocLinks] leaving {}: {}", href, err),
            }
        }

        Some(dom)
    }
}
