//! Standard transformer steps
//!
//! Pre-render: sanitize → base URL → doc links → header → footer → CSS.
//! Post-render: scroll-to-hash → click interception → CSS-ready toggle.

pub mod base_url;
pub mod css_ready;
pub mod doc_links;
pub mod inject_css;
pub mod link_click;
pub mod mkdocs;
pub mod sanitize;
pub mod scroll_to_hash;

pub use base_url::AddBaseUrl;
pub use css_ready::{DomCallback, OnCssReady};
pub use doc_links::RewriteDocLinks;
pub use inject_css::InjectCss;
pub use link_click::{AddLinkClickListener, LinkClickHandler};
pub use mkdocs::{RemoveMkdocsHeader, SimplifyMkdocsFooter};
pub use sanitize::SanitizeDom;
pub use scroll_to_hash::{scroll_to_fragment, ScrollToHash, DEFAULT_SCROLL_DELAY};
