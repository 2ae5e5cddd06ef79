//! CSS injection - scoped theme styles for the mounted document

use techdocs_dom::Document;

use crate::pipeline::Transformer;

pub struct InjectCss {
    css: String,
}

impl InjectCss {
    pub fn new(css: impl Into<String>) -> Self {
        Self { css: css.into() }
    }
}

impl Transformer for InjectCss {
    fn name(&self) -> &str {
        "inject-css"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        let target = dom.head().or_else(|| dom.root_id())?;

        let arena = dom.arena_mut();
        let style = arena.create_element("style");
        let text = arena.create_text(self.css.clone());
        arena.append_child(style, text).ok()?;
        arena.append_child(target, style).ok()?;

        Some(dom)
    }
}
