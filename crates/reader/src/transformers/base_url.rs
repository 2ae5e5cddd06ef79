//! Base-URL rewrite - make relative assets load from docs storage

use std::sync::Arc;
use techdocs_dom::Document;

use crate::api::{EntityName, TechDocsStorageApi};
use crate::pipeline::Transformer;

/// `(tag, attribute)` pairs whose relative references are rewritten
pub const ASSET_ATTRIBUTES: &[(&str, &str)] = &[("img", "src"), ("script", "src"), ("link", "href")];

pub struct AddBaseUrl {
    api: Arc<dyn TechDocsStorageApi>,
    entity: EntityName,
    path: String,
}

impl AddBaseUrl {
    pub fn new(api: Arc<dyn TechDocsStorageApi>, entity: EntityName, path: impl Into<String>) -> Self {
        Self {
            api,
            entity,
            path: path.into(),
        }
    }
}

/// Has a scheme of its own (`https:`, `data:`, `mailto:`...)
fn is_absolute(reference: &str) -> bool {
    url::Url::parse(reference).is_ok()
}

impl Transformer for AddBaseUrl {
    fn name(&self) -> &str {
        "add-base-url"
    }

    fn transform(&self, mut dom: Document) -> Option<Document> {
        dom.root_id()?;

        for &(tag, attribute) in ASSET_ATTRIBUTES {
            for node_id in dom.arena().find_by_tag(tag) {
                let Ok(node) = dom.arena_mut().get_mut(node_id) else {
                    continue;
                };
                let Some(reference) = node.attr(attribute).map(str::to_string) else {
                    continue;
                };
                if reference.is_empty() || is_absolute(&reference) {
                    continue;
                }

                match self.api.base_url(&reference, &self.entity, &self.path) {
                    Ok(rewritten) => node.set_attr(attribute, rewritten),
                    Err(err) => tracing::warn!(
                        "[AddBaseUrl] cannot rewrite {} for {}: {}",
                        reference,
                        self.entity,
                        err
                    ),
                }
            }
        }

        Some(dom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use async_trait::async_trait;
    use techdocs_dom::DomArena;

    struct Storage;

    #[async_trait]
    impl TechDocsStorageApi for Storage {
        async fn get_entity_docs(&self, _: &EntityName, _: &str) -> Result<String, StorageError> {
            Ok(String::new())
        }

        fn api_origin(&self) -> String {
            "https://docs.example.com".to_string()
        }
    }

    fn step() -> AddBaseUrl {
        AddBaseUrl::new(
            Arc::new(Storage),
            EntityName::new("component", "default", "svc"),
            "overview",
        )
    }

    #[test]
    fn test_relative_assets_rewritten() {
        let dom = Document::parse(
            "<head><link rel=\"stylesheet\" href=\"assets/main.css\"></head>\
             <body><img src=\"images/diagram.png\"></body>",
        )
        .unwrap();

        let dom = step().transform(dom).unwrap();
        let arena = dom.arena();
        let img = arena.find_by_tag("img")[0];
        let link = arena.find_by_tag("link")[0];

        assert_eq!(
            arena.get(img).unwrap().attr("src"),
            Some("https://docs.example.com/component/default/svc/overview/images/diagram.png")
        );
        assert_eq!(
            arena.get(link).unwrap().attr("href"),
            Some("https://docs.example.com/component/default/svc/overview/assets/main.css")
        );
    }

    #[test]
    fn test_absolute_and_anchor_references_untouched() {
        let dom = Document::parse(
            "<img src=\"https://cdn.example.org/logo.svg\"><img src=\"data:image/png;base64,AA\">\
             <a href=\"images/x.png\">not an asset</a>",
        )
        .unwrap();

        let dom = step().transform(dom).unwrap();
        let arena = dom.arena();
        let imgs = arena.find_by_tag("img");

        assert_eq!(arena.get(imgs[0]).unwrap().attr("src"), Some("https://cdn.example.org/logo.svg"));
        assert_eq!(arena.get(imgs[1]).unwrap().attr("src"), Some("data:image/png;base64,AA"));
        let a = arena.find_by_tag("a")[0];
        assert_eq!(arena.get(a).unwrap().attr("href"), Some("images/x.png"));
    }

    #[test]
    fn test_rootless_document_fails() {
        assert!(step().transform(Document::from_arena(DomArena::new())).is_none());
    }
}
