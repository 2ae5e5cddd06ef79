//! Storage API - where rendered documentation comes from
//!
//! Pages live under `{origin}/{kind}/{namespace}/{name}/{path}/index.html`.
//! The same layout is used to resolve relative assets (images, stylesheets)
//! so they load from storage instead of the embedding application.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::StorageError;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Identifies the entity whose documentation is shown
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityName {
    pub kind: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub name: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl EntityName {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    fn namespace_or_default(&self) -> &str {
        if self.namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            &self.namespace
        }
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.namespace_or_default(), self.name)
    }
}

/// Directory URL of one documentation page in storage
///
/// The page path is treated as a directory (MkDocs `use_directory_urls`),
/// so the result always ends with `/`. Every field is pushed as its own
/// percent-encoded segment; `/` inside `path` separates segments.
pub fn entity_docs_url(origin: &str, entity: &EntityName, path: &str) -> Result<Url, StorageError> {
    let mut url = Url::parse(origin)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| StorageError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
        segments
            .pop_if_empty()
            .extend([entity.kind.as_str(), entity.namespace_or_default(), entity.name.as_str()])
            .extend(path.split('/').filter(|segment| !segment.is_empty()))
            .push("");
    }
    Ok(url)
}

/// Documentation storage consumed by the reader
#[async_trait]
pub trait TechDocsStorageApi: Send + Sync {
    /// Raw HTML of one page
    async fn get_entity_docs(&self, entity: &EntityName, path: &str) -> Result<String, StorageError>;

    /// Origin that serves docs and their assets
    fn api_origin(&self) -> String;

    /// Resolve a (possibly relative) asset reference against the page's
    /// storage location
    fn base_url(
        &self,
        old_base_url: &str,
        entity: &EntityName,
        path: &str,
    ) -> Result<String, StorageError> {
        let base = entity_docs_url(&self.api_origin(), entity, path)?;
        Ok(base.join(old_base_url)?.to_string())
    }
}

/// Storage API over HTTP
pub struct HttpStorageApi {
    client: reqwest::Client,
    origin: String,
}

impl HttpStorageApi {
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), origin)
    }

    pub fn with_client(client: reqwest::Client, origin: impl Into<String>) -> Self {
        Self {
            client,
            origin: origin.into(),
        }
    }
}

#[async_trait]
impl TechDocsStorageApi for HttpStorageApi {
    async fn get_entity_docs(&self, entity: &EntityName, path: &str) -> Result<String, StorageError> {
        let url = entity_docs_url(&self.origin, entity, path)?.join("index.html")?;
        tracing::debug!("[HttpStorageApi] GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    fn api_origin(&self) -> String {
        self.origin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOrigin;

    #[async_trait]
    impl TechDocsStorageApi for FixedOrigin {
        async fn get_entity_docs(&self, _: &EntityName, _: &str) -> Result<String, StorageError> {
            Ok(String::new())
        }

        fn api_origin(&self) -> String {
            "https://docs.example.com".to_string()
        }
    }

    fn svc() -> EntityName {
        EntityName::new("component", "default", "svc")
    }

    #[test]
    fn test_base_url_for_relative_image() {
        let url = FixedOrigin
            .base_url("images/diagram.png", &svc(), "overview")
            .unwrap();

        assert_eq!(
            url,
            "https://docs.example.com/component/default/svc/overview/images/diagram.png"
        );
    }

    #[test]
    fn test_base_url_parent_and_absolute_references() {
        assert_eq!(
            FixedOrigin.base_url("../assets/main.css", &svc(), "guide/setup/").unwrap(),
            "https://docs.example.com/component/default/svc/guide/assets/main.css"
        );
        assert_eq!(
            FixedOrigin.base_url("https://cdn.example.org/x.js", &svc(), "").unwrap(),
            "https://cdn.example.org/x.js"
        );
    }

    #[test]
    fn test_entity_docs_url_defaults_namespace() {
        let entity = EntityName::new("component", "", "svc");
        let url = entity_docs_url("https://docs.example.com/", &entity, "").unwrap();

        assert_eq!(url.as_str(), "https://docs.example.com/component/default/svc/");
        assert_eq!(entity.to_string(), "component:default/svc");
    }

    #[test]
    fn test_entity_docs_url_encodes_reserved_characters() {
        let entity = EntityName::new("component", "default", "svc#1");
        let url = entity_docs_url("https://docs.example.com/api/docs", &entity, "guide?x/setup").unwrap();

        assert_eq!(
            url.as_str(),
            "https://docs.example.com/api/docs/component/default/svc%231/guide%3Fx/setup/"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_entity_docs_url_rejects_opaque_origin() {
        assert!(matches!(
            entity_docs_url("mailto:docs@example.com", &svc(), ""),
            Err(StorageError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_entity_name_deserialize_default_namespace() {
        let entity: EntityName =
            serde_json::from_str(r#"{"kind":"component","name":"svc"}"#).unwrap();

        assert_eq!(entity, svc());
    }

    #[test]
    fn test_http_storage_rejects_bad_origin() {
        let api = HttpStorageApi::new("not a url");

        let result = tokio_test::block_on(api.get_entity_docs(&svc(), "overview"));

        assert!(matches!(result, Err(StorageError::InvalidUrl(_))));
        assert_eq!(api.api_origin(), "not a url");
    }
}
