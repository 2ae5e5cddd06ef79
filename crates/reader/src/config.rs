//! Reader configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::theme::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Origin of the embedding app; same-origin link clicks route inside it.
    /// Defaults to the host location's origin.
    pub app_base_url: Option<Url>,
    /// Overrides the storage API origin when deciding which stylesheets to
    /// wait for
    pub storage_origin: Option<String>,
    pub scroll_to_hash_delay_ms: u64,
    pub theme: Theme,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            app_base_url: None,
            storage_origin: None,
            scroll_to_hash_delay_ms: 200,
            theme: Theme::default(),
        }
    }
}

impl ReaderConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn scroll_to_hash_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_to_hash_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::from_json("{}").unwrap();

        assert_eq!(config.scroll_to_hash_delay(), Duration::from_millis(200));
        assert!(config.app_base_url.is_none());
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn test_from_json() {
        let config = ReaderConfig::from_json(
            r#"{
                "app_base_url": "http://localhost:3000",
                "storage_origin": "https://docs.example.com",
                "scroll_to_hash_delay_ms": 50,
                "theme": { "font_family": "Inter" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.app_base_url.unwrap().as_str(), "http://localhost:3000/");
        assert_eq!(config.storage_origin.as_deref(), Some("https://docs.example.com"));
        assert_eq!(config.scroll_to_hash_delay_ms, 50);
        assert_eq!(config.theme.font_family, "Inter");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ReaderConfig::from_json("{\"scroll_to_hash_delay_ms\": \"soon\"}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ReaderConfig::load("/nonexistent/reader.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
