//! Error types for the reader
//!
//! Transformer steps never produce these: a step that cannot run returns
//! `None` and the pipeline halts. Errors here are for fetching, config and
//! DOM access from the controller.

use thiserror::Error;

pub use techdocs_dom::DomError;

pub type Result<T> = std::result::Result<T, ReaderError>;

/// Failures talking to the documentation storage
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Storage returned HTTP {code} for {url}")]
    Status { code: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Page not found: {0}")]
    NotFound(String),
}

impl StorageError {
    /// HTTP status, when the storage reported one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StorageError::Status { code, .. } => Some(*code),
            StorageError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => StorageError::Status {
                code: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => StorageError::Request(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("No document is mounted")]
    NotMounted,
}
