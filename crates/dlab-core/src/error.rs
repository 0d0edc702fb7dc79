//! Error types for the lab core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for lab operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from loading content, configuration and host capabilities.
///
/// Scripted failures shown to the learner are catalog content, not errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog file could not be parsed.
    #[error("failed to parse catalog from {path}: {message}")]
    CatalogParse { path: PathBuf, message: String },

    /// Catalog parsed but breaks a structural rule.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Two records in one store share an id.
    #[error("duplicate id '{id}' in {store}")]
    DuplicateId { store: &'static str, id: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging could not be initialized.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// A host capability (clipboard, export) refused the request.
    #[error("{capability} failed: {message}")]
    Capability {
        capability: &'static str,
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Channel closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
