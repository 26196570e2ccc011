use std::path::PathBuf;

use thiserror::Error;

/// Core error type shared across stencil crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a table document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid YAML.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The document is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but does not describe a table.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    /// The file extension is not a supported document format.
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Convenience alias for results returned by stencil crates.
pub type Result<T> = std::result::Result<T, Error>;
