use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while producing artifacts.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("core error: {0}")]
    Core(#[from] stencil_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// Several documents share a file stem and would write the same artifacts.
    #[error("table `{table}` is declared by more than one document: {}", display_paths(paths))]
    DuplicateTable { table: String, paths: Vec<PathBuf> },
    /// A document failed; no artifact was written for it.
    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Box<EmitError>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EmitError {
    pub(crate) fn for_document(path: PathBuf, source: EmitError) -> Self {
        EmitError::Document {
            path,
            source: Box::new(source),
        }
    }
}
