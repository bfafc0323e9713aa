//! Error types for definition loading and decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for definition operations.
pub type DefsResult<T> = Result<T, DefsError>;

/// Errors that can occur while loading or decoding definitions.
///
/// Structural problems inside a definition are not errors of this type: the
/// validator reports them as messages. These variants cover the cases where no
/// definition can be produced at all.
#[derive(Error, Debug)]
pub enum DefsError {
    #[error("Definitions directory not found: {0}")]
    NotFound(PathBuf),

    #[error("No root definition found for scope '{scope}' in {dir}")]
    RootNotFound { scope: String, dir: PathBuf },

    #[error("Invalid definition document {path}: {message}")]
    InvalidDocument { path: PathBuf, message: String },

    #[error("Definition '{key}' cannot be decoded: {message}")]
    Decode { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
