//! Error types for generators.

use thiserror::Error;

/// Result type alias for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors that can occur while generating output.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unknown generator type: {0}")]
    UnknownKind(String),

    #[error("Unexpected {event} event at {id}")]
    UnexpectedEvent { event: &'static str, id: String },

    #[error("Generator has no output: traversal did not complete")]
    Incomplete,

    #[error("XML error: {0}")]
    Xml(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
