//! Error types for the core module.

use cimspec_defs::DefsError;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building a specialization tree.
///
/// A build error aborts the node being built and its subtree only; the
/// builder records it in the validation report and moves on to siblings.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("duplicate identifier :: {0}")]
    DuplicateIdentifier(String),

    #[error("{key}: parent property set '{parent}' has not been declared")]
    MissingParentGroup { key: String, parent: String },

    #[error("{property} :: enumeration cannot be resolved :: {key}")]
    UnresolvedEnumeration { property: String, key: String },

    #[error("{0} is an invalid key - no matching definition can be found")]
    UnresolvedReference(String),

    #[error("definition cannot be read :: {0}")]
    UnreadableDocument(String),

    #[error("{0} : property nesting level cannot be > 2")]
    NestingTooDeep(String),

    #[error("{0}: unsupported detail key")]
    InvalidKeyShape(String),

    #[error(transparent)]
    Decode(#[from] DefsError),
}

/// Errors surfaced by the core crate API.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Specialization is invalid: {error_count} error(s)")]
    Invalid { error_count: usize },

    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Definition error: {0}")]
    Defs(#[from] DefsError),
}
