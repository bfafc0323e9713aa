//! # cimspec_defs
//!
//! Specialization definitions: reading, dialect normalisation, structural
//! validation and typed decoding.
//!
//! A scope (an `ocean` realm, say) is described by a root document plus one
//! document per grid, key properties and process, or by a single document that
//! nests all of them. Either way the reader produces one [`DefinitionSet`] of
//! canonical [`RawDefinition`]s that the model builder consumes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cimspec_defs::{DefinitionReader, DefinitionValidator};
//!
//! let set = DefinitionReader::load("./definitions", "ocean").unwrap();
//! let report = DefinitionValidator::validate_set(&set);
//! for (key, errors) in &report.errors {
//!     for error in errors {
//!         eprintln!("{}: {}", key, error);
//!     }
//! }
//! ```

pub mod dialect;
pub mod error;
pub mod models;
pub mod naming;
pub mod raw;
pub mod reader;
pub mod short_table;
pub mod validator;

pub use dialect::{adapt, SourceDocument};
pub use error::{DefsError, DefsResult};
pub use models::*;
pub use raw::{fields, DefinitionSet, Dialect, RawDefinition};
pub use reader::DefinitionReader;
pub use short_table::ShortTableValidator;
pub use validator::{DefinitionValidator, ValidationReport};
