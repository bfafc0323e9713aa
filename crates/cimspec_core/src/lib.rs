//! # cimspec_core
//!
//! Specialization model builder and traversal engine.
//!
//! This crate turns a validated [`DefinitionSet`](cimspec_defs::DefinitionSet)
//! into an immutable [`Specialization`] tree and walks that tree, raising
//! enter/exit events for every node to a [`Visitor`].
//!
//! # Architecture
//!
//! - **Builder**: validates each definition, decodes it and attaches nodes with
//!   dot delimited identifiers; invalid definitions are reported and skipped
//! - **Registry**: identifier to node lookup, owned by one build
//! - **Injection**: default `name` and `overview` properties on every topic
//! - **Engine**: deterministic depth-first traversal
//!
//! # Example
//!
//! ```rust,no_run
//! use cimspec_core::{build, BuildOptions, EventRecorder, TraversalEngine};
//! use cimspec_defs::DefinitionReader;
//!
//! let set = DefinitionReader::load("./definitions", "ocean")?;
//! let (tree, _registry) = build(&set, &BuildOptions::default()).into_tree()?;
//!
//! let mut recorder = EventRecorder::new();
//! TraversalEngine::new(&tree).run(&mut recorder).ok();
//! for event in &recorder.events {
//!     println!("{}", event);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod injection;
pub mod registry;
pub mod tree;
pub mod visitor;

use std::path::Path;

pub use builder::{build, BuildOptions, BuildOutcome, ModelBuilder, DEFAULT_NAMESPACE};
pub use engine::{run, TraversalEngine};
pub use error::{BuildError, CoreError, CoreResult};
pub use injection::{inject_defaults, NAME_PROPERTY, OVERVIEW_PROPERTY};
pub use registry::{Checkpoint, IdRegistry, NodeArena};
pub use tree::{
    EnumChoiceNode, EnumNode, Node, NodeId, NodeKind, PropertyNode, PropertySetNode, RootNode,
    Specialization, TopicKind, TopicNode,
};
pub use visitor::{Event, EventRecorder, Phase, Visitor};

/// Read the definitions of `scope` from `dir` and build them.
pub fn load_and_build(
    dir: impl AsRef<Path>,
    scope: &str,
    options: &BuildOptions,
) -> CoreResult<BuildOutcome> {
    let set = cimspec_defs::DefinitionReader::load(dir, scope)?;
    Ok(build(&set, options))
}
