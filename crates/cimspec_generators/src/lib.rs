//! # cimspec_generators
//!
//! Output encoders for specialization trees.
//!
//! Each generator is a [`Visitor`] driven by the traversal engine, plus an
//! [`Generator::output`] call that returns the encoded document once the
//! walk has finished:
//!
//! - **json**: the tree as a JSON object graph
//! - **mm**: a FreeMind mindmap
//! - **ids**, **ids-level-1..3**: flat CSV identifier listings
//!
//! ## Example
//!
//! ```rust,no_run
//! use cimspec_core::{load_and_build, BuildOptions};
//! use cimspec_generators::{generate, GeneratorKind, GeneratorOptions};
//!
//! let outcome = load_and_build("./definitions", "ocean", &BuildOptions::default())?;
//! let (tree, _) = outcome.into_tree()?;
//! let json = generate(&tree, GeneratorKind::Json, &GeneratorOptions::default())?;
//! println!("{}", json);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod ids;
pub mod json;
pub mod mindmap;
pub mod style;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cimspec_core::{Specialization, TraversalEngine, Visitor, DEFAULT_NAMESPACE};

pub use error::{GeneratorError, GeneratorResult};
pub use ids::{IdLevel, IdsGenerator};
pub use json::JsonGenerator;
pub use mindmap::MindmapGenerator;
pub use style::{MindmapStyles, NodeStyle, StyleOverride, LEGEND_SECTIONS};

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeneratorKind {
    Json,
    Mindmap,
    Ids,
    IdsLevel1,
    IdsLevel2,
    IdsLevel3,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 6] = [
        GeneratorKind::Json,
        GeneratorKind::Mindmap,
        GeneratorKind::Ids,
        GeneratorKind::IdsLevel1,
        GeneratorKind::IdsLevel2,
        GeneratorKind::IdsLevel3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Json => "json",
            GeneratorKind::Mindmap => "mm",
            GeneratorKind::Ids => "ids",
            GeneratorKind::IdsLevel1 => "ids-level-1",
            GeneratorKind::IdsLevel2 => "ids-level-2",
            GeneratorKind::IdsLevel3 => "ids-level-3",
        }
    }

    /// Appended to the scope in output file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            GeneratorKind::Json | GeneratorKind::Mindmap => "",
            GeneratorKind::Ids => "-ids",
            GeneratorKind::IdsLevel1 => "-ids-level-1",
            GeneratorKind::IdsLevel2 => "-ids-level-2",
            GeneratorKind::IdsLevel3 => "-ids-level-3",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            GeneratorKind::Json => "json",
            GeneratorKind::Mindmap => "mm",
            _ => "csv",
        }
    }

    /// Output file name: `_<scope><suffix>.<ext>`.
    pub fn file_name(&self, scope: &str) -> String {
        format!("_{}{}.{}", scope, self.suffix(), self.extension())
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneratorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GeneratorError::UnknownKind(s.to_string()))
    }
}

impl TryFrom<String> for GeneratorKind {
    type Error = GeneratorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeneratorKind> for String {
    fn from(kind: GeneratorKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Settings shared by all generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Namespace prefix of identifiers, stripped from id labels.
    pub namespace: String,
    pub styles: MindmapStyles,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            styles: MindmapStyles::default(),
        }
    }
}

/// A visitor that encodes the tree it walks.
pub trait Generator: Visitor<Error = GeneratorError> {
    fn kind(&self) -> GeneratorKind;

    /// The encoded document. Fails until a full traversal has completed.
    fn output(&self) -> GeneratorResult<String>;
}

/// Create the generator for `kind`.
pub fn create(kind: GeneratorKind, options: &GeneratorOptions) -> Box<dyn Generator> {
    match kind {
        GeneratorKind::Json => Box::new(JsonGenerator::new()),
        GeneratorKind::Mindmap => Box::new(MindmapGenerator::new(options.styles.clone())),
        GeneratorKind::Ids => Box::new(IdsGenerator::new(IdLevel::All, &options.namespace)),
        GeneratorKind::IdsLevel1 => Box::new(IdsGenerator::new(IdLevel::Topics, &options.namespace)),
        GeneratorKind::IdsLevel2 => Box::new(IdsGenerator::new(IdLevel::PropertySets, &options.namespace)),
        GeneratorKind::IdsLevel3 => Box::new(IdsGenerator::new(IdLevel::Properties, &options.namespace)),
    }
}

/// Run one generator over `tree` and return its output.
pub fn generate(tree: &Specialization, kind: GeneratorKind, options: &GeneratorOptions) -> GeneratorResult<String> {
    debug!("Running {} generator over '{}'", kind, tree.scope());
    let mut generator = create(kind, options);
    TraversalEngine::new(tree).run(&mut *generator)?;
    generator.output()
}

/// Run each generator and write its output into `output_dir`.
pub fn write_outputs(
    tree: &Specialization,
    kinds: &[GeneratorKind],
    options: &GeneratorOptions,
    output_dir: impl AsRef<Path>,
) -> GeneratorResult<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let content = generate(tree, *kind, options)?;
        let path = output_dir.join(kind.file_name(tree.scope()));
        fs::write(&path, content)?;
        info!("Generated {} file: {}", kind, path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cimspec_core::{build, BuildOptions};
    use cimspec_defs::DefinitionReader;

    const SAMPLE: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
CONTRIBUTORS: Someone Else
QC_STATUS: draft
DESCRIPTION: Ocean realm
CHANGE_HISTORY:
  - ["0.1", "2016-01-01", "Ocean Team", "Initial version"]
GRID:
  DESCRIPTION: Ocean grid
  DETAILS:
    discretisation:
      description: Grid discretisation
      properties:
        - [resolution, str, "0.1", "Nominal resolution"]
PROCESSES:
  advection:
    DESCRIPTION: Advection & transport
    DETAILS:
      toplevel:
        description: Advection properties
        properties:
          - [scheme, "ENUM:schemes", "1.1", "Advection scheme"]
      momentum:
        description: Momentum
        properties:
          - [order, int, "1.1", "Scheme order"]
      momentum:details:
        description: Further momentum details
    ENUMERATIONS:
      schemes:
        description: Advection schemes
        is_open: true
        members:
          - [centered, Centered scheme]
          - [upwind, null]
    SUB_PROCESSES:
      tracers:
        DESCRIPTION: Tracer advection
"#;

    pub(crate) fn sample_tree() -> Specialization {
        let set = DefinitionReader::load_str("ocean", SAMPLE).unwrap();
        let outcome = build(&set, &BuildOptions::default());
        assert!(outcome.is_valid(), "{:?}", outcome.report.errors);
        outcome.into_tree().unwrap().0
    }

    #[test]
    fn test_kind_names() {
        for kind in GeneratorKind::ALL {
            assert_eq!(kind.as_str().parse::<GeneratorKind>().unwrap(), kind);
        }
        assert!(matches!("xml".parse::<GeneratorKind>(), Err(GeneratorError::UnknownKind(_))));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(GeneratorKind::Json.file_name("ocean"), "_ocean.json");
        assert_eq!(GeneratorKind::Mindmap.file_name("ocean"), "_ocean.mm");
        assert_eq!(GeneratorKind::Ids.file_name("ocean"), "_ocean-ids.csv");
        assert_eq!(GeneratorKind::IdsLevel1.file_name("ocean"), "_ocean-ids-level-1.csv");
    }

    #[test]
    fn test_generators_agree_on_topic_order() {
        let tree = sample_tree();
        let options = GeneratorOptions::default();

        let json: serde_json::Value =
            serde_json::from_str(&generate(&tree, GeneratorKind::Json, &options).unwrap()).unwrap();
        let ids = generate(&tree, GeneratorKind::IdsLevel1, &options).unwrap();

        let from_ids: Vec<&str> = ids
            .lines()
            .filter(|line| line.ends_with(", process"))
            .map(|line| line.split(',').next().unwrap())
            .collect();
        let from_json: Vec<&str> = json["processes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(from_ids, from_json);
    }
}
