//! Optional `cimspec.toml` configuration.
//!
//! ```toml
//! namespace = "cmip6"
//! output_dir = "./generated"
//! generators = ["json", "ids-level-1"]
//!
//! [mindmap.process]
//! bg_color = "#FCE4D6"
//! ```
//!
//! Command-line flags take precedence over file values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use cimspec_core::{BuildOptions, DEFAULT_NAMESPACE};
use cimspec_generators::{GeneratorKind, GeneratorOptions, MindmapStyles, StyleOverride};

pub const CONFIG_FILE_NAME: &str = "cimspec.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub namespace: Option<String>,
    pub output_dir: Option<PathBuf>,
    /// Generators run by `generate --type all`; empty means every generator.
    pub generators: Vec<GeneratorKind>,
    /// Style overrides keyed by node type key.
    pub mindmap: BTreeMap<String, StyleOverride>,
}

impl CliConfig {
    /// Load `explicit`, or `cimspec.toml` from the input directory when present.
    pub fn load(input_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let path = input_dir.join(CONFIG_FILE_NAME);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config option in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            namespace: self.namespace().to_string(),
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        let mut styles = MindmapStyles::default();
        styles.apply(&self.mindmap);
        GeneratorOptions {
            namespace: self.namespace().to_string(),
            styles,
        }
    }

    /// Generators selected by `all`.
    pub fn default_generators(&self) -> Vec<GeneratorKind> {
        if self.generators.is_empty() {
            GeneratorKind::ALL.to_vec()
        } else {
            self.generators.clone()
        }
    }
}
