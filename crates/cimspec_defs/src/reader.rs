//! Definition file reading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::dialect::{adapt, SourceDocument};
use crate::error::{DefsError, DefsResult};
use crate::raw::DefinitionSet;

/// Directory, beside the definitions, that holds short table JSON files.
pub const SHORT_TABLES_DIR: &str = "short_tables";

/// Reader for specialization definition files.
pub struct DefinitionReader;

impl DefinitionReader {
    /// Load every document belonging to `scope` from `dir`.
    ///
    /// The root is `<scope>.yaml` (or `.yml`); companions are the
    /// `<scope>_*.yaml` files in the same directory, taken in file name order.
    /// A companion that cannot be read is recorded in
    /// [`DefinitionSet::unreadable`] and the rest are still loaded.
    pub fn load(dir: impl AsRef<Path>, scope: &str) -> DefsResult<DefinitionSet> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DefsError::NotFound(dir.to_path_buf()));
        }
        info!("Loading '{}' definitions from {:?}", scope, dir);

        let companion_prefix = format!("{}_", scope);
        let mut root = None;
        let mut companions = Vec::new();
        let mut unreadable = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !Self::is_yaml(path) {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };

            if stem == scope {
                if root.is_some() {
                    warn!("Ignoring duplicate root document {:?}", path);
                    continue;
                }
                root = Some(Self::read_document(path)?);
            } else if stem.starts_with(&companion_prefix) {
                match Self::read_document(path) {
                    Ok(document) => companions.push(document),
                    Err(e) => {
                        warn!("Skipping unreadable definition {:?}: {}", path, e);
                        unreadable.push((stem, e.to_string()));
                    }
                }
            }
        }

        let root = root.ok_or_else(|| DefsError::RootNotFound {
            scope: scope.to_string(),
            dir: dir.to_path_buf(),
        })?;
        debug!("Found root {:?} and {} companion documents", root.path, companions.len());

        let mut set = adapt(scope, root, companions);
        set.unreadable = unreadable;
        Ok(set)
    }

    /// Read and parse one YAML document, keyed by its file stem.
    pub fn read_document(path: impl AsRef<Path>) -> DefsResult<SourceDocument> {
        let path = path.as_ref();
        debug!("Reading definition from {:?}", path);

        let content = fs::read_to_string(path)?;
        let key = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let value = serde_yaml::from_str(&content).map_err(|e| DefsError::InvalidDocument {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(SourceDocument::new(key, value).with_path(path))
    }

    /// Parse a single in-memory root document (either dialect) for `scope`.
    pub fn load_str(scope: &str, content: &str) -> DefsResult<DefinitionSet> {
        Self::load_documents(scope, content, &[])
    }

    /// Parse an in-memory root document together with companion documents
    /// given as `(key, content)` pairs.
    pub fn load_documents(
        scope: &str,
        root: &str,
        companions: &[(&str, &str)],
    ) -> DefsResult<DefinitionSet> {
        let root = SourceDocument::new(scope, serde_yaml::from_str(root)?);
        let companions = companions
            .iter()
            .map(|(key, content)| -> DefsResult<SourceDocument> {
                Ok(SourceDocument::new(*key, serde_yaml::from_str(content)?))
            })
            .collect::<DefsResult<Vec<_>>>()?;
        Ok(adapt(scope, root, companions))
    }

    /// List the short table files beside the definitions, sorted by path.
    pub fn short_table_paths(dir: impl AsRef<Path>) -> DefsResult<Vec<PathBuf>> {
        let pattern = dir
            .as_ref()
            .join(SHORT_TABLES_DIR)
            .join("*.json")
            .to_string_lossy()
            .to_string();

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| DefsError::InvalidDocument {
                path: PathBuf::from(&pattern),
                message: e.to_string(),
            })?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable short table: {}", e);
                    None
                }
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn is_yaml(path: &Path) -> bool {
        path.extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml")
    }
}
