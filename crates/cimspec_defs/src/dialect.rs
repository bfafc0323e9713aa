//! Source dialect adapters.
//!
//! Two source shapes are accepted. In the module dialect the root document
//! names its grid, key properties and processes by key and each lives in its
//! own document. In the inline dialect the root nests them in place. Both end
//! up as the same [`DefinitionSet`]; a root may also mix the two per field.

use std::collections::HashSet;
use std::path::PathBuf;

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::models::DefinitionKind;
use crate::raw::{fields, normalize_field_names, DefinitionSet, Dialect, RawDefinition};

/// Fields a nested topic inherits from the root when it does not declare them.
const INHERITED_FIELDS: [&str; 3] = [fields::AUTHORS, fields::CONTACT, fields::QC_STATUS];

/// Key given to an in-line grid definition.
pub const INLINE_GRID_KEY: &str = "grid";

/// Key given to an in-line key properties definition.
pub const INLINE_KEY_PROPERTIES_KEY: &str = "key_properties";

/// A parsed source document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Document key: the file stem for files, caller supplied otherwise.
    pub key: String,
    pub path: Option<PathBuf>,
    pub value: Value,
}

impl SourceDocument {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            path: None,
            value,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl Dialect {
    /// Detect the dialect of a (normalised) root document.
    pub fn detect(root: &Value) -> Dialect {
        let nested = [fields::GRID, fields::KEY_PROPERTIES, fields::PROCESSES]
            .iter()
            .any(|field| root.get(*field).map(Value::is_mapping).unwrap_or(false));
        if nested {
            Dialect::Inline
        } else {
            Dialect::Module
        }
    }
}

/// Normalise a root document and its companions into a [`DefinitionSet`].
///
/// Cross references that cannot be satisfied are recorded in
/// [`DefinitionSet::unresolved`] rather than failing, so that validation can
/// report them alongside every other problem.
pub fn adapt(scope: &str, root: SourceDocument, documents: Vec<SourceDocument>) -> DefinitionSet {
    let mut root_value = normalize_field_names(root.value);
    let dialect = Dialect::detect(&root_value);
    debug!("Adapting '{}' ({:?} dialect, {} companion documents)", root.key, dialect, documents.len());

    let documents: Vec<SourceDocument> = documents
        .into_iter()
        .map(|doc| SourceDocument {
            value: normalize_field_names(doc.value),
            ..doc
        })
        .collect();

    let mut resolver = Resolver {
        documents: &documents,
        used: HashSet::new(),
        unresolved: Vec::new(),
    };

    let inherited = inherited_fields(&root_value);
    let mut grid = None;
    let mut key_properties = None;
    let mut processes = Vec::new();

    if let Some(mapping) = root_value.as_mapping_mut() {
        grid = resolver.single(
            mapping,
            fields::GRID,
            INLINE_GRID_KEY,
            DefinitionKind::Grid,
            &inherited,
        );
        key_properties = resolver.single(
            mapping,
            fields::KEY_PROPERTIES,
            INLINE_KEY_PROPERTIES_KEY,
            DefinitionKind::KeyProperties,
            &inherited,
        );
        processes = resolver.processes(mapping, &inherited);
    }

    for doc in &documents {
        if !resolver.used.contains(doc.key.as_str()) {
            warn!("Document '{}' is not referenced by '{}'", doc.key, root.key);
        }
    }

    DefinitionSet {
        scope: scope.to_string(),
        dialect,
        root: RawDefinition::new(root.key, DefinitionKind::Root, root_value),
        grid,
        key_properties,
        processes,
        unresolved: resolver.unresolved,
        unreadable: Vec::new(),
    }
}

fn inherited_fields(root: &Value) -> Mapping {
    let mut inherited = Mapping::new();
    for field in INHERITED_FIELDS {
        if let Some(value) = root.get(field) {
            inherited.insert(Value::from(field), value.clone());
        }
    }
    inherited
}

/// Last `.`-separated segment of a module reference.
fn reference_key(reference: &str) -> &str {
    reference.rsplit('.').next().unwrap_or(reference)
}

struct Resolver<'a> {
    documents: &'a [SourceDocument],
    used: HashSet<&'a str>,
    unresolved: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn lookup(&mut self, reference: &str, kind: DefinitionKind) -> Option<RawDefinition> {
        let key = reference_key(reference);
        let documents = self.documents;
        match documents.iter().find(|doc| doc.key == key) {
            Some(doc) => {
                self.used.insert(doc.key.as_str());
                Some(RawDefinition::new(doc.key.clone(), kind, doc.value.clone()))
            }
            None => {
                debug!("Unresolved {} reference '{}'", kind, reference);
                self.unresolved.push(reference.to_string());
                None
            }
        }
    }

    /// Resolve `GRID` or `KEY_PROPERTIES`. An empty string or null means absent.
    fn single(
        &mut self,
        root: &mut Mapping,
        field: &str,
        inline_key: &str,
        kind: DefinitionKind,
        inherited: &Mapping,
    ) -> Option<RawDefinition> {
        let value = root.get(field)?.clone();
        match value {
            Value::String(reference) if reference.is_empty() => None,
            Value::String(reference) => self.lookup(&reference, kind),
            body @ Value::Mapping(_) => {
                root.insert(Value::from(field), Value::from(inline_key));
                Some(RawDefinition::new(inline_key, kind, inherit(body, inherited)))
            }
            _ => None,
        }
    }

    fn processes(&mut self, root: &mut Mapping, inherited: &Mapping) -> Vec<RawDefinition> {
        let Some(value) = root.get(fields::PROCESSES).cloned() else {
            return Vec::new();
        };

        match value {
            Value::Sequence(references) => references
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|reference| self.lookup(reference, DefinitionKind::Process))
                .collect(),
            Value::Mapping(nested) => {
                let mut keys = Vec::new();
                let mut processes = Vec::new();
                for (key, body) in nested {
                    let Some(name) = key.as_str() else {
                        continue;
                    };
                    keys.push(Value::from(name));
                    let body = inherit(body, inherited);
                    processes.push(RawDefinition::new(name, DefinitionKind::Process, body));
                }
                root.insert(Value::from(fields::PROCESSES), Value::Sequence(keys));
                processes
            }
            _ => Vec::new(),
        }
    }
}

/// Normalise a nested topic body and fill in fields inherited from the root.
fn inherit(body: Value, inherited: &Mapping) -> Value {
    let mut body = normalize_field_names(body);
    if let Some(mapping) = body.as_mapping_mut() {
        for (field, value) in inherited {
            if !mapping.contains_key(field) {
                mapping.insert(field.clone(), value.clone());
            }
        }
    }
    body
}
