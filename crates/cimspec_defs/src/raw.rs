//! Canonical raw definition records.
//!
//! Dialect adapters normalise every source shape into [`RawDefinition`]s held
//! by a [`DefinitionSet`]. Field values stay untyped (`serde_yaml::Value`) so
//! that the validator can report missing and mis-typed fields separately.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{DefsError, DefsResult};
use crate::models::{
    DefinitionKind, DetailEntry, EnumDefinition, QcStatus, RootDefinition, TopicDefinition,
};
use crate::naming::strip_module_namespace;

/// Canonical (upper-case) field names.
pub mod fields {
    pub const AUTHORS: &str = "AUTHORS";
    pub const CONTACT: &str = "CONTACT";
    pub const CONTRIBUTORS: &str = "CONTRIBUTORS";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const QC_STATUS: &str = "QC_STATUS";
    pub const CHANGE_HISTORY: &str = "CHANGE_HISTORY";
    pub const DETAILS: &str = "DETAILS";
    pub const ENUMERATIONS: &str = "ENUMERATIONS";
    pub const GRID: &str = "GRID";
    pub const KEY_PROPERTIES: &str = "KEY_PROPERTIES";
    pub const PROCESSES: &str = "PROCESSES";
    pub const SUB_PROCESSES: &str = "SUB_PROCESSES";

    /// Every field an adapter recognises.
    pub const ALL: [&str; 12] = [
        AUTHORS,
        CONTACT,
        CONTRIBUTORS,
        DESCRIPTION,
        QC_STATUS,
        CHANGE_HISTORY,
        DETAILS,
        ENUMERATIONS,
        GRID,
        KEY_PROPERTIES,
        PROCESSES,
        SUB_PROCESSES,
    ];
}

/// Source dialect a definition set was read from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// One document per topic, cross-referenced by key from the root.
    Module,
    /// A single document with topics nested in place.
    Inline,
}

/// A single definition in canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDefinition {
    /// Source key, used to group errors (`ocean_grid`, `SUB_PROCESSES[advection]`).
    pub key: String,
    pub kind: DefinitionKind,
    /// The definition body; a mapping unless the source was malformed.
    pub fields: Value,
}

impl RawDefinition {
    pub fn new(key: impl Into<String>, kind: DefinitionKind, fields: Value) -> Self {
        Self {
            key: key.into(),
            kind,
            fields,
        }
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        self.fields.as_mapping()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.mapping().and_then(|m| m.get(field))
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn mapping_field(&self, field: &str) -> Option<&Mapping> {
        self.get(field).and_then(Value::as_mapping)
    }

    /// Decode a validated root definition.
    pub fn decode_root(&self, scope: &str) -> DefsResult<RootDefinition> {
        let qc_status = self.decode_qc_status()?.unwrap_or_default();
        let change_history = match self.get(fields::CHANGE_HISTORY) {
            Some(value) => self.decode_value(value.clone())?,
            None => Vec::new(),
        };

        Ok(RootDefinition {
            key: self.key.clone(),
            name: strip_module_namespace(&self.key, scope),
            authors: self.required_str(fields::AUTHORS)?,
            contact: self.required_str(fields::CONTACT)?,
            contributors: self.required_str(fields::CONTRIBUTORS)?,
            qc_status,
            description: self.required_str(fields::DESCRIPTION)?,
            change_history,
        })
    }

    /// Decode a validated topic definition, including its sub-processes.
    pub fn decode_topic(&self, scope: &str) -> DefsResult<TopicDefinition> {
        let details = self.decode_entries::<DetailEntry>(fields::DETAILS)?;
        let enumerations = self.decode_entries::<EnumDefinition>(fields::ENUMERATIONS)?;

        let mut sub_processes = Vec::new();
        if let Some(subs) = self.mapping_field(fields::SUB_PROCESSES) {
            for (key, value) in subs {
                let key = self.entry_key(key)?;
                let sub = RawDefinition::new(key, DefinitionKind::SubProcess, value.clone());
                sub_processes.push(sub.decode_topic(scope)?);
            }
        }

        Ok(TopicDefinition {
            key: self.key.clone(),
            name: strip_module_namespace(&self.key, scope),
            kind: self.kind,
            authors: self.str_field(fields::AUTHORS).map(str::to_string),
            contact: self.str_field(fields::CONTACT).map(str::to_string),
            qc_status: self.decode_qc_status()?,
            description: self.required_str(fields::DESCRIPTION)?,
            details,
            enumerations,
            sub_processes,
        })
    }

    fn decode_qc_status(&self) -> DefsResult<Option<QcStatus>> {
        match self.str_field(fields::QC_STATUS) {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|message| self.decode_error(message)),
            None => Ok(None),
        }
    }

    fn decode_entries<T: DeserializeOwned>(&self, field: &str) -> DefsResult<Vec<(String, T)>> {
        let mut entries = Vec::new();
        if let Some(mapping) = self.mapping_field(field) {
            for (key, value) in mapping {
                let key = self.entry_key(key)?;
                let decoded = self.decode_value(value.clone()).map_err(|e| {
                    self.decode_error(format!("{}[{}]: {}", field, key, e))
                })?;
                entries.push((key, decoded));
            }
        }
        Ok(entries)
    }

    fn decode_value<T: DeserializeOwned>(&self, value: Value) -> DefsResult<T> {
        serde_yaml::from_value(value).map_err(|e| self.decode_error(e.to_string()))
    }

    fn entry_key(&self, key: &Value) -> DefsResult<String> {
        key.as_str()
            .map(str::to_string)
            .ok_or_else(|| self.decode_error("all keys must be strings"))
    }

    fn required_str(&self, field: &str) -> DefsResult<String> {
        self.str_field(field)
            .map(str::to_string)
            .ok_or_else(|| self.decode_error(format!("{} property is missing", field)))
    }

    fn decode_error(&self, message: impl Into<String>) -> DefsError {
        DefsError::Decode {
            key: self.key.clone(),
            message: message.into(),
        }
    }
}

/// The complete set of definitions for one scope, with cross references
/// already resolved by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionSet {
    pub scope: String,
    pub dialect: Dialect,
    pub root: RawDefinition,
    pub grid: Option<RawDefinition>,
    pub key_properties: Option<RawDefinition>,
    pub processes: Vec<RawDefinition>,
    /// Keys referenced by the root for which no definition was found.
    pub unresolved: Vec<String>,
    /// Companion documents that could not be read, as `(key, message)`.
    pub unreadable: Vec<(String, String)>,
}

impl DefinitionSet {
    /// Non-root definitions in traversal order.
    pub fn topics(&self) -> impl Iterator<Item = &RawDefinition> {
        self.grid
            .iter()
            .chain(self.key_properties.iter())
            .chain(self.processes.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.topics().count()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Upper-case every recognised top-level field name, recursing into
/// `SUB_PROCESSES` entries. Unknown keys are kept as written.
pub fn normalize_field_names(value: Value) -> Value {
    let Value::Mapping(mapping) = value else {
        return value;
    };

    let mut normalized = Mapping::new();
    for (key, value) in mapping {
        let canonical = key
            .as_str()
            .map(str::to_uppercase)
            .filter(|upper| fields::ALL.contains(&upper.as_str()));

        match canonical {
            Some(name) if name == fields::SUB_PROCESSES => {
                normalized.insert(Value::String(name), normalize_sub_processes(value));
            }
            Some(name) => {
                normalized.insert(Value::String(name), value);
            }
            None => {
                normalized.insert(key, value);
            }
        }
    }
    Value::Mapping(normalized)
}

fn normalize_sub_processes(value: Value) -> Value {
    match value {
        Value::Mapping(subs) => Value::Mapping(
            subs.into_iter()
                .map(|(key, sub)| (key, normalize_field_names(sub)))
                .collect(),
        ),
        other => other,
    }
}
