//! Typed specialization records.
//!
//! These are produced from canonical raw definitions once a definition has
//! passed structural validation. The builder only ever consumes these types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `DETAILS` key whose properties attach directly to the owning topic.
pub const TOPLEVEL_KEY: &str = "toplevel";

/// Prefix marking a property type as a reference into the enumeration table.
pub const ENUM_PREFIX: &str = "ENUM:";

/// Sentinel value of the implicit trailing choice of an open enumeration.
pub const OTHER_CHOICE: &str = "Other";

/// Scalar property types.
pub const SCALAR_TYPES: [&str; 4] = ["bool", "float", "int", "str"];

/// Property cardinalities.
pub const CARDINALITIES: [&str; 4] = ["0.1", "1.1", "0.N", "1.N"];

/// Kind of a raw definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DefinitionKind {
    Root,
    Grid,
    KeyProperties,
    Process,
    SubProcess,
}

impl DefinitionKind {
    /// Type key used by generators (`realm`, `grid`, `key-properties`, ...).
    pub fn type_key(&self) -> &'static str {
        match self {
            DefinitionKind::Root => "realm",
            DefinitionKind::Grid => "grid",
            DefinitionKind::KeyProperties => "key-properties",
            DefinitionKind::Process => "process",
            DefinitionKind::SubProcess => "sub-process",
        }
    }

    /// Words used when describing the kind in generated text.
    pub fn display_name(&self) -> &'static str {
        match self {
            DefinitionKind::Root => "realm",
            DefinitionKind::Grid => "grid",
            DefinitionKind::KeyProperties => "key properties",
            DefinitionKind::Process => "process",
            DefinitionKind::SubProcess => "sub-process",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_key())
    }
}

/// Quality control status of a definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QcStatus {
    #[default]
    Draft,
    Complete,
}

impl QcStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QcStatus::Draft => "draft",
            QcStatus::Complete => "complete",
        }
    }
}

impl FromStr for QcStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(QcStatus::Draft),
            "complete" => Ok(QcStatus::Complete),
            other => Err(format!("unknown QC status: {}", other)),
        }
    }
}

/// Property cardinality: mandatory/optional crossed with single/collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Cardinality {
    ZeroOne,
    OneOne,
    ZeroMany,
    OneMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::ZeroOne => "0.1",
            Cardinality::OneOne => "1.1",
            Cardinality::ZeroMany => "0.N",
            Cardinality::OneMany => "1.N",
        }
    }

    /// First segment is `1`.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Cardinality::OneOne | Cardinality::OneMany)
    }

    /// Second segment is `N`.
    pub fn is_collection(&self) -> bool {
        matches!(self, Cardinality::ZeroMany | Cardinality::OneMany)
    }
}

impl FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0.1" => Ok(Cardinality::ZeroOne),
            "1.1" => Ok(Cardinality::OneOne),
            "0.N" => Ok(Cardinality::ZeroMany),
            "1.N" => Ok(Cardinality::OneMany),
            other => Err(format!("cardinality is invalid :: [{}]", other)),
        }
    }
}

impl TryFrom<String> for Cardinality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cardinality> for String {
    fn from(value: Cardinality) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a leaf property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum PropertyType {
    Str,
    Bool,
    Int,
    Float,
    /// Reference to an enumeration key.
    Enum(String),
}

impl PropertyType {
    /// Raw form as written in definitions (`str`, `ENUM:key`).
    pub fn as_raw(&self) -> String {
        match self {
            PropertyType::Str => "str".to_string(),
            PropertyType::Bool => "bool".to_string(),
            PropertyType::Int => "int".to_string(),
            PropertyType::Float => "float".to_string(),
            PropertyType::Enum(key) => format!("{}{}", ENUM_PREFIX, key),
        }
    }

    /// Upper-case label (`STRING`, `BOOLEAN`, `ENUM:KEY`).
    pub fn label(&self) -> String {
        match self {
            PropertyType::Str => "STRING".to_string(),
            PropertyType::Bool => "BOOLEAN".to_string(),
            PropertyType::Int => "INTEGER".to_string(),
            PropertyType::Float => "FLOAT".to_string(),
            PropertyType::Enum(_) => self.as_raw().to_uppercase(),
        }
    }

    pub fn enum_key(&self) -> Option<&str> {
        match self {
            PropertyType::Enum(key) => Some(key),
            _ => None,
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(key) = s.strip_prefix(ENUM_PREFIX) {
            if key.is_empty() {
                return Err(format!("type enum key is invalid :: {}", s));
            }
            return Ok(PropertyType::Enum(key.to_string()));
        }
        match s {
            "str" => Ok(PropertyType::Str),
            "bool" => Ok(PropertyType::Bool),
            "int" => Ok(PropertyType::Int),
            "float" => Ok(PropertyType::Float),
            other => Err(format!("type must be either simple or an enum :: {}", other)),
        }
    }
}

impl TryFrom<String> for PropertyType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.as_raw()
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_raw())
    }
}

/// A leaf property declared as `(name, type, cardinality, description)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    from = "(String, PropertyType, Cardinality, String)",
    into = "(String, PropertyType, Cardinality, String)"
)]
pub struct PropertyDefinition {
    pub name: String,
    pub type_of: PropertyType,
    pub cardinality: Cardinality,
    pub description: String,
}

impl PropertyDefinition {
    pub fn new(
        name: impl Into<String>,
        type_of: PropertyType,
        cardinality: Cardinality,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_of,
            cardinality,
            description: description.into(),
        }
    }
}

impl From<(String, PropertyType, Cardinality, String)> for PropertyDefinition {
    fn from((name, type_of, cardinality, description): (String, PropertyType, Cardinality, String)) -> Self {
        Self {
            name,
            type_of,
            cardinality,
            description,
        }
    }
}

impl From<PropertyDefinition> for (String, PropertyType, Cardinality, String) {
    fn from(value: PropertyDefinition) -> Self {
        (value.name, value.type_of, value.cardinality, value.description)
    }
}

/// A named group of leaf properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupDefinition {
    pub description: String,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

/// Value of a `DETAILS` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DetailEntry {
    Group(GroupDefinition),
    Property(PropertyDefinition),
}

/// A member of an enumeration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "(String, Option<String>)", into = "(String, Option<String>)")]
pub struct EnumMember {
    pub value: String,
    pub description: Option<String>,
}

impl From<(String, Option<String>)> for EnumMember {
    fn from((value, description): (String, Option<String>)) -> Self {
        Self { value, description }
    }
}

impl From<EnumMember> for (String, Option<String>) {
    fn from(value: EnumMember) -> Self {
        (value.value, value.description)
    }
}

/// A controlled vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnumDefinition {
    pub description: String,
    pub is_open: bool,
    pub members: Vec<EnumMember>,
}

/// One change history entry: `(version, date, author, comment)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    from = "(String, String, String, String)",
    into = "(String, String, String, String)"
)]
pub struct ChangeRecord {
    pub version: String,
    pub date: String,
    pub author: String,
    pub comment: String,
}

impl From<(String, String, String, String)> for ChangeRecord {
    fn from((version, date, author, comment): (String, String, String, String)) -> Self {
        Self {
            version,
            date,
            author,
            comment,
        }
    }
}

impl From<ChangeRecord> for (String, String, String, String) {
    fn from(value: ChangeRecord) -> Self {
        (value.version, value.date, value.author, value.comment)
    }
}

/// Decoded root (realm) definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDefinition {
    pub key: String,
    pub name: String,
    pub authors: String,
    pub contact: String,
    pub contributors: String,
    pub qc_status: QcStatus,
    pub description: String,
    pub change_history: Vec<ChangeRecord>,
}

/// Decoded topic definition (grid, key properties, process or sub-process).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDefinition {
    pub key: String,
    pub name: String,
    pub kind: DefinitionKind,
    pub authors: Option<String>,
    pub contact: Option<String>,
    pub qc_status: Option<QcStatus>,
    pub description: String,
    pub details: Vec<(String, DetailEntry)>,
    pub enumerations: Vec<(String, EnumDefinition)>,
    pub sub_processes: Vec<TopicDefinition>,
}

impl TopicDefinition {
    pub fn enumeration(&self, key: &str) -> Option<&EnumDefinition> {
        self.enumerations
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, defn)| defn)
    }
}
