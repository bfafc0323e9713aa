//! Structural validation of raw definitions.
//!
//! Validation is pure: every check inspects untyped YAML and returns messages.
//! A definition is only decoded into typed records once its messages are empty.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::models::{
    DefinitionKind, QcStatus, CARDINALITIES, ENUM_PREFIX, SCALAR_TYPES, TOPLEVEL_KEY,
};
use crate::raw::{fields, DefinitionSet, RawDefinition};

static GROUP_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid regex"));

static ENUM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("valid regex"));

static ENUM_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_ (){}/*.,:+\-]+$").expect("valid regex"));

/// Aggregated validation messages, grouped by definition key.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ValidationReport {
    pub errors: BTreeMap<String, Vec<String>>,
    pub warnings: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(key.into()).or_default().push(message.into());
    }

    /// Append a batch of messages for `key`; an empty batch records nothing.
    pub fn extend(&mut self, key: &str, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        self.errors.entry(key.to_string()).or_default().extend(messages);
    }

    pub fn add_warning(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.warnings.entry(key.into()).or_default().push(message.into());
    }

    pub fn merge(&mut self, other: ValidationReport) {
        for (key, messages) in other.errors {
            self.errors.entry(key).or_default().extend(messages);
        }
        for (key, messages) in other.warnings {
            self.warnings.entry(key).or_default().extend(messages);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn errors_for(&self, key: &str) -> &[String] {
        self.errors.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Validator for raw specialization definitions.
pub struct DefinitionValidator;

impl DefinitionValidator {
    /// Validate every definition of a set, without building anything.
    pub fn validate_set(set: &DefinitionSet) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.extend(&set.root.key, Self::validate_root(&set.root));
        for reference in &set.unresolved {
            report.add_error(
                &set.root.key,
                format!("{} is an invalid key - no matching definition can be found", reference),
            );
        }
        for (key, message) in &set.unreadable {
            report.add_error(key, message);
        }
        for topic in set.topics() {
            report.extend(&topic.key, Self::validate_topic(topic));
        }

        debug!("Validated {} definitions: {} errors", set.len(), report.error_count());
        report
    }

    /// Validate the root (realm) definition.
    pub fn validate_root(root: &RawDefinition) -> Vec<String> {
        let mut errors = Vec::new();
        let Some(mapping) = root.mapping() else {
            errors.push("definition must be a mapping".to_string());
            return errors;
        };

        for field in [
            fields::AUTHORS,
            fields::CONTACT,
            fields::CONTRIBUTORS,
            fields::DESCRIPTION,
            fields::QC_STATUS,
        ] {
            check_string_field(&mut errors, mapping, field);
        }
        check_description(&mut errors, mapping);
        check_qc_status(&mut errors, mapping);

        match mapping.get(fields::CHANGE_HISTORY) {
            None => {}
            Some(Value::Sequence(entries)) => {
                if entries.iter().any(|entry| !is_string_tuple(entry, 4)) {
                    errors.push(
                        "CHANGE_HISTORY entries must be 4 member tuples: (version, date, author, comment)"
                            .to_string(),
                    );
                }
            }
            Some(_) => errors.push("CHANGE_HISTORY property must be a list".to_string()),
        }

        for field in [fields::GRID, fields::KEY_PROPERTIES] {
            match mapping.get(field) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(_) => errors.push(format!("{} property must be a string", field)),
            }
        }

        match mapping.get(fields::PROCESSES) {
            None => errors.push("PROCESSES property is missing".to_string()),
            Some(Value::Sequence(keys)) => {
                if keys.iter().any(|k| !k.is_string()) {
                    errors.push("PROCESSES: all keys must be strings".to_string());
                }
            }
            Some(_) => errors.push("PROCESSES property must be a list".to_string()),
        }

        errors
    }

    /// Validate a topic, including its sub-processes.
    pub fn validate_topic(topic: &RawDefinition) -> Vec<String> {
        let mut errors = Self::validate_topic_body(topic, &[]);
        let blocked = topic.mapping().map_or(true, |m| !level_one(m, topic.kind).is_empty());
        if blocked {
            return errors;
        }
        for (key, messages) in Self::validate_sub_processes(topic) {
            errors.extend(
                messages
                    .into_iter()
                    .map(|m| format!("SUB_PROCESSES[{}] :: {}", key, m)),
            );
        }
        errors
    }

    /// Validate a topic's own fields, details and enumerations.
    ///
    /// `inherited` holds enumeration tables of ancestor topics, nearest first.
    /// Level-1 (field shape) errors suppress level-2 (content) checks.
    pub fn validate_topic_body(topic: &RawDefinition, inherited: &[&Mapping]) -> Vec<String> {
        let mut errors = Vec::new();
        let Some(mapping) = topic.mapping() else {
            errors.push("definition must be a mapping".to_string());
            return errors;
        };

        errors.extend(level_one(mapping, topic.kind));
        if !errors.is_empty() {
            return errors;
        }

        let empty = Mapping::new();
        let enumerations = section(mapping, fields::ENUMERATIONS).unwrap_or(&empty);
        errors.extend(Self::validate_enumerations(enumerations));

        let mut scope = Vec::with_capacity(inherited.len() + 1);
        scope.push(enumerations);
        scope.extend_from_slice(inherited);
        if let Some(details) = section(mapping, fields::DETAILS) {
            errors.extend(Self::validate_details(details, &scope));
        }

        errors
    }

    /// Validate each sub-process of a process, keyed by sub-process name.
    ///
    /// Sub-processes resolve enumerations against their own table first and
    /// then against the owning process.
    pub fn validate_sub_processes(process: &RawDefinition) -> Vec<(String, Vec<String>)> {
        let Some(subs) = process.mapping_field(fields::SUB_PROCESSES) else {
            return Vec::new();
        };
        let empty = Mapping::new();
        let parent_enums = process.mapping_field(fields::ENUMERATIONS).unwrap_or(&empty);

        subs.iter()
            .filter_map(|(key, value)| {
                let key = key.as_str()?;
                let sub = RawDefinition::new(key, DefinitionKind::SubProcess, value.clone());
                Some((key.to_string(), Self::validate_topic_body(&sub, &[parent_enums])))
            })
            .collect()
    }

    /// Validate a `DETAILS` mapping against the given enumeration scope chain.
    pub fn validate_details(details: &Mapping, enum_scope: &[&Mapping]) -> Vec<String> {
        let mut errors = Vec::new();
        let mut groups: HashSet<&str> = HashSet::new();

        for (key, defn) in details {
            let Some(key) = key.as_str() else {
                continue;
            };
            let segments: Vec<&str> = key.split(':').collect();

            if segments.len() > 2 {
                errors.push(format!("{} : property nesting level cannot be > 2", key));
                continue;
            }
            if segments.iter().any(|s| !GROUP_SEGMENT.is_match(s)) {
                errors.push(format!("{}: detail set name is invalid - must be lower_case_underscore", key));
                continue;
            }
            if segments.len() == 2 && segments[0] != TOPLEVEL_KEY && !groups.contains(segments[0]) {
                errors.push(format!("{}: must be associated with a parent property set", key));
                continue;
            }

            match defn {
                Value::Sequence(_) => {
                    if segments[0] == TOPLEVEL_KEY {
                        errors.push(format!("{}: toplevel must be a detail set", key));
                        continue;
                    }
                    errors.extend(
                        validate_inline_property(key, defn, enum_scope)
                            .into_iter()
                            .map(|e| format!("DETAILS[{}] :: {}", key, e)),
                    );
                }
                Value::Mapping(group) => {
                    errors.extend(validate_group(key, group, enum_scope));
                    if key != TOPLEVEL_KEY {
                        groups.insert(key);
                    }
                }
                _ => errors.push(format!("DETAILS[{}]: must be a dictionary or a 4 member tuple", key)),
            }
        }

        errors
    }

    /// Validate an `ENUMERATIONS` mapping.
    pub fn validate_enumerations(enumerations: &Mapping) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, defn) in enumerations {
            let Some(name) = name.as_str() else {
                continue;
            };
            errors.extend(
                validate_enum(name, defn)
                    .into_iter()
                    .map(|e| format!("ENUMERATION[{}] :: {}", name, e)),
            );
        }
        errors
    }
}

/// Field presence and shape checks for a topic.
fn level_one(mapping: &Mapping, kind: DefinitionKind) -> Vec<String> {
    let mut errors = Vec::new();
    if kind != DefinitionKind::SubProcess {
        for field in [fields::AUTHORS, fields::CONTACT, fields::QC_STATUS] {
            check_string_field(&mut errors, mapping, field);
        }
        check_qc_status(&mut errors, mapping);
    }
    check_string_field(&mut errors, mapping, fields::DESCRIPTION);
    check_description(&mut errors, mapping);

    check_section(&mut errors, mapping, fields::DETAILS, false);
    check_section(&mut errors, mapping, fields::ENUMERATIONS, true);
    if mapping.contains_key(fields::SUB_PROCESSES) {
        if kind == DefinitionKind::Process {
            check_section(&mut errors, mapping, fields::SUB_PROCESSES, true);
        } else {
            errors.push(format!("SUB_PROCESSES are not allowed on a {}", kind.display_name()));
        }
    }
    errors
}

fn check_string_field(errors: &mut Vec<String>, mapping: &Mapping, field: &str) {
    match mapping.get(field) {
        None => errors.push(format!("{} property is missing", field)),
        Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("{} property must be a string", field)),
    }
}

fn check_description(errors: &mut Vec<String>, mapping: &Mapping) {
    if let Some(Value::String(description)) = mapping.get(fields::DESCRIPTION) {
        if description.trim().is_empty() {
            errors.push("DESCRIPTION property must not be a zero length string".to_string());
        }
    }
}

fn check_qc_status(errors: &mut Vec<String>, mapping: &Mapping) {
    if let Some(Value::String(status)) = mapping.get(fields::QC_STATUS) {
        if status.parse::<QcStatus>().is_err() {
            errors.push(format!("QC_STATUS property is invalid :: {}", status));
        }
    }
}

/// Optional mapping section. Entries must be keyed by strings and, when
/// `records` is set, be mappings themselves.
fn check_section(errors: &mut Vec<String>, mapping: &Mapping, name: &str, records: bool) {
    let Some(value) = mapping.get(name) else {
        return;
    };
    let Value::Mapping(entries) = value else {
        if !value.is_null() {
            errors.push(format!("{} must be a mapping", name));
        }
        return;
    };

    for (key, entry) in entries {
        match key.as_str() {
            Some(key) if !key.trim().is_empty() => {
                if records && !entry.is_mapping() {
                    errors.push(format!("{}[{}]: must be a dictionary", name, key));
                }
            }
            _ => errors.push(format!("{}: all keys must be strings", name)),
        }
    }
}

fn section<'a>(mapping: &'a Mapping, name: &str) -> Option<&'a Mapping> {
    mapping.get(name).and_then(Value::as_mapping)
}

fn validate_group(key: &str, group: &Mapping, enum_scope: &[&Mapping]) -> Vec<String> {
    let mut errors = Vec::new();

    match group.get("description") {
        None => errors.push(format!("{}: detail set must have a description", key)),
        Some(Value::String(description)) if description.trim().is_empty() => errors.push(format!(
            "{}: detail set description must not be a zero length string",
            key
        )),
        Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("{}: detail set description must be a string", key)),
    }

    match group.get("properties") {
        None | Some(Value::Null) => {}
        Some(Value::Sequence(properties)) => {
            if properties.iter().any(|p| !is_tuple(p, 4)) {
                errors.push(format!("{}: all properties must be 4 member tuples", key));
            } else {
                for property in properties {
                    errors.extend(
                        validate_property(property, enum_scope)
                            .into_iter()
                            .map(|e| format!("{}.{}", key, e)),
                    );
                }
            }
        }
        Some(_) => errors.push(format!("{}: properties must defined as a list", key)),
    }

    errors
}

fn validate_inline_property(key: &str, defn: &Value, enum_scope: &[&Mapping]) -> Vec<String> {
    if !is_tuple(defn, 4) {
        return vec!["all properties must be 4 member tuples".to_string()];
    }
    let mut errors = validate_property(defn, enum_scope);
    let name = key.rsplit(':').next().unwrap_or(key);
    if defn[0].as_str().map_or(false, |n| n != name) {
        errors.push(format!("property name must match its key :: {}", name));
    }
    errors
}

/// Validate one `(name, type, cardinality, description)` tuple.
fn validate_property(property: &Value, enum_scope: &[&Mapping]) -> Vec<String> {
    let mut errors = Vec::new();
    let (name, type_of, cardinality, description) =
        (&property[0], &property[1], &property[2], &property[3]);

    match name {
        Value::String(n) if n.trim().is_empty() => {
            errors.push("name must not be a zero length string".to_string())
        }
        Value::String(_) => {}
        other => errors.push(format!("name must be a string :: [{}]", describe(other))),
    }

    match type_of {
        Value::String(t) => match t.strip_prefix(ENUM_PREFIX) {
            Some(key) => {
                if !enum_scope.iter().any(|table| table.contains_key(key)) {
                    errors.push(format!("type enum key is invalid :: {}", t));
                }
            }
            None => {
                if !SCALAR_TYPES.contains(&t.as_str()) {
                    errors.push(format!("type must be either simple or an enum :: {}", t));
                }
            }
        },
        other => errors.push(format!("type must be a string :: {}", describe(other))),
    }

    if !cardinality.as_str().map_or(false, |c| CARDINALITIES.contains(&c)) {
        errors.push(format!("cardinality is invalid :: [{}]", describe(cardinality)));
    }

    match description {
        Value::String(d) if d.trim().is_empty() => {
            errors.push("description must not be a zero length string".to_string())
        }
        Value::String(_) => {}
        other => errors.push(format!("description must be a string :: [{}]", describe(other))),
    }

    let label = name.as_str().map(str::to_string).unwrap_or_else(|| describe(name));
    errors
        .into_iter()
        .map(|e| format!("{} :: property {}", label, e))
        .collect()
}

fn validate_enum(name: &str, defn: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(defn) = defn.as_mapping() else {
        return vec!["must be a dictionary".to_string()];
    };

    if !ENUM_NAME.is_match(name) {
        errors.push("name is invalid - must be lower_case_underscore".to_string());
    }

    match defn.get("description") {
        None => errors.push("description is required".to_string()),
        Some(Value::String(description)) if description.trim().is_empty() => {
            errors.push("description must not be a zero length string".to_string())
        }
        Some(Value::String(_)) => {}
        Some(_) => errors.push("description must be a string".to_string()),
    }

    match defn.get("is_open") {
        None => errors.push("is_open is required".to_string()),
        Some(Value::Bool(_)) => {}
        Some(_) => errors.push("is_open must be a boolean".to_string()),
    }

    match defn.get("members") {
        None => errors.push("members is required".to_string()),
        Some(Value::Sequence(members)) if members.iter().all(|m| is_tuple(m, 2)) => {
            if members.is_empty() {
                errors.push("members must not be empty".to_string());
            }
            let mut seen = HashSet::new();
            for member in members {
                validate_enum_member(&mut errors, member, &mut seen);
            }
        }
        Some(_) => errors
            .push("members must defined as a list of tuples: (name, description)".to_string()),
    }

    errors
}

fn validate_enum_member<'a>(errors: &mut Vec<String>, member: &'a Value, seen: &mut HashSet<&'a str>) {
    let Some(value) = member[0].as_str() else {
        errors.push(format!("name is invalid :: {}", describe(&member[0])));
        return;
    };

    if !ENUM_MEMBER.is_match(value) {
        errors.push(format!(
            "Invalid enum member: {} --> name contain invalid characters",
            value
        ));
    }
    if !seen.insert(value) {
        errors.push(format!("duplicate member :: {}", value));
    }
    if !matches!(member[1], Value::String(_) | Value::Null) {
        errors.push(format!("member description must be a string :: {}", value));
    }
}

fn is_tuple(value: &Value, len: usize) -> bool {
    value.as_sequence().map_or(false, |s| s.len() == len)
}

fn is_string_tuple(value: &Value, len: usize) -> bool {
    value
        .as_sequence()
        .map_or(false, |s| s.len() == len && s.iter().all(Value::is_string))
}

/// Short rendering of a YAML value for messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().replace('\n', " "))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::normalize_field_names;

    fn topic(kind: DefinitionKind, source: &str) -> RawDefinition {
        let value = normalize_field_names(serde_yaml::from_str(source).unwrap());
        RawDefinition::new("ocean_advection", kind, value)
    }

    const HEADER: &str = "AUTHORS: A\nCONTACT: a@b.c\nQC_STATUS: draft\nDESCRIPTION: Advection\n";

    #[test]
    fn test_missing_and_mistyped_fields_are_distinct() {
        let raw = topic(DefinitionKind::Grid, "AUTHORS: 3\nDESCRIPTION: Grid\nQC_STATUS: draft\n");
        let errors = DefinitionValidator::validate_topic(&raw);
        assert!(errors.contains(&"AUTHORS property must be a string".to_string()));
        assert!(errors.contains(&"CONTACT property is missing".to_string()));
    }

    #[test]
    fn test_sub_process_skips_owner_fields() {
        let raw = topic(DefinitionKind::SubProcess, "DESCRIPTION: Tracers\n");
        assert!(DefinitionValidator::validate_topic(&raw).is_empty());
    }

    #[test]
    fn test_level_one_errors_block_level_two() {
        let source = format!(
            "{}DETAILS: not-a-mapping\nENUMERATIONS:\n  BAD NAME: {{}}\n",
            HEADER
        );
        let errors = DefinitionValidator::validate_topic(&topic(DefinitionKind::Process, &source));
        assert_eq!(errors, vec!["DETAILS must be a mapping".to_string()]);
    }

    #[test]
    fn test_nesting_depth_rejected() {
        let source = format!(
            "{}DETAILS:\n  a:\n    description: A\n  a:b:\n    description: B\n  a:b:c:\n    description: C\n",
            HEADER
        );
        let errors = DefinitionValidator::validate_topic(&topic(DefinitionKind::Process, &source));
        assert_eq!(errors, vec!["a:b:c : property nesting level cannot be > 2".to_string()]);
    }

    #[test]
    fn test_parent_group_must_be_declared_first() {
        let source = format!(
            "{}DETAILS:\n  b:c:\n    description: C\n  b:\n    description: B\n",
            HEADER
        );
        let errors = DefinitionValidator::validate_topic(&topic(DefinitionKind::Process, &source));
        assert_eq!(errors, vec!["b:c: must be associated with a parent property set".to_string()]);
    }

    #[test]
    fn test_property_checks() {
        let source = format!(
            r#"{}DETAILS:
  toplevel:
    description: top
    properties:
      - [scheme, "ENUM:unknown", "1.1", "Scheme"]
      - [order, integer, "2.1", ""]
  short:
    description: too short
    properties:
      - [x, bool, "0.1"]
"#,
            HEADER
        );
        let errors = DefinitionValidator::validate_topic(&topic(DefinitionKind::Process, &source));
        assert_eq!(
            errors,
            vec![
                "toplevel.scheme :: property type enum key is invalid :: ENUM:unknown".to_string(),
                "toplevel.order :: property type must be either simple or an enum :: integer".to_string(),
                "toplevel.order :: property cardinality is invalid :: [2.1]".to_string(),
                "toplevel.order :: property description must not be a zero length string".to_string(),
                "short: all properties must be 4 member tuples".to_string(),
            ]
        );
    }

    #[test]
    fn test_enumeration_checks() {
        let source = format!(
            r#"{}ENUMERATIONS:
  schemes:
    description: Schemes
    is_open: "yes"
    members:
      - [centered, null]
      - ["bad;name", null]
      - [centered, Again]
  empty:
    description: Empty
    is_open: false
    members: []
"#,
            HEADER
        );
        let errors = DefinitionValidator::validate_topic(&topic(DefinitionKind::Process, &source));
        assert_eq!(
            errors,
            vec![
                "ENUMERATION[schemes] :: is_open must be a boolean".to_string(),
                "ENUMERATION[schemes] :: Invalid enum member: bad;name --> name contain invalid characters"
                    .to_string(),
                "ENUMERATION[schemes] :: duplicate member :: centered".to_string(),
                "ENUMERATION[empty] :: members must not be empty".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_descriptions_rejected() {
        let source = format!(
            r#"{}DETAILS:
  momentum:
    description: "  "
ENUMERATIONS:
  schemes:
    description: ""
    is_open: false
    members:
      - [centered, null]
"#,
            HEADER
        );
        let errors = DefinitionValidator::validate_topic(&topic(DefinitionKind::Process, &source));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(
            &"momentum: detail set description must not be a zero length string".to_string()
        ));
        assert!(errors.contains(
            &"ENUMERATION[schemes] :: description must not be a zero length string".to_string()
        ));
    }

    #[test]
    fn test_sub_process_resolves_parent_enumerations() {
        let source = format!(
            r#"{}ENUMERATIONS:
  schemes:
    description: Schemes
    is_open: false
    members:
      - [centered, null]
SUB_PROCESSES:
  tracers:
    DESCRIPTION: Tracers
    DETAILS:
      toplevel:
        description: top
        properties:
          - [scheme, "ENUM:schemes", "1.1", "Scheme"]
          - [other, "ENUM:missing", "1.1", "Other"]
"#,
            HEADER
        );
        let errors = DefinitionValidator::validate_topic(&topic(DefinitionKind::Process, &source));
        assert_eq!(
            errors,
            vec![
                "SUB_PROCESSES[tracers] :: toplevel.other :: property type enum key is invalid :: ENUM:missing"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_root_validation() {
        let raw = RawDefinition::new(
            "ocean",
            DefinitionKind::Root,
            serde_yaml::from_str(
                "AUTHORS: A\nCONTACT: c\nCONTRIBUTORS: d\nDESCRIPTION: Ocean\nQC_STATUS: finished\nCHANGE_HISTORY:\n  - [0.1, '2016-01-01', A]\nGRID: 4\n",
            )
            .unwrap(),
        );
        let errors = DefinitionValidator::validate_root(&raw);
        assert_eq!(
            errors,
            vec![
                "QC_STATUS property is invalid :: finished".to_string(),
                "CHANGE_HISTORY entries must be 4 member tuples: (version, date, author, comment)"
                    .to_string(),
                "GRID property must be a string".to_string(),
                "PROCESSES property is missing".to_string(),
            ]
        );
    }

    #[test]
    fn test_report_counts() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());
        report.add_error("ocean_grid", "one");
        report.extend("ocean_grid", vec!["two".to_string()]);
        report.extend("ocean_advection", Vec::new());
        assert_eq!(report.error_count(), 2);
        assert!(report.errors_for("ocean_advection").is_empty());
        assert!(!report.errors.contains_key("ocean_advection"));
    }
}
