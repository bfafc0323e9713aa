//! Short table validation.
//!
//! Short tables are JSON summaries kept beside the definitions. They only need
//! to be well formed; nothing else consumes them.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

/// Validator for short table JSON files.
pub struct ShortTableValidator;

impl ShortTableValidator {
    /// Validate a short table file. Unreadable or malformed files yield a single message.
    pub fn validate_file(path: impl AsRef<Path>) -> Vec<String> {
        let path = path.as_ref();
        debug!("Validating short table {:?}", path);

        if !path.is_file() {
            return vec!["Unknown file".to_string()];
        }
        let parsed = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok());
        match parsed {
            Some(value) => Self::validate_value(&value),
            None => vec!["Malformed JSON".to_string()],
        }
    }

    /// Validate decoded short table content.
    pub fn validate_value(table: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        let Some(table) = table.as_object() else {
            errors.push("Short table must be a JSON object".to_string());
            return errors;
        };

        match table.get("AUTHORS") {
            None => errors.push("AUTHORS is required".to_string()),
            Some(Value::Array(_)) => {}
            Some(_) => errors.push("AUTHORS must be a list".to_string()),
        }

        match table.get("CHANGE_HISTORY") {
            None => errors.push("CHANGE_HISTORY is required".to_string()),
            Some(Value::Array(entries)) => {
                if entries
                    .iter()
                    .any(|e| e.as_array().map_or(true, |entry| entry.len() != 4))
                {
                    errors.push("Change histories must be defined as 4 member lists".to_string());
                }
            }
            Some(_) => errors.push("CHANGE_HISTORY must be a list".to_string()),
        }

        check_string(&mut errors, table, "CONTACT");

        match table.get("CONTRIBUTORS") {
            None => errors.push("CONTRIBUTORS is required".to_string()),
            Some(Value::Array(_)) => {}
            Some(_) => errors.push("CONTRIBUTORS must be a list".to_string()),
        }

        check_string(&mut errors, table, "LABEL");

        match table.get("PROPERTIES") {
            None => errors.push("PROPERTIES is required".to_string()),
            Some(Value::Array(properties)) => {
                if let Some(error) = properties.iter().find_map(property_error) {
                    errors.push(error.to_string());
                }
            }
            Some(_) => errors.push("PROPERTIES must be a list".to_string()),
        }

        check_string(&mut errors, table, "QC_STATUS");

        errors
    }
}

fn check_string(errors: &mut Vec<String>, table: &serde_json::Map<String, Value>, field: &str) {
    match table.get(field) {
        None => errors.push(format!("{} is required", field)),
        Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("{} must be a string", field)),
    }
}

/// First problem with a `[name, priority]` property entry, if any.
fn property_error(property: &Value) -> Option<&'static str> {
    let Some(pair) = property.as_array().filter(|p| p.len() == 2) else {
        return Some("All properties must be 2 member lists");
    };
    if !pair[0].is_string() {
        return Some("Property names must be strings");
    }
    match pair[1].as_i64() {
        Some(priority) if priority > 0 => None,
        _ => Some("Property priorities must be integers > 0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_table() {
        let table = json!({
            "AUTHORS": ["A"],
            "CHANGE_HISTORY": [["0.1", "2016-01-01", "A", "Initial"]],
            "CONTACT": "a@b.c",
            "CONTRIBUTORS": [],
            "LABEL": "Ocean",
            "PROPERTIES": [["cmip6.ocean.grid", 1]],
            "QC_STATUS": "draft"
        });
        assert!(ShortTableValidator::validate_value(&table).is_empty());
    }

    #[test]
    fn test_invalid_table() {
        let table = json!({
            "AUTHORS": "A",
            "CHANGE_HISTORY": [["0.1"]],
            "CONTACT": 3,
            "CONTRIBUTORS": [],
            "PROPERTIES": [["cmip6.ocean.grid", 0]],
            "QC_STATUS": "draft"
        });
        assert_eq!(
            ShortTableValidator::validate_value(&table),
            vec![
                "AUTHORS must be a list",
                "Change histories must be defined as 4 member lists",
                "CONTACT must be a string",
                "LABEL is required",
                "Property priorities must be integers > 0",
            ]
        );
    }
}
