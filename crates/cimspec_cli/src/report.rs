//! Plain text validation reports.

use std::fmt::Display;

use cimspec_defs::ValidationReport;

pub const REPORT_BREAK: &str =
    "------------------------------------------------------------------------";

/// Report lines for a definition set.
pub fn definitions_report(
    namespace: &str,
    scope: &str,
    report: &ValidationReport,
    generated_at: impl Display,
) -> Vec<String> {
    let mut lines = Vec::new();

    if report.is_valid() {
        lines.push(REPORT_BREAK.to_string());
        lines.push(format!("{} specializations are valid.", scope.to_uppercase()));
        lines.push(REPORT_BREAK.to_string());
    } else {
        lines.push(REPORT_BREAK.to_string());
        lines.push(format!(
            "{} SPECIALIZATIONS VALIDATION REPORT",
            namespace.to_uppercase()
        ));
        lines.push(REPORT_BREAK.to_string());
        lines.push(format!("Specialization Type = {}", scope));
        lines.push(format!("Generated @ {}", generated_at));
        lines.push(format!("Error count = {}", report.error_count()));
        lines.push(REPORT_BREAK.to_string());

        for (key, errors) in &report.errors {
            lines.push(key.clone());
            for (idx, error) in errors.iter().enumerate() {
                lines.push(format!("Error #{}:\t{}.", idx + 1, error));
            }
            lines.push(String::new());
        }
    }

    for (key, warnings) in &report.warnings {
        for warning in warnings {
            lines.push(format!("Warning ({}):\t{}", key, warning));
        }
    }

    lines
}

/// Report lines for short table results given as `(file name, errors)`.
pub fn short_tables_report(scope: &str, results: &[(String, Vec<String>)]) -> Vec<String> {
    let mut lines = Vec::new();

    for (file_name, errors) in results {
        if errors.is_empty() {
            continue;
        }
        lines.push(REPORT_BREAK.to_string());
        lines.push(format!(
            "Invalid {} short-table: {}",
            scope.to_uppercase(),
            file_name
        ));
        for error in errors {
            lines.push(format!("\t{}", error));
        }
        lines.push(REPORT_BREAK.to_string());
    }

    if lines.is_empty() {
        lines.push(REPORT_BREAK.to_string());
        lines.push(format!("{} short-tables are valid.", scope.to_uppercase()));
        lines.push(REPORT_BREAK.to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_report() {
        let lines = definitions_report("cmip6", "ocean", &ValidationReport::new(), "now");
        assert_eq!(
            lines,
            vec![REPORT_BREAK, "OCEAN specializations are valid.", REPORT_BREAK]
        );
    }

    #[test]
    fn test_error_report() {
        let mut report = ValidationReport::new();
        report.add_error("ocean_grid", "DESCRIPTION property is missing");
        report.add_error("ocean_grid", "QC_STATUS property is missing");
        report.add_error("ocean", "PROCESSES property is missing");

        let lines = definitions_report("cmip6", "ocean", &report, "2016-01-01 00:00:00");
        assert_eq!(lines[1], "CMIP6 SPECIALIZATIONS VALIDATION REPORT");
        assert_eq!(lines[3], "Specialization Type = ocean");
        assert_eq!(lines[4], "Generated @ 2016-01-01 00:00:00");
        assert_eq!(lines[5], "Error count = 3");
        assert_eq!(
            &lines[7..],
            &[
                "ocean",
                "Error #1:\tPROCESSES property is missing.",
                "",
                "ocean_grid",
                "Error #1:\tDESCRIPTION property is missing.",
                "Error #2:\tQC_STATUS property is missing.",
                "",
            ]
        );
    }

    #[test]
    fn test_short_tables_report() {
        let valid = short_tables_report("ocean", &[("a.json".to_string(), vec![])]);
        assert_eq!(valid[1], "OCEAN short-tables are valid.");

        let invalid = short_tables_report(
            "ocean",
            &[("b.json".to_string(), vec!["Malformed JSON".to_string()])],
        );
        assert_eq!(invalid[1], "Invalid OCEAN short-table: b.json");
        assert_eq!(invalid[2], "\tMalformed JSON");
    }
}
