//! Validate command - Check a specialization definition set.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use tracing::info;

use cimspec_core::load_and_build;
use cimspec_defs::{DefinitionReader, ShortTableValidator};

use crate::config::CliConfig;
use crate::report::{definitions_report, short_tables_report};

#[derive(Args)]
pub struct ValidateArgs {
    /// Directory holding the definition files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Specialization scope (realm name), e.g. ocean
    #[arg(short, long, alias = "realm")]
    pub scope: String,

    /// Path to a cimspec.toml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating '{}' specializations in {}", args.scope, args.input.display());

    let config = CliConfig::load(&args.input, args.config.as_deref())?;
    let outcome = load_and_build(&args.input, &args.scope, &config.build_options())
        .with_context(|| format!("Failed to load definitions from {}", args.input.display()))?;

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
    for line in definitions_report(config.namespace(), &args.scope, &outcome.report, timestamp) {
        println!("{}", line);
    }

    if !outcome.is_valid() {
        anyhow::bail!(
            "Validation failed: {} error(s) in '{}' specializations",
            outcome.report.error_count(),
            args.scope
        );
    }

    validate_short_tables(&args.input, &args.scope)
}

/// Check `short_tables/*.json` beside the definitions, if any.
fn validate_short_tables(input: &Path, scope: &str) -> Result<()> {
    let paths = DefinitionReader::short_table_paths(input)?;
    if paths.is_empty() {
        return Ok(());
    }

    let results: Vec<(String, Vec<String>)> = paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            (name, ShortTableValidator::validate_file(path))
        })
        .collect();

    for line in short_tables_report(scope, &results) {
        println!("{}", line);
    }

    let invalid = results.iter().filter(|(_, errors)| !errors.is_empty()).count();
    if invalid > 0 {
        anyhow::bail!("Short table validation failed: {} invalid file(s)", invalid);
    }
    Ok(())
}
