//! Generate command - Encode a valid specialization.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use tracing::info;

use cimspec_core::load_and_build;
use cimspec_generators::{write_outputs, GeneratorKind};

use crate::config::CliConfig;
use crate::report::definitions_report;

#[derive(Args)]
pub struct GenerateArgs {
    /// Directory holding the definition files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Specialization scope (realm name), e.g. ocean
    #[arg(short, long, alias = "realm")]
    pub scope: String,

    /// Generator to run (json, mm, ids, ids-level-1, ids-level-2, ids-level-3) or all
    #[arg(short = 't', long = "type", default_value = "all")]
    pub kind: String,

    /// Output directory (defaults to the input directory)
    #[arg(short, long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Path to a cimspec.toml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = CliConfig::load(&args.input, args.config.as_deref())?;
    let kinds = if args.kind == "all" {
        config.default_generators()
    } else {
        vec![args
            .kind
            .parse::<GeneratorKind>()
            .with_context(|| format!("Invalid --type argument: {}", args.kind))?]
    };

    info!("Building '{}' specializations from {}", args.scope, args.input.display());
    let outcome = load_and_build(&args.input, &args.scope, &config.build_options())
        .with_context(|| format!("Failed to load definitions from {}", args.input.display()))?;

    if !outcome.is_valid() {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
        for line in definitions_report(config.namespace(), &args.scope, &outcome.report, timestamp) {
            println!("{}", line);
        }
        anyhow::bail!(
            "Validation failed: {} error(s), nothing generated",
            outcome.report.error_count()
        );
    }
    let (tree, _) = outcome.into_tree()?;

    let output_dir = args
        .output_dir
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| args.input.clone());

    println!("⚙️  Generating {} output(s) for '{}'...", kinds.len(), args.scope);
    let written = write_outputs(&tree, &kinds, &config.generator_options(), &output_dir)
        .context("Generator failed")?;

    for path in &written {
        println!("   📄 {}", path.display());
    }
    println!();
    println!("✅ Generated {} file(s) in {}", written.len(), output_dir.display());
    Ok(())
}
