//! CLI command definitions.
//!
//! Each subcommand has its own module holding its arguments and `execute`.

use clap::{Parser, Subcommand};

pub mod generate;
pub mod validate;

/// cimspec - CMIP6 specialization toolkit
#[derive(Parser)]
#[command(name = "cimspec")]
#[command(version, about = "cimspec - validate and encode CMIP6 specializations")]
#[command(long_about = r#"
cimspec validates CMIP6 specialization definitions and encodes them into
downstream formats.

COMMANDS:
  validate  → Check a definition set and report every error
  generate  → Build the specialization and write JSON, mindmap or id listings

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Generator error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a specialization definition set
    Validate(validate::ValidateArgs),

    /// Generate outputs from a valid specialization
    Generate(generate::GenerateArgs),
}
