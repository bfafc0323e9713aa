//! cimspec CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Generator error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod report;

use cimspec_core::CoreError;
use cimspec_generators::GeneratorError;
use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const GENERATOR_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let directives = if cli.verbose {
        "cimspec=debug,warn"
    } else if cli.quiet {
        "error"
    } else {
        "cimspec=info,warn"
    };
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives)))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<GeneratorError>() {
            return match err {
                GeneratorError::UnknownKind(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERATOR_ERROR,
            };
        }
        if let Some(CoreError::Invalid { .. }) = cause.downcast_ref::<CoreError>() {
            return ExitCodes::VALIDATION_FAILURE;
        }
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("validation") {
        ExitCodes::VALIDATION_FAILURE
    } else if msg.contains("argument") || msg.contains("option") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_error() {
        let validation = anyhow::anyhow!("Validation failed: 3 error(s)");
        assert_eq!(categorize_error(&validation), ExitCodes::VALIDATION_FAILURE);

        let unknown = anyhow::Error::new(GeneratorError::UnknownKind("pdf".to_string()))
            .context("Invalid --type argument: pdf");
        assert_eq!(categorize_error(&unknown), ExitCodes::INVALID_ARGS);

        let generator = anyhow::Error::new(GeneratorError::Incomplete).context("Generator failed");
        assert_eq!(categorize_error(&generator), ExitCodes::GENERATOR_ERROR);

        let missing = anyhow::anyhow!("Config file not found: x.toml");
        assert_eq!(categorize_error(&missing), ExitCodes::INVALID_ARGS);

        let io = anyhow::anyhow!("disk full");
        assert_eq!(categorize_error(&io), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "cimspec", "generate", "--input", "defs", "--realm", "ocean", "--type", "mm", "-o", "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.scope, "ocean");
                assert_eq!(args.kind, "mm");
                assert_eq!(args.output_dir.unwrap().to_string_lossy(), "out");
            }
            _ => panic!("expected generate"),
        }
        assert!(Cli::try_parse_from(["cimspec", "validate", "--input", "defs"]).is_err());
    }
}
