//! Standalone certificate verification.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use atlas_verifier::FailureCategory;
use clap::Args;

use super::{EXIT_MALFORMED_CERTIFICATE, EXIT_VERIFICATION_FAILED};

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Certificate file to verify
    pub certificate: PathBuf,
}

/// Verifies an existing certificate file.
pub fn run(args: &VerifyArgs) -> Result<ExitCode> {
    let json = std::fs::read_to_string(&args.certificate)
        .with_context(|| format!("failed to read {}", args.certificate.display()))?;
    let outcome = atlas_verifier::verdict(&json);
    if outcome.passed {
        println!("{}", outcome.reason);
        return Ok(ExitCode::SUCCESS);
    }
    if outcome.category == Some(FailureCategory::Structure) {
        eprintln!("certificate malformed: {}", outcome.reason);
        return Ok(ExitCode::from(EXIT_MALFORMED_CERTIFICATE));
    }
    let category = outcome
        .category
        .map_or_else(|| "unknown".to_string(), |c| c.to_string());
    eprintln!(
        "certificate failed verification ({category}): {}",
        outcome.reason
    );
    Ok(ExitCode::from(EXIT_VERIFICATION_FAILED))
}
