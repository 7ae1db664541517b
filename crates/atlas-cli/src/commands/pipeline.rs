//! The full embedding pipeline.
//!
//! Self-tests the builders, searches for embeddings, canonicalizes when more
//! than one solution was requested and found, generates the certificate,
//! verifies it through the independent verifier, and emits it to disk.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use atlas_core::{
    CertificateGenerator, GenerateOptions, SearchConfig, SearchEngine, Symmetries,
};
use clap::Args;
use tracing::info;

use super::{selftest, EXIT_NO_EMBEDDING, EXIT_VERIFICATION_FAILED};

/// Arguments for the `pipeline` subcommand.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Output certificate path
    #[arg(short, long, default_value = "atlas_certificate.json")]
    pub output: PathBuf,

    /// Maximum number of solutions to search for
    #[arg(long, default_value_t = 1)]
    pub max_solutions: usize,

    /// Required sign-class count, checked when each candidate completes
    #[arg(long, default_value_t = 48)]
    pub target_signs: usize,

    /// Pre-pinned assignment, repeatable
    #[arg(long = "pin", value_name = "VERTEX=ROOT")]
    pub pins: Vec<String>,

    /// Unity vertices whose images must sum to zero
    /// (default: vertex 0 and its mirror)
    #[arg(long, value_delimiter = ',', value_name = "VERTICES")]
    pub unity: Option<Vec<usize>>,

    /// Timestamp string to embed in the certificate
    #[arg(long)]
    pub timestamp: Option<String>,
}

/// Runs the pipeline end to end.
pub fn run(args: &PipelineArgs) -> Result<ExitCode> {
    info!("running builder self-tests");
    let (atlas, roots) = selftest::build_graphs()?;

    let pins = parse_pins(&args.pins)?;
    let unity = args
        .unity
        .clone()
        .unwrap_or_else(|| vec![0, atlas.tau(0)]);
    let config = SearchConfig {
        unity_indices: unity.clone(),
        target_sign_classes: Some(args.target_signs),
        pins,
        max_solutions: args.max_solutions,
    };

    info!(max_solutions = config.max_solutions, "searching");
    let solutions = SearchEngine::new(&atlas, &roots).run(&config)?;
    if solutions.is_empty() {
        eprintln!("no embedding found");
        return Ok(ExitCode::from(EXIT_NO_EMBEDDING));
    }

    let symmetries = Symmetries::new(&atlas, &roots);
    let chosen = symmetries
        .canonical_choice(&solutions)
        .context("canonical selection over a non-empty solution set")?;
    let canonical_key = symmetries.orbit_key(chosen);

    let certificate = CertificateGenerator::new(&atlas, &roots).generate(
        chosen,
        &unity,
        GenerateOptions {
            canonical_key: Some(canonical_key),
            timestamp: args.timestamp.clone(),
            metadata: None,
        },
    )?;

    let json = certificate.to_canonical_json()?;
    match atlas_verifier::verify_str(&json) {
        Ok(summary) => {
            certificate.write_to_file(&args.output)?;
            println!("embedding found and verified");
            println!("  solutions found:    {}", solutions.len());
            println!("  sign classes used:  {}", summary.sign_classes);
            println!("  integer roots:      {}", summary.integer_roots);
            println!("  half-integer roots: {}", summary.half_integer_roots);
            println!("  certificate:        {}", args.output.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!(
                "embedding found but failed verification ({}): {error}",
                error.category()
            );
            Ok(ExitCode::from(EXIT_VERIFICATION_FAILED))
        }
    }
}

/// Parses repeatable `VERTEX=ROOT` pin arguments.
fn parse_pins(raw: &[String]) -> Result<Vec<(usize, usize)>> {
    let mut pins = Vec::with_capacity(raw.len());
    for text in raw {
        let Some((vertex, root)) = text.split_once('=') else {
            bail!("pin {text:?} is not of the form VERTEX=ROOT");
        };
        let vertex: usize = vertex
            .trim()
            .parse()
            .with_context(|| format!("pin vertex in {text:?} is not an integer"))?;
        let root: usize = root
            .trim()
            .parse()
            .with_context(|| format!("pin root in {text:?} is not an integer"))?;
        pins.push((vertex, root));
    }
    Ok(pins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_pins() {
        let pins = parse_pins(&["0=0".to_string(), " 7 = 12 ".to_string()]).unwrap();
        assert_eq!(pins, vec![(0, 0), (7, 12)]);
    }

    #[test]
    fn rejects_malformed_pins() {
        assert!(parse_pins(&["0".to_string()]).is_err());
        assert!(parse_pins(&["a=0".to_string()]).is_err());
        assert!(parse_pins(&["0=b".to_string()]).is_err());
    }
}
