//! atlas-embed - Atlas-to-E8 embedding pipeline.
//!
//! Searches for a structure-preserving embedding of the 96-vertex Atlas
//! graph into the E8 root system, certifies the result, and verifies the
//! certificate through the independent verifier crate.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

/// atlas-embed - Atlas-to-E8 embedding pipeline
#[derive(Parser, Debug)]
#[command(name = "atlas-embed")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline: self-test, search, canonicalize, certify,
    /// verify, emit
    Pipeline(commands::pipeline::PipelineArgs),

    /// Verify an existing certificate file
    Verify(commands::verify::VerifyArgs),

    /// Run the builders' structural self-tests only
    Selftest,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = match cli.command {
        Commands::Pipeline(args) => commands::pipeline::run(&args),
        Commands::Verify(args) => commands::verify::run(&args),
        Commands::Selftest => commands::selftest::run(),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
