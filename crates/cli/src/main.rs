mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{InspectArgs, RunArgs, ValidateArgs};
use commands::{inspect, run, validate};

/// Cannings: fixation of a selected allele in Cannings models
///
/// This tool estimates how often, and how fast, an allele takes over a population
/// whose offspring numbers follow a power law (Schweinsberg model) or a Poisson law,
/// with optional fecundity or viability selection.
#[derive(Parser, Debug)]
#[command(name = "cannings")]
#[command(author, version, about = "Simulates fixation times in Cannings models", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a batch of fixation trials.
    ///
    /// Prints the fixation probability and absorption times, and optionally
    /// appends the signed times to a JSON data file.
    Run(Box<RunArgs>),

    /// Show the datasets stored in a fixation data file.
    Inspect(InspectArgs),

    /// Compare a batch with the diffusion approximation.
    ///
    /// Fails if the simulated fixation probability is too far from Kimura's formula.
    Validate(Box<ValidateArgs>),
}

fn main() -> Result<()> {
    // Logs go to stderr so that --json output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Run(args) => {
            run::run_trials(&args)?;
        }
        Commands::Inspect(args) => {
            inspect::show_data(&args)?;
        }
        Commands::Validate(args) => {
            validate::validate_model(&args)?;
        }
    }

    Ok(())
}
