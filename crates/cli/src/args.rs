use crate::defaults;
use anyhow::Result;
use cannings_sim::evolution::{Selection, SelectionMode};
use cannings_sim::simulation::{Configuration, DistributionConfig, ExecutionConfig, ModelConfig};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Model variant selected on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    /// Power-law offspring numbers with tail exponent alpha
    Schweinsberg,
    /// Power law given by the Beta(beta, 2 - beta) coalescent (alpha = 2 - beta)
    BetaCoalescent,
    /// Poisson offspring numbers with mean lambda
    Poisson,
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Read model and execution settings from a JSON configuration file
    ///
    /// Execution flags given on the command line override the file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Population size
    #[arg(short = 'n', long, default_value_t = defaults::POPULATION_SIZE, conflicts_with = "config")]
    pub population_size: usize,

    /// Model variant
    #[arg(short, long, value_enum, default_value_t = ModelKind::Schweinsberg, conflicts_with = "config")]
    pub model: ModelKind,

    /// Tail exponent of the power law (schweinsberg)
    #[arg(long, default_value_t = defaults::ALPHA, conflicts_with = "config")]
    pub alpha: f64,

    /// First shape parameter of the Beta coalescent, 0 < beta < 1 (beta-coalescent)
    #[arg(long, default_value_t = defaults::BETA, conflicts_with = "config")]
    pub beta: f64,

    /// Probability of having no offspring (schweinsberg, beta-coalescent)
    #[arg(long, default_value_t = defaults::P0, conflicts_with = "config")]
    pub p0: f64,

    /// Mean offspring number (poisson)
    #[arg(long, default_value_t = defaults::LAMBDA, conflicts_with = "config")]
    pub lambda: f64,

    /// Where selection acts (none, fecundity, viability)
    #[arg(long, default_value = "none", conflicts_with = "config")]
    pub selection: SelectionMode,

    /// Relative weight of type A, at least 1 (selection coefficient + 1)
    #[arg(short, long, default_value_t = defaults::SELECTION_STRENGTH, conflicts_with = "config")]
    pub strength: f64,
}

impl ModelArgs {
    pub fn distribution(&self) -> DistributionConfig {
        match self.model {
            ModelKind::Schweinsberg => DistributionConfig::PowerLaw {
                p0: self.p0,
                alpha: self.alpha,
            },
            ModelKind::BetaCoalescent => DistributionConfig::BetaCoalescent {
                p0: self.p0,
                beta: self.beta,
            },
            ModelKind::Poisson => DistributionConfig::Poisson {
                lambda: self.lambda,
            },
        }
    }

    pub fn model_config(&self) -> Result<ModelConfig> {
        let selection = Selection::new(self.selection, self.strength)?;
        Ok(ModelConfig::new(
            self.population_size,
            self.distribution(),
            selection,
        ))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExecutionArgs {
    /// Number of independent trials [default: 1000]
    #[arg(short = 'r', long)]
    pub trials: Option<usize>,

    /// Number of type-A individuals at generation 0 [default: 1]
    #[arg(short, long)]
    pub initial: Option<usize>,

    /// Give up on a trial after this many generations [default: 1000000]
    #[arg(short = 'g', long)]
    pub max_generations: Option<u64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run trials on the calling thread only
    #[arg(long)]
    pub sequential: bool,
}

impl ExecutionArgs {
    /// Apply the flags on top of `base`, or on top of the defaults.
    pub fn execution_config(&self, base: Option<ExecutionConfig>) -> ExecutionConfig {
        let base = base.unwrap_or(ExecutionConfig::new(
            defaults::N_TRIALS,
            defaults::INITIAL_TYPE_A,
            defaults::MAX_GENERATIONS,
        ));
        ExecutionConfig {
            n_trials: self.trials.unwrap_or(base.n_trials),
            initial_type_a: self.initial.unwrap_or(base.initial_type_a),
            max_generations: self.max_generations.unwrap_or(base.max_generations),
            seed: self.seed.or(base.seed),
        }
    }
}

/// Resolve the full configuration from a file and/or flags.
pub fn resolve_configuration(model: &ModelArgs, execution: &ExecutionArgs) -> Result<Configuration> {
    let config = match &model.config {
        Some(path) => {
            let file = Configuration::from_json_file(path)?;
            Configuration::new(file.model, execution.execution_config(Some(file.execution)))
        }
        None => Configuration::new(model.model_config()?, execution.execution_config(None)),
    };
    config.validate()?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub execution: ExecutionArgs,

    /// Append the signed fixation times to this JSON data file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the resolved configuration to this JSON file
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Refuse models whose mean offspring number is at most 1
    #[arg(long)]
    pub require_supercritical: bool,

    /// Print the summary as JSON instead of a report
    #[arg(long)]
    pub json: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Fixation data file
    pub file: PathBuf,

    /// Show the stored times of one dataset (requires --selection-coefficient)
    #[arg(long, requires = "selection_coefficient")]
    pub parameter: Option<f64>,

    /// Selection coefficient of the dataset to show (requires --parameter)
    #[arg(long, requires = "parameter")]
    pub selection_coefficient: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub execution: ExecutionArgs,

    /// Largest accepted |z| between simulated and predicted fixation probability
    #[arg(long, default_value_t = defaults::MAX_Z_SCORE)]
    pub max_z: f64,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
