//! Builder pattern for creating trial batches.
//!
//! Provides a fluent API for configuring a model and its execution settings with
//! sensible defaults and validation at `build` time.

use crate::errors::SimulationError;
use crate::evolution::{Selection, SelectionMode};
use crate::simulation::{
    Configuration, DistributionConfig, ExecutionConfig, ModelConfig, TrialRunner,
};

/// Builder for constructing [`TrialRunner`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use cannings_sim::simulation::TrialBuilder;
///
/// // Neutral Poisson model with defaults
/// let runner = TrialBuilder::new()
///     .population_size(10)
///     .poisson(1.0)
///     .initial_type_a(5)
///     .n_trials(20)
///     .seed(42)
///     .build()
///     .unwrap();
/// let stats = runner.run();
/// assert_eq!(stats.len(), 20);
///
/// // Power law with viability selection
/// let runner = TrialBuilder::new()
///     .population_size(50)
///     .power_law(0.1, 1.5)
///     .viability(1.05)
///     .initial_type_a(1)
///     .max_generations(10_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TrialBuilder {
    // Required parameters
    population_size: Option<usize>,
    distribution: Option<DistributionConfig>,

    // Selection (default: neutral)
    selection_mode: SelectionMode,
    selection_strength: f64,

    // Execution (with defaults)
    n_trials: usize,                // Default: 1
    initial_type_a: Option<usize>,  // Default: 1
    max_generations: u64,           // Default: 1_000_000
    seed: Option<u64>,              // Default: None (random)
    parallel: bool,                 // Default: true
}

impl Default for TrialBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrialBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            population_size: None,
            distribution: None,
            selection_mode: SelectionMode::None,
            selection_strength: 1.0,
            n_trials: 1,
            initial_type_a: None,
            max_generations: 1_000_000,
            seed: None,
            parallel: true,
        }
    }

    /// Set the population size (required).
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Use an explicit distribution configuration.
    pub fn distribution(mut self, distribution: DistributionConfig) -> Self {
        self.distribution = Some(distribution);
        self
    }

    /// Power-law offspring numbers (Schweinsberg model).
    pub fn power_law(self, p0: f64, alpha: f64) -> Self {
        self.distribution(DistributionConfig::PowerLaw { p0, alpha })
    }

    /// Power-law offspring numbers given by the Beta(beta, 2 - beta) coalescent.
    pub fn beta_coalescent(self, p0: f64, beta: f64) -> Self {
        self.distribution(DistributionConfig::BetaCoalescent { p0, beta })
    }

    /// Poisson offspring numbers.
    pub fn poisson(self, lambda: f64) -> Self {
        self.distribution(DistributionConfig::Poisson { lambda })
    }

    /// Set the selection mode and strength.
    pub fn selection(mut self, mode: SelectionMode, strength: f64) -> Self {
        self.selection_mode = mode;
        self.selection_strength = strength;
        self
    }

    /// Fecundity selection with the given strength.
    pub fn fecundity(self, strength: f64) -> Self {
        self.selection(SelectionMode::Fecundity, strength)
    }

    /// Viability selection with the given strength.
    pub fn viability(self, strength: f64) -> Self {
        self.selection(SelectionMode::Viability, strength)
    }

    /// Number of independent trials (default: 1).
    pub fn n_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = n_trials;
        self
    }

    /// Type-A individuals at generation 0 (default: 1).
    pub fn initial_type_a(mut self, type_a: usize) -> Self {
        self.initial_type_a = Some(type_a);
        self
    }

    /// Generation cap per trial (default: 1 000 000).
    pub fn max_generations(mut self, max_generations: u64) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Set the master seed for reproducibility.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run trials on the rayon pool (default) or sequentially.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the configuration without creating a runner.
    ///
    /// # Errors
    /// Returns [`SimulationError::MissingRequired`] if the population size or the
    /// distribution is missing, and [`SimulationError::InvalidParameter`] for
    /// out-of-range values.
    pub fn build_config(&self) -> Result<Configuration, SimulationError> {
        let population_size = self
            .population_size
            .ok_or(SimulationError::MissingRequired("population_size"))?;
        let distribution = self
            .distribution
            .ok_or(SimulationError::MissingRequired("distribution"))?;
        let selection = Selection::new(self.selection_mode, self.selection_strength)?;

        let execution = ExecutionConfig {
            n_trials: self.n_trials,
            initial_type_a: self.initial_type_a.unwrap_or(1),
            max_generations: self.max_generations,
            seed: self.seed,
        };
        let config = Configuration::new(
            ModelConfig::new(population_size, distribution, selection),
            execution,
        );
        config.validate()?;
        Ok(config)
    }

    /// Build the trial runner.
    ///
    /// # Errors
    /// See [`Self::build_config`].
    pub fn build(self) -> Result<TrialRunner, SimulationError> {
        let config = self.build_config()?;
        Ok(TrialRunner::new(config.model.build()?, config.execution)?
            .with_parallelism(self.parallel))
    }
}

impl From<&Configuration> for TrialBuilder {
    fn from(config: &Configuration) -> Self {
        let mut builder = Self::new()
            .population_size(config.model.population_size)
            .distribution(config.model.distribution)
            .selection(
                config.model.selection.mode(),
                config.model.selection.strength(),
            )
            .n_trials(config.execution.n_trials)
            .initial_type_a(config.execution.initial_type_a)
            .max_generations(config.execution.max_generations);
        builder.seed = config.execution.seed;
        builder
    }
}
