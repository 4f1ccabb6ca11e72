//! Run configuration.
//!
//! A [`Configuration`] is split into the model (what is simulated) and the
//! execution settings (how many trials, from where, for how long). Both halves are
//! plain serde structs so a batch can be described in a JSON file:
//!
//! ```json
//! {
//!   "model": {
//!     "population_size": 100,
//!     "distribution": { "family": "power_law", "p0": 0.1, "alpha": 1.5 },
//!     "selection": { "mode": "viability", "strength": 1.05 }
//!   },
//!   "execution": {
//!     "n_trials": 1000,
//!     "initial_type_a": 1,
//!     "max_generations": 100000,
//!     "seed": 42
//!   }
//! }
//! ```

use crate::errors::{ConfigError, SimulationError};
use crate::evolution::Selection;
use crate::simulation::CanningsModel;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Offspring-number distribution of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistributionConfig {
    /// Schweinsberg power law with tail exponent `alpha`.
    PowerLaw { p0: f64, alpha: f64 },
    /// Power law parameterised by its Beta(beta, 2 - beta) coalescent limit.
    BetaCoalescent { p0: f64, beta: f64 },
    /// Poisson with mean `lambda`.
    Poisson { lambda: f64 },
}

impl DistributionConfig {
    /// Short name of the model variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PowerLaw { .. } => "schweinsberg",
            Self::BetaCoalescent { .. } => "beta_coalescent",
            Self::Poisson { .. } => "poisson",
        }
    }

    /// Zero-offspring probability, if the family has one.
    pub fn p0(&self) -> Option<f64> {
        match self {
            Self::PowerLaw { p0, .. } | Self::BetaCoalescent { p0, .. } => Some(*p0),
            Self::Poisson { .. } => None,
        }
    }

    /// The shape parameter the family is indexed by (`alpha`, `beta` or `lambda`).
    pub fn shape(&self) -> f64 {
        match self {
            Self::PowerLaw { alpha, .. } => *alpha,
            Self::BetaCoalescent { beta, .. } => *beta,
            Self::Poisson { lambda } => *lambda,
        }
    }

    /// Same family and `p0`, different shape parameter.
    pub fn with_shape(&self, shape: f64) -> Self {
        match *self {
            Self::PowerLaw { p0, .. } => Self::PowerLaw { p0, alpha: shape },
            Self::BetaCoalescent { p0, .. } => Self::BetaCoalescent { p0, beta: shape },
            Self::Poisson { .. } => Self::Poisson { lambda: shape },
        }
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self::Poisson { lambda: 1.0 }
    }
}

/// Everything that defines a Cannings model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of individuals
    pub population_size: usize,
    /// Offspring-number distribution
    pub distribution: DistributionConfig,
    /// Selection regime (neutral if omitted)
    #[serde(default)]
    pub selection: Selection,
}

impl ModelConfig {
    pub fn new(
        population_size: usize,
        distribution: DistributionConfig,
        selection: Selection,
    ) -> Self {
        Self {
            population_size,
            distribution,
            selection,
        }
    }

    /// Build the model described by this configuration.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] for out-of-range values.
    pub fn build(&self) -> Result<CanningsModel, SimulationError> {
        // Deserialized selections skip the constructor checks.
        let selection = Selection::new(self.selection.mode(), self.selection.strength())?;
        match self.distribution {
            DistributionConfig::PowerLaw { p0, alpha } => {
                CanningsModel::schweinsberg(self.population_size, alpha, p0, selection)
            }
            DistributionConfig::BetaCoalescent { p0, beta } => {
                CanningsModel::beta_coalescent(self.population_size, beta, p0, selection)
            }
            DistributionConfig::Poisson { lambda } => {
                CanningsModel::poisson(self.population_size, lambda, selection)
            }
        }
    }
}

/// How a batch of trials is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of independent trials
    pub n_trials: usize,
    /// Type-A individuals at generation 0
    pub initial_type_a: usize,
    /// Generation cap per trial
    pub max_generations: u64,
    /// Master seed (random if omitted)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ExecutionConfig {
    pub fn new(n_trials: usize, initial_type_a: usize, max_generations: u64) -> Self {
        Self {
            n_trials,
            initial_type_a,
            max_generations,
            seed: None,
        }
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the settings against a population size.
    pub fn validate(&self, population_size: usize) -> Result<(), SimulationError> {
        if self.n_trials == 0 {
            return Err(SimulationError::invalid("number of trials must be positive"));
        }
        if self.max_generations == 0 {
            return Err(SimulationError::invalid("max generations must be positive"));
        }
        if self.initial_type_a > population_size {
            return Err(SimulationError::invalid(format!(
                "initial type-A count {} exceeds population size {population_size}",
                self.initial_type_a
            )));
        }
        Ok(())
    }
}

/// A complete batch description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub model: ModelConfig,
    pub execution: ExecutionConfig,
}

impl Configuration {
    pub fn new(model: ModelConfig, execution: ExecutionConfig) -> Self {
        Self { model, execution }
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter without running anything.
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.model.build()?;
        self.execution.validate(self.model.population_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::SelectionMode;

    const EXAMPLE: &str = r#"{
        "model": {
            "population_size": 100,
            "distribution": { "family": "power_law", "p0": 0.1, "alpha": 1.5 },
            "selection": { "mode": "viability", "strength": 1.05 }
        },
        "execution": {
            "n_trials": 1000,
            "initial_type_a": 1,
            "max_generations": 100000,
            "seed": 42
        }
    }"#;

    #[test]
    fn test_parse_example() {
        let config = Configuration::from_json_str(EXAMPLE).unwrap();
        assert_eq!(config.model.population_size, 100);
        assert_eq!(
            config.model.distribution,
            DistributionConfig::PowerLaw { p0: 0.1, alpha: 1.5 }
        );
        assert_eq!(config.model.selection.mode(), SelectionMode::Viability);
        assert_eq!(config.execution.seed, Some(42));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let json = r#"{
            "model": { "population_size": 10, "distribution": { "family": "poisson", "lambda": 1.0 } },
            "execution": { "n_trials": 5, "initial_type_a": 5, "max_generations": 500 }
        }"#;
        let config = Configuration::from_json_str(json).unwrap();
        assert!(config.model.selection.is_neutral());
        assert_eq!(config.execution.seed, None);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = Configuration::from_json_str(EXAMPLE).unwrap();
        let back = Configuration::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_validation_errors() {
        let bad_strength = EXAMPLE.replace("1.05", "0.5");
        assert!(matches!(
            Configuration::from_json_str(&bad_strength),
            Err(ConfigError::Invalid(_))
        ));

        let bad_initial = EXAMPLE.replace("\"initial_type_a\": 1", "\"initial_type_a\": 101");
        assert!(Configuration::from_json_str(&bad_initial).is_err());

        let bad_p0 = EXAMPLE.replace("\"p0\": 0.1", "\"p0\": 1.0");
        assert!(Configuration::from_json_str(&bad_p0).is_err());

        assert!(matches!(
            Configuration::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_beta_coalescent_family() {
        let json = EXAMPLE.replace(
            r#"{ "family": "power_law", "p0": 0.1, "alpha": 1.5 }"#,
            r#"{ "family": "beta_coalescent", "p0": 0.1, "beta": 0.5 }"#,
        );
        let config = Configuration::from_json_str(&json).unwrap();
        assert_eq!(config.model.distribution.name(), "beta_coalescent");
        assert_eq!(config.model.distribution.shape(), 0.5);
        assert_eq!(config.model.distribution.p0(), Some(0.1));
    }

    #[test]
    fn test_with_shape() {
        let dist = DistributionConfig::PowerLaw { p0: 0.2, alpha: 1.5 };
        assert_eq!(
            dist.with_shape(1.8),
            DistributionConfig::PowerLaw { p0: 0.2, alpha: 1.8 }
        );
        assert_eq!(DistributionConfig::default().p0(), None);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Configuration::from_json_file("/nonexistent/config.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
