//! Record types persisted by the fixation data store.

use crate::evolution::SelectionMode;
use crate::simulation::ModelConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings shared by every dataset of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Model variant (`schweinsberg`, `beta_coalescent` or `poisson`)
    pub model: String,
    pub population_size: usize,
    /// Zero-offspring probability (`null` for Poisson)
    pub p0: Option<f64>,
    /// Selection mode of every dataset in the file
    pub selection: SelectionMode,
}

impl Hyperparameters {
    pub fn new(
        model: impl Into<String>,
        population_size: usize,
        p0: Option<f64>,
        selection: SelectionMode,
    ) -> Self {
        Self {
            model: model.into(),
            population_size,
            p0,
            selection,
        }
    }
}

impl From<&ModelConfig> for Hyperparameters {
    fn from(config: &ModelConfig) -> Self {
        Self::new(
            config.distribution.name(),
            config.population_size,
            config.distribution.p0(),
            config.selection.mode(),
        )
    }
}

impl fmt::Display for Hyperparameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{model: {}, population_size: {}, p0: ",
            self.model, self.population_size
        )?;
        match self.p0 {
            Some(p0) => write!(f, "{p0}")?,
            None => write!(f, "none")?,
        }
        write!(f, ", selection: {}}}", self.selection)
    }
}

/// Signed absorption times for one `(parameter, selection coefficient)` pair.
///
/// A positive time is a fixation, a negative time an extinction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixationSet {
    /// Shape parameter of the distribution (`alpha`, `beta` or `lambda`)
    #[serde(alias = "alpha")]
    pub parameter: f64,
    /// Selection coefficient `s = strength - 1`
    pub selection_coefficient: f64,
    /// Signed absorption times
    pub fixation: Vec<i64>,
}

impl FixationSet {
    pub fn new(parameter: f64, selection_coefficient: f64) -> Self {
        Self {
            parameter,
            selection_coefficient,
            fixation: Vec::new(),
        }
    }

    pub fn matches(&self, parameter: f64, selection_coefficient: f64) -> bool {
        self.parameter == parameter && self.selection_coefficient == selection_coefficient
    }

    /// Number of stored trials.
    pub fn nb_iterations(&self) -> usize {
        self.fixation.len()
    }

    /// Times of the trials that ended in fixation.
    pub fn fixation_times(&self) -> Vec<u64> {
        self.fixation
            .iter()
            .filter(|&&t| t > 0)
            .map(|&t| t.unsigned_abs())
            .collect()
    }

    pub fn nb_fixations(&self) -> usize {
        self.fixation.iter().filter(|&&t| t > 0).count()
    }

    /// Fraction of stored trials that ended in fixation.
    pub fn probability_fixation(&self) -> Option<f64> {
        let n = self.nb_iterations();
        (n > 0).then(|| self.nb_fixations() as f64 / n as f64)
    }

    /// Mean fixation time, conditional on fixation.
    pub fn avg_fixation_time(&self) -> Option<f64> {
        let times = self.fixation_times();
        (!times.is_empty()).then(|| times.iter().sum::<u64>() as f64 / times.len() as f64)
    }
}

impl fmt::Display for FixationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "parameter: {} | selection coefficient: {}",
            self.parameter, self.selection_coefficient
        )?;
        write!(f, "{:?}", self.fixation)
    }
}

/// A table indexed by selection coefficient (rows) and shape parameter (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid<T> {
    pub parameters: Vec<f64>,
    pub selection_coefficients: Vec<f64>,
    /// `cells[row][column]`, `None` where no dataset exists
    pub cells: Vec<Vec<Option<T>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> FixationSet {
        FixationSet {
            parameter: 1.1,
            selection_coefficient: 1.0,
            fixation: vec![-1, 10, -2, -1, 5, -3, 13, -1, -4, -2],
        }
    }

    #[test]
    fn test_fixation_set_statistics() {
        let set = sample_set();
        assert_eq!(set.nb_iterations(), 10);
        assert_eq!(set.fixation_times(), vec![10, 5, 13]);
        assert_eq!(set.nb_fixations(), 3);
        assert!((set.probability_fixation().unwrap() - 0.3).abs() < 1e-12);
        assert!((set.avg_fixation_time().unwrap() - 28.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_fixation_set() {
        let set = FixationSet::new(1.5, 0.1);
        assert_eq!(set.probability_fixation(), None);
        assert_eq!(set.avg_fixation_time(), None);
        assert!(set.matches(1.5, 0.1));
        assert!(!set.matches(1.5, 0.2));
    }

    #[test]
    fn test_alpha_alias_is_accepted() {
        let json = r#"{"alpha": 1.5, "selection_coefficient": 0.1, "fixation": [3, -2]}"#;
        let set: FixationSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.parameter, 1.5);
        assert_eq!(set.fixation, vec![3, -2]);
    }

    #[test]
    fn test_hyperparameters_display() {
        let hyper = Hyperparameters::new("schweinsberg", 100, Some(0.1), SelectionMode::Fecundity);
        assert_eq!(
            hyper.to_string(),
            "{model: schweinsberg, population_size: 100, p0: 0.1, selection: fecundity}"
        );
    }
}
