//! Comparison of simulated batches against the diffusion approximation.

use crate::analysis::diffusion::DiffusionModel;
use crate::analysis::utils::{binomial_standard_error, median};
use crate::analysis::AnalysisError;
use cannings_sim::simulation::{CanningsModel, TrialRecord, TrialStatistics};
use serde::{Deserialize, Serialize};

/// Simulated versus predicted fixation probability and absorption time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Completed trials the observed values are based on
    pub completed_trials: usize,
    pub expected_fixation_probability: f64,
    pub observed_fixation_probability: f64,
    /// Binomial standard error under the expected probability
    pub standard_error: f64,
    /// `(observed - expected) / standard_error`
    pub z_score: f64,
    /// Predicted mean absorption time (neutral models only)
    pub expected_absorption_time: Option<f64>,
    pub observed_absorption_time: f64,
    pub median_absorption_time: f64,
}

impl ValidationReport {
    /// True if the observed fixation probability is within `max_z` standard errors.
    pub fn is_consistent(&self, max_z: f64) -> bool {
        self.z_score.abs() <= max_z
    }

    /// `(observed - expected) / expected` for the mean absorption time.
    pub fn relative_time_error(&self) -> Option<f64> {
        self.expected_absorption_time
            .filter(|&t| t > 0.0)
            .map(|t| (self.observed_absorption_time - t) / t)
    }
}

/// Compare a batch run from `initial_type_a` type-A individuals with the
/// diffusion limit of `model`.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidInput`] if the model has no diffusion limit and
/// [`AnalysisError::InsufficientData`] if no trial completed.
pub fn compare(
    model: &CanningsModel,
    initial_type_a: usize,
    stats: &TrialStatistics,
) -> Result<ValidationReport, AnalysisError> {
    let diffusion = DiffusionModel::from_model(model)?;
    let completed = stats.completed();
    let observed = stats.fixation_probability().ok_or_else(|| {
        AnalysisError::InsufficientData(format!(
            "none of {} trials reached fixation or extinction",
            stats.len()
        ))
    })?;

    let expected = diffusion.fixation_probability(initial_type_a);
    let standard_error = binomial_standard_error(expected, completed);
    let z_score = if standard_error > 0.0 {
        (observed - expected) / standard_error
    } else if observed == expected {
        0.0
    } else {
        f64::INFINITY
    };

    let mut times: Vec<f64> = stats
        .records()
        .iter()
        .filter_map(TrialRecord::absorption_time)
        .map(|t| t as f64)
        .collect();

    Ok(ValidationReport {
        completed_trials: completed,
        expected_fixation_probability: expected,
        observed_fixation_probability: observed,
        standard_error,
        z_score,
        expected_absorption_time: diffusion.absorption_time(initial_type_a),
        observed_absorption_time: stats.mean_absorption_time().unwrap_or(0.0),
        median_absorption_time: median(&mut times),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cannings_sim::evolution::Selection;
    use cannings_sim::simulation::{ExecutionConfig, TrialRunner};

    #[test]
    fn test_neutral_poisson_batch_is_consistent() {
        let model = CanningsModel::poisson(20, 2.0, Selection::neutral()).unwrap();
        let stats = TrialRunner::new(model.clone(), ExecutionConfig::new(2000, 5, 100_000).with_seed(8))
            .unwrap()
            .run();
        let report = compare(&model, 5, &stats).unwrap();

        assert_eq!(report.completed_trials, 2000);
        assert!((report.expected_fixation_probability - 0.25).abs() < 1e-12);
        assert!(report.is_consistent(4.0), "z = {}", report.z_score);
        // The diffusion time is only approximate at N = 20.
        assert!(report.relative_time_error().unwrap().abs() < 0.3);
        assert!(report.median_absorption_time > 0.0);
    }

    #[test]
    fn test_heavy_tail_has_no_reference() {
        let model = CanningsModel::schweinsberg(20, 1.5, 0.1, Selection::neutral()).unwrap();
        let stats = TrialStatistics::from_records(vec![TrialRecord::Fixed { generations: 3 }]);
        assert!(matches!(
            compare(&model, 5, &stats),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_completed_trials() {
        let model = CanningsModel::poisson(20, 2.0, Selection::neutral()).unwrap();
        let stats = TrialStatistics::from_records(vec![TrialRecord::Censored { max_generations: 1 }]);
        assert!(matches!(
            compare(&model, 5, &stats),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_report_arithmetic() {
        let model = CanningsModel::poisson(10, 2.0, Selection::neutral()).unwrap();
        let stats = TrialStatistics::from_records(vec![
            TrialRecord::Fixed { generations: 10 },
            TrialRecord::Extinct { generations: 2 },
            TrialRecord::Extinct { generations: 4 },
            TrialRecord::Fixed { generations: 8 },
        ]);
        let report = compare(&model, 5, &stats).unwrap();
        assert_eq!(report.observed_fixation_probability, 0.5);
        assert_eq!(report.z_score, 0.0);
        assert!((report.standard_error - 0.25).abs() < 1e-12);
        assert_eq!(report.observed_absorption_time, 6.0);
        assert_eq!(report.median_absorption_time, 6.0);
    }
}
