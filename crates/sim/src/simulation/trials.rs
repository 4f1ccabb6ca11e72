//! Repeated independent fixation trials and their statistics.
//!
//! Every trial gets its own Xoshiro256++ stream seeded from a list drawn up front
//! from the master seed. Trials therefore produce the same records whether they run
//! sequentially or on the rayon pool, and records are always kept in trial order.

use crate::errors::SimulationError;
use crate::simulation::{
    Absorption, CanningsModel, ExecutionConfig, FixationDriver, FixationOutcome, ModelConfig,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TrialRecord {
    /// Type A fixed after `generations` generations.
    Fixed { generations: u64 },
    /// Type A went extinct after `generations` generations.
    Extinct { generations: u64 },
    /// Neither type was lost within `max_generations`.
    Censored { max_generations: u64 },
    /// The offspring pool was empty at `generation`.
    Failed { generation: u64 },
}

impl TrialRecord {
    /// Absorption time, if the trial completed.
    pub fn absorption_time(&self) -> Option<u64> {
        match self {
            Self::Fixed { generations } | Self::Extinct { generations } => Some(*generations),
            Self::Censored { .. } | Self::Failed { .. } => None,
        }
    }

    /// `+t` for fixation, `-t` for extinction.
    pub fn signed_time(&self) -> Option<i64> {
        match *self {
            Self::Fixed { generations } => Some(i64::try_from(generations).unwrap_or(i64::MAX)),
            Self::Extinct { generations } => {
                Some(-i64::try_from(generations).unwrap_or(i64::MAX))
            }
            Self::Censored { .. } | Self::Failed { .. } => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.absorption_time().is_some()
    }
}

impl From<&FixationOutcome> for TrialRecord {
    fn from(outcome: &FixationOutcome) -> Self {
        match outcome.result {
            Absorption::Fixed => Self::Fixed {
                generations: outcome.generations,
            },
            Absorption::Extinct => Self::Extinct {
                generations: outcome.generations,
            },
        }
    }
}

/// Aggregate numbers of a batch, ready for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub n_trials: usize,
    pub fixed: usize,
    pub extinct: usize,
    pub censored: usize,
    pub failed: usize,
    pub fixation_probability: Option<f64>,
    pub mean_absorption_time: Option<f64>,
    pub variance_absorption_time: Option<f64>,
    pub mean_fixation_time: Option<f64>,
    pub mean_extinction_time: Option<f64>,
}

/// Ordered collection of trial records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStatistics {
    records: Vec<TrialRecord>,
}

impl TrialStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<TrialRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn push(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    /// Append the records of `other`.
    pub fn merge(&mut self, other: TrialStatistics) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn count(&self, pred: impl Fn(&TrialRecord) -> bool) -> usize {
        self.records.iter().filter(|r| pred(r)).count()
    }

    pub fn fixed(&self) -> usize {
        self.count(|r| matches!(r, TrialRecord::Fixed { .. }))
    }

    pub fn extinct(&self) -> usize {
        self.count(|r| matches!(r, TrialRecord::Extinct { .. }))
    }

    pub fn censored(&self) -> usize {
        self.count(|r| matches!(r, TrialRecord::Censored { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, TrialRecord::Failed { .. }))
    }

    /// Trials that reached fixation or extinction.
    pub fn completed(&self) -> usize {
        self.count(TrialRecord::is_completed)
    }

    /// Fraction of completed trials in which type A fixed.
    pub fn fixation_probability(&self) -> Option<f64> {
        let completed = self.completed();
        (completed > 0).then(|| self.fixed() as f64 / completed as f64)
    }

    fn times(&self, pred: impl Fn(&TrialRecord) -> bool) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| pred(r))
            .filter_map(TrialRecord::absorption_time)
            .map(|t| t as f64)
            .collect()
    }

    /// Mean absorption time over completed trials.
    pub fn mean_absorption_time(&self) -> Option<f64> {
        mean(&self.times(|_| true))
    }

    /// Sample variance of the absorption time (needs two completed trials).
    pub fn variance_absorption_time(&self) -> Option<f64> {
        let times = self.times(|_| true);
        let m = mean(&times)?;
        if times.len() < 2 {
            return None;
        }
        let ss: f64 = times.iter().map(|t| (t - m).powi(2)).sum();
        Some(ss / (times.len() - 1) as f64)
    }

    /// Mean time to fixation, conditional on fixation.
    pub fn mean_fixation_time(&self) -> Option<f64> {
        mean(&self.times(|r| matches!(r, TrialRecord::Fixed { .. })))
    }

    /// Mean time to extinction, conditional on extinction.
    pub fn mean_extinction_time(&self) -> Option<f64> {
        mean(&self.times(|r| matches!(r, TrialRecord::Extinct { .. })))
    }

    /// Signed absorption times of completed trials, in trial order.
    pub fn signed_times(&self) -> Vec<i64> {
        self.records
            .iter()
            .filter_map(TrialRecord::signed_time)
            .collect()
    }

    pub fn summary(&self) -> TrialSummary {
        TrialSummary {
            n_trials: self.len(),
            fixed: self.fixed(),
            extinct: self.extinct(),
            censored: self.censored(),
            failed: self.failed(),
            fixation_probability: self.fixation_probability(),
            mean_absorption_time: self.mean_absorption_time(),
            variance_absorption_time: self.variance_absorption_time(),
            mean_fixation_time: self.mean_fixation_time(),
            mean_extinction_time: self.mean_extinction_time(),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Runs a batch of independent trials of one model.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    model: CanningsModel,
    execution: ExecutionConfig,
    parallel: bool,
}

impl TrialRunner {
    /// Create a runner; trials run on the rayon pool by default.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if the execution settings do not
    /// fit the model.
    pub fn new(model: CanningsModel, execution: ExecutionConfig) -> Result<Self, SimulationError> {
        execution.validate(model.pop_size())?;
        Ok(Self {
            model,
            execution,
            parallel: true,
        })
    }

    /// Run trials on the rayon pool (`true`) or on the calling thread.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn model(&self) -> &CanningsModel {
        &self.model
    }

    pub fn execution(&self) -> &ExecutionConfig {
        &self.execution
    }

    /// One seed per trial, derived from the master seed (or entropy if unset).
    pub fn trial_seeds(&self) -> Vec<u64> {
        let mut master = match self.execution.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        };
        (0..self.execution.n_trials).map(|_| master.random()).collect()
    }

    /// Run a single trial with its own random stream.
    pub fn run_trial(&self, seed: u64) -> TrialRecord {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut driver = match FixationDriver::new(&self.model, self.execution.initial_type_a) {
            Ok(driver) => driver,
            // Validated in `new`.
            Err(_) => return TrialRecord::Failed { generation: 0 },
        };

        let result = driver.run(self.execution.max_generations, &mut rng);
        match result {
            Ok(outcome) => {
                tracing::debug!(
                    seed,
                    generations = outcome.generations,
                    result = ?outcome.result,
                    "trial absorbed"
                );
                TrialRecord::from(&outcome)
            }
            Err(SimulationError::DidNotConverge {
                max_generations, ..
            }) => {
                tracing::debug!(seed, max_generations, "trial censored");
                TrialRecord::Censored { max_generations }
            }
            Err(err) => {
                // The failing step is the one after the last completed generation.
                let generation = driver.generation() + 1;
                tracing::warn!(seed, generation, error = %err, "trial failed");
                TrialRecord::Failed { generation }
            }
        }
    }

    /// Run every trial.
    pub fn run(&self) -> TrialStatistics {
        self.run_with_progress(|_| {})
    }

    /// Run every trial, calling `on_trial_done` with the number of newly finished
    /// trials (always 1) as each one completes.
    pub fn run_with_progress<F>(&self, on_trial_done: F) -> TrialStatistics
    where
        F: Fn(u64) + Sync,
    {
        let seeds = self.trial_seeds();
        tracing::info!(
            n_trials = seeds.len(),
            pop_size = self.model.pop_size(),
            initial_type_a = self.execution.initial_type_a,
            parallel = self.parallel,
            "starting trials"
        );

        let run_one = |&seed: &u64| {
            let record = self.run_trial(seed);
            on_trial_done(1);
            record
        };
        let records: Vec<TrialRecord> = if self.parallel {
            seeds.par_iter().map(run_one).collect()
        } else {
            seeds.iter().map(run_one).collect()
        };

        let stats = TrialStatistics::from_records(records);
        tracing::info!(
            fixed = stats.fixed(),
            extinct = stats.extinct(),
            censored = stats.censored(),
            failed = stats.failed(),
            "trials finished"
        );
        stats
    }
}

/// Build the model and run a whole batch.
pub fn run_trials(
    model: &ModelConfig,
    execution: &ExecutionConfig,
) -> Result<TrialStatistics, SimulationError> {
    Ok(TrialRunner::new(model.build()?, *execution)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::Selection;
    use crate::simulation::DistributionConfig;

    fn runner(n_trials: usize, seed: u64) -> TrialRunner {
        let model = CanningsModel::poisson(10, 1.0, Selection::neutral()).unwrap();
        TrialRunner::new(model, ExecutionConfig::new(n_trials, 5, 500).with_seed(seed)).unwrap()
    }

    #[test]
    fn test_statistics_counts() {
        let stats = TrialStatistics::from_records(vec![
            TrialRecord::Fixed { generations: 10 },
            TrialRecord::Extinct { generations: 4 },
            TrialRecord::Fixed { generations: 16 },
            TrialRecord::Censored { max_generations: 100 },
            TrialRecord::Failed { generation: 3 },
        ]);
        assert_eq!(stats.fixed(), 2);
        assert_eq!(stats.extinct(), 1);
        assert_eq!(stats.censored(), 1);
        assert_eq!(stats.failed(), 1);
        assert_eq!(stats.completed(), 3);
        assert!((stats.fixation_probability().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats.mean_absorption_time().unwrap() - 10.0).abs() < 1e-12);
        assert!((stats.variance_absorption_time().unwrap() - 36.0).abs() < 1e-12);
        assert!((stats.mean_fixation_time().unwrap() - 13.0).abs() < 1e-12);
        assert!((stats.mean_extinction_time().unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(stats.signed_times(), vec![10, -4, 16]);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = TrialStatistics::new();
        assert!(stats.is_empty());
        assert_eq!(stats.fixation_probability(), None);
        assert_eq!(stats.mean_absorption_time(), None);
        assert_eq!(stats.variance_absorption_time(), None);
        let summary = stats.summary();
        assert_eq!(summary.n_trials, 0);
    }

    #[test]
    fn test_merge_counts_add_up() {
        let mut a = TrialStatistics::from_records(vec![TrialRecord::Fixed { generations: 1 }]);
        let b = TrialStatistics::from_records(vec![
            TrialRecord::Extinct { generations: 2 },
            TrialRecord::Censored { max_generations: 9 },
        ]);
        let mut b_then_a = b.clone();
        b_then_a.merge(a.clone());
        a.merge(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.summary(), b_then_a.summary());
    }

    #[test]
    fn test_seeds_are_reproducible() {
        assert_eq!(runner(20, 7).trial_seeds(), runner(20, 7).trial_seeds());
        assert_ne!(runner(20, 7).trial_seeds(), runner(20, 8).trial_seeds());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let parallel = runner(200, 11).run();
        let sequential = runner(200, 11).with_parallelism(false).run();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), 200);
    }

    #[test]
    fn test_progress_callback_counts_trials() {
        use std::sync::atomic::{AtomicU64, Ordering};
        let done = AtomicU64::new(0);
        runner(50, 3).run_with_progress(|n| {
            done.fetch_add(n, Ordering::Relaxed);
        });
        assert_eq!(done.load(Ordering::Relaxed), 50);
    }

    #[test]
    fn test_censored_trials_do_not_abort_batch() {
        let model = CanningsModel::poisson(1000, 2.0, Selection::neutral()).unwrap();
        let stats = TrialRunner::new(model, ExecutionConfig::new(5, 500, 2).with_seed(1))
            .unwrap()
            .run();
        assert_eq!(stats.censored(), 5);
        assert_eq!(stats.fixation_probability(), None);
    }

    #[test]
    fn test_failed_trials_are_recorded() {
        let model = CanningsModel::schweinsberg(10, 1.5, 0.999999, Selection::neutral()).unwrap();
        let stats = TrialRunner::new(model, ExecutionConfig::new(4, 5, 100).with_seed(42))
            .unwrap()
            .run();
        assert_eq!(stats.failed(), 4);
        assert!(stats
            .records()
            .iter()
            .all(|r| *r == TrialRecord::Failed { generation: 1 }));
    }

    #[test]
    fn test_run_trials_validates() {
        let model = ModelConfig::new(10, DistributionConfig::Poisson { lambda: 1.0 }, Selection::neutral());
        assert!(run_trials(&model, &ExecutionConfig::new(0, 5, 10)).is_err());
        assert!(run_trials(&model, &ExecutionConfig::new(3, 11, 10)).is_err());
        let stats = run_trials(&model, &ExecutionConfig::new(3, 5, 10_000).with_seed(1)).unwrap();
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = runner(10, 5).run().summary();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("fixation_probability"));
    }
}
