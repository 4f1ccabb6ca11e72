//! Diffusion approximation of the two-type Cannings model
//!
//! For a haploid population of size `N` whose per-generation offspring variance
//! is `σ²`, the type-A frequency converges (time measured in units of `N/σ²`
//! generations) to the Wright–Fisher diffusion with drift `s·x(1-x)`.
//!
//! # Formulas
//!
//! Fixation probability from frequency `p` (Kimura 1962):
//!
//! $$u(p) = \frac{1 - e^{-2Nsp/σ²}}{1 - e^{-2Ns/σ²}}$$
//!
//! which reduces to `p` when `s = 0`. Mean neutral absorption time:
//!
//! $$t(p) = -\frac{2N}{σ²}\left[p \ln p + (1-p)\ln(1-p)\right]$$
//!
//! # References
//!
//! Kimura, M. (1962). On the probability of fixation of mutant genes in a
//! population. Genetics, 47(6), 713-719.
//!
//! Ewens, W. J. (2004). Mathematical Population Genetics. Springer, ch. 5.

use crate::analysis::AnalysisError;
use cannings_sim::simulation::CanningsModel;

/// Fixation probability of type A from frequency `p` with selection coefficient `s`.
///
/// # Arguments
///
/// * `pop_size` - Number of individuals `N`
/// * `p` - Initial frequency of type A, in `[0, 1]`
/// * `s` - Selection coefficient
/// * `variance` - Offspring variance `σ²` (1.0 for Wright–Fisher)
///
/// # Examples
///
/// ```
/// use cannings_analysis::fixation_probability;
///
/// assert!((fixation_probability(100, 0.2, 0.0, 1.0) - 0.2).abs() < 1e-12);
/// assert!(fixation_probability(100, 0.01, 0.05, 1.0) > 0.01);
/// ```
pub fn fixation_probability(pop_size: usize, p: f64, s: f64, variance: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let scaled = 2.0 * pop_size as f64 * s / variance;
    // Below this the expansion of both exponentials is exact to double precision.
    if scaled.abs() < 1e-10 {
        return p;
    }
    // expm1 keeps precision for weak selection.
    (-scaled * p).exp_m1() / (-scaled).exp_m1()
}

/// Mean number of generations until either type is lost, without selection.
pub fn neutral_absorption_time(pop_size: usize, p: f64, variance: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -2.0 * pop_size as f64 / variance * (p * p.ln() + (1.0 - p) * (1.0 - p).ln())
}

/// Mean number of generations until fixation, conditional on fixation, without selection.
pub fn neutral_fixation_time(pop_size: usize, p: f64, variance: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -2.0 * pop_size as f64 / variance * (1.0 - p) * (1.0 - p).ln() / p
}

/// Mean number of generations until extinction, conditional on extinction, without selection.
pub fn neutral_extinction_time(pop_size: usize, p: f64, variance: f64) -> f64 {
    neutral_fixation_time(pop_size, 1.0 - p, variance)
}

/// Diffusion parameters of a configured model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionModel {
    /// Number of individuals
    pub pop_size: usize,
    /// Offspring variance per generation
    pub variance: f64,
    /// Selection coefficient
    pub selection_coefficient: f64,
}

impl DiffusionModel {
    pub fn new(pop_size: usize, variance: f64, selection_coefficient: f64) -> Self {
        Self {
            pop_size,
            variance,
            selection_coefficient,
        }
    }

    /// Diffusion limit of a Cannings model.
    ///
    /// Survivors are a `1/μ` thinning of the pool, so a parent with `X` offspring
    /// leaves on average `X/μ` survivors and
    /// `σ² = (1 - 1/μ) + Var(X)/μ²`, which is 1 for Poisson offspring numbers.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] if the offspring variance is
    /// infinite (power law with `alpha <= 2`, where the genealogy is a
    /// multiple-merger coalescent instead of a diffusion) or if the mean offspring
    /// number does not exceed 1.
    pub fn from_model(model: &CanningsModel) -> Result<Self, AnalysisError> {
        let distribution = model.distribution();
        let mean = distribution.mean();
        let var = distribution.variance();
        if !var.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "{} offspring numbers have infinite variance, no diffusion limit",
                distribution.family()
            )));
        }
        if mean <= 1.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "mean offspring number {mean:.4} must exceed 1"
            )));
        }
        let variance = 1.0 - mean.recip() + var / (mean * mean);
        Ok(Self::new(
            model.pop_size(),
            variance,
            model.selection().coefficient(),
        ))
    }

    /// Fixation probability from `type_a` initial type-A individuals.
    pub fn fixation_probability(&self, type_a: usize) -> f64 {
        fixation_probability(
            self.pop_size,
            self.frequency(type_a),
            self.selection_coefficient,
            self.variance,
        )
    }

    /// Mean absorption time, only available without selection.
    pub fn absorption_time(&self, type_a: usize) -> Option<f64> {
        (self.selection_coefficient == 0.0)
            .then(|| neutral_absorption_time(self.pop_size, self.frequency(type_a), self.variance))
    }

    /// Conditional mean fixation time, only available without selection.
    pub fn fixation_time(&self, type_a: usize) -> Option<f64> {
        (self.selection_coefficient == 0.0)
            .then(|| neutral_fixation_time(self.pop_size, self.frequency(type_a), self.variance))
    }

    fn frequency(&self, type_a: usize) -> f64 {
        type_a as f64 / self.pop_size as f64
    }
}
