//! Offspring-number distributions for Cannings reproduction.
//!
//! Every individual of a generation draws an independent number of offspring.
//! Two families are supported:
//!
//! - **Power law** (Schweinsberg): an individual has no offspring with probability
//!   `p0`; otherwise the number of offspring has a pure power-law tail,
//!   `P(count > k) = (1 - p0) * k^(-alpha)` for every `k >= 1`. For `1 < alpha < 2`
//!   the genealogy of a large population converges to a Beta-coalescent with
//!   multiple mergers (Schweinsberg, 2003).
//!
//!   A non-zero draw is `floor(x) + 1` with `x = ((1 - p0) / u)^(1/alpha) >= 1`.
//!   This makes the tail formula exact, but a parent never has exactly one
//!   offspring (`P(count = 1) = 0`) and the mean is `(1 - p0)(1 + ζ(alpha))`.
//!   Truncating to `floor(x)` instead would allow single offspring and give the
//!   mean `(1 - p0) ζ(alpha)`, at the cost of a tail shifted by one:
//!   `P(count > k) = (1 - p0)(k + 1)^(-alpha)`.
//! - **Poisson**: a Poisson number of offspring with mean `lambda`. With a mean
//!   close to one the Cannings model behaves like a Wright–Fisher model.
//!
//! Fecundity selection is expressed as a *weighted* copy of a distribution (see
//! [`OffspringDistribution::weighted`]). All parameter checks happen at
//! construction, sampling never fails.

use crate::errors::SimulationError;
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Number of explicit terms in the Euler–Maclaurin evaluation of ζ(s).
const ZETA_TERMS: usize = 64;

/// Power-law offspring distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLaw {
    p0: f64,
    alpha: f64,
    /// Multiplier applied to non-zero draws (1.0 unless fecundity-weighted).
    scale: f64,
}

impl PowerLaw {
    /// Create a power-law distribution.
    ///
    /// # Arguments
    /// * `p0` - Probability of having no offspring (`0 <= p0 < 1`)
    /// * `alpha` - Tail exponent (`alpha > 0`)
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if a parameter is out of range.
    pub fn new(p0: f64, alpha: f64) -> Result<Self, SimulationError> {
        if !(0.0..1.0).contains(&p0) {
            return Err(SimulationError::invalid(format!(
                "p0={p0} but it must satisfy 0 <= p0 < 1"
            )));
        }
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(SimulationError::invalid(format!(
                "alpha={alpha} but it must satisfy 0 < alpha"
            )));
        }
        Ok(Self {
            p0,
            alpha,
            scale: 1.0,
        })
    }

    /// Probability of having no offspring.
    pub fn p0(&self) -> f64 {
        self.p0
    }

    /// Tail exponent.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Multiplier applied to non-zero draws.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Fecundity-weighted copy: the zero-offspring probability becomes `p0 / weight`
    /// and non-zero draws are multiplied by `weight`.
    fn weighted(&self, weight: f64) -> Self {
        Self {
            p0: self.p0 / weight,
            alpha: self.alpha,
            scale: self.scale * weight,
        }
    }

    /// Draw one offspring count by inversion of the closed-form tail.
    ///
    /// With `u` uniform on `(0, 1]`, the draw is 0 when `u > 1 - p0`. Otherwise
    /// `x = ((1 - p0) / u)^(1 / alpha) >= 1` and the count is `floor(x) + 1`, so that
    /// `count > k` exactly when `x >= k`, i.e. when `u <= (1 - p0) k^(-alpha)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let u = 1.0 - rng.random::<f64>();
        let survival = 1.0 - self.p0;
        if u > survival {
            return 0;
        }

        let x = (survival / u).powf(self.alpha.recip());
        // Float-to-int casts saturate, so astronomically large draws pin at u64::MAX.
        ((x.floor() + 1.0) * self.scale).floor() as u64
    }

    /// `P(count > k)`.
    pub fn tail_probability(&self, k: u64) -> f64 {
        let survival = 1.0 - self.p0;
        if k == 0 {
            return survival;
        }
        // floor(scale * c) > k  <=>  c > ceil((k + 1) / scale) - 1
        let threshold = ((k as f64 + 1.0) / self.scale).ceil() - 1.0;
        if threshold < 1.0 {
            survival
        } else {
            survival * threshold.powf(-self.alpha)
        }
    }

    /// Expected number of offspring, `(1 - p0)(1 + ζ(alpha))`, infinite for
    /// `alpha <= 1`. For a weighted copy the value ignores the final rounding.
    pub fn mean(&self) -> f64 {
        if self.alpha <= 1.0 {
            return f64::INFINITY;
        }
        (1.0 - self.p0) * (1.0 + riemann_zeta(self.alpha)) * self.scale
    }

    /// Variance of the offspring number, infinite for `alpha <= 2`.
    ///
    /// Uses `E[X^2] = sum_k (2k + 1) P(X > k) = (1 - p0)(1 + 2ζ(alpha - 1) + ζ(alpha))`.
    pub fn variance(&self) -> f64 {
        if self.alpha <= 2.0 {
            return f64::INFINITY;
        }
        let second_moment = (1.0 - self.p0)
            * (1.0 + 2.0 * riemann_zeta(self.alpha - 1.0) + riemann_zeta(self.alpha))
            * self.scale
            * self.scale;
        second_moment - self.mean().powi(2)
    }
}

/// Poisson offspring distribution.
#[derive(Debug, Clone)]
pub struct PoissonOffspring {
    lambda: f64,
    inner: Poisson<f64>,
}

impl PoissonOffspring {
    /// Create a Poisson distribution with mean `lambda` (`lambda > 0`).
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if `lambda` is not a positive
    /// finite value supported by the sampler.
    pub fn new(lambda: f64) -> Result<Self, SimulationError> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(SimulationError::invalid(format!(
                "lambda={lambda} but it must satisfy 0 < lambda"
            )));
        }
        let inner = Poisson::new(lambda)
            .map_err(|e| SimulationError::invalid(format!("lambda={lambda}: {e}")))?;
        Ok(Self { lambda, inner })
    }

    /// Mean number of offspring.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Draw one offspring count.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.inner.sample(rng) as u64
    }

    /// `P(count > k)`.
    pub fn tail_probability(&self, k: u64) -> f64 {
        let mut term = (-self.lambda).exp();
        let mut cdf = term;
        for i in 1..=k {
            term *= self.lambda / i as f64;
            cdf += term;
        }
        (1.0 - cdf).max(0.0)
    }
}

/// Offspring-number distribution used by a Cannings model.
#[derive(Debug, Clone)]
pub enum OffspringDistribution {
    /// Schweinsberg power law with parameters `(p0, alpha)`.
    PowerLaw(PowerLaw),
    /// Poisson with mean `lambda`.
    Poisson(PoissonOffspring),
}

impl OffspringDistribution {
    /// Power-law distribution, see [`PowerLaw::new`].
    pub fn power_law(p0: f64, alpha: f64) -> Result<Self, SimulationError> {
        PowerLaw::new(p0, alpha).map(Self::PowerLaw)
    }

    /// Poisson distribution, see [`PoissonOffspring::new`].
    pub fn poisson(lambda: f64) -> Result<Self, SimulationError> {
        PoissonOffspring::new(lambda).map(Self::Poisson)
    }

    /// Short name of the distribution family.
    pub fn family(&self) -> &'static str {
        match self {
            Self::PowerLaw(_) => "power_law",
            Self::Poisson(_) => "poisson",
        }
    }

    /// Build the distribution used by individuals with fecundity weight `weight`.
    ///
    /// A higher weight lowers the zero-offspring probability of the power law
    /// (`p0 / weight`) and scales its non-zero draws, and multiplies the Poisson
    /// mean. A weight of 1.0 returns an identical distribution.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if `weight` is not finite or
    /// smaller than 1.0, or if the scaled Poisson mean is out of range.
    pub fn weighted(&self, weight: f64) -> Result<Self, SimulationError> {
        if !(weight.is_finite() && weight >= 1.0) {
            return Err(SimulationError::invalid(format!(
                "selection weight={weight} but it must satisfy 1 <= weight"
            )));
        }
        match self {
            Self::PowerLaw(law) => Ok(Self::PowerLaw(law.weighted(weight))),
            Self::Poisson(pois) => Self::poisson(pois.lambda * weight),
        }
    }

    /// Draw the offspring count of one individual.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self {
            Self::PowerLaw(law) => law.sample(rng),
            Self::Poisson(pois) => pois.sample(rng),
        }
    }

    /// Draw the offspring count of one individual with fecundity weight `weight`.
    ///
    /// Prefer building the weighted distribution once with [`Self::weighted`] when
    /// drawing repeatedly.
    pub fn sample_with_weight<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        weight: f64,
    ) -> Result<u64, SimulationError> {
        Ok(self.weighted(weight)?.sample(rng))
    }

    /// Total offspring of `n_individuals` independent individuals.
    pub fn sample_total<R: Rng + ?Sized>(&self, n_individuals: usize, rng: &mut R) -> u64 {
        (0..n_individuals).fold(0u64, |total, _| total.saturating_add(self.sample(rng)))
    }

    /// Expected number of offspring per individual.
    pub fn mean(&self) -> f64 {
        match self {
            Self::PowerLaw(law) => law.mean(),
            Self::Poisson(pois) => pois.lambda,
        }
    }

    /// Variance of the offspring number of one individual.
    pub fn variance(&self) -> f64 {
        match self {
            Self::PowerLaw(law) => law.variance(),
            Self::Poisson(pois) => pois.lambda,
        }
    }

    /// `P(count > k)` for one individual.
    pub fn tail_probability(&self, k: u64) -> f64 {
        match self {
            Self::PowerLaw(law) => law.tail_probability(k),
            Self::Poisson(pois) => pois.tail_probability(k),
        }
    }
}

/// Riemann zeta function for `s > 1` (Euler–Maclaurin summation).
fn riemann_zeta(s: f64) -> f64 {
    let n = ZETA_TERMS as f64;
    let head: f64 = (1..ZETA_TERMS).map(|k| (k as f64).powf(-s)).sum();
    let tail = n.powf(1.0 - s) / (s - 1.0) + 0.5 * n.powf(-s) + s * n.powf(-s - 1.0) / 12.0
        - s * (s + 1.0) * (s + 2.0) * n.powf(-s - 3.0) / 720.0;
    head + tail
}
