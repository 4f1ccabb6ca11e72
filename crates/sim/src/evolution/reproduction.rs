//! One Cannings reproduction step.
//!
//! A generation proceeds in three stages:
//!
//! 1. Every individual draws a number of offspring. Under fecundity selection the
//!    type-A parents use the weighted distribution.
//! 2. The offspring are pooled, tagged by parental type.
//! 3. Exactly `pop_size` survivors are kept. If the pool is large enough they are
//!    sampled without replacement: uniformly (hypergeometric) or, under viability
//!    selection, with type-A weight `strength` (sequential weighted draws, i.e. the
//!    Wallenius noncentral hypergeometric distribution). If the pool is too small,
//!    every offspring survives and the shortage is filled by a Wright–Fisher draw
//!    with replacement from the pool.
//!
//! Offspring are handled as counts per type, never as ordered lists, so the
//! outcome cannot depend on the order in which equal-weight individuals are visited.

use crate::errors::SimulationError;
use crate::evolution::{OffspringDistribution, Selection};
use crate::simulation::Population;
use rand::Rng;
use rand_distr::{Binomial, Distribution, Hypergeometric};
use serde::{Deserialize, Serialize};

/// Largest pool handed to `Hypergeometric`, whose internals overflow near `u64::MAX`.
/// Larger pools are sampled draw by draw.
const HYPERGEOMETRIC_LIMIT: u64 = 1 << 48;

/// Offspring of one generation, counted per parental type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffspringPool {
    /// Offspring of type-A parents
    pub type_a: u64,
    /// Offspring of type-B parents
    pub type_b: u64,
}

impl OffspringPool {
    pub fn new(type_a: u64, type_b: u64) -> Self {
        Self { type_a, type_b }
    }

    /// Total number of offspring (saturating).
    pub fn total(&self) -> u64 {
        self.type_a.saturating_add(self.type_b)
    }

    /// Exact total, `None` if it does not fit in a `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        self.type_a.checked_add(self.type_b)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Result of sampling the survivors from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Survivors {
    /// Surviving type-A individuals
    pub type_a: usize,
    /// Individuals added by Wright–Fisher completion (0 if the pool was large enough)
    pub shortage: u64,
}

/// Everything produced by one reproduction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// The next generation
    pub population: Population,
    /// Offspring pool before survivor sampling
    pub pool: OffspringPool,
    /// Individuals added by Wright–Fisher completion
    pub shortage: u64,
}

/// Configured reproduction step: an offspring distribution plus a selection regime.
#[derive(Debug, Clone)]
pub struct Reproduction {
    distribution: OffspringDistribution,
    /// Distribution of type-A parents (weighted under fecundity selection).
    type_a_distribution: OffspringDistribution,
    selection: Selection,
}

impl Reproduction {
    /// Create a reproduction step.
    ///
    /// The fecundity-weighted distribution is built here so that a bad combination
    /// of parameters fails at construction rather than mid-simulation.
    pub fn new(
        distribution: OffspringDistribution,
        selection: Selection,
    ) -> Result<Self, SimulationError> {
        let type_a_distribution = distribution.weighted(selection.fecundity_weight())?;
        Ok(Self {
            distribution,
            type_a_distribution,
            selection,
        })
    }

    pub fn distribution(&self) -> &OffspringDistribution {
        &self.distribution
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Draw the offspring of every individual in `population`.
    pub fn draw_offspring<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> OffspringPool {
        let type_a = self
            .type_a_distribution
            .sample_total(population.type_a(), rng);
        let type_b = self.distribution.sample_total(population.type_b(), rng);
        OffspringPool::new(type_a, type_b)
    }

    /// Advance `population` by one generation.
    ///
    /// # Errors
    /// Returns [`SimulationError::EmptyOffspringPool`] if no individual had offspring.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<StepReport, SimulationError> {
        let pool = self.draw_offspring(population, rng);
        let survivors = sample_survivors(
            &pool,
            population.pop_size(),
            self.selection.viability_weight(),
            rng,
        )?;

        Ok(StepReport {
            population: Population::new(population.pop_size(), survivors.type_a)?,
            pool,
            shortage: survivors.shortage,
        })
    }
}

/// Reduce (or pad) `pool` to exactly `pop_size` survivors.
///
/// `viability_weight` is the relative survival weight of a type-A offspring; 1.0
/// gives uniform sampling.
///
/// # Errors
/// Returns [`SimulationError::EmptyOffspringPool`] if the pool is empty.
pub fn sample_survivors<R: Rng + ?Sized>(
    pool: &OffspringPool,
    pop_size: usize,
    viability_weight: f64,
    rng: &mut R,
) -> Result<Survivors, SimulationError> {
    if pool.is_empty() {
        return Err(SimulationError::EmptyOffspringPool { pop_size });
    }

    let target = pop_size as u64;
    let total = pool.checked_total();
    if let Some(total) = total.filter(|&total| total < target) {
        // Wright–Fisher completion: every offspring survives and the missing
        // individuals are drawn with replacement from the pool.
        let shortage = target - total;
        let p = type_a_share(pool, viability_weight);
        let extra = Binomial::new(shortage, p)
            .map_err(|e| SimulationError::invalid(format!("completion probability {p}: {e}")))?
            .sample(rng);

        return Ok(Survivors {
            type_a: (pool.type_a + extra) as usize,
            shortage,
        });
    }

    let small_pool = total.is_some_and(|total| total <= HYPERGEOMETRIC_LIMIT);
    let type_a = if viability_weight == 1.0 && small_pool {
        uniform_without_replacement(pool, target, rng)?
    } else {
        weighted_without_replacement(pool, target, viability_weight, rng)
    };
    Ok(Survivors {
        type_a: type_a as usize,
        shortage: 0,
    })
}

/// Probability that one weighted draw from the pool is of type A.
fn type_a_share(pool: &OffspringPool, weight: f64) -> f64 {
    if pool.type_a == 0 {
        return 0.0;
    }
    // 1 / (1 + b / (w a)) stays finite when w * a overflows.
    1.0 / (1.0 + pool.type_b as f64 / (weight * pool.type_a as f64))
}

/// Hypergeometric number of type-A individuals among `n` drawn uniformly.
fn uniform_without_replacement<R: Rng + ?Sized>(
    pool: &OffspringPool,
    n: u64,
    rng: &mut R,
) -> Result<u64, SimulationError> {
    if pool.type_a == 0 {
        return Ok(0);
    }
    if pool.type_b == 0 {
        return Ok(n);
    }
    let hypergeometric = Hypergeometric::new(pool.type_a + pool.type_b, pool.type_a, n)
        .map_err(|e| SimulationError::invalid(format!("survivor sampling: {e}")))?;
    Ok(hypergeometric.sample(rng))
}

/// Wallenius number of type-A individuals among `n` drawn one at a time without
/// replacement, each remaining type-A offspring having weight `weight` and each
/// type-B offspring weight 1.
fn weighted_without_replacement<R: Rng + ?Sized>(
    pool: &OffspringPool,
    n: u64,
    weight: f64,
    rng: &mut R,
) -> u64 {
    let mut remaining = OffspringPool::new(pool.type_a, pool.type_b);
    let mut drawn_a = 0u64;

    for draws_left in (1..=n).rev() {
        if remaining.type_a == 0 {
            break;
        }
        if remaining.type_b == 0 {
            drawn_a += draws_left;
            break;
        }
        if rng.random::<f64>() < type_a_share(&remaining, weight) {
            remaining.type_a -= 1;
            drawn_a += 1;
        } else {
            remaining.type_b -= 1;
        }
    }

    drawn_a
}
