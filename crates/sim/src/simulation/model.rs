//! Configured Cannings models.
//!
//! A [`CanningsModel`] bundles a population size with a reproduction step. The
//! named constructors cover the variants used in practice:
//!
//! - [`CanningsModel::schweinsberg`]: power-law offspring numbers with tail exponent `alpha`
//! - [`CanningsModel::beta_coalescent`]: the same law parameterised by the
//!   Beta(beta, 2 - beta) coalescent it converges to (`alpha = 2 - beta`)
//! - [`CanningsModel::poisson`]: Poisson offspring numbers (Wright–Fisher limit)

use crate::errors::SimulationError;
use crate::evolution::{OffspringDistribution, Reproduction, Selection, StepReport};
use crate::simulation::Population;
use rand::Rng;

/// One generation transition of a Cannings model with optional selection.
#[derive(Debug, Clone)]
pub struct CanningsModel {
    pop_size: usize,
    reproduction: Reproduction,
}

impl CanningsModel {
    /// Create a model from an offspring distribution and a selection regime.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if `pop_size` is zero or the
    /// selection strength cannot be applied to the distribution.
    pub fn new(
        pop_size: usize,
        distribution: OffspringDistribution,
        selection: Selection,
    ) -> Result<Self, SimulationError> {
        if pop_size == 0 {
            return Err(SimulationError::invalid("population size must be positive"));
        }
        Ok(Self {
            pop_size,
            reproduction: Reproduction::new(distribution, selection)?,
        })
    }

    /// Schweinsberg model with power-law offspring numbers.
    pub fn schweinsberg(
        pop_size: usize,
        alpha: f64,
        p0: f64,
        selection: Selection,
    ) -> Result<Self, SimulationError> {
        Self::new(pop_size, OffspringDistribution::power_law(p0, alpha)?, selection)
    }

    /// Model whose genealogy converges to the Beta(beta, 2 - beta) coalescent.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] unless `0 < beta < 1`.
    pub fn beta_coalescent(
        pop_size: usize,
        beta: f64,
        p0: f64,
        selection: Selection,
    ) -> Result<Self, SimulationError> {
        if !(beta > 0.0 && beta < 1.0) {
            return Err(SimulationError::invalid(format!(
                "beta={beta} but it must satisfy 0 < beta < 1"
            )));
        }
        Self::schweinsberg(pop_size, 2.0 - beta, p0, selection)
    }

    /// Model with Poisson offspring numbers of mean `lambda`.
    pub fn poisson(
        pop_size: usize,
        lambda: f64,
        selection: Selection,
    ) -> Result<Self, SimulationError> {
        Self::new(pop_size, OffspringDistribution::poisson(lambda)?, selection)
    }

    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    pub fn distribution(&self) -> &OffspringDistribution {
        self.reproduction.distribution()
    }

    pub fn selection(&self) -> &Selection {
        self.reproduction.selection()
    }

    /// Expected offspring number of a neutral individual.
    pub fn mean_offspring(&self) -> f64 {
        self.distribution().mean()
    }

    /// Check that the pool is expected to exceed the population size.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if the mean offspring number is
    /// at most 1, in which case most generations need Wright–Fisher completion.
    pub fn ensure_supercritical(&self) -> Result<(), SimulationError> {
        let mean = self.mean_offspring();
        if mean > 1.0 {
            Ok(())
        } else {
            Err(SimulationError::invalid(format!(
                "mean offspring number {mean:.4} must exceed 1"
            )))
        }
    }

    /// Population at the start of a run.
    pub fn initial_population(&self, type_a: usize) -> Result<Population, SimulationError> {
        Population::new(self.pop_size, type_a)
    }

    /// Advance `population` by one generation.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if `population` does not have
    /// this model's size, and [`SimulationError::EmptyOffspringPool`] if nobody
    /// reproduced.
    pub fn step<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<StepReport, SimulationError> {
        if population.pop_size() != self.pop_size {
            return Err(SimulationError::invalid(format!(
                "population of size {} does not match model size {}",
                population.pop_size(),
                self.pop_size
            )));
        }
        self.reproduction.advance(population, rng)
    }
}
