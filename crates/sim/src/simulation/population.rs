//! Two-type population state.
//!
//! Individuals of the same type are exchangeable, so a population is fully
//! described by its size and the number of type-A individuals.

use crate::errors::SimulationError;
use serde::{Deserialize, Serialize};

/// A haploid population of type-A and type-B individuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Population {
    /// Total number of individuals
    pop_size: usize,
    /// Number of type-A individuals
    type_a: usize,
}

impl Population {
    /// Create a population of `pop_size` individuals, `type_a` of them of type A.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if `pop_size` is zero or
    /// `type_a > pop_size`.
    pub fn new(pop_size: usize, type_a: usize) -> Result<Self, SimulationError> {
        if pop_size == 0 {
            return Err(SimulationError::invalid("population size must be positive"));
        }
        if type_a > pop_size {
            return Err(SimulationError::invalid(format!(
                "initial type-A count {type_a} exceeds population size {pop_size}"
            )));
        }
        Ok(Self { pop_size, type_a })
    }

    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    /// Number of type-A individuals.
    pub fn type_a(&self) -> usize {
        self.type_a
    }

    /// Number of type-B individuals.
    pub fn type_b(&self) -> usize {
        self.pop_size - self.type_a
    }

    /// Frequency of type A.
    pub fn frequency(&self) -> f64 {
        self.type_a as f64 / self.pop_size as f64
    }

    /// Type A has taken over the population.
    pub fn is_fixed(&self) -> bool {
        self.type_a == self.pop_size
    }

    /// Type A has been lost.
    pub fn is_extinct(&self) -> bool {
        self.type_a == 0
    }

    /// Either type has been lost.
    pub fn is_absorbed(&self) -> bool {
        self.is_fixed() || self.is_extinct()
    }
}
