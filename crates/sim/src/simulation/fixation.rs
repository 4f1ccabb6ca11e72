//! Generation-by-generation driver until type A fixes or goes extinct.

use crate::errors::SimulationError;
use crate::simulation::{CanningsModel, Population};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// State of a fixation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixationState {
    /// Both types present.
    Running,
    /// Type A has taken over.
    Fixed,
    /// Type A has been lost.
    Extinct,
}

impl FixationState {
    fn of(population: &Population) -> Self {
        if population.is_fixed() {
            Self::Fixed
        } else if population.is_extinct() {
            Self::Extinct
        } else {
            Self::Running
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Terminal result of a fixation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Absorption {
    Fixed,
    Extinct,
}

/// A generation in which the offspring pool was smaller than the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortageEvent {
    /// Generation produced by the short step (1-based)
    pub generation: u64,
    /// Individuals added by Wright–Fisher completion
    pub shortage: u64,
}

/// Outcome of a run that reached absorption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixationOutcome {
    /// Number of generations until absorption (the absorbing step included)
    pub generations: u64,
    pub result: Absorption,
    /// Completion events, empty unless tracking was enabled
    pub shortages: Vec<ShortageEvent>,
}

impl FixationOutcome {
    /// Absorption time signed by result: `+t` when fixed, `-t` when extinct.
    pub fn signed_time(&self) -> i64 {
        let t = i64::try_from(self.generations).unwrap_or(i64::MAX);
        match self.result {
            Absorption::Fixed => t,
            Absorption::Extinct => -t,
        }
    }
}

/// Runs one population forward until absorption.
///
/// # Examples
///
/// ```
/// use cannings_sim::evolution::Selection;
/// use cannings_sim::simulation::{Absorption, CanningsModel, FixationDriver};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let model = CanningsModel::poisson(20, 1.5, Selection::neutral()).unwrap();
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
/// let outcome = FixationDriver::new(&model, 10)
///     .unwrap()
///     .run(100_000, &mut rng)
///     .unwrap();
/// assert!(matches!(outcome.result, Absorption::Fixed | Absorption::Extinct));
/// ```
#[derive(Debug, Clone)]
pub struct FixationDriver<'m> {
    model: &'m CanningsModel,
    population: Population,
    generation: u64,
    track_shortages: bool,
    shortages: Vec<ShortageEvent>,
}

impl<'m> FixationDriver<'m> {
    /// Start a run from `initial_type_a` type-A individuals.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if `initial_type_a` exceeds the
    /// population size.
    pub fn new(model: &'m CanningsModel, initial_type_a: usize) -> Result<Self, SimulationError> {
        Ok(Self {
            model,
            population: model.initial_population(initial_type_a)?,
            generation: 0,
            track_shortages: false,
            shortages: Vec::new(),
        })
    }

    /// Record every generation that needed Wright–Fisher completion.
    pub fn with_shortage_tracking(mut self) -> Self {
        self.track_shortages = true;
        self
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Generations performed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> FixationState {
        FixationState::of(&self.population)
    }

    pub fn shortages(&self) -> &[ShortageEvent] {
        &self.shortages
    }

    /// Perform one generation. Does nothing once the run is absorbed.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<FixationState, SimulationError> {
        if self.state().is_terminal() {
            return Ok(self.state());
        }

        let report = self.model.step(&self.population, rng)?;
        self.generation += 1;
        self.population = report.population;
        if self.track_shortages && report.shortage > 0 {
            self.shortages.push(ShortageEvent {
                generation: self.generation,
                shortage: report.shortage,
            });
        }
        Ok(self.state())
    }

    /// Step until absorption or until `max_generations` generations have run.
    ///
    /// On error the driver keeps the state reached, so [`Self::generation`] tells
    /// where the run stopped.
    ///
    /// # Errors
    /// Returns [`SimulationError::DidNotConverge`] if both types are still present
    /// after `max_generations` generations, and propagates
    /// [`SimulationError::EmptyOffspringPool`].
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        max_generations: u64,
        rng: &mut R,
    ) -> Result<FixationOutcome, SimulationError> {
        loop {
            let result = match self.state() {
                FixationState::Fixed => Absorption::Fixed,
                FixationState::Extinct => Absorption::Extinct,
                FixationState::Running if self.generation >= max_generations => {
                    return Err(SimulationError::DidNotConverge {
                        max_generations,
                        type_a: self.population.type_a(),
                        pop_size: self.population.pop_size(),
                    });
                }
                FixationState::Running => {
                    self.step(rng)?;
                    continue;
                }
            };
            return Ok(FixationOutcome {
                generations: self.generation,
                result,
                shortages: std::mem::take(&mut self.shortages),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::Selection;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    fn neutral_poisson(pop_size: usize, lambda: f64) -> CanningsModel {
        CanningsModel::poisson(pop_size, lambda, Selection::neutral()).unwrap()
    }

    #[test]
    fn test_initial_boundaries_are_terminal() {
        let model = neutral_poisson(10, 1.0);

        let outcome = FixationDriver::new(&model, 0).unwrap().run(10, &mut rng(1)).unwrap();
        assert_eq!(outcome.result, Absorption::Extinct);
        assert_eq!(outcome.generations, 0);

        let outcome = FixationDriver::new(&model, 10).unwrap().run(10, &mut rng(1)).unwrap();
        assert_eq!(outcome.result, Absorption::Fixed);
        assert_eq!(outcome.generations, 0);
    }

    #[test]
    fn test_initial_count_above_size_rejected() {
        let model = neutral_poisson(10, 1.0);
        assert!(matches!(
            FixationDriver::new(&model, 11),
            Err(SimulationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_run_reaches_absorption() {
        let model = neutral_poisson(20, 2.0);
        for seed in 0..20 {
            let outcome = FixationDriver::new(&model, 10)
                .unwrap()
                .run(1_000_000, &mut rng(seed))
                .unwrap();
            assert!(outcome.generations >= 1);
            assert!(outcome.shortages.is_empty());
        }
    }

    #[test]
    fn test_run_does_not_converge() {
        let model = neutral_poisson(1000, 2.0);
        let err = FixationDriver::new(&model, 500)
            .unwrap()
            .run(3, &mut rng(3))
            .unwrap_err();
        match err {
            SimulationError::DidNotConverge {
                max_generations,
                pop_size,
                ..
            } => {
                assert_eq!(max_generations, 3);
                assert_eq!(pop_size, 1000);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_step_counts_generations_and_stops_when_absorbed() {
        let model = neutral_poisson(5, 2.0);
        let mut driver = FixationDriver::new(&model, 2).unwrap();
        let mut r = rng(4);
        while !driver.step(&mut r).unwrap().is_terminal() {}
        let generations = driver.generation();
        assert!(generations >= 1);
        driver.step(&mut r).unwrap();
        assert_eq!(driver.generation(), generations);
    }

    #[test]
    fn test_shortage_tracking_records_completion() {
        let model = neutral_poisson(50, 0.3);
        let outcome = FixationDriver::new(&model, 25)
            .unwrap()
            .with_shortage_tracking()
            .run(1_000_000, &mut rng(5))
            .unwrap();
        assert!(!outcome.shortages.is_empty());
        for (i, event) in outcome.shortages.iter().enumerate() {
            assert!(event.shortage > 0 && event.shortage <= 50);
            assert!(event.generation >= 1 && event.generation <= outcome.generations);
            if i > 0 {
                assert!(event.generation > outcome.shortages[i - 1].generation);
            }
        }
    }

    #[test]
    fn test_empty_pool_propagates() {
        let model = CanningsModel::schweinsberg(10, 1.5, 0.999999, Selection::neutral()).unwrap();
        let result = FixationDriver::new(&model, 5).unwrap().run(100, &mut rng(42));
        assert_eq!(
            result,
            Err(SimulationError::EmptyOffspringPool { pop_size: 10 })
        );
    }

    #[test]
    fn test_signed_time() {
        let fixed = FixationOutcome {
            generations: 12,
            result: Absorption::Fixed,
            shortages: Vec::new(),
        };
        assert_eq!(fixed.signed_time(), 12);
        let extinct = FixationOutcome {
            result: Absorption::Extinct,
            ..fixed
        };
        assert_eq!(extinct.signed_time(), -12);
    }
}
