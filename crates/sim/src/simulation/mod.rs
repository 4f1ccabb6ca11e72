//! Cannings models, fixation runs and trial batches.
//!
//! Re-exports
//!
//! The most commonly used simulation types are re-exported here so consumers can
//! import them from `cannings_sim::simulation`.
//!
//! - `CanningsModel`: one configured generation transition.
//! - `FixationDriver`: runs a population until type A fixes or is lost.
//! - `TrialRunner`: repeats independent fixation runs, in parallel by default.
//! - `TrialBuilder`: fluent builder for constructing `TrialRunner` instances
//!   with sensible defaults and validation.

pub mod builder;
pub mod fixation;
pub mod model;
pub mod parameters;
pub mod population;
pub mod trials;

pub use builder::TrialBuilder;
pub use fixation::{Absorption, FixationDriver, FixationOutcome, FixationState, ShortageEvent};
pub use model::CanningsModel;
pub use parameters::{Configuration, DistributionConfig, ExecutionConfig, ModelConfig};
pub use population::Population;
pub use trials::{run_trials, TrialRecord, TrialRunner, TrialStatistics, TrialSummary};
