//! Reference values for Cannings fixation simulations.
//!
//! Simulated fixation probabilities and absorption times can be checked against
//! the diffusion approximation, which the Cannings model approaches when the
//! offspring variance is finite and the population is large.

pub mod analysis;

pub use analysis::{
    compare, fixation_probability, neutral_absorption_time, AnalysisError, DiffusionModel,
    ValidationReport,
};
