//! Analysis tools for fixation data
//!
//! This module provides:
//! - Diffusion approximations (Kimura fixation probability, absorption times)
//! - Comparison of simulated batches against those approximations
//! - Small statistics helpers

pub mod diffusion;
pub mod utils;
pub mod validation;

use thiserror::Error;

/// Errors raised by the analysis functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not enough data: {0}")]
    InsufficientData(String),
}

// Re-export commonly used functions
pub use diffusion::{
    fixation_probability, neutral_absorption_time, neutral_extinction_time,
    neutral_fixation_time, DiffusionModel,
};
pub use validation::{compare, ValidationReport};
