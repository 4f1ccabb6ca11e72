//! Error types for the simulation crate.
//!
//! Construction problems surface as [`SimulationError::InvalidParameter`] before any
//! random draw is made. The two run-time failures, an empty offspring pool and a
//! trial that hits its generation cap, are fatal to a single trial only; the
//! [`TrialRunner`](crate::simulation::TrialRunner) turns them into records.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A distribution, selection or population parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A builder was finalized without a required value.
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),

    /// Every individual drew zero offspring, so no survivors can be sampled.
    #[error("Empty offspring pool: no offspring drawn for a population of {pop_size}")]
    EmptyOffspringPool { pop_size: usize },

    /// The generation cap was reached before fixation or extinction.
    #[error(
        "Did not converge after {max_generations} generations \
         ({type_a} of {pop_size} individuals carry type A)"
    )]
    DidNotConverge {
        max_generations: u64,
        type_a: usize,
        pop_size: usize,
    },
}

impl SimulationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

/// Errors raised by the JSON fixation data store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file was created for a different model, population size, p0 or
    /// selection mode.
    #[error("File {path} holds hyperparameters {found} but {expected} were requested")]
    HyperparameterMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

/// Errors raised while loading a [`Configuration`](crate::simulation::Configuration).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] SimulationError),
}
