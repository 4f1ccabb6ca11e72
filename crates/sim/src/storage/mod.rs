//! Storage module for persisting fixation data.
//!
//! This module provides JSON recording of signed fixation times per parameter
//! set, allowing batches to be accumulated across runs and analysed afterwards.

mod store;
pub mod types;

pub use store::FixationDataStore;
pub use types::{FixationSet, Hyperparameters, ParameterGrid};
