//! # Simulation Crate
//!
//! The `cannings-sim` crate provides the core logic for simulating fixation of an
//! allele in a Cannings model. It includes modules for offspring-number
//! distributions, selection and reproduction, the fixation driver and trial
//! runner, and JSON persistence of fixation times.

pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;
pub mod storage;
