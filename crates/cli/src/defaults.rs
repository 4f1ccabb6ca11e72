//! Shared default values for the command-line flags.
//! These values are used when neither a flag nor a configuration file sets them.

pub const POPULATION_SIZE: usize = 100;

// Offspring distribution
pub const ALPHA: f64 = 1.5;
pub const BETA: f64 = 0.5;
pub const P0: f64 = 0.1;
pub const LAMBDA: f64 = 1.0;

// Selection
pub const SELECTION_STRENGTH: f64 = 1.0;

// Execution
pub const N_TRIALS: usize = 1000;
pub const INITIAL_TYPE_A: usize = 1;
pub const MAX_GENERATIONS: u64 = 1_000_000;

// Validation
pub const MAX_Z_SCORE: f64 = 3.0;
