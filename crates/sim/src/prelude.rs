//! Commonly used imports for convenience.
//!
//! This prelude module provides a convenient way to import the most commonly
//! used types of the library.
//!
//! # Example
//!
//! ```
//! use cannings_sim::prelude::*;
//!
//! let model = CanningsModel::schweinsberg(50, 1.5, 0.1, Selection::neutral()).unwrap();
//! let runner = TrialRunner::new(model, ExecutionConfig::new(10, 25, 100_000).with_seed(1)).unwrap();
//! assert_eq!(runner.run().len(), 10);
//! ```

pub use crate::errors::{self, ConfigError, SimulationError, StorageError};
pub use crate::evolution::{OffspringDistribution, Selection, SelectionMode};
pub use crate::simulation::{
    CanningsModel, Configuration, DistributionConfig, ExecutionConfig, FixationDriver,
    FixationOutcome, ModelConfig, Population, TrialBuilder, TrialRecord, TrialRunner,
    TrialStatistics,
};
pub use crate::storage::FixationDataStore;
