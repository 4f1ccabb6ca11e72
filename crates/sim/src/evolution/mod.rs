//! Evolutionary operators of a Cannings generation.
//!
//! - **Offspring**: per-individual offspring-count distributions (power law, Poisson)
//! - **Selection**: fecundity or viability advantage of type A
//! - **Reproduction**: offspring pooling and survivor sampling

pub mod offspring;
pub mod reproduction;
pub mod selection;

pub use offspring::{OffspringDistribution, PoissonOffspring, PowerLaw};
pub use reproduction::{sample_survivors, OffspringPool, Reproduction, StepReport, Survivors};
pub use selection::{Selection, SelectionMode};
