//! Synthetic data generation for colgen.
//!
//! Everything here draws from a caller-supplied RNG, in a fixed order, so a
//! seed and a set of sizes fully determine every table and predicate:
//! - [`ZipfianDistribution`]: skewed join keys
//! - [`TableBuilder`]: uniform, skewed, constant, sequential and derived columns
//! - [`SelectivityPlanner`]: predicate bounds from a target selectivity
//! - [`IndexDataset`] / [`JoinDataset`]: the two canonical fixtures

mod builder;
mod datasets;
mod error;
mod planner;
mod zipf;

pub use builder::TableBuilder;
pub use datasets::{IndexDataset, JoinDataset, JoinSizes, DB};
pub use error::{DataGenError, DataGenResult};
pub use planner::SelectivityPlanner;
pub use zipf::ZipfianDistribution;
