//! Compute module - Sampling, genetic operators, and the estimator.

mod estimator;
mod fitness;
mod individual;
mod sampler;

pub use estimator::*;
pub use fitness::*;
pub use individual::*;
pub use sampler::*;

use crate::schema::ConfigError;

/// Errors raised while building or running an estimator.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("Invalid evolution config: {0}")]
    Config(#[from] ConfigError),

    #[error("Expected min < max with finite bounds, got [{min}, {max}]")]
    InvalidDomain { min: f64, max: f64 },

    #[error("At least 2 samples are required, got {0}")]
    InvalidSampleCount(usize),

    #[error("Initial coefficients must not be empty")]
    EmptyCoefficients,

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Mutation schedule returned {delta} at iteration {iteration}")]
    InvalidMutationDelta { iteration: u64, delta: f64 },

    #[error("Target function is not finite at x = {x} (got {y})")]
    NonFiniteSample { x: f64, y: f64 },
}
