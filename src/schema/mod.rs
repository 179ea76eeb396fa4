//! Schema module - Evolution configuration for the estimator.

mod evolution;

pub use evolution::*;
