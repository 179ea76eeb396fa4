//! Genetic polynomial estimation.
//!
//! This crate estimates the coefficients of a polynomial approximating an
//! arbitrary real function over a bounded interval, using a generational
//! genetic algorithm with elitist truncation selection, uniform two-child
//! crossover, and bounded uniform mutation.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Evolution parameters, mutation schedules, and validation
//! - `compute`: Sampling, individuals, fitness, and the estimator
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use genetic_polyfit::{
//!     compute::{Domain, PolynomialEstimator},
//!     schema::{EvolutionConfig, EvolutionParams},
//! };
//!
//! let config = Arc::new(EvolutionConfig::try_from(EvolutionParams::default())?);
//!
//! let mut estimator = PolynomialEstimator::with_seed(
//!     |x| x * x * x * 5.0 + x * x * 10.0 + x * 2.0 + 3.0,
//!     Domain::new(-5.0, 5.0)?,
//!     20,
//!     vec![0.1, 0.05, 0.025, 0.00125],
//!     config,
//!     42,
//! )?;
//!
//! while estimator.best_individual().mean_error > 1e-5 {
//!     estimator.run_one_cycle()?;
//! }
//!
//! println!("Estimated function = {}", estimator.best_individual().individual);
//! # Ok::<(), genetic_polyfit::EstimationError>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Domain, Estimate, EstimationError, Individual, PolynomialEstimator};
pub use schema::{EvolutionConfig, EvolutionParams, MutationSchedule};
