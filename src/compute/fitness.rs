//! Quadratic error of candidate polynomials against the reference samples.

use super::EstimationError;
use super::individual::{Individual, ScoredIndividual};
use super::sampler::SampleSet;

/// Scores individuals against a fixed sample set.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    samples: SampleSet,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(samples: SampleSet) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// Sum of squared residuals of `individual` over every sample.
    pub fn score(&self, individual: &Individual) -> f64 {
        self.samples
            .samples()
            .iter()
            .map(|s| {
                let difference = individual.evaluate(s.x) - s.y;
                difference * difference
            })
            .sum()
    }

    /// Sum of squared residuals of precomputed curve values, one per sample.
    pub fn score_values(&self, values: &[f64]) -> Result<f64, EstimationError> {
        if values.len() != self.samples.len() {
            return Err(EstimationError::DimensionMismatch {
                expected: self.samples.len(),
                found: values.len(),
            });
        }

        Ok(values
            .iter()
            .zip(self.samples.ys())
            .map(|(v, y)| {
                let difference = v - y;
                difference * difference
            })
            .sum())
    }

    /// Pair an individual with its score.
    pub fn scored(&self, individual: Individual) -> ScoredIndividual {
        let fitness = self.score(&individual);
        ScoredIndividual {
            individual,
            fitness,
        }
    }

    /// Convert a summed error into a per-sample mean.
    #[inline]
    pub fn mean_error(&self, fitness: f64) -> f64 {
        fitness / self.samples.len() as f64
    }
}
