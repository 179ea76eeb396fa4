//! Candidate polynomials and their genetic operators.
//!
//! Operators are pure: they take the random source explicitly and return new
//! individuals, leaving their operands untouched.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::EstimationError;

/// A candidate polynomial `c0 + c1*x + ... + c(k-1)*x^(k-1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndividualRepr")]
pub struct Individual {
    coefficients: Vec<f64>,
}

/// Unvalidated wire form of [`Individual`].
#[derive(Deserialize)]
struct IndividualRepr {
    coefficients: Vec<f64>,
}

impl TryFrom<IndividualRepr> for Individual {
    type Error = EstimationError;

    fn try_from(repr: IndividualRepr) -> Result<Self, Self::Error> {
        Self::new(repr.coefficients)
    }
}

impl Individual {
    /// Create from coefficients, lowest power first.
    pub fn new(coefficients: Vec<f64>) -> Result<Self, EstimationError> {
        if coefficients.is_empty() {
            return Err(EstimationError::EmptyCoefficients);
        }
        Ok(Self { coefficients })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Highest power represented.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate the polynomial at `x`.
    ///
    /// Accumulates successive powers rather than calling `powi`; tests rely on
    /// this exact operation order.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        let mut result = 0.0;
        let mut power = 1.0;
        for &c in &self.coefficients {
            result += c * power;
            power *= x;
        }
        result
    }

    /// Uniform crossover producing two complementary children.
    ///
    /// For every gene a fair coin decides which parent feeds the first child;
    /// the other parent's gene goes to the second child.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Individual,
        rng: &mut R,
    ) -> Result<(Individual, Individual), EstimationError> {
        if other.len() != self.len() {
            return Err(EstimationError::DimensionMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }

        let mut first = Vec::with_capacity(self.len());
        let mut second = Vec::with_capacity(self.len());
        for (&a, &b) in self.coefficients.iter().zip(&other.coefficients) {
            if rng.gen_bool(0.5) {
                first.push(a);
                second.push(b);
            } else {
                first.push(b);
                second.push(a);
            }
        }

        Ok((
            Individual {
                coefficients: first,
            },
            Individual {
                coefficients: second,
            },
        ))
    }

    /// Perturb every coefficient by an independent offset in `[-delta_max, delta_max]`.
    pub fn mutate<R: Rng + ?Sized>(&self, delta_max: f64, rng: &mut R) -> Individual {
        let coefficients = self
            .coefficients
            .iter()
            .map(|&c| {
                let t: f64 = rng.r#gen();
                c + delta_max * (2.0 * t - 1.0)
            })
            .collect();
        Individual { coefficients }
    }
}

impl fmt::Display for Individual {
    /// Highest power first, e.g. `5 * x^3 + 10 * x^2 + 2 * x^1 + 3 * x^0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (power, c) in self.coefficients.iter().enumerate().rev() {
            write!(f, "{c} * x^{power}")?;
            if power != 0 {
                f.write_str(" + ")?;
            }
        }
        Ok(())
    }
}

/// An individual paired with its quadratic error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredIndividual {
    pub individual: Individual,
    /// Sum of squared residuals; lower is better.
    pub fitness: f64,
}
