//! Reference sampling of the target function.
//!
//! Samples sit on an evenly spaced grid that includes both endpoints, so two
//! estimators built from the same inputs always share the same sample set.

use serde::{Deserialize, Serialize};

use super::EstimationError;

/// Closed estimation interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DomainRepr")]
pub struct Domain {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct DomainRepr {
    min: f64,
    max: f64,
}

impl TryFrom<DomainRepr> for Domain {
    type Error = EstimationError;

    fn try_from(repr: DomainRepr) -> Result<Self, Self::Error> {
        Self::new(repr.min, repr.max)
    }
}

impl Domain {
    /// Create a domain. Requires finite bounds with `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self, EstimationError> {
        if !(min.is_finite() && max.is_finite() && max > min) {
            return Err(EstimationError::InvalidDomain { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// A single reference point of the target function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// Fixed, ordered set of reference samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleSetRepr")]
pub struct SampleSet {
    domain: Domain,
    samples: Vec<Sample>,
}

#[derive(Deserialize)]
struct SampleSetRepr {
    domain: Domain,
    samples: Vec<Sample>,
}

impl TryFrom<SampleSetRepr> for SampleSet {
    type Error = EstimationError;

    /// Same guarantees as [`SampleSet::from_function`]: at least 2 samples,
    /// all finite.
    fn try_from(repr: SampleSetRepr) -> Result<Self, Self::Error> {
        let SampleSetRepr { domain, samples } = repr;
        if samples.len() < 2 {
            return Err(EstimationError::InvalidSampleCount(samples.len()));
        }
        for &Sample { x, y } in &samples {
            if !(x.is_finite() && y.is_finite()) {
                return Err(EstimationError::NonFiniteSample { x, y });
            }
        }
        Ok(Self { domain, samples })
    }
}

impl SampleSet {
    /// Sample `target` at `count` evenly spaced points of `domain`.
    ///
    /// The target is called exactly once per point, in ascending x order.
    pub fn from_function<F>(target: F, domain: Domain, count: usize) -> Result<Self, EstimationError>
    where
        F: Fn(f64) -> f64,
    {
        if count < 2 {
            return Err(EstimationError::InvalidSampleCount(count));
        }

        let last = (count - 1) as f64;
        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            let x = domain.min + domain.width() * i as f64 / last;
            let y = target(x);
            if !y.is_finite() {
                return Err(EstimationError::NonFiniteSample { x, y });
            }
            samples.push(Sample { x, y });
        }

        Ok(Self { domain, samples })
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples (always at least 2).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_domain_validation() {
        assert!(Domain::new(-1.0, 1.0).is_ok());
        for (min, max) in [(1.0, 1.0), (2.0, 1.0), (f64::NAN, 1.0), (0.0, f64::INFINITY)] {
            assert!(matches!(
                Domain::new(min, max),
                Err(EstimationError::InvalidDomain { .. })
            ));
        }
    }

    #[test]
    fn test_evenly_spaced_inclusive() {
        let domain = Domain::new(-5.0, 5.0).unwrap();
        let set = SampleSet::from_function(|x| x * x, domain, 11).unwrap();

        assert_eq!(set.len(), 11);
        let xs: Vec<f64> = set.xs().collect();
        assert_eq!(xs.first(), Some(&-5.0));
        assert_eq!(xs.last(), Some(&5.0));
        for (i, x) in xs.iter().enumerate() {
            assert!((x - (-5.0 + i as f64)).abs() < 1e-12);
        }
        for s in set.samples() {
            assert_eq!(s.y, s.x * s.x);
        }
    }

    #[test]
    fn test_minimum_sample_count() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        for count in [0, 1] {
            assert!(matches!(
                SampleSet::from_function(|x| x, domain, count),
                Err(EstimationError::InvalidSampleCount(c)) if c == count
            ));
        }

        let set = SampleSet::from_function(|x| x, domain, 2).unwrap();
        let xs: Vec<f64> = set.xs().collect();
        assert_eq!(xs, vec![0.0, 1.0]);
    }

    #[test]
    fn test_target_called_once_per_point_in_order() {
        let calls = RefCell::new(Vec::new());
        let domain = Domain::new(0.0, 3.0).unwrap();
        SampleSet::from_function(
            |x| {
                calls.borrow_mut().push(x);
                x
            },
            domain,
            4,
        )
        .unwrap();

        assert_eq!(calls.into_inner(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Domain>(r#"{"min":1.0,"max":-1.0}"#).is_err());

        let empty = r#"{"domain":{"min":0.0,"max":1.0},"samples":[]}"#;
        assert!(serde_json::from_str::<SampleSet>(empty).is_err());

        let single = r#"{"domain":{"min":0.0,"max":1.0},"samples":[{"x":0.0,"y":0.0}]}"#;
        assert!(serde_json::from_str::<SampleSet>(single).is_err());

        let domain = Domain::new(-2.0, 2.0).unwrap();
        let set = SampleSet::from_function(|x| x * x, domain, 5).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(serde_json::from_str::<SampleSet>(&json).unwrap(), set);
    }

    #[test]
    fn test_non_finite_target_rejected() {
        let domain = Domain::new(-1.0, 1.0).unwrap();
        let err = SampleSet::from_function(|x| 1.0 / x, domain, 3);
        assert!(matches!(err, Err(EstimationError::NonFiniteSample { .. })));
    }
}
