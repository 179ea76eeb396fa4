//! Evolution configuration types for genetic polynomial estimation.
//!
//! [`EvolutionParams`] is the serializable description loaded from JSON;
//! [`EvolutionConfig`] is the validated, immutable bundle the estimator reads.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Mutation magnitude closure: iteration number to maximum coefficient offset.
#[derive(Clone)]
pub struct ScheduleFn(Arc<dyn Fn(u64) -> f64 + Send + Sync>);

impl ScheduleFn {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(u64) -> f64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    fn call(&self, iteration: u64) -> f64 {
        (self.0)(iteration)
    }
}

impl fmt::Debug for ScheduleFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScheduleFn(..)")
    }
}

/// Maximum mutation offset as a function of the iteration number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MutationSchedule {
    /// Same delta for every iteration.
    Constant { delta: f64 },
    /// `scale / (1 + e^(-rate * iteration))`.
    Logistic { scale: f64, rate: f64 },
    /// `initial * e^(-decay * iteration)`.
    ExponentialDecay { initial: f64, decay: f64 },
    /// Arbitrary caller-supplied schedule (not serializable).
    #[serde(skip)]
    Custom(ScheduleFn),
}

impl Default for MutationSchedule {
    fn default() -> Self {
        Self::Logistic {
            scale: 0.01,
            rate: 0.01,
        }
    }
}

impl MutationSchedule {
    /// Build a schedule from a closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(ScheduleFn::new(f))
    }

    /// Raw schedule value at `iteration`, unchecked.
    pub fn evaluate(&self, iteration: u64) -> f64 {
        // Iteration counts beyond 2^53 lose precision; irrelevant for any schedule in practice.
        let t = iteration as f64;
        match self {
            Self::Constant { delta } => *delta,
            Self::Logistic { scale, rate } => scale / (1.0 + (-rate * t).exp()),
            Self::ExponentialDecay { initial, decay } => initial * (-decay * t).exp(),
            Self::Custom(f) => f.call(iteration),
        }
    }

    /// Check the parameters of the built-in variants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidSchedule(format!(
                    "{name} must be finite and non-negative, got {value}"
                )))
            }
        };

        match self {
            Self::Constant { delta } => check("delta", *delta),
            Self::Logistic { scale, rate } => {
                check("scale", *scale)?;
                if rate.is_finite() {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidSchedule(format!(
                        "rate must be finite, got {rate}"
                    )))
                }
            }
            Self::ExponentialDecay { initial, decay } => {
                check("initial", *initial)?;
                check("decay", *decay)
            }
            // Custom schedules are checked per call by the estimator.
            Self::Custom(_) => Ok(()),
        }
    }
}

/// Serializable evolution parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionParams {
    /// Maximum number of individuals kept after selection.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Probability that a given pair recombines in a cycle (0.0-1.0).
    #[serde(default = "default_crossover_probability")]
    pub crossover_probability: f64,
    /// Probability that a given member mutates in a cycle (0.0-1.0).
    #[serde(default = "default_mutation_probability")]
    pub mutation_probability: f64,
    /// Maximum mutation offset per iteration.
    #[serde(default)]
    pub mutation_schedule: MutationSchedule,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            crossover_probability: default_crossover_probability(),
            mutation_probability: default_mutation_probability(),
            mutation_schedule: MutationSchedule::default(),
        }
    }
}

fn default_population_size() -> usize {
    50
}
fn default_crossover_probability() -> f64 {
    0.01
}
fn default_mutation_probability() -> f64 {
    0.01
}

impl EvolutionParams {
    /// Parse parameters from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read parameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Validated, immutable evolution configuration.
#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    population_size: usize,
    crossover_probability: f64,
    mutation_probability: f64,
    mutation_schedule: MutationSchedule,
}

impl EvolutionConfig {
    /// Create and validate a configuration.
    pub fn new(
        population_size: usize,
        crossover_probability: f64,
        mutation_probability: f64,
        mutation_schedule: MutationSchedule,
    ) -> Result<Self, ConfigError> {
        if population_size <= 1 {
            return Err(ConfigError::InvalidPopulationSize(population_size));
        }
        check_probability("crossover_probability", crossover_probability)?;
        check_probability("mutation_probability", mutation_probability)?;
        mutation_schedule.validate()?;

        Ok(Self {
            population_size,
            crossover_probability,
            mutation_probability,
            mutation_schedule,
        })
    }

    /// Start a builder with no fields set.
    pub fn builder() -> EvolutionConfigBuilder {
        EvolutionConfigBuilder::default()
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn mutation_schedule(&self) -> &MutationSchedule {
        &self.mutation_schedule
    }

    /// Schedule value at `iteration`.
    #[inline]
    pub fn mutation_delta(&self, iteration: u64) -> f64 {
        self.mutation_schedule.evaluate(iteration)
    }
}

impl TryFrom<EvolutionParams> for EvolutionConfig {
    type Error = ConfigError;

    fn try_from(params: EvolutionParams) -> Result<Self, Self::Error> {
        Self::new(
            params.population_size,
            params.crossover_probability,
            params.mutation_probability,
            params.mutation_schedule,
        )
    }
}

/// Builder for [`EvolutionConfig`]; every field is required.
#[derive(Debug, Clone, Default)]
pub struct EvolutionConfigBuilder {
    population_size: Option<usize>,
    crossover_probability: Option<f64>,
    mutation_probability: Option<f64>,
    mutation_schedule: Option<MutationSchedule>,
}

impl EvolutionConfigBuilder {
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    pub fn crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = Some(probability);
        self
    }

    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = Some(probability);
        self
    }

    pub fn mutation_schedule(mut self, schedule: MutationSchedule) -> Self {
        self.mutation_schedule = Some(schedule);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<EvolutionConfig, ConfigError> {
        EvolutionConfig::new(
            self.population_size
                .ok_or(ConfigError::MissingArgument("population_size"))?,
            self.crossover_probability
                .ok_or(ConfigError::MissingArgument("crossover_probability"))?,
            self.mutation_probability
                .ok_or(ConfigError::MissingArgument("mutation_probability"))?,
            self.mutation_schedule
                .ok_or(ConfigError::MissingArgument("mutation_schedule"))?,
        )
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // Written so that NaN fails.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be greater than 1, got {0}")]
    InvalidPopulationSize(usize),
    #[error("'{name}' must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("'{0}' is required")]
    MissingArgument(&'static str),
    #[error("Invalid mutation schedule: {0}")]
    InvalidSchedule(String),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_params_valid() {
        let config = EvolutionConfig::try_from(EvolutionParams::default()).unwrap();
        assert_eq!(config.population_size(), 50);
        assert_eq!(config.crossover_probability(), 0.01);
        assert_eq!(config.mutation_probability(), 0.01);
    }

    #[test]
    fn test_population_size_must_exceed_one() {
        for size in [0, 1] {
            let err = EvolutionConfig::new(size, 0.5, 0.5, MutationSchedule::default());
            assert!(matches!(err, Err(ConfigError::InvalidPopulationSize(s)) if s == size));
        }
        assert!(EvolutionConfig::new(2, 0.5, 0.5, MutationSchedule::default()).is_ok());
    }

    #[test]
    fn test_probability_bounds() {
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let err = EvolutionConfig::new(10, bad, 0.5, MutationSchedule::default());
            assert!(matches!(
                err,
                Err(ConfigError::InvalidProbability {
                    name: "crossover_probability",
                    ..
                })
            ));
            let err = EvolutionConfig::new(10, 0.5, bad, MutationSchedule::default());
            assert!(matches!(
                err,
                Err(ConfigError::InvalidProbability {
                    name: "mutation_probability",
                    ..
                })
            ));
        }
        assert!(EvolutionConfig::new(10, 0.0, 1.0, MutationSchedule::default()).is_ok());
    }

    #[test]
    fn test_builder_requires_schedule() {
        let err = EvolutionConfig::builder()
            .population_size(10)
            .crossover_probability(0.1)
            .mutation_probability(0.1)
            .build();
        assert!(matches!(
            err,
            Err(ConfigError::MissingArgument("mutation_schedule"))
        ));

        let config = EvolutionConfig::builder()
            .population_size(10)
            .crossover_probability(0.1)
            .mutation_probability(0.1)
            .mutation_schedule(MutationSchedule::Constant { delta: 0.5 })
            .build()
            .unwrap();
        assert_eq!(config.mutation_delta(7), 0.5);
    }

    #[test]
    fn test_logistic_schedule() {
        let schedule = MutationSchedule::default();
        assert!((schedule.evaluate(0) - 0.005).abs() < 1e-12);
        // Approaches the scale as iterations grow.
        assert!((schedule.evaluate(10_000) - 0.01).abs() < 1e-9);
        assert!(schedule.evaluate(100) > schedule.evaluate(10));
    }

    #[test]
    fn test_exponential_decay_schedule() {
        let schedule = MutationSchedule::ExponentialDecay {
            initial: 1.0,
            decay: 0.5,
        };
        assert_eq!(schedule.evaluate(0), 1.0);
        assert!((schedule.evaluate(2) - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_custom_schedule() {
        let schedule = MutationSchedule::custom(|i| 1.0 / (i as f64 + 1.0));
        assert_eq!(schedule.evaluate(0), 1.0);
        assert_eq!(schedule.evaluate(3), 0.25);
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_invalid_schedule_parameters() {
        let schedules = [
            MutationSchedule::Constant { delta: -1.0 },
            MutationSchedule::Logistic {
                scale: f64::NAN,
                rate: 0.1,
            },
            MutationSchedule::Logistic {
                scale: 0.1,
                rate: f64::INFINITY,
            },
            MutationSchedule::ExponentialDecay {
                initial: 1.0,
                decay: -0.1,
            },
        ];
        for schedule in schedules {
            assert!(matches!(
                EvolutionConfig::new(10, 0.1, 0.1, schedule),
                Err(ConfigError::InvalidSchedule(_))
            ));
        }
    }

    #[test]
    fn test_params_from_json_defaults() {
        let params =
            EvolutionParams::from_json_str(r#"{ "population_size": 12 }"#).unwrap();
        assert_eq!(params.population_size, 12);
        assert_eq!(params.crossover_probability, 0.01);
        assert!(matches!(
            params.mutation_schedule,
            MutationSchedule::Logistic { .. }
        ));
    }

    #[test]
    fn test_params_schedule_tagged() {
        let params = EvolutionParams::from_json_str(
            r#"{ "mutation_schedule": { "type": "Constant", "delta": 0.25 } }"#,
        )
        .unwrap();
        assert_eq!(params.mutation_schedule.evaluate(99), 0.25);
    }

    #[test]
    fn test_params_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "population_size": 30, "mutation_probability": 0.2 }}"#
        )
        .unwrap();

        let params = EvolutionParams::from_json_file(file.path()).unwrap();
        assert_eq!(params.population_size, 30);
        assert_eq!(params.mutation_probability, 0.2);
    }

    #[test]
    fn test_params_parse_error() {
        assert!(matches!(
            EvolutionParams::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EvolutionParams::from_json_file("/nonexistent/params.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let params = EvolutionParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let parsed = EvolutionParams::from_json_str(&json).unwrap();
        assert_eq!(parsed.population_size, params.population_size);
    }

    #[test]
    fn test_custom_schedule_not_serializable() {
        let params = EvolutionParams {
            mutation_schedule: MutationSchedule::custom(|_| 0.0),
            ..Default::default()
        };
        assert!(serde_json::to_string(&params).is_err());
    }
}
