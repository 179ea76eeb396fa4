//! Generational genetic estimator of polynomial coefficients.
//!
//! Each cycle runs three phases in a fixed order:
//!
//! 1. **Selection**: stable sort by fitness, truncate to the configured size.
//! 2. **Crossover**: every unordered pair of survivors recombines with the
//!    configured probability; both children are scored and appended.
//! 3. **Mutation**: every member is replaced by a mutated copy with the
//!    configured probability, using the schedule delta for the current
//!    iteration.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::schema::EvolutionConfig;

use super::EstimationError;
use super::fitness::FitnessEvaluator;
use super::individual::{Individual, ScoredIndividual};
use super::sampler::{Domain, SampleSet};

/// Lifecycle phase of an estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorPhase {
    /// Initial population seeded, no cycle run yet.
    Seeded,
    /// At least one cycle has completed.
    Cycling,
}

/// Best individual together with its errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub individual: Individual,
    /// Summed squared error.
    pub fitness: f64,
    /// Summed squared error divided by the sample count.
    pub mean_error: f64,
}

/// Snapshot of the estimator state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationProgress {
    pub iteration: u64,
    pub phase: EstimatorPhase,
    pub population_size: usize,
    /// Current population champion.
    pub best: Estimate,
    /// Lowest mean error seen so far.
    pub best_so_far_error: f64,
    /// Mean error averaged over the population.
    pub avg_mean_error: f64,
}

/// Why a driven run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Best mean error reached the threshold.
    TargetReached,
    /// Cycle cap hit first.
    MaxCycles,
}

/// Outcome of [`PolynomialEstimator::run_until`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationResult {
    pub best: Estimate,
    /// Cycles executed by this run.
    pub cycles: u64,
    pub stop_reason: StopReason,
}

/// Genetic estimator owning the population and its random source.
pub struct PolynomialEstimator<R = StdRng> {
    config: Arc<EvolutionConfig>,
    evaluator: FitnessEvaluator,
    population: Vec<ScoredIndividual>,
    best_so_far: ScoredIndividual,
    iteration: u64,
    phase: EstimatorPhase,
    rng: R,
}

impl PolynomialEstimator<StdRng> {
    /// Create an estimator with a reproducible generator.
    pub fn with_seed<F>(
        target: F,
        domain: Domain,
        sample_count: usize,
        initial_coefficients: Vec<f64>,
        config: Arc<EvolutionConfig>,
        seed: u64,
    ) -> Result<Self, EstimationError>
    where
        F: Fn(f64) -> f64,
    {
        Self::new(
            target,
            domain,
            sample_count,
            initial_coefficients,
            config,
            StdRng::seed_from_u64(seed),
        )
    }

    /// Create an estimator seeded from system entropy.
    pub fn from_entropy<F>(
        target: F,
        domain: Domain,
        sample_count: usize,
        initial_coefficients: Vec<f64>,
        config: Arc<EvolutionConfig>,
    ) -> Result<Self, EstimationError>
    where
        F: Fn(f64) -> f64,
    {
        Self::new(
            target,
            domain,
            sample_count,
            initial_coefficients,
            config,
            StdRng::from_entropy(),
        )
    }
}

impl<R: Rng> PolynomialEstimator<R> {
    /// Sample `target`, then seed the population by mutating the individual
    /// built from `initial_coefficients` with the iteration-0 delta.
    pub fn new<F>(
        target: F,
        domain: Domain,
        sample_count: usize,
        initial_coefficients: Vec<f64>,
        config: Arc<EvolutionConfig>,
        mut rng: R,
    ) -> Result<Self, EstimationError>
    where
        F: Fn(f64) -> f64,
    {
        let samples = SampleSet::from_function(target, domain, sample_count)?;
        let evaluator = FitnessEvaluator::new(samples);
        let reference = Individual::new(initial_coefficients)?;
        let delta = checked_delta(&config, 0)?;

        let mut population: Vec<ScoredIndividual> = (0..config.population_size())
            .map(|_| evaluator.scored(reference.mutate(delta, &mut rng)))
            .collect();
        sort_by_fitness(&mut population);

        // population_size > 1 is guaranteed by the config.
        let best_so_far = population[0].clone();

        log::info!(
            "seeded {} individuals of {} coefficients over [{}, {}] with {} samples, best mean error {:e}",
            population.len(),
            reference.len(),
            domain.min(),
            domain.max(),
            evaluator.samples().len(),
            evaluator.mean_error(best_so_far.fitness),
        );

        Ok(Self {
            config,
            evaluator,
            population,
            best_so_far,
            iteration: 1,
            phase: EstimatorPhase::Seeded,
            rng,
        })
    }

    /// Run one selection, crossover and mutation cycle.
    ///
    /// On error the estimator is left exactly as it was.
    pub fn run_one_cycle(&mut self) -> Result<(), EstimationError> {
        let delta = checked_delta(&self.config, self.iteration)?;

        let mut next = self.population.clone();
        let mut best = self.best_so_far.clone();
        self.select(&mut next);
        let crossovers = self.crossover(&mut next, &mut best)?;
        let mutations = self.mutate(&mut next, delta, &mut best);

        log::debug!(
            "iteration {}: population {}, {} crossovers, {} mutations (delta {:e}), best mean error {:e}",
            self.iteration,
            next.len(),
            crossovers,
            mutations,
            delta,
            self.evaluator.mean_error(best.fitness),
        );

        self.population = next;
        self.best_so_far = best;
        self.iteration += 1;
        self.phase = EstimatorPhase::Cycling;
        Ok(())
    }

    /// Elitist truncation selection.
    fn select(&self, population: &mut Vec<ScoredIndividual>) {
        sort_by_fitness(population);
        population.truncate(self.config.population_size());
    }

    /// Pairwise crossover among the current members; children are appended.
    fn crossover(
        &mut self,
        population: &mut Vec<ScoredIndividual>,
        best: &mut ScoredIndividual,
    ) -> Result<usize, EstimationError> {
        let parents = population.len();
        let probability = self.config.crossover_probability();
        let mut crossovers = 0;

        for i in 0..parents {
            for j in (i + 1)..parents {
                if self.rng.r#gen::<f64>() <= probability {
                    let (first, second) = population[i]
                        .individual
                        .crossover(&population[j].individual, &mut self.rng)?;
                    for child in [first, second] {
                        let scored = self.evaluator.scored(child);
                        keep_best(best, &scored);
                        population.push(scored);
                    }
                    crossovers += 1;
                }
            }
        }

        Ok(crossovers)
    }

    /// In-place mutation of randomly chosen members.
    fn mutate(
        &mut self,
        population: &mut [ScoredIndividual],
        delta: f64,
        best: &mut ScoredIndividual,
    ) -> usize {
        let probability = self.config.mutation_probability();
        let mut mutations = 0;

        for member in population.iter_mut() {
            if self.rng.r#gen::<f64>() <= probability {
                let mutated = member.individual.mutate(delta, &mut self.rng);
                *member = self.evaluator.scored(mutated);
                keep_best(best, member);
                mutations += 1;
            }
        }

        mutations
    }

    /// Drive cycles until the best mean error is at most `threshold` or
    /// `max_cycles` cycles have run.
    pub fn run_until(
        &mut self,
        threshold: f64,
        max_cycles: u64,
    ) -> Result<EstimationResult, EstimationError> {
        self.run_with_callback(threshold, max_cycles, |_| {})
    }

    /// Same as [`run_until`](Self::run_until), reporting progress before every cycle.
    pub fn run_with_callback<F>(
        &mut self,
        threshold: f64,
        max_cycles: u64,
        mut callback: F,
    ) -> Result<EstimationResult, EstimationError>
    where
        F: FnMut(&EstimationProgress),
    {
        let mut cycles = 0;
        let stop_reason = loop {
            callback(&self.progress());

            if self.best_individual().mean_error <= threshold {
                break StopReason::TargetReached;
            }
            if cycles >= max_cycles {
                break StopReason::MaxCycles;
            }

            self.run_one_cycle()?;
            cycles += 1;
        };

        let best = self.best_individual();
        log::info!(
            "stopped after {cycles} cycles ({stop_reason:?}) at iteration {}, mean error {:e}",
            self.iteration,
            best.mean_error,
        );

        Ok(EstimationResult {
            best,
            cycles,
            stop_reason,
        })
    }

    /// Lowest-fitness member of the current population, with its mean error.
    pub fn best_individual(&self) -> Estimate {
        // The population is never empty: seeding fills it and cycles only truncate to size > 1.
        let best = champion(&self.population).unwrap_or(&self.best_so_far);
        self.estimate(best)
    }

    /// Lowest-fitness individual ever scored by this estimator.
    pub fn best_so_far(&self) -> Estimate {
        self.estimate(&self.best_so_far)
    }

    fn estimate(&self, scored: &ScoredIndividual) -> Estimate {
        Estimate {
            individual: scored.individual.clone(),
            fitness: scored.fitness,
            mean_error: self.evaluator.mean_error(scored.fitness),
        }
    }

    /// Current state snapshot.
    pub fn progress(&self) -> EstimationProgress {
        let avg_fitness = self.population.iter().map(|m| m.fitness).sum::<f64>()
            / self.population.len().max(1) as f64;

        EstimationProgress {
            iteration: self.iteration,
            phase: self.phase,
            population_size: self.population.len(),
            best: self.best_individual(),
            best_so_far_error: self.evaluator.mean_error(self.best_so_far.fitness),
            avg_mean_error: self.evaluator.mean_error(avg_fitness),
        }
    }

    /// 1-based cycle counter.
    pub fn iteration_number(&self) -> u64 {
        self.iteration
    }

    pub fn phase(&self) -> EstimatorPhase {
        self.phase
    }

    pub fn population(&self) -> &[ScoredIndividual] {
        &self.population
    }

    pub fn samples(&self) -> &SampleSet {
        self.evaluator.samples()
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }
}

/// Stable ascending sort; equal fitness keeps insertion order.
fn sort_by_fitness(population: &mut [ScoredIndividual]) {
    population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
}

/// Replace `best` when `candidate` is strictly fitter.
fn keep_best(best: &mut ScoredIndividual, candidate: &ScoredIndividual) {
    if candidate.fitness.total_cmp(&best.fitness).is_lt() {
        *best = candidate.clone();
    }
}

/// First member with the lowest fitness.
fn champion(population: &[ScoredIndividual]) -> Option<&ScoredIndividual> {
    population
        .iter()
        .reduce(|best, m| if m.fitness.total_cmp(&best.fitness).is_lt() { m } else { best })
}

fn checked_delta(config: &EvolutionConfig, iteration: u64) -> Result<f64, EstimationError> {
    let delta = config.mutation_delta(iteration);
    if delta.is_finite() && delta >= 0.0 {
        Ok(delta)
    } else {
        Err(EstimationError::InvalidMutationDelta { iteration, delta })
    }
}
