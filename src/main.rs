//! Genetic polyfit CLI - Estimate a cubic from JSON evolution parameters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use genetic_polyfit::{
    compute::{Domain, PolynomialEstimator, StopReason},
    schema::{EvolutionConfig, EvolutionParams},
};

const DEFAULT_THRESHOLD: f64 = 1e-5;
const DEFAULT_MAX_CYCLES: u64 = 10_000_000;
const REPORT_INTERVAL: u64 = 10_000;

/// Function being estimated: 5x^3 + 10x^2 + 2x + 3.
fn target(x: f64) -> f64 {
    x * x * x * 5.0 + x * x * 10.0 + x * 2.0 + 3.0
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--help" || a == "-h") {
        eprintln!(
            "Usage: {} [params.json|-] [threshold] [max_cycles] [seed]",
            args[0]
        );
        eprintln!();
        eprintln!("Estimate f(x) = 5x^3 + 10x^2 + 2x + 3 over [-5, 5] with a genetic algorithm.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  params.json  Evolution parameters ('-' for defaults)");
        eprintln!("  threshold    Target mean quadratic error (default: {DEFAULT_THRESHOLD:e})");
        eprintln!("  max_cycles   Cycle cap (default: {DEFAULT_MAX_CYCLES})");
        eprintln!("  seed         Random seed (default: from entropy)");
        eprintln!();
        eprintln!("Example parameters are printed with the --example flag.");
        std::process::exit(1);
    }

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_params();
        return;
    }

    let params = match args.get(1).filter(|a| a.as_str() != "-") {
        Some(path) => EvolutionParams::from_json_file(PathBuf::from(path)).unwrap_or_else(|e| {
            eprintln!("Error loading parameters: {}", e);
            std::process::exit(1);
        }),
        None => EvolutionParams::default(),
    };
    let threshold: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_THRESHOLD);
    let max_cycles: u64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_CYCLES);
    let seed: Option<u64> = args.get(4).and_then(|s| s.parse().ok());

    let config = EvolutionConfig::try_from(params).unwrap_or_else(|e| {
        eprintln!("Invalid parameters: {}", e);
        std::process::exit(1);
    });

    println!("Genetic Polynomial Estimation");
    println!("=============================");
    println!("Population: {}", config.population_size());
    println!("Crossover probability: {}", config.crossover_probability());
    println!("Mutation probability: {}", config.mutation_probability());
    println!("Threshold: {threshold:e}");
    println!();

    let domain = Domain::new(-5.0, 5.0).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    let initial = vec![0.1, 0.05, 0.025, 0.00125];
    let config = Arc::new(config);

    let estimator = match seed {
        Some(seed) => PolynomialEstimator::with_seed(target, domain, 20, initial, config, seed),
        None => PolynomialEstimator::from_entropy(target, domain, 20, initial, config),
    };
    let mut estimator = estimator.unwrap_or_else(|e| {
        eprintln!("Error creating estimator: {}", e);
        std::process::exit(1);
    });

    let start = Instant::now();
    let result = estimator
        .run_with_callback(threshold, max_cycles, |progress| {
            if progress.iteration % REPORT_INTERVAL == 1 {
                println!(
                    "  Iteration {}: mean error={:e}, population={}",
                    progress.iteration, progress.best.mean_error, progress.population_size
                );
                println!("    Estimated function = {}", progress.best.individual);
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Estimation failed: {}", e);
            std::process::exit(1);
        });
    let elapsed = start.elapsed();

    println!();
    match result.stop_reason {
        StopReason::TargetReached => println!("Target reached after {} cycles", result.cycles),
        StopReason::MaxCycles => println!("Cycle cap of {} reached", result.cycles),
    }
    println!("Estimated function = {}", result.best.individual);
    println!("Average quadratic error = {:e}", result.best.mean_error);
    println!(
        "Time: {:.2}s ({:.1} cycles/s)",
        elapsed.as_secs_f32(),
        result.cycles as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_params() {
    let params = EvolutionParams::default();

    println!("Example parameters (params.json):");
    match serde_json::to_string_pretty(&params) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing parameters: {}", e),
    }
}
