//! Quick estimation performance test

use std::sync::Arc;
use std::time::Instant;

use genetic_polyfit::{
    compute::{Domain, PolynomialEstimator},
    schema::{EvolutionConfig, MutationSchedule},
};

fn main() {
    println!("=== Estimation Performance Test ===\n");

    let target = |x: f64| x * x * x * 5.0 + x * x * 10.0 + x * 2.0 + 3.0;
    let domain = Domain::new(-5.0, 5.0).expect("valid domain");

    // Test different population sizes
    for pop_size in [10, 25, 50, 100] {
        let config = Arc::new(
            EvolutionConfig::new(
                pop_size,
                0.01,
                0.01,
                MutationSchedule::Logistic {
                    scale: 0.01,
                    rate: 0.01,
                },
            )
            .expect("valid config"),
        );

        let mut estimator = PolynomialEstimator::with_seed(
            target,
            domain,
            20,
            vec![0.1, 0.05, 0.025, 0.00125],
            config,
            42,
        )
        .expect("valid estimator");

        let start = Instant::now();
        let result = estimator.run_until(1e-5, 20_000).expect("run succeeds");
        let elapsed = start.elapsed();

        println!("Population {}:", pop_size);
        println!("  Cycles:         {}", result.cycles);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!(
            "  Cycles/sec:     {:.1}",
            result.cycles as f64 / elapsed.as_secs_f64()
        );
        println!("  Mean error:     {:e}", result.best.mean_error);
        println!("  Stop reason:    {:?}", result.stop_reason);
        println!();
    }
}
