use std::sync::Arc;
use std::time::Instant;

use iznet::batch::create_batch_evaluator;
use iznet::evaluator::Evaluator;
use iznet::params::TechnicalParams;
use iznet::translator::DirectTranslator;
use rand::{distributions::Uniform, prelude::Distribution, rngs::StdRng, SeedableRng};
use statrs::statistics::Statistics;

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() {
    let scenario = scenario_params::get_scenario_params();
    let evaluator = Evaluator::new(scenario.trials, scenario.eval).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let weight_jitter = Uniform::new(-5.0, 5.0);

    let population: Vec<_> = (0..500)
        .map(|genome_id| {
            let mut genome = scenario.network.clone();
            for synapse in &mut genome.synapses {
                synapse.weight += weight_jitter.sample(&mut rng);
            }
            (genome_id, genome)
        })
        .collect();

    let num_genomes = population.len();

    let technical_params = TechnicalParams {
        num_threads: None,
        pin_threads: false,
    };

    let mut batch = create_batch_evaluator(
        Arc::new(DirectTranslator),
        evaluator,
        technical_params,
    )
    .unwrap();

    eprintln!("Workers: {}", batch.num_workers());

    let wall_start = Instant::now();
    let results = batch.evaluate(population);
    let wall_time = wall_start.elapsed();

    let fitness_values: Vec<f64> = results
        .iter()
        .filter_map(|(_, result)| result.as_ref().ok())
        .map(|simulation_result| simulation_result.fitness())
        .collect();

    let best = fitness_values
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    eprintln!(
        "Evaluations per second: {:.1} ({:.3} ms per genome)",
        num_genomes as f64 / wall_time.as_secs_f64(),
        wall_time.as_secs_f64() * 1e3 / num_genomes as f64
    );
    eprintln!(
        "Fitness mean: {:.4}, std dev: {:.4}",
        fitness_values.iter().mean(),
        fitness_values.iter().std_dev()
    );
    eprintln!("Best fitness: {:.4}", best);
}
