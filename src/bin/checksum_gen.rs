use iznet::evaluator::Evaluator;
use iznet::network::create_network;

#[path = "../scenario_params.rs"]
mod scenario_params;

fn main() {
    let mut scenario = scenario_params::get_scenario_params();
    scenario.eval.record_traces = true;

    let evaluator = Evaluator::new(scenario.trials, scenario.eval).unwrap();
    let mut network = create_network(scenario.network).unwrap();

    let result = evaluator.simulate(&mut network).unwrap();

    println!("fitness: {}", result.fitness());

    let mut potential_checksum = 0.0;
    for trial in &result.trials {
        println!(
            "...inputs {:?}: response {}, expected {}",
            trial.inputs, trial.response, trial.expected
        );

        if let Some(trace) = &trial.trace {
            for neuron_trace in &trace.neuron_traces {
                for sample in &neuron_trace.samples {
                    potential_checksum += sample.potential;
                }
            }
        }
    }

    println!("potential checksum: {}", potential_checksum);

    let records: Vec<_> = result
        .trials
        .iter()
        .map(|trial| (&trial.inputs, trial.response, &trial.first_spikes))
        .collect();

    println!(
        "first spike records: {}",
        serde_json::to_string_pretty(&records).unwrap()
    );
}
