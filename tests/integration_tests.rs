use std::sync::Arc;

use float_cmp::assert_approx_eq;
use itertools::assert_equal;
use iznet::{
    batch::create_batch_evaluator,
    evaluator::Evaluator,
    network::create_network,
    params::{
        EvalParams, NetworkParams, NeuronDef, NeuronPreset, NeuronRole, Synapse, TechnicalParams,
        TrialParams,
    },
    translator::{DirectTranslator, Translator},
};
use rand::{distributions::Uniform, prelude::Distribution, rngs::StdRng, SeedableRng};

fn neuron_def(id: usize, role: NeuronRole, bias: f64) -> NeuronDef {
    NeuronDef {
        id,
        role,
        preset: NeuronPreset::FastSpiking,
        bias,
    }
}

fn synapse(source_id: usize, target_id: usize, weight: f64) -> Synapse {
    Synapse {
        source_id,
        target_id,
        weight,
    }
}

/// A pacemaker hidden neuron kicks both outputs; active inputs spike in
/// lockstep with the pacemaker and cancel its kick on output 4, so that
/// output goes silent exactly when both inputs are driven.
fn xor_network() -> NetworkParams {
    NetworkParams {
        neurons: vec![
            neuron_def(0, NeuronRole::Input, 0.0),
            neuron_def(1, NeuronRole::Input, 0.0),
            neuron_def(2, NeuronRole::Hidden, 10.0),
            neuron_def(3, NeuronRole::Output, 0.0),
            neuron_def(4, NeuronRole::Output, 0.0),
        ],
        synapses: vec![
            synapse(2, 3, 100.0),
            synapse(2, 4, 100.0),
            synapse(0, 4, -50.0),
            synapse(1, 4, -50.0),
        ],
    }
}

/// The classic exclusive-or relation; logic-true is driven at 10.0 because
/// unit currents sit below the firing threshold of the neuron model.
fn xor_trials() -> Vec<TrialParams> {
    vec![
        TrialParams {
            inputs: vec![0.0, 0.0],
            expected: 0.0,
        },
        TrialParams {
            inputs: vec![0.0, 10.0],
            expected: 1.0,
        },
        TrialParams {
            inputs: vec![10.0, 0.0],
            expected: 1.0,
        },
        TrialParams {
            inputs: vec![10.0, 10.0],
            expected: 0.0,
        },
    ]
}

#[test]
fn xor_end_to_end() {
    let evaluator = Evaluator::new(xor_trials(), EvalParams::default()).unwrap();
    let mut network = create_network(xor_network()).unwrap();

    let result = evaluator.simulate(&mut network).unwrap();
    assert_eq!(result.trials.len(), 4);

    // both inputs silent: the pacemaker drives both outputs identically, so
    // they fire in the same step
    let quiet_trial = &result.trials[0];
    assert_approx_eq!(f64, quiet_trial.response, 1.0);
    let spike_0 = quiet_trial.first_spikes[0].unwrap();
    let spike_1 = quiet_trial.first_spikes[1].unwrap();
    assert_eq!(spike_0.neuron_id, 3);
    assert_eq!(spike_1.neuron_id, 4);
    assert_eq!(spike_0.simulated_time, spike_1.simulated_time);

    // both inputs driven: the pacemaker kick on output 4 is cancelled, so
    // only output 3 ever fires
    let driven_trial = &result.trials[3];
    assert_approx_eq!(f64, driven_trial.response, -1.0);
    assert!(driven_trial.first_spikes[0].is_some());
    assert!(driven_trial.first_spikes[1].is_none());

    // the single-driven rows are mirror images of each other
    assert_eq!(result.trials[1].response, result.trials[2].response);

    let expected_error: f64 = result
        .trials
        .iter()
        .map(|trial| (trial.response - trial.expected) * (trial.response - trial.expected))
        .sum();
    assert_approx_eq!(f64, result.sum_squared_error, expected_error);
    assert_approx_eq!(f64, result.fitness(), 1.0 - expected_error);

    // rows 0 and 3 alone contribute an error of 2, so the fitness must have
    // gone negative and stayed unclamped
    assert!(result.fitness() < 0.0);
}

#[test]
fn repeated_runs_are_bit_identical() {
    let mut eval_params = EvalParams::default();
    eval_params.record_traces = true;
    let evaluator = Evaluator::new(xor_trials(), eval_params).unwrap();

    let mut first_network = create_network(xor_network()).unwrap();
    let mut second_network = create_network(xor_network()).unwrap();

    let first = evaluator.simulate(&mut first_network).unwrap();
    let second = evaluator.simulate(&mut second_network).unwrap();

    assert_eq!(first, second);
}

#[test]
fn network_reuse_matches_fresh_network() {
    let evaluator = Evaluator::new(xor_trials(), EvalParams::default()).unwrap();
    let mut network = create_network(xor_network()).unwrap();

    let first = evaluator.simulate(&mut network).unwrap();
    let second = evaluator.simulate(&mut network).unwrap();

    assert_eq!(first, second);
}

#[test]
fn parallel_batch_matches_serial_evaluation() {
    let evaluator = Evaluator::new(xor_trials(), EvalParams::default()).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let weight_jitter = Uniform::new(-10.0, 10.0);

    let population: Vec<(usize, NetworkParams)> = (0..16)
        .map(|genome_id| {
            let mut genome = xor_network();
            for synapse in &mut genome.synapses {
                synapse.weight += weight_jitter.sample(&mut rng);
            }
            (genome_id, genome)
        })
        .collect();

    let serial_fitness: Vec<f64> = population
        .iter()
        .map(|(_, genome)| {
            let mut network = DirectTranslator.translate(genome).unwrap();
            evaluator.simulate(&mut network).unwrap().fitness()
        })
        .collect();

    let technical_params = TechnicalParams {
        num_threads: None,
        pin_threads: false,
    };
    let mut batch =
        create_batch_evaluator(Arc::new(DirectTranslator), evaluator, technical_params).unwrap();

    let batch_fitness: Vec<f64> = batch
        .evaluate(population)
        .into_iter()
        .map(|(_, result)| result.unwrap().fitness())
        .collect();

    assert_equal(batch_fitness, serial_fitness);
}
