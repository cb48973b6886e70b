use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::network::Network;
use crate::params::{self, EvalParams, TrialParams};
use crate::trace::TrialTrace;

/// The decode compares the first-spike times of exactly two output neurons.
const NUM_DECODE_OUTPUTS: usize = 2;

/// First-spike observation for one output neuron. The sample is the one
/// preceding the step in which the spike was detected (a look-back of one
/// sample, matching the reference behavior).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeRecord {
    pub neuron_id: usize,
    pub simulated_time: f64,
    pub potential_at_spike: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub inputs: Vec<f64>,
    pub expected: f64,
    pub response: f64,
    pub first_spikes: Vec<Option<SpikeRecord>>,
    pub trace: Option<TrialTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub sum_squared_error: f64,
    pub trials: Vec<TrialRecord>,
}

impl SimulationResult {
    /// Higher is better; negative when every trial decodes to the worst-case
    /// response. Never clamped.
    pub fn fitness(&self) -> f64 {
        1.0 - self.sum_squared_error
    }
}

/// Decodes the network response from the two first-spike times. A missing
/// spike yields the worst-case response -1.0; otherwise equal times map to
/// 1.0, times 11 ms or more apart map to 0.0, linear in between.
pub fn compute_output(t0: Option<f64>, t1: Option<f64>) -> f64 {
    match (t0, t1) {
        (Some(t0), Some(t1)) => (1.1 - 0.1 * (t0 - t1).abs()).clamp(0.0, 1.0),
        _ => -1.0,
    }
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    trials: Vec<TrialParams>,
    eval_params: EvalParams,
}

impl Evaluator {
    pub fn new(trials: Vec<TrialParams>, eval_params: EvalParams) -> SimResult<Self> {
        params::validate_trial_params(&trials)?;
        params::validate_eval_params(&eval_params)?;

        Ok(Self {
            trials,
            eval_params,
        })
    }

    pub fn trials(&self) -> &[TrialParams] {
        &self.trials
    }

    pub fn eval_params(&self) -> EvalParams {
        self.eval_params
    }

    /// Runs the full trial battery against `network` and accumulates the
    /// squared decode error. The network shape is checked up front; a
    /// malformed network never gets stepped.
    pub fn simulate(&self, network: &mut Network) -> SimResult<SimulationResult> {
        if network.num_outputs() != NUM_DECODE_OUTPUTS {
            return Err(SimError::InvalidTopology(format!(
                "network must have exactly {} output neurons, got {}",
                NUM_DECODE_OUTPUTS,
                network.num_outputs()
            )));
        }

        let arity = self.trials[0].inputs.len();
        if network.num_inputs() != arity {
            return Err(SimError::InvalidTopology(format!(
                "network has {} input neurons, trials provide {} inputs",
                network.num_inputs(),
                arity
            )));
        }

        let dt = self.eval_params.dt;
        let num_steps = (self.eval_params.max_time / dt) as usize;
        let record_traces = self.eval_params.record_traces;

        let output_ids = [network.output_ids()[0], network.output_ids()[1]];

        let mut sum_squared_error = 0.0;
        let mut trial_records = Vec::with_capacity(self.trials.len());

        for (trial_idx, trial) in self.trials.iter().enumerate() {
            network.reset();
            network.set_inputs(&trial.inputs)?;

            let mut prev_samples = [
                (0.0, network.output_potential(0)),
                (0.0, network.output_potential(1)),
            ];
            let mut first_spikes: [Option<SpikeRecord>; NUM_DECODE_OUTPUTS] = [None, None];
            let mut trace = if record_traces {
                Some(TrialTrace::new(network, num_steps))
            } else {
                None
            };

            for j in 0..num_steps {
                let t = j as f64 * dt;
                let fired = network.advance(dt)?;

                if let Some(trace) = trace.as_mut() {
                    trace.record(t, network);
                }

                for slot in 0..NUM_DECODE_OUTPUTS {
                    if fired[slot] && first_spikes[slot].is_none() {
                        let (sample_t, sample_potential) = prev_samples[slot];
                        first_spikes[slot] = Some(SpikeRecord {
                            neuron_id: output_ids[slot],
                            simulated_time: sample_t,
                            potential_at_spike: sample_potential,
                        });
                    }

                    prev_samples[slot] = (t, network.output_potential(slot));
                }

                // tracing wants the full duration; otherwise there is nothing
                // left to observe once both outputs have fired
                if trace.is_none() && first_spikes.iter().all(|record| record.is_some()) {
                    break;
                }
            }

            let response = compute_output(
                first_spikes[0].map(|record| record.simulated_time),
                first_spikes[1].map(|record| record.simulated_time),
            );

            debug!(
                "trial {}: response {:.4}, expected {:.4}",
                trial_idx, response, trial.expected
            );

            sum_squared_error += (response - trial.expected) * (response - trial.expected);

            trial_records.push(TrialRecord {
                inputs: trial.inputs.clone(),
                expected: trial.expected,
                response,
                first_spikes: first_spikes.to_vec(),
                trace,
            });
        }

        Ok(SimulationResult {
            sum_squared_error,
            trials: trial_records,
        })
    }
}
