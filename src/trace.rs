use serde::{Deserialize, Serialize};

use crate::network::Network;

/// Membrane-potential samples for every neuron over one trial, recorded only
/// when trace recording is requested. Bounded by the trial's step count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialTrace {
    pub neuron_traces: Vec<NeuronTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronTrace {
    pub neuron_id: usize,
    pub samples: Vec<TraceSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    pub t: f64,
    pub potential: f64,
}

impl TrialTrace {
    pub(crate) fn new(network: &Network, num_steps: usize) -> Self {
        Self {
            neuron_traces: network
                .neurons()
                .iter()
                .map(|neuron| NeuronTrace {
                    neuron_id: neuron.id(),
                    samples: Vec::with_capacity(num_steps),
                })
                .collect(),
        }
    }

    pub(crate) fn record(&mut self, t: f64, network: &Network) {
        for (neuron_trace, neuron) in self.neuron_traces.iter_mut().zip(network.neurons()) {
            neuron_trace.samples.push(TraceSample {
                t,
                potential: neuron.potential(),
            });
        }
    }

    pub fn neuron_trace(&self, neuron_id: usize) -> Option<&NeuronTrace> {
        self.neuron_traces
            .iter()
            .find(|neuron_trace| neuron_trace.neuron_id == neuron_id)
    }
}
