use crate::error::{SimError, SimResult};
use crate::neuron::Neuron;
use crate::params::{self, NetworkParams, NeuronRole, Synapse};
use crate::types::HashMap;

pub fn create_network(params: NetworkParams) -> SimResult<Network> {
    params::validate_network_params(&params)?;

    let mut neurons = Vec::with_capacity(params.neurons.len());
    let mut nid_to_idx = HashMap::default();
    let mut input_ids = Vec::new();
    let mut output_ids = Vec::new();
    let mut input_idxs = Vec::new();
    let mut output_idxs = Vec::new();

    for (idx, neuron_def) in params.neurons.iter().enumerate() {
        nid_to_idx.insert(neuron_def.id, idx);
        neurons.push(Neuron::new(
            neuron_def.id,
            neuron_def.role,
            neuron_def.preset.params(),
            neuron_def.bias,
        ));

        match neuron_def.role {
            NeuronRole::Input => {
                input_ids.push(neuron_def.id);
                input_idxs.push(idx);
            }
            NeuronRole::Output => {
                output_ids.push(neuron_def.id);
                output_idxs.push(idx);
            }
            NeuronRole::Hidden => {}
        }
    }

    let mut incoming = vec![Vec::new(); neurons.len()];

    for synapse in &params.synapses {
        let source_idx = nid_to_idx[&synapse.source_id];
        let target_idx = nid_to_idx[&synapse.target_id];
        incoming[target_idx].push((source_idx, synapse.weight));
    }

    let num_neurons = neurons.len();
    let num_inputs = input_idxs.len();

    Ok(Network {
        neurons,
        nid_to_idx,
        incoming,
        input_ids,
        output_ids,
        input_idxs,
        output_idxs,
        synapses: params.synapses,
        external_currents: vec![0.0; num_inputs],
        fired_prev: vec![false; num_neurons],
        current_scratch: vec![0.0; num_neurons],
    })
}

/// A directed weighted graph of neurons advanced in synchronous steps: every
/// neuron reads the previous step's spike flags, so update order carries no
/// read-after-write hazard.
#[derive(Debug, Clone)]
pub struct Network {
    neurons: Vec<Neuron>,
    nid_to_idx: HashMap<usize, usize>,
    incoming: Vec<Vec<(usize, f64)>>,
    input_ids: Vec<usize>,
    output_ids: Vec<usize>,
    input_idxs: Vec<usize>,
    output_idxs: Vec<usize>,
    synapses: Vec<Synapse>,
    external_currents: Vec<f64>,
    fired_prev: Vec<bool>,
    current_scratch: Vec<f64>,
}

impl Network {
    pub fn num_neurons(&self) -> usize {
        self.neurons.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.input_idxs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.output_idxs.len()
    }

    /// Input neuron ids in declaration order; position defines the external
    /// input slot.
    pub fn input_ids(&self) -> &[usize] {
        &self.input_ids
    }

    /// Output neuron ids in declaration order; position defines the decoded
    /// output slot.
    pub fn output_ids(&self) -> &[usize] {
        &self.output_ids
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron(&self, neuron_id: usize) -> Option<&Neuron> {
        self.nid_to_idx
            .get(&neuron_id)
            .map(|&idx| &self.neurons[idx])
    }

    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    pub fn output_potential(&self, slot: usize) -> f64 {
        self.neurons[self.output_idxs[slot]].potential()
    }

    /// Restores every neuron to its resting state and clears in-flight spike
    /// flags and external forcing. Must be called between independent trials.
    pub fn reset(&mut self) {
        for neuron in &mut self.neurons {
            neuron.reset();
        }

        self.fired_prev.iter_mut().for_each(|fired| *fired = false);
        self.external_currents
            .iter_mut()
            .for_each(|current| *current = 0.0);
    }

    /// Stores the external forcing currents applied to the input neurons on
    /// every subsequent advance until the next `set_inputs` or `reset`.
    pub fn set_inputs(&mut self, values: &[f64]) -> SimResult<()> {
        if values.len() != self.input_idxs.len() {
            return Err(SimError::InvalidInputLength {
                expected: self.input_idxs.len(),
                actual: values.len(),
            });
        }

        self.external_currents.copy_from_slice(values);
        Ok(())
    }

    /// Advances every neuron by one step of size `dt` and returns the spike
    /// flags of the output neurons in declared output order.
    pub fn advance(&mut self, dt: f64) -> SimResult<Vec<bool>> {
        for (idx, neuron) in self.neurons.iter().enumerate() {
            let mut current = neuron.bias();

            for &(source_idx, weight) in &self.incoming[idx] {
                if self.fired_prev[source_idx] {
                    current += weight;
                }
            }

            self.current_scratch[idx] = current;
        }

        for (slot, &idx) in self.input_idxs.iter().enumerate() {
            self.current_scratch[idx] += self.external_currents[slot];
        }

        for idx in 0..self.neurons.len() {
            let fired = self.neurons[idx].advance(self.current_scratch[idx], dt)?;
            self.fired_prev[idx] = fired;
        }

        Ok(self
            .output_idxs
            .iter()
            .map(|&idx| self.fired_prev[idx])
            .collect())
    }
}
