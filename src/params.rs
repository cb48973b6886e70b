use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::types::HashSet;

/// Izhikevich model constants. One record is shared by all neurons of the
/// same type; see [`NeuronPreset`] for the named presets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuronParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub threshold: f64,
}

/// Closed set of named parameter presets from the classic Izhikevich tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeuronPreset {
    RegularSpiking,
    IntrinsicallyBursting,
    Chattering,
    FastSpiking,
    ThalamoCortical,
    Resonator,
    LowThresholdSpiking,
}

impl NeuronPreset {
    pub fn params(self) -> NeuronParams {
        let (a, b, c, d) = match self {
            NeuronPreset::RegularSpiking => (0.02, 0.2, -65.0, 8.0),
            NeuronPreset::IntrinsicallyBursting => (0.02, 0.2, -55.0, 4.0),
            NeuronPreset::Chattering => (0.02, 0.2, -50.0, 2.0),
            NeuronPreset::FastSpiking => (0.1, 0.2, -65.0, 2.0),
            NeuronPreset::ThalamoCortical => (0.02, 0.25, -65.0, 0.05),
            NeuronPreset::Resonator => (0.1, 0.26, -65.0, 2.0),
            NeuronPreset::LowThresholdSpiking => (0.02, 0.25, -65.0, 2.0),
        };

        NeuronParams {
            a,
            b,
            c,
            d,
            threshold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeuronRole {
    Input,
    Hidden,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuronDef {
    pub id: usize,
    pub role: NeuronRole,
    pub preset: NeuronPreset,
    pub bias: f64,
}

/// Directed weighted connection. At most one synapse per ordered pair;
/// negative weights are inhibitory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    pub source_id: usize,
    pub target_id: usize,
    pub weight: f64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub neurons: Vec<NeuronDef>,
    pub synapses: Vec<Synapse>,
}

/// Simulation tunables for one fitness evaluation. `max_time` and `dt` are
/// in milliseconds; the defaults are 50.0 and 0.25.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalParams {
    pub max_time: f64,
    pub dt: f64,
    pub record_traces: bool,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            max_time: 50.0,
            dt: 0.25,
            record_traces: false,
        }
    }
}

/// One row of the task truth table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialParams {
    pub inputs: Vec<f64>,
    pub expected: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalParams {
    pub num_threads: Option<usize>,
    pub pin_threads: bool,
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self {
            num_threads: Some(1),
            pin_threads: false,
        }
    }
}

pub fn validate_network_params(network_params: &NetworkParams) -> Result<(), SimError> {
    let mut seen_ids = HashSet::default();

    for neuron_def in &network_params.neurons {
        if !seen_ids.insert(neuron_def.id) {
            return Err(SimError::InvalidTopology(format!(
                "duplicate neuron id: {}",
                neuron_def.id
            )));
        }

        if !neuron_def.bias.is_finite() {
            return Err(SimError::InvalidParams(format!(
                "bias of neuron {} must be finite",
                neuron_def.id
            )));
        }
    }

    let mut seen_pairs = HashSet::default();

    for synapse in &network_params.synapses {
        if !seen_ids.contains(&synapse.source_id) {
            return Err(SimError::InvalidTopology(format!(
                "synapse references unknown source neuron id: {}",
                synapse.source_id
            )));
        }

        if !seen_ids.contains(&synapse.target_id) {
            return Err(SimError::InvalidTopology(format!(
                "synapse references unknown target neuron id: {}",
                synapse.target_id
            )));
        }

        if !seen_pairs.insert((synapse.source_id, synapse.target_id)) {
            return Err(SimError::InvalidTopology(format!(
                "duplicate synapse from {} to {}",
                synapse.source_id, synapse.target_id
            )));
        }

        if !synapse.weight.is_finite() {
            return Err(SimError::InvalidParams(format!(
                "weight of synapse from {} to {} must be finite",
                synapse.source_id, synapse.target_id
            )));
        }
    }

    Ok(())
}

pub fn validate_eval_params(eval_params: &EvalParams) -> Result<(), SimError> {
    if !eval_params.dt.is_finite() || eval_params.dt < 0.1 || eval_params.dt > 1.0 {
        return Err(SimError::InvalidParams(
            "dt must be in [0.1, 1.0]".to_string(),
        ));
    }

    if !eval_params.max_time.is_finite() || eval_params.max_time < eval_params.dt {
        return Err(SimError::InvalidParams(
            "max_time must be at least dt".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_trial_params(trials: &[TrialParams]) -> Result<(), SimError> {
    let first = match trials.first() {
        Some(first) => first,
        None => {
            return Err(SimError::InvalidParams(
                "at least one trial is required".to_string(),
            ))
        }
    };

    for trial in trials {
        if trial.inputs.len() != first.inputs.len() {
            return Err(SimError::InvalidParams(format!(
                "inconsistent trial input arity: expected {}, got {}",
                first.inputs.len(),
                trial.inputs.len()
            )));
        }

        if !trial.expected.is_finite() || trial.inputs.iter().any(|value| !value.is_finite()) {
            return Err(SimError::InvalidParams(
                "trial values must be finite".to_string(),
            ));
        }
    }

    Ok(())
}

pub fn validate_technical_params(technical_params: &TechnicalParams) -> Result<(), SimError> {
    if let Some(num_threads) = technical_params.num_threads {
        if num_threads == 0 {
            return Err(SimError::InvalidParams(
                "num_threads must be strictly positive".to_string(),
            ));
        }

        if num_cpus::get() < num_threads {
            return Err(SimError::InvalidParams(
                "num_threads must not be greater than number of available CPUs".to_string(),
            ));
        }
    }

    Ok(())
}
