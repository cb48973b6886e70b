use iznet::params::{EvalParams, NetworkParams, TrialParams};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioParams {
    pub network: NetworkParams,
    pub trials: Vec<TrialParams>,
    pub eval: EvalParams,
}

/// Hand-wired exclusive-or scenario: a pacemaker hidden neuron paces both
/// outputs, and active inputs cancel the pacemaker's kick on output 4.
pub fn get_scenario_params() -> ScenarioParams {
    let params_yaml_str = r#"
network:
  neurons:
  - id: 0
    role: Input
    preset: FastSpiking
    bias: 0.0
  - id: 1
    role: Input
    preset: FastSpiking
    bias: 0.0
  - id: 2
    role: Hidden
    preset: FastSpiking
    bias: 10.0
  - id: 3
    role: Output
    preset: FastSpiking
    bias: 0.0
  - id: 4
    role: Output
    preset: FastSpiking
    bias: 0.0
  synapses:
  - source_id: 2
    target_id: 3
    weight: 100.0
  - source_id: 2
    target_id: 4
    weight: 100.0
  - source_id: 0
    target_id: 4
    weight: -50.0
  - source_id: 1
    target_id: 4
    weight: -50.0
trials:
- inputs: [0.0, 0.0]
  expected: 0.0
- inputs: [0.0, 10.0]
  expected: 1.0
- inputs: [10.0, 0.0]
  expected: 1.0
- inputs: [10.0, 10.0]
  expected: 0.0
eval:
  max_time: 50.0
  dt: 0.25
  record_traces: false
"#;

    serde_yaml::from_str(params_yaml_str).unwrap()
}
