use serde::{Deserialize, Serialize};

use crate::params::NeuronParams;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuronState {
    pub membrane_potential: f64,
    pub recovery: f64,
}

impl NeuronState {
    pub fn resting(params: &NeuronParams) -> Self {
        Self {
            membrane_potential: params.c,
            recovery: params.b * params.c,
        }
    }
}

/// Advances the two coupled state variables by `dt` milliseconds and applies
/// the discontinuous reset in the same step the threshold is crossed.
///
/// The membrane equation is integrated in two half-steps, with the updated
/// potential feeding the second one; the recovery variable then takes one
/// full Euler step against the updated potential.
pub fn step(
    state: NeuronState,
    params: &NeuronParams,
    input_current: f64,
    dt: f64,
) -> (NeuronState, bool) {
    let mut v = state.membrane_potential;
    let mut u = state.recovery;

    v += 0.5 * dt * (0.04 * v * v + 5.0 * v + 140.0 - u + input_current);
    v += 0.5 * dt * (0.04 * v * v + 5.0 * v + 140.0 - u + input_current);
    u += dt * params.a * (params.b * v - u);

    if v >= params.threshold {
        (
            NeuronState {
                membrane_potential: params.c,
                recovery: u + params.d,
            },
            true,
        )
    } else {
        (
            NeuronState {
                membrane_potential: v,
                recovery: u,
            },
            false,
        )
    }
}
